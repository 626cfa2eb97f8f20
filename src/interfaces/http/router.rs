//! API Router with Swagger UI

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::cors::cors_layer;
use super::modules::auth::{self, AuthHandlerState};
use super::modules::health::{self, HealthState};
use super::modules::metrics as http_metrics;
use super::modules::request_id::request_id_middleware;
use crate::application::AuthenticationService;
use crate::config::CorsConfig;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "credential-gate",
        description = "Login against the usuarios table; returns the user's role"
    ),
    paths(auth::login, health::health_check),
    components(schemas(
        auth::LoginRequest,
        auth::LoginResponse,
        auth::ErrorResponse,
        health::HealthResponse,
    )),
    tags(
        (name = "Authentication", description = "Credential check"),
        (name = "Health", description = "Liveness and database reachability")
    )
)]
pub struct ApiDoc;

/// Build the HTTP API.
///
/// `/metrics` is only mounted when a Prometheus handle is supplied.
pub fn create_api_router(
    auth_service: Arc<AuthenticationService>,
    db: DatabaseConnection,
    cors: &CorsConfig,
    prometheus: Option<PrometheusHandle>,
) -> Router {
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .with_state(AuthHandlerState { auth_service });

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(HealthState { db });

    let mut api = auth_routes.merge(health_routes);

    if let Some(handle) = prometheus {
        api = api.merge(
            Router::new()
                .route("/metrics", get(http_metrics::prometheus_metrics))
                .with_state(http_metrics::MetricsState { handle }),
        );
    }

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    api.route_layer(middleware::from_fn(http_metrics::http_metrics_middleware))
        .merge(swagger_routes)
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::infrastructure::crypto::password::hash_password_with_cost;
    use crate::infrastructure::database::{init_database, DatabaseConfig};
    use crate::infrastructure::InMemoryUserRepository;

    struct TestApp {
        router: Router,
        repo: Arc<InMemoryUserRepository>,
        db: DatabaseConnection,
    }

    async fn app() -> TestApp {
        app_with_metrics(None).await
    }

    async fn app_with_metrics(prometheus: Option<PrometheusHandle>) -> TestApp {
        let repo = Arc::new(InMemoryUserRepository::new());
        let hash = hash_password_with_cost("secret123", 4).unwrap();
        repo.insert("JUANP", hash.clone(), "Director", true);
        repo.insert("OLD", hash.clone(), "Financiera", false);
        repo.insert("GUEST", hash, "Invitado", true);

        let db = init_database(&DatabaseConfig::in_memory()).await.unwrap();
        let service = Arc::new(AuthenticationService::new(repo.clone()));
        let cors = CorsConfig {
            frontend_origin: Some("https://front.example.com/".into()),
            extra_origins: vec![],
        };
        let router = create_api_router(service, db.clone(), &cors, prometheus);

        TestApp { router, repo, db }
    }

    fn login_request(body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn login_success_returns_user_and_role() {
        let app = app().await;
        let response = app
            .router
            .oneshot(login_request(json!({"usuario": " juanp ", "password": "secret123"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"usuario": "JUANP", "rol": "Director"})
        );
        assert_eq!(app.repo.touch_count(), 1);
    }

    #[tokio::test]
    async fn failures_map_to_status_and_message() {
        let cases = [
            (json!({"usuario": "juanp"}), StatusCode::BAD_REQUEST, "Faltan credenciales"),
            (
                json!({"usuario": null, "password": "x"}),
                StatusCode::BAD_REQUEST,
                "Faltan credenciales",
            ),
            (
                json!({"usuario": "juanp", "password": "wrong"}),
                StatusCode::UNAUTHORIZED,
                "Usuario o contraseña incorrectos",
            ),
            (
                json!({"usuario": 123, "password": "x"}),
                StatusCode::UNAUTHORIZED,
                "Usuario o contraseña incorrectos",
            ),
            (
                json!({"usuario": 0, "password": "x"}),
                StatusCode::BAD_REQUEST,
                "Faltan credenciales",
            ),
            (
                json!({"usuario": "ghost", "password": "x"}),
                StatusCode::UNAUTHORIZED,
                "Usuario o contraseña incorrectos",
            ),
            (
                json!({"usuario": "old", "password": "secret123"}),
                StatusCode::UNAUTHORIZED,
                "Usuario inactivo",
            ),
            (
                json!({"usuario": "guest", "password": "secret123"}),
                StatusCode::FORBIDDEN,
                "Rol no autorizado",
            ),
        ];

        let app = app().await;
        for (body, status, message) in cases {
            let response = app.router.clone().oneshot(login_request(body)).await.unwrap();
            assert_eq!(response.status(), status);
            assert_eq!(json_body(response).await, json!({ "message": message }));
        }
        assert_eq!(app.repo.touch_count(), 0);
    }

    #[test]
    fn metrics_endpoint_renders_login_outcomes() {
        use metrics_exporter_prometheus::PrometheusBuilder;

        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let rendered = metrics::with_local_recorder(&recorder, || {
            runtime.block_on(async {
                let app = app_with_metrics(Some(handle)).await;
                for body in [
                    json!({"usuario": "juanp", "password": "secret123"}),
                    json!({"usuario": "juanp", "password": "wrong"}),
                    json!({"usuario": "guest", "password": "secret123"}),
                ] {
                    app.router.clone().oneshot(login_request(body)).await.unwrap();
                }

                let request = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
                let response = app.router.oneshot(request).await.unwrap();
                assert_eq!(response.status(), StatusCode::OK);
                let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
                String::from_utf8(bytes.to_vec()).unwrap()
            })
        });

        for outcome in ["success", "invalid_credentials", "unauthorized_role"] {
            let line = format!("auth_login_attempts_total{{outcome=\"{outcome}\"}} 1");
            assert!(rendered.contains(&line), "missing {line} in:\n{rendered}");
        }
        assert!(rendered.contains("http_requests_total"));
        assert!(rendered.contains(r#"path="/login""#));
    }

    #[tokio::test]
    async fn unreadable_body_is_missing_credentials() {
        let app = app().await;

        let malformed = Request::builder()
            .method(Method::POST)
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.router.clone().oneshot(malformed).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let no_content_type = Request::builder()
            .method(Method::POST)
            .uri("/login")
            .body(Body::empty())
            .unwrap();
        let response = app.router.oneshot(no_content_type).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(app.repo.lookup_count(), 0);
    }

    #[tokio::test]
    async fn store_outage_is_500() {
        let app = app().await;
        app.repo.set_unavailable(true);

        let response = app
            .router
            .oneshot(login_request(json!({"usuario": "juanp", "password": "secret123"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({"message": "Error interno del servidor"})
        );
    }

    #[tokio::test]
    async fn health_reports_database_state() {
        let app = app().await;

        let request = || Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app.router.clone().oneshot(request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"ok": true, "db": true}));

        app.db.clone().close().await.unwrap();
        let response = app.router.oneshot(request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await, json!({"ok": false, "db": false}));
    }

    #[tokio::test]
    async fn cors_allows_configured_and_dev_origins_only() {
        let app = app().await;

        for (origin, allowed) in [
            ("https://front.example.com", true),
            ("http://localhost:5173", true),
            ("https://evil.example.com", false),
        ] {
            let mut request =
                login_request(json!({"usuario": "juanp", "password": "secret123"}));
            request
                .headers_mut()
                .insert(header::ORIGIN, origin.parse().unwrap());

            let response = app.router.clone().oneshot(request).await.unwrap();
            let header = response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN);
            assert_eq!(header.is_some(), allowed, "origin {origin}");
        }
    }

    #[tokio::test]
    async fn cors_preflight_lists_methods() {
        let app = app().await;
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/login")
            .header(header::ORIGIN, "http://127.0.0.1:5175")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();

        let response = app.router.oneshot(request).await.unwrap();

        assert!(response.status().is_success());
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://127.0.0.1:5175"
        );
        let methods = response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap();
        assert!(methods.contains("POST"));
    }

    #[tokio::test]
    async fn request_id_is_echoed_or_generated() {
        let app = app().await;

        let request = Request::builder()
            .uri("/health")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.headers()["x-request-id"], "abc-123");

        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app.router.oneshot(request).await.unwrap();
        let generated = response.headers()["x-request-id"].to_str().unwrap();
        assert_eq!(generated.len(), 36);
    }
}
