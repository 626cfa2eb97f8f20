//! Login handler

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error, info};

use super::dto::{ErrorResponse, LoginRequest, LoginResponse};
use crate::application::AuthenticationService;
use crate::shared::AuthError;

#[derive(Clone)]
pub struct AuthHandlerState {
    pub auth_service: Arc<AuthenticationService>,
}

impl AuthError {
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            AuthError::MissingCredentials => (StatusCode::BAD_REQUEST, "Faltan credenciales"),
            AuthError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Usuario o contraseña incorrectos")
            }
            AuthError::InactiveAccount => (StatusCode::UNAUTHORIZED, "Usuario inactivo"),
            AuthError::UnauthorizedRole => (StatusCode::FORBIDDEN, "Rol no autorizado"),
            AuthError::StoreUnavailable(_) | AuthError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Error interno del servidor")
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            error!(error = %self, "Login failed");
        }
        (
            status,
            Json(ErrorResponse {
                message: message.to_string(),
            }),
        )
            .into_response()
    }
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 400, description = "Missing username or password", body = ErrorResponse),
        (status = 401, description = "Invalid credentials or inactive account", body = ErrorResponse),
        (status = 403, description = "Role not authorized", body = ErrorResponse),
        (status = 500, description = "User store unavailable", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AuthError> {
    // An unreadable body is treated like an empty one
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!(error = %rejection, "Unreadable login body");
            LoginRequest::default()
        }
    };

    info!(
        usuario = request.usuario.as_deref().unwrap_or_default(),
        has_password = request.password.as_deref().is_some_and(|p| !p.is_empty()),
        "Login request"
    );

    let user = state
        .auth_service
        .authenticate(
            request.usuario.as_deref().unwrap_or_default(),
            request.password.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(Json(LoginResponse {
        usuario: user.username,
        rol: user.role.as_str().to_string(),
    }))
}
