//! CORS allowlist
//!
//! Origins are compared after the same normalization applied to the
//! configured list. Requests without an `Origin` header pass through
//! untouched; disallowed origins simply get no CORS headers.

use std::collections::HashSet;
use std::sync::Arc;

use axum::http::{header, request::Parts, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::debug;

use crate::config::{normalize_origin, CorsConfig};

pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let allowed: Arc<HashSet<String>> = Arc::new(config.allowed_origins().into_iter().collect());
    debug!(origins = ?allowed, "CORS allowlist");

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin
                    .to_str()
                    .ok()
                    .and_then(normalize_origin)
                    .is_some_and(|origin| allowed.contains(&origin))
            },
        ))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
