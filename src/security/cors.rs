//! Cross-origin resource sharing policy.

use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::CorsConfig;

/// Build the CORS layer for the configured origins.
///
/// `"*"` anywhere in the list allows every origin. Origins that are not
/// valid header values are skipped with a warning.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let cors = CorsLayer::new().allow_headers(Any).allow_methods(Any);

    if config.allows_any_origin() {
        return cors.allow_origin(Any);
    }

    if config.allowed_origins.is_empty() {
        tracing::warn!("cors.allowed_origins is empty; cross-origin requests will be blocked");
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
}
