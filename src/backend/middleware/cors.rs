/**
 * CORS Policy
 *
 * Builds the CORS layer for the single trusted frontend origin.
 *
 * - Origin: exactly the configured origin
 * - Methods: GET, HEAD, PUT, PATCH, POST, DELETE
 * - Credentials: allowed (cookies carry the CSRF secret)
 * - Request headers: mirrored from the preflight
 */

use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

use crate::shared::{ConfigError, ServerConfig};

/// Methods a cross-origin caller may use
pub const ALLOWED_METHODS: [Method; 6] = [
    Method::GET,
    Method::HEAD,
    Method::PUT,
    Method::PATCH,
    Method::POST,
    Method::DELETE,
];

/// Create the CORS layer for `config.cors_origin`
pub fn cors_layer(config: &ServerConfig) -> Result<CorsLayer, ConfigError> {
    let origin = HeaderValue::from_str(&config.cors_origin)
        .map_err(|_| ConfigError::InvalidUrl(config.cors_origin.clone()))?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::exact(origin))
        .allow_methods(ALLOWED_METHODS.to_vec())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}
