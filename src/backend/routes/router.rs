/**
 * Router Configuration
 *
 * Combines the API routes, the frontend bundle and the middleware stack into
 * a single Axum router.
 *
 * # Request Pipeline
 *
 * Outermost first:
 * 1. Request tracing
 * 2. Security headers
 * 3. Rate limiting (`/api` only)
 * 4. CORS
 * 5. Body size limit
 * 6. CSRF protection
 * 7. API routes and route groups
 * 8. Frontend bundle with `index.html` fallback
 */

use axum::{extract::DefaultBodyLimit, middleware, Router};
use tower_http::trace::TraceLayer;

use crate::backend::middleware::{cors_layer, csrf_protection, rate_limit, security_headers};
use crate::backend::routes::api_routes::{configure_api_routes, RouteGroups};
use crate::backend::routes::static_files::spa_service;
use crate::backend::server::state::AppState;
use crate::shared::config::{ConfigError, JSON_BODY_LIMIT};

/// Create the Axum router with all routes and middleware configured
///
/// # Arguments
///
/// * `app_state` - Shared state for middleware and handlers
/// * `groups` - Route groups to mount under `/api`
///
/// # Errors
///
/// Returns `ConfigError` if the configured CORS origin is not a valid
/// header value.
pub fn create_router(app_state: AppState, groups: RouteGroups) -> Result<Router, ConfigError> {
    let cors = cors_layer(&app_state.config)?;

    let router = configure_api_routes(Router::new(), groups)
        .fallback_service(spa_service(&app_state.config));

    // Layers wrap everything added before them, so the last one runs first.
    let router = router
        .layer(middleware::from_fn_with_state(app_state.csrf.clone(), csrf_protection))
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT))
        .layer(cors)
        .layer(middleware::from_fn_with_state(app_state.rate_limiter.clone(), rate_limit))
        .layer(middleware::from_fn(security_headers))
        .layer(TraceLayer::new_for_http());

    Ok(router.with_state(app_state))
}
