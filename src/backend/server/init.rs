/**
 * Server Initialization
 *
 * Builds the application: database, shared state, background tasks and
 * router.
 *
 * # Initialization Process
 *
 * 1. Connect to the database if one is configured
 * 2. Create the shared state (rate limiter, CSRF settings)
 * 3. Spawn the rate-limit sweep task
 * 4. Assemble the router around the supplied route groups
 */

use axum::Router;

use crate::backend::error::BackendError;
use crate::backend::middleware::RateLimiter;
use crate::backend::routes::{create_router, RouteGroups};
use crate::backend::server::config::load_database;
use crate::backend::server::state::AppState;
use crate::shared::ServerConfig;

/// Create and configure the Axum application
///
/// # Arguments
///
/// * `config` - Server configuration; validated again here
/// * `groups` - Routers for `/api/auth`, `/api/messages` and `/api/users`
///
/// # Errors
///
/// Returns `BackendError::ConfigError` if `config` fails validation or the
/// middleware cannot be built from it. A database that cannot be reached is not an error.
///
/// # Background Tasks
///
/// Must be called inside a Tokio runtime: a task clearing expired rate-limit
/// windows runs once per window for the life of the process.
pub async fn create_app(config: ServerConfig, groups: RouteGroups) -> Result<Router, BackendError> {
    tracing::info!("Initializing chat server");
    config.validate()?;

    let db_pool = load_database(config.database_url.as_deref()).await;
    let app_state = AppState::new(config, db_pool);

    let app = create_router(app_state.clone(), groups)?;

    spawn_rate_limit_sweep(app_state.rate_limiter.clone());
    tracing::info!("Router configured with periodic rate-limit cleanup");

    Ok(app)
}

fn spawn_rate_limit_sweep(limiter: RateLimiter) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(limiter.window());
        loop {
            interval.tick().await;
            let removed = limiter.sweep();
            tracing::debug!(removed, "Cleaned up expired rate-limit windows");
        }
    });
}
