/**
 * Application State
 *
 * The central state container shared by the middleware and route groups.
 *
 * # State Extraction
 *
 * The `FromRef` implementations let handlers and middleware extract only
 * the part of the state they need:
 *
 * ```rust
 * use axum::extract::State;
 * use sqlx::PgPool;
 *
 * async fn handler(State(db_pool): State<Option<PgPool>>) {
 *     if let Some(pool) = db_pool {
 *         // ...
 *     }
 * }
 * ```
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::backend::middleware::{CsrfConfig, RateLimiter};
use crate::shared::ServerConfig;

/// Shared application state
///
/// Cloned into every request; all fields are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Optional PostgreSQL pool; `None` when the database is unavailable
    pub db_pool: Option<PgPool>,

    /// Counters for the `/api` rate limit
    pub rate_limiter: RateLimiter,

    /// CSRF cookie settings
    pub csrf: CsrfConfig,

    /// Configuration the server was started with
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Build state from configuration and an already-opened pool
    pub fn new(config: ServerConfig, db_pool: Option<PgPool>) -> Self {
        Self {
            db_pool,
            rate_limiter: RateLimiter::from_config(&config),
            csrf: CsrfConfig::from_config(&config),
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for Option<PgPool> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

impl FromRef<AppState> for RateLimiter {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.rate_limiter.clone()
    }
}

impl FromRef<AppState> for CsrfConfig {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.csrf.clone()
    }
}

impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}
