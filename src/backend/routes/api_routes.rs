/**
 * API Routes
 *
 * Mount points for the application's route groups plus the two endpoints
 * the server itself provides.
 *
 * # Routes
 *
 * ## Route Groups
 * - `/api/auth/...` - Authentication group
 * - `/api/messages/...` - Messages group
 * - `/api/users/...` - Users group
 *
 * ## Server Endpoints
 * - `GET /api/csrf-token` - Issue a CSRF token for the caller
 * - `GET /api/health` - Liveness and database status
 */

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use sqlx::PgPool;

use crate::backend::middleware::CsrfToken;
use crate::backend::server::state::AppState;

/// Routers supplied by the application for each `/api` prefix
///
/// Groups left unset are not mounted; their paths fall through to the
/// frontend bundle like any other unknown path.
///
/// # Example
///
/// ```rust
/// use axum::{routing::get, Router};
/// use chatapp::backend::routes::RouteGroups;
///
/// let groups = RouteGroups::new()
///     .with_users(Router::new().route("/", get(|| async { "[]" })));
/// ```
#[derive(Default)]
pub struct RouteGroups {
    pub auth: Option<Router<AppState>>,
    pub messages: Option<Router<AppState>>,
    pub users: Option<Router<AppState>>,
}

impl RouteGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount `router` at `/api/auth`
    pub fn with_auth(mut self, router: Router<AppState>) -> Self {
        self.auth = Some(router);
        self
    }

    /// Mount `router` at `/api/messages`
    pub fn with_messages(mut self, router: Router<AppState>) -> Self {
        self.messages = Some(router);
        self
    }

    /// Mount `router` at `/api/users`
    pub fn with_users(mut self, router: Router<AppState>) -> Self {
        self.users = Some(router);
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrfTokenResponse {
    pub csrf_token: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

/// Configure API routes
///
/// # Arguments
///
/// * `router` - The router to add routes to
/// * `groups` - Route groups to nest under their prefixes
///
/// # Returns
///
/// Router with API routes configured
pub fn configure_api_routes(router: Router<AppState>, groups: RouteGroups) -> Router<AppState> {
    let mut router = router
        .route("/api/csrf-token", get(csrf_token))
        .route("/api/health", get(health));

    for (prefix, group) in [
        ("/api/auth", groups.auth),
        ("/api/messages", groups.messages),
        ("/api/users", groups.users),
    ] {
        if let Some(group) = group {
            tracing::debug!(prefix, "Mounting route group");
            router = router.nest(prefix, group);
        }
    }

    router
}

/// Issue a token bound to the caller's CSRF secret
async fn csrf_token(CsrfToken(csrf_token): CsrfToken) -> Json<CsrfTokenResponse> {
    Json(CsrfTokenResponse { csrf_token })
}

/// Report liveness and whether the database answers
async fn health(State(db_pool): State<Option<PgPool>>) -> Json<HealthResponse> {
    let database = match db_pool {
        None => "unavailable",
        Some(pool) => match sqlx::query("SELECT 1").execute(&pool).await {
            Ok(_) => "connected",
            Err(e) => {
                tracing::warn!("Health check query failed: {}", e);
                "disconnected"
            }
        },
    };

    Json(HealthResponse {
        status: "ok",
        database,
    })
}
