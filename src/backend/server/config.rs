/**
 * Database Connection
 *
 * Opens the optional PostgreSQL pool used by the route groups.
 *
 * # Error Handling
 *
 * Connection errors are logged but do not prevent server startup. When the
 * database is unreachable the server keeps serving the frontend and the
 * routes that do not need it; `GET /api/health` reports the outage.
 */

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Connections kept by the pool
const MAX_CONNECTIONS: u32 = 10;

/// How long startup waits for the first connection
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connect to the database at `database_url`
///
/// # Returns
///
/// - `Some(PgPool)` if the connection succeeds
/// - `None` if no URL is configured or the connection fails
///
/// # Example
///
/// ```rust,no_run
/// use chatapp::backend::server::config::load_database;
///
/// # async fn example() {
/// let db_pool = load_database(Some("postgres://localhost/chat")).await;
/// if db_pool.is_none() {
///     // Database features disabled
/// }
/// # }
/// ```
pub async fn load_database(database_url: Option<&str>) -> Option<PgPool> {
    let Some(database_url) = database_url else {
        tracing::warn!("DATABASE_URL not set. Database features will be disabled.");
        return None;
    };

    tracing::info!("Connecting to database...");

    match PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(CONNECT_TIMEOUT)
        .connect(database_url)
        .await
    {
        Ok(pool) => {
            tracing::info!("Database connected");
            Some(pool)
        }
        Err(e) => {
            tracing::error!("Database connection failed: {}", e);
            tracing::warn!("Database features will be disabled.");
            None
        }
    }
}
