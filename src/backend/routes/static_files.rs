/**
 * Frontend Bundle
 *
 * Serves the pre-built single-page app. Files that exist in the bundle are
 * served directly; every other path gets `index.html` so client-side routing
 * can take over.
 */

use tower_http::services::{ServeDir, ServeFile};

use crate::shared::ServerConfig;

/// Static file service with the SPA fallback
///
/// Unmatched `GET`/`HEAD` paths return `index.html` with status `200`.
pub fn spa_service(config: &ServerConfig) -> ServeDir<ServeFile> {
    let index = config.index_file();
    if !index.is_file() {
        tracing::warn!(path = %index.display(), "Frontend index.html not found; SPA fallback will return 404");
    }
    ServeDir::new(&config.frontend_dist).fallback(ServeFile::new(index))
}
