//! Route Configuration Module
//!
//! Configures all HTTP routes for the server.
//!
//! - **`router`** - Main router creation and middleware stack
//! - **`api_routes`** - Route group mount points and server endpoints
//! - **`static_files`** - Frontend bundle with SPA fallback
//!
//! # Route Types
//!
//! ## API Routes
//!
//! - `/api/auth/*`, `/api/messages/*`, `/api/users/*` - Application route groups
//! - `GET /api/csrf-token` - CSRF token for the SPA
//! - `GET /api/health` - Health check
//!
//! ## Frontend
//!
//! Every other path is served from the frontend bundle, falling back to
//! `index.html`.

/// Main router creation
pub mod router;

/// API routes and route groups
pub mod api_routes;

/// Frontend bundle serving
pub mod static_files;

pub use api_routes::{configure_api_routes, RouteGroups};
pub use router::create_router;
pub use static_files::spa_service;
