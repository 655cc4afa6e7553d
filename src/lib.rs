//! Chat App Server - Main Library
//!
//! The HTTP front door of the chat application. It wraps the application's
//! route groups in the security middleware stack and serves the pre-built
//! single-page frontend.
//!
//! # Overview
//!
//! - Security headers on every response (frame deny, CSP, HSTS, no-referrer, ...)
//! - Per-client rate limiting on `/api`
//! - CORS for a single trusted origin with credentials
//! - Cookie-based CSRF protection for state-changing requests
//! - Mount points for the `auth`, `messages` and `users` route groups
//! - Static bundle serving with an SPA `index.html` fallback
//! - Optional PostgreSQL connection pool shared with the route groups
//!
//! # Module Structure
//!
//! - **`shared`** - Configuration types
//! - **`backend`** - Axum server, middleware, routes and errors
//!
//! # Usage
//!
//! ```rust,no_run
//! use chatapp::backend::routes::RouteGroups;
//! use chatapp::backend::server::create_app;
//! use chatapp::shared::ServerConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let app = create_app(config, RouteGroups::default()).await?;
//! // Serve `app` with axum
//! # Ok(())
//! # }
//! ```

/// Shared types and configuration
pub mod shared;

/// Backend server-side code
pub mod backend;
