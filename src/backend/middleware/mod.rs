//! Middleware Module
//!
//! HTTP middleware applied to every request before it reaches a route group
//! or the static bundle.
//!
//! # Architecture
//!
//! - **`security_headers`** - Hardened response headers on every response
//! - **`rate_limit`** - Per-client request quota on `/api`
//! - **`cors`** - Cross-origin policy for the frontend origin
//! - **`csrf`** - Cookie-secret CSRF tokens for unsafe methods
//!
//! The layers are assembled in `routes::router::create_router`.

pub mod cors;
pub mod csrf;
pub mod rate_limit;
pub mod security_headers;

pub use cors::cors_layer;
pub use csrf::{csrf_protection, CsrfConfig, CsrfSecret, CsrfToken};
pub use rate_limit::{rate_limit, RateLimiter};
pub use security_headers::security_headers;
