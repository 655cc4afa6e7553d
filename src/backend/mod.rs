//! Backend Module
//!
//! All server-side code: the Axum application, its middleware stack, route
//! mounting and error types.
//!
//! # Architecture
//!
//! - **`server`** - Server initialization, application state, database loading
//! - **`routes`** - Route groups, server endpoints and the frontend bundle
//! - **`middleware`** - Security headers, rate limiting, CORS and CSRF
//! - **`error`** - Backend error type and its HTTP response
//!
//! # Error Handling
//!
//! Middleware and handlers return [`BackendError`], which renders as a JSON
//! body `{"error": ..., "status": ...}` with the matching status code.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Middleware for request processing
pub mod middleware;

/// Backend error types
pub mod error;

pub use error::BackendError;
pub use server::create_app;
