//! Server Module
//!
//! Initialization and shared state for the Axum HTTP server.
//!
//! - **`state`** - `AppState` and its `FromRef` projections
//! - **`config`** - Database connection loading
//! - **`init`** - Application creation and background tasks
//!
//! # Initialization Flow
//!
//! 1. **Database**: Connects the optional PostgreSQL pool
//! 2. **State**: Builds the rate limiter and CSRF settings from config
//! 3. **Background Tasks**: Starts the rate-limit sweep
//! 4. **Router**: Wraps the route groups in the middleware stack

/// Application state management
pub mod state;

/// Database connection loading
pub mod config;

/// Server initialization
pub mod init;

pub use init::create_app;
pub use state::AppState;
