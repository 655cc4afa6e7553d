//! Shared Module
//!
//! Types used by both the server binary and the library consumers that embed
//! the router (integration tests, alternative entry points).

/// Server configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use config::{ConfigError, ServerConfig, ServerConfigBuilder};
