//! Server configuration module
//!
//! Provides the configuration type for the chat server. Values come from the
//! process environment (optionally seeded from a `.env` file) or from
//! [`ServerConfig::builder`] when the server is embedded or tested.
//!
//! # Environment Variables
//!
//! | Variable                 | Default                 |
//! |--------------------------|-------------------------|
//! | `PORT`                   | `5000`                  |
//! | `DATABASE_URL`           | unset (no database)     |
//! | `CORS_ORIGIN`            | `http://localhost:3000` |
//! | `FRONTEND_DIST`          | `frontend/dist`         |
//! | `RATE_LIMIT_MAX`         | `100`                   |
//! | `RATE_LIMIT_WINDOW_SECS` | `900`                   |
//! | `CSRF_COOKIE_SECURE`     | `false`                 |
//! | `TRUST_PROXY`            | `false`                 |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_FRONTEND_DIST: &str = "frontend/dist";
pub const DEFAULT_RATE_LIMIT_MAX: u32 = 100;
/// 15 minutes
pub const DEFAULT_RATE_LIMIT_WINDOW: Duration = Duration::from_secs(15 * 60);
/// Longest accepted rate-limit window (one day)
pub const MAX_RATE_LIMIT_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);
/// Largest request body accepted (100 KiB)
pub const JSON_BODY_LIMIT: usize = 100 * 1024;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on (all interfaces)
    pub port: u16,
    /// PostgreSQL connection URL; `None` runs the server without a database
    pub database_url: Option<String>,
    /// The single origin allowed by CORS
    pub cors_origin: String,
    /// Directory holding the pre-built frontend bundle
    pub frontend_dist: PathBuf,
    /// Requests allowed per client per window on `/api`
    pub rate_limit_max: u32,
    /// Length of a rate-limit window
    pub rate_limit_window: Duration,
    /// Whether the CSRF secret cookie is marked `Secure`
    pub csrf_cookie_secure: bool,
    /// Key the rate limiter on `X-Forwarded-For` instead of the peer address
    pub trust_proxy: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            frontend_dist: PathBuf::from(DEFAULT_FRONTEND_DIST),
            rate_limit_max: DEFAULT_RATE_LIMIT_MAX,
            rate_limit_window: DEFAULT_RATE_LIMIT_WINDOW,
            csrf_cookie_secure: false,
            trust_proxy: false,
        }
    }
}

impl ServerConfig {
    /// Create a new ServerConfigBuilder
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to their defaults. A variable that is set
    /// but cannot be parsed is an error rather than a silent default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = Self::builder();

        if let Some(port) = env_var("PORT") {
            builder = builder.port(parse_var("PORT", &port)?);
        }
        if let Some(url) = env_var("DATABASE_URL") {
            builder = builder.database_url(url);
        }
        if let Some(origin) = env_var("CORS_ORIGIN") {
            builder = builder.cors_origin(origin);
        }
        if let Some(dist) = env_var("FRONTEND_DIST") {
            builder = builder.frontend_dist(dist);
        }
        if let Some(max) = env_var("RATE_LIMIT_MAX") {
            builder = builder.rate_limit_max(parse_var("RATE_LIMIT_MAX", &max)?);
        }
        if let Some(secs) = env_var("RATE_LIMIT_WINDOW_SECS") {
            let secs: u64 = parse_var("RATE_LIMIT_WINDOW_SECS", &secs)?;
            builder = builder.rate_limit_window(Duration::from_secs(secs));
        }
        if let Some(secure) = env_var("CSRF_COOKIE_SECURE") {
            builder = builder.csrf_cookie_secure(parse_bool("CSRF_COOKIE_SECURE", &secure)?);
        }
        if let Some(trust) = env_var("TRUST_PROXY") {
            builder = builder.trust_proxy(parse_bool("TRUST_PROXY", &trust)?);
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let origin = self.cors_origin.as_str();
        let has_scheme = origin.starts_with("http://") || origin.starts_with("https://");
        if !has_scheme || origin.ends_with('/') || origin.contains(char::is_whitespace) {
            return Err(ConfigError::InvalidUrl(self.cors_origin.clone()));
        }
        if axum::http::HeaderValue::from_str(origin).is_err() {
            return Err(ConfigError::InvalidUrl(self.cors_origin.clone()));
        }
        if self.rate_limit_max == 0 {
            return Err(ConfigError::InvalidValue {
                name: "RATE_LIMIT_MAX",
                value: "0".to_string(),
            });
        }
        if self.rate_limit_window.is_zero() || self.rate_limit_window > MAX_RATE_LIMIT_WINDOW {
            return Err(ConfigError::InvalidValue {
                name: "RATE_LIMIT_WINDOW_SECS",
                value: self.rate_limit_window.as_secs().to_string(),
            });
        }
        Ok(())
    }

    /// Address the server binds to
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    /// Path of the SPA entry point inside the bundle
    pub fn index_file(&self) -> PathBuf {
        self.frontend_dist.join("index.html")
    }
}

/// Builder for ServerConfig
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    port: Option<u16>,
    database_url: Option<String>,
    cors_origin: Option<String>,
    frontend_dist: Option<PathBuf>,
    rate_limit_max: Option<u32>,
    rate_limit_window: Option<Duration>,
    csrf_cookie_secure: Option<bool>,
    trust_proxy: Option<bool>,
}

impl ServerConfigBuilder {
    /// Set the listen port
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the database URL
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    /// Set the allowed CORS origin
    pub fn cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.cors_origin = Some(origin.into());
        self
    }

    /// Set the frontend bundle directory
    pub fn frontend_dist(mut self, dir: impl Into<PathBuf>) -> Self {
        self.frontend_dist = Some(dir.into());
        self
    }

    /// Set the per-window request quota
    pub fn rate_limit_max(mut self, max: u32) -> Self {
        self.rate_limit_max = Some(max);
        self
    }

    /// Set the rate-limit window length
    pub fn rate_limit_window(mut self, window: Duration) -> Self {
        self.rate_limit_window = Some(window);
        self
    }

    pub fn csrf_cookie_secure(mut self, secure: bool) -> Self {
        self.csrf_cookie_secure = Some(secure);
        self
    }

    pub fn trust_proxy(mut self, trust: bool) -> Self {
        self.trust_proxy = Some(trust);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        let defaults = ServerConfig::default();
        let config = ServerConfig {
            port: self.port.unwrap_or(defaults.port),
            database_url: self.database_url.or(defaults.database_url),
            cors_origin: self.cors_origin.unwrap_or(defaults.cors_origin),
            frontend_dist: self.frontend_dist.unwrap_or(defaults.frontend_dist),
            rate_limit_max: self.rate_limit_max.unwrap_or(defaults.rate_limit_max),
            rate_limit_window: self.rate_limit_window.unwrap_or(defaults.rate_limit_window),
            csrf_cookie_secure: self.csrf_cookie_secure.unwrap_or(defaults.csrf_cookie_secure),
            trust_proxy: self.trust_proxy.unwrap_or(defaults.trust_proxy),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    })
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name,
            value: value.to_string(),
        }),
    }
}
