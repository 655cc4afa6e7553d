/**
 * Rate Limiting Middleware
 *
 * Limits each client to a fixed number of requests per window on the
 * `/api` surface. Static assets and the SPA fallback are not counted.
 *
 * # Windows
 *
 * A client's window opens on its first counted request and lasts for the
 * configured duration. Every request inside the window increments the
 * counter; once it exceeds the quota, requests are rejected with
 * `429 Too Many Requests` until the window closes.
 *
 * # Client Identity
 *
 * Clients are keyed by peer IP (`ConnectInfo<SocketAddr>`). Behind a reverse
 * proxy, `trust_proxy` switches to the first `X-Forwarded-For` entry.
 *
 * # Headers
 *
 * Counted responses carry `X-RateLimit-Limit`, `X-RateLimit-Remaining` and
 * `X-RateLimit-Reset` (unix seconds). Rejections also carry `Retry-After`.
 */

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::time::Instant;

use crate::backend::error::BackendError;
use crate::shared::ServerConfig;

pub const RATE_LIMIT_MESSAGE: &str = "Too many requests from this IP, please try again later.";

const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
const X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

/// Key used when the client address cannot be determined
const UNKNOWN_CLIENT: &str = "unknown";

/// Counter for one client's current window
#[derive(Debug, Clone, Copy)]
struct RateWindow {
    hits: u32,
    started: Instant,
}

/// Outcome of counting one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateStatus {
    /// Whether the request is within quota
    pub allowed: bool,
    /// Configured quota
    pub limit: u32,
    /// Requests left in the current window
    pub remaining: u32,
    /// Time until the current window closes
    pub reset_after: Duration,
}

impl RateStatus {
    /// Seconds until reset, rounded up
    pub fn reset_after_secs(&self) -> u64 {
        u64::try_from(self.reset_after.as_millis().div_ceil(1000)).unwrap_or(u64::MAX)
    }

    /// Unix time at which the window closes, clamped on overflow
    pub fn reset_at(&self) -> i64 {
        let reset_after = i64::try_from(self.reset_after_secs()).unwrap_or(i64::MAX);
        chrono::Utc::now().timestamp().saturating_add(reset_after)
    }

    fn apply_headers(&self, headers: &mut HeaderMap) {
        let reset_at = self.reset_at();
        headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(self.limit));
        headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(self.remaining));
        headers.insert(X_RATELIMIT_RESET, HeaderValue::from(reset_at));
    }
}

/// Per-client fixed-window rate limiter
///
/// Cheap to clone; all clones share the same counters.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    windows: Arc<Mutex<HashMap<String, RateWindow>>>,
    max: u32,
    window: Duration,
    trust_proxy: bool,
}

impl RateLimiter {
    pub fn new(max: u32, window: Duration) -> Self {
        Self {
            windows: Arc::new(Mutex::new(HashMap::new())),
            max,
            window,
            trust_proxy: false,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.rate_limit_max, config.rate_limit_window)
            .with_trust_proxy(config.trust_proxy)
    }

    pub fn with_trust_proxy(mut self, trust_proxy: bool) -> Self {
        self.trust_proxy = trust_proxy;
        self
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, RateWindow>> {
        self.windows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count one request for `key` and report whether it is allowed
    pub fn check(&self, key: &str) -> RateStatus {
        let now = Instant::now();
        let mut windows = self.lock();

        let entry = windows
            .entry(key.to_string())
            .or_insert(RateWindow { hits: 0, started: now });

        if now.duration_since(entry.started) >= self.window {
            *entry = RateWindow { hits: 0, started: now };
        }

        entry.hits = entry.hits.saturating_add(1);

        RateStatus {
            allowed: entry.hits <= self.max,
            limit: self.max,
            remaining: self.max.saturating_sub(entry.hits),
            reset_after: self.window.saturating_sub(now.duration_since(entry.started)),
        }
    }

    /// Drop windows that have already closed
    ///
    /// Returns the number of clients removed.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut windows = self.lock();
        let before = windows.len();
        windows.retain(|_, w| now.duration_since(w.started) < self.window);
        before - windows.len()
    }

    /// Number of clients with an open window
    pub fn tracked_clients(&self) -> usize {
        self.lock().len()
    }

    /// Identify the client that sent `request`
    pub fn client_key(&self, request: &Request) -> String {
        if self.trust_proxy {
            let forwarded = request
                .headers()
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.split(',').next())
                .map(str::trim)
                .filter(|ip| !ip.is_empty());
            if let Some(ip) = forwarded {
                return ip.to_string();
            }
        }

        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
    }
}

/// Whether `path` belongs to the rate-limited API surface
pub fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

/// Rate limiting middleware
///
/// Counts requests under `/api` and rejects clients over their quota with
/// `429 Too Many Requests`.
pub async fn rate_limit(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    if !is_api_path(request.uri().path()) {
        return next.run(request).await;
    }

    let client = limiter.client_key(&request);
    let status = limiter.check(&client);

    if !status.allowed {
        tracing::warn!(client = %client, path = %request.uri().path(), "Rate limit exceeded");
        let mut response =
            BackendError::rate_limited(RATE_LIMIT_MESSAGE, status.reset_after_secs()).into_response();
        status.apply_headers(response.headers_mut());
        return response;
    }

    let mut response = next.run(request).await;
    status.apply_headers(response.headers_mut());
    response
}
