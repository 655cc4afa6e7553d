/**
 * CSRF Protection Middleware
 *
 * Cookie-based double-submit protection for state-changing requests.
 *
 * # Secret
 *
 * Each browser holds a random secret in the `_csrf` cookie. When a request
 * arrives without a usable secret, a new one is generated and set on the
 * response.
 *
 * # Tokens
 *
 * A token is `salt-hash` where `hash` is the base64url SHA-256 digest of
 * `salt-secret`. Any number of tokens can be minted for one secret; the
 * client obtains one from `GET /api/csrf-token` (or any handler using the
 * [`CsrfToken`] extractor) and echoes it back on unsafe requests.
 *
 * # Verification
 *
 * `GET`, `HEAD` and `OPTIONS` pass through. Every other method must present
 * a token matching the cookie secret, read from (first found):
 * 1. a top-level `_csrf` string in a JSON body
 * 2. the `_csrf` query parameter
 * 3. the `csrf-token`, `xsrf-token`, `x-csrf-token` or `x-xsrf-token` header
 *
 * Failures are answered with `403 Forbidden`.
 */

use axum::{
    body::Body,
    extract::{FromRequestParts, Query, Request, State},
    http::{header, request::Parts, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{distributions::Alphanumeric, Rng, RngCore};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::backend::error::BackendError;
use crate::shared::config::{ServerConfig, JSON_BODY_LIMIT};

/// Name of the cookie holding the secret
pub const CSRF_COOKIE: &str = "_csrf";

/// Headers checked for a token, in order
pub const TOKEN_HEADERS: [&str; 4] = ["csrf-token", "xsrf-token", "x-csrf-token", "x-xsrf-token"];

const SECRET_BYTES: usize = 18;
const SALT_LEN: usize = 8;

/// Settings for the CSRF cookie
#[derive(Clone, Debug, Default)]
pub struct CsrfConfig {
    /// Mark the secret cookie `Secure` (HTTPS only)
    pub cookie_secure: bool,
}

impl CsrfConfig {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            cookie_secure: config.csrf_cookie_secure,
        }
    }

    fn cookie(&self, secret: &CsrfSecret) -> Cookie<'static> {
        Cookie::build((CSRF_COOKIE, secret.as_str().to_owned()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.cookie_secure)
            .build()
    }
}

/// Per-client CSRF secret
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsrfSecret(String);

impl CsrfSecret {
    /// Generate a fresh random secret
    pub fn generate() -> Self {
        let mut bytes = [0u8; SECRET_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Accept a cookie value if it has the shape of a generated secret
    pub fn parse(value: &str) -> Option<Self> {
        let decoded = URL_SAFE_NO_PAD.decode(value).ok()?;
        (decoded.len() == SECRET_BYTES).then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Mint a new token bound to this secret
    pub fn create_token(&self) -> String {
        let salt: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SALT_LEN)
            .map(char::from)
            .collect();
        let hash = token_hash(&salt, &self.0);
        format!("{salt}-{hash}")
    }

    /// Check that `token` was minted from this secret
    pub fn verify(&self, token: &str) -> bool {
        let Some((salt, hash)) = token.split_once('-') else {
            return false;
        };
        if salt.is_empty() {
            return false;
        }
        constant_time_eq(hash.as_bytes(), token_hash(salt, &self.0).as_bytes())
    }
}

fn token_hash(salt: &str, secret: &str) -> String {
    let digest = Sha256::digest(format!("{salt}-{secret}").as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Methods that never change state and are not verified
pub fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

#[derive(Debug, Default, Deserialize)]
struct CsrfField {
    #[serde(rename = "_csrf")]
    csrf: Option<String>,
}

fn is_json(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| {
            let mime = v.split(';').next().unwrap_or_default().trim();
            mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

/// Find the token presented with `request`
///
/// A JSON body is buffered to look for `_csrf` and put back on the request,
/// so handlers still see it. A token in the body wins over the query string,
/// which wins over the headers.
async fn extract_token(request: Request) -> Result<(Option<String>, Request), BackendError> {
    let (from_body, request) = if is_json(&request) {
        let (parts, body) = request.into_parts();
        let bytes = axum::body::to_bytes(body, JSON_BODY_LIMIT)
            .await
            .map_err(|_| BackendError::handler(StatusCode::PAYLOAD_TOO_LARGE, "request entity too large"))?;
        let from_body = serde_json::from_slice::<CsrfField>(&bytes)
            .ok()
            .and_then(|field| field.csrf);
        (from_body, Request::from_parts(parts, Body::from(bytes)))
    } else {
        (None, request)
    };
    if from_body.is_some() {
        return Ok((from_body, request));
    }

    let from_query = Query::<CsrfField>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(field)| field.csrf);
    if from_query.is_some() {
        return Ok((from_query, request));
    }

    let from_header = TOKEN_HEADERS.iter().find_map(|name| {
        request
            .headers()
            .get(*name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    });

    Ok((from_header, request))
}

/// CSRF protection middleware
///
/// Ensures the client has a secret cookie, verifies tokens on unsafe
/// methods, and exposes the secret to handlers through request extensions.
pub async fn csrf_protection(
    State(config): State<CsrfConfig>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let existing = jar.get(CSRF_COOKIE).and_then(|c| CsrfSecret::parse(c.value()));
    let issued = existing.is_none();
    let secret = existing.unwrap_or_else(CsrfSecret::generate);

    let mut request = request;
    if !is_safe_method(request.method()) {
        let method = request.method().clone();
        let path = request.uri().path().to_string();

        let (token, checked) = match extract_token(request).await {
            Ok(found) => found,
            Err(e) => return with_secret_cookie(e.into_response(), jar, &config, &secret, issued),
        };

        let valid = token.as_deref().map(|t| secret.verify(t)).unwrap_or(false);
        if !valid {
            tracing::warn!(%method, %path, token_present = token.is_some(), "CSRF verification failed");
            let response = BackendError::csrf("invalid csrf token").into_response();
            return with_secret_cookie(response, jar, &config, &secret, issued);
        }
        request = checked;
    }

    request.extensions_mut().insert(secret.clone());
    let response = next.run(request).await;
    with_secret_cookie(response, jar, &config, &secret, issued)
}

fn with_secret_cookie(
    response: Response,
    jar: CookieJar,
    config: &CsrfConfig,
    secret: &CsrfSecret,
    issued: bool,
) -> Response {
    if !issued {
        return response;
    }
    (jar.add(config.cookie(secret)), response).into_response()
}

/// Extractor yielding a fresh token for the caller's secret
///
/// Requires [`csrf_protection`] to run before the handler.
#[derive(Clone, Debug)]
pub struct CsrfToken(pub String);

impl<S> FromRequestParts<S> for CsrfToken
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let secret = parts.extensions.get::<CsrfSecret>().ok_or_else(|| {
            tracing::error!("CsrfSecret not found in request extensions");
            BackendError::handler(StatusCode::INTERNAL_SERVER_ERROR, "CSRF protection not configured")
        })?;
        Ok(CsrfToken(secret.create_token()))
    }
}
