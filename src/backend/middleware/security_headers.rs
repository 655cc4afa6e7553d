/**
 * Security Headers Middleware
 *
 * Sets the hardening headers on every response, whether it came from a
 * route group, the static bundle, or an error path.
 *
 * The set is the usual helmet baseline with these overrides:
 * - `X-Frame-Options: DENY` (clickjacking)
 * - `Referrer-Policy: no-referrer`
 * - `X-DNS-Prefetch-Control: off`
 * - HSTS for one year with subdomains and preload
 * - `Expect-CT: max-age=86400, enforce`
 *
 * `X-Powered-By` is always stripped.
 */

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

/// Content security policy sent with every response
pub const CONTENT_SECURITY_POLICY: &str = "default-src 'self';\
base-uri 'self';\
font-src 'self' https: data:;\
form-action 'self';\
frame-ancestors 'self';\
img-src 'self' data:;\
object-src 'none';\
script-src 'self';\
script-src-attr 'none';\
style-src 'self' https: 'unsafe-inline';\
upgrade-insecure-requests";

/// 1 year
pub const HSTS_MAX_AGE_SECS: u64 = 31_536_000;

const X_POWERED_BY: &str = "x-powered-by";

/// Header name/value pairs applied to every response
pub const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("content-security-policy", CONTENT_SECURITY_POLICY),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "same-origin"),
    ("origin-agent-cluster", "?1"),
    ("referrer-policy", "no-referrer"),
    ("strict-transport-security", "max-age=31536000; includeSubDomains; preload"),
    ("x-content-type-options", "nosniff"),
    ("x-dns-prefetch-control", "off"),
    ("x-download-options", "noopen"),
    ("x-frame-options", "DENY"),
    ("x-permitted-cross-domain-policies", "none"),
    ("x-xss-protection", "0"),
    ("expect-ct", "max-age=86400, enforce"),
];

/// Security headers middleware
///
/// Runs the rest of the stack, then overwrites the security headers on the
/// response so that inner handlers cannot weaken them.
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    for &(name, value) in SECURITY_HEADERS {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    headers.remove(X_POWERED_BY);

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::{header, StatusCode}, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route(
                "/",
                get(|| async {
                    (
                        [("x-powered-by", "Express"), ("x-frame-options", "ALLOWALL")],
                        "ok",
                    )
                }),
            )
            .layer(middleware::from_fn(security_headers))
    }

    #[tokio::test]
    async fn test_sets_all_headers() {
        let response = app()
            .oneshot(axum::http::Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        for &(name, value) in SECURITY_HEADERS {
            assert_eq!(response.headers()[name], value, "{name}");
        }
    }

    #[tokio::test]
    async fn test_overrides_handler_headers() {
        let response = app()
            .oneshot(axum::http::Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.headers().get("x-powered-by").is_none());
        assert_eq!(response.headers()[header::X_FRAME_OPTIONS], "DENY");
        assert_eq!(response.headers().get_all(header::X_FRAME_OPTIONS).iter().count(), 1);
    }

    #[test]
    fn test_hsts_matches_max_age() {
        let (_, hsts) = SECURITY_HEADERS
            .iter()
            .find(|(name, _)| *name == header::STRICT_TRANSPORT_SECURITY.as_str())
            .unwrap();
        assert!(hsts.starts_with(&format!("max-age={}", HSTS_MAX_AGE_SECS)));
        assert!(hsts.contains("preload"));
    }

    #[test]
    fn test_csp_is_strict() {
        assert!(CONTENT_SECURITY_POLICY.starts_with("default-src 'self';"));
        assert!(CONTENT_SECURITY_POLICY.contains("object-src 'none'"));
        assert!(CONTENT_SECURITY_POLICY.contains("script-src 'self';"));
        assert!(CONTENT_SECURITY_POLICY.ends_with("upgrade-insecure-requests"));
    }
}
