//! Common test utilities and helpers
//!
//! - A throwaway frontend bundle on disk
//! - A full application with sample route groups mounted
//! - Request and response helpers

#![allow(dead_code)]

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, Request, StatusCode},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use chatapp::backend::routes::RouteGroups;
use chatapp::backend::server::create_app;
use chatapp::shared::{ServerConfig, ServerConfigBuilder};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

pub const INDEX_HTML: &str = "<!doctype html><html><body><div id=\"root\"></div></body></html>";
pub const APP_JS: &str = "console.log('chat')";
pub const FRONTEND_ORIGIN: &str = "http://localhost:3000";

/// Application under test together with its bundle directory
pub struct TestApp {
    pub router: Router,
    _dist: TempDir,
}

impl TestApp {
    /// Send `request` from 127.0.0.1
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.send_from([127, 0, 0, 1], request).await
    }

    /// Send `request` as if it arrived from `ip`
    pub async fn send_from(&self, ip: [u8; 4], mut request: Request<Body>) -> Response {
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from((ip, 40000))));
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Obtain a secret cookie and a matching token
    pub async fn csrf_session(&self) -> (String, String) {
        let response = self
            .send(Request::get("/api/csrf-token").body(Body::empty()).unwrap())
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let cookie = csrf_cookie(&response).expect("csrf cookie issued");
        let body = body_json(response).await;
        let token = body["csrfToken"].as_str().unwrap().to_string();
        (cookie, token)
    }
}

/// Write a minimal frontend bundle to a temporary directory
pub fn frontend_bundle() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), INDEX_HTML).unwrap();
    std::fs::create_dir(dir.path().join("assets")).unwrap();
    std::fs::write(dir.path().join("assets").join("app.js"), APP_JS).unwrap();
    dir
}

/// Route groups standing in for the application's real ones
pub fn sample_groups() -> RouteGroups {
    RouteGroups::new()
        .with_auth(Router::new().route("/status", get(|| async { Json(json!({ "authenticated": false })) })))
        .with_messages(Router::new().route(
            "/send",
            post(|Json(body): Json<Value>| async move { (StatusCode::CREATED, Json(body)) }),
        ))
        .with_users(
            Router::new()
                .route("/", get(|| async { Json(json!([])) }))
                .route("/{id}", axum::routing::delete(|| async { StatusCode::NO_CONTENT })),
        )
}

/// Build the application with default settings
pub async fn test_app() -> TestApp {
    test_app_with(|builder| builder).await
}

/// Build the application, adjusting the configuration first
pub async fn test_app_with(configure: impl FnOnce(ServerConfigBuilder) -> ServerConfigBuilder) -> TestApp {
    let dist = frontend_bundle();
    let builder = ServerConfig::builder()
        .cors_origin(FRONTEND_ORIGIN)
        .frontend_dist(dist.path());
    let config = configure(builder).build().unwrap();
    let router = create_app(config, sample_groups()).await.unwrap();
    TestApp { router, _dist: dist }
}

/// The `name=value` part of the `_csrf` Set-Cookie header, if any
pub fn csrf_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("_csrf="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}
