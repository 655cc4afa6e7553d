//! Per-client rate limiting on the API surface

mod common;

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chatapp::backend::middleware::rate_limit::RATE_LIMIT_MESSAGE;
use common::{body_string, test_app, test_app_with};
use pretty_assertions::assert_eq;

fn health() -> Request<Body> {
    Request::get("/api/health").body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_default_quota_is_one_hundred() {
    let app = test_app().await;

    for i in 0..100 {
        let response = app.send(health()).await;
        assert_eq!(response.status(), StatusCode::OK, "request {}", i + 1);
    }

    let response = app.send(health()).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key(header::RETRY_AFTER));
    assert_eq!(response.headers()["x-ratelimit-limit"], "100");
    assert_eq!(response.headers()["x-ratelimit-remaining"], "0");

    assert_eq!(body_string(response).await, RATE_LIMIT_MESSAGE);
}

#[tokio::test]
async fn test_remaining_header_counts_down() {
    let app = test_app_with(|b| b.rate_limit_max(3)).await;

    for remaining in ["2", "1", "0"] {
        let response = app.send(health()).await;
        assert_eq!(response.headers()["x-ratelimit-remaining"], remaining);
    }
}

#[tokio::test]
async fn test_clients_limited_independently() {
    let app = test_app_with(|b| b.rate_limit_max(2)).await;

    for _ in 0..2 {
        assert_eq!(app.send_from([10, 0, 0, 1], health()).await.status(), StatusCode::OK);
    }
    assert_eq!(
        app.send_from([10, 0, 0, 1], health()).await.status(),
        StatusCode::TOO_MANY_REQUESTS
    );
    assert_eq!(app.send_from([10, 0, 0, 2], health()).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_frontend_not_counted() {
    let app = test_app_with(|b| b.rate_limit_max(2)).await;

    for _ in 0..5 {
        let response = app.send(Request::get("/").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("x-ratelimit-limit").is_none());
    }
    assert_eq!(app.send(health()).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_route_groups_share_quota() {
    let app = test_app_with(|b| b.rate_limit_max(2)).await;

    let users = app.send(Request::get("/api/users").body(Body::empty()).unwrap()).await;
    assert_eq!(users.status(), StatusCode::OK);
    let auth = app.send(Request::get("/api/auth/status").body(Body::empty()).unwrap()).await;
    assert_eq!(auth.status(), StatusCode::OK);

    assert_eq!(app.send(health()).await.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test(start_paused = true)]
async fn test_quota_restored_after_window() {
    let app = test_app_with(|b| b.rate_limit_max(1).rate_limit_window(Duration::from_secs(900))).await;

    assert_eq!(app.send(health()).await.status(), StatusCode::OK);
    assert_eq!(app.send(health()).await.status(), StatusCode::TOO_MANY_REQUESTS);

    tokio::time::advance(Duration::from_secs(900)).await;
    assert_eq!(app.send(health()).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_forwarded_for_used_behind_proxy() {
    let app = test_app_with(|b| b.rate_limit_max(1).trust_proxy(true)).await;

    let from = |ip: &str| {
        Request::get("/api/health")
            .header("x-forwarded-for", ip)
            .body(Body::empty())
            .unwrap()
    };

    assert_eq!(app.send(from("198.51.100.1")).await.status(), StatusCode::OK);
    assert_eq!(
        app.send(from("198.51.100.1")).await.status(),
        StatusCode::TOO_MANY_REQUESTS
    );
    assert_eq!(app.send(from("198.51.100.2")).await.status(), StatusCode::OK);
}
