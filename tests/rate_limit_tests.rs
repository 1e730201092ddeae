// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login rate-limit tests.
//!
//! The window itself (reset after expiry) is covered by unit tests in
//! `ratelimit.rs` with a short window; here we drive the real endpoint
//! with the production limits: 10 attempts, then 429.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

fn login_request(forwarded_for: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/auth")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", forwarded_for)
        .body(Body::from(r#"{"password":"wrong"}"#))
        .unwrap()
}

#[tokio::test]
async fn test_eleventh_attempt_is_throttled() {
    let (app, _) = common::create_test_app();

    // Ten wrong passwords: rejected, but not throttled.
    for attempt in 1..=10 {
        let response = app
            .clone()
            .oneshot(login_request("203.0.113.5"))
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "attempt {attempt} should be 401"
        );
    }

    // The eleventh within the window is throttled with a backoff hint.
    let response = app
        .clone()
        .oneshot(login_request("203.0.113.5"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let retry_after: u64 = response
        .headers()
        .get(header::RETRY_AFTER)
        .expect("429 must carry Retry-After")
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(retry_after > 0 && retry_after <= 15 * 60);
}

#[tokio::test]
async fn test_throttling_is_per_caller() {
    let (app, _) = common::create_test_app();

    for _ in 0..11 {
        app.clone()
            .oneshot(login_request("203.0.113.7"))
            .await
            .unwrap();
    }

    // A different caller still gets the plain 401.
    let response = app
        .oneshot(login_request("203.0.113.8"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_correct_password_counts_against_the_window() {
    let (app, _) = common::create_test_app();

    let good_login = || {
        Request::builder()
            .method("POST")
            .uri("/api/auth")
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", "203.0.113.9")
            .body(Body::from(r#"{"password":"test-password"}"#))
            .unwrap()
    };

    for _ in 0..10 {
        let response = app.clone().oneshot(good_login()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // The limiter runs before password verification, so even a correct
    // password is throttled once the window is spent.
    let response = app.oneshot(good_login()).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}
