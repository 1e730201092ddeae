// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API input validation tests. All of these must fail before any
//! backing-store access happens: the test stores are unreachable, so a
//! 400 here proves validation ran first.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_non_numeric_user_id() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(&state);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/user/not-a-number")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("telegram_user_id"));
}

#[tokio::test]
async fn test_invalid_ban_action() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(&state);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/user/123/ban")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"action":"freeze"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_pro_action() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(&state);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/user/123/pro")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_date_filter() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(&state);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/users?dateFrom=08%2F07%2F2026")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("dateFrom"));
}

#[tokio::test]
async fn test_unknown_bot_header() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(&state);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/users")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header("x-bot-id", "mystery")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "Invalid bot ID");
}

#[tokio::test]
async fn test_unknown_bot_query_param() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(&state);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/users?botId=mystery")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_header_overrides_query_bot() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(&state);

    // Header wins over query parameter, so the unknown header id fails
    // even though the query names a real bot.
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/users?botId=alex")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header("x-bot-id", "mystery")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_analytics_date() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(&state);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/analytics/revenue/date/2026-13-40")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_payments_user_filter() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(&state);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/payments?userId=abc")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("userId"));
}
