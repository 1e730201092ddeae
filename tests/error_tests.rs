// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error-mapping and health-endpoint tests against unreachable stores.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_backing_store_failure_maps_to_500() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(&state);

    // Validation passes; the Postgres pool then fails to connect.
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/user/123")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // The client sees a generic message, never driver details.
    let body = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "Internal server error");
}

#[tokio::test]
async fn test_supabase_failure_maps_to_500() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(&state);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/user/123")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header("x-bot-id", "strava")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "Internal server error");
}

#[tokio::test]
async fn test_health_reports_disconnected_store() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Health itself always answers.
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "error");
    assert_eq!(json["database"], "disconnected");
    assert_eq!(json["botId"], "alex");
}

#[tokio::test]
async fn test_health_accepts_bot_query() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health?botId=strava")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["botId"], "strava");
    assert_eq!(json["database"], "disconnected");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/definitely-not-a-route")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
