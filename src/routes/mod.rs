// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod analytics;
pub mod api;
pub mod auth;

use crate::middleware::{require_auth, resolve_bot};
use crate::AppState;
use axum::extract::{Query, State};
use axum::http::{header, Method};
use axum::{middleware, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Deserialize)]
struct HealthQuery {
    #[serde(rename = "botId")]
    bot_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub bot_id: String,
    pub timestamp: String,
}

/// Liveness probe: reports whether the chosen bot's backing store answers.
async fn health_check(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HealthQuery>,
) -> Json<HealthResponse> {
    let bot_id = params
        .bot_id
        .unwrap_or_else(|| state.config.default_bot.clone());

    let db_ok = state.adapters.check(&bot_id).await;

    Json(HealthResponse {
        status: if db_ok { "ok" } else { "error" }.to_string(),
        database: if db_ok { "connected" } else { "disconnected" }.to_string(),
        bot_id,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer - allow requests from the frontend URL and localhost (for dev)
    let frontend_url = state.config.frontend_url.clone();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                origin_str == frontend_url
                    || origin_str.starts_with("http://localhost")
                    || origin_str.starts_with("http://127.0.0.1")
            },
        ))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::HeaderName::from_static("x-bot-id"),
        ]);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .merge(auth::routes());

    // Protected routes: bearer token first, then bot resolution.
    // route_layer runs bottom-up, so require_auth is added last.
    let protected_routes = api::routes()
        .merge(analytics::routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), resolve_bot))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
