// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login route: exchange the operator shared secret for a session token.

use crate::error::{AppError, Result};
use crate::middleware::auth::create_jwt;
use crate::ratelimit::caller_key;
use crate::AppState;
use axum::{extract::State, http::HeaderMap, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/auth", post(login))
}

#[derive(Deserialize)]
struct LoginRequest {
    password: String,
}

#[derive(Serialize)]
struct LoginResponse {
    success: bool,
    token: String,
}

/// Verify the shared secret and issue a JWT.
///
/// Rate-limited per caller: the limiter is consulted before the password
/// is even looked at, so hammering the endpoint with the right password
/// still trips the 429.
async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let caller = caller_key(&headers);

    if let Err(retry_after_secs) = state.login_limiter.try_acquire(&caller) {
        tracing::warn!(caller = %caller, "Login rate limit exceeded");
        return Err(AppError::TooManyAttempts { retry_after_secs });
    }

    let valid = bcrypt::verify(&body.password, &state.config.password_hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("bcrypt verify failed: {e}")))?;

    if !valid {
        tracing::warn!(caller = %caller, "Failed login attempt");
        return Err(AppError::Unauthorized);
    }

    let token = create_jwt(&state.config.jwt_secret)?;
    tracing::info!(caller = %caller, "Successful login");

    Ok(Json(LoginResponse {
        success: true,
        token,
    }))
}
