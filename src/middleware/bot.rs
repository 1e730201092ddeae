// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bot (tenant) resolution middleware.
//!
//! Every protected data route is scoped to exactly one bot. The bot comes
//! from the `X-Bot-Id` header, the `botId` query parameter, or the
//! configured default, in that order. Unknown ids are rejected before any
//! handler runs.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;

/// The bot a request is scoped to, inserted as a request extension.
#[derive(Debug, Clone)]
pub struct BotId(pub String);

#[derive(Deserialize)]
pub struct BotQuery {
    #[serde(rename = "botId")]
    bot_id: Option<String>,
}

/// Middleware that resolves and validates the request's bot.
pub async fn resolve_bot(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BotQuery>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let bot_id = request
        .headers()
        .get("x-bot-id")
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .or(query.bot_id)
        .unwrap_or_else(|| state.config.default_bot.clone());

    if state.config.bot(&bot_id).is_none() {
        return Err(AppError::UnknownBot(bot_id));
    }

    request.extensions_mut().insert(BotId(bot_id));
    Ok(next.run(request).await)
}
