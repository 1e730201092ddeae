// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data routes: bots, users, payments, chat logs.
//!
//! All routes here run behind `require_auth` and `resolve_bot` (applied in
//! routes/mod.rs) and reach the data through the bot's adapter only.

use crate::adapters::{PaymentFilters, SortOrder, UserFilters};
use crate::error::{AppError, Result};
use crate::middleware::BotId;
use crate::models::{ChatLogEntry, MoodPoint, Payment, Question, TherapyProfile, User};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;
const DEFAULT_CHAT_LIMIT: i64 = 100;
const DEFAULT_MOOD_DAYS: i64 = 7;
const MAX_MOOD_DAYS: i64 = 365;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/bots", get(list_bots))
        .route("/api/users", get(list_users))
        .route("/api/user/{id}", get(get_user_bundle))
        .route("/api/user/{id}/info", get(get_user_info))
        .route("/api/user/{id}/chat", get(get_user_chat))
        .route("/api/user/{id}/mood/{question_id}", get(get_user_mood))
        .route("/api/user/{id}/ban", post(toggle_ban))
        .route("/api/user/{id}/pro", post(toggle_pro))
        .route("/api/payments", get(list_payments))
}

/// Parse a path/query id, naming the field on failure.
fn parse_id(raw: &str, field: &str) -> Result<i64> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid {field}")))
}

/// Parse an optional `YYYY-MM-DD` value, naming the field on failure.
fn parse_date(raw: Option<&str>, field: &str) -> Result<Option<NaiveDate>> {
    raw.filter(|s| !s.is_empty())
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                AppError::BadRequest(format!("Invalid {field}: expected YYYY-MM-DD"))
            })
        })
        .transpose()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

// ─── Bots ────────────────────────────────────────────────────

/// Public slice of a bot config: no connection parameters.
#[derive(Serialize)]
pub struct BotSummary {
    pub id: String,
    pub name: String,
    pub color: String,
}

/// List configured bots for the dashboard switcher.
async fn list_bots(State(state): State<Arc<AppState>>) -> Json<Vec<BotSummary>> {
    let bots = state
        .config
        .bots
        .iter()
        .map(|b| BotSummary {
            id: b.id.clone(),
            name: b.name.clone(),
            color: b.color.clone(),
        })
        .collect();

    Json(bots)
}

// ─── User List ───────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsersQuery {
    limit: Option<i64>,
    offset: Option<i64>,
    sort_by: Option<String>,
    sort_order: Option<String>,
    search: Option<String>,
    subscribe: Option<String>,
    status: Option<String>,
    date_from: Option<String>,
    date_to: Option<String>,
}

#[derive(Serialize)]
struct UsersResponse {
    users: Vec<User>,
    total: i64,
    limit: i64,
    offset: i64,
}

/// Paginated, filterable, sortable user list.
async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(bot): Extension<BotId>,
    Query(params): Query<UsersQuery>,
) -> Result<Json<UsersResponse>> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = params.offset.unwrap_or(0).max(0);

    let filters = UserFilters {
        search: non_empty(params.search),
        subscribe: non_empty(params.subscribe),
        status: non_empty(params.status),
        date_from: parse_date(params.date_from.as_deref(), "dateFrom")?,
        date_to: parse_date(params.date_to.as_deref(), "dateTo")?,
    };

    let sort_by = params.sort_by.unwrap_or_default();
    let sort_order = SortOrder::parse(params.sort_order.as_deref().unwrap_or(""));

    tracing::debug!(
        bot_id = %bot.0,
        search = ?filters.search,
        sort_by = %sort_by,
        limit,
        offset,
        "Fetching users list"
    );

    let adapter = state.adapters.get(&bot.0)?;
    let page = adapter
        .get_users_list(&filters, &sort_by, sort_order, limit, offset)
        .await?;

    Ok(Json(UsersResponse {
        users: page.users,
        total: page.total,
        limit,
        offset,
    }))
}

// ─── User Detail ─────────────────────────────────────────────

/// Everything the user detail view needs, loaded in one round trip.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserBundle {
    user_info: User,
    user_questions: Vec<Question>,
    therapy_profile: Option<TherapyProfile>,
    payments: Vec<Payment>,
    chat_logs: Vec<ChatLogEntry>,
}

/// Full user bundle. The five reads are independent, so they run
/// concurrently; if any of them fails the whole request fails.
async fn get_user_bundle(
    State(state): State<Arc<AppState>>,
    Extension(bot): Extension<BotId>,
    Path(id): Path<String>,
) -> Result<Json<UserBundle>> {
    let user_id = parse_id(&id, "telegram_user_id")?;
    let adapter = state.adapters.get(&bot.0)?;

    let (user_info, user_questions, therapy_profile, payments, chat_logs) = tokio::try_join!(
        adapter.get_user_info(user_id),
        adapter.get_user_questions(user_id),
        adapter.get_therapy_profile(user_id),
        adapter.get_payments(user_id),
        adapter.get_chat_logs(user_id, None),
    )?;

    let Some(user_info) = user_info else {
        return Err(AppError::NotFound("User not found".to_string()));
    };

    Ok(Json(UserBundle {
        user_info,
        user_questions,
        therapy_profile,
        payments,
        chat_logs,
    }))
}

/// User record only.
async fn get_user_info(
    State(state): State<Arc<AppState>>,
    Extension(bot): Extension<BotId>,
    Path(id): Path<String>,
) -> Result<Json<User>> {
    let user_id = parse_id(&id, "telegram_user_id")?;
    let adapter = state.adapters.get(&bot.0)?;

    let user = adapter
        .get_user_info(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

// ─── Chat ────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ChatQuery {
    limit: Option<i64>,
}

/// Chat history, newest first.
async fn get_user_chat(
    State(state): State<Arc<AppState>>,
    Extension(bot): Extension<BotId>,
    Path(id): Path<String>,
    Query(params): Query<ChatQuery>,
) -> Result<Json<Vec<ChatLogEntry>>> {
    let user_id = parse_id(&id, "telegram_user_id")?;
    let limit = params.limit.unwrap_or(DEFAULT_CHAT_LIMIT).max(1);

    let adapter = state.adapters.get(&bot.0)?;
    let logs = adapter.get_chat_logs(user_id, Some(limit)).await?;

    Ok(Json(logs))
}

// ─── Mood ────────────────────────────────────────────────────

#[derive(Deserialize)]
struct MoodQuery {
    days: Option<i64>,
}

/// Mood readings for one tracked question.
async fn get_user_mood(
    State(state): State<Arc<AppState>>,
    Extension(bot): Extension<BotId>,
    Path((id, question_id)): Path<(String, String)>,
    Query(params): Query<MoodQuery>,
) -> Result<Json<Vec<MoodPoint>>> {
    let user_id = parse_id(&id, "telegram_user_id")?;
    let question_id = parse_id(&question_id, "question_id")?;
    let days = params.days.unwrap_or(DEFAULT_MOOD_DAYS).clamp(1, MAX_MOOD_DAYS);

    let adapter = state.adapters.get(&bot.0)?;
    let points = adapter.get_user_mood_logs(user_id, question_id, days).await?;

    Ok(Json(points))
}

// ─── Moderation ──────────────────────────────────────────────

#[derive(Deserialize)]
struct ActionRequest {
    action: Option<String>,
}

#[derive(Serialize)]
struct StatusResponse {
    success: bool,
    status: String,
}

/// Ban or unban a user.
async fn toggle_ban(
    State(state): State<Arc<AppState>>,
    Extension(bot): Extension<BotId>,
    Path(id): Path<String>,
    Json(body): Json<ActionRequest>,
) -> Result<Json<StatusResponse>> {
    let user_id = parse_id(&id, "telegram_user_id")?;

    let new_status = match body.action.as_deref() {
        Some("ban") => "ban",
        Some("unban") => "active",
        _ => {
            return Err(AppError::BadRequest(
                "Invalid action. Must be \"ban\" or \"unban\"".to_string(),
            ))
        }
    };

    let adapter = state.adapters.get(&bot.0)?;
    let updated = adapter.update_user_status(user_id, new_status).await?;

    if updated.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    tracing::info!(bot_id = %bot.0, user_id, status = new_status, "User status changed");

    Ok(Json(StatusResponse {
        success: true,
        status: new_status.to_string(),
    }))
}

#[derive(Serialize)]
struct SubscribeResponse {
    success: bool,
    subscribe: String,
}

/// Enable or disable the PRO subscription.
async fn toggle_pro(
    State(state): State<Arc<AppState>>,
    Extension(bot): Extension<BotId>,
    Path(id): Path<String>,
    Json(body): Json<ActionRequest>,
) -> Result<Json<SubscribeResponse>> {
    let user_id = parse_id(&id, "telegram_user_id")?;

    let new_subscribe = match body.action.as_deref() {
        Some("enable") => "pro",
        Some("disable") => "free",
        _ => {
            return Err(AppError::BadRequest(
                "Invalid action. Must be \"enable\" or \"disable\"".to_string(),
            ))
        }
    };

    let adapter = state.adapters.get(&bot.0)?;
    let updated = adapter.update_user_subscribe(user_id, new_subscribe).await?;

    if updated.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    tracing::info!(bot_id = %bot.0, user_id, subscribe = new_subscribe, "User subscription changed");

    Ok(Json(SubscribeResponse {
        success: true,
        subscribe: new_subscribe.to_string(),
    }))
}

// ─── Payments Registry ───────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentsQuery {
    limit: Option<i64>,
    offset: Option<i64>,
    user_id: Option<String>,
    date_from: Option<String>,
    date_to: Option<String>,
}

#[derive(Serialize)]
struct PaymentsResponse {
    payments: Vec<Payment>,
    total: i64,
    limit: i64,
    offset: i64,
}

/// Cross-user payments registry, newest first.
async fn list_payments(
    State(state): State<Arc<AppState>>,
    Extension(bot): Extension<BotId>,
    Query(params): Query<PaymentsQuery>,
) -> Result<Json<PaymentsResponse>> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = params.offset.unwrap_or(0).max(0);

    let filters = PaymentFilters {
        user_id: params
            .user_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|raw| parse_id(raw, "userId"))
            .transpose()?,
        date_from: parse_date(params.date_from.as_deref(), "dateFrom")?,
        date_to: parse_date(params.date_to.as_deref(), "dateTo")?,
    };

    let adapter = state.adapters.get(&bot.0)?;
    let (payments, total) = tokio::try_join!(
        adapter.get_all_payments(&filters, limit, offset),
        adapter.get_payments_count(&filters),
    )?;

    Ok(Json(PaymentsResponse {
        payments,
        total,
        limit,
        offset,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_rejects_non_numeric() {
        assert!(parse_id("12345", "telegram_user_id").is_ok());
        let err = parse_id("abc", "telegram_user_id").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("telegram_user_id")));
    }

    #[test]
    fn test_parse_date_names_the_field() {
        assert_eq!(
            parse_date(Some("2026-08-07"), "dateFrom").unwrap(),
            Some(NaiveDate::from_ymd_opt(2026, 8, 7).unwrap())
        );
        assert_eq!(parse_date(None, "dateFrom").unwrap(), None);
        assert_eq!(parse_date(Some(""), "dateFrom").unwrap(), None);

        let err = parse_date(Some("07.08.2026"), "dateTo").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("dateTo")));
    }
}
