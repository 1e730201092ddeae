// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Analytics routes: dashboard snapshot and revenue drill-downs.

use crate::error::{AppError, Result};
use crate::middleware::BotId;
use crate::models::analytics::{
    AnalyticsSnapshot, DailyRevenue, PaymentDistributionBucket, WeekRange, WeeklyRevenue,
};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const DEFAULT_WEEK_COUNT: i64 = 5;
const MAX_WEEK_COUNT: i64 = 52;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/analytics/dashboard", get(dashboard))
        .route("/api/analytics/revenue/date/{date}", get(revenue_for_date))
        .route(
            "/api/analytics/revenue/week/{week_start}",
            get(revenue_for_week),
        )
        .route("/api/analytics/weeks/recent", get(recent_weeks))
}

/// Parse a `YYYY-MM-DD` path segment.
fn parse_date_param(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest("Invalid date format. Expected YYYY-MM-DD".to_string()))
}

#[derive(Serialize)]
struct DashboardResponse {
    #[serde(flatten)]
    snapshot: AnalyticsSnapshot,
    #[serde(rename = "paymentDistribution")]
    payment_distribution: Vec<PaymentDistributionBucket>,
}

/// Full analytics snapshot for the dashboard landing view.
async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(bot): Extension<BotId>,
) -> Result<Json<DashboardResponse>> {
    let adapter = state.adapters.get(&bot.0)?;

    let (snapshot, payment_distribution) = tokio::try_join!(
        adapter.get_dashboard_analytics(),
        adapter.get_payment_distribution(),
    )?;

    tracing::debug!(
        bot_id = %bot.0,
        total_users = snapshot.summary.total_users,
        dau_points = snapshot.dau.len(),
        "Dashboard analytics computed"
    );

    Ok(Json(DashboardResponse {
        snapshot,
        payment_distribution,
    }))
}

/// Revenue for a single day.
async fn revenue_for_date(
    State(state): State<Arc<AppState>>,
    Extension(bot): Extension<BotId>,
    Path(date): Path<String>,
) -> Result<Json<DailyRevenue>> {
    let date = parse_date_param(&date)?;

    let adapter = state.adapters.get(&bot.0)?;
    let revenue = adapter.get_revenue_for_date(date).await?;

    Ok(Json(revenue))
}

/// Revenue for the week starting at the given date.
async fn revenue_for_week(
    State(state): State<Arc<AppState>>,
    Extension(bot): Extension<BotId>,
    Path(week_start): Path<String>,
) -> Result<Json<WeeklyRevenue>> {
    let week_start = parse_date_param(&week_start)?;

    let adapter = state.adapters.get(&bot.0)?;
    let revenue = adapter.get_revenue_for_week(week_start).await?;

    Ok(Json(revenue))
}

#[derive(Deserialize)]
struct RecentWeeksQuery {
    count: Option<i64>,
}

/// The last N week windows, most recent first.
async fn recent_weeks(
    State(state): State<Arc<AppState>>,
    Extension(bot): Extension<BotId>,
    Query(params): Query<RecentWeeksQuery>,
) -> Result<Json<Vec<WeekRange>>> {
    let count = params
        .count
        .unwrap_or(DEFAULT_WEEK_COUNT)
        .clamp(1, MAX_WEEK_COUNT);

    let adapter = state.adapters.get(&bot.0)?;
    let weeks = adapter.get_recent_weeks(count).await?;

    Ok(Json(weeks))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_param_validation() {
        assert!(parse_date_param("2026-08-07").is_ok());
        assert!(parse_date_param("2026-8-7").is_err());
        assert!(parse_date_param("not-a-date").is_err());
        assert!(parse_date_param("2026-13-01").is_err());
    }
}
