// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard analytics types.
//!
//! The snapshot shape is identical for every bot; how much of it a backend
//! actually fills in depends on its aggregation capabilities. Empty series
//! and zero counts are valid values, not errors, so chart clients always
//! receive the full structure.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Aggregate analytics for one bot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub summary: UsersSummary,
    /// Daily active users, last 30 days
    pub dau: Vec<ActiveUsersPoint>,
    /// Weekly active users, last 12 weeks
    pub wau: Vec<ActiveUsersPoint>,
    /// Monthly active users, last 12 months
    pub mau: Vec<ActiveUsersPoint>,
    /// New and cumulative registrations, last 90 days
    pub growth: Vec<GrowthPoint>,
    pub revenue: RevenueSummary,
    pub rolling: RollingActiveUsers,
    pub nps_all: NpsRollup,
    pub nps_paying: NpsRollup,
    /// Daily message volume, last 30 days
    pub messages: Vec<MessageVolumePoint>,
    pub messages_count: MessageCounts,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct UsersSummary {
    pub total_users: i64,
    pub active_users: i64,
    pub pro_users: i64,
}

/// One bucket of an active-users series. `period` is the bucket label:
/// `2026-08-07`, `2026-W32` or `2026-08` depending on granularity.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActiveUsersPoint {
    pub period: String,
    pub total: i64,
    pub pro: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GrowthPoint {
    pub date: NaiveDate,
    pub new_users: i64,
    pub total_users: i64,
}

/// Revenue and payment counts for the usual comparison periods.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct RevenueSummary {
    pub today: f64,
    pub this_week: f64,
    pub this_month: f64,
    pub yesterday: f64,
    pub last_week: f64,
    pub last_month: f64,
    pub today_count: i64,
    pub this_week_count: i64,
    pub this_month_count: i64,
    pub yesterday_count: i64,
    pub last_week_count: i64,
    pub last_month_count: i64,
}

/// Rolling DAU/WAU/MAU with the preceding window for trend arrows.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct RollingActiveUsers {
    pub current_dau: i64,
    pub previous_dau: i64,
    pub current_wau: i64,
    pub previous_wau: i64,
    pub current_mau: i64,
    pub previous_mau: i64,
}

/// Net Promoter Score over a 21-day window.
/// Promoters score >= 8, passives 7, detractors <= 6.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct NpsRollup {
    pub promoters: i64,
    pub passives: i64,
    pub detractors: i64,
    pub total_responses: i64,
    /// None until there is at least one response in the window
    pub nps_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MessageVolumePoint {
    pub date: NaiveDate,
    pub total_messages: i64,
    pub pro_messages: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct MessageCounts {
    pub today: i64,
    pub this_week: i64,
    pub this_month: i64,
    pub yesterday: i64,
    pub last_week: i64,
    pub last_month: i64,
}

/// Payments bucketed by days-since-registration, split into first and
/// repeat purchases. `day_group` 91 collects everything past 90 days.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PaymentDistributionBucket {
    pub day_group: i32,
    pub first_payment_count: i64,
    pub repeat_payment_count: i64,
    pub first_avg_amount: Option<f64>,
    pub repeat_avg_amount: Option<f64>,
    pub first_total_amount: Option<f64>,
    pub repeat_total_amount: Option<f64>,
}

/// Revenue total for a single day.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyRevenue {
    pub revenue: f64,
    pub payment_count: i64,
    pub date: NaiveDate,
}

/// Revenue total for one week.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WeeklyRevenue {
    pub revenue: f64,
    pub payment_count: i64,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WeekRange {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
}
