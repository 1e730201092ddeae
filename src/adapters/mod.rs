// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The capability contract every bot backend implements.
//!
//! The HTTP layer talks to `BotAdapter` only and never branches on what
//! kind of store a bot uses. Capabilities a bot's domain genuinely lacks
//! (therapy profiles, mood tracking) have default implementations that
//! return empty values; everything else must be provided.

pub mod postgres;
pub mod registry;
pub mod supabase;

pub use postgres::PostgresAdapter;
pub use registry::AdapterRegistry;
pub use supabase::SupabaseAdapter;

use crate::error::Result;
use crate::models::analytics::{
    AnalyticsSnapshot, DailyRevenue, PaymentDistributionBucket, WeekRange, WeeklyRevenue,
};
use crate::models::{ChatLogEntry, MoodPoint, Payment, Question, TherapyProfile, User};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

/// Filters for the user list. All optional; absent means "don't filter".
#[derive(Debug, Clone, Default)]
pub struct UserFilters {
    /// Case-insensitive substring over id, first/last name and username
    pub search: Option<String>,
    pub subscribe: Option<String>,
    pub status: Option<String>,
    pub date_from: Option<NaiveDate>,
    /// Inclusive: matches users registered any time on this day
    pub date_to: Option<NaiveDate>,
}

/// Filters for the cross-user payments registry.
#[derive(Debug, Clone, Default)]
pub struct PaymentFilters {
    pub user_id: Option<i64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// Sort direction. Anything that isn't exactly `ASC` sorts descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Self {
        if raw == "ASC" {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    pub fn is_ascending(self) -> bool {
        matches!(self, SortOrder::Asc)
    }
}

/// User sort fields accepted verbatim. Everything else (including hostile
/// input) silently falls back to `created_at`, so sort fields never reach
/// SQL unchecked.
pub const USER_SORT_FIELDS: &[&str] = &["created_at", "updated_at", "daily_message_count"];

/// Map a requested sort field onto the allow-list.
pub fn normalize_sort_field(raw: &str) -> &'static str {
    USER_SORT_FIELDS
        .iter()
        .find(|field| **field == raw)
        .copied()
        .unwrap_or("created_at")
}

/// One page of the user list plus the unpaginated total.
#[derive(Debug, Clone, Serialize)]
pub struct UserPage {
    pub users: Vec<User>,
    pub total: i64,
}

/// Uniform data-access contract for one bot, regardless of backing store.
///
/// Every read and write is scoped to the bot this adapter was built for;
/// there is no way to reach another bot's data through it.
#[async_trait]
pub trait BotAdapter: Send + Sync {
    async fn get_user_info(&self, user_id: i64) -> Result<Option<User>>;

    async fn get_users_list(
        &self,
        filters: &UserFilters,
        sort_by: &str,
        sort_order: SortOrder,
        limit: i64,
        offset: i64,
    ) -> Result<UserPage>;

    /// Set the lifecycle status and refresh `updated_at`.
    /// Returns `None` when no such user exists.
    async fn update_user_status(&self, user_id: i64, status: &str) -> Result<Option<User>>;

    /// Set the subscription tier and refresh `updated_at`.
    /// Returns `None` when no such user exists.
    async fn update_user_subscribe(&self, user_id: i64, subscribe: &str) -> Result<Option<User>>;

    /// Bots that don't model therapy have nothing to return.
    async fn get_therapy_profile(&self, _user_id: i64) -> Result<Option<TherapyProfile>> {
        Ok(None)
    }

    async fn get_user_questions(&self, _user_id: i64) -> Result<Vec<Question>> {
        Ok(Vec::new())
    }

    async fn get_user_mood_logs(
        &self,
        _user_id: i64,
        _question_id: i64,
        _days: i64,
    ) -> Result<Vec<MoodPoint>> {
        Ok(Vec::new())
    }

    /// A user's payments, newest first.
    async fn get_payments(&self, user_id: i64) -> Result<Vec<Payment>>;

    /// Payments registry page, newest first.
    async fn get_all_payments(
        &self,
        filters: &PaymentFilters,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Payment>>;

    async fn get_payments_count(&self, filters: &PaymentFilters) -> Result<i64>;

    /// Chat history, newest first. `None` returns the full history; bound
    /// it upstream when response size matters.
    async fn get_chat_logs(&self, user_id: i64, limit: Option<i64>) -> Result<Vec<ChatLogEntry>>;

    async fn get_dashboard_analytics(&self) -> Result<AnalyticsSnapshot>;

    /// Payments bucketed by days since registration. Empty for backends
    /// without the aggregation to compute it.
    async fn get_payment_distribution(&self) -> Result<Vec<PaymentDistributionBucket>> {
        Ok(Vec::new())
    }

    async fn get_revenue_for_date(&self, date: NaiveDate) -> Result<DailyRevenue>;

    async fn get_revenue_for_week(&self, week_start: NaiveDate) -> Result<WeeklyRevenue>;

    async fn get_recent_weeks(&self, count: i64) -> Result<Vec<WeekRange>>;

    /// Liveness probe. Never errors; failure reads as "not connected".
    async fn check_connection(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_field_allowlist() {
        assert_eq!(normalize_sort_field("created_at"), "created_at");
        assert_eq!(normalize_sort_field("updated_at"), "updated_at");
        assert_eq!(
            normalize_sort_field("daily_message_count"),
            "daily_message_count"
        );
    }

    #[test]
    fn test_unknown_sort_field_falls_back() {
        assert_eq!(normalize_sort_field(""), "created_at");
        assert_eq!(normalize_sort_field("password"), "created_at");
        assert_eq!(normalize_sort_field("DROP TABLE"), "created_at");
        assert_eq!(normalize_sort_field("created_at; --"), "created_at");
    }

    #[test]
    fn test_sort_order_defaults_to_desc() {
        assert_eq!(SortOrder::parse("ASC"), SortOrder::Asc);
        assert_eq!(SortOrder::parse("DESC"), SortOrder::Desc);
        assert_eq!(SortOrder::parse("asc"), SortOrder::Desc);
        assert_eq!(SortOrder::parse("sideways"), SortOrder::Desc);
    }
}
