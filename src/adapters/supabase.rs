// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Adapter for the Strava bot (Supabase).
//!
//! Filters become PostgREST query parameters. The managed API has no
//! server-side aggregation to speak of, so the analytics snapshot carries
//! real summary and 30-day revenue numbers and leaves the series empty;
//! the shape matches the Postgres bot so the dashboard renders either.

use super::{
    normalize_sort_field, BotAdapter, PaymentFilters, SortOrder, UserFilters, UserPage,
};
use crate::db::SupabaseClient;
use crate::error::Result;
use crate::models::analytics::{
    AnalyticsSnapshot, DailyRevenue, UsersSummary, WeekRange, WeeklyRevenue,
};
use crate::models::payment::parse_amount;
use crate::models::{ChatLogEntry, Payment, User};
use async_trait::async_trait;
use chrono::{Days, NaiveDate, Utc};

const USERS_TABLE: &str = "users_pasha";
const PAYMENTS_TABLE: &str = "pro_payments";
const CHAT_LOGS_TABLE: &str = "chat_logs";

pub struct SupabaseAdapter {
    client: SupabaseClient,
}

impl SupabaseAdapter {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

/// PostgREST parameters for the user filters.
fn user_filter_params(filters: &UserFilters) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();

    if let Some(search) = filters.search.as_deref().filter(|s| !s.is_empty()) {
        // Numeric input targets the id; anything else searches names.
        if search.parse::<i64>().is_ok() {
            params.push(("telegram_user_id", format!("eq.{search}")));
        } else {
            params.push((
                "or",
                format!(
                    "(first_name.ilike.*{search}*,last_name.ilike.*{search}*,username.ilike.*{search}*)"
                ),
            ));
        }
    }

    if let Some(subscribe) = filters.subscribe.as_deref().filter(|s| !s.is_empty()) {
        params.push(("subscribe", format!("eq.{subscribe}")));
    }

    if let Some(status) = filters.status.as_deref().filter(|s| !s.is_empty()) {
        params.push(("status", format!("eq.{status}")));
    }

    if let Some(from) = filters.date_from {
        params.push(("created_at", format!("gte.{from}")));
    }

    if let Some(to) = filters.date_to {
        let upper = to.checked_add_days(Days::new(1)).unwrap_or(to);
        params.push(("created_at", format!("lt.{upper}")));
    }

    params
}

/// PostgREST parameters for the payments registry filters.
fn payment_filter_params(filters: &PaymentFilters) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();

    if let Some(user_id) = filters.user_id {
        params.push(("telegram_user_id", format!("eq.{user_id}")));
    }

    if let Some(from) = filters.date_from {
        params.push(("payment_date", format!("gte.{from}")));
    }

    if let Some(to) = filters.date_to {
        let upper = to.checked_add_days(Days::new(1)).unwrap_or(to);
        params.push(("payment_date", format!("lt.{upper}")));
    }

    params
}

#[async_trait]
impl BotAdapter for SupabaseAdapter {
    async fn get_user_info(&self, user_id: i64) -> Result<Option<User>> {
        let mut users: Vec<User> = self
            .client
            .select(
                USERS_TABLE,
                &[
                    ("telegram_user_id", format!("eq.{user_id}")),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;

        Ok(users.pop())
    }

    async fn get_users_list(
        &self,
        filters: &UserFilters,
        sort_by: &str,
        sort_order: SortOrder,
        limit: i64,
        offset: i64,
    ) -> Result<UserPage> {
        let mut params = user_filter_params(filters);

        let direction = if sort_order.is_ascending() { "asc" } else { "desc" };
        params.push((
            "order",
            format!("{}.{}", normalize_sort_field(sort_by), direction),
        ));
        params.push(("limit", limit.to_string()));
        params.push(("offset", offset.to_string()));

        let (users, total) = self.client.select_with_count(USERS_TABLE, &params).await?;

        Ok(UserPage { users, total })
    }

    async fn update_user_status(&self, user_id: i64, status: &str) -> Result<Option<User>> {
        let mut users: Vec<User> = self
            .client
            .update(
                USERS_TABLE,
                &[("telegram_user_id", format!("eq.{user_id}"))],
                &serde_json::json!({
                    "status": status,
                    "updated_at": Utc::now().to_rfc3339(),
                }),
            )
            .await?;

        Ok(users.pop())
    }

    async fn update_user_subscribe(&self, user_id: i64, subscribe: &str) -> Result<Option<User>> {
        let mut users: Vec<User> = self
            .client
            .update(
                USERS_TABLE,
                &[("telegram_user_id", format!("eq.{user_id}"))],
                &serde_json::json!({
                    "subscribe": subscribe,
                    "updated_at": Utc::now().to_rfc3339(),
                }),
            )
            .await?;

        Ok(users.pop())
    }

    async fn get_payments(&self, user_id: i64) -> Result<Vec<Payment>> {
        self.client
            .select(
                PAYMENTS_TABLE,
                &[
                    ("telegram_user_id", format!("eq.{user_id}")),
                    ("order", "payment_date.desc".to_string()),
                ],
            )
            .await
    }

    async fn get_all_payments(
        &self,
        filters: &PaymentFilters,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Payment>> {
        let mut params = payment_filter_params(filters);
        params.push(("order", "payment_date.desc".to_string()));
        params.push(("limit", limit.to_string()));
        params.push(("offset", offset.to_string()));

        self.client.select(PAYMENTS_TABLE, &params).await
    }

    async fn get_payments_count(&self, filters: &PaymentFilters) -> Result<i64> {
        self.client
            .count(PAYMENTS_TABLE, &payment_filter_params(filters))
            .await
    }

    async fn get_chat_logs(&self, user_id: i64, limit: Option<i64>) -> Result<Vec<ChatLogEntry>> {
        let mut params = vec![
            ("telegram_user_id", format!("eq.{user_id}")),
            ("order", "created_at.desc".to_string()),
        ];
        if let Some(limit) = limit {
            params.push(("limit", limit.to_string()));
        }

        self.client.select(CHAT_LOGS_TABLE, &params).await
    }

    async fn get_dashboard_analytics(&self) -> Result<AnalyticsSnapshot> {
        let active_filter = [("status", "eq.active".to_string())];
        let pro_filter = [("subscribe", "eq.pro".to_string())];
        let thirty_days_ago = Utc::now().date_naive() - Days::new(30);
        let payments_filter = [("payment_date", format!("gte.{thirty_days_ago}"))];

        let total_users = self.client.count(USERS_TABLE, &[]);
        let active_users = self.client.count(USERS_TABLE, &active_filter);
        let pro_users = self.client.count(USERS_TABLE, &pro_filter);
        let recent_payments = self
            .client
            .select::<Payment>(PAYMENTS_TABLE, &payments_filter);

        let (total_users, active_users, pro_users, recent_payments) =
            tokio::try_join!(total_users, active_users, pro_users, recent_payments)?;

        let mut snapshot = AnalyticsSnapshot {
            summary: UsersSummary {
                total_users,
                active_users,
                pro_users,
            },
            ..AnalyticsSnapshot::default()
        };
        snapshot.revenue.this_month = recent_payments
            .iter()
            .map(|p| parse_amount(p.amount.as_deref()))
            .sum();
        snapshot.revenue.this_month_count = recent_payments.len() as i64;

        Ok(snapshot)
    }

    async fn get_revenue_for_date(&self, date: NaiveDate) -> Result<DailyRevenue> {
        let next_day = date.checked_add_days(Days::new(1)).unwrap_or(date);
        let payments: Vec<Payment> = self
            .client
            .select(
                PAYMENTS_TABLE,
                &[
                    ("payment_date", format!("gte.{date}")),
                    ("payment_date", format!("lt.{next_day}")),
                ],
            )
            .await?;

        Ok(DailyRevenue {
            revenue: payments
                .iter()
                .map(|p| parse_amount(p.amount.as_deref()))
                .sum(),
            payment_count: payments.len() as i64,
            date,
        })
    }

    async fn get_revenue_for_week(&self, week_start: NaiveDate) -> Result<WeeklyRevenue> {
        let week_end = week_start + Days::new(6);
        let upper = week_start + Days::new(7);
        let payments: Vec<Payment> = self
            .client
            .select(
                PAYMENTS_TABLE,
                &[
                    ("payment_date", format!("gte.{week_start}")),
                    ("payment_date", format!("lt.{upper}")),
                ],
            )
            .await?;

        Ok(WeeklyRevenue {
            revenue: payments
                .iter()
                .map(|p| parse_amount(p.amount.as_deref()))
                .sum(),
            payment_count: payments.len() as i64,
            week_start,
            week_end,
        })
    }

    async fn get_recent_weeks(&self, count: i64) -> Result<Vec<WeekRange>> {
        // No server-side generate_series here; the windows are computed
        // locally, Monday-aligned like the Postgres bot's.
        let current_week_start = Utc::now()
            .date_naive()
            .week(chrono::Weekday::Mon)
            .first_day();

        let weeks = (0..count.max(0))
            .map(|i| {
                let week_start = current_week_start - Days::new(7 * i as u64);
                WeekRange {
                    week_start,
                    week_end: week_start + Days::new(6),
                }
            })
            .collect();

        Ok(weeks)
    }

    async fn check_connection(&self) -> bool {
        self.client
            .count(USERS_TABLE, &[("limit", "1".to_string())])
            .await
            .is_ok()
    }
}
