// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Adapter for the Alex bot (PostgreSQL).
//!
//! Dynamic filters are assembled with `QueryBuilder` so every user-supplied
//! value goes through a bind parameter. The only strings interpolated into
//! SQL are sort fields and directions, which come from the allow-list in
//! [`crate::adapters::normalize_sort_field`].

use super::{
    normalize_sort_field, BotAdapter, PaymentFilters, SortOrder, UserFilters, UserPage,
};
use crate::error::Result;
use crate::models::analytics::{
    ActiveUsersPoint, AnalyticsSnapshot, DailyRevenue, GrowthPoint, MessageCounts,
    MessageVolumePoint, NpsRollup, PaymentDistributionBucket, RevenueSummary,
    RollingActiveUsers, UsersSummary, WeekRange, WeeklyRevenue,
};
use crate::models::{ChatLogEntry, MoodPoint, Payment, Question, TherapyProfile, User};
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use sqlx::{PgPool, Postgres, QueryBuilder};

const USER_COLUMNS: &str = "id, telegram_user_id, username, first_name, last_name, \
     status, subscribe, stage, created_at, updated_at, \
     daily_message_count, daily_message_count_date";

const PAYMENT_COLUMNS: &str = "telegram_user_id, payment_date, amount, amount_net, \
     duration, pro_before, pro_label, source, receipt_url, comment";

const CHAT_COLUMNS: &str = "id, telegram_user_id, role, user_input, model_output, \
     created_at, supervisor_flag, flag_probability, supervisor_feedback";

pub struct PostgresAdapter {
    pool: PgPool,
}

impl PostgresAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Append user filters as `WHERE`/`AND` clauses. The `u.` alias must be in
/// scope in the surrounding query.
fn push_user_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &UserFilters) {
    let mut sep = " WHERE ";

    if let Some(search) = filters.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search.to_lowercase());
        qb.push(sep)
            .push("(CAST(u.telegram_user_id AS TEXT) LIKE ")
            .push_bind(pattern.clone())
            .push(" OR LOWER(u.first_name) LIKE ")
            .push_bind(pattern.clone())
            .push(" OR LOWER(u.last_name) LIKE ")
            .push_bind(pattern.clone())
            .push(" OR LOWER(u.username) LIKE ")
            .push_bind(pattern)
            .push(")");
        sep = " AND ";
    }

    if let Some(subscribe) = filters.subscribe.clone().filter(|s| !s.is_empty()) {
        qb.push(sep).push("u.subscribe = ").push_bind(subscribe);
        sep = " AND ";
    }

    if let Some(status) = filters.status.clone().filter(|s| !s.is_empty()) {
        qb.push(sep).push("u.status = ").push_bind(status);
        sep = " AND ";
    }

    if let Some(from) = filters.date_from {
        qb.push(sep).push("u.created_at >= ").push_bind(from);
        sep = " AND ";
    }

    if let Some(to) = filters.date_to {
        // Inclusive end of day: created_at < to + 1 day
        let upper = to.checked_add_days(Days::new(1)).unwrap_or(to);
        qb.push(sep).push("u.created_at < ").push_bind(upper);
    }
}

/// Append payment filters. Same end-of-day handling as the user list.
fn push_payment_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &PaymentFilters) {
    let mut sep = " WHERE ";

    if let Some(user_id) = filters.user_id {
        qb.push(sep).push("telegram_user_id = ").push_bind(user_id);
        sep = " AND ";
    }

    if let Some(from) = filters.date_from {
        qb.push(sep).push("payment_date >= ").push_bind(from);
        sep = " AND ";
    }

    if let Some(to) = filters.date_to {
        let upper = to.checked_add_days(Days::new(1)).unwrap_or(to);
        qb.push(sep).push("payment_date < ").push_bind(upper);
    }
}

#[async_trait]
impl BotAdapter for PostgresAdapter {
    async fn get_user_info(&self, user_id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM alex_users WHERE telegram_user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_users_list(
        &self,
        filters: &UserFilters,
        sort_by: &str,
        sort_order: SortOrder,
        limit: i64,
        offset: i64,
    ) -> Result<UserPage> {
        let sort_field = normalize_sort_field(sort_by);

        let mut qb = QueryBuilder::new(
            "SELECT u.id, u.telegram_user_id, u.username, u.first_name, u.last_name, \
             u.status, u.subscribe, u.stage, u.created_at, u.updated_at, \
             u.daily_message_count, u.daily_message_count_date, \
             (SELECT p.pro_before FROM alex_payments p \
              WHERE p.telegram_user_id = u.telegram_user_id \
              ORDER BY p.pro_before DESC NULLS LAST LIMIT 1) AS pro_before, \
             (SELECT COUNT(*) FROM alex_payments p \
              WHERE p.telegram_user_id = u.telegram_user_id) AS payment_count \
             FROM alex_users u",
        );
        push_user_filters(&mut qb, filters);
        qb.push(format!(" ORDER BY {} {}", sort_field, sort_order.as_sql()));
        qb.push(" LIMIT ").push_bind(limit);
        qb.push(" OFFSET ").push_bind(offset);

        let users = qb
            .build_query_as::<User>()
            .fetch_all(&self.pool)
            .await?;

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM alex_users u");
        push_user_filters(&mut count_qb, filters);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok(UserPage { users, total })
    }

    async fn update_user_status(&self, user_id: i64, status: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE alex_users SET status = $1, updated_at = NOW() \
             WHERE telegram_user_id = $2 RETURNING {USER_COLUMNS}"
        ))
        .bind(status)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_user_subscribe(&self, user_id: i64, subscribe: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE alex_users SET subscribe = $1, updated_at = NOW() \
             WHERE telegram_user_id = $2 RETURNING {USER_COLUMNS}"
        ))
        .bind(subscribe)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_therapy_profile(&self, user_id: i64) -> Result<Option<TherapyProfile>> {
        let profile = sqlx::query_as::<_, TherapyProfile>(
            "SELECT telegram_user_id, personal_facts, goals, progress, updated_at \
             FROM alex_user_therapy_profiles WHERE telegram_user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn get_user_questions(&self, user_id: i64) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(
            "SELECT id, question, comment, start_date, finish_date, cadence, updated_at \
             FROM alex_user_question WHERE telegram_user_id = $1 \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    async fn get_user_mood_logs(
        &self,
        user_id: i64,
        question_id: i64,
        days: i64,
    ) -> Result<Vec<MoodPoint>> {
        let points = sqlx::query_as::<_, MoodPoint>(
            "SELECT date, mood_score::float8 AS mood_score \
             FROM alex_daily_mood_logs \
             WHERE telegram_user_id = $1 AND question_id = $2 \
               AND date >= CURRENT_DATE - ($3::int * INTERVAL '1 day') \
             ORDER BY date ASC",
        )
        .bind(user_id)
        .bind(question_id)
        .bind(days as i32)
        .fetch_all(&self.pool)
        .await?;

        Ok(points)
    }

    async fn get_payments(&self, user_id: i64) -> Result<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM alex_payments \
             WHERE telegram_user_id = $1 ORDER BY payment_date DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    async fn get_all_payments(
        &self,
        filters: &PaymentFilters,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Payment>> {
        let mut qb =
            QueryBuilder::new(format!("SELECT {PAYMENT_COLUMNS} FROM alex_payments"));
        push_payment_filters(&mut qb, filters);
        qb.push(" ORDER BY payment_date DESC");
        qb.push(" LIMIT ").push_bind(limit);
        qb.push(" OFFSET ").push_bind(offset);

        let payments = qb
            .build_query_as::<Payment>()
            .fetch_all(&self.pool)
            .await?;

        Ok(payments)
    }

    async fn get_payments_count(&self, filters: &PaymentFilters) -> Result<i64> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM alex_payments");
        push_payment_filters(&mut qb, filters);

        let total: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(total)
    }

    async fn get_chat_logs(&self, user_id: i64, limit: Option<i64>) -> Result<Vec<ChatLogEntry>> {
        let logs = match limit {
            Some(limit) => {
                sqlx::query_as::<_, ChatLogEntry>(&format!(
                    "SELECT {CHAT_COLUMNS} FROM alex_chat_logs \
                     WHERE telegram_user_id = $1 \
                     ORDER BY created_at DESC LIMIT $2"
                ))
                .bind(user_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ChatLogEntry>(&format!(
                    "SELECT {CHAT_COLUMNS} FROM alex_chat_logs \
                     WHERE telegram_user_id = $1 \
                     ORDER BY created_at DESC"
                ))
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(logs)
    }

    async fn get_dashboard_analytics(&self) -> Result<AnalyticsSnapshot> {
        let summary = sqlx::query_as::<_, UsersSummary>(
            "SELECT COUNT(*) AS total_users, \
                    COUNT(*) FILTER (WHERE status = 'active') AS active_users, \
                    COUNT(*) FILTER (WHERE subscribe = 'pro') AS pro_users \
             FROM alex_users",
        )
        .fetch_one(&self.pool);

        // Active = wrote at least one message in the bucket. A user counts
        // as pro for a bucket if a payment covered any part of it.
        let dau = sqlx::query_as::<_, ActiveUsersPoint>(
            "WITH active_users AS ( \
                SELECT DISTINCT DATE(created_at) AS date, telegram_user_id \
                FROM alex_chat_logs \
                WHERE created_at >= NOW() - INTERVAL '30 days' \
             ), \
             user_pro_status AS ( \
                SELECT au.date, au.telegram_user_id, \
                       EXISTS ( \
                           SELECT 1 FROM alex_payments p \
                           WHERE p.telegram_user_id = au.telegram_user_id \
                             AND p.payment_date <= au.date \
                             AND p.pro_before >= au.date \
                       ) AS is_pro \
                FROM active_users au \
             ) \
             SELECT TO_CHAR(date, 'YYYY-MM-DD') AS period, \
                    COUNT(DISTINCT telegram_user_id) AS total, \
                    COUNT(DISTINCT telegram_user_id) FILTER (WHERE is_pro) AS pro \
             FROM user_pro_status GROUP BY date ORDER BY date",
        )
        .fetch_all(&self.pool);

        let wau = sqlx::query_as::<_, ActiveUsersPoint>(
            "WITH active_users AS ( \
                SELECT DISTINCT date_trunc('week', created_at) AS week, telegram_user_id \
                FROM alex_chat_logs \
                WHERE created_at >= NOW() - INTERVAL '12 weeks' \
             ), \
             user_pro_status AS ( \
                SELECT au.week, au.telegram_user_id, \
                       EXISTS ( \
                           SELECT 1 FROM alex_payments p \
                           WHERE p.telegram_user_id = au.telegram_user_id \
                             AND p.payment_date <= (au.week + INTERVAL '6 days')::date \
                             AND p.pro_before >= au.week::date \
                       ) AS is_pro \
                FROM active_users au \
             ) \
             SELECT TO_CHAR(week, 'IYYY-\"W\"IW') AS period, \
                    COUNT(DISTINCT telegram_user_id) AS total, \
                    COUNT(DISTINCT telegram_user_id) FILTER (WHERE is_pro) AS pro \
             FROM user_pro_status GROUP BY week ORDER BY week",
        )
        .fetch_all(&self.pool);

        let mau = sqlx::query_as::<_, ActiveUsersPoint>(
            "WITH active_users AS ( \
                SELECT DISTINCT date_trunc('month', created_at) AS month, telegram_user_id \
                FROM alex_chat_logs \
                WHERE created_at >= NOW() - INTERVAL '12 months' \
             ), \
             user_pro_status AS ( \
                SELECT au.month, au.telegram_user_id, \
                       EXISTS ( \
                           SELECT 1 FROM alex_payments p \
                           WHERE p.telegram_user_id = au.telegram_user_id \
                             AND p.payment_date <= (au.month + INTERVAL '1 month - 1 day')::date \
                             AND p.pro_before >= au.month::date \
                       ) AS is_pro \
                FROM active_users au \
             ) \
             SELECT TO_CHAR(month, 'YYYY-MM') AS period, \
                    COUNT(DISTINCT telegram_user_id) AS total, \
                    COUNT(DISTINCT telegram_user_id) FILTER (WHERE is_pro) AS pro \
             FROM user_pro_status GROUP BY month ORDER BY month",
        )
        .fetch_all(&self.pool);

        let growth = sqlx::query_as::<_, GrowthPoint>(
            "WITH daily_new AS ( \
                SELECT DATE(created_at) AS date, COUNT(*) AS new_users \
                FROM alex_users \
                WHERE created_at >= NOW() - INTERVAL '90 days' \
                GROUP BY DATE(created_at) \
             ) \
             SELECT date, new_users, \
                    SUM(new_users) OVER (ORDER BY date)::int8 AS total_users \
             FROM daily_new ORDER BY date",
        )
        .fetch_all(&self.pool);

        let revenue = sqlx::query_as::<_, RevenueSummary>(
            "SELECT \
                COALESCE(SUM(amount::numeric) FILTER (WHERE DATE(payment_date) = CURRENT_DATE), 0)::float8 AS today, \
                COALESCE(SUM(amount::numeric) FILTER (WHERE payment_date >= date_trunc('week', CURRENT_DATE) \
                    AND payment_date < date_trunc('week', CURRENT_DATE) + INTERVAL '1 week'), 0)::float8 AS this_week, \
                COALESCE(SUM(amount::numeric) FILTER (WHERE payment_date >= date_trunc('month', CURRENT_DATE) \
                    AND payment_date < date_trunc('month', CURRENT_DATE) + INTERVAL '1 month'), 0)::float8 AS this_month, \
                COALESCE(SUM(amount::numeric) FILTER (WHERE DATE(payment_date) = CURRENT_DATE - INTERVAL '1 day'), 0)::float8 AS yesterday, \
                COALESCE(SUM(amount::numeric) FILTER (WHERE payment_date >= date_trunc('week', CURRENT_DATE) - INTERVAL '1 week' \
                    AND payment_date < date_trunc('week', CURRENT_DATE)), 0)::float8 AS last_week, \
                COALESCE(SUM(amount::numeric) FILTER (WHERE payment_date >= date_trunc('month', CURRENT_DATE) - INTERVAL '1 month' \
                    AND payment_date < date_trunc('month', CURRENT_DATE)), 0)::float8 AS last_month, \
                COUNT(*) FILTER (WHERE DATE(payment_date) = CURRENT_DATE) AS today_count, \
                COUNT(*) FILTER (WHERE payment_date >= date_trunc('week', CURRENT_DATE) \
                    AND payment_date < date_trunc('week', CURRENT_DATE) + INTERVAL '1 week') AS this_week_count, \
                COUNT(*) FILTER (WHERE payment_date >= date_trunc('month', CURRENT_DATE) \
                    AND payment_date < date_trunc('month', CURRENT_DATE) + INTERVAL '1 month') AS this_month_count, \
                COUNT(*) FILTER (WHERE DATE(payment_date) = CURRENT_DATE - INTERVAL '1 day') AS yesterday_count, \
                COUNT(*) FILTER (WHERE payment_date >= date_trunc('week', CURRENT_DATE) - INTERVAL '1 week' \
                    AND payment_date < date_trunc('week', CURRENT_DATE)) AS last_week_count, \
                COUNT(*) FILTER (WHERE payment_date >= date_trunc('month', CURRENT_DATE) - INTERVAL '1 month' \
                    AND payment_date < date_trunc('month', CURRENT_DATE)) AS last_month_count \
             FROM alex_payments",
        )
        .fetch_one(&self.pool);

        let rolling = sqlx::query_as::<_, RollingActiveUsers>(
            "SELECT \
                COUNT(DISTINCT telegram_user_id) FILTER ( \
                    WHERE created_at >= NOW() - INTERVAL '24 hours') AS current_dau, \
                COUNT(DISTINCT telegram_user_id) FILTER ( \
                    WHERE created_at >= NOW() - INTERVAL '48 hours' \
                      AND created_at < NOW() - INTERVAL '24 hours') AS previous_dau, \
                COUNT(DISTINCT telegram_user_id) FILTER ( \
                    WHERE created_at >= NOW() - INTERVAL '7 days') AS current_wau, \
                COUNT(DISTINCT telegram_user_id) FILTER ( \
                    WHERE created_at >= NOW() - INTERVAL '14 days' \
                      AND created_at < NOW() - INTERVAL '7 days') AS previous_wau, \
                COUNT(DISTINCT telegram_user_id) FILTER ( \
                    WHERE created_at >= NOW() - INTERVAL '30 days') AS current_mau, \
                COUNT(DISTINCT telegram_user_id) FILTER ( \
                    WHERE created_at >= NOW() - INTERVAL '60 days' \
                      AND created_at < NOW() - INTERVAL '30 days') AS previous_mau \
             FROM alex_chat_logs",
        )
        .fetch_one(&self.pool);

        let nps_all = sqlx::query_as::<_, NpsRollup>(
            "SELECT \
                COUNT(*) FILTER (WHERE nps_score >= 8) AS promoters, \
                COUNT(*) FILTER (WHERE nps_score = 7) AS passives, \
                COUNT(*) FILTER (WHERE nps_score <= 6) AS detractors, \
                COUNT(*) AS total_responses, \
                ROUND((COUNT(*) FILTER (WHERE nps_score >= 8)::numeric / NULLIF(COUNT(*), 0) * 100) \
                    - (COUNT(*) FILTER (WHERE nps_score <= 6)::numeric / NULLIF(COUNT(*), 0) * 100), 1)::float8 AS nps_score \
             FROM alex_users \
             WHERE nps_answered_at >= NOW() - INTERVAL '21 days' AND nps_score IS NOT NULL",
        )
        .fetch_one(&self.pool);

        let nps_paying = sqlx::query_as::<_, NpsRollup>(
            "WITH paying_users AS ( \
                SELECT DISTINCT telegram_user_id FROM alex_payments \
             ) \
             SELECT \
                COUNT(*) FILTER (WHERE u.nps_score >= 8) AS promoters, \
                COUNT(*) FILTER (WHERE u.nps_score = 7) AS passives, \
                COUNT(*) FILTER (WHERE u.nps_score <= 6) AS detractors, \
                COUNT(*) AS total_responses, \
                ROUND((COUNT(*) FILTER (WHERE u.nps_score >= 8)::numeric / NULLIF(COUNT(*), 0) * 100) \
                    - (COUNT(*) FILTER (WHERE u.nps_score <= 6)::numeric / NULLIF(COUNT(*), 0) * 100), 1)::float8 AS nps_score \
             FROM alex_users u \
             INNER JOIN paying_users pu ON u.telegram_user_id = pu.telegram_user_id \
             WHERE u.nps_answered_at >= NOW() - INTERVAL '21 days' AND u.nps_score IS NOT NULL",
        )
        .fetch_one(&self.pool);

        let messages = sqlx::query_as::<_, MessageVolumePoint>(
            "SELECT DATE(cl.created_at) AS date, \
                    COUNT(*) AS total_messages, \
                    COUNT(*) FILTER (WHERE u.subscribe = 'pro') AS pro_messages \
             FROM alex_chat_logs cl \
             LEFT JOIN alex_users u ON cl.telegram_user_id = u.telegram_user_id \
             WHERE cl.created_at >= NOW() - INTERVAL '30 days' \
             GROUP BY DATE(cl.created_at) ORDER BY date",
        )
        .fetch_all(&self.pool);

        let messages_count = sqlx::query_as::<_, MessageCounts>(
            "SELECT \
                COUNT(*) FILTER (WHERE created_at >= NOW() - INTERVAL '24 hours') AS today, \
                COUNT(*) FILTER (WHERE created_at >= NOW() - INTERVAL '7 days') AS this_week, \
                COUNT(*) FILTER (WHERE created_at >= NOW() - INTERVAL '30 days') AS this_month, \
                COUNT(*) FILTER (WHERE created_at >= NOW() - INTERVAL '48 hours' \
                    AND created_at < NOW() - INTERVAL '24 hours') AS yesterday, \
                COUNT(*) FILTER (WHERE created_at >= NOW() - INTERVAL '14 days' \
                    AND created_at < NOW() - INTERVAL '7 days') AS last_week, \
                COUNT(*) FILTER (WHERE created_at >= NOW() - INTERVAL '60 days' \
                    AND created_at < NOW() - INTERVAL '30 days') AS last_month \
             FROM alex_chat_logs",
        )
        .fetch_one(&self.pool);

        // All aggregations are independent; run them concurrently.
        let (
            summary,
            dau,
            wau,
            mau,
            growth,
            revenue,
            rolling,
            nps_all,
            nps_paying,
            messages,
            messages_count,
        ) = tokio::try_join!(
            summary,
            dau,
            wau,
            mau,
            growth,
            revenue,
            rolling,
            nps_all,
            nps_paying,
            messages,
            messages_count,
        )?;

        Ok(AnalyticsSnapshot {
            summary,
            dau,
            wau,
            mau,
            growth,
            revenue,
            rolling,
            nps_all,
            nps_paying,
            messages,
            messages_count,
        })
    }

    async fn get_payment_distribution(&self) -> Result<Vec<PaymentDistributionBucket>> {
        let buckets = sqlx::query_as::<_, PaymentDistributionBucket>(
            "WITH user_payments AS ( \
                SELECT p.telegram_user_id, \
                       p.amount::numeric AS amount, \
                       (DATE(p.payment_date) - u.created_at::date) AS days_after_registration, \
                       ROW_NUMBER() OVER (PARTITION BY p.telegram_user_id \
                                          ORDER BY p.payment_date) AS payment_number \
                FROM alex_payments p \
                JOIN alex_users u ON p.telegram_user_id = u.telegram_user_id \
                WHERE p.payment_date IS NOT NULL AND u.created_at IS NOT NULL \
             ), \
             categorized AS ( \
                SELECT LEAST(GREATEST(days_after_registration, 0), 91) AS day_group, \
                       CASE WHEN payment_number = 1 THEN 'first' ELSE 'repeat' END AS payment_type, \
                       amount \
                FROM user_payments \
             ) \
             SELECT day_group::int4 AS day_group, \
                COUNT(*) FILTER (WHERE payment_type = 'first') AS first_payment_count, \
                COUNT(*) FILTER (WHERE payment_type = 'repeat') AS repeat_payment_count, \
                ROUND(AVG(amount) FILTER (WHERE payment_type = 'first'), 2)::float8 AS first_avg_amount, \
                ROUND(AVG(amount) FILTER (WHERE payment_type = 'repeat'), 2)::float8 AS repeat_avg_amount, \
                ROUND(SUM(amount) FILTER (WHERE payment_type = 'first'), 2)::float8 AS first_total_amount, \
                ROUND(SUM(amount) FILTER (WHERE payment_type = 'repeat'), 2)::float8 AS repeat_total_amount \
             FROM categorized GROUP BY day_group ORDER BY day_group",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(buckets)
    }

    async fn get_revenue_for_date(&self, date: NaiveDate) -> Result<DailyRevenue> {
        let revenue = sqlx::query_as::<_, DailyRevenue>(
            "SELECT COALESCE(SUM(amount::numeric), 0)::float8 AS revenue, \
                    COUNT(*) AS payment_count, \
                    $1::date AS date \
             FROM alex_payments WHERE DATE(payment_date) = $1::date",
        )
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        Ok(revenue)
    }

    async fn get_revenue_for_week(&self, week_start: NaiveDate) -> Result<WeeklyRevenue> {
        let revenue = sqlx::query_as::<_, WeeklyRevenue>(
            "SELECT COALESCE(SUM(amount::numeric), 0)::float8 AS revenue, \
                    COUNT(*) AS payment_count, \
                    $1::date AS week_start, \
                    ($1::date + 6) AS week_end \
             FROM alex_payments \
             WHERE payment_date >= $1::date \
               AND payment_date < $1::date + INTERVAL '7 days'",
        )
        .bind(week_start)
        .fetch_one(&self.pool)
        .await?;

        Ok(revenue)
    }

    async fn get_recent_weeks(&self, count: i64) -> Result<Vec<WeekRange>> {
        let weeks = sqlx::query_as::<_, WeekRange>(
            "SELECT week_start::date AS week_start, \
                    (week_start + INTERVAL '6 days')::date AS week_end \
             FROM generate_series( \
                    date_trunc('week', CURRENT_DATE) - ($1::int - 1) * INTERVAL '1 week', \
                    date_trunc('week', CURRENT_DATE), \
                    INTERVAL '1 week') AS weeks(week_start) \
             ORDER BY week_start DESC",
        )
        .bind(count as i32)
        .fetch_all(&self.pool)
        .await?;

        Ok(weeks)
    }

    async fn check_connection(&self) -> bool {
        sqlx::query("SELECT NOW()").execute(&self.pool).await.is_ok()
    }
}
