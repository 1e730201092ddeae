//! User records and the per-user therapy data attached to them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A chat end-user as stored by a bot's backing store.
///
/// `pro_before` and `payment_count` are computed columns present only in
/// list queries; single-row lookups leave them at their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub telegram_user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Lifecycle status: `active`, `stopped`, `ban` or `muted`
    pub status: String,
    /// Subscription tier: `free` or `pro`
    pub subscribe: String,
    /// Onboarding stage the bot has the user in
    #[serde(default)]
    pub stage: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub daily_message_count: Option<i32>,
    #[serde(default)]
    pub daily_message_count_date: Option<NaiveDate>,
    /// Latest subscription expiry across the user's payments
    #[sqlx(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pro_before: Option<NaiveDate>,
    #[sqlx(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_count: Option<i64>,
}

/// Structured therapy notes, one per user. Bots that don't model therapy
/// have no rows here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TherapyProfile {
    pub telegram_user_id: i64,
    pub personal_facts: Option<String>,
    pub goals: Option<String>,
    pub progress: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A tracked daily-mood question set up for a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub comment: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub finish_date: Option<NaiveDate>,
    pub cadence: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// One daily mood reading for a question.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MoodPoint {
    pub date: NaiveDate,
    pub mood_score: f64,
}
