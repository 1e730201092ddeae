// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Chat log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One turn of conversation between a user and the bot.
///
/// Append-only. Supervisor annotations are filled in later by the review
/// pipeline and stay `None` until then.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChatLogEntry {
    pub id: i64,
    pub telegram_user_id: i64,
    /// `user` or `assistant`
    #[serde(default)]
    pub role: Option<String>,
    pub user_input: Option<String>,
    pub model_output: Option<String>,
    pub created_at: DateTime<Utc>,
    #[sqlx(default)]
    #[serde(default)]
    pub supervisor_flag: Option<bool>,
    #[sqlx(default)]
    #[serde(default)]
    pub flag_probability: Option<f64>,
    #[sqlx(default)]
    #[serde(default)]
    pub supervisor_feedback: Option<String>,
}
