// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod analytics;
pub mod chat;
pub mod payment;
pub mod user;

pub use analytics::AnalyticsSnapshot;
pub use chat::ChatLogEntry;
pub use payment::Payment;
pub use user::{MoodPoint, Question, TherapyProfile, User};
