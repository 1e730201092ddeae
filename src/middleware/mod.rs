// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (authentication, bot resolution, security).

pub mod auth;
pub mod bot;
pub mod security;

pub use auth::require_auth;
pub use bot::{resolve_bot, BotId};
