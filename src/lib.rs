// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Support Dashboard: operator backend for browsing chatbot users,
//! payments and chat logs across multiple bot tenants.
//!
//! Each configured bot keeps its data in its own backing store (PostgreSQL
//! or Supabase); the HTTP layer reaches all of them through one adapter
//! contract, so no handler knows which store it is talking to.

pub mod adapters;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod ratelimit;
pub mod routes;

use adapters::AdapterRegistry;
use config::Config;
use db::ConnectionManager;
use ratelimit::LoginRateLimiter;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub adapters: AdapterRegistry,
    pub login_limiter: LoginRateLimiter,
}

impl AppState {
    /// Wire the full state from configuration. No connections are opened
    /// here; each bot's store is reached lazily on first use.
    pub fn new(config: Config) -> Self {
        let connections = ConnectionManager::new(config.bots.clone());
        Self {
            adapters: AdapterRegistry::new(connections),
            login_limiter: LoginRateLimiter::new(),
            config,
        }
    }
}
