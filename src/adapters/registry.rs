// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bot id → adapter resolution with memoized construction.

use super::{BotAdapter, PostgresAdapter, SupabaseAdapter};
use crate::db::{Connection, ConnectionManager};
use crate::error::{AppError, Result};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

/// Resolves bot ids to live adapter instances.
///
/// Adapters are constructed on first use and cached; every later call for
/// the same bot returns the same `Arc`. The registry owns the connection
/// manager, so dropping it (after `close_all`) tears the whole data layer
/// down.
pub struct AdapterRegistry {
    connections: ConnectionManager,
    adapters: DashMap<String, Arc<dyn BotAdapter>>,
}

impl AdapterRegistry {
    pub fn new(connections: ConnectionManager) -> Self {
        Self {
            connections,
            adapters: DashMap::new(),
        }
    }

    /// Get the adapter for a bot, constructing it on first use.
    ///
    /// Construction runs under the map's entry lock, so concurrent first
    /// requests for an unseen bot build one adapter and one connection.
    pub fn get(&self, bot_id: &str) -> Result<Arc<dyn BotAdapter>> {
        if let Some(adapter) = self.adapters.get(bot_id) {
            return Ok(adapter.clone());
        }

        match self.adapters.entry(bot_id.to_string()) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => {
                let adapter: Arc<dyn BotAdapter> = match self.connections.get(bot_id)? {
                    Connection::Postgres(pool) => Arc::new(PostgresAdapter::new(pool)),
                    Connection::Supabase(client) => Arc::new(SupabaseAdapter::new(client)),
                };
                tracing::info!(bot_id = %bot_id, "Adapter initialized");
                entry.insert(adapter.clone());
                Ok(adapter)
            }
        }
    }

    /// Probe a bot's backing store through its adapter. Unknown bots read
    /// as "not connected".
    pub async fn check(&self, bot_id: &str) -> bool {
        match self.get(bot_id) {
            Ok(adapter) => adapter.check_connection().await,
            Err(AppError::UnknownBot(_)) => false,
            Err(_) => false,
        }
    }

    /// Drop all cached adapters and close their connections.
    pub async fn close_all(&self) {
        self.adapters.clear();
        self.connections.close_all().await;
    }
}
