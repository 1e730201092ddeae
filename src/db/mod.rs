//! Database layer: one backing-store connection per bot.

pub mod postgres;
pub mod supabase;

pub use supabase::SupabaseClient;

use crate::config::{BackendConfig, BotConfig};
use crate::error::AppError;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use sqlx::PgPool;

/// A live handle to one bot's backing store.
///
/// Cheap to clone: the pool and the HTTP client both share their transport
/// internally.
#[derive(Clone, Debug)]
pub enum Connection {
    Postgres(PgPool),
    Supabase(SupabaseClient),
}

/// Owns the lifecycle of backing-store connections, one per bot, created
/// lazily on first use and reused for the life of the process.
pub struct ConnectionManager {
    bots: Vec<BotConfig>,
    connections: DashMap<String, Connection>,
}

impl ConnectionManager {
    pub fn new(bots: Vec<BotConfig>) -> Self {
        Self {
            bots,
            connections: DashMap::new(),
        }
    }

    /// Configuration for a bot, if one is registered under `bot_id`.
    pub fn config(&self, bot_id: &str) -> Option<&BotConfig> {
        self.bots.iter().find(|b| b.id == bot_id)
    }

    /// Get the connection for a bot, creating it on first use.
    ///
    /// Construction happens under the map's entry lock, so two concurrent
    /// first requests for the same bot produce exactly one connection.
    /// Postgres pools are built with `connect_lazy`, so no I/O happens
    /// here; physical connections open on first query.
    pub fn get(&self, bot_id: &str) -> Result<Connection, AppError> {
        if let Some(conn) = self.connections.get(bot_id) {
            return Ok(conn.clone());
        }

        let config = self
            .config(bot_id)
            .ok_or_else(|| AppError::UnknownBot(bot_id.to_string()))?;

        match self.connections.entry(bot_id.to_string()) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => {
                tracing::info!(bot_id = %config.id, "Opening backing-store connection");
                let conn = match &config.backend {
                    BackendConfig::Postgres { url } => {
                        Connection::Postgres(postgres::build_pool(url)?)
                    }
                    BackendConfig::Supabase { url, service_key } => {
                        Connection::Supabase(SupabaseClient::new(url, service_key.clone()))
                    }
                };
                entry.insert(conn.clone());
                Ok(conn)
            }
        }
    }

    /// Probe a bot's backing store. Never errors; any failure reads as
    /// "not connected".
    pub async fn check(&self, bot_id: &str) -> bool {
        match self.get(bot_id) {
            Ok(Connection::Postgres(pool)) => {
                sqlx::query("SELECT 1").execute(&pool).await.is_ok()
            }
            Ok(Connection::Supabase(client)) => client.probe().await,
            Err(_) => false,
        }
    }

    /// Close every cached connection. Supabase clients have no transport
    /// of their own to drain; pool closes that fail are logged and skipped
    /// so shutdown always completes.
    pub async fn close_all(&self) {
        let handles: Vec<(String, Connection)> = self
            .connections
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        self.connections.clear();

        let closes = handles.into_iter().map(|(bot_id, conn)| async move {
            match conn {
                Connection::Postgres(pool) => {
                    pool.close().await;
                    tracing::info!(bot_id = %bot_id, "Closed PostgreSQL pool");
                }
                Connection::Supabase(_) => {
                    tracing::debug!(bot_id = %bot_id, "Dropped Supabase client");
                }
            }
        });
        futures_util::future::join_all(closes).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_unknown_bot_is_rejected() {
        let manager = ConnectionManager::new(Config::test_default().bots);
        let err = manager.get("nope").unwrap_err();
        assert!(matches!(err, AppError::UnknownBot(_)));
    }

    #[tokio::test]
    async fn test_connection_is_cached() {
        let manager = ConnectionManager::new(Config::test_default().bots);

        let first = manager.get("alex").unwrap();
        let second = manager.get("alex").unwrap();

        assert!(matches!(first, Connection::Postgres(_)));
        assert!(matches!(second, Connection::Postgres(_)));
        // One cached handle per bot, not a new pool per call.
        assert_eq!(manager.connections.len(), 1);

        manager.get("strava").unwrap();
        assert_eq!(manager.connections.len(), 2);
    }

    #[tokio::test]
    async fn test_check_never_errors() {
        let manager = ConnectionManager::new(Config::test_default().bots);

        // Unknown bots and unreachable stores both read as "down".
        assert!(!manager.check("nope").await);
        assert!(!manager.check("strava").await);
    }
}
