// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! PostgreSQL pool construction.

use crate::error::AppError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Bounded pool size: protects the database from request bursts.
const MAX_CONNECTIONS: u32 = 10;
/// Fail fast instead of queueing forever when the pool is exhausted.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(2);
/// Idle connections are returned to the server after this long.
const IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Build a lazily-connecting pool for one bot's database.
///
/// No I/O happens here; the first query opens the first connection, so a
/// bot with an unreachable database only fails when it is actually used.
pub fn build_pool(url: &str) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .idle_timeout(IDLE_TIMEOUT)
        .connect_lazy(url)?;

    Ok(pool)
}
