// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fixed-window rate limiting for the login endpoint.

use axum::http::HeaderMap;
use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Attempts allowed per window before callers get 429.
const MAX_ATTEMPTS: u32 = 10;
/// Window length.
const WINDOW: Duration = Duration::from_secs(15 * 60);

struct Window {
    started_at: Instant,
    attempts: u32,
}

/// Per-caller fixed-window counter for login attempts.
///
/// Every request consumes a slot, successful or not; the counter resets
/// when the window elapses. State is in-memory only — a restart forgives
/// everyone, which is fine for a single-instance internal tool.
pub struct LoginRateLimiter {
    windows: DashMap<String, Window>,
    max_attempts: u32,
    window: Duration,
}

impl Default for LoginRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginRateLimiter {
    pub fn new() -> Self {
        Self::with_limits(MAX_ATTEMPTS, WINDOW)
    }

    /// Custom limits, used by tests to avoid waiting out real windows.
    pub fn with_limits(max_attempts: u32, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            max_attempts,
            window,
        }
    }

    /// Register an attempt for `key`. On rejection returns the seconds
    /// until the caller's window resets.
    pub fn try_acquire(&self, key: &str) -> Result<(), u64> {
        let now = Instant::now();
        let mut entry = self
            .windows
            .entry(key.to_string())
            .or_insert_with(|| Window {
                started_at: now,
                attempts: 0,
            });

        if now.duration_since(entry.started_at) >= self.window {
            entry.started_at = now;
            entry.attempts = 0;
        }

        if entry.attempts >= self.max_attempts {
            let elapsed = now.duration_since(entry.started_at);
            let retry_after = self.window.saturating_sub(elapsed).as_secs().max(1);
            return Err(retry_after);
        }

        entry.attempts += 1;
        Ok(())
    }
}

/// Rate-limit key for a request. The dashboard runs behind nginx, so the
/// first `X-Forwarded-For` hop identifies the caller; direct connections
/// share one local bucket.
pub fn caller_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .unwrap_or_else(|| "local".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_is_per_key() {
        let limiter = LoginRateLimiter::with_limits(2, Duration::from_secs(60));

        assert!(limiter.try_acquire("1.1.1.1").is_ok());
        assert!(limiter.try_acquire("1.1.1.1").is_ok());
        assert!(limiter.try_acquire("1.1.1.1").is_err());

        // A different caller is unaffected.
        assert!(limiter.try_acquire("2.2.2.2").is_ok());
    }

    #[test]
    fn test_rejection_reports_remaining_window() {
        let limiter = LoginRateLimiter::with_limits(1, Duration::from_secs(60));

        limiter.try_acquire("k").unwrap();
        let retry_after = limiter.try_acquire("k").unwrap_err();
        assert!(retry_after >= 1 && retry_after <= 60);
    }

    #[test]
    fn test_window_resets() {
        let limiter = LoginRateLimiter::with_limits(1, Duration::from_millis(20));

        limiter.try_acquire("k").unwrap();
        assert!(limiter.try_acquire("k").is_err());

        std::thread::sleep(Duration::from_millis(25));
        assert!(limiter.try_acquire("k").is_ok());
    }

    #[test]
    fn test_caller_key_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.9, 10.0.0.1".parse().unwrap());
        assert_eq!(caller_key(&headers), "203.0.113.9");

        assert_eq!(caller_key(&HeaderMap::new()), "local");
    }
}
