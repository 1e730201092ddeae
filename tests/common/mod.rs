// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::sync::Arc;
use support_dashboard::config::Config;
use support_dashboard::routes::create_router;
use support_dashboard::AppState;

/// Create a test app with both bots configured against unreachable
/// backends. Routes that never touch a store behave normally; data routes
/// surface the backing-store failure, which the error tests assert.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::test_default()));
    (create_router(state.clone()), state)
}

/// Bearer token accepted by the test app.
#[allow(dead_code)]
pub fn create_test_jwt(state: &AppState) -> String {
    support_dashboard::middleware::auth::create_jwt(&state.config.jwt_secret)
        .expect("Failed to create test JWT")
}

/// Live-database test guard. Set `TEST_DATABASE_URL` to run tests that
/// need a disposable PostgreSQL instance.
#[allow(dead_code)]
pub fn test_database_url() -> Option<String> {
    std::env::var("TEST_DATABASE_URL").ok()
}

/// Skip test with a message if no test database is configured.
#[macro_export]
macro_rules! require_test_db {
    () => {
        match crate::common::test_database_url() {
            Some(url) => url,
            None => {
                eprintln!("⚠️  Skipping: TEST_DATABASE_URL not set");
                return;
            }
        }
    };
}
