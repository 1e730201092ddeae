// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Support Dashboard API Server
//!
//! Internal backend for the support dashboard: browse chatbot users,
//! therapy profiles, payments and chat logs across bot tenants.

use std::sync::Arc;
use support_dashboard::{config::Config, routes, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(
        port = config.port,
        bots = config.bots.len(),
        default_bot = %config.default_bot,
        "Starting support dashboard API"
    );

    // Build shared state; backing-store connections open lazily.
    let state = Arc::new(AppState::new(config));

    // Verify the default bot's store is reachable. Non-fatal: the health
    // endpoint keeps reporting until the store comes back.
    if state.adapters.check(&state.config.default_bot).await {
        tracing::info!(bot_id = %state.config.default_bot, "Backing store connection verified");
    } else {
        tracing::error!(bot_id = %state.config.default_bot, "Backing store connection failed");
    }

    // Build router
    let app = routes::create_router(state.clone());

    // Start server
    let addr = format!("0.0.0.0:{}", state.config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Drain backing-store connections once the listener has stopped.
    state.adapters.close_all().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("support_dashboard=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
