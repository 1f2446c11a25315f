// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plan-Tracker API Server
//!
//! Serves grouped activity views and group mutations for the systems plan
//! dashboard.

use plan_tracker::{config::Config, db::ActivityStore, models::ActivityRecord, AppState};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Plan-Tracker API");

    // Build the activity store, optionally preloaded
    let store = match &config.seed_file {
        Some(path) => load_seed(path)?,
        None => ActivityStore::new(),
    };

    let state = Arc::new(AppState::new(config.clone(), store));
    tracing::info!(
        expires_at = ?state.expiry.expires_at(),
        max_date_changes = state.engine.max_date_changes(),
        "Services initialized"
    );

    // Build router
    let app = plan_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Load activity records from a JSON array file.
fn load_seed(path: &Path) -> anyhow::Result<ActivityStore> {
    tracing::info!(path = %path.display(), "Loading seed activities");
    let json = std::fs::read_to_string(path)?;
    let records: Vec<ActivityRecord> = serde_json::from_str(&json)?;
    let count = records.len();
    let store = ActivityStore::with_records(records)?;
    tracing::info!(count, "Seed activities loaded");
    Ok(store)
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), tracing_subscriber::filter::ParseError> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("plan_tracker=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
