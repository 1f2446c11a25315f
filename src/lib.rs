// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Plan-Tracker: activity tracking for an organization's systems plan
//!
//! This crate groups activity records that share a logical identity into
//! display-level aggregates and plans the store mutations needed to change
//! them, with quarter and due-date helpers and a small JSON API.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod quarters;
pub mod routes;
pub mod services;

use config::Config;
use db::ActivityStore;
use services::{ActivityGroupingEngine, ExpiryGuard, PlanExecutor};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: ActivityStore,
    pub engine: ActivityGroupingEngine,
    pub executor: PlanExecutor,
    pub expiry: ExpiryGuard,
}

impl AppState {
    /// Wire the services for a store and configuration.
    ///
    /// The expiry trial, if any, starts now.
    pub fn new(config: Config, store: ActivityStore) -> Self {
        let engine = ActivityGroupingEngine::new(config.max_date_changes);
        let executor = PlanExecutor::new(store.clone());
        let expiry = ExpiryGuard::new(config.expiry.clone(), chrono::Utc::now());

        Self {
            config,
            store,
            engine,
            executor,
            expiry,
        }
    }
}
