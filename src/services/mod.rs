// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod executor;
pub mod expiry;
pub mod grouping;
pub mod report;

pub use executor::{AppliedPlan, PlanExecutor};
pub use expiry::{ExpiryGuard, ExpiryPolicy, ExpiryStatus};
pub use grouping::ActivityGroupingEngine;
