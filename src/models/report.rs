// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Report rows for the compliance dashboard.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Per-system compliance for one quarter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SystemReport {
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub system_id: Option<u64>,
    /// System label ("N/A" when the record carries none)
    pub system_abbrev: String,
    /// Pending plus rescheduled
    pub pending: u32,
    pub completed: u32,
    /// Rounded percentage of completed activities
    pub compliance_percent: u32,
    /// True only at 100% compliance
    pub meets: bool,
}

/// Activity counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StatusSummary {
    pub pending: u32,
    pub rescheduled: u32,
    pub completed: u32,
}
