// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Outbound notifications, queued for a mail sender to pick up.

use crate::models::activity::{ActivityId, Compliance, UserId};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// The user was assigned to the activity
    ActivityAssigned,
    /// The user reported their compliance; addressed to the activity's admins
    ComplianceReported,
}

/// One queued notification about a user and an activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Notification {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: UserId,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub activity_id: ActivityId,
    pub kind: NotificationKind,
    /// Reported verdict, for `ComplianceReported`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance: Option<Compliance>,
    /// Queue timestamp (RFC3339)
    pub created_at: String,
}
