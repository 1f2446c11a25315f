// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod group;
pub mod notification;
pub mod plan;
pub mod report;

pub use activity::{
    ActivityId, ActivityRecord, ActivityStatus, ActivityUpdate, Assignment, Compliance,
    DateChange, DeliverableFile, NewActivity, UserId,
};
pub use group::{ActivityGroup, GroupKey};
pub use notification::{Notification, NotificationKind};
pub use plan::MutationPlan;
pub use report::{StatusSummary, SystemReport};
