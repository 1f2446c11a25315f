// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mutation plans: descriptions of the store calls a group action needs.

use crate::models::activity::{ActivityId, ActivityUpdate, DateChange, NewActivity, UserId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Concrete store mutations computed by the grouping engine.
///
/// Plans are values; applying them is the caller's job (see
/// [`crate::services::executor`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MutationPlan {
    /// Create one record and (re-)assign the group's users to it.
    CreateActivity {
        activity: NewActivity,
        #[cfg_attr(feature = "binding-generation", ts(type = "Array<number>"))]
        assign_user_ids: Vec<UserId>,
    },
    /// Delete one record together with its relations.
    DeleteActivity {
        #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
        activity_id: ActivityId,
    },
    /// Apply the same field changes to every listed record.
    UpdateActivities {
        #[cfg_attr(feature = "binding-generation", ts(type = "Array<number>"))]
        activity_ids: Vec<ActivityId>,
        changes: ActivityUpdate,
    },
    /// Move every listed record to a new due date and log each change.
    RescheduleActivities {
        due_date: NaiveDate,
        changes: Vec<DateChange>,
    },
}

impl MutationPlan {
    /// Existing records touched by the plan.
    pub fn affected_ids(&self) -> Vec<ActivityId> {
        match self {
            MutationPlan::CreateActivity { .. } => Vec::new(),
            MutationPlan::DeleteActivity { activity_id } => vec![*activity_id],
            MutationPlan::UpdateActivities { activity_ids, .. } => activity_ids.clone(),
            MutationPlan::RescheduleActivities { changes, .. } => {
                changes.iter().map(|c| c.activity_id).collect()
            }
        }
    }
}
