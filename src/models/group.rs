// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Display-level aggregate of sibling activity records.

use crate::models::activity::{ActivityId, ActivityRecord, ActivityStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Logical identity shared by the records of one group.
///
/// A missing name is the empty string and a missing id is `None`; both are
/// concrete values, so two records that both lack a team still match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GroupKey {
    pub activity_name: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub system_id: Option<u64>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub management_unit_id: Option<u64>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub team_id: Option<u64>,
}

impl GroupKey {
    pub fn of(record: &ActivityRecord) -> Self {
        Self {
            activity_name: record.activity_name.clone().unwrap_or_default(),
            system_id: record.system_id,
            management_unit_id: record.management_unit_id,
            team_id: record.team_id,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let part = |id: Option<u64>| id.map(|v| v.to_string()).unwrap_or_default();
        write!(
            f,
            "{}|{}|{}|{}",
            self.activity_name,
            part(self.system_id),
            part(self.management_unit_id),
            part(self.team_id)
        )
    }
}

/// Grouped view of all records sharing a [`GroupKey`].
///
/// Rebuilt from scratch whenever the record list changes; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityGroup {
    pub key: GroupKey,
    /// Member activity IDs in first-seen order
    #[cfg_attr(feature = "binding-generation", ts(type = "Array<number>"))]
    pub member_ids: Vec<ActivityId>,
    /// Member snapshots, parallel to `member_ids`
    pub members: Vec<ActivityRecord>,
    pub deliverable_names: Vec<String>,
    #[cfg_attr(feature = "binding-generation", ts(type = "Array<number>"))]
    pub deliverable_type_ids: Vec<u64>,
    pub status: ActivityStatus,
    pub under_review: bool,
    /// Sorted union of member quarters
    pub quarters: Vec<u8>,
    /// Latest known member due date
    pub due_date: Option<NaiveDate>,
    /// Sum over members; a user assigned to two members counts twice
    pub assigned_user_count: u32,
}

impl ActivityGroup {
    /// Start a group from its first record.
    pub(crate) fn seed(record: &ActivityRecord) -> Self {
        let mut group = Self {
            key: GroupKey::of(record),
            member_ids: Vec::new(),
            members: Vec::new(),
            deliverable_names: Vec::new(),
            deliverable_type_ids: Vec::new(),
            status: ActivityStatus::Completed,
            under_review: false,
            quarters: Vec::new(),
            due_date: None,
            assigned_user_count: 0,
        };
        group.fold(record);
        group
    }

    /// Fold one more member into the derived fields.
    pub(crate) fn fold(&mut self, record: &ActivityRecord) {
        self.member_ids.push(record.activity_id);
        self.members.push(record.clone());

        if let Some(type_id) = record.deliverable_type_id {
            if !self.deliverable_type_ids.contains(&type_id) {
                self.deliverable_type_ids.push(type_id);
            }
            if let Some(name) = &record.deliverable_type_name {
                if !self.deliverable_names.contains(name) {
                    self.deliverable_names.push(name.clone());
                }
            }
        }

        self.assigned_user_count = self
            .assigned_user_count
            .saturating_add(record.assigned_user_count);
        self.under_review |= record.under_review;

        self.status = merge_status(self.member_ids.len() == 1, self.status, record.status);

        if let Some(due) = record.due_date {
            if self.due_date.map_or(true, |current| due > current) {
                self.due_date = Some(due);
            }
        }

        for quarter in record.effective_quarters() {
            if !self.quarters.contains(&quarter) {
                self.quarters.push(quarter);
            }
        }
        self.quarters.sort_unstable();
    }

    /// Handle used to address the group: its first member.
    pub fn primary_id(&self) -> Option<ActivityId> {
        self.member_ids.first().copied()
    }

    /// Check whether every member is completed.
    pub fn is_fully_completed(&self) -> bool {
        self.status.is_completed()
    }

    pub fn contains(&self, activity_id: ActivityId) -> bool {
        self.member_ids.contains(&activity_id)
    }

    /// Member that represents the given deliverable type.
    pub fn member_for_deliverable(&self, deliverable_type_id: u64) -> Option<&ActivityRecord> {
        self.members
            .iter()
            .find(|m| m.deliverable_type_id == Some(deliverable_type_id))
    }
}

/// Incremental status merge.
///
/// The running status stays `Completed` only while every member folded so
/// far is completed; once any member is rescheduled it stays `Rescheduled`.
fn merge_status(first: bool, current: ActivityStatus, incoming: ActivityStatus) -> ActivityStatus {
    if first {
        return incoming;
    }
    match (current, incoming) {
        (ActivityStatus::Completed, ActivityStatus::Completed) => ActivityStatus::Completed,
        (ActivityStatus::Rescheduled, _) | (_, ActivityStatus::Rescheduled) => {
            ActivityStatus::Rescheduled
        }
        _ => ActivityStatus::Pending,
    }
}
