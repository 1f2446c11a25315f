// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity grouping engine.
//!
//! Folds flat activity records into grouped view-models and computes the
//! mutation plans needed to change one group:
//! 1. Add a deliverable (create a sibling record)
//! 2. Remove a deliverable (delete the member record)
//! 3. Complete the group (update every member)
//! 4. Reschedule the group (new due date on every member)
//!
//! The engine holds no state besides its settings; every call takes a
//! snapshot and returns a fresh result.

use crate::error::EngineError;
use crate::models::{
    ActivityGroup, ActivityId, ActivityRecord, ActivityStatus, ActivityUpdate, DateChange,
    GroupKey, MutationPlan, NewActivity, UserId,
};
use crate::quarters::{is_date_in_quarter, quarter_of, quarter_out_of_range_message};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Default number of due-date changes allowed per record.
pub const DEFAULT_MAX_DATE_CHANGES: u32 = 2;

/// Groups activity records and plans group-level mutations.
#[derive(Debug, Clone)]
pub struct ActivityGroupingEngine {
    max_date_changes: u32,
}

impl Default for ActivityGroupingEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DATE_CHANGES)
    }
}

impl ActivityGroupingEngine {
    pub fn new(max_date_changes: u32) -> Self {
        Self { max_date_changes }
    }

    pub fn max_date_changes(&self) -> u32 {
        self.max_date_changes
    }

    /// Fold records into groups, in the order each key is first seen.
    ///
    /// Callers must not pass the same activity ID twice.
    pub fn group(&self, records: &[ActivityRecord]) -> Vec<ActivityGroup> {
        let mut index: HashMap<GroupKey, usize> = HashMap::new();
        let mut groups: Vec<ActivityGroup> = Vec::new();

        for record in records {
            let key = GroupKey::of(record);
            match index.get(&key) {
                Some(&pos) => groups[pos].fold(record),
                None => {
                    index.insert(key, groups.len());
                    groups.push(ActivityGroup::seed(record));
                }
            }
        }

        tracing::debug!(
            records = records.len(),
            groups = groups.len(),
            "Grouped activities"
        );
        groups
    }

    /// Plan a new sibling record for a deliverable type the group lacks.
    ///
    /// The new record clones the group's identity, quarters and due date
    /// from the first member, and every user assigned to any member is
    /// assigned to it as well.
    pub fn add_deliverable(
        &self,
        group: &ActivityGroup,
        deliverable_type_id: u64,
        deliverable_type_name: Option<String>,
    ) -> Result<MutationPlan, EngineError> {
        if group.deliverable_type_ids.contains(&deliverable_type_id) {
            return Err(EngineError::InvalidOperation(format!(
                "Deliverable type {} is already part of group '{}'",
                deliverable_type_id, group.key
            )));
        }

        let template = group.members.first().ok_or_else(|| {
            EngineError::InvalidOperation(format!(
                "Group '{}' has no members to clone from",
                group.key
            ))
        })?;

        let mut assign_user_ids: Vec<UserId> = Vec::new();
        for user_id in group.members.iter().flat_map(|m| &m.assigned_user_ids) {
            if !assign_user_ids.contains(user_id) {
                assign_user_ids.push(*user_id);
            }
        }

        let activity = NewActivity {
            activity_name: template.activity_name.clone(),
            system_id: template.system_id,
            system_abbrev: template.system_abbrev.clone(),
            team_id: template.team_id,
            management_unit_id: template.management_unit_id,
            deliverable_type_id: Some(deliverable_type_id),
            deliverable_type_name,
            quarters: template.effective_quarters(),
            status: ActivityStatus::Pending,
            under_review: false,
            due_date: template.due_date,
        };

        tracing::debug!(
            group = %group.key,
            deliverable_type_id,
            users = assign_user_ids.len(),
            "Planned deliverable addition"
        );

        Ok(MutationPlan::CreateActivity {
            activity,
            assign_user_ids,
        })
    }

    /// Plan the deletion of the member that carries a deliverable type.
    pub fn remove_deliverable(
        &self,
        group: &ActivityGroup,
        deliverable_type_id: u64,
    ) -> Result<MutationPlan, EngineError> {
        let member = group
            .member_for_deliverable(deliverable_type_id)
            .ok_or_else(|| {
                EngineError::NotFound(format!(
                    "Deliverable type {} is not part of group '{}'",
                    deliverable_type_id, group.key
                ))
            })?;

        Ok(MutationPlan::DeleteActivity {
            activity_id: member.activity_id,
        })
    }

    /// Plan a status change on every member of the group.
    ///
    /// Only `Completed` is a supported target. Callers must not invoke this
    /// on a group that is already fully completed; it is not re-checked here.
    pub fn change_status(
        &self,
        group: &ActivityGroup,
        new_status: ActivityStatus,
    ) -> Result<MutationPlan, EngineError> {
        if new_status != ActivityStatus::Completed {
            return Err(EngineError::InvalidOperation(format!(
                "Unsupported status transition to {:?}",
                new_status
            )));
        }

        Ok(MutationPlan::UpdateActivities {
            activity_ids: group.member_ids.clone(),
            changes: ActivityUpdate {
                status: Some(ActivityStatus::Completed),
                under_review: Some(false),
                due_date: None,
            },
        })
    }

    /// Plan a due-date change, moving every member to `Rescheduled`.
    ///
    /// `changes_so_far` comes from the store's change counter. A date outside
    /// the group's quarters is allowed but logged. `changed_by` is recorded on
    /// every logged change.
    pub fn reschedule(
        &self,
        group: &ActivityGroup,
        new_due_date: NaiveDate,
        changes_so_far: u32,
        changed_by: Option<UserId>,
    ) -> Result<MutationPlan, EngineError> {
        if changes_so_far >= self.max_date_changes {
            return Err(EngineError::InvalidOperation(format!(
                "Group '{}' already reached the maximum of {} date changes",
                group.key, self.max_date_changes
            )));
        }
        if group.is_fully_completed() {
            return Err(EngineError::InvalidOperation(format!(
                "Group '{}' is completed and cannot be rescheduled",
                group.key
            )));
        }
        if group.member_ids.is_empty() {
            return Err(EngineError::InvalidOperation(format!(
                "Group '{}' has no members",
                group.key
            )));
        }

        if !group.quarters.is_empty()
            && !group
                .quarters
                .iter()
                .any(|&q| is_date_in_quarter(new_due_date, q))
        {
            let hint = quarter_out_of_range_message(group.quarters[0]).unwrap_or_default();
            tracing::warn!(
                group = %group.key,
                due_date = %new_due_date,
                due_date_quarter = quarter_of(new_due_date),
                quarters = ?group.quarters,
                remaining = self.max_date_changes - changes_so_far - 1,
                %hint,
                "Due date falls outside the group's quarters"
            );
        }

        let changes = group
            .members
            .iter()
            .map(|m| DateChange {
                activity_id: m.activity_id,
                previous_due_date: m.due_date,
                new_due_date,
                changed_by,
            })
            .collect();

        Ok(MutationPlan::RescheduleActivities {
            due_date: new_due_date,
            changes,
        })
    }
}

/// Find the group that contains an activity.
pub fn find_group(
    groups: &[ActivityGroup],
    activity_id: ActivityId,
) -> Result<&ActivityGroup, EngineError> {
    groups
        .iter()
        .find(|g| g.contains(activity_id))
        .ok_or_else(|| EngineError::NotFound(format!("No group contains activity {}", activity_id)))
}

/// Expand groups back into their member records, in group order.
pub fn flatten(groups: &[ActivityGroup]) -> Vec<ActivityRecord> {
    groups.iter().flat_map(|g| g.members.iter().cloned()).collect()
}
