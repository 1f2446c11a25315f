// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory activity store.
//!
//! Provides the operations the grouping workflow needs for:
//! - Activities (list, create, update, delete with relations)
//! - Assignments (users assigned to an activity, with their compliance)
//! - Date changes (per-activity change log and counter)
//! - Deliverable files (upload records that flag an activity for review)
//! - Notifications (outbox of assignment and compliance notices)

use crate::db::ActivityFilter;
use crate::error::AppError;
use crate::models::{
    ActivityId, ActivityRecord, ActivityUpdate, Assignment, Compliance, DateChange,
    DeliverableFile, NewActivity, Notification, NotificationKind, UserId,
};
use crate::services::expiry::format_utc_rfc3339;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct Tables {
    activities: DashMap<ActivityId, ActivityRecord>,
    assignments: DashMap<ActivityId, Vec<Assignment>>,
    date_changes: DashMap<ActivityId, Vec<DateChange>>,
    deliverable_files: DashMap<ActivityId, Vec<DeliverableFile>>,
    /// Keyed by the user the notice is about
    notifications: DashMap<UserId, Vec<Notification>>,
    /// Highest ID handed out so far
    last_id: AtomicU64,
}

/// Activity store handle. Clones share the same tables.
#[derive(Clone, Default)]
pub struct ActivityStore {
    tables: Arc<Tables>,
}

impl ActivityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with records (IDs are kept).
    ///
    /// `assigned_user_ids` on each record become assignments.
    pub fn with_records(records: Vec<ActivityRecord>) -> Result<Self, AppError> {
        let store = Self::new();
        for record in records {
            store.insert_record(record)?;
        }
        Ok(store)
    }

    fn insert_record(&self, mut record: ActivityRecord) -> Result<(), AppError> {
        let id = record.activity_id;
        if self.tables.activities.contains_key(&id) {
            return Err(AppError::BadRequest(format!(
                "Duplicate activity id {}",
                id
            )));
        }

        let mut users: Vec<Assignment> = Vec::new();
        for user_id in std::mem::take(&mut record.assigned_user_ids) {
            if !users.iter().any(|a| a.user_id == user_id) {
                users.push(Assignment::new(user_id));
            }
        }
        record.assigned_user_count = 0;
        self.tables.activities.insert(id, record);
        if !users.is_empty() {
            self.tables.assignments.insert(id, users);
        }
        self.tables.last_id.fetch_max(id, Ordering::SeqCst);
        Ok(())
    }

    fn not_found(activity_id: ActivityId) -> AppError {
        AppError::NotFound(format!("Activity {} not found", activity_id))
    }

    // ─── Activity Operations ─────────────────────────────────────

    /// List activities visible under a filter, in ID order.
    ///
    /// Assigned users are filled in on each record.
    pub async fn list_activities(
        &self,
        filter: &ActivityFilter,
    ) -> Result<Vec<ActivityRecord>, AppError> {
        let mut records: Vec<ActivityRecord> = self
            .tables
            .activities
            .iter()
            .filter(|entry| match filter {
                ActivityFilter::All => true,
                ActivityFilter::Systems(ids) => entry
                    .value()
                    .system_id
                    .is_some_and(|id| ids.contains(&id)),
                ActivityFilter::AssignedTo(user_id) => self
                    .tables
                    .assignments
                    .get(entry.key())
                    .is_some_and(|users| users.iter().any(|a| a.user_id == *user_id)),
            })
            .map(|entry| {
                let mut record = entry.value().clone();
                let users = self
                    .tables
                    .assignments
                    .get(&record.activity_id)
                    .map(|users| users.iter().map(|a| a.user_id).collect::<Vec<_>>())
                    .unwrap_or_default();
                record.assigned_user_count = users.len() as u32;
                record.assigned_user_ids = users;
                record
            })
            .collect();

        records.sort_by_key(|r| r.activity_id);
        Ok(records)
    }

    /// Get one activity.
    pub async fn get_activity(&self, activity_id: ActivityId) -> Result<ActivityRecord, AppError> {
        self.tables
            .activities
            .get(&activity_id)
            .map(|r| r.value().clone())
            .ok_or_else(|| Self::not_found(activity_id))
    }

    /// Create an activity and return the stored record.
    pub async fn create_activity(&self, activity: NewActivity) -> Result<ActivityRecord, AppError> {
        let id = self.tables.last_id.fetch_add(1, Ordering::SeqCst) + 1;

        let record = activity.into_record(id);
        self.tables.activities.insert(id, record.clone());

        tracing::info!(activity_id = id, "Created activity");
        Ok(record)
    }

    /// Delete an activity together with its assignments, deliverable files
    /// and date-change log.
    pub async fn delete_activity_and_relations(
        &self,
        activity_id: ActivityId,
    ) -> Result<(), AppError> {
        self.tables
            .activities
            .remove(&activity_id)
            .ok_or_else(|| Self::not_found(activity_id))?;

        let assignments = self
            .tables
            .assignments
            .remove(&activity_id)
            .map_or(0, |(_, users)| users.len());
        let files = self
            .tables
            .deliverable_files
            .remove(&activity_id)
            .map_or(0, |(_, files)| files.len());
        self.tables.date_changes.remove(&activity_id);

        tracing::info!(activity_id, assignments, files, "Deleted activity and relations");
        Ok(())
    }

    /// Apply a partial update to an activity.
    pub async fn update_activity_fields(
        &self,
        activity_id: ActivityId,
        update: &ActivityUpdate,
    ) -> Result<(), AppError> {
        let mut record = self
            .tables
            .activities
            .get_mut(&activity_id)
            .ok_or_else(|| Self::not_found(activity_id))?;
        update.apply_to(&mut record);

        tracing::debug!(activity_id, ?update, "Updated activity");
        Ok(())
    }

    // ─── Assignment Operations ───────────────────────────────────

    /// Users assigned to an activity.
    pub async fn list_assigned_users(
        &self,
        activity_id: ActivityId,
    ) -> Result<Vec<Assignment>, AppError> {
        if !self.tables.activities.contains_key(&activity_id) {
            return Err(Self::not_found(activity_id));
        }
        Ok(self
            .tables
            .assignments
            .get(&activity_id)
            .map(|users| users.value().clone())
            .unwrap_or_default())
    }

    /// Assign a user to an activity. Assigning twice is a no-op.
    ///
    /// Returns `true` when the assignment is new.
    pub async fn assign_user(
        &self,
        user_id: UserId,
        activity_id: ActivityId,
    ) -> Result<bool, AppError> {
        if !self.tables.activities.contains_key(&activity_id) {
            return Err(Self::not_found(activity_id));
        }
        let mut users = self.tables.assignments.entry(activity_id).or_default();
        if users.iter().any(|a| a.user_id == user_id) {
            return Ok(false);
        }
        users.push(Assignment::new(user_id));
        Ok(true)
    }

    /// Record a user's own compliance verdict on an assigned activity.
    ///
    /// Does not change the activity status; admins approve separately.
    /// Queues a `ComplianceReported` notification.
    pub async fn update_compliance(
        &self,
        user_id: UserId,
        activity_id: ActivityId,
        compliance: Compliance,
    ) -> Result<Assignment, AppError> {
        if !self.tables.activities.contains_key(&activity_id) {
            return Err(Self::not_found(activity_id));
        }
        let updated = {
            let mut users = self
                .tables
                .assignments
                .get_mut(&activity_id)
                .ok_or_else(|| Self::not_assigned(user_id, activity_id))?;
            let assignment = users
                .iter_mut()
                .find(|a| a.user_id == user_id)
                .ok_or_else(|| Self::not_assigned(user_id, activity_id))?;
            assignment.compliance = compliance;
            *assignment
        };

        self.enqueue_notification(Notification {
            user_id,
            activity_id,
            kind: NotificationKind::ComplianceReported,
            compliance: Some(compliance),
            created_at: format_utc_rfc3339(chrono::Utc::now()),
        })
        .await?;

        tracing::info!(user_id, activity_id, ?compliance, "Compliance updated");
        Ok(updated)
    }

    fn not_assigned(user_id: UserId, activity_id: ActivityId) -> AppError {
        AppError::NotFound(format!(
            "User {} is not assigned to activity {}",
            user_id, activity_id
        ))
    }

    // ─── Date Change Operations ──────────────────────────────────

    /// Number of due-date changes recorded for an activity.
    pub async fn date_change_count(&self, activity_id: ActivityId) -> Result<u32, AppError> {
        Ok(self
            .tables
            .date_changes
            .get(&activity_id)
            .map_or(0, |changes| changes.len() as u32))
    }

    /// Log a due-date change.
    pub async fn record_date_change(&self, change: DateChange) -> Result<(), AppError> {
        if !self.tables.activities.contains_key(&change.activity_id) {
            return Err(Self::not_found(change.activity_id));
        }
        self.tables
            .date_changes
            .entry(change.activity_id)
            .or_default()
            .push(change);
        Ok(())
    }

    // ─── Deliverable Operations ──────────────────────────────────

    /// Record an uploaded deliverable and flag the activity for review.
    ///
    /// Completed activities keep `under_review` unset.
    pub async fn record_deliverable_upload(
        &self,
        activity_id: ActivityId,
        file_name: &str,
        uploaded_by: UserId,
    ) -> Result<DeliverableFile, AppError> {
        let mut record = self
            .tables
            .activities
            .get_mut(&activity_id)
            .ok_or_else(|| Self::not_found(activity_id))?;
        if !record.status.is_completed() {
            record.under_review = true;
        }
        drop(record);

        let file = DeliverableFile {
            activity_id,
            file_name: file_name.to_string(),
            uploaded_by,
            uploaded_at: format_utc_rfc3339(chrono::Utc::now()),
        };
        self.tables
            .deliverable_files
            .entry(activity_id)
            .or_default()
            .push(file.clone());

        tracing::info!(activity_id, file_name, uploaded_by, "Deliverable uploaded");
        Ok(file)
    }

    /// Deliverable files uploaded for an activity.
    pub async fn list_deliverable_files(
        &self,
        activity_id: ActivityId,
    ) -> Result<Vec<DeliverableFile>, AppError> {
        Ok(self
            .tables
            .deliverable_files
            .get(&activity_id)
            .map(|files| files.value().clone())
            .unwrap_or_default())
    }

    // ─── Notification Operations ─────────────────────────────────

    /// Queue a notification in the outbox.
    pub async fn enqueue_notification(&self, notification: Notification) -> Result<(), AppError> {
        tracing::info!(
            user_id = notification.user_id,
            activity_id = notification.activity_id,
            kind = ?notification.kind,
            "Notification queued"
        );
        self.tables
            .notifications
            .entry(notification.user_id)
            .or_default()
            .push(notification);
        Ok(())
    }

    /// Queued notifications about a user, oldest first.
    pub async fn list_notifications(&self, user_id: UserId) -> Result<Vec<Notification>, AppError> {
        Ok(self
            .tables
            .notifications
            .get(&user_id)
            .map(|n| n.value().clone())
            .unwrap_or_default())
    }
}
