// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Applies mutation plans to the activity store.
//!
//! Each plan variant maps 1:1 onto store calls. Nothing here retries; the
//! first failing call aborts the plan and earlier calls stay applied.
//! Every new assignment queues an `ActivityAssigned` notification.

use crate::db::ActivityStore;
use crate::error::AppError;
use crate::models::{
    ActivityId, ActivityStatus, ActivityUpdate, MutationPlan, Notification, NotificationKind,
    UserId,
};
use crate::services::expiry::format_utc_rfc3339;
use futures_util::{stream, StreamExt};
use serde::Serialize;

const MAX_CONCURRENT_STORE_OPS: usize = 16;

/// Outcome of applying a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppliedPlan {
    /// ID of the record created by the plan, if any
    pub created_id: Option<ActivityId>,
    /// Existing records touched (updated or deleted)
    pub affected_ids: Vec<ActivityId>,
    /// Users assigned to the created record
    pub assigned_users: usize,
}

/// Translates plans into store calls.
#[derive(Clone)]
pub struct PlanExecutor {
    store: ActivityStore,
}

impl PlanExecutor {
    pub fn new(store: ActivityStore) -> Self {
        Self { store }
    }

    /// Assign one user and queue the notice if the assignment is new.
    async fn assign_and_notify(
        &self,
        user_id: UserId,
        activity_id: ActivityId,
    ) -> Result<bool, AppError> {
        if !self.store.assign_user(user_id, activity_id).await? {
            return Ok(false);
        }
        self.store
            .enqueue_notification(Notification {
                user_id,
                activity_id,
                kind: NotificationKind::ActivityAssigned,
                compliance: None,
                created_at: format_utc_rfc3339(chrono::Utc::now()),
            })
            .await?;
        Ok(true)
    }

    /// Apply one plan.
    pub async fn apply(&self, plan: MutationPlan) -> Result<AppliedPlan, AppError> {
        let affected_ids = plan.affected_ids();

        match plan {
            MutationPlan::CreateActivity {
                activity,
                assign_user_ids,
            } => {
                let created = self.store.create_activity(activity).await?;
                let activity_id = created.activity_id;
                let assigned_users = assign_user_ids.len();

                let notified = stream::iter(assign_user_ids)
                    .map(|user_id| self.assign_and_notify(user_id, activity_id))
                    .buffer_unordered(MAX_CONCURRENT_STORE_OPS)
                    .collect::<Vec<Result<bool, AppError>>>()
                    .await
                    .into_iter()
                    .collect::<Result<Vec<bool>, AppError>>()?
                    .into_iter()
                    .filter(|&new| new)
                    .count();

                tracing::info!(activity_id, assigned_users, notified, "Applied create plan");
                Ok(AppliedPlan {
                    created_id: Some(activity_id),
                    affected_ids,
                    assigned_users,
                })
            }
            MutationPlan::DeleteActivity { activity_id } => {
                self.store.delete_activity_and_relations(activity_id).await?;

                tracing::info!(activity_id, "Applied delete plan");
                Ok(AppliedPlan {
                    affected_ids,
                    ..Default::default()
                })
            }
            MutationPlan::UpdateActivities {
                activity_ids,
                changes,
            } => {
                for activity_id in &activity_ids {
                    self.store
                        .update_activity_fields(*activity_id, &changes)
                        .await?;
                }

                tracing::info!(activities = ?activity_ids, ?changes, "Applied update plan");
                Ok(AppliedPlan {
                    affected_ids,
                    ..Default::default()
                })
            }
            MutationPlan::RescheduleActivities { due_date, changes } => {
                let update = ActivityUpdate {
                    status: Some(ActivityStatus::Rescheduled),
                    under_review: None,
                    due_date: Some(due_date),
                };

                for change in changes {
                    self.store
                        .update_activity_fields(change.activity_id, &update)
                        .await?;
                    self.store.record_date_change(change).await?;
                }

                tracing::info!(activities = ?affected_ids, %due_date, "Applied reschedule plan");
                Ok(AppliedPlan {
                    affected_ids,
                    ..Default::default()
                })
            }
        }
    }
}
