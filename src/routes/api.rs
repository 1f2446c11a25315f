// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Group routes: list grouped activities and change a group, plus the
//! per-activity deliverable file log, assignment compliance, and the
//! notification outbox.
//!
//! A group is addressed by any of its member activity IDs. Every mutation
//! re-reads the store, regroups, plans, applies, then regroups again.

use crate::db::ActivityFilter;
use crate::error::{AppError, Result};
use crate::models::{
    ActivityGroup, ActivityId, ActivityStatus, Assignment, Compliance, DeliverableFile,
    MutationPlan, Notification, UserId,
};
use crate::quarters::parse_due_date;
use crate::services::grouping::find_group;
use crate::services::AppliedPlan;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Group routes (subject to the access-period check in routes/mod.rs).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/groups", get(list_groups))
        .route("/api/groups/{id}/deliverables", post(add_deliverable))
        .route(
            "/api/groups/{id}/deliverables/{deliverable_type_id}",
            delete(remove_deliverable),
        )
        .route("/api/groups/{id}/complete", post(complete_group))
        .route("/api/groups/{id}/reschedule", post(reschedule_group))
        .route(
            "/api/activities/{id}/files",
            get(list_deliverable_files).post(record_deliverable_file),
        )
        .route("/api/activities/{id}/assignments", get(list_assignments))
        .route(
            "/api/activities/{id}/assignments/{user_id}/compliance",
            put(update_compliance),
        )
        .route("/api/users/{user_id}/notifications", get(list_notifications))
}

// ─── Listing ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct GroupsQuery {
    /// Admin view: restrict to one system
    system_id: Option<u64>,
    /// User view: activities assigned to this user
    user_id: Option<u64>,
}

impl GroupsQuery {
    fn filter(&self) -> ActivityFilter {
        match (self.user_id, self.system_id) {
            (Some(user_id), _) => ActivityFilter::AssignedTo(user_id),
            (None, Some(system_id)) => ActivityFilter::Systems(vec![system_id]),
            (None, None) => ActivityFilter::All,
        }
    }
}

/// List grouped activities visible under the requested view.
async fn list_groups(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GroupsQuery>,
) -> Result<Json<Vec<ActivityGroup>>> {
    let records = state.store.list_activities(&params.filter()).await?;
    let groups = state.engine.group(&records);

    tracing::debug!(
        system_id = ?params.system_id,
        user_id = ?params.user_id,
        groups = groups.len(),
        "Listing groups"
    );
    Ok(Json(groups))
}

// ─── Mutations ───────────────────────────────────────────────

/// Result of a group mutation.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GroupMutationResponse {
    pub plan: MutationPlan,
    #[cfg_attr(feature = "binding-generation", ts(skip))]
    pub applied: AppliedPlan,
    /// The group after the change; `None` once its last member is gone
    pub group: Option<ActivityGroup>,
}

/// Regroup the whole store and pick the group containing `activity_id`.
async fn load_group(state: &AppState, activity_id: ActivityId) -> Result<ActivityGroup> {
    let records = state.store.list_activities(&ActivityFilter::All).await?;
    let groups = state.engine.group(&records);
    Ok(find_group(&groups, activity_id)?.clone())
}

/// Apply a plan and return the regrouped view around `anchor_ids`.
async fn apply_and_regroup(
    state: &AppState,
    plan: MutationPlan,
    anchor_ids: &[ActivityId],
) -> Result<GroupMutationResponse> {
    let applied = state.executor.apply(plan.clone()).await?;

    let records = state.store.list_activities(&ActivityFilter::All).await?;
    let groups = state.engine.group(&records);
    let group = anchor_ids
        .iter()
        .chain(applied.created_id.iter())
        .find_map(|id| find_group(&groups, *id).ok())
        .cloned();

    Ok(GroupMutationResponse {
        plan,
        applied,
        group,
    })
}

#[derive(Deserialize, Validate)]
struct AddDeliverableRequest {
    deliverable_type_id: u64,
    #[validate(length(min = 1, max = 200))]
    deliverable_type_name: Option<String>,
}

/// Add a deliverable type to a group by creating a sibling activity.
async fn add_deliverable(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ActivityId>,
    Json(body): Json<AddDeliverableRequest>,
) -> Result<(StatusCode, Json<GroupMutationResponse>)> {
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let group = load_group(&state, id).await?;
    let plan = state.engine.add_deliverable(
        &group,
        body.deliverable_type_id,
        body.deliverable_type_name,
    )?;

    tracing::info!(
        group = %group.key,
        deliverable_type_id = body.deliverable_type_id,
        "Adding deliverable to group"
    );

    let response = apply_and_regroup(&state, plan, &group.member_ids).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Remove a deliverable type from a group by deleting its activity.
async fn remove_deliverable(
    State(state): State<Arc<AppState>>,
    Path((id, deliverable_type_id)): Path<(ActivityId, u64)>,
) -> Result<Json<GroupMutationResponse>> {
    let group = load_group(&state, id).await?;
    let plan = state.engine.remove_deliverable(&group, deliverable_type_id)?;

    tracing::info!(
        group = %group.key,
        deliverable_type_id,
        "Removing deliverable from group"
    );

    let response = apply_and_regroup(&state, plan, &group.member_ids).await?;
    Ok(Json(response))
}

/// Approve a group: mark every member completed.
async fn complete_group(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ActivityId>,
) -> Result<Json<GroupMutationResponse>> {
    let group = load_group(&state, id).await?;
    if group.is_fully_completed() {
        return Err(AppError::Conflict(format!(
            "Group '{}' is already completed",
            group.key
        )));
    }

    let plan = state
        .engine
        .change_status(&group, ActivityStatus::Completed)?;

    tracing::info!(group = %group.key, members = group.member_ids.len(), "Completing group");

    let response = apply_and_regroup(&state, plan, &group.member_ids).await?;
    Ok(Json(response))
}

#[derive(Deserialize)]
struct RescheduleRequest {
    /// New due date (YYYY-MM-DD)
    due_date: String,
    /// Admin making the change
    changed_by: Option<UserId>,
}

/// Move a group to a new due date.
///
/// The change count is the highest count among the members, so no member
/// exceeds the limit.
async fn reschedule_group(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ActivityId>,
    Json(body): Json<RescheduleRequest>,
) -> Result<Json<GroupMutationResponse>> {
    let due_date = parse_due_date(&body.due_date)?;
    let group = load_group(&state, id).await?;

    let mut changes_so_far = 0;
    for member_id in &group.member_ids {
        changes_so_far = changes_so_far.max(state.store.date_change_count(*member_id).await?);
    }

    let plan = state
        .engine
        .reschedule(&group, due_date, changes_so_far, body.changed_by)?;

    tracing::info!(
        group = %group.key,
        %due_date,
        changes_so_far,
        "Rescheduling group"
    );

    let response = apply_and_regroup(&state, plan, &group.member_ids).await?;
    Ok(Json(response))
}

// ─── Deliverable files ───────────────────────────────────────

#[derive(Deserialize, Validate)]
struct DeliverableFileRequest {
    #[validate(length(min = 1, max = 255))]
    file_name: String,
    uploaded_by: UserId,
}

/// Record an uploaded deliverable file; flags the activity for review.
async fn record_deliverable_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ActivityId>,
    Json(body): Json<DeliverableFileRequest>,
) -> Result<(StatusCode, Json<DeliverableFile>)> {
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let file = state
        .store
        .record_deliverable_upload(id, &body.file_name, body.uploaded_by)
        .await?;
    Ok((StatusCode::CREATED, Json(file)))
}

async fn list_deliverable_files(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ActivityId>,
) -> Result<Json<Vec<DeliverableFile>>> {
    state.store.get_activity(id).await?;
    Ok(Json(state.store.list_deliverable_files(id).await?))
}

// ─── Assignments ─────────────────────────────────────────────

async fn list_assignments(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ActivityId>,
) -> Result<Json<Vec<Assignment>>> {
    Ok(Json(state.store.list_assigned_users(id).await?))
}

#[derive(Deserialize)]
struct ComplianceRequest {
    compliance: Compliance,
}

/// A user marks their part of an activity as done (or not).
///
/// The activity stays open until an admin completes the group.
async fn update_compliance(
    State(state): State<Arc<AppState>>,
    Path((id, user_id)): Path<(ActivityId, UserId)>,
    Json(body): Json<ComplianceRequest>,
) -> Result<Json<Assignment>> {
    if body.compliance == Compliance::Pending {
        return Err(AppError::BadRequest(
            "Compliance can only be set to complies or does_not_comply".to_string(),
        ));
    }

    let assignment = state
        .store
        .update_compliance(user_id, id, body.compliance)
        .await?;
    Ok(Json(assignment))
}

/// Notification outbox for one user.
async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<Notification>>> {
    Ok(Json(state.store.list_notifications(user_id).await?))
}
