// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use plan_tracker::config::Config;
use plan_tracker::db::ActivityStore;
use plan_tracker::models::{ActivityRecord, ActivityStatus};
use plan_tracker::routes::create_router;
use plan_tracker::AppState;
use std::sync::Arc;
use tower::ServiceExt;

/// Build an activity record for tests.
#[allow(dead_code)]
pub fn make_record(
    id: u64,
    name: &str,
    deliverable: u64,
    quarters: Vec<u8>,
    status: ActivityStatus,
) -> ActivityRecord {
    ActivityRecord {
        activity_id: id,
        activity_name: Some(name.to_string()),
        system_id: Some(1),
        system_abbrev: Some("SAP".to_string()),
        team_id: Some(3),
        management_unit_id: Some(2),
        deliverable_type_id: Some(deliverable),
        deliverable_type_name: Some(format!("Deliverable {}", deliverable)),
        quarters,
        quarter: None,
        status,
        under_review: false,
        due_date: None,
        assigned_user_count: 0,
        assigned_user_ids: vec![],
    }
}

#[allow(dead_code)]
pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Two groups: "Backup review" (ids 1, 2) and "Access audit" (id 3).
#[allow(dead_code)]
pub fn seed_records() -> Vec<ActivityRecord> {
    let mut first = make_record(1, "Backup review", 10, vec![1], ActivityStatus::Pending);
    first.assigned_user_ids = vec![100, 101];
    first.due_date = Some(ymd(2025, 3, 31));

    let mut second = make_record(2, "Backup review", 11, vec![2], ActivityStatus::Completed);
    second.assigned_user_ids = vec![101, 102];
    second.due_date = Some(ymd(2025, 6, 30));

    let mut third = make_record(3, "Access audit", 10, vec![1], ActivityStatus::Pending);
    third.system_id = Some(2);
    third.system_abbrev = Some("CRM".to_string());
    third.assigned_user_ids = vec![200];

    vec![first, second, third]
}

/// Create a test app over a seeded in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(Config::default(), seed_records())
}

#[allow(dead_code)]
pub fn create_test_app_with(
    config: Config,
    records: Vec<ActivityRecord>,
) -> (axum::Router, Arc<AppState>) {
    let store = ActivityStore::with_records(records).expect("Failed to seed store");
    let state = Arc::new(AppState::new(config, store));
    (create_router(state.clone()), state)
}

/// Send a request and decode the JSON response.
#[allow(dead_code)]
pub async fn send(
    app: axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}
