// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Grouping engine behaviour over realistic record sets.

use plan_tracker::error::EngineError;
use plan_tracker::models::{ActivityStatus, MutationPlan};
use plan_tracker::services::grouping::flatten;
use plan_tracker::services::ActivityGroupingEngine;

mod common;
use common::{make_record, seed_records, ymd};

#[test]
fn test_two_deliverables_form_one_group() {
    let engine = ActivityGroupingEngine::default();
    let records = vec![
        make_record(1, "A", 10, vec![1], ActivityStatus::Pending),
        make_record(2, "A", 11, vec![1], ActivityStatus::Completed),
    ];

    let groups = engine.group(&records);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].member_ids, vec![1, 2]);
    assert_eq!(groups[0].deliverable_type_ids, vec![10, 11]);
    assert_eq!(groups[0].status, ActivityStatus::Pending);
}

#[test]
fn test_status_derivation_law() {
    use ActivityStatus::*;
    let engine = ActivityGroupingEngine::default();
    let cases = [
        (vec![Completed, Completed], Completed),
        (vec![Completed, Rescheduled], Rescheduled),
        (vec![Pending, Completed], Pending),
        (vec![Pending, Rescheduled, Completed], Rescheduled),
    ];

    for (statuses, expected) in cases {
        let records: Vec<_> = statuses
            .iter()
            .enumerate()
            .map(|(i, s)| make_record(i as u64 + 1, "A", 10 + i as u64, vec![1], *s))
            .collect();
        let groups = engine.group(&records);
        assert_eq!(groups[0].status, expected, "statuses {:?}", statuses);
    }
}

#[test]
fn test_grouping_is_deterministic() {
    let engine = ActivityGroupingEngine::default();
    let records = seed_records();

    assert_eq!(engine.group(&records), engine.group(&records));
}

#[test]
fn test_regrouping_flattened_groups_is_idempotent() {
    let engine = ActivityGroupingEngine::default();
    let mut records = seed_records();
    // Interleave keys so flattening reorders the input
    records.swap(1, 2);

    let groups = engine.group(&records);
    let regrouped = engine.group(&flatten(&groups));

    assert_eq!(groups, regrouped);
}

#[test]
fn test_groups_keep_first_seen_order() {
    let engine = ActivityGroupingEngine::default();
    let records = vec![
        make_record(5, "B", 10, vec![1], ActivityStatus::Pending),
        make_record(1, "A", 10, vec![1], ActivityStatus::Pending),
        make_record(7, "B", 11, vec![1], ActivityStatus::Pending),
    ];

    let groups = engine.group(&records);
    let names: Vec<&str> = groups.iter().map(|g| g.key.activity_name.as_str()).collect();

    assert_eq!(names, vec!["B", "A"]);
    assert_eq!(groups[0].member_ids, vec![5, 7]);
}

#[test]
fn test_quarter_union_is_order_independent() {
    let engine = ActivityGroupingEngine::default();
    let a = make_record(1, "A", 10, vec![2], ActivityStatus::Pending);
    let b = make_record(2, "A", 11, vec![1], ActivityStatus::Pending);

    let forward = engine.group(&[a.clone(), b.clone()]);
    let backward = engine.group(&[b, a]);

    assert_eq!(forward[0].quarters, vec![1, 2]);
    assert_eq!(backward[0].quarters, vec![1, 2]);
}

#[test]
fn test_legacy_quarter_field_joins_union() {
    let engine = ActivityGroupingEngine::default();
    let mut legacy = make_record(2, "A", 11, vec![], ActivityStatus::Pending);
    legacy.quarter = Some(4);

    let groups = engine.group(&[
        make_record(1, "A", 10, vec![3, 1], ActivityStatus::Pending),
        legacy,
    ]);

    assert_eq!(groups[0].quarters, vec![1, 3, 4]);
}

#[test]
fn test_due_date_takes_latest_and_ignores_missing() {
    let engine = ActivityGroupingEngine::default();
    let mut q1 = make_record(1, "A", 10, vec![1], ActivityStatus::Pending);
    q1.due_date = Some(ymd(2025, 3, 31));
    let mut q2 = make_record(2, "A", 11, vec![2], ActivityStatus::Pending);
    q2.due_date = Some(ymd(2025, 6, 30));
    let undated = make_record(3, "A", 12, vec![2], ActivityStatus::Pending);

    let groups = engine.group(&[q2, undated, q1]);

    assert_eq!(groups[0].due_date, Some(ymd(2025, 6, 30)));
}

#[test]
fn test_missing_key_parts_match_each_other() {
    let engine = ActivityGroupingEngine::default();
    let mut a = make_record(1, "A", 10, vec![1], ActivityStatus::Pending);
    a.team_id = None;
    let mut b = make_record(2, "A", 11, vec![1], ActivityStatus::Pending);
    b.team_id = None;
    let c = make_record(3, "A", 12, vec![1], ActivityStatus::Pending);

    let groups = engine.group(&[a, b, c]);

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].member_ids, vec![1, 2]);
    assert_eq!(groups[1].member_ids, vec![3]);
}

#[test]
fn test_unset_deliverable_type_adds_no_entry() {
    let engine = ActivityGroupingEngine::default();
    let mut bare = make_record(2, "A", 0, vec![1], ActivityStatus::Pending);
    bare.deliverable_type_id = None;

    let groups = engine.group(&[make_record(1, "A", 10, vec![1], ActivityStatus::Pending), bare]);

    assert_eq!(groups[0].member_ids, vec![1, 2]);
    assert_eq!(groups[0].deliverable_type_ids, vec![10]);
    assert_eq!(groups[0].deliverable_names, vec!["Deliverable 10".to_string()]);
}

#[test]
fn test_under_review_stays_set_once_any_member_had_it() {
    let engine = ActivityGroupingEngine::default();
    let mut reviewed = make_record(1, "A", 10, vec![1], ActivityStatus::Completed);
    reviewed.under_review = true;
    let done = make_record(2, "A", 11, vec![1], ActivityStatus::Completed);

    let groups = engine.group(&[reviewed, done]);

    assert_eq!(groups[0].status, ActivityStatus::Completed);
    assert!(groups[0].under_review);
}

#[test]
fn test_assigned_user_count_is_naive_sum() {
    let engine = ActivityGroupingEngine::default();
    let mut a = make_record(1, "A", 10, vec![1], ActivityStatus::Pending);
    a.assigned_user_count = 2;
    let mut b = make_record(2, "A", 11, vec![1], ActivityStatus::Pending);
    b.assigned_user_count = 3;

    assert_eq!(engine.group(&[a, b])[0].assigned_user_count, 5);
}

#[test]
fn test_empty_input_yields_no_groups() {
    assert!(ActivityGroupingEngine::default().group(&[]).is_empty());
}

#[test]
fn test_add_then_remove_deliverable_round_trip() {
    let engine = ActivityGroupingEngine::default();
    let records = vec![
        make_record(1, "A", 10, vec![1], ActivityStatus::Pending),
        make_record(2, "A", 11, vec![1], ActivityStatus::Pending),
    ];
    let original = engine.group(&records).remove(0);

    // Apply the create plan by hand, as the store would
    let created = match engine.add_deliverable(&original, 12, None).unwrap() {
        MutationPlan::CreateActivity { activity, .. } => activity.into_record(3),
        other => panic!("unexpected plan {:?}", other),
    };
    let mut with_new = records.clone();
    with_new.push(created);
    let grown = engine.group(&with_new).remove(0);
    assert_eq!(grown.deliverable_type_ids, vec![10, 11, 12]);

    let removed_id = match engine.remove_deliverable(&grown, 12).unwrap() {
        MutationPlan::DeleteActivity { activity_id } => activity_id,
        other => panic!("unexpected plan {:?}", other),
    };
    assert_eq!(removed_id, 3);
    with_new.retain(|r| r.activity_id != removed_id);

    let shrunk = engine.group(&with_new).remove(0);
    assert_eq!(shrunk.deliverable_type_ids, original.deliverable_type_ids);
}

#[test]
fn test_duplicate_deliverable_and_missing_member_errors() {
    let engine = ActivityGroupingEngine::default();
    let group = engine
        .group(&[make_record(1, "A", 10, vec![1], ActivityStatus::Pending)])
        .remove(0);

    assert!(matches!(
        engine.add_deliverable(&group, 10, None),
        Err(EngineError::InvalidOperation(_))
    ));
    assert!(matches!(
        engine.remove_deliverable(&group, 11),
        Err(EngineError::NotFound(_))
    ));
}

#[test]
fn test_assigned_user_count_never_overflows() {
    let engine = ActivityGroupingEngine::default();
    let mut a = make_record(1, "A", 10, vec![1], ActivityStatus::Pending);
    a.assigned_user_count = u32::MAX;
    let mut b = make_record(2, "A", 11, vec![1], ActivityStatus::Pending);
    b.assigned_user_count = 1;

    assert_eq!(engine.group(&[a, b])[0].assigned_user_count, u32::MAX);
}
