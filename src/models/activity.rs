// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity record model, as stored by the activity store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Activity identifier (unique across the store).
pub type ActivityId = u64;

/// User identifier.
pub type UserId = u64;

/// Lifecycle status of a single activity.
///
/// `Pending -> Rescheduled` happens through a due-date change;
/// `Completed` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    #[default]
    #[serde(alias = "pendiente")]
    Pending,
    #[serde(alias = "reprogramado")]
    Rescheduled,
    #[serde(alias = "completado")]
    Completed,
}

impl ActivityStatus {
    pub fn is_completed(self) -> bool {
        self == ActivityStatus::Completed
    }
}

/// Stored activity record.
///
/// Serde aliases accept the backend's column names so rows can be loaded
/// without a separate mapping layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityRecord {
    /// Unique activity ID
    #[serde(alias = "id_actividad")]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub activity_id: ActivityId,
    /// Free-text label
    #[serde(default, alias = "nombre_actividad")]
    pub activity_name: Option<String>,
    #[serde(default, alias = "id_sistema")]
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub system_id: Option<u64>,
    /// Short system label (e.g. "SAP"), used by reports
    #[serde(default, alias = "sistema_abrev")]
    pub system_abbrev: Option<String>,
    #[serde(default, alias = "id_equipo")]
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub team_id: Option<u64>,
    /// Management unit ("gerencia")
    #[serde(default, alias = "id_gerencia")]
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub management_unit_id: Option<u64>,
    #[serde(default, alias = "id_entregable")]
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub deliverable_type_id: Option<u64>,
    #[serde(default, alias = "entregable_nombre")]
    pub deliverable_type_name: Option<String>,
    /// Quarters (1-4) this activity is scheduled for
    #[serde(default, alias = "trimestres")]
    pub quarters: Vec<u8>,
    /// Legacy single-quarter field, used when `quarters` is empty
    #[serde(default, alias = "trimestre", skip_serializing_if = "Option::is_none")]
    pub quarter: Option<u8>,
    #[serde(default, alias = "estado_actividad")]
    pub status: ActivityStatus,
    /// An uploaded deliverable awaits approval
    #[serde(default, alias = "en_revision")]
    pub under_review: bool,
    /// Due date (YYYY-MM-DD)
    #[serde(default, alias = "fecha_sustento")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub assigned_user_count: u32,
    /// Users currently assigned (filled in when listing)
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "Array<number>"))]
    pub assigned_user_ids: Vec<UserId>,
}

impl ActivityRecord {
    /// Quarters this record is scheduled for, falling back to the legacy field.
    pub fn effective_quarters(&self) -> Vec<u8> {
        if self.quarters.is_empty() {
            self.quarter.into_iter().collect()
        } else {
            self.quarters.clone()
        }
    }

    /// Check whether the record is scheduled in the given quarter.
    pub fn is_in_quarter(&self, quarter: u8) -> bool {
        if self.quarters.is_empty() {
            self.quarter == Some(quarter)
        } else {
            self.quarters.contains(&quarter)
        }
    }
}

/// Fields for a new activity record (the store assigns the ID).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NewActivity {
    pub activity_name: Option<String>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub system_id: Option<u64>,
    pub system_abbrev: Option<String>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub team_id: Option<u64>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub management_unit_id: Option<u64>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub deliverable_type_id: Option<u64>,
    pub deliverable_type_name: Option<String>,
    pub quarters: Vec<u8>,
    pub status: ActivityStatus,
    pub under_review: bool,
    pub due_date: Option<NaiveDate>,
}

impl NewActivity {
    /// Materialize the stored record once an ID has been assigned.
    pub fn into_record(self, activity_id: ActivityId) -> ActivityRecord {
        ActivityRecord {
            activity_id,
            activity_name: self.activity_name,
            system_id: self.system_id,
            system_abbrev: self.system_abbrev,
            team_id: self.team_id,
            management_unit_id: self.management_unit_id,
            deliverable_type_id: self.deliverable_type_id,
            deliverable_type_name: self.deliverable_type_name,
            quarters: self.quarters,
            quarter: None,
            status: self.status,
            under_review: self.under_review,
            due_date: self.due_date,
            assigned_user_count: 0,
            assigned_user_ids: Vec::new(),
        }
    }
}

/// Partial update of an activity record. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ActivityStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub under_review: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

impl ActivityUpdate {
    pub fn apply_to(&self, record: &mut ActivityRecord) {
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(under_review) = self.under_review {
            record.under_review = under_review;
        }
        if let Some(due_date) = self.due_date {
            record.due_date = Some(due_date);
        }
    }
}

/// A user's own verdict on an assigned activity.
///
/// Set by the user; the activity itself is only closed by an admin approval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum Compliance {
    #[default]
    #[serde(alias = "pendiente")]
    Pending,
    #[serde(alias = "cumple")]
    Complies,
    #[serde(alias = "no_cumple")]
    DoesNotComply,
}

/// A user assigned to an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Assignment {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: UserId,
    #[serde(default)]
    pub compliance: Compliance,
}

impl Assignment {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            compliance: Compliance::Pending,
        }
    }
}

/// One logged due-date change (the per-record change counter counts these).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DateChange {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub activity_id: ActivityId,
    pub previous_due_date: Option<NaiveDate>,
    pub new_due_date: NaiveDate,
    /// Admin who made the change, when known
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub changed_by: Option<UserId>,
}

/// Uploaded deliverable file attached to an activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliverableFile {
    pub activity_id: ActivityId,
    pub file_name: String,
    pub uploaded_by: UserId,
    /// Upload timestamp (RFC3339)
    pub uploaded_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_column_names() {
        let json = r#"{
            "id_actividad": 7,
            "nombre_actividad": "Backup review",
            "id_sistema": 1,
            "id_gerencia": 2,
            "id_equipo": 3,
            "entregable_nombre": "Report",
            "trimestre": 2,
            "estado_actividad": "reprogramado",
            "en_revision": true,
            "fecha_sustento": "2025-06-30"
        }"#;

        let record: ActivityRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.activity_id, 7);
        assert_eq!(record.activity_name.as_deref(), Some("Backup review"));
        assert_eq!(record.status, ActivityStatus::Rescheduled);
        assert!(record.under_review);
        assert_eq!(record.effective_quarters(), vec![2]);
        assert_eq!(
            record.due_date,
            Some(NaiveDate::from_ymd_opt(2025, 6, 30).unwrap())
        );
    }

    #[test]
    fn test_missing_status_defaults_to_pending() {
        let record: ActivityRecord = serde_json::from_str(r#"{"activity_id": 1}"#).unwrap();
        assert_eq!(record.status, ActivityStatus::Pending);
        assert!(record.effective_quarters().is_empty());
    }

    #[test]
    fn test_unparseable_due_date_is_rejected() {
        let result: Result<ActivityRecord, _> =
            serde_json::from_str(r#"{"activity_id": 1, "due_date": "31/03/2025"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_quarters_take_precedence_over_legacy_field() {
        let record: ActivityRecord =
            serde_json::from_str(r#"{"activity_id": 1, "quarters": [3, 4], "quarter": 1}"#)
                .unwrap();
        assert_eq!(record.effective_quarters(), vec![3, 4]);
        assert!(record.is_in_quarter(4));
        assert!(!record.is_in_quarter(1));
    }

    #[test]
    fn test_update_leaves_unset_fields() {
        let mut record: ActivityRecord =
            serde_json::from_str(r#"{"activity_id": 1, "under_review": true}"#).unwrap();
        ActivityUpdate {
            status: Some(ActivityStatus::Completed),
            ..Default::default()
        }
        .apply_to(&mut record);

        assert_eq!(record.status, ActivityStatus::Completed);
        assert!(record.under_review);
    }

    #[test]
    fn test_compliance_accepts_backend_values() {
        let assignment: Assignment =
            serde_json::from_str(r#"{"user_id": 3, "compliance": "no_cumple"}"#).unwrap();
        assert_eq!(assignment.compliance, Compliance::DoesNotComply);

        let assignment: Assignment = serde_json::from_str(r#"{"user_id": 3}"#).unwrap();
        assert_eq!(assignment, Assignment::new(3));
        assert_eq!(
            serde_json::to_value(Compliance::Complies).unwrap(),
            serde_json::json!("complies")
        );
    }
}
