// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Compliance report and dashboard counters.

use crate::models::{ActivityRecord, ActivityStatus, StatusSummary, SystemReport};
use crate::quarters::QUARTERS;

/// Label for records without a system abbreviation.
const UNKNOWN_SYSTEM: &str = "N/A";

/// Per-system compliance for the activities scheduled in `quarter`.
///
/// Systems appear in first-seen order; systems with nothing scheduled in the
/// quarter are omitted.
pub fn compliance_report(records: &[ActivityRecord], quarter: u8) -> Vec<SystemReport> {
    let mut reports: Vec<SystemReport> = Vec::new();

    for record in records.iter().filter(|r| r.is_in_quarter(quarter)) {
        let pos = match reports.iter().position(|r| r.system_id == record.system_id) {
            Some(pos) => pos,
            None => {
                reports.push(SystemReport {
                    system_id: record.system_id,
                    system_abbrev: record
                        .system_abbrev
                        .clone()
                        .unwrap_or_else(|| UNKNOWN_SYSTEM.to_string()),
                    pending: 0,
                    completed: 0,
                    compliance_percent: 0,
                    meets: false,
                });
                reports.len() - 1
            }
        };

        let report = &mut reports[pos];
        match record.status {
            ActivityStatus::Pending | ActivityStatus::Rescheduled => report.pending += 1,
            ActivityStatus::Completed => report.completed += 1,
        }
    }

    for report in &mut reports {
        let total = report.pending + report.completed;
        report.compliance_percent = if total > 0 {
            (f64::from(report.completed) * 100.0 / f64::from(total)).round() as u32
        } else {
            0
        };
        report.meets = report.compliance_percent == 100;
    }

    reports
}

/// Number of records scheduled in each quarter (index 0 is Q1).
///
/// A record scheduled in several quarters counts once in each.
pub fn quarter_counts(records: &[ActivityRecord]) -> [u32; 4] {
    let mut counts = [0u32; 4];
    for (slot, quarter) in counts.iter_mut().zip(QUARTERS) {
        *slot = records.iter().filter(|r| r.is_in_quarter(quarter)).count() as u32;
    }
    counts
}

/// Count records by status.
pub fn status_summary(records: &[ActivityRecord]) -> StatusSummary {
    records
        .iter()
        .fold(StatusSummary::default(), |mut summary, record| {
            match record.status {
                ActivityStatus::Pending => summary.pending += 1,
                ActivityStatus::Rescheduled => summary.rescheduled += 1,
                ActivityStatus::Completed => summary.completed += 1,
            }
            summary
        })
}
