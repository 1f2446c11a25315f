// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Quarter calendar and compliance report routes.

use crate::db::ActivityFilter;
use crate::error::{AppError, Result};
use crate::models::{StatusSummary, SystemReport};
use crate::quarters::{
    max_due_date_for_quarters, quarter_date_range, quarter_months_label, MAX_EXTRA_BUSINESS_DAYS,
};
use crate::services::report::{compliance_report, quarter_counts, status_summary};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/quarters/{quarter}/range", get(get_quarter_range))
        .route("/api/quarters/max-due-date", get(get_max_due_date))
        .route("/api/reports/compliance", get(get_compliance_report))
}

fn current_year() -> i32 {
    chrono::Utc::now().year()
}

// ─── Quarters ────────────────────────────────────────────────

#[derive(Deserialize)]
struct YearQuery {
    year: Option<i32>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct QuarterRangeResponse {
    pub quarter: u8,
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Calendar boundaries of a quarter.
async fn get_quarter_range(
    Path(quarter): Path<u8>,
    Query(params): Query<YearQuery>,
) -> Result<Json<QuarterRangeResponse>> {
    let year = params.year.unwrap_or_else(current_year);
    let (start, end) = quarter_date_range(quarter, year)?;

    Ok(Json(QuarterRangeResponse {
        quarter,
        label: quarter_months_label(quarter)?.to_string(),
        start,
        end,
    }))
}

#[derive(Deserialize, Validate)]
struct MaxDueDateQuery {
    /// Comma-separated quarter numbers, e.g. "1,3"
    quarters: String,
    #[validate(range(max = MAX_EXTRA_BUSINESS_DAYS))]
    extra_business_days: Option<u32>,
    year: Option<i32>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MaxDueDateResponse {
    pub quarters: Vec<u8>,
    pub extra_business_days: u32,
    pub max_due_date: NaiveDate,
}

fn parse_quarter_list(raw: &str) -> Result<Vec<u8>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u8>().map_err(|_| {
                AppError::BadRequest(format!("Invalid quarter '{}' in 'quarters'", part))
            })
        })
        .collect()
}

/// Latest allowed due date for a set of quarters.
async fn get_max_due_date(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MaxDueDateQuery>,
) -> Result<Json<MaxDueDateResponse>> {
    params
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let quarters = parse_quarter_list(&params.quarters)?;
    let extra_business_days = params
        .extra_business_days
        .unwrap_or(state.config.extra_business_days);
    let year = params.year.unwrap_or_else(current_year);

    let max_due_date = max_due_date_for_quarters(&quarters, extra_business_days, year)?;

    Ok(Json(MaxDueDateResponse {
        quarters,
        extra_business_days,
        max_due_date,
    }))
}

// ─── Reports ─────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
struct ComplianceQuery {
    #[validate(range(min = 1, max = 4))]
    quarter: u8,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ComplianceResponse {
    pub quarter: u8,
    pub systems: Vec<SystemReport>,
    /// Activities per quarter, Q1 first
    pub quarter_counts: [u32; 4],
    pub status: StatusSummary,
}

/// Per-system compliance for one quarter, plus dashboard counters.
async fn get_compliance_report(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ComplianceQuery>,
) -> Result<Json<ComplianceResponse>> {
    params
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let records = state.store.list_activities(&ActivityFilter::All).await?;

    Ok(Json(ComplianceResponse {
        quarter: params.quarter,
        systems: compliance_report(&records, params.quarter),
        quarter_counts: quarter_counts(&records),
        status: status_summary(&records),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quarter_list() {
        assert_eq!(parse_quarter_list("1, 3,4").unwrap(), vec![1, 3, 4]);
        assert!(parse_quarter_list("").unwrap().is_empty());
        assert!(matches!(
            parse_quarter_list("1,x"),
            Err(AppError::BadRequest(_))
        ));
    }
}
