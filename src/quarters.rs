// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Quarter boundaries and business-day arithmetic for due dates.
//!
//! Quarters are fixed three-month calendar periods. February is never a
//! boundary, so no leap-day handling is needed.

use crate::error::EngineError;
use chrono::{Datelike, NaiveDate, Weekday};

/// Valid quarter numbers.
pub const QUARTERS: std::ops::RangeInclusive<u8> = 1..=4;

/// Upper bound on business days added after a quarter (one working year).
pub const MAX_EXTRA_BUSINESS_DAYS: u32 = 260;

/// Date format used for due dates on the wire.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive `(start, end)` boundaries of a quarter in the given year.
pub fn quarter_date_range(quarter: u8, year: i32) -> Result<(NaiveDate, NaiveDate), EngineError> {
    let ((start_month, start_day), (end_month, end_day)) = match quarter {
        1 => ((1, 1), (3, 31)),
        2 => ((4, 1), (6, 30)),
        3 => ((7, 1), (9, 30)),
        4 => ((10, 1), (12, 31)),
        _ => return Err(invalid_quarter(quarter)),
    };

    let date = |month: u32, day: u32| {
        NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| EngineError::InvalidInput(format!("Year {} is out of range", year)))
    };

    Ok((date(start_month, start_day)?, date(end_month, end_day)?))
}

/// Check whether a date falls inside a quarter of its own year.
///
/// No date lies in a quarter number outside 1..=4.
pub fn is_date_in_quarter(date: NaiveDate, quarter: u8) -> bool {
    match quarter_date_range(quarter, date.year()) {
        Ok((start, end)) => date >= start && date <= end,
        Err(_) => false,
    }
}

/// Quarter number (1..=4) that contains the date.
pub fn quarter_of(date: NaiveDate) -> u8 {
    // month0 is 0..=11, so the result always fits
    (date.month0() / 3 + 1) as u8
}

/// Latest allowed due date for a set of quarters.
///
/// Starts from the last day of the highest quarter and advances one calendar
/// day at a time until `extra_business_days` weekdays have been counted.
pub fn max_due_date_for_quarters(
    quarters: &[u8],
    extra_business_days: u32,
    year: i32,
) -> Result<NaiveDate, EngineError> {
    if extra_business_days > MAX_EXTRA_BUSINESS_DAYS {
        return Err(EngineError::InvalidInput(format!(
            "At most {} extra business days are allowed, got {}",
            MAX_EXTRA_BUSINESS_DAYS, extra_business_days
        )));
    }

    let last_quarter = quarters
        .iter()
        .copied()
        .max()
        .ok_or_else(|| EngineError::InvalidInput("At least one quarter is required".to_string()))?;

    let (_, mut date) = quarter_date_range(last_quarter, year)?;

    let mut added = 0;
    while added < extra_business_days {
        date = date
            .succ_opt()
            .ok_or_else(|| EngineError::InvalidInput("Due date overflowed".to_string()))?;
        if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            added += 1;
        }
    }

    Ok(date)
}

/// Parse a `YYYY-MM-DD` due date.
pub fn parse_due_date(raw: &str) -> Result<NaiveDate, EngineError> {
    NaiveDate::parse_from_str(raw.trim(), DUE_DATE_FORMAT)
        .map_err(|e| EngineError::InvalidInput(format!("Invalid due date '{}': {}", raw, e)))
}

/// Human-readable month span of a quarter.
pub fn quarter_months_label(quarter: u8) -> Result<&'static str, EngineError> {
    match quarter {
        1 => Ok("January - March"),
        2 => Ok("April - June"),
        3 => Ok("July - September"),
        4 => Ok("October - December"),
        _ => Err(invalid_quarter(quarter)),
    }
}

/// Message shown when a date is entered outside its quarter.
pub fn quarter_out_of_range_message(quarter: u8) -> Result<String, EngineError> {
    Ok(format!(
        "The date must fall within {} (Quarter {})",
        quarter_months_label(quarter)?,
        quarter
    ))
}

fn invalid_quarter(quarter: u8) -> EngineError {
    EngineError::InvalidInput(format!("Quarter must be between 1 and 4, got {}", quarter))
}
