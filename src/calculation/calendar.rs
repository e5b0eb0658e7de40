//! Calendar classification logic.
//!
//! This module derives, for a given (year, month), a per-day classification
//! of weekend and holiday flags. It is the single source of truth for
//! weekend/holiday detection, shared by the charge aggregator and the
//! attendance-sheet report builder.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The earliest year the engine accepts for calculation.
pub const MIN_YEAR: i32 = 2000;

/// The latest year the engine accepts for calculation.
pub const MAX_YEAR: i32 = 2100;

/// The derived classification of one calendar date.
///
/// The two flags are independent inputs to the payability rule: a holiday
/// that falls on a Sunday carries both, and is still simply a non-workday
/// for payment purposes.
///
/// # Example
///
/// ```
/// use fee_engine::calculation::classify_month;
/// use std::collections::HashSet;
///
/// // February 2024, no holidays
/// let days = classify_month(2024, 2, &HashSet::new()).unwrap();
/// assert_eq!(days.len(), 29);
/// assert!(days[2].is_weekend); // 2024-02-03 is a Saturday
/// assert!(days[0].is_workday()); // 2024-02-01 is a Thursday
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayClassification {
    /// The calendar date being classified.
    pub date: NaiveDate,
    /// True iff the date falls on a Saturday or Sunday.
    pub is_weekend: bool,
    /// True iff the date is a marked holiday.
    pub is_holiday: bool,
}

impl DayClassification {
    /// Returns true iff the day is neither a weekend nor a holiday.
    pub fn is_workday(&self) -> bool {
        !self.is_weekend && !self.is_holiday
    }
}

/// Validates that `(year, month)` is inside the supported range.
///
/// Months outside 1-12 and years outside [`MIN_YEAR`]..=[`MAX_YEAR`] fail
/// fast with [`EngineError::InvalidPeriod`].
pub fn validate_period(year: i32, month: u32) -> EngineResult<()> {
    if !(1..=12).contains(&month) || !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(EngineError::InvalidPeriod { year, month });
    }
    Ok(())
}

/// Returns the number of days in the given month, handling leap years.
pub fn days_in_month(year: i32, month: u32) -> EngineResult<u32> {
    let (first, last) = month_bounds(year, month)?;
    Ok((last.signed_duration_since(first).num_days() + 1) as u32)
}

/// Returns the first and last date of the given month (both inclusive).
pub fn month_bounds(year: i32, month: u32) -> EngineResult<(NaiveDate, NaiveDate)> {
    validate_period(year, month)?;
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(EngineError::InvalidPeriod { year, month })?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or(EngineError::InvalidPeriod { year, month })?;
    let last = next_first.pred_opt().ok_or(EngineError::InvalidPeriod { year, month })?;
    Ok((first, last))
}

/// Classifies every day of the given month.
///
/// Returns one [`DayClassification`] per calendar day, ordered from day 1
/// to the last day of the month.
///
/// # Arguments
///
/// * `year` - The calculation year ([`MIN_YEAR`]..=[`MAX_YEAR`])
/// * `month` - The calculation month (1-12)
/// * `holiday_dates` - The set of marked holiday dates
///
/// # Errors
///
/// [`EngineError::InvalidPeriod`] when the period is out of range. A pure
/// function otherwise; holiday dates outside the month are simply never
/// matched.
pub fn classify_month(
    year: i32,
    month: u32,
    holiday_dates: &HashSet<NaiveDate>,
) -> EngineResult<Vec<DayClassification>> {
    let (first, last) = month_bounds(year, month)?;

    Ok(first
        .iter_days()
        .take_while(|d| *d <= last)
        .map(|date| DayClassification {
            date,
            is_weekend: matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
            is_holiday: holiday_dates.contains(&date),
        })
        .collect())
}
