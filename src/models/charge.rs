//! Monthly charge models.
//!
//! This module contains the derived per-child [`MonthlyChargeSummary`] that
//! the aggregator produces, and the persisted [`MonthlyCharge`] row that the
//! charge store upserts once per `(child, year, month)`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ChildId;

/// The derived outcome of one charge calculation for one child.
///
/// Counts of each day-outcome category across the month, the payable-day
/// total, the rate that was applied, and the resulting amount. This is what
/// the charge persister turns into a [`MonthlyCharge`] row.
///
/// Invariant: the five category counts sum to the number of days in the
/// month, and `payable_days = present_days + uncategorized_absence_days`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyChargeSummary {
    /// The child this summary is for.
    pub child_id: ChildId,
    /// The child's display name, used in the audit text.
    pub child_name: String,
    /// The calculation year.
    pub year: i32,
    /// The calculation month (1-12).
    pub month: u32,
    /// Days the child was marked present. Payable.
    pub present_days: u32,
    /// Days the child was absent due to sickness. Not payable.
    pub sick_days: u32,
    /// Days the child was absent on vacation. Not payable.
    pub vacation_days: u32,
    /// Workdays with an "other" absence or no attendance mark at all. Payable.
    pub uncategorized_absence_days: u32,
    /// Weekends and holidays. Never payable.
    pub non_workdays: u32,
    /// Total payable days (`present_days + uncategorized_absence_days`).
    pub payable_days: u32,
    /// The day rate that was applied (individual override or group default).
    pub day_rate: Decimal,
    /// `payable_days × day_rate`, rounded half-up to 2 decimal places.
    pub amount_due: Decimal,
    /// Deterministic human-readable audit trail of the calculation.
    pub calculation_details: String,
}

/// A persisted monthly charge row.
///
/// At most one row exists per `(child_id, year, month)`; recalculation
/// overwrites `amount_due`, `calculation_details`, and `calculated_at` in
/// place rather than inserting a duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCharge {
    /// Store-assigned identifier of the row.
    pub id: i64,
    /// The child this charge belongs to.
    pub child_id: ChildId,
    /// The charge year.
    pub year: i32,
    /// The charge month (1-12).
    pub month: u32,
    /// The amount due, with 2 fractional digits.
    pub amount_due: Decimal,
    /// Human-readable audit trail copied from the summary.
    pub calculation_details: String,
    /// When this charge was last (re)calculated.
    pub calculated_at: DateTime<Utc>,
}
