//! Attendance and holiday models.
//!
//! This module defines the per-day attendance record read from the external
//! data store and the marked holiday dates that turn workdays into
//! non-working days.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ChildId;

/// The classification of an absence, drawn from a closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsenceType {
    /// The child was absent due to illness. Not payable.
    SickLeave,
    /// The child was absent on a family vacation. Not payable.
    Vacation,
    /// Any other absence, including unexplained ones. Payable.
    Other,
}

/// A per-day attendance record for one child.
///
/// Created by attendance-entry workflows outside this engine; the engine
/// only reads a date range per child. The store guarantees that
/// `absence_reason`/`absence_type` are empty whenever `present` is true,
/// but the payability rule does not trust that invariant and ignores both
/// fields for present days.
///
/// # Example
///
/// ```
/// use fee_engine::models::{AbsenceType, AttendanceRecord};
/// use chrono::NaiveDate;
///
/// let record = AttendanceRecord {
///     child_id: 3,
///     date: NaiveDate::from_ymd_opt(2024, 2, 6).unwrap(),
///     present: false,
///     absence_reason: Some("заболел".to_string()),
///     absence_type: Some(AbsenceType::SickLeave),
/// };
/// assert!(!record.present);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The child this record belongs to.
    pub child_id: ChildId,
    /// The calendar date of the record.
    pub date: NaiveDate,
    /// Whether the child attended on this date.
    pub present: bool,
    /// Free-text reason for an absence, if any was recorded.
    #[serde(default)]
    pub absence_reason: Option<String>,
    /// Explicit absence classification, if one was recorded.
    #[serde(default)]
    pub absence_type: Option<AbsenceType>,
}

/// A single calendar date marked as a non-working day.
///
/// Distinct from Saturday/Sunday; a holiday may fall on a weekend, in which
/// case the day is still simply a non-workday for payment purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// The date of the holiday.
    pub date: NaiveDate,
    /// Optional display name (e.g. "Новый год").
    #[serde(default)]
    pub name: Option<String>,
}
