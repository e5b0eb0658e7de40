//! Day payability rule.
//!
//! This module decides, for one (child, date), whether the day counts
//! toward payment. The decision table is ordered and the first match wins:
//! non-workdays are never payable regardless of attendance data, unmarked
//! workdays default to a payable uncategorized absence, present days are
//! payable, and absences are classified by their explicit type or, as a
//! fallback, by a keyword heuristic over the free-text reason.

use serde::{Deserialize, Serialize};

use crate::calculation::DayClassification;
use crate::models::{AbsenceType, AttendanceRecord};

/// Reason keywords that classify an absence as sick leave.
const SICK_KEYWORDS: [&str; 3] = ["бол", "забол", "sick"];

/// Reason keywords that classify an absence as vacation.
const VACATION_KEYWORDS: [&str; 3] = ["отпуск", "отдых", "vacation"];

/// The category assigned to one (child, date) pair.
///
/// This is the atomic unit the monthly aggregator counts. Only
/// [`DayOutcome::PayablePresent`] and
/// [`DayOutcome::PayableAbsentUncategorized`] count toward payable days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayOutcome {
    /// The child attended a workday. Payable.
    PayablePresent,
    /// A workday with no attendance mark, or an "other" absence. Payable.
    PayableAbsentUncategorized,
    /// Absent due to sickness. Not payable.
    Sick,
    /// Absent on vacation. Not payable.
    Vacation,
    /// Weekend or holiday. Not payable, attendance data ignored.
    NonWorkday,
}

impl DayOutcome {
    /// Returns true iff this outcome counts toward payable days.
    pub fn is_payable(self) -> bool {
        matches!(
            self,
            DayOutcome::PayablePresent | DayOutcome::PayableAbsentUncategorized
        )
    }

    /// A one-character code used in the day-by-day audit breakdown.
    pub fn code(self) -> char {
        match self {
            DayOutcome::PayablePresent => '+',
            DayOutcome::PayableAbsentUncategorized => 'A',
            DayOutcome::Sick => 'S',
            DayOutcome::Vacation => 'V',
            DayOutcome::NonWorkday => '-',
        }
    }
}

/// Derives an absence type from a free-text reason.
///
/// A narrowly-scoped heuristic over a fixed keyword table, kept as a
/// fallback for records that carry a reason but no explicit type. Exact
/// enum value strings ("sick_leave", "vacation", "other") are also
/// accepted. Unmatched reasons always fall back to [`AbsenceType::Other`],
/// never to an error.
///
/// # Example
///
/// ```
/// use fee_engine::calculation::absence_type_from_reason;
/// use fee_engine::models::AbsenceType;
///
/// assert_eq!(absence_type_from_reason("заболел"), AbsenceType::SickLeave);
/// assert_eq!(absence_type_from_reason("family vacation"), AbsenceType::Vacation);
/// assert_eq!(absence_type_from_reason("у бабушки"), AbsenceType::Other);
/// ```
pub fn absence_type_from_reason(reason: &str) -> AbsenceType {
    let reason_lower = reason.to_lowercase();

    if SICK_KEYWORDS.iter().any(|kw| reason_lower.contains(kw)) {
        return AbsenceType::SickLeave;
    }
    if VACATION_KEYWORDS.iter().any(|kw| reason_lower.contains(kw)) {
        return AbsenceType::Vacation;
    }

    match reason_lower.as_str() {
        "sick_leave" => AbsenceType::SickLeave,
        "vacation" => AbsenceType::Vacation,
        _ => AbsenceType::Other,
    }
}

/// Resolves the absence type of a record, preferring the explicit field.
///
/// The heuristic never overrides an explicitly supplied category; it is
/// only consulted when `absence_type` is missing. A record with neither
/// type nor reason resolves to [`AbsenceType::Other`].
pub fn effective_absence_type(record: &AttendanceRecord) -> AbsenceType {
    if let Some(absence_type) = record.absence_type {
        return absence_type;
    }
    match record.absence_reason.as_deref() {
        Some(reason) if !reason.is_empty() => absence_type_from_reason(reason),
        _ => AbsenceType::Other,
    }
}

/// Evaluates the payability of one day for one child.
///
/// Decision table, first match wins:
/// 1. weekend or holiday → [`DayOutcome::NonWorkday`], attendance ignored;
/// 2. no record → [`DayOutcome::PayableAbsentUncategorized`] (an unmarked
///    workday is billed as a placeholder absence);
/// 3. present → [`DayOutcome::PayablePresent`], reason/type ignored even if
///    the store violated its invariant and supplied them;
/// 4. absent → sick leave and vacation are not payable, anything else is
///    a payable uncategorized absence.
pub fn evaluate_day(
    classification: &DayClassification,
    attendance: Option<&AttendanceRecord>,
) -> DayOutcome {
    if classification.is_weekend || classification.is_holiday {
        return DayOutcome::NonWorkday;
    }

    let Some(record) = attendance else {
        return DayOutcome::PayableAbsentUncategorized;
    };

    if record.present {
        return DayOutcome::PayablePresent;
    }

    match effective_absence_type(record) {
        AbsenceType::SickLeave => DayOutcome::Sick,
        AbsenceType::Vacation => DayOutcome::Vacation,
        AbsenceType::Other => DayOutcome::PayableAbsentUncategorized,
    }
}
