//! Attendance sheet report data.
//!
//! Builds the data behind the printable monthly attendance sheet: one mark
//! per child per day, per-child summaries, and per-day presence totals.
//! The marks are derived through the same calendar classifier and day
//! payability rule as the charge engine, so the sheet and the charges can
//! never disagree on what counts as a payable day.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculation::{DayOutcome, classify_month, evaluate_day, month_bounds};
use crate::error::{EngineError, EngineResult};
use crate::models::{ChildId, GroupId};
use crate::store::{AttendanceSource, ChildSource, HolidaySource};

/// The mark printed in one cell of the attendance sheet.
///
/// The symbols follow the paper form the kindergarten uses: "+" for
/// attendance, "б" (болезнь) for sickness, "о" (отпуск) for vacation,
/// "н" (не был) for any other absence, and an empty cell on non-workdays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetMark {
    /// The child attended.
    Present,
    /// Absent, sick.
    Sick,
    /// Absent, vacation.
    Vacation,
    /// Absent for any other (or no recorded) reason.
    Absent,
    /// Weekend or holiday; the cell stays empty.
    NonWorkday,
}

impl SheetMark {
    /// The symbol printed in the sheet cell.
    pub fn symbol(self) -> &'static str {
        match self {
            SheetMark::Present => "+",
            SheetMark::Sick => "б",
            SheetMark::Vacation => "о",
            SheetMark::Absent => "н",
            SheetMark::NonWorkday => "",
        }
    }
}

impl From<DayOutcome> for SheetMark {
    fn from(outcome: DayOutcome) -> Self {
        match outcome {
            DayOutcome::PayablePresent => SheetMark::Present,
            DayOutcome::Sick => SheetMark::Sick,
            DayOutcome::Vacation => SheetMark::Vacation,
            DayOutcome::PayableAbsentUncategorized => SheetMark::Absent,
            DayOutcome::NonWorkday => SheetMark::NonWorkday,
        }
    }
}

/// One day cell of one child's row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetDay {
    /// The calendar date of the cell.
    pub date: NaiveDate,
    /// The mark to print.
    pub mark: SheetMark,
    /// True iff the date is a Saturday or Sunday.
    pub is_weekend: bool,
    /// True iff the date is a marked holiday.
    pub is_holiday: bool,
}

/// Per-child totals shown at the end of the row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildSheetSummary {
    /// Days marked present.
    pub present_days: u32,
    /// Days absent due to sickness.
    pub sick_days: u32,
    /// Days absent on vacation.
    pub vacation_days: u32,
    /// Other absences, including unmarked workdays.
    pub other_absence_days: u32,
    /// Payable days (`present_days + other_absence_days`).
    pub payable_days: u32,
}

/// One child's row of the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildSheet {
    /// The child's id.
    pub child_id: ChildId,
    /// The child's display name.
    pub child_name: String,
    /// One cell per day of the month, in order.
    pub days: Vec<SheetDay>,
    /// Row totals.
    pub summary: ChildSheetSummary,
}

/// The complete data of one group's monthly attendance sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSheet {
    /// The group the sheet is for.
    pub group_id: GroupId,
    /// The sheet year.
    pub year: i32,
    /// The sheet month (1-12).
    pub month: u32,
    /// Number of calendar days in the month.
    pub days_in_month: u32,
    /// Number of workdays (neither weekend nor holiday) in the month.
    pub workdays_in_month: u32,
    /// The marked holidays of the month, sorted ascending.
    pub holiday_dates: Vec<NaiveDate>,
    /// One row per child, ordered by child id.
    pub children: Vec<ChildSheet>,
    /// Number of present children per day, one entry per calendar day.
    pub daily_present_totals: Vec<u32>,
}

/// Builds the attendance sheet data for one group and month.
///
/// An empty group produces a sheet with no rows but correct calendar
/// metadata (days, workdays, holidays).
pub fn build_attendance_sheet<S>(
    store: &S,
    group_id: GroupId,
    year: i32,
    month: u32,
) -> EngineResult<AttendanceSheet>
where
    S: ChildSource + HolidaySource + AttendanceSource + ?Sized,
{
    let (first, last) = month_bounds(year, month)?;

    let children = store
        .fetch_children(group_id)
        .map_err(|err| EngineError::LookupFailed {
            entity: "children".to_string(),
            message: err.to_string(),
        })?;

    let mut holiday_dates: Vec<NaiveDate> = store
        .fetch_holidays(first, last)
        .map_err(|err| EngineError::LookupFailed {
            entity: "holidays".to_string(),
            message: err.to_string(),
        })?
        .into_iter()
        .map(|h| h.date)
        .collect();
    holiday_dates.sort_unstable();
    holiday_dates.dedup();

    let holiday_set = holiday_dates.iter().copied().collect();
    let day_classifications = classify_month(year, month, &holiday_set)?;
    let days_in_month = day_classifications.len() as u32;
    let workdays_in_month = day_classifications.iter().filter(|d| d.is_workday()).count() as u32;

    let mut daily_present_totals = vec![0u32; day_classifications.len()];
    let mut rows = Vec::with_capacity(children.len());

    for child in &children {
        let records = store
            .fetch_attendance(child.id, first, last)
            .map_err(|err| EngineError::AttendanceLookupFailed {
                child_id: child.id,
                message: err.to_string(),
            })?;
        let by_date: HashMap<NaiveDate, _> =
            records.into_iter().map(|r| (r.date, r)).collect();

        let mut summary = ChildSheetSummary::default();
        let mut days = Vec::with_capacity(day_classifications.len());

        for (index, classification) in day_classifications.iter().enumerate() {
            let outcome = evaluate_day(classification, by_date.get(&classification.date));
            match outcome {
                DayOutcome::PayablePresent => {
                    summary.present_days += 1;
                    daily_present_totals[index] += 1;
                }
                DayOutcome::Sick => summary.sick_days += 1,
                DayOutcome::Vacation => summary.vacation_days += 1,
                DayOutcome::PayableAbsentUncategorized => summary.other_absence_days += 1,
                DayOutcome::NonWorkday => {}
            }
            days.push(SheetDay {
                date: classification.date,
                mark: outcome.into(),
                is_weekend: classification.is_weekend,
                is_holiday: classification.is_holiday,
            });
        }

        summary.payable_days = summary.present_days + summary.other_absence_days;
        rows.push(ChildSheet {
            child_id: child.id,
            child_name: child.full_name.clone(),
            days,
            summary,
        });
    }

    debug!(
        group_id,
        year,
        month,
        children = rows.len(),
        "Built attendance sheet data"
    );

    Ok(AttendanceSheet {
        group_id,
        year,
        month,
        days_in_month,
        workdays_in_month,
        holiday_dates,
        children: rows,
        daily_present_totals,
    })
}
