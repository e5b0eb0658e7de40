//! Calculation logic for the fee engine.
//!
//! This module contains the calendar classifier that derives weekend and
//! holiday flags for each day of a month, the day payability rule that turns
//! a day classification plus an optional attendance record into a single
//! day outcome, and the monthly aggregator that folds day outcomes into a
//! per-child charge summary.

mod calendar;
mod day_rule;
mod monthly;

pub use calendar::{
    DayClassification, MAX_YEAR, MIN_YEAR, classify_month, days_in_month, month_bounds,
    validate_period,
};
pub use day_rule::{DayOutcome, absence_type_from_reason, effective_absence_type, evaluate_day};
pub use monthly::{calculate_monthly_charges, round_half_up};
