//! Monthly charge aggregation.
//!
//! This module folds per-day outcomes into a per-child summary for one
//! calendar month: category counts, the payable-day total, the applicable
//! day rate (individual override or group default), and the resulting
//! amount. The attendance source is injected, so the aggregator is pure
//! and unit-testable without a database.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::calculation::{
    DayClassification, DayOutcome, classify_month, evaluate_day, month_bounds,
};
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, Child, ChildId, MonthlyChargeSummary};
use crate::store::AttendanceSource;

/// Rounds a monetary value to exactly 2 decimal places, half-up.
///
/// Matches `Decimal("...").quantize(Decimal("0.01"), ROUND_HALF_UP)`
/// semantics: the midpoint rounds away from zero, and the result always
/// carries two fractional digits.
///
/// # Example
///
/// ```
/// use fee_engine::calculation::round_half_up;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let amount = Decimal::from_str("120.0500").unwrap();
/// assert_eq!(round_half_up(amount).to_string(), "120.05");
/// let midpoint = Decimal::from_str("100.005").unwrap();
/// assert_eq!(round_half_up(midpoint).to_string(), "100.01");
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Calculates one [`MonthlyChargeSummary`] per child for the given month.
///
/// # Arguments
///
/// * `children` - The children to calculate for; output order matches
/// * `year`, `month` - The calculation period
/// * `default_day_rate` - The group's rate, applied when no override exists
/// * `individual_rates` - Per-child rate overrides
/// * `attendance` - The injected attendance lookup collaborator
/// * `holiday_dates` - The set of marked holiday dates for the month
///
/// # Errors
///
/// * [`EngineError::InvalidPeriod`] for an out-of-range period
/// * [`EngineError::InvalidRate`] for a negative default or individual rate
/// * [`EngineError::AttendanceLookupFailed`] when the attendance
///   collaborator fails for any child; the whole batch aborts rather than
///   silently skipping a child, which would produce an incomplete,
///   undetectable billing run
pub fn calculate_monthly_charges<A: AttendanceSource + ?Sized>(
    children: &[Child],
    year: i32,
    month: u32,
    default_day_rate: Decimal,
    individual_rates: &HashMap<ChildId, Decimal>,
    attendance: &A,
    holiday_dates: &HashSet<NaiveDate>,
) -> EngineResult<Vec<MonthlyChargeSummary>> {
    let (first, last) = month_bounds(year, month)?;

    if default_day_rate < Decimal::ZERO {
        return Err(EngineError::InvalidRate {
            child_id: None,
            rate: default_day_rate,
        });
    }
    let mut override_ids: Vec<ChildId> = individual_rates.keys().copied().collect();
    override_ids.sort_unstable();
    for child_id in override_ids {
        let rate = individual_rates[&child_id];
        if rate < Decimal::ZERO {
            return Err(EngineError::InvalidRate {
                child_id: Some(child_id),
                rate,
            });
        }
    }

    // Classified once, shared across all children.
    let day_classifications = classify_month(year, month, holiday_dates)?;

    let mut summaries = Vec::with_capacity(children.len());
    for child in children {
        let records = attendance
            .fetch_attendance(child.id, first, last)
            .map_err(|err| EngineError::AttendanceLookupFailed {
                child_id: child.id,
                message: err.to_string(),
            })?;
        let by_date: HashMap<NaiveDate, AttendanceRecord> =
            records.into_iter().map(|r| (r.date, r)).collect();

        let day_rate = individual_rates
            .get(&child.id)
            .copied()
            .unwrap_or(default_day_rate);

        summaries.push(summarize_child(
            child,
            year,
            month,
            day_rate,
            &day_classifications,
            &by_date,
        ));
    }

    Ok(summaries)
}

fn summarize_child(
    child: &Child,
    year: i32,
    month: u32,
    day_rate: Decimal,
    day_classifications: &[DayClassification],
    by_date: &HashMap<NaiveDate, AttendanceRecord>,
) -> MonthlyChargeSummary {
    let mut present_days = 0;
    let mut sick_days = 0;
    let mut vacation_days = 0;
    let mut uncategorized_absence_days = 0;
    let mut non_workdays = 0;
    let mut breakdown = Vec::with_capacity(day_classifications.len());

    for classification in day_classifications {
        let outcome = evaluate_day(classification, by_date.get(&classification.date));
        match outcome {
            DayOutcome::PayablePresent => present_days += 1,
            DayOutcome::PayableAbsentUncategorized => uncategorized_absence_days += 1,
            DayOutcome::Sick => sick_days += 1,
            DayOutcome::Vacation => vacation_days += 1,
            DayOutcome::NonWorkday => non_workdays += 1,
        }
        breakdown.push(format!(
            "{}:{}",
            classification.date.format("%-d"),
            outcome.code()
        ));
    }

    let payable_days = present_days + uncategorized_absence_days;
    let amount_due = round_half_up(Decimal::from(payable_days) * day_rate);

    let calculation_details = format!(
        "Child: {}. Payable days: {}. Day rate: {}. Amount due: {}. Days: [{}]",
        child.full_name,
        payable_days,
        day_rate,
        amount_due,
        breakdown.join("; ")
    );

    MonthlyChargeSummary {
        child_id: child.id,
        child_name: child.full_name.clone(),
        year,
        month,
        present_days,
        sick_days,
        vacation_days,
        uncategorized_absence_days,
        non_workdays,
        payable_days,
        day_rate,
        amount_due,
        calculation_details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AbsenceType;
    use crate::store::{MemoryStore, StoreError};
    use chrono::Datelike;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn child(id: ChildId, name: &str) -> Child {
        Child {
            id,
            full_name: name.to_string(),
            group_id: Some(1),
        }
    }

    fn calculate_for(
        store: &MemoryStore,
        children: &[Child],
        default_rate: &str,
        individual_rates: &HashMap<ChildId, Decimal>,
        holidays: &HashSet<NaiveDate>,
    ) -> EngineResult<Vec<MonthlyChargeSummary>> {
        calculate_monthly_charges(
            children,
            2024,
            2,
            dec(default_rate),
            individual_rates,
            store,
            holidays,
        )
    }

    // ==========================================================================
    // MC-001: February 2024, no records at all, every weekday payable
    // ==========================================================================
    #[test]
    fn test_mc_001_empty_month_charges_all_weekdays() {
        let store = MemoryStore::new();
        let children = [child(1, "Anna Petrova")];

        let summaries = calculate_for(
            &store,
            &children,
            "100.00",
            &HashMap::new(),
            &HashSet::new(),
        )
        .unwrap();

        assert_eq!(summaries.len(), 1);
        let summary = &summaries[0];
        // February 2024 has 29 days, 8 weekend days, 21 weekdays.
        assert_eq!(summary.payable_days, 21);
        assert_eq!(summary.uncategorized_absence_days, 21);
        assert_eq!(summary.present_days, 0);
        assert_eq!(summary.non_workdays, 8);
        assert_eq!(summary.amount_due, dec("2100.00"));
    }

    // ==========================================================================
    // MC-002: a present mark does not change the payable total
    // ==========================================================================
    #[test]
    fn test_mc_002_present_day_keeps_payable_total() {
        let store = MemoryStore::new();
        store.add_attendance(AttendanceRecord {
            child_id: 1,
            date: make_date("2024-02-05"), // a Monday
            present: true,
            absence_reason: None,
            absence_type: None,
        });
        let children = [child(1, "Anna Petrova")];

        let summaries = calculate_for(
            &store,
            &children,
            "100.00",
            &HashMap::new(),
            &HashSet::new(),
        )
        .unwrap();

        let summary = &summaries[0];
        assert_eq!(summary.present_days, 1);
        assert_eq!(summary.uncategorized_absence_days, 20);
        assert_eq!(summary.payable_days, 21);
        assert_eq!(summary.amount_due, dec("2100.00"));
    }

    // ==========================================================================
    // MC-003: a sick day is removed from the payable total
    // ==========================================================================
    #[test]
    fn test_mc_003_sick_day_reduces_payable_total() {
        let store = MemoryStore::new();
        store.add_attendance(AttendanceRecord {
            child_id: 1,
            date: make_date("2024-02-06"), // a Tuesday
            present: false,
            absence_reason: None,
            absence_type: Some(AbsenceType::SickLeave),
        });
        let children = [child(1, "Anna Petrova")];

        let summaries = calculate_for(
            &store,
            &children,
            "100.00",
            &HashMap::new(),
            &HashSet::new(),
        )
        .unwrap();

        let summary = &summaries[0];
        assert_eq!(summary.sick_days, 1);
        assert_eq!(summary.payable_days, 20);
        assert_eq!(summary.amount_due, dec("2000.00"));
    }

    // ==========================================================================
    // MC-004: a holiday excludes the day even when a present mark exists
    // ==========================================================================
    #[test]
    fn test_mc_004_holiday_overrides_present_mark() {
        let store = MemoryStore::new();
        store.add_attendance(AttendanceRecord {
            child_id: 1,
            date: make_date("2024-02-08"), // a Thursday
            present: true,
            absence_reason: None,
            absence_type: None,
        });
        let children = [child(1, "Anna Petrova")];
        let holidays: HashSet<NaiveDate> = [make_date("2024-02-08")].into_iter().collect();

        let summaries =
            calculate_for(&store, &children, "100.00", &HashMap::new(), &holidays).unwrap();

        let summary = &summaries[0];
        assert_eq!(summary.present_days, 0);
        assert_eq!(summary.non_workdays, 9);
        assert_eq!(summary.payable_days, 20);
        assert_eq!(summary.amount_due, dec("2000.00"));
    }

    // ==========================================================================
    // MC-005: individual rate overrides the group default
    // ==========================================================================
    #[test]
    fn test_mc_005_individual_rate_override() {
        let store = MemoryStore::new();
        let children = [child(1, "Anna Petrova"), child(2, "Ivan Sidorov")];
        let individual_rates: HashMap<ChildId, Decimal> =
            [(1, dec("150.00"))].into_iter().collect();

        let summaries = calculate_for(
            &store,
            &children,
            "100.00",
            &individual_rates,
            &HashSet::new(),
        )
        .unwrap();

        assert_eq!(summaries[0].day_rate, dec("150.00"));
        assert_eq!(summaries[0].amount_due, dec("3150.00")); // 21 * 150
        assert_eq!(summaries[1].day_rate, dec("100.00"));
        assert_eq!(summaries[1].amount_due, dec("2100.00"));
    }

    // ==========================================================================
    // MC-006: rounding is half-up to 2 decimal places
    // ==========================================================================
    #[test]
    fn test_mc_006_amount_rounds_half_up() {
        let store = MemoryStore::new();
        let children = [child(1, "Anna Petrova")];
        // Sick leave on all weekdays except ten, leaving 10 payable days.
        let mut payable_left = 0;
        for day in 1..=29 {
            let date = NaiveDate::from_ymd_opt(2024, 2, day).unwrap();
            if matches!(
                date.weekday(),
                chrono::Weekday::Sat | chrono::Weekday::Sun
            ) {
                continue;
            }
            if payable_left < 10 {
                payable_left += 1;
                continue;
            }
            store.add_attendance(AttendanceRecord {
                child_id: 1,
                date,
                present: false,
                absence_reason: None,
                absence_type: Some(AbsenceType::SickLeave),
            });
        }

        let summaries = calculate_for(
            &store,
            &children,
            "12.345",
            &HashMap::new(),
            &HashSet::new(),
        )
        .unwrap();
        assert_eq!(summaries[0].payable_days, 10);
        // 10 * 12.345 = 123.450 -> 123.45
        assert_eq!(summaries[0].amount_due, dec("123.45"));

        let summaries = calculate_for(
            &store,
            &children,
            "12.005",
            &HashMap::new(),
            &HashSet::new(),
        )
        .unwrap();
        // 10 * 12.005 = 120.0500 -> 120.05
        assert_eq!(summaries[0].amount_due, dec("120.05"));
    }

    #[test]
    fn test_midpoint_rounds_up() {
        // 3 * 33.335 = 100.005 -> 100.01
        assert_eq!(round_half_up(dec("3") * dec("33.335")), dec("100.01"));
    }

    // ==========================================================================
    // MC-007: negative rates are rejected
    // ==========================================================================
    #[test]
    fn test_mc_007_negative_default_rate_rejected() {
        let store = MemoryStore::new();
        let children = [child(1, "Anna Petrova")];

        let result = calculate_for(
            &store,
            &children,
            "-1.00",
            &HashMap::new(),
            &HashSet::new(),
        );
        match result {
            Err(EngineError::InvalidRate { child_id: None, .. }) => {}
            other => panic!("Expected InvalidRate for default, got {:?}", other),
        }
    }

    #[test]
    fn test_mc_007_negative_individual_rate_rejected() {
        let store = MemoryStore::new();
        let children = [child(1, "Anna Petrova")];
        let individual_rates: HashMap<ChildId, Decimal> =
            [(1, dec("-0.01"))].into_iter().collect();

        let result = calculate_for(
            &store,
            &children,
            "100.00",
            &individual_rates,
            &HashSet::new(),
        );
        match result {
            Err(EngineError::InvalidRate {
                child_id: Some(1), ..
            }) => {}
            other => panic!("Expected InvalidRate for child 1, got {:?}", other),
        }
    }

    // ==========================================================================
    // MC-008: a failing attendance lookup aborts the whole batch
    // ==========================================================================
    struct FailingAttendance;

    impl AttendanceSource for FailingAttendance {
        fn fetch_attendance(
            &self,
            _child_id: ChildId,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<Vec<AttendanceRecord>, StoreError> {
            Err(StoreError::Unavailable {
                message: "connection reset".to_string(),
            })
        }
    }

    #[test]
    fn test_mc_008_lookup_failure_aborts_batch() {
        let children = [child(1, "Anna Petrova"), child(2, "Ivan Sidorov")];

        let result = calculate_monthly_charges(
            &children,
            2024,
            2,
            dec("100.00"),
            &HashMap::new(),
            &FailingAttendance,
            &HashSet::new(),
        );

        match result {
            Err(EngineError::AttendanceLookupFailed { child_id: 1, message }) => {
                assert!(message.contains("connection reset"));
            }
            other => panic!("Expected AttendanceLookupFailed, got {:?}", other),
        }
    }

    // ==========================================================================
    // Structural properties
    // ==========================================================================
    #[test]
    fn test_output_order_matches_input_order() {
        let store = MemoryStore::new();
        let children = [child(5, "E"), child(2, "B"), child(9, "I")];

        let summaries = calculate_for(
            &store,
            &children,
            "100.00",
            &HashMap::new(),
            &HashSet::new(),
        )
        .unwrap();
        let ids: Vec<ChildId> = summaries.iter().map(|s| s.child_id).collect();
        assert_eq!(ids, vec![5, 2, 9]);
    }

    #[test]
    fn test_category_counts_sum_to_days_in_month() {
        let store = MemoryStore::new();
        store.add_attendance(AttendanceRecord {
            child_id: 1,
            date: make_date("2024-02-06"),
            present: false,
            absence_reason: Some("в отпуске".to_string()),
            absence_type: None,
        });
        let children = [child(1, "Anna Petrova")];

        let summaries = calculate_for(
            &store,
            &children,
            "100.00",
            &HashMap::new(),
            &HashSet::new(),
        )
        .unwrap();
        let s = &summaries[0];
        assert_eq!(
            s.present_days + s.sick_days + s.vacation_days + s.uncategorized_absence_days
                + s.non_workdays,
            29
        );
        assert_eq!(s.vacation_days, 1);
    }

    #[test]
    fn test_details_string_is_deterministic_and_descriptive() {
        let store = MemoryStore::new();
        let children = [child(1, "Anna Petrova")];

        let run = || {
            calculate_for(
                &store,
                &children,
                "100.00",
                &HashMap::new(),
                &HashSet::new(),
            )
            .unwrap()[0]
                .calculation_details
                .clone()
        };

        let details = run();
        assert_eq!(details, run());
        assert!(details.contains("Anna Petrova"));
        assert!(details.contains("Payable days: 21"));
        assert!(details.contains("Day rate: 100.00"));
        assert!(details.contains("Amount due: 2100.00"));
        assert!(details.contains("1:A")); // Feb 1 2024, Thursday, unmarked
        assert!(details.contains("3:-")); // Feb 3 2024, Saturday
    }

    #[test]
    fn test_zero_rate_charges_nothing() {
        let store = MemoryStore::new();
        let children = [child(1, "Anna Petrova")];

        let summaries =
            calculate_for(&store, &children, "0", &HashMap::new(), &HashSet::new()).unwrap();
        assert_eq!(summaries[0].amount_due, dec("0.00"));
    }

    #[test]
    fn test_invalid_period_propagates() {
        let store = MemoryStore::new();
        let result = calculate_monthly_charges(
            &[child(1, "Anna")],
            2024,
            13,
            dec("100.00"),
            &HashMap::new(),
            &store,
            &HashSet::new(),
        );
        assert!(matches!(result, Err(EngineError::InvalidPeriod { .. })));
    }
}
