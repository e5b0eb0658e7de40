//! Property-based tests for the monthly charge calculation.
//!
//! These check structural invariants that must hold for any month and any
//! attendance pattern, rather than specific scenario amounts.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use fee_engine::calculation::{
    calculate_monthly_charges, classify_month, days_in_month, round_half_up,
};
use fee_engine::models::{AbsenceType, AttendanceRecord, Child, MonthlyChargeSummary};
use fee_engine::store::MemoryStore;

/// One generated attendance mark: present, or absent with a category.
type DayMark = Option<(bool, u8)>;

fn absence_type_for(code: u8) -> AbsenceType {
    match code % 3 {
        0 => AbsenceType::SickLeave,
        1 => AbsenceType::Vacation,
        _ => AbsenceType::Other,
    }
}

fn store_with_pattern(year: i32, month: u32, pattern: &[DayMark]) -> MemoryStore {
    let store = MemoryStore::new();
    store.add_child(Child {
        id: 1,
        full_name: "Property Child".to_string(),
        group_id: Some(10),
    });

    let days = days_in_month(year, month).unwrap();
    for (index, mark) in pattern.iter().enumerate().take(days as usize) {
        let Some((present, code)) = mark else {
            continue;
        };
        let date = NaiveDate::from_ymd_opt(year, month, index as u32 + 1).unwrap();
        store.add_attendance(AttendanceRecord {
            child_id: 1,
            date,
            present: *present,
            absence_reason: None,
            absence_type: if *present {
                None
            } else {
                Some(absence_type_for(*code))
            },
        });
    }
    store
}

fn summary_for(
    year: i32,
    month: u32,
    rate: Decimal,
    pattern: &[DayMark],
) -> MonthlyChargeSummary {
    let store = store_with_pattern(year, month, pattern);
    let children = vec![Child {
        id: 1,
        full_name: "Property Child".to_string(),
        group_id: Some(10),
    }];
    let mut summaries = calculate_monthly_charges(
        &children,
        year,
        month,
        rate,
        &HashMap::new(),
        &store,
        &HashSet::new(),
    )
    .unwrap();
    summaries.pop().unwrap()
}

fn rate_2dp() -> impl Strategy<Value = Decimal> {
    (0u64..=100_000).prop_map(|cents| Decimal::new(cents as i64, 2))
}

fn pattern() -> impl Strategy<Value = Vec<DayMark>> {
    prop::collection::vec(prop::option::of((any::<bool>(), 0..3u8)), 31)
}

proptest! {
    /// The five outcome categories partition the month exactly.
    #[test]
    fn category_counts_cover_every_day(
        year in 2000..=2100i32,
        month in 1..=12u32,
        pattern in pattern(),
    ) {
        let summary = summary_for(year, month, Decimal::ONE_HUNDRED, &pattern);
        let total = summary.present_days
            + summary.sick_days
            + summary.vacation_days
            + summary.uncategorized_absence_days
            + summary.non_workdays;
        prop_assert_eq!(total, days_in_month(year, month).unwrap());
    }

    /// Payable days never exceed the number of workdays in the month.
    #[test]
    fn payable_days_bounded_by_workdays(
        year in 2000..=2100i32,
        month in 1..=12u32,
        pattern in pattern(),
    ) {
        let summary = summary_for(year, month, Decimal::ONE_HUNDRED, &pattern);
        let workdays = classify_month(year, month, &HashSet::new())
            .unwrap()
            .iter()
            .filter(|d| d.is_workday())
            .count() as u32;
        prop_assert_eq!(
            summary.payable_days,
            summary.present_days + summary.uncategorized_absence_days
        );
        prop_assert!(summary.payable_days <= workdays);
    }

    /// The amount is exactly the payable-day count times the rate, rounded.
    #[test]
    fn amount_is_rounded_product(
        year in 2000..=2100i32,
        month in 1..=12u32,
        rate in rate_2dp(),
        pattern in pattern(),
    ) {
        let summary = summary_for(year, month, rate, &pattern);
        let expected = round_half_up(Decimal::from(summary.payable_days) * rate);
        prop_assert_eq!(summary.amount_due, expected);
    }

    /// With a 2-decimal rate no rounding happens, so doubling the rate
    /// doubles the amount.
    #[test]
    fn doubling_a_2dp_rate_doubles_the_amount(
        year in 2000..=2100i32,
        month in 1..=12u32,
        rate in rate_2dp(),
        pattern in pattern(),
    ) {
        let single = summary_for(year, month, rate, &pattern);
        let double = summary_for(year, month, rate * Decimal::TWO, &pattern);
        prop_assert_eq!(double.amount_due, single.amount_due * Decimal::TWO);
    }

    /// A fully-present month is charged exactly the workday count.
    #[test]
    fn full_attendance_charges_every_workday(
        year in 2000..=2100i32,
        month in 1..=12u32,
    ) {
        let all_present: Vec<DayMark> = vec![Some((true, 0)); 31];
        let summary = summary_for(year, month, Decimal::ONE, &all_present);
        let workdays = classify_month(year, month, &HashSet::new())
            .unwrap()
            .iter()
            .filter(|d| d.is_workday())
            .count() as u32;
        prop_assert_eq!(summary.payable_days, workdays);
        prop_assert_eq!(summary.amount_due, round_half_up(Decimal::from(workdays)));
    }
}
