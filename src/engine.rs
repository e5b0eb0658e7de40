//! The top-level calculate-and-persist operation.
//!
//! One logical operation is exposed to callers (an HTTP handler, a UI
//! action): calculate the monthly charges for every child of a group and
//! upsert them as a single batch. Recalculation is idempotent and safe to
//! re-run in full; no error is retried here, retries are a caller policy.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::calculation::{calculate_monthly_charges, month_bounds};
use crate::error::{EngineError, EngineResult};
use crate::models::{ChildId, GroupId, MonthlyCharge};
use crate::store::DataStore;

/// Calculates and persists monthly charges for every child in a group.
///
/// Fetches the group's children and the month's holidays, runs the monthly
/// aggregator, and upserts one charge row per child in a single atomic
/// batch. An empty group yields an empty result and persists nothing.
///
/// # Errors
///
/// * [`EngineError::InvalidPeriod`] / [`EngineError::InvalidRate`] for bad
///   inputs, surfaced before anything is fetched or written
/// * [`EngineError::LookupFailed`] when children or holidays cannot be
///   fetched
/// * [`EngineError::AttendanceLookupFailed`] when attendance cannot be
///   fetched for any child (whole batch aborts, nothing persisted)
/// * [`EngineError::PersistenceFailed`] when the upsert batch fails; the
///   summaries were computed but nothing was saved, and the caller must
///   retry the whole operation
pub fn calculate_and_persist_monthly_charges<S: DataStore + ?Sized>(
    store: &S,
    group_id: GroupId,
    year: i32,
    month: u32,
    default_day_rate: Decimal,
    individual_rates: &HashMap<ChildId, Decimal>,
) -> EngineResult<Vec<MonthlyCharge>> {
    let (first, last) = month_bounds(year, month)?;

    info!(
        group_id,
        year,
        month,
        %default_day_rate,
        individual_rates = individual_rates.len(),
        "Starting monthly charge calculation"
    );

    let children = store
        .fetch_children(group_id)
        .map_err(|err| EngineError::LookupFailed {
            entity: "children".to_string(),
            message: err.to_string(),
        })?;
    if children.is_empty() {
        info!(group_id, "No children in group, nothing to charge");
        return Ok(Vec::new());
    }

    let holiday_dates: HashSet<NaiveDate> = store
        .fetch_holidays(first, last)
        .map_err(|err| EngineError::LookupFailed {
            entity: "holidays".to_string(),
            message: err.to_string(),
        })?
        .into_iter()
        .map(|h| h.date)
        .collect();
    debug!(
        children = children.len(),
        holidays = holiday_dates.len(),
        "Fetched calculation inputs"
    );

    let summaries = calculate_monthly_charges(
        &children,
        year,
        month,
        default_day_rate,
        individual_rates,
        store,
        &holiday_dates,
    )?;

    let charges = store
        .upsert_charges(&summaries, year, month)
        .map_err(|err| EngineError::PersistenceFailed {
            message: err.to_string(),
        })?;

    info!(
        group_id,
        year,
        month,
        charges = charges.len(),
        "Monthly charge calculation complete"
    );
    Ok(charges)
}
