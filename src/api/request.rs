//! Request types for the fee engine API.
//!
//! Wire-side structures are kept separate from the domain types so the
//! JSON contract can evolve without touching the calculation code.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{ChildId, GroupId};

/// Request body for `POST /charges/monthly`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeCalculationRequest {
    /// The group to calculate charges for.
    pub group_id: GroupId,
    /// The charge year.
    pub year: i32,
    /// The charge month (1-12).
    pub month: u32,
    /// The rate applied per payable day unless overridden per child.
    pub default_day_rate: Decimal,
    /// Per-child rate overrides.
    #[serde(default)]
    pub individual_rates: Vec<IndividualRate>,
}

/// A per-child day rate override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndividualRate {
    /// The child the override applies to.
    pub child_id: ChildId,
    /// The overriding day rate.
    pub day_rate: Decimal,
}

impl ChargeCalculationRequest {
    /// Collapses the override list into a lookup map.
    ///
    /// If a child appears more than once the last entry wins, matching
    /// the usual JSON duplicate-key behaviour.
    pub fn rates_map(&self) -> HashMap<ChildId, Decimal> {
        self.individual_rates
            .iter()
            .map(|r| (r.child_id, r.day_rate))
            .collect()
    }
}

/// Query parameters for `GET /reports/attendance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceReportQuery {
    /// The group to report on.
    pub group_id: GroupId,
    /// The report year.
    pub year: i32,
    /// The report month (1-12).
    pub month: u32,
}
