//! Error types for the fee calculation engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during charge calculation.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::ChildId;

/// The main error type for the fee calculation engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use fee_engine::error::EngineError;
///
/// let error = EngineError::InvalidPeriod { year: 2024, month: 13 };
/// assert_eq!(
///     error.to_string(),
///     "Invalid period 13/2024: month must be 1-12 and year 2000-2100"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// The requested (year, month) pair is outside the supported range.
    #[error("Invalid period {month}/{year}: month must be 1-12 and year 2000-2100")]
    InvalidPeriod {
        /// The requested year.
        year: i32,
        /// The requested month.
        month: u32,
    },

    /// A day rate (default or individual) was negative.
    #[error("Invalid day rate {rate} for {}", child_display(.child_id))]
    InvalidRate {
        /// The child the rate belongs to, or `None` for the group default.
        child_id: Option<ChildId>,
        /// The offending rate value.
        rate: Decimal,
    },

    /// The injected attendance collaborator failed for a child.
    ///
    /// Aborts the whole batch; no partial charges are produced.
    #[error("Attendance lookup failed for child {child_id}: {message}")]
    AttendanceLookupFailed {
        /// The child whose attendance could not be fetched.
        child_id: ChildId,
        /// A description of the underlying failure.
        message: String,
    },

    /// A child or holiday lookup from the data store failed.
    #[error("Lookup of {entity} failed: {message}")]
    LookupFailed {
        /// The kind of data that could not be fetched (e.g. "children").
        entity: String,
        /// A description of the underlying failure.
        message: String,
    },

    /// The charge upsert batch could not be committed.
    ///
    /// The whole transaction is rolled back; nothing was saved and the
    /// caller must retry the full operation.
    #[error("Failed to persist monthly charges: {message}")]
    PersistenceFailed {
        /// A description of the underlying failure.
        message: String,
    },
}

fn child_display(child_id: &Option<ChildId>) -> String {
    match child_id {
        Some(id) => format!("child {id}"),
        None => "group default".to_string(),
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
