//! Storage contracts for the fee engine.
//!
//! The engine never talks to a database directly: children, holidays,
//! attendance, and charge rows are reached through the narrow trait
//! contracts in this module, injected by the caller. [`MemoryStore`] is the
//! reference implementation used by tests and embedding binaries.

mod memory;

pub use memory::MemoryStore;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{AttendanceRecord, Child, ChildId, GroupId, Holiday, MonthlyCharge,
    MonthlyChargeSummary};

/// An error raised by a storage collaborator.
///
/// Deliberately opaque: the engine wraps it into the matching
/// [`EngineError`](crate::error::EngineError) variant and never retries.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not serve the request.
    #[error("store unavailable: {message}")]
    Unavailable {
        /// A description of the failure.
        message: String,
    },
}

/// Read access to the children of a group.
pub trait ChildSource {
    /// Fetches all children assigned to `group_id`, in stable id order.
    fn fetch_children(&self, group_id: GroupId) -> Result<Vec<Child>, StoreError>;
}

/// Read access to marked holidays.
pub trait HolidaySource {
    /// Fetches all holidays with `start <= date <= end`.
    fn fetch_holidays(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Holiday>, StoreError>;
}

/// Read access to attendance records.
pub trait AttendanceSource {
    /// Fetches all attendance records for one child with
    /// `start <= date <= end`.
    fn fetch_attendance(
        &self,
        child_id: ChildId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, StoreError>;
}

/// Write access to monthly charge rows.
pub trait ChargeStore {
    /// Upserts one charge row per summary, as a single atomic batch.
    ///
    /// For each summary an existing row for `(child_id, year, month)` is
    /// overwritten (amount, details, calculated_at); otherwise a new row is
    /// inserted. Either every summary is persisted or none is; partial
    /// recalculation of a group would be worse than no recalculation.
    fn upsert_charges(
        &self,
        summaries: &[MonthlyChargeSummary],
        year: i32,
        month: u32,
    ) -> Result<Vec<MonthlyCharge>, StoreError>;
}

/// Umbrella trait for a store that implements all four contracts.
///
/// Lets the engine and the HTTP state hold one `Arc<dyn DataStore>` instead
/// of four separate handles.
pub trait DataStore:
    ChildSource + HolidaySource + AttendanceSource + ChargeStore + Send + Sync
{
}

impl<T> DataStore for T where
    T: ChildSource + HolidaySource + AttendanceSource + ChargeStore + Send + Sync
{
}
