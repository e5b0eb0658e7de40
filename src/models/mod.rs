//! Core data models for the fee calculation engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod charge;
mod child;

pub use attendance::{AbsenceType, AttendanceRecord, Holiday};
pub use charge::{MonthlyCharge, MonthlyChargeSummary};
pub use child::{Child, ChildId, GroupId};
