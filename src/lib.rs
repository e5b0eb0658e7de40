//! Monthly attendance fee calculation engine for kindergarten billing.
//!
//! This crate classifies every calendar day of a month for every child in a
//! group (weekend, holiday, present, sick, vacation, unmarked absence),
//! derives the number of payable days, and converts that into an idempotent
//! monthly charge record per child.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod engine;
pub mod error;
pub mod models;
pub mod report;
pub mod store;
