//! HTTP API module for the fee engine.
//!
//! Exposes two endpoints: one to calculate and persist a group's monthly
//! charges, and one to fetch the monthly attendance sheet data.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{AttendanceReportQuery, ChargeCalculationRequest, IndividualRate};
pub use response::{ApiError, ChargeRunResponse};
pub use state::AppState;
