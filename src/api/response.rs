//! Response types for the fee engine API.
//!
//! This module defines the success and error response structures and the
//! mapping from engine errors to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{GroupId, MonthlyCharge};

/// Response body for a successful `POST /charges/monthly`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeRunResponse {
    /// Unique identifier of this calculation run.
    pub calculation_id: Uuid,
    /// When the run completed.
    pub timestamp: DateTime<Utc>,
    /// Version of the engine that produced the charges.
    pub engine_version: String,
    /// The group that was charged.
    pub group_id: GroupId,
    /// The charge year.
    pub year: i32,
    /// The charge month.
    pub month: u32,
    /// The persisted charge rows, one per child.
    pub charges: Vec<MonthlyCharge>,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::InvalidPeriod { year, month } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_PERIOD",
                    format!("Invalid period {}/{}", month, year),
                    "Month must be 1-12 and year between 2000 and 2100",
                ),
            },
            EngineError::InvalidRate { child_id, rate } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_RATE",
                    match child_id {
                        Some(id) => format!("Invalid day rate {} for child {}", rate, id),
                        None => format!("Invalid default day rate {}", rate),
                    },
                    "Day rates must not be negative",
                ),
            },
            EngineError::AttendanceLookupFailed { child_id, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "ATTENDANCE_LOOKUP_FAILED",
                    format!("Could not load attendance for child {}", child_id),
                    message,
                ),
            },
            EngineError::LookupFailed { entity, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "LOOKUP_FAILED",
                    format!("Could not load {}", entity),
                    message,
                ),
            },
            EngineError::PersistenceFailed { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "PERSISTENCE_FAILED",
                    "Could not save the calculated charges",
                    message,
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_invalid_period_maps_to_400() {
        let response: ApiErrorResponse =
            EngineError::InvalidPeriod { year: 2024, month: 13 }.into();
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.code, "INVALID_PERIOD");
        assert!(response.error.message.contains("13/2024"));
    }

    #[test]
    fn test_invalid_rate_maps_to_400() {
        let response: ApiErrorResponse = EngineError::InvalidRate {
            child_id: Some(7),
            rate: Decimal::NEGATIVE_ONE,
        }
        .into();
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.code, "INVALID_RATE");
        assert!(response.error.message.contains("child 7"));
    }

    #[test]
    fn test_store_failures_map_to_500() {
        let response: ApiErrorResponse = EngineError::PersistenceFailed {
            message: "store unavailable: connection reset".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.error.code, "PERSISTENCE_FAILED");

        let response: ApiErrorResponse = EngineError::LookupFailed {
            entity: "children".to_string(),
            message: "timeout".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.error.code, "LOOKUP_FAILED");
    }

    #[test]
    fn test_details_omitted_when_absent() {
        let error = ApiError::new("VALIDATION_ERROR", "bad input");
        let json = serde_json::to_string(&error).unwrap();
        assert!(!json.contains("details"));
    }
}
