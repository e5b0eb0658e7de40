//! HTTP request handlers for the fee engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::engine::calculate_and_persist_monthly_charges;
use crate::report::build_attendance_sheet;

use super::request::{AttendanceReportQuery, ChargeCalculationRequest};
use super::response::{ApiError, ApiErrorResponse, ChargeRunResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/charges/monthly", post(calculate_charges_handler))
        .route("/reports/attendance", get(attendance_report_handler))
        .with_state(state)
}

/// Handler for POST /charges/monthly.
///
/// Calculates the monthly charges for every child of the requested group
/// and persists them, returning the saved rows.
async fn calculate_charges_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChargeCalculationRequest>, JsonRejection>,
) -> impl IntoResponse {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing charge calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = json_rejection_error(&correlation_id, rejection);
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response();
        }
    };

    let individual_rates = request.rates_map();

    let start_time = Instant::now();
    match calculate_and_persist_monthly_charges(
        state.store(),
        request.group_id,
        request.year,
        request.month,
        request.default_day_rate,
        &individual_rates,
    ) {
        Ok(charges) => {
            let duration = start_time.elapsed();
            info!(
                correlation_id = %correlation_id,
                group_id = request.group_id,
                charges_count = charges.len(),
                duration_us = duration.as_micros(),
                "Charge calculation completed successfully"
            );
            let response = ChargeRunResponse {
                calculation_id: correlation_id,
                timestamp: Utc::now(),
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                group_id: request.group_id,
                year: request.year,
                month: request.month,
                charges,
            };
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(response),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Charge calculation failed"
            );
            let api_error: ApiErrorResponse = err.into();
            (
                api_error.status,
                [(header::CONTENT_TYPE, "application/json")],
                Json(api_error.error),
            )
                .into_response()
        }
    }
}

/// Handler for GET /reports/attendance.
///
/// Returns the attendance sheet data for one group and month.
async fn attendance_report_handler(
    State(state): State<AppState>,
    query: Result<Query<AttendanceReportQuery>, QueryRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing attendance report request");

    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            warn!(
                correlation_id = %correlation_id,
                error = %rejection,
                "Invalid report query"
            );
            let error = ApiError::validation_error(rejection.to_string());
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response();
        }
    };

    match build_attendance_sheet(state.store(), query.group_id, query.year, query.month) {
        Ok(sheet) => {
            info!(
                correlation_id = %correlation_id,
                group_id = query.group_id,
                children_count = sheet.children.len(),
                "Attendance report built successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(sheet),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Attendance report failed"
            );
            let api_error: ApiErrorResponse = err.into();
            (
                api_error.status,
                [(header::CONTENT_TYPE, "application/json")],
                Json(api_error.error),
            )
                .into_response()
        }
    }
}

/// Maps a JSON extractor rejection to the API error body.
fn json_rejection_error(correlation_id: &Uuid, rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    }
}
