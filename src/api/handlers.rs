//! HTTP request handlers for the net-hours API.
//!
//! This module contains the handler functions for all API endpoints.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{calculate_blocking, run_batch};
use crate::error::EngineResult;
use crate::models::{CalculationResult, PayPeriod};
use crate::store::InMemoryStore;

use super::request::{BatchRequest, NetHoursRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/net-hours", post(net_hours_handler))
        .route("/net-hours/batch", post(batch_handler))
        .with_state(state)
}

/// Maps a JSON extraction failure onto a 400 response.
fn rejection_response(rejection: JsonRejection, correlation_id: Uuid) -> ApiErrorResponse {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's description of the problem
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
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
    };
    ApiErrorResponse::bad_request(error)
}

fn json_ok<T: serde::Serialize>(body: T) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn blank_employee_id() -> ApiErrorResponse {
    ApiErrorResponse::bad_request(ApiError::validation_error("employee id must not be empty"))
}

/// Handler for POST /net-hours.
///
/// Calculates net hours for one employee from the records in the request.
async fn net_hours_handler(
    State(state): State<AppState>,
    payload: Result<Json<NetHoursRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing net-hours request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id).into_response(),
    };

    if request.employee.id.trim().is_empty() {
        warn!(correlation_id = %correlation_id, "Blank employee id");
        return blank_employee_id().into_response();
    }

    match perform_calculation(request, &state).await {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %result.calculation.employee_id,
                net_hours = %result.calculation.net_hours,
                warnings = result.calculation.audit_trace.warnings.len(),
                duration_us = result.duration_us,
                "Calculation completed successfully"
            );
            json_ok(result)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Calculation failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Loads the request's records into a scratch store and calculates from it.
///
/// The calculation runs on the blocking pool under the same per-employee
/// time limit as batch runs.
async fn perform_calculation(
    request: NetHoursRequest,
    state: &AppState,
) -> EngineResult<CalculationResult> {
    let start_time = Instant::now();
    let period: PayPeriod = request.pay_period.into();
    period.validate()?;

    let employee_id = request.employee.id.clone();
    let mut store = InMemoryStore::new();
    request.employee.load_into(&mut store, &period)?;

    let calculation = calculate_blocking(
        Arc::new(store),
        state.shared_rules(),
        employee_id,
        Arc::new(period),
        state.batch_options().per_employee_timeout,
        None,
    )
    .await?;
    Ok(CalculationResult::new(
        calculation,
        start_time.elapsed().as_micros() as u64,
    ))
}

/// Handler for POST /net-hours/batch.
///
/// Calculates net hours for every employee in the request over one period.
/// A failure for one employee is reported in its result slot; only invalid
/// request data fails the whole request.
async fn batch_handler(
    State(state): State<AppState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing batch request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id).into_response(),
    };

    let period: PayPeriod = request.pay_period.into();
    if let Err(err) = period.validate() {
        warn!(correlation_id = %correlation_id, error = %err, "Invalid batch period");
        return ApiErrorResponse::from(err).into_response();
    }

    let mut store = InMemoryStore::new();
    let mut seen = HashSet::new();
    let mut employee_ids = Vec::new();
    for employee in request.employees {
        if employee.id.trim().is_empty() {
            warn!(correlation_id = %correlation_id, "Blank employee id in batch");
            return blank_employee_id().into_response();
        }
        if seen.insert(employee.id.clone()) {
            employee_ids.push(employee.id.clone());
        }
        if let Err(err) = employee.load_into(&mut store, &period) {
            warn!(correlation_id = %correlation_id, error = %err, "Invalid batch record");
            return ApiErrorResponse::from(err).into_response();
        }
    }

    let start_time = Instant::now();
    let report = run_batch(
        Arc::new(store),
        state.shared_rules(),
        employee_ids,
        period,
        state.batch_options(),
    )
    .await;

    info!(
        correlation_id = %correlation_id,
        succeeded = report.succeeded,
        failed = report.failed,
        duration_us = start_time.elapsed().as_micros() as u64,
        "Batch completed"
    );
    json_ok(report)
}
