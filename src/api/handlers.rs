//! HTTP request handlers for the Accrual Allocation Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    bucket_assignments, build_actuals_report, build_portfolio_report, normalize_assignments,
};
use crate::config::EngineSettings;
use crate::error::EngineError;
use crate::models::{Assignment, AuditWarning};
use crate::sources::InMemoryTimeLogs;

use super::request::{ActualsRequest, BucketRequest, CalculationRequest};
use super::response::{ApiError, ApiErrorResponse, ReportEnvelope};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/actuals", post(actuals_handler))
        .route("/buckets", post(buckets_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn engine_error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // body_text carries serde's detailed message
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            ApiError::validation_error(body_text)
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
    json_response(StatusCode::BAD_REQUEST, error)
}

fn settings_for(state: &AppState, as_of: NaiveDate) -> Result<EngineSettings, EngineError> {
    state.config().settings_on(as_of)
}

/// Handler for POST /calculate endpoint.
///
/// Normalizes the submitted assignments and returns a portfolio report in
/// the requested mode.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let as_of = request.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let settings = match settings_for(&state, as_of) {
        Ok(settings) => settings,
        Err(err) => return engine_error_response(correlation_id, err),
    };

    let start_time = Instant::now();
    let assignments = normalize_assignments(&request.assignments, &settings, as_of);
    let report = build_portfolio_report(&assignments, request.mode, &settings);

    info!(
        correlation_id = %correlation_id,
        mode = %request.mode,
        assignments = assignments.len(),
        degraded = report.degraded_count,
        profit = %report.totals.profit.round_dp(2),
        duration_us = start_time.elapsed().as_micros(),
        "Calculation completed successfully"
    );
    json_response(
        StatusCode::OK,
        ReportEnvelope::new(correlation_id, as_of, report),
    )
}

/// Handler for POST /actuals endpoint.
///
/// Computes an actual-basis report from the submitted time logs.
async fn actuals_handler(
    State(state): State<AppState>,
    payload: Result<Json<ActualsRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing actuals request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let as_of = request.as_of.unwrap_or_else(|| request.window.end());
    let settings = match settings_for(&state, as_of) {
        Ok(settings) => settings,
        Err(err) => return engine_error_response(correlation_id, err),
    };

    let start_time = Instant::now();
    let assignments = normalize_assignments(&request.assignments, &settings, as_of);
    let time_logs = InMemoryTimeLogs::new(request.time_logs.into_iter().map(Into::into).collect());

    match build_actuals_report(&assignments, request.window, &time_logs, &settings) {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                assignments = assignments.len(),
                degraded = report.degraded_count,
                profit = %report.totals.profit.round_dp(2),
                duration_us = start_time.elapsed().as_micros(),
                "Actuals completed successfully"
            );
            json_response(
                StatusCode::OK,
                ReportEnvelope::new(correlation_id, as_of, report),
            )
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for POST /buckets endpoint.
///
/// Returns twelve monthly accrual buckets for the requested year.
async fn buckets_handler(
    State(state): State<AppState>,
    payload: Result<Json<BucketRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing bucket request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let as_of = request.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let settings = match settings_for(&state, as_of) {
        Ok(settings) => settings,
        Err(err) => return engine_error_response(correlation_id, err),
    };

    let start_time = Instant::now();
    let normalized = normalize_assignments(&request.assignments, &settings, as_of);

    let mut input_warnings: Vec<AuditWarning> = Vec::new();
    let mut assignments: Vec<Assignment> = Vec::with_capacity(normalized.len());
    for item in normalized {
        input_warnings.extend(item.warnings.into_iter().map(|w| AuditWarning {
            message: format!("[{}] {}", item.assignment.id, w.message),
            ..w
        }));
        assignments.push(item.assignment);
    }

    let mut report = bucket_assignments(&assignments, request.calendar, request.year, &settings);
    input_warnings.append(&mut report.warnings);
    report.warnings = input_warnings;

    info!(
        correlation_id = %correlation_id,
        year = request.year,
        assignments = assignments.len(),
        revenue = %report.totals.revenue.round_dp(2),
        duration_us = start_time.elapsed().as_micros(),
        "Buckets completed successfully"
    );
    json_response(
        StatusCode::OK,
        ReportEnvelope::new(correlation_id, as_of, report),
    )
}
