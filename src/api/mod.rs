//! HTTP API module for the Accrual Allocation Engine.
//!
//! This module provides the REST endpoints for portfolio, actuals and
//! monthly bucket reports.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{ActualsRequest, BucketRequest, CalculationRequest, TimeLogRequest};
pub use response::{ApiError, ENGINE_VERSION, ReportEnvelope};
pub use state::AppState;
