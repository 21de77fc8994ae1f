//! HTTP API module for the net-hours engine.
//!
//! This module provides the REST endpoints for calculating net hours for a
//! single employee and for a whole payroll batch.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    BatchRequest, EmployeeDataRequest, EventRequest, LeaveRequest, NetHoursRequest,
    PayPeriodRequest, PermissionOverrideRequest, PublicHolidayRequest,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
