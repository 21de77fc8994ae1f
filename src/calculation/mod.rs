//! Calculation logic for the net-hours engine.
//!
//! This module contains the stages of a net-hours calculation, in the order
//! they run: day bucketing of punches, the leave and remote-work overlay,
//! lateness and tier penalty evaluation, the period-level permission offset,
//! and the final aggregation. [`calculate_net_hours`] composes them for one
//! employee and [`run_batch`] fans that out across a payroll run.

mod batch;
mod day_bucketizer;
mod lateness;
mod net_hours;
mod overlay;
mod permission_ledger;

pub use batch::{
    BatchOptions, BatchReport, DEFAULT_BATCH_CONCURRENCY, DEFAULT_EMPLOYEE_TIMEOUT,
    EmployeeOutcome, calculate_blocking, run_batch,
};
pub use day_bucketizer::{BucketedDay, BucketizeResult, bucketize_events, hours_between};
pub use lateness::{
    LatenessResult, TierLookup, calculate_lateness_minutes, evaluate_lateness, lookup_tier_penalty,
};
pub use net_hours::{
    NetHoursAggregate, aggregate_net_hours, calculate_for_employee, calculate_net_hours,
};
pub use overlay::{OverlayResult, STANDARD_DAY_HOURS, apply_overlay, wfh_day_hours};
pub use permission_ledger::{PermissionLedger, PermissionOffsetResult, apply_permission_offset};
