//! Read-only collaborator contracts.
//!
//! The engine never owns attendance, leave, WFH or rule data. Each source is
//! reached through one of the reader traits below, and a calculation performs
//! exactly one bounded read of each before doing any arithmetic.

mod memory;

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::debug;

use crate::config::{RuleDefinition, RuleKind};
use crate::error::EngineResult;
use crate::models::{AttendanceEvent, EmployeeInputs, LeaveRecord, PayPeriod};

pub use memory::InMemoryStore;

/// Supplies ordered punches for one employee.
pub trait AttendanceReader {
    /// Events with timestamps on dates within `[start, end]`, ordered by time.
    fn attendance_events(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<AttendanceEvent>>;
}

/// Supplies the active configuration for each rule kind.
pub trait RuleReader {
    /// The active rule of `kind`, or `None` when none is configured.
    fn active_rule(&self, kind: RuleKind) -> EngineResult<Option<RuleDefinition>>;
}

/// Supplies ad-hoc permission grants.
pub trait PermissionOverrideReader {
    /// Total extra minutes granted to the employee for the period starting on `period_start`.
    fn override_minutes(&self, employee_id: &str, period_start: NaiveDate) -> EngineResult<i64>;
}

/// Supplies leave records.
pub trait LeaveReader {
    /// Approved leave records overlapping `[start, end]`.
    fn approved_leaves(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<LeaveRecord>>;
}

/// Supplies remote-work days.
pub trait WfhReader {
    /// WFH dates within `[start, end]`.
    fn wfh_dates(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<BTreeSet<NaiveDate>>;
}

/// Every per-employee reader the engine needs.
pub trait EmployeeDataSource:
    AttendanceReader + PermissionOverrideReader + LeaveReader + WfhReader
{
}

impl<T> EmployeeDataSource for T where
    T: AttendanceReader + PermissionOverrideReader + LeaveReader + WfhReader + ?Sized
{
}

/// Performs the single bounded read for one (employee, period) pair.
///
/// # Example
///
/// ```
/// use net_hours_engine::models::PayPeriod;
/// use net_hours_engine::store::{InMemoryStore, load_employee_inputs};
/// use chrono::NaiveDate;
///
/// let store = InMemoryStore::new();
/// let period = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2026, 1, 12).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 1, 16).unwrap(),
/// );
/// let inputs = load_employee_inputs(&store, "emp_001", &period).unwrap();
/// assert!(inputs.events.is_empty());
/// ```
pub fn load_employee_inputs<S: EmployeeDataSource + ?Sized>(
    source: &S,
    employee_id: &str,
    period: &PayPeriod,
) -> EngineResult<EmployeeInputs> {
    period.validate()?;
    let (start, end) = (period.start_date, period.end_date);

    let events = source.attendance_events(employee_id, start, end)?;
    let leaves = source.approved_leaves(employee_id, start, end)?;
    let wfh_dates = source.wfh_dates(employee_id, start, end)?;
    let permission_override_minutes = source.override_minutes(employee_id, start)?;

    debug!(
        employee_id,
        events = events.len(),
        leaves = leaves.len(),
        wfh_days = wfh_dates.len(),
        permission_override_minutes,
        "Loaded employee inputs"
    );

    Ok(EmployeeInputs {
        employee_id: employee_id.to_string(),
        period: period.clone(),
        events,
        leaves,
        wfh_dates,
        permission_override_minutes,
    })
}
