//! The bounded input slice for one (employee, period) calculation.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{AttendanceEvent, LeaveRecord, PayPeriod};

/// Everything the engine reads for one employee over one period.
///
/// Built by a single bounded read of each collaborator; the calculation
/// itself does no further I/O.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeInputs {
    /// The employee being evaluated.
    pub employee_id: String,
    /// The evaluated period.
    pub period: PayPeriod,
    /// Punches within the period, ordered by timestamp.
    #[serde(default)]
    pub events: Vec<AttendanceEvent>,
    /// Approved leave overlapping the period.
    #[serde(default)]
    pub leaves: Vec<LeaveRecord>,
    /// Remote-work dates within the period.
    #[serde(default)]
    pub wfh_dates: BTreeSet<NaiveDate>,
    /// Total extra permission minutes granted for this period.
    #[serde(default)]
    pub permission_override_minutes: i64,
}

impl EmployeeInputs {
    /// Creates an empty input slice for the employee and period.
    pub fn new(employee_id: impl Into<String>, period: PayPeriod) -> Self {
        Self {
            employee_id: employee_id.into(),
            period,
            events: Vec::new(),
            leaves: Vec::new(),
            wfh_dates: BTreeSet::new(),
            permission_override_minutes: 0,
        }
    }
}
