//! Leave and work-from-home records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a leave request, owned by the approval workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Submitted but not yet decided.
    Pending,
    /// Approved; the only status that credits hours.
    Approved,
    /// Declined by an approver.
    Rejected,
    /// Withdrawn by the employee.
    Cancelled,
}

/// A leave request covering an inclusive date range.
///
/// # Example
///
/// ```
/// use net_hours_engine::models::{LeaveRecord, LeaveStatus};
/// use chrono::NaiveDate;
///
/// let leave = LeaveRecord {
///     employee_id: "emp_001".to_string(),
///     start_date: NaiveDate::from_ymd_opt(2026, 1, 14).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
///     status: LeaveStatus::Approved,
///     policy: "annual".to_string(),
/// };
/// assert!(leave.covers(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRecord {
    /// The employee on leave.
    pub employee_id: String,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Approval status.
    pub status: LeaveStatus,
    /// Reference to the leave policy the request was filed under.
    #[serde(default)]
    pub policy: String,
}

impl LeaveRecord {
    /// True when the record is approved and the date falls inside it.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.status == LeaveStatus::Approved && date >= self.start_date && date <= self.end_date
    }

    /// True when the record's range intersects `[start, end]`, regardless of status.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && self.end_date >= start
    }
}

/// A single remote-work day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WfhRecord {
    /// The employee working remotely.
    pub employee_id: String,
    /// The remote-work date.
    pub date: NaiveDate,
}
