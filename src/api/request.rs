//! Request types for the net-hours API.
//!
//! This module defines the JSON request structures for the `/net-hours` and
//! `/net-hours/batch` endpoints. Each employee's records arrive nested under
//! the employee, so the employee id is stated once.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{
    AttendanceEvent, EventKind, LeaveRecord, LeaveStatus, PayPeriod, PermissionOverride,
    PublicHoliday, WfhRecord,
};
use crate::store::InMemoryStore;

/// Request body for the `/net-hours` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetHoursRequest {
    /// The employee and their source records.
    pub employee: EmployeeDataRequest,
    /// The evaluated period.
    pub pay_period: PayPeriodRequest,
}

/// Request body for the `/net-hours/batch` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    /// The period every employee is evaluated over.
    pub pay_period: PayPeriodRequest,
    /// The employees and their source records.
    pub employees: Vec<EmployeeDataRequest>,
}

/// Pay period information in a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayPeriodRequest {
    /// The start date of the period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the period (inclusive).
    pub end_date: NaiveDate,
    /// Public holidays that fall within this period.
    #[serde(default)]
    pub public_holidays: Vec<PublicHolidayRequest>,
}

/// Public holiday information in a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicHolidayRequest {
    /// The date of the public holiday.
    pub date: NaiveDate,
    /// The name of the public holiday.
    pub name: String,
}

/// One employee's source records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeDataRequest {
    /// Unique identifier for the employee.
    pub id: String,
    /// Attendance punches.
    #[serde(default)]
    pub events: Vec<EventRequest>,
    /// Leave records in any status.
    #[serde(default)]
    pub leaves: Vec<LeaveRequest>,
    /// Remote-work dates.
    #[serde(default)]
    pub wfh_dates: Vec<NaiveDate>,
    /// HR-granted permission minutes.
    #[serde(default)]
    pub permission_overrides: Vec<PermissionOverrideRequest>,
}

/// A punch in a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRequest {
    /// When the punch was recorded.
    pub timestamp: NaiveDateTime,
    /// Sign-in or sign-out.
    pub kind: EventKind,
}

/// A leave record in a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Approval status.
    pub status: LeaveStatus,
    /// The leave policy the request was filed under.
    #[serde(default)]
    pub policy: String,
}

/// A permission override in a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionOverrideRequest {
    /// Extra minutes granted; must not be negative.
    pub extra_minutes: i64,
    /// The period the grant applies to; defaults to the request's period.
    #[serde(default)]
    pub period_start: Option<NaiveDate>,
    /// Who granted the minutes.
    #[serde(default)]
    pub granted_by: String,
    /// Why the minutes were granted.
    #[serde(default)]
    pub reason: String,
}

impl From<PayPeriodRequest> for PayPeriod {
    fn from(req: PayPeriodRequest) -> Self {
        PayPeriod {
            start_date: req.start_date,
            end_date: req.end_date,
            public_holidays: req.public_holidays.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<PublicHolidayRequest> for PublicHoliday {
    fn from(req: PublicHolidayRequest) -> Self {
        PublicHoliday {
            date: req.date,
            name: req.name,
        }
    }
}

impl EmployeeDataRequest {
    /// Writes the employee's records into the store.
    ///
    /// Overrides without a `period_start` are granted for `period`. Fails on
    /// a negative override, leaving earlier records of the employee stored.
    pub fn load_into(self, store: &mut InMemoryStore, period: &PayPeriod) -> EngineResult<()> {
        let employee_id = self.id;

        for event in self.events {
            store.record_event(AttendanceEvent {
                employee_id: employee_id.clone(),
                timestamp: event.timestamp,
                kind: event.kind,
            });
        }
        for leave in self.leaves {
            store.add_leave(LeaveRecord {
                employee_id: employee_id.clone(),
                start_date: leave.start_date,
                end_date: leave.end_date,
                status: leave.status,
                policy: leave.policy,
            });
        }
        for date in self.wfh_dates {
            store.add_wfh(WfhRecord {
                employee_id: employee_id.clone(),
                date,
            });
        }
        for grant in self.permission_overrides {
            store.grant_override(PermissionOverride {
                employee_id: employee_id.clone(),
                period_start: grant.period_start.unwrap_or(period.start_date),
                extra_minutes: grant.extra_minutes,
                granted_by: grant.granted_by,
                reason: grant.reason,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::store::{AttendanceReader, LeaveReader, PermissionOverrideReader, WfhReader};

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_deserialize_net_hours_request() {
        let json = r#"{
            "employee": {
                "id": "emp_001",
                "events": [
                    { "timestamp": "2026-01-15T09:00:00", "kind": "sign_in" },
                    { "timestamp": "2026-01-15T17:00:00", "kind": "sign_out" }
                ],
                "leaves": [
                    { "start_date": "2026-01-16", "end_date": "2026-01-16", "status": "approved" }
                ],
                "wfh_dates": ["2026-01-14"],
                "permission_overrides": [{ "extra_minutes": 30, "granted_by": "hr_admin" }]
            },
            "pay_period": {
                "start_date": "2026-01-12",
                "end_date": "2026-01-16"
            }
        }"#;

        let request: NetHoursRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.employee.id, "emp_001");
        assert_eq!(request.employee.events.len(), 2);
        assert_eq!(request.employee.events[1].kind, EventKind::SignOut);
        assert_eq!(request.employee.leaves[0].status, LeaveStatus::Approved);
        assert_eq!(request.employee.permission_overrides[0].period_start, None);
        assert!(request.pay_period.public_holidays.is_empty());
    }

    #[test]
    fn test_only_id_is_required() {
        let json = r#"{ "id": "emp_002" }"#;
        let employee: EmployeeDataRequest = serde_json::from_str(json).unwrap();
        assert!(employee.events.is_empty());
        assert!(employee.wfh_dates.is_empty());
    }

    #[test]
    fn test_pay_period_conversion() {
        let req = PayPeriodRequest {
            start_date: make_date("2026-01-01"),
            end_date: make_date("2026-01-31"),
            public_holidays: vec![PublicHolidayRequest {
                date: make_date("2026-01-26"),
                name: "Australia Day".to_string(),
            }],
        };
        let period: PayPeriod = req.into();
        assert!(period.is_public_holiday(make_date("2026-01-26")));
        assert_eq!(period.day_count(), 31);
    }

    #[test]
    fn test_load_into_store() {
        let json = r#"{
            "id": "emp_001",
            "events": [{ "timestamp": "2026-01-15T09:00:00", "kind": "sign_in" }],
            "leaves": [{ "start_date": "2026-01-16", "end_date": "2026-01-16", "status": "approved", "policy": "annual" }],
            "wfh_dates": ["2026-01-14"],
            "permission_overrides": [{ "extra_minutes": 30 }]
        }"#;
        let employee: EmployeeDataRequest = serde_json::from_str(json).unwrap();
        let period = PayPeriod::new(make_date("2026-01-12"), make_date("2026-01-16"));

        let mut store = InMemoryStore::new();
        employee.load_into(&mut store, &period).unwrap();

        let (start, end) = (period.start_date, period.end_date);
        assert_eq!(store.attendance_events("emp_001", start, end).unwrap().len(), 1);
        assert_eq!(store.approved_leaves("emp_001", start, end).unwrap().len(), 1);
        assert_eq!(store.wfh_dates("emp_001", start, end).unwrap().len(), 1);
        assert_eq!(store.override_minutes("emp_001", start).unwrap(), 30);
    }

    #[test]
    fn test_negative_override_rejected() {
        let employee = EmployeeDataRequest {
            id: "emp_001".to_string(),
            events: vec![],
            leaves: vec![],
            wfh_dates: vec![],
            permission_overrides: vec![PermissionOverrideRequest {
                extra_minutes: -15,
                period_start: None,
                granted_by: String::new(),
                reason: String::new(),
            }],
        };
        let period = PayPeriod::new(make_date("2026-01-12"), make_date("2026-01-16"));
        let mut store = InMemoryStore::new();
        assert!(matches!(
            employee.load_into(&mut store, &period),
            Err(EngineError::OutOfRangeOverride { minutes: -15, .. })
        ));
    }
}
