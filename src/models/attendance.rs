//! Attendance event model.
//!
//! Events are produced by clocks and imports outside the engine and are
//! read-only here.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Whether a punch records the start or the end of a working day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// The employee arrived.
    SignIn,
    /// The employee left.
    SignOut,
}

/// A single sign-in or sign-out punch.
///
/// # Example
///
/// ```
/// use net_hours_engine::models::{AttendanceEvent, EventKind};
/// use chrono::NaiveDateTime;
///
/// let event = AttendanceEvent {
///     employee_id: "emp_001".to_string(),
///     timestamp: NaiveDateTime::parse_from_str("2026-01-15 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
///     kind: EventKind::SignIn,
/// };
/// assert_eq!(event.date().to_string(), "2026-01-15");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEvent {
    /// The employee who punched.
    pub employee_id: String,
    /// Wall-clock time of the punch.
    pub timestamp: NaiveDateTime,
    /// Sign-in or sign-out.
    pub kind: EventKind,
}

impl AttendanceEvent {
    /// Calendar day the punch belongs to.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&EventKind::SignIn).unwrap(),
            "\"sign_in\""
        );
        assert_eq!(
            serde_json::to_string(&EventKind::SignOut).unwrap(),
            "\"sign_out\""
        );
    }

    #[test]
    fn test_deserialize_event() {
        let json = r#"{
            "employee_id": "emp_001",
            "timestamp": "2026-01-15T17:30:00",
            "kind": "sign_out"
        }"#;
        let event: AttendanceEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.kind, EventKind::SignOut);
        assert_eq!(event.date(), NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());
    }
}
