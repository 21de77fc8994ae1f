//! Day bucketing of attendance punches.
//!
//! This module groups an employee's sign-in/sign-out events by calendar day
//! and turns each day's punches into raw decimal hours, flagging days whose
//! punches cannot be paired cleanly.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{
    AttendanceEvent, AuditStep, AuditWarning, EventKind, PayPeriod, PunchAnomaly,
    WARN_MALFORMED_EVENT_PAIR, WARN_MULTIPLE_PUNCHES,
};

/// The punches of one calendar day reduced to a single interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketedDay {
    /// The calendar date.
    pub date: NaiveDate,
    /// Earliest sign-in of the day.
    pub first_sign_in: Option<NaiveDateTime>,
    /// Latest sign-out of the day.
    pub last_sign_out: Option<NaiveDateTime>,
    /// Hours between first sign-in and last sign-out, or 0 when unpaired.
    pub raw_hours: Decimal,
    /// Why the day was flagged, if it was.
    pub anomaly: Option<PunchAnomaly>,
    /// Number of punches recorded on the day.
    pub punch_count: usize,
}

/// The result of bucketing a period's events.
#[derive(Debug, Clone)]
pub struct BucketizeResult {
    /// One entry per date that had at least one punch.
    pub days: BTreeMap<NaiveDate, BucketedDay>,
    /// Warnings for anomalous days.
    pub warnings: Vec<AuditWarning>,
    /// The audit step summarising the bucketing.
    pub audit_step: AuditStep,
}

/// Converts the interval between two instants into decimal hours.
///
/// Whole minutes are counted; seconds are truncated.
///
/// # Example
///
/// ```
/// use net_hours_engine::calculation::hours_between;
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let start = NaiveDateTime::parse_from_str("2026-01-15 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let end = NaiveDateTime::parse_from_str("2026-01-15 16:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// assert_eq!(hours_between(start, end), Decimal::new(75, 1));
/// ```
pub fn hours_between(start: NaiveDateTime, end: NaiveDateTime) -> Decimal {
    Decimal::new((end - start).num_minutes(), 0) / Decimal::new(60, 0)
}

/// Reduces one day's time-ordered punches to a [`BucketedDay`].
fn classify_day(date: NaiveDate, punches: &[&AttendanceEvent]) -> BucketedDay {
    let sign_ins: Vec<NaiveDateTime> = punches
        .iter()
        .filter(|e| e.kind == EventKind::SignIn)
        .map(|e| e.timestamp)
        .collect();
    let sign_outs: Vec<NaiveDateTime> = punches
        .iter()
        .filter(|e| e.kind == EventKind::SignOut)
        .map(|e| e.timestamp)
        .collect();

    let first_sign_in = sign_ins.first().copied();
    let last_sign_out = sign_outs.last().copied();

    let mut anomaly = match (sign_ins.len(), sign_outs.len()) {
        (_, 0) => Some(PunchAnomaly::MissingSignOut),
        (0, _) => Some(PunchAnomaly::MissingSignIn),
        (1, 1) => None,
        _ => Some(PunchAnomaly::MultiplePunches),
    };

    if let (Some(sign_in), Some(sign_out)) = (first_sign_in, last_sign_out) {
        if sign_out <= sign_in {
            anomaly = Some(PunchAnomaly::SignOutBeforeSignIn);
        }
    }

    let raw_hours = match (anomaly, first_sign_in, last_sign_out) {
        (Some(a), _, _) if a.zeroes_hours() => Decimal::ZERO,
        (_, Some(sign_in), Some(sign_out)) => hours_between(sign_in, sign_out),
        _ => Decimal::ZERO,
    };

    BucketedDay {
        date,
        first_sign_in,
        last_sign_out,
        raw_hours,
        anomaly,
        punch_count: punches.len(),
    }
}

/// Groups events by calendar day and derives raw hours per day.
///
/// Events dated outside the period are ignored. Events are ordered by
/// timestamp before grouping, so already-ordered input is unchanged.
///
/// A day with one sign-in followed by one sign-out yields the interval
/// between them. A day with a missing counterpart, or whose sign-out is not
/// after its sign-in, yields 0 hours and is flagged. A day with more than one
/// pair uses the first sign-in and the last sign-out and is flagged.
///
/// # Example
///
/// ```
/// use net_hours_engine::calculation::bucketize_events;
/// use net_hours_engine::models::{AttendanceEvent, EventKind, PayPeriod};
/// use chrono::{NaiveDate, NaiveDateTime};
/// use rust_decimal::Decimal;
///
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap();
/// let events = vec![
///     AttendanceEvent { employee_id: "emp_001".into(), timestamp: at("2026-01-15 09:00"), kind: EventKind::SignIn },
///     AttendanceEvent { employee_id: "emp_001".into(), timestamp: at("2026-01-15 17:00"), kind: EventKind::SignOut },
/// ];
/// let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
/// let result = bucketize_events(&events, &PayPeriod::new(date, date), 1);
///
/// assert_eq!(result.days[&date].raw_hours, Decimal::new(8, 0));
/// assert!(result.days[&date].anomaly.is_none());
/// ```
pub fn bucketize_events(
    events: &[AttendanceEvent],
    period: &PayPeriod,
    step_number: u32,
) -> BucketizeResult {
    let mut ordered: Vec<&AttendanceEvent> = events
        .iter()
        .filter(|e| period.contains_date(e.date()))
        .collect();
    ordered.sort_by_key(|e| e.timestamp);
    let ignored = events.len() - ordered.len();

    let mut grouped: BTreeMap<NaiveDate, Vec<&AttendanceEvent>> = BTreeMap::new();
    for event in ordered {
        grouped.entry(event.date()).or_default().push(event);
    }

    let mut days = BTreeMap::new();
    let mut warnings = Vec::new();
    let mut total_raw_hours = Decimal::ZERO;

    for (date, punches) in &grouped {
        let day = classify_day(*date, punches);

        if let Some(anomaly) = day.anomaly {
            warn!(
                date = %date,
                anomaly = %anomaly,
                punches = day.punch_count,
                "Anomalous attendance day"
            );
            let (code, severity) = match anomaly {
                PunchAnomaly::MultiplePunches => (WARN_MULTIPLE_PUNCHES, "low"),
                _ => (WARN_MALFORMED_EVENT_PAIR, "medium"),
            };
            warnings.push(AuditWarning::new(
                code,
                format!(
                    "{}: {} ({} punches); {} hours counted",
                    date,
                    anomaly,
                    day.punch_count,
                    day.raw_hours.normalize()
                ),
                severity,
            ));
        }

        total_raw_hours += day.raw_hours;
        days.insert(*date, day);
    }

    let anomalous_days = days.values().filter(|d| d.anomaly.is_some()).count();
    let complete_days = days.len() - anomalous_days;

    let audit_step = AuditStep {
        step_number,
        rule_id: "day_bucketizer".to_string(),
        rule_name: "Day Bucketizer".to_string(),
        input: serde_json::json!({
            "events": events.len(),
            "ignored_outside_period": ignored,
            "start_date": period.start_date.to_string(),
            "end_date": period.end_date.to_string()
        }),
        output: serde_json::json!({
            "days_with_punches": days.len(),
            "complete_days": complete_days,
            "anomalous_days": anomalous_days,
            "raw_hours": total_raw_hours.normalize().to_string()
        }),
        reasoning: format!(
            "Paired punches on {} day(s): {} complete, {} anomalous, {} raw hours",
            days.len(),
            complete_days,
            anomalous_days,
            total_raw_hours.normalize()
        ),
    };

    BucketizeResult {
        days,
        warnings,
        audit_step,
    }
}
