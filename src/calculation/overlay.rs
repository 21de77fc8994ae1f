//! Leave and remote-work overlay.
//!
//! This module turns the bucketed attendance into one [`DailyHoursRecord`] per
//! date of the period. Approved leave wins over remote work, and remote work
//! wins over logged attendance; a date with neither keeps its raw hours.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::WfhPolicyRule;
use crate::models::{
    AuditStep, AuditWarning, DailyHoursRecord, DayStatus, LeaveRecord, PayPeriod,
    WARN_PUBLIC_HOLIDAY_ATTENDANCE, WARN_WFH_ALLOWANCE_EXCEEDED, WARN_WFH_POLICY_MISSING,
};

use super::day_bucketizer::BucketedDay;

/// Hours in one standard working day.
///
/// Credited for approved leave and used as the remote-work baseline when no
/// attendance was logged.
pub const STANDARD_DAY_HOURS: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// The per-date records of a period after leave and remote work are applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayResult {
    /// One record per date of the period, ascending.
    pub days: Vec<DailyHoursRecord>,
    /// One step per leave or remote-work date.
    pub audit_steps: Vec<AuditStep>,
    /// Allowance, missing-policy and holiday warnings.
    pub warnings: Vec<AuditWarning>,
}

/// Remote-work days credited so far, per calendar month.
#[derive(Debug, Default)]
struct WfhAllowanceTracker {
    used: HashMap<(i32, u32), u32>,
}

impl WfhAllowanceTracker {
    /// Counts the date against its month and returns the month's running total.
    fn record(&mut self, date: NaiveDate) -> u32 {
        let used = self.used.entry((date.year(), date.month())).or_insert(0);
        *used += 1;
        *used
    }
}

/// The record for a date with no leave or remote-work credit.
fn attendance_record(date: NaiveDate, bucket: Option<&BucketedDay>) -> DailyHoursRecord {
    match bucket {
        Some(day) => DailyHoursRecord {
            date,
            status: if day.anomaly.is_some() {
                DayStatus::Anomalous
            } else {
                DayStatus::Normal
            },
            first_sign_in: day.first_sign_in,
            last_sign_out: day.last_sign_out,
            raw_hours: day.raw_hours,
            day_hours: day.raw_hours,
            anomaly: day.anomaly,
            lateness_minutes: 0,
            penalty_minutes: 0,
            is_public_holiday: false,
        },
        None => DailyHoursRecord {
            date,
            status: DayStatus::Absent,
            first_sign_in: None,
            last_sign_out: None,
            raw_hours: Decimal::ZERO,
            day_hours: Decimal::ZERO,
            anomaly: None,
            lateness_minutes: 0,
            penalty_minutes: 0,
            is_public_holiday: false,
        },
    }
}

/// Hours credited for a remote-work day.
///
/// Logged hours are scaled when there are any; otherwise the standard day is.
///
/// # Example
///
/// ```
/// use net_hours_engine::calculation::wfh_day_hours;
/// use rust_decimal::Decimal;
///
/// assert_eq!(wfh_day_hours(Decimal::ZERO, Decimal::new(80, 0)), Decimal::new(64, 1));
/// assert_eq!(wfh_day_hours(Decimal::new(7, 0), Decimal::new(80, 0)), Decimal::new(56, 1));
/// ```
pub fn wfh_day_hours(raw_hours: Decimal, contribution_percentage: Decimal) -> Decimal {
    let base = if raw_hours > Decimal::ZERO {
        raw_hours
    } else {
        STANDARD_DAY_HOURS
    };
    base * contribution_percentage / Decimal::ONE_HUNDRED
}

/// Applies approved leave and remote-work records over the bucketed days.
///
/// For each date of the period, in order:
///
/// 1. An approved leave record covering the date credits
///    [`STANDARD_DAY_HOURS`], whatever attendance or remote work exists.
/// 2. Otherwise a remote-work date is scaled by the policy's contribution
///    percentage. Dates past the month's `monthly_allowance_days` are still
///    credited but raise a warning for review. With no policy active,
///    remote-work dates keep their attendance hours and raise a warning.
/// 3. Otherwise the bucketed raw hours are used, or 0 when nothing was logged.
///
/// Public holidays are flagged on the record; they do not change the hours.
///
/// # Arguments
///
/// * `period` - The evaluated period
/// * `buckets` - Bucketed attendance keyed by date
/// * `leaves` - Leave records; non-approved ones are ignored
/// * `wfh_dates` - Remote-work dates
/// * `wfh_policy` - The active remote-work policy, if any
/// * `first_step_number` - Step number of the first step emitted
pub fn apply_overlay(
    period: &PayPeriod,
    buckets: &BTreeMap<NaiveDate, BucketedDay>,
    leaves: &[LeaveRecord],
    wfh_dates: &BTreeSet<NaiveDate>,
    wfh_policy: Option<&WfhPolicyRule>,
    first_step_number: u32,
) -> OverlayResult {
    let mut days = Vec::new();
    let mut audit_steps = Vec::new();
    let mut warnings = Vec::new();
    let mut tracker = WfhAllowanceTracker::default();
    let mut step_number = first_step_number;

    let wfh_in_period = wfh_dates.iter().any(|d| period.contains_date(*d));
    if wfh_in_period && wfh_policy.is_none() {
        debug!("No wfh_policy rule active; remote-work days use attendance hours");
        warnings.push(AuditWarning::new(
            WARN_WFH_POLICY_MISSING,
            "Remote-work days recorded but no wfh_policy rule is active; attendance hours used",
            "low",
        ));
    }

    for date in period.dates() {
        let bucket = buckets.get(&date);
        let is_public_holiday = period.is_public_holiday(date);

        let record = if let Some(leave) = leaves.iter().find(|l| l.covers(date)) {
            audit_steps.push(AuditStep {
                step_number,
                rule_id: "leave_overlay".to_string(),
                rule_name: "Approved Leave Credit".to_string(),
                input: serde_json::json!({
                    "date": date.to_string(),
                    "leave_start": leave.start_date.to_string(),
                    "leave_end": leave.end_date.to_string(),
                    "policy": leave.policy,
                    "raw_hours_logged": bucket.map(|b| b.raw_hours.normalize().to_string())
                }),
                output: serde_json::json!({
                    "day_hours": STANDARD_DAY_HOURS.to_string()
                }),
                reasoning: format!(
                    "Approved leave covers {}; credited {} standard hours",
                    date, STANDARD_DAY_HOURS
                ),
            });
            step_number += 1;

            DailyHoursRecord {
                status: DayStatus::Leave,
                day_hours: STANDARD_DAY_HOURS,
                ..attendance_record(date, bucket)
            }
        } else if wfh_dates.contains(&date) {
            match wfh_policy {
                Some(policy) => {
                    let base = attendance_record(date, bucket);
                    let percentage = policy.attendance_contribution_percentage;
                    let day_hours = wfh_day_hours(base.raw_hours, percentage);
                    let used_this_month = tracker.record(date);

                    if used_this_month > policy.monthly_allowance_days {
                        warn!(
                            date = %date,
                            allowance_days = policy.monthly_allowance_days,
                            used_this_month,
                            "Remote-work allowance exceeded for the month"
                        );
                        warnings.push(AuditWarning::new(
                            WARN_WFH_ALLOWANCE_EXCEEDED,
                            format!(
                                "{}: remote-work day {} of the month exceeds the allowance of {}",
                                date, used_this_month, policy.monthly_allowance_days
                            ),
                            "medium",
                        ));
                    }

                    audit_steps.push(AuditStep {
                        step_number,
                        rule_id: "wfh_overlay".to_string(),
                        rule_name: "Remote Work Contribution".to_string(),
                        input: serde_json::json!({
                            "date": date.to_string(),
                            "raw_hours": base.raw_hours.normalize().to_string(),
                            "contribution_percentage": percentage.normalize().to_string(),
                            "month_days_used": used_this_month,
                            "monthly_allowance_days": policy.monthly_allowance_days
                        }),
                        output: serde_json::json!({
                            "day_hours": day_hours.normalize().to_string()
                        }),
                        reasoning: if base.raw_hours > Decimal::ZERO {
                            format!(
                                "{} logged hours x {}% = {} hours",
                                base.raw_hours.normalize(),
                                percentage.normalize(),
                                day_hours.normalize()
                            )
                        } else {
                            format!(
                                "No hours logged; {} standard hours x {}% = {} hours",
                                STANDARD_DAY_HOURS,
                                percentage.normalize(),
                                day_hours.normalize()
                            )
                        },
                    });
                    step_number += 1;

                    DailyHoursRecord {
                        status: DayStatus::Wfh,
                        day_hours,
                        ..base
                    }
                }
                None => attendance_record(date, bucket),
            }
        } else {
            attendance_record(date, bucket)
        };

        if is_public_holiday && bucket.is_some() {
            warnings.push(AuditWarning::new(
                WARN_PUBLIC_HOLIDAY_ATTENDANCE,
                format!("{}: attendance logged on a public holiday", date),
                "low",
            ));
        }

        days.push(DailyHoursRecord {
            is_public_holiday,
            ..record
        });
    }

    OverlayResult {
        days,
        audit_steps,
        warnings,
    }
}
