//! Net-hours aggregation and the single-employee calculation.
//!
//! [`calculate_net_hours`] is the pure entry point: it takes one employee's
//! bounded input slice and an explicit [`RuleSet`] and composes the day
//! bucketizer, the leave and remote-work overlay, lateness evaluation, the
//! permission offset and the final aggregation into a [`NetHoursCalculation`].

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::RuleSet;
use crate::error::EngineResult;
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, DailyHoursRecord, DayStatus, EmployeeInputs,
    NetHoursCalculation, NetHoursTotals, PayPeriod, WARN_LATENESS_BEYOND_TIERS,
    WARN_MISSING_RULE_CONFIG, WARN_NET_HOURS_CAPPED,
};
use crate::store::{EmployeeDataSource, load_employee_inputs};

use super::day_bucketizer::bucketize_events;
use super::lateness::evaluate_lateness;
use super::overlay::{STANDARD_DAY_HOURS, apply_overlay};
use super::permission_ledger::{PermissionLedger, apply_permission_offset};

const MINUTES_PER_HOUR: Decimal = Decimal::from_parts(60, 0, 0, false, 0);

/// The period-level totals produced by [`aggregate_net_hours`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetHoursAggregate {
    /// Sum of overlaid day hours.
    pub total_raw_hours: Decimal,
    /// Net penalty minutes expressed in hours.
    pub penalty_hours: Decimal,
    /// Days in the period times standard day hours.
    pub ceiling_hours: Decimal,
    /// Final figure, rounded to 2 decimal places.
    pub net_hours: Decimal,
    /// Whether the ceiling reduced the figure.
    pub capped: bool,
    /// The audit step recording the aggregation.
    pub audit_step: AuditStep,
}

/// Aggregates overlaid days and the net penalty into net hours.
///
/// `net_hours = min(max(0, total_raw_hours - penalty_hours), ceiling_hours)`,
/// rounded half away from zero to 2 decimal places, where the ceiling is the
/// number of days times [`STANDARD_DAY_HOURS`].
///
/// # Example
///
/// ```
/// use net_hours_engine::calculation::aggregate_net_hours;
/// use rust_decimal::Decimal;
///
/// let result = aggregate_net_hours(&[], 30, 1);
/// assert_eq!(result.net_hours, Decimal::ZERO);
/// ```
pub fn aggregate_net_hours(
    days: &[DailyHoursRecord],
    net_penalty_minutes: i64,
    step_number: u32,
) -> NetHoursAggregate {
    let total_raw_hours: Decimal = days.iter().map(|d| d.day_hours).sum();
    let penalty_hours = Decimal::from(net_penalty_minutes.max(0)) / MINUTES_PER_HOUR;
    let ceiling_hours = Decimal::from(days.len()) * STANDARD_DAY_HOURS;

    let floored = (total_raw_hours - penalty_hours).max(Decimal::ZERO);
    let capped = floored > ceiling_hours;
    let net_hours = floored
        .min(ceiling_hours)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    let mut reasoning = format!(
        "{} hours over {} day(s) less {} penalty hours = {} net hours",
        total_raw_hours.normalize(),
        days.len(),
        penalty_hours.round_dp(4).normalize(),
        net_hours.normalize()
    );
    if capped {
        reasoning.push_str(&format!(
            " (capped at {} hours)",
            ceiling_hours.normalize()
        ));
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "net_hours_aggregation".to_string(),
        rule_name: "Net Hours Aggregation".to_string(),
        input: serde_json::json!({
            "total_raw_hours": total_raw_hours.normalize().to_string(),
            "net_penalty_minutes": net_penalty_minutes.max(0),
            "days": days.len()
        }),
        output: serde_json::json!({
            "penalty_hours": penalty_hours.round_dp(4).normalize().to_string(),
            "ceiling_hours": ceiling_hours.normalize().to_string(),
            "capped": capped,
            "net_hours": net_hours.normalize().to_string()
        }),
        reasoning,
    };

    NetHoursAggregate {
        total_raw_hours,
        penalty_hours,
        ceiling_hours,
        net_hours,
        capped,
        audit_step,
    }
}

/// Calculates net hours for one employee over one period.
///
/// The calculation never fails for missing or incomplete data: missing rules
/// degrade to zero lateness, zero penalty, no allowance and remote-work
/// pass-through, and each degradation is recorded as a warning. Identical
/// inputs always yield an identical result.
///
/// # Example
///
/// ```
/// use net_hours_engine::calculation::calculate_net_hours;
/// use net_hours_engine::config::RuleSet;
/// use net_hours_engine::models::{AttendanceEvent, EmployeeInputs, EventKind, PayPeriod};
/// use chrono::{NaiveDate, NaiveDateTime};
/// use rust_decimal::Decimal;
///
/// let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap();
///
/// let mut inputs = EmployeeInputs::new("emp_001", PayPeriod::new(date, date));
/// inputs.events = vec![
///     AttendanceEvent { employee_id: "emp_001".into(), timestamp: at("2026-01-15 09:00"), kind: EventKind::SignIn },
///     AttendanceEvent { employee_id: "emp_001".into(), timestamp: at("2026-01-15 17:00"), kind: EventKind::SignOut },
/// ];
///
/// let result = calculate_net_hours(&inputs, &RuleSet::default());
/// assert_eq!(result.net_hours, Decimal::new(8, 0));
/// ```
pub fn calculate_net_hours(inputs: &EmployeeInputs, rules: &RuleSet) -> NetHoursCalculation {
    let period = &inputs.period;
    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();

    for kind in rules.missing_kinds() {
        debug!(employee_id = %inputs.employee_id, rule = %kind, "Rule not configured");
        warnings.push(AuditWarning::new(
            WARN_MISSING_RULE_CONFIG,
            format!("No active {} rule; conservative default applied", kind),
            "low",
        ));
    }

    let bucketed = bucketize_events(&inputs.events, period, 1);
    steps.push(bucketed.audit_step);
    warnings.extend(bucketed.warnings);

    let overlay = apply_overlay(
        period,
        &bucketed.days,
        &inputs.leaves,
        &inputs.wfh_dates,
        rules.wfh_policy.as_ref(),
        next_step(&steps),
    );
    steps.extend(overlay.audit_steps);
    warnings.extend(overlay.warnings);
    let mut days = overlay.days;

    if let Some(flexible_hours) = rules.flexible_hours.as_ref() {
        for day in days.iter_mut().filter(|d| d.status != DayStatus::Leave) {
            let Some(first_sign_in) = day.first_sign_in else {
                continue;
            };
            let result = evaluate_lateness(
                first_sign_in,
                Some(flexible_hours),
                rules.late_penalty.as_ref(),
                next_step(&steps),
            );
            if result.lookup.beyond_highest_tier {
                warn!(
                    employee_id = %inputs.employee_id,
                    date = %day.date,
                    lateness_minutes = result.lateness_minutes,
                    "Lateness beyond highest penalty tier"
                );
                warnings.push(AuditWarning::new(
                    WARN_LATENESS_BEYOND_TIERS,
                    format!(
                        "{}: {} minute(s) late exceeds every tier; highest tier penalty of {} minute(s) applied",
                        day.date, result.lateness_minutes, result.lookup.penalty_minutes
                    ),
                    "medium",
                ));
            }
            day.lateness_minutes = result.lateness_minutes;
            day.penalty_minutes = result.lookup.penalty_minutes;
            steps.push(result.audit_step);
        }
    }

    let gross_penalty_minutes: i64 = days.iter().map(|d| d.penalty_minutes).sum();
    let ledger = PermissionLedger::new(
        rules.permission.as_ref(),
        inputs.permission_override_minutes,
    );
    let offset = apply_permission_offset(gross_penalty_minutes, ledger, next_step(&steps));
    steps.push(offset.audit_step);

    let aggregate = aggregate_net_hours(&days, offset.net_penalty_minutes, next_step(&steps));
    steps.push(aggregate.audit_step);
    if aggregate.capped {
        warnings.push(AuditWarning::new(
            WARN_NET_HOURS_CAPPED,
            format!(
                "Net hours capped at {} ({} day(s) x {} hours)",
                aggregate.ceiling_hours.normalize(),
                days.len(),
                STANDARD_DAY_HOURS
            ),
            "low",
        ));
    }

    let count = |status: DayStatus| days.iter().filter(|d| d.status == status).count() as u32;
    let totals = NetHoursTotals {
        total_raw_hours: aggregate.total_raw_hours,
        gross_penalty_minutes: offset.gross_penalty_minutes,
        monthly_allowance_minutes: ledger.monthly_allowance_minutes,
        override_minutes: ledger.override_minutes,
        total_allowance_minutes: ledger.total_allowance_minutes(),
        net_penalty_minutes: offset.net_penalty_minutes,
        penalty_hours: aggregate.penalty_hours,
        ceiling_hours: aggregate.ceiling_hours,
        capped: aggregate.capped,
        leave_days: count(DayStatus::Leave),
        wfh_days: count(DayStatus::Wfh),
        anomalous_days: days.iter().filter(|d| d.anomaly.is_some()).count() as u32,
    };

    debug!(
        employee_id = %inputs.employee_id,
        net_hours = %aggregate.net_hours,
        warnings = warnings.len(),
        "Net hours calculated"
    );

    NetHoursCalculation {
        employee_id: inputs.employee_id.clone(),
        period: period.clone(),
        net_hours: aggregate.net_hours,
        totals,
        days,
        audit_trace: AuditTrace { steps, warnings },
    }
}

/// Reads one employee's inputs from the source and calculates net hours.
///
/// Fails only when the period is inverted or a source read fails.
pub fn calculate_for_employee<S: EmployeeDataSource + ?Sized>(
    source: &S,
    rules: &RuleSet,
    employee_id: &str,
    period: &PayPeriod,
) -> EngineResult<NetHoursCalculation> {
    let inputs = load_employee_inputs(source, employee_id, period)?;
    Ok(calculate_net_hours(&inputs, rules))
}

fn next_step(steps: &[AuditStep]) -> u32 {
    steps.len() as u32 + 1
}
