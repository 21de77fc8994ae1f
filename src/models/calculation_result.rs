//! Calculation result models for the net-hours engine.
//!
//! This module contains the [`NetHoursCalculation`] produced by the pure
//! per-employee computation, the [`CalculationResult`] envelope returned over
//! the API, and the audit trace types that explain every decision.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DailyHoursRecord, PayPeriod};

/// Warning code for a day whose punches could not be paired.
pub const WARN_MALFORMED_EVENT_PAIR: &str = "MALFORMED_EVENT_PAIR";
/// Warning code for a day with more than one sign-in/sign-out pair.
pub const WARN_MULTIPLE_PUNCHES: &str = "MULTIPLE_PUNCHES";
/// Warning code for a rule kind with no active configuration.
pub const WARN_MISSING_RULE_CONFIG: &str = "MISSING_RULE_CONFIG";
/// Warning code for lateness past the highest configured tier.
pub const WARN_LATENESS_BEYOND_TIERS: &str = "LATENESS_BEYOND_TIERS";
/// Warning code for WFH days past the monthly allowance.
pub const WARN_WFH_ALLOWANCE_EXCEEDED: &str = "WFH_ALLOWANCE_EXCEEDED";
/// Warning code for WFH records ignored because no WFH policy is active.
pub const WARN_WFH_POLICY_MISSING: &str = "WFH_POLICY_MISSING";
/// Warning code for net hours clamped to the period ceiling.
pub const WARN_NET_HOURS_CAPPED: &str = "NET_HOURS_CAPPED";
/// Warning code for attendance logged on a public holiday.
pub const WARN_PUBLIC_HOLIDAY_ATTENDANCE: &str = "PUBLIC_HOLIDAY_ATTENDANCE";

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate conditions that don't prevent calculation
/// but may require review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level ("low", "medium" or "high").
    pub severity: String,
}

impl AuditWarning {
    /// Creates a warning.
    pub fn new(code: &str, message: impl Into<String>, severity: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            severity: severity.to_string(),
        }
    }
}

/// The complete audit trace for a calculation.
///
/// # Example
///
/// ```
/// use net_hours_engine::models::AuditTrace;
///
/// let trace = AuditTrace::default();
/// assert!(trace.steps.is_empty());
/// assert!(!trace.has_warning("MALFORMED_EVENT_PAIR"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

impl AuditTrace {
    /// Whether any warning carries the given code.
    pub fn has_warning(&self, code: &str) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }
}

/// Aggregated figures behind the net-hours value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetHoursTotals {
    /// Sum of overlaid day hours across the period.
    pub total_raw_hours: Decimal,
    /// Sum of daily tier penalties before the permission offset.
    pub gross_penalty_minutes: i64,
    /// Monthly permission baseline from the active rule.
    pub monthly_allowance_minutes: i64,
    /// Extra minutes granted by overrides for this period.
    pub override_minutes: i64,
    /// Monthly baseline plus overrides.
    pub total_allowance_minutes: i64,
    /// Penalty minutes remaining after the allowance offset.
    pub net_penalty_minutes: i64,
    /// Net penalty minutes expressed in hours.
    pub penalty_hours: Decimal,
    /// Calendar days in period times standard day hours.
    pub ceiling_hours: Decimal,
    /// Whether the ceiling clamped the result.
    pub capped: bool,
    /// Days credited as leave.
    pub leave_days: u32,
    /// Days credited as remote work.
    pub wfh_days: u32,
    /// Days flagged for punch anomalies.
    pub anomalous_days: u32,
}

/// The deterministic outcome of one (employee, period) computation.
///
/// Contains no identifiers or timestamps, so recomputing with the same
/// inputs yields an equal value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetHoursCalculation {
    /// The employee evaluated.
    pub employee_id: String,
    /// The evaluated period.
    pub period: PayPeriod,
    /// Policy-adjusted net hours, rounded to 2 decimal places.
    pub net_hours: Decimal,
    /// Aggregated figures.
    pub totals: NetHoursTotals,
    /// One record per calendar date in the period.
    pub days: Vec<DailyHoursRecord>,
    /// Every decision made along the way.
    pub audit_trace: AuditTrace,
}

/// API envelope around a [`NetHoursCalculation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// Calculation duration in microseconds.
    pub duration_us: u64,
    /// The calculation itself.
    #[serde(flatten)]
    pub calculation: NetHoursCalculation,
}

impl CalculationResult {
    /// Wraps a calculation with a fresh id and the current time.
    pub fn new(calculation: NetHoursCalculation, duration_us: u64) -> Self {
        Self {
            calculation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            duration_us,
            calculation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample_calculation() -> NetHoursCalculation {
        NetHoursCalculation {
            employee_id: "emp_001".to_string(),
            period: PayPeriod::new(
                NaiveDate::from_ymd_opt(2026, 1, 12).unwrap(),
                NaiveDate::from_ymd_opt(2026, 1, 16).unwrap(),
            ),
            net_hours: dec("38.40"),
            totals: NetHoursTotals {
                total_raw_hours: dec("38.4"),
                gross_penalty_minutes: 0,
                monthly_allowance_minutes: 60,
                override_minutes: 0,
                total_allowance_minutes: 60,
                net_penalty_minutes: 0,
                penalty_hours: Decimal::ZERO,
                ceiling_hours: dec("40.0"),
                capped: false,
                leave_days: 0,
                wfh_days: 1,
                anomalous_days: 0,
            },
            days: vec![],
            audit_trace: AuditTrace::default(),
        }
    }

    #[test]
    fn test_audit_step_serialization() {
        let step = AuditStep {
            step_number: 1,
            rule_id: "lateness_evaluation".to_string(),
            rule_name: "Lateness Evaluation".to_string(),
            input: serde_json::json!({"sign_in": "09:45"}),
            output: serde_json::json!({"lateness_minutes": 15}),
            reasoning: "Arrived 15 minutes after the flexible window".to_string(),
        };

        let json = serde_json::to_string(&step).unwrap();
        assert!(json.contains("\"step_number\":1"));
        assert!(json.contains("\"rule_id\":\"lateness_evaluation\""));
    }

    #[test]
    fn test_audit_warning_constructor() {
        let warning = AuditWarning::new(WARN_MALFORMED_EVENT_PAIR, "no sign-out", "medium");
        assert_eq!(warning.code, "MALFORMED_EVENT_PAIR");
        assert_eq!(warning.severity, "medium");
    }

    #[test]
    fn test_has_warning() {
        let trace = AuditTrace {
            steps: vec![],
            warnings: vec![AuditWarning::new(WARN_NET_HOURS_CAPPED, "capped", "low")],
        };
        assert!(trace.has_warning(WARN_NET_HOURS_CAPPED));
        assert!(!trace.has_warning(WARN_MULTIPLE_PUNCHES));
    }

    #[test]
    fn test_totals_serialize_decimals_as_strings() {
        let json = serde_json::to_string(&sample_calculation().totals).unwrap();
        assert!(json.contains("\"total_raw_hours\":\"38.4\""));
        assert!(json.contains("\"ceiling_hours\":\"40.0\""));
        assert!(json.contains("\"capped\":false"));
    }

    #[test]
    fn test_envelope_flattens_calculation() {
        let result = CalculationResult::new(sample_calculation(), 42);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["net_hours"], "38.40");
        assert_eq!(value["employee_id"], "emp_001");
        assert_eq!(value["duration_us"], 42);
        assert!(value.get("calculation").is_none());

        let back: CalculationResult = serde_json::from_value(value).unwrap();
        assert_eq!(back.calculation, result.calculation);
    }
}
