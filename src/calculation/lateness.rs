//! Lateness evaluation and tier lookup.
//!
//! This module measures how late a first sign-in is relative to the end of
//! the flexible window and maps the lateness onto the configured penalty tier
//! table.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::config::{FlexibleHoursRule, LatePenaltyRule};
use crate::models::AuditStep;

/// The outcome of looking up a lateness value in a tier table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierLookup {
    /// Penalty minutes assigned.
    pub penalty_minutes: i64,
    /// Zero-based index of the tier that supplied the penalty.
    pub tier_index: Option<usize>,
    /// Lateness exceeded the upper bound of the highest tier.
    pub beyond_highest_tier: bool,
    /// Lateness fell between two tiers and took the lower tier's penalty.
    pub in_gap: bool,
}

impl TierLookup {
    const NONE: TierLookup = TierLookup {
        penalty_minutes: 0,
        tier_index: None,
        beyond_highest_tier: false,
        in_gap: false,
    };
}

/// The lateness evaluation of one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatenessResult {
    /// The evaluated date.
    pub date: NaiveDate,
    /// Whole minutes past the flexible window.
    pub lateness_minutes: i64,
    /// The tier lookup for those minutes.
    pub lookup: TierLookup,
    /// The audit step recording the evaluation.
    pub audit_step: AuditStep,
}

/// Minutes between the end of the flexible window and the sign-in.
///
/// Returns 0 when the sign-in is within the window or when no flexible-hours
/// rule is active. Seconds are truncated.
///
/// # Example
///
/// ```
/// use net_hours_engine::calculation::calculate_lateness_minutes;
/// use net_hours_engine::config::FlexibleHoursRule;
/// use chrono::{NaiveDateTime, NaiveTime};
///
/// let rule = FlexibleHoursRule {
///     official_start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
///     flexible_window_minutes: 30,
/// };
/// let sign_in = NaiveDateTime::parse_from_str("2026-01-15 09:45", "%Y-%m-%d %H:%M").unwrap();
/// assert_eq!(calculate_lateness_minutes(sign_in, Some(&rule)), 15);
/// ```
pub fn calculate_lateness_minutes(
    first_sign_in: NaiveDateTime,
    rule: Option<&FlexibleHoursRule>,
) -> i64 {
    let Some(rule) = rule else {
        return 0;
    };
    let window_end = rule.window_end(first_sign_in.date());
    (first_sign_in - window_end).num_minutes().max(0)
}

/// Maps lateness onto the tier table.
///
/// The last tier whose lower bound does not exceed the lateness supplies the
/// penalty. Lateness of 0, lateness below the first tier, an empty table or a
/// missing rule all give 0. Lateness past the highest tier's upper bound is
/// charged that tier's penalty and flagged.
///
/// # Example
///
/// ```
/// use net_hours_engine::calculation::lookup_tier_penalty;
/// use net_hours_engine::config::{LatePenaltyRule, PenaltyTier};
///
/// let rule = LatePenaltyRule {
///     tiers: vec![
///         PenaltyTier { min_minutes_late: 1, max_minutes_late: 30, penalty_minutes: 30 },
///         PenaltyTier { min_minutes_late: 31, max_minutes_late: 60, penalty_minutes: 60 },
///     ],
/// };
/// assert_eq!(lookup_tier_penalty(45, Some(&rule)).penalty_minutes, 60);
/// assert!(lookup_tier_penalty(90, Some(&rule)).beyond_highest_tier);
/// ```
pub fn lookup_tier_penalty(lateness_minutes: i64, rule: Option<&LatePenaltyRule>) -> TierLookup {
    let Some(rule) = rule else {
        return TierLookup::NONE;
    };
    if lateness_minutes <= 0 {
        return TierLookup::NONE;
    }

    let tiers = &rule.tiers;
    let index = tiers.partition_point(|t| t.min_minutes_late <= lateness_minutes);
    if index == 0 {
        return TierLookup::NONE;
    }

    let tier = &tiers[index - 1];
    let beyond_highest_tier = index == tiers.len() && lateness_minutes > tier.max_minutes_late;
    TierLookup {
        penalty_minutes: tier.penalty_minutes,
        tier_index: Some(index - 1),
        beyond_highest_tier,
        in_gap: !beyond_highest_tier && !tier.contains(lateness_minutes),
    }
}

/// Evaluates one day's lateness and penalty and records an audit step.
///
/// # Arguments
///
/// * `first_sign_in` - The earliest sign-in of the day
/// * `flexible_hours` - The active flexible-hours rule, if any
/// * `late_penalty` - The active tier table, if any
/// * `step_number` - The step number for audit trail sequencing
pub fn evaluate_lateness(
    first_sign_in: NaiveDateTime,
    flexible_hours: Option<&FlexibleHoursRule>,
    late_penalty: Option<&LatePenaltyRule>,
    step_number: u32,
) -> LatenessResult {
    let date = first_sign_in.date();
    let lateness_minutes = calculate_lateness_minutes(first_sign_in, flexible_hours);
    let lookup = lookup_tier_penalty(lateness_minutes, late_penalty);

    let window_end = flexible_hours.map(|r| r.window_end(date).time().format("%H:%M").to_string());

    let reasoning = match (lookup.tier_index, lateness_minutes) {
        (_, 0) => format!(
            "Signed in at {} within the flexible window; no penalty",
            first_sign_in.time().format("%H:%M")
        ),
        (None, minutes) => format!("{} minute(s) late; no tier applies, no penalty", minutes),
        (Some(index), minutes) if lookup.beyond_highest_tier => format!(
            "{} minute(s) late exceeds the highest tier; tier {} penalty of {} minute(s) applied",
            minutes,
            index + 1,
            lookup.penalty_minutes
        ),
        (Some(index), minutes) => format!(
            "{} minute(s) late falls in tier {}; penalty of {} minute(s)",
            minutes,
            index + 1,
            lookup.penalty_minutes
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "lateness_evaluation".to_string(),
        rule_name: "Lateness Evaluation".to_string(),
        input: serde_json::json!({
            "date": date.to_string(),
            "first_sign_in": first_sign_in.time().format("%H:%M:%S").to_string(),
            "window_end": window_end
        }),
        output: serde_json::json!({
            "lateness_minutes": lateness_minutes,
            "tier": lookup.tier_index.map(|i| i + 1),
            "penalty_minutes": lookup.penalty_minutes,
            "beyond_highest_tier": lookup.beyond_highest_tier
        }),
        reasoning,
    };

    LatenessResult {
        date,
        lateness_minutes,
        lookup,
        audit_step,
    }
}
