//! Permission allowance offsetting.
//!
//! The monthly permission allowance plus any HR-granted override minutes
//! absorb lateness penalties before they reach the net-hours total.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::PermissionRule;
use crate::models::AuditStep;

/// The permission minutes available to an employee for one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PermissionLedger {
    /// Minutes granted by the active permission rule.
    pub monthly_allowance_minutes: i64,
    /// Extra minutes granted by HR for the period.
    pub override_minutes: i64,
}

impl PermissionLedger {
    /// Builds the ledger from the active rule and the period's override total.
    ///
    /// A missing rule contributes no allowance. Negative override totals are
    /// treated as 0.
    pub fn new(rule: Option<&PermissionRule>, override_minutes: i64) -> Self {
        if override_minutes < 0 {
            warn!(override_minutes, "Negative permission override ignored");
        }
        Self {
            monthly_allowance_minutes: rule
                .map(|r| i64::from(r.monthly_allowance_minutes))
                .unwrap_or(0),
            override_minutes: override_minutes.max(0),
        }
    }

    /// Allowance plus override.
    pub fn total_allowance_minutes(&self) -> i64 {
        self.monthly_allowance_minutes + self.override_minutes
    }
}

/// The result of offsetting the gross penalty against the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionOffsetResult {
    /// Sum of the period's per-day penalties.
    pub gross_penalty_minutes: i64,
    /// The ledger used.
    pub ledger: PermissionLedger,
    /// Minutes of allowance consumed.
    pub offset_applied_minutes: i64,
    /// Penalty remaining after the offset, never negative.
    pub net_penalty_minutes: i64,
    /// The audit step recording the offset.
    pub audit_step: AuditStep,
}

/// Offsets the gross penalty by the ledger's total allowance.
///
/// Unused allowance is discarded; it never increases net hours.
///
/// # Example
///
/// ```
/// use net_hours_engine::calculation::{PermissionLedger, apply_permission_offset};
/// use net_hours_engine::config::PermissionRule;
///
/// let ledger = PermissionLedger::new(Some(&PermissionRule { monthly_allowance_minutes: 60 }), 0);
/// let result = apply_permission_offset(120, ledger, 1);
/// assert_eq!(result.net_penalty_minutes, 60);
///
/// let result = apply_permission_offset(30, ledger, 1);
/// assert_eq!(result.net_penalty_minutes, 0);
/// ```
pub fn apply_permission_offset(
    gross_penalty_minutes: i64,
    ledger: PermissionLedger,
    step_number: u32,
) -> PermissionOffsetResult {
    let gross = gross_penalty_minutes.max(0);
    let total_allowance = ledger.total_allowance_minutes();
    let net_penalty_minutes = (gross - total_allowance).max(0);
    let offset_applied_minutes = gross - net_penalty_minutes;

    let reasoning = if gross == 0 {
        format!(
            "No lateness penalty; {} allowance minute(s) unused",
            total_allowance
        )
    } else {
        format!(
            "Gross penalty {} minute(s) offset by {} of {} allowance minute(s) ({} monthly + {} override); net penalty {} minute(s)",
            gross,
            offset_applied_minutes,
            total_allowance,
            ledger.monthly_allowance_minutes,
            ledger.override_minutes,
            net_penalty_minutes
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "permission_offset".to_string(),
        rule_name: "Permission Allowance Offset".to_string(),
        input: serde_json::json!({
            "gross_penalty_minutes": gross,
            "monthly_allowance_minutes": ledger.monthly_allowance_minutes,
            "override_minutes": ledger.override_minutes
        }),
        output: serde_json::json!({
            "offset_applied_minutes": offset_applied_minutes,
            "net_penalty_minutes": net_penalty_minutes
        }),
        reasoning,
    };

    PermissionOffsetResult {
        gross_penalty_minutes: gross,
        ledger,
        offset_applied_minutes,
        net_penalty_minutes,
        audit_step,
    }
}
