//! Rule configuration types.
//!
//! This module contains the strongly-typed rule payloads deserialized from
//! YAML, their write-time validation, and the [`RuleSet`] that carries the
//! active rule of each kind into a calculation.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::store::RuleReader;

/// The kinds of workplace rule the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Official start time plus grace window.
    FlexibleHours,
    /// Tiered lateness penalties.
    LatePenalty,
    /// Monthly permission allowance.
    Permission,
    /// Work-from-home contribution policy.
    WfhPolicy,
}

impl RuleKind {
    /// All rule kinds, in evaluation order.
    pub const ALL: [RuleKind; 4] = [
        RuleKind::FlexibleHours,
        RuleKind::LatePenalty,
        RuleKind::Permission,
        RuleKind::WfhPolicy,
    ];

    /// The snake_case name used in config files and audit output.
    pub fn as_str(self) -> &'static str {
        match self {
            RuleKind::FlexibleHours => "flexible_hours",
            RuleKind::LatePenalty => "late_penalty",
            RuleKind::Permission => "permission",
            RuleKind::WfhPolicy => "wfh_policy",
        }
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `HH:MM` (or `HH:MM:SS`) time-of-day encoding.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M:%S"))
            .map_err(|e| serde::de::Error::custom(format!("invalid time '{}': {}", s, e)))
    }
}

/// Official start time and the grace window after it.
///
/// # Example
///
/// ```
/// use net_hours_engine::config::FlexibleHoursRule;
/// use chrono::{NaiveDate, NaiveTime};
///
/// let rule = FlexibleHoursRule {
///     official_start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
///     flexible_window_minutes: 30,
/// };
/// let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
/// assert_eq!(rule.window_end(date).time(), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlexibleHoursRule {
    /// Official start of the working day.
    #[serde(with = "hhmm")]
    pub official_start_time: NaiveTime,
    /// Minutes after the official start during which arrival is not late.
    pub flexible_window_minutes: u32,
}

impl FlexibleHoursRule {
    /// The last on-time arrival instant for the given date.
    pub fn window_end(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.official_start_time)
            + chrono::Duration::minutes(i64::from(self.flexible_window_minutes))
    }
}

/// One row of the lateness-to-penalty step function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyTier {
    /// Lower bound of lateness, inclusive.
    pub min_minutes_late: i64,
    /// Upper bound of lateness, inclusive.
    pub max_minutes_late: i64,
    /// Minutes deducted when lateness falls in this tier.
    pub penalty_minutes: i64,
}

impl PenaltyTier {
    /// Whether the lateness falls inside the tier's inclusive bounds.
    pub fn contains(&self, lateness_minutes: i64) -> bool {
        lateness_minutes >= self.min_minutes_late && lateness_minutes <= self.max_minutes_late
    }
}

/// Tiered lateness penalties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatePenaltyRule {
    /// Tiers ascending by `min_minutes_late`, non-overlapping.
    pub tiers: Vec<PenaltyTier>,
}

impl LatePenaltyRule {
    /// Checks the tier table is well formed.
    ///
    /// Bounds must be non-negative with `min <= max`, tiers must ascend without
    /// overlapping, and penalties must never decrease from one tier to the
    /// next so that a later arrival is never penalised less. Gaps between
    /// tiers are allowed.
    pub fn validate(&self) -> EngineResult<()> {
        for (index, tier) in self.tiers.iter().enumerate() {
            let position = index + 1;
            if tier.min_minutes_late < 0 || tier.penalty_minutes < 0 {
                return Err(EngineError::InvalidTierConfiguration {
                    message: format!("tier {} has negative minutes", position),
                });
            }
            if tier.max_minutes_late < tier.min_minutes_late {
                return Err(EngineError::InvalidTierConfiguration {
                    message: format!(
                        "tier {} max_minutes_late {} is below min_minutes_late {}",
                        position, tier.max_minutes_late, tier.min_minutes_late
                    ),
                });
            }
        }

        for (index, pair) in self.tiers.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.min_minutes_late <= prev.max_minutes_late {
                return Err(EngineError::InvalidTierConfiguration {
                    message: format!(
                        "tier {} (starting at {} minutes) overlaps or precedes tier {} (ending at {} minutes)",
                        index + 2,
                        next.min_minutes_late,
                        index + 1,
                        prev.max_minutes_late
                    ),
                });
            }
            if next.penalty_minutes < prev.penalty_minutes {
                return Err(EngineError::InvalidTierConfiguration {
                    message: format!(
                        "tier {} penalty {} is smaller than tier {} penalty {}",
                        index + 2,
                        next.penalty_minutes,
                        index + 1,
                        prev.penalty_minutes
                    ),
                });
            }
        }

        Ok(())
    }
}

/// Monthly permission allowance that offsets lateness penalties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRule {
    /// Minutes of penalty forgiven per period.
    pub monthly_allowance_minutes: u32,
}

/// Work-from-home contribution policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WfhPolicyRule {
    /// WFH days per calendar month before each further day is flagged for review.
    pub monthly_allowance_days: u32,
    /// Share of a day's hours credited for a WFH day (0-100).
    pub attendance_contribution_percentage: Decimal,
}

impl WfhPolicyRule {
    /// Checks the percentage is within 0-100.
    pub fn validate(&self) -> EngineResult<()> {
        let pct = self.attendance_contribution_percentage;
        if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
            return Err(EngineError::InvalidRuleConfig {
                kind: RuleKind::WfhPolicy.to_string(),
                message: format!(
                    "attendance_contribution_percentage must be between 0 and 100, got {}",
                    pct
                ),
            });
        }
        Ok(())
    }
}

/// A rule of any kind, as stored by the rule administration subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleDefinition {
    /// A flexible hours rule.
    FlexibleHours(FlexibleHoursRule),
    /// A late penalty rule.
    LatePenalty(LatePenaltyRule),
    /// A permission rule.
    Permission(PermissionRule),
    /// A WFH policy rule.
    WfhPolicy(WfhPolicyRule),
}

impl RuleDefinition {
    /// The kind of this rule.
    pub fn kind(&self) -> RuleKind {
        match self {
            RuleDefinition::FlexibleHours(_) => RuleKind::FlexibleHours,
            RuleDefinition::LatePenalty(_) => RuleKind::LatePenalty,
            RuleDefinition::Permission(_) => RuleKind::Permission,
            RuleDefinition::WfhPolicy(_) => RuleKind::WfhPolicy,
        }
    }

    /// Validates the payload. Called when a rule is written or loaded.
    pub fn validate(&self) -> EngineResult<()> {
        match self {
            RuleDefinition::LatePenalty(rule) => rule.validate(),
            RuleDefinition::WfhPolicy(rule) => rule.validate(),
            RuleDefinition::FlexibleHours(_) | RuleDefinition::Permission(_) => Ok(()),
        }
    }
}

/// The active rule of each kind, assembled once per invocation.
///
/// An absent rule means the conservative default applies: no lateness, no
/// penalty, no allowance, WFH records pass through.
///
/// # Example
///
/// ```
/// use net_hours_engine::config::{PermissionRule, RuleDefinition, RuleSet};
///
/// let rules = RuleSet::from_definitions(vec![RuleDefinition::Permission(PermissionRule {
///     monthly_allowance_minutes: 60,
/// })])
/// .unwrap();
/// assert!(rules.flexible_hours.is_none());
/// assert_eq!(rules.permission.unwrap().monthly_allowance_minutes, 60);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Active flexible hours rule.
    #[serde(default)]
    pub flexible_hours: Option<FlexibleHoursRule>,
    /// Active late penalty rule.
    #[serde(default)]
    pub late_penalty: Option<LatePenaltyRule>,
    /// Active permission rule.
    #[serde(default)]
    pub permission: Option<PermissionRule>,
    /// Active WFH policy rule.
    #[serde(default)]
    pub wfh_policy: Option<WfhPolicyRule>,
}

impl RuleSet {
    /// Builds a rule set from definitions, validating each one.
    ///
    /// Two definitions of the same kind are rejected since only one rule per
    /// kind may be active.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = RuleDefinition>,
    ) -> EngineResult<Self> {
        let mut rules = RuleSet::default();
        for definition in definitions {
            let kind = definition.kind();
            if rules.is_active(kind) {
                return Err(EngineError::InvalidRuleConfig {
                    kind: kind.to_string(),
                    message: "more than one active rule of this kind".to_string(),
                });
            }
            rules.activate(definition)?;
        }
        Ok(rules)
    }

    /// Assembles the active rules by asking the reader for each kind once.
    pub fn from_reader<R: RuleReader + ?Sized>(reader: &R) -> EngineResult<Self> {
        let mut definitions = Vec::new();
        for kind in RuleKind::ALL {
            if let Some(definition) = reader.active_rule(kind)? {
                if definition.kind() != kind {
                    return Err(EngineError::InvalidRuleConfig {
                        kind: kind.to_string(),
                        message: format!("reader returned a {} rule", definition.kind()),
                    });
                }
                definitions.push(definition);
            }
        }
        Self::from_definitions(definitions)
    }

    /// Validates and installs a rule, replacing any active rule of its kind.
    pub fn activate(&mut self, definition: RuleDefinition) -> EngineResult<()> {
        definition.validate()?;
        match definition {
            RuleDefinition::FlexibleHours(rule) => self.flexible_hours = Some(rule),
            RuleDefinition::LatePenalty(rule) => self.late_penalty = Some(rule),
            RuleDefinition::Permission(rule) => self.permission = Some(rule),
            RuleDefinition::WfhPolicy(rule) => self.wfh_policy = Some(rule),
        }
        Ok(())
    }

    /// The active rule of `kind` as a definition, if any.
    pub fn definition(&self, kind: RuleKind) -> Option<RuleDefinition> {
        match kind {
            RuleKind::FlexibleHours => self.flexible_hours.clone().map(RuleDefinition::FlexibleHours),
            RuleKind::LatePenalty => self.late_penalty.clone().map(RuleDefinition::LatePenalty),
            RuleKind::Permission => self.permission.clone().map(RuleDefinition::Permission),
            RuleKind::WfhPolicy => self.wfh_policy.clone().map(RuleDefinition::WfhPolicy),
        }
    }

    /// Whether a rule of the given kind is active.
    pub fn is_active(&self, kind: RuleKind) -> bool {
        match kind {
            RuleKind::FlexibleHours => self.flexible_hours.is_some(),
            RuleKind::LatePenalty => self.late_penalty.is_some(),
            RuleKind::Permission => self.permission.is_some(),
            RuleKind::WfhPolicy => self.wfh_policy.is_some(),
        }
    }

    /// Rule kinds with no active configuration.
    pub fn missing_kinds(&self) -> Vec<RuleKind> {
        RuleKind::ALL
            .into_iter()
            .filter(|kind| !self.is_active(*kind))
            .collect()
    }
}
