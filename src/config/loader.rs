//! Rule configuration loading.
//!
//! This module provides the [`ConfigLoader`] type for loading the active
//! workplace rules from a directory of YAML files.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::store::RuleReader;

use super::types::{
    FlexibleHoursRule, LatePenaltyRule, PermissionRule, RuleDefinition, RuleKind, RuleSet,
    WfhPolicyRule,
};

/// Loads and provides access to the active rule configuration.
///
/// # Directory Structure
///
/// Every file is optional; a missing file leaves that rule kind inactive.
/// ```text
/// config/default/
/// ├── flexible_hours.yaml  # official_start_time, flexible_window_minutes
/// ├── late_penalty.yaml    # tiers
/// ├── permission.yaml      # monthly_allowance_minutes
/// └── wfh_policy.yaml      # monthly_allowance_days, attendance_contribution_percentage
/// ```
///
/// # Example
///
/// ```no_run
/// use net_hours_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default")?;
/// println!("Flexible hours active: {}", loader.rules().flexible_hours.is_some());
/// # Ok::<(), net_hours_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    source_dir: PathBuf,
    rules: RuleSet,
}

impl ConfigLoader {
    /// Loads and validates the rules in the specified directory.
    ///
    /// Returns an error if the directory does not exist, a present file
    /// contains invalid YAML, or a rule fails validation.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(EngineError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let mut definitions = Vec::new();
        for kind in RuleKind::ALL {
            if let Some(definition) = Self::load_rule(path, kind)? {
                definitions.push(definition);
            }
        }

        let rules = RuleSet::from_definitions(definitions)?;
        info!(
            path = %path.display(),
            missing = ?rules.missing_kinds(),
            "Loaded rule configuration"
        );

        Ok(Self {
            source_dir: path.to_path_buf(),
            rules,
        })
    }

    /// Loads the file for one rule kind, if present.
    fn load_rule(dir: &Path, kind: RuleKind) -> EngineResult<Option<RuleDefinition>> {
        let file = dir.join(format!("{}.yaml", kind.as_str()));
        if !file.exists() {
            debug!(file = %file.display(), rule = %kind, "Rule file absent, rule inactive");
            return Ok(None);
        }

        let definition = match kind {
            RuleKind::FlexibleHours => {
                RuleDefinition::FlexibleHours(Self::load_yaml::<FlexibleHoursRule>(&file)?)
            }
            RuleKind::LatePenalty => {
                RuleDefinition::LatePenalty(Self::load_yaml::<LatePenaltyRule>(&file)?)
            }
            RuleKind::Permission => {
                RuleDefinition::Permission(Self::load_yaml::<PermissionRule>(&file)?)
            }
            RuleKind::WfhPolicy => {
                RuleDefinition::WfhPolicy(Self::load_yaml::<WfhPolicyRule>(&file)?)
            }
        };
        Ok(Some(definition))
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// The directory the rules were loaded from.
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// The loaded rule set.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Consumes the loader, returning the rule set.
    pub fn into_rules(self) -> RuleSet {
        self.rules
    }
}

impl RuleReader for ConfigLoader {
    fn active_rule(&self, kind: RuleKind) -> EngineResult<Option<RuleDefinition>> {
        Ok(self.rules.definition(kind))
    }
}
