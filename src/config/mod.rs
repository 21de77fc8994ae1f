//! Rule configuration for the net-hours engine.
//!
//! This module provides the typed payload of each rule kind, the [`RuleSet`]
//! passed explicitly into every calculation, and a loader that reads the
//! active rules from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use net_hours_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Inactive rule kinds: {:?}", config.rules().missing_kinds());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    FlexibleHoursRule, LatePenaltyRule, PenaltyTier, PermissionRule, RuleDefinition, RuleKind,
    RuleSet, WfhPolicyRule,
};
