//! Application state for the net-hours API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::calculation::BatchOptions;
use crate::config::RuleSet;

/// Shared application state.
///
/// Holds the rule set loaded at startup and the batch tuning. Every request
/// calculates against the same rules.
#[derive(Clone)]
pub struct AppState {
    rules: Arc<RuleSet>,
    batch_options: BatchOptions,
}

impl AppState {
    /// Creates a new application state with default batch tuning.
    pub fn new(rules: RuleSet) -> Self {
        Self::with_batch_options(rules, BatchOptions::default())
    }

    /// Creates a new application state with the given batch tuning.
    pub fn with_batch_options(rules: RuleSet, batch_options: BatchOptions) -> Self {
        Self {
            rules: Arc::new(rules),
            batch_options,
        }
    }

    /// Returns a shared handle to the active rules.
    pub fn shared_rules(&self) -> Arc<RuleSet> {
        Arc::clone(&self.rules)
    }

    /// Returns the batch tuning.
    pub fn batch_options(&self) -> BatchOptions {
        self.batch_options
    }
}
