//! Error types for the net-hours engine.
//!
//! Ordinary gaps in the input data (a missing rule, a day with an unpaired
//! punch) are not errors: they degrade to conservative defaults and are
//! reported through the audit trace instead. The variants here cover
//! configuration problems rejected at write/load time and failures of the
//! external readers the engine depends on.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the net-hours engine.
///
/// # Example
///
/// ```
/// use net_hours_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/rules".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration not found: /missing/rules");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration directory or file was not found at the specified path.
    #[error("Configuration not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Late penalty tiers overlap, are unordered, or are otherwise malformed.
    #[error("Invalid late penalty tiers: {message}")]
    InvalidTierConfiguration {
        /// A description of the tier problem.
        message: String,
    },

    /// A rule payload failed validation.
    #[error("Invalid {kind} rule: {message}")]
    InvalidRuleConfig {
        /// The kind of rule that was rejected.
        kind: String,
        /// A description of what made the rule invalid.
        message: String,
    },

    /// A permission override granted a negative number of minutes.
    #[error("Permission override for employee '{employee_id}' is out of range: {minutes} minutes")]
    OutOfRangeOverride {
        /// The employee the override was granted to.
        employee_id: String,
        /// The rejected number of minutes.
        minutes: i64,
    },

    /// The evaluated period ends before it starts.
    #[error("Invalid period: end date {end} is before start date {start}")]
    InvalidPeriod {
        /// The start date of the period.
        start: NaiveDate,
        /// The end date of the period.
        end: NaiveDate,
    },

    /// One of the external readers failed to supply its data.
    #[error("Data source '{source_name}' unavailable: {message}")]
    SourceUnavailable {
        /// The reader that failed (e.g. "attendance").
        source_name: String,
        /// A description of the failure.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
