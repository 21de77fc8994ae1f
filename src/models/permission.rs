//! Ad-hoc permission overrides.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Extra permission minutes granted to one employee for one period.
///
/// The minutes add to the monthly baseline only for the period that starts on
/// `period_start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionOverride {
    /// The employee receiving the extra minutes.
    pub employee_id: String,
    /// Start date of the period the grant applies to.
    pub period_start: NaiveDate,
    /// Minutes granted on top of the monthly allowance.
    pub extra_minutes: i64,
    /// Who granted the override.
    pub granted_by: String,
    /// Why it was granted.
    #[serde(default)]
    pub reason: String,
}

impl PermissionOverride {
    /// Rejects negative grants.
    ///
    /// # Example
    ///
    /// ```
    /// use net_hours_engine::models::PermissionOverride;
    /// use chrono::NaiveDate;
    ///
    /// let grant = PermissionOverride {
    ///     employee_id: "emp_001".to_string(),
    ///     period_start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
    ///     extra_minutes: -10,
    ///     granted_by: "hr_admin".to_string(),
    ///     reason: "typo".to_string(),
    /// };
    /// assert!(grant.validate().is_err());
    /// ```
    pub fn validate(&self) -> EngineResult<()> {
        if self.extra_minutes < 0 {
            return Err(EngineError::OutOfRangeOverride {
                employee_id: self.employee_id.clone(),
                minutes: self.extra_minutes,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant(minutes: i64) -> PermissionOverride {
        PermissionOverride {
            employee_id: "emp_001".to_string(),
            period_start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            extra_minutes: minutes,
            granted_by: "hr_admin".to_string(),
            reason: "medical appointment".to_string(),
        }
    }

    #[test]
    fn test_zero_and_positive_grants_are_valid() {
        assert!(grant(0).validate().is_ok());
        assert!(grant(45).validate().is_ok());
    }

    #[test]
    fn test_negative_grant_is_rejected() {
        match grant(-1).validate() {
            Err(EngineError::OutOfRangeOverride {
                employee_id,
                minutes,
            }) => {
                assert_eq!(employee_id, "emp_001");
                assert_eq!(minutes, -1);
            }
            other => panic!("Expected OutOfRangeOverride, got {:?}", other),
        }
    }
}
