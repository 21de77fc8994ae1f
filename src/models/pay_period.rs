//! Pay period and public holiday models.
//!
//! This module contains the [`PayPeriod`] and [`PublicHoliday`] types that define
//! the inclusive date range a net-hours calculation covers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A public holiday within a pay period.
///
/// Holidays are informational: they are flagged on the daily records but do
/// not change how hours are credited.
///
/// # Example
///
/// ```
/// use net_hours_engine::models::PublicHoliday;
/// use chrono::NaiveDate;
///
/// let holiday = PublicHoliday {
///     date: NaiveDate::from_ymd_opt(2026, 1, 26).unwrap(),
///     name: "Australia Day".to_string(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicHoliday {
    /// The date of the public holiday.
    pub date: NaiveDate,
    /// The name of the public holiday.
    pub name: String,
}

/// An inclusive date range evaluated for one employee.
///
/// # Example
///
/// ```
/// use net_hours_engine::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2026, 1, 12).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 1, 16).unwrap(),
/// );
///
/// assert_eq!(period.day_count(), 5);
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 1, 14).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The start date of the period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the period (inclusive).
    pub end_date: NaiveDate,
    /// Public holidays that fall within this period.
    #[serde(default)]
    pub public_holidays: Vec<PublicHoliday>,
}

impl PayPeriod {
    /// Creates a period with no public holidays.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            public_holidays: Vec::new(),
        }
    }

    /// Rejects periods whose end date precedes the start date.
    pub fn validate(&self) -> EngineResult<()> {
        if self.end_date < self.start_date {
            return Err(EngineError::InvalidPeriod {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }

    /// Checks if a given date falls within this period (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Checks if a given date is a public holiday within this period.
    pub fn is_public_holiday(&self, date: NaiveDate) -> bool {
        self.public_holidays.iter().any(|h| h.date == date)
    }

    /// Returns every calendar date in the period in ascending order.
    ///
    /// An inverted period yields no dates.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start_date
            .iter_days()
            .take_while(move |d| *d <= self.end_date)
    }

    /// Number of calendar days in the period, 0 for an inverted period.
    pub fn day_count(&self) -> i64 {
        if self.end_date < self.start_date {
            0
        } else {
            (self.end_date - self.start_date).num_days() + 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_period_with_holiday() -> PayPeriod {
        PayPeriod {
            start_date: date(2026, 1, 19),
            end_date: date(2026, 1, 30),
            public_holidays: vec![PublicHoliday {
                date: date(2026, 1, 26),
                name: "Australia Day".to_string(),
            }],
        }
    }

    #[test]
    fn test_contains_date_bounds_are_inclusive() {
        let period = create_period_with_holiday();
        assert!(period.contains_date(period.start_date));
        assert!(period.contains_date(period.end_date));
        assert!(!period.contains_date(date(2026, 1, 18)));
        assert!(!period.contains_date(date(2026, 1, 31)));
    }

    #[test]
    fn test_is_public_holiday() {
        let period = create_period_with_holiday();
        assert!(period.is_public_holiday(date(2026, 1, 26)));
        assert!(!period.is_public_holiday(date(2026, 1, 27)));
    }

    #[test]
    fn test_dates_cover_whole_range() {
        let period = PayPeriod::new(date(2026, 1, 30), date(2026, 2, 2));
        let dates: Vec<NaiveDate> = period.dates().collect();
        assert_eq!(
            dates,
            vec![
                date(2026, 1, 30),
                date(2026, 1, 31),
                date(2026, 2, 1),
                date(2026, 2, 2)
            ]
        );
        assert_eq!(period.day_count(), 4);
    }

    #[test]
    fn test_single_day_period() {
        let period = PayPeriod::new(date(2026, 1, 15), date(2026, 1, 15));
        assert_eq!(period.dates().count(), 1);
        assert_eq!(period.day_count(), 1);
        assert!(period.validate().is_ok());
    }

    #[test]
    fn test_inverted_period_is_rejected() {
        let period = PayPeriod::new(date(2026, 2, 1), date(2026, 1, 31));
        assert_eq!(period.day_count(), 0);
        assert_eq!(period.dates().count(), 0);
        match period.validate() {
            Err(EngineError::InvalidPeriod { start, end }) => {
                assert_eq!(start, date(2026, 2, 1));
                assert_eq!(end, date(2026, 1, 31));
            }
            other => panic!("Expected InvalidPeriod error, got {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_period_without_holidays() {
        let json = r#"{
            "start_date": "2026-01-12",
            "end_date": "2026-01-16"
        }"#;
        let period: PayPeriod = serde_json::from_str(json).unwrap();
        assert_eq!(period.start_date, date(2026, 1, 12));
        assert!(period.public_holidays.is_empty());
    }
}
