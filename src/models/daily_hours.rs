//! Per-day derived records.
//!
//! These are produced during a calculation and returned for auditing; they
//! are never persisted.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a day's hours were determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// A single complete sign-in/sign-out pair.
    Normal,
    /// Covered by approved leave; credited at standard day hours.
    Leave,
    /// Remote-work day scaled by the WFH contribution percentage.
    Wfh,
    /// Punches were present but could not be paired cleanly.
    Anomalous,
    /// No punches at all.
    Absent,
}

/// The reason a day's punches were flagged for review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PunchAnomaly {
    /// Sign-in without a sign-out.
    MissingSignOut,
    /// Sign-out without a sign-in.
    MissingSignIn,
    /// More than one pair; first sign-in and last sign-out were used.
    MultiplePunches,
    /// The last sign-out is not after the first sign-in.
    SignOutBeforeSignIn,
}

impl PunchAnomaly {
    /// Whether the anomaly leaves the day with zero raw hours.
    pub fn zeroes_hours(self) -> bool {
        !matches!(self, PunchAnomaly::MultiplePunches)
    }
}

impl std::fmt::Display for PunchAnomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PunchAnomaly::MissingSignOut => write!(f, "sign-in without matching sign-out"),
            PunchAnomaly::MissingSignIn => write!(f, "sign-out without matching sign-in"),
            PunchAnomaly::MultiplePunches => write!(f, "more than one sign-in/sign-out pair"),
            PunchAnomaly::SignOutBeforeSignIn => write!(f, "sign-out is not after sign-in"),
        }
    }
}

/// The derived record for one calendar date of the period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyHoursRecord {
    /// The calendar date.
    pub date: NaiveDate,
    /// How the day's hours were determined.
    pub status: DayStatus,
    /// First sign-in of the day, if any.
    pub first_sign_in: Option<NaiveDateTime>,
    /// Last sign-out of the day, if any.
    pub last_sign_out: Option<NaiveDateTime>,
    /// Hours derived from punches alone.
    pub raw_hours: Decimal,
    /// Hours credited after the leave/WFH overlay.
    pub day_hours: Decimal,
    /// Punch anomaly, if the day was flagged.
    pub anomaly: Option<PunchAnomaly>,
    /// Minutes late past the flexible window.
    pub lateness_minutes: i64,
    /// Penalty minutes from the tier table, before the permission offset.
    pub penalty_minutes: i64,
    /// Whether the date is a public holiday.
    pub is_public_holiday: bool,
}
