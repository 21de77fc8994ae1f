//! Core data models for the net-hours engine.
//!
//! Source records (attendance, leave, WFH, permission overrides) are owned by
//! external subsystems and only read here; daily records and results are
//! derived per calculation.

mod attendance;
mod calculation_result;
mod daily_hours;
mod inputs;
mod leave;
mod pay_period;
mod permission;

pub use attendance::{AttendanceEvent, EventKind};
pub use calculation_result::{
    AuditStep, AuditTrace, AuditWarning, CalculationResult, NetHoursCalculation, NetHoursTotals,
    WARN_LATENESS_BEYOND_TIERS, WARN_MALFORMED_EVENT_PAIR, WARN_MISSING_RULE_CONFIG,
    WARN_MULTIPLE_PUNCHES, WARN_NET_HOURS_CAPPED, WARN_PUBLIC_HOLIDAY_ATTENDANCE,
    WARN_WFH_ALLOWANCE_EXCEEDED, WARN_WFH_POLICY_MISSING,
};
pub use daily_hours::{DailyHoursRecord, DayStatus, PunchAnomaly};
pub use inputs::EmployeeInputs;
pub use leave::{LeaveRecord, LeaveStatus, WfhRecord};
pub use pay_period::{PayPeriod, PublicHoliday};
pub use permission::PermissionOverride;
