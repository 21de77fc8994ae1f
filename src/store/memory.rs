//! In-memory data source.
//!
//! Holds source records keyed by employee and validates writes the same way
//! the owning subsystems do: bad tier tables and negative permission grants
//! are rejected here, so the calculation never has to re-check them.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::config::{RuleDefinition, RuleKind, RuleSet};
use crate::error::EngineResult;
use crate::models::{AttendanceEvent, LeaveRecord, LeaveStatus, PermissionOverride, WfhRecord};

use super::{AttendanceReader, LeaveReader, PermissionOverrideReader, RuleReader, WfhReader};

/// A data source backed by in-process collections.
///
/// # Example
///
/// ```
/// use net_hours_engine::config::{PermissionRule, RuleDefinition, RuleSet};
/// use net_hours_engine::store::InMemoryStore;
///
/// let mut store = InMemoryStore::new();
/// store
///     .activate_rule(RuleDefinition::Permission(PermissionRule {
///         monthly_allowance_minutes: 60,
///     }))
///     .unwrap();
///
/// let rules = RuleSet::from_reader(&store).unwrap();
/// assert!(rules.permission.is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    events: HashMap<String, Vec<AttendanceEvent>>,
    leaves: HashMap<String, Vec<LeaveRecord>>,
    wfh: HashMap<String, BTreeSet<NaiveDate>>,
    overrides: Vec<PermissionOverride>,
    rules: RuleSet,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a punch, keeping each employee's events in timestamp order.
    pub fn record_event(&mut self, event: AttendanceEvent) {
        let events = self.events.entry(event.employee_id.clone()).or_default();
        let position = events.partition_point(|e| e.timestamp <= event.timestamp);
        events.insert(position, event);
    }

    /// Records a leave request in any status.
    pub fn add_leave(&mut self, leave: LeaveRecord) {
        self.leaves
            .entry(leave.employee_id.clone())
            .or_default()
            .push(leave);
    }

    /// Records a remote-work day.
    pub fn add_wfh(&mut self, record: WfhRecord) {
        self.wfh
            .entry(record.employee_id)
            .or_default()
            .insert(record.date);
    }

    /// Records a permission override, rejecting negative grants.
    pub fn grant_override(&mut self, grant: PermissionOverride) -> EngineResult<()> {
        grant.validate()?;
        self.overrides.push(grant);
        Ok(())
    }

    /// Validates and activates a rule, replacing the active rule of its kind.
    pub fn activate_rule(&mut self, definition: RuleDefinition) -> EngineResult<()> {
        self.rules.activate(definition)
    }
}

impl AttendanceReader for InMemoryStore {
    fn attendance_events(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<AttendanceEvent>> {
        Ok(self
            .events
            .get(employee_id)
            .map(|events| {
                events
                    .iter()
                    .filter(|e| e.date() >= start && e.date() <= end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

impl RuleReader for InMemoryStore {
    fn active_rule(&self, kind: RuleKind) -> EngineResult<Option<RuleDefinition>> {
        Ok(self.rules.definition(kind))
    }
}

impl PermissionOverrideReader for InMemoryStore {
    fn override_minutes(&self, employee_id: &str, period_start: NaiveDate) -> EngineResult<i64> {
        Ok(self
            .overrides
            .iter()
            .filter(|o| o.employee_id == employee_id && o.period_start == period_start)
            .map(|o| o.extra_minutes)
            .sum())
    }
}

impl LeaveReader for InMemoryStore {
    fn approved_leaves(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<LeaveRecord>> {
        Ok(self
            .leaves
            .get(employee_id)
            .map(|leaves| {
                leaves
                    .iter()
                    .filter(|l| l.status == LeaveStatus::Approved && l.overlaps(start, end))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

impl WfhReader for InMemoryStore {
    fn wfh_dates(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<BTreeSet<NaiveDate>> {
        if end < start {
            return Ok(BTreeSet::new());
        }
        Ok(self
            .wfh
            .get(employee_id)
            .map(|dates| dates.range(start..=end).copied().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LatePenaltyRule, PenaltyTier};
    use crate::error::EngineError;
    use crate::models::{EventKind, PayPeriod};
    use crate::store::load_employee_inputs;
    use chrono::NaiveDateTime;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    fn at(d: u32, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("2026-01-{:02} {}", d, time), "%Y-%m-%d %H:%M")
            .unwrap()
    }

    fn event(employee_id: &str, d: u32, time: &str, kind: EventKind) -> AttendanceEvent {
        AttendanceEvent {
            employee_id: employee_id.to_string(),
            timestamp: at(d, time),
            kind,
        }
    }

    fn leave(employee_id: &str, start: u32, end: u32, status: LeaveStatus) -> LeaveRecord {
        LeaveRecord {
            employee_id: employee_id.to_string(),
            start_date: date(start),
            end_date: date(end),
            status,
            policy: "annual".to_string(),
        }
    }

    fn grant(employee_id: &str, period_start: NaiveDate, minutes: i64) -> PermissionOverride {
        PermissionOverride {
            employee_id: employee_id.to_string(),
            period_start,
            extra_minutes: minutes,
            granted_by: "hr_admin".to_string(),
            reason: "school run".to_string(),
        }
    }

    #[test]
    fn test_events_kept_in_timestamp_order() {
        let mut store = InMemoryStore::new();
        store.record_event(event("emp_001", 12, "17:00", EventKind::SignOut));
        store.record_event(event("emp_001", 12, "09:00", EventKind::SignIn));

        let events = store
            .attendance_events("emp_001", date(12), date(12))
            .unwrap();
        assert_eq!(events[0].kind, EventKind::SignIn);
        assert_eq!(events[1].kind, EventKind::SignOut);
    }

    #[test]
    fn test_events_filtered_to_range_and_employee() {
        let mut store = InMemoryStore::new();
        store.record_event(event("emp_001", 11, "09:00", EventKind::SignIn));
        store.record_event(event("emp_001", 12, "09:00", EventKind::SignIn));
        store.record_event(event("emp_002", 12, "09:00", EventKind::SignIn));

        let events = store
            .attendance_events("emp_001", date(12), date(16))
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].employee_id, "emp_001");
        assert!(store
            .attendance_events("emp_999", date(12), date(16))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_only_approved_overlapping_leave_returned() {
        let mut store = InMemoryStore::new();
        store.add_leave(leave("emp_001", 14, 14, LeaveStatus::Approved));
        store.add_leave(leave("emp_001", 15, 15, LeaveStatus::Pending));
        store.add_leave(leave("emp_001", 16, 16, LeaveStatus::Rejected));
        store.add_leave(leave("emp_001", 1, 5, LeaveStatus::Approved));

        let leaves = store.approved_leaves("emp_001", date(12), date(16)).unwrap();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].start_date, date(14));
    }

    #[test]
    fn test_wfh_dates_in_range() {
        let mut store = InMemoryStore::new();
        for d in [10, 13, 20] {
            store.add_wfh(WfhRecord {
                employee_id: "emp_001".to_string(),
                date: date(d),
            });
        }
        let dates = store.wfh_dates("emp_001", date(12), date(16)).unwrap();
        assert_eq!(dates.into_iter().collect::<Vec<_>>(), vec![date(13)]);
    }

    #[test]
    fn test_override_minutes_summed_for_matching_period_only() {
        let mut store = InMemoryStore::new();
        store.grant_override(grant("emp_001", date(1), 30)).unwrap();
        store.grant_override(grant("emp_001", date(1), 15)).unwrap();
        store
            .grant_override(grant("emp_001", NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(), 90))
            .unwrap();
        store.grant_override(grant("emp_002", date(1), 90)).unwrap();

        assert_eq!(store.override_minutes("emp_001", date(1)).unwrap(), 45);
    }

    #[test]
    fn test_negative_override_rejected_at_write_time() {
        let mut store = InMemoryStore::new();
        let result = store.grant_override(grant("emp_001", date(1), -30));
        assert!(matches!(result, Err(EngineError::OutOfRangeOverride { .. })));
        assert_eq!(store.override_minutes("emp_001", date(1)).unwrap(), 0);
    }

    #[test]
    fn test_invalid_tiers_rejected_at_write_time() {
        let mut store = InMemoryStore::new();
        let result = store.activate_rule(RuleDefinition::LatePenalty(LatePenaltyRule {
            tiers: vec![
                PenaltyTier {
                    min_minutes_late: 1,
                    max_minutes_late: 30,
                    penalty_minutes: 30,
                },
                PenaltyTier {
                    min_minutes_late: 15,
                    max_minutes_late: 45,
                    penalty_minutes: 45,
                },
            ],
        }));
        assert!(matches!(
            result,
            Err(EngineError::InvalidTierConfiguration { .. })
        ));
        assert!(store.active_rule(RuleKind::LatePenalty).unwrap().is_none());
    }

    #[test]
    fn test_load_employee_inputs_reads_every_source() {
        let mut store = InMemoryStore::new();
        store.record_event(event("emp_001", 12, "09:00", EventKind::SignIn));
        store.record_event(event("emp_001", 12, "17:00", EventKind::SignOut));
        store.add_leave(leave("emp_001", 14, 14, LeaveStatus::Approved));
        store.add_wfh(WfhRecord {
            employee_id: "emp_001".to_string(),
            date: date(15),
        });
        store.grant_override(grant("emp_001", date(12), 20)).unwrap();

        let period = PayPeriod::new(date(12), date(16));
        let inputs = load_employee_inputs(&store, "emp_001", &period).unwrap();
        assert_eq!(inputs.events.len(), 2);
        assert_eq!(inputs.leaves.len(), 1);
        assert!(inputs.wfh_dates.contains(&date(15)));
        assert_eq!(inputs.permission_override_minutes, 20);
    }

    #[test]
    fn test_load_employee_inputs_rejects_inverted_period() {
        let store = InMemoryStore::new();
        let period = PayPeriod::new(date(16), date(12));
        assert!(matches!(
            load_employee_inputs(&store, "emp_001", &period),
            Err(EngineError::InvalidPeriod { .. })
        ));
    }
}
