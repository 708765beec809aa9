//! Alarm conditions raised by a zone controller.

use core::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::{collate, AlarmSeverity};

/// Configured priority of an alarm.
///
/// On the wire the level is an integer: `1` is a warning, any other value is
/// treated as critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlarmLevel {
    Warning,
    Critical,
}

impl AlarmLevel {
    /// Wire code of this level.
    pub const fn code(&self) -> i64 {
        match self {
            AlarmLevel::Warning => 1,
            AlarmLevel::Critical => 2,
        }
    }

    /// Level for a wire code.
    pub const fn from_code(code: i64) -> Self {
        if code == 1 {
            AlarmLevel::Warning
        } else {
            AlarmLevel::Critical
        }
    }
}

/// A single alarm condition of a zone.
///
/// Alarms are values: the refresh loop rebuilds them on every fetch instead
/// of toggling fields on a shared instance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Alarm {
    /// Human readable condition, e.g. "Celaeno water level is low".
    pub reason: String,
    /// Whether the condition currently holds.
    pub active: bool,
    /// Last time the alarm changed state. `None` if it never did.
    pub last_change: Option<DateTime<Utc>>,
    pub level: AlarmLevel,
    /// Number of times the alarm went from inactive to active.
    ///
    /// Upstream values are carried as-is, including negative ones.
    pub triggers: i64,
}

impl Alarm {
    /// Create an inactive alarm that never triggered.
    pub fn new(reason: impl Into<String>, level: AlarmLevel) -> Self {
        Self {
            reason: reason.into(),
            active: false,
            last_change: None,
            level,
            triggers: 0,
        }
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_last_change(mut self, at: DateTime<Utc>) -> Self {
        self.last_change = Some(at);
        self
    }

    pub fn with_triggers(mut self, triggers: i64) -> Self {
        self.triggers = triggers;
        self
    }

    /// Severity used to display this alarm.
    ///
    /// An inactive alarm is always `Info`, whatever its level.
    pub fn classify(&self) -> AlarmSeverity {
        if !self.active {
            return AlarmSeverity::Info;
        }
        match self.level {
            AlarmLevel::Warning => AlarmSeverity::Warning,
            AlarmLevel::Critical => AlarmSeverity::Danger,
        }
    }

    /// Display order: active alarms first, then higher level first, then
    /// reasons in reading order.
    pub fn display_cmp(&self, other: &Alarm) -> Ordering {
        other
            .active
            .cmp(&self.active)
            .then_with(|| other.level.cmp(&self.level))
            .then_with(|| collate(&self.reason, &other.reason))
    }

    /// The alarm after an on/off event reported at `at`.
    ///
    /// `triggers` only grows when the alarm goes from inactive to active.
    pub fn transition(&self, active: bool, at: DateTime<Utc>) -> Alarm {
        let triggers = if active && !self.active {
            self.triggers + 1
        } else {
            self.triggers
        };
        Alarm {
            reason: self.reason.clone(),
            active,
            last_change: Some(at),
            level: self.level,
            triggers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn alarm(reason: &str, level: AlarmLevel, active: bool) -> Alarm {
        Alarm::new(reason, level).with_active(active)
    }

    #[test]
    fn test_inactive_alarms_classify_as_info() {
        assert_eq!(alarm("a", AlarmLevel::Warning, false).classify(), AlarmSeverity::Info);
        assert_eq!(alarm("a", AlarmLevel::Critical, false).classify(), AlarmSeverity::Info);
    }

    #[test]
    fn test_active_alarms_classify_by_level() {
        assert_eq!(alarm("a", AlarmLevel::Warning, true).classify(), AlarmSeverity::Warning);
        assert_eq!(alarm("a", AlarmLevel::Critical, true).classify(), AlarmSeverity::Danger);
    }

    #[test]
    fn test_level_codes() {
        assert_eq!(AlarmLevel::from_code(1), AlarmLevel::Warning);
        assert_eq!(AlarmLevel::from_code(2), AlarmLevel::Critical);
        assert_eq!(AlarmLevel::from_code(7), AlarmLevel::Critical);
        assert_eq!(AlarmLevel::Warning.code(), 1);
        assert_eq!(AlarmLevel::Critical.code(), 2);
    }

    #[test]
    fn test_active_sorts_before_inactive() {
        let on = alarm("z", AlarmLevel::Warning, true);
        let off = alarm("a", AlarmLevel::Critical, false);
        assert_eq!(on.display_cmp(&off), Ordering::Less);
        assert_eq!(off.display_cmp(&on), Ordering::Greater);
    }

    #[test]
    fn test_higher_level_sorts_first() {
        let crit = alarm("z", AlarmLevel::Critical, true);
        let warn = alarm("a", AlarmLevel::Warning, true);
        assert_eq!(crit.display_cmp(&warn), Ordering::Less);
    }

    #[test]
    fn test_reason_breaks_ties() {
        let a = alarm("fan aging", AlarmLevel::Warning, false);
        let b = alarm("Humidity unreachable", AlarmLevel::Warning, false);
        assert_eq!(a.display_cmp(&b), Ordering::Less);
        assert_eq!(a.display_cmp(&a.clone()), Ordering::Equal);
    }

    #[test]
    fn test_accented_reasons_sort_by_base_letter() {
        let mut alarms = vec![
            alarm("Zeus manquant", AlarmLevel::Warning, true),
            alarm("Écran vide", AlarmLevel::Warning, true),
            alarm("Arke bus down", AlarmLevel::Warning, true),
        ];
        alarms.sort_by(Alarm::display_cmp);

        let reasons: Vec<&str> = alarms.iter().map(|a| a.reason.as_str()).collect();
        assert_eq!(reasons, vec!["Arke bus down", "Écran vide", "Zeus manquant"]);
    }

    #[test]
    fn test_comparator_is_antisymmetric_and_transitive() {
        let mut alarms = Vec::new();
        for reason in ["b", "A", "a", "c"] {
            for level in [AlarmLevel::Warning, AlarmLevel::Critical] {
                for active in [false, true] {
                    alarms.push(alarm(reason, level, active));
                }
            }
        }

        for a in &alarms {
            for b in &alarms {
                assert_eq!(a.display_cmp(b), b.display_cmp(a).reverse());
                for c in &alarms {
                    if a.display_cmp(b) != Ordering::Greater && b.display_cmp(c) != Ordering::Greater {
                        assert_ne!(a.display_cmp(c), Ordering::Greater);
                    }
                }
            }
        }
    }

    #[test]
    fn test_transition_counts_rising_edges_only() {
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 3, 1, 12, 5, 0).unwrap();

        let idle = Alarm::new("Fan Zeus is stalled", AlarmLevel::Critical);
        let raised = idle.transition(true, t0);
        assert!(raised.active);
        assert_eq!(raised.triggers, 1);
        assert_eq!(raised.last_change, Some(t0));

        // Repeated "on" events do not count again
        let still = raised.transition(true, t1);
        assert_eq!(still.triggers, 1);
        assert_eq!(still.last_change, Some(t1));

        let cleared = still.transition(false, t1);
        assert!(!cleared.active);
        assert_eq!(cleared.triggers, 1);

        assert_eq!(cleared.transition(true, t1).triggers, 2);
        // The source value is untouched
        assert!(!idle.active);
        assert_eq!(idle.triggers, 0);
    }
}
