//! Zone aggregate and status derivation.

use crate::{Alarm, AlarmSeverity, Bounds, Forecast, MetricStatus, State, ZoneKey};

/// A monitored zone and everything known about it at one fetch.
///
/// A zone exclusively owns its alarms, bounds and states.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Zone {
    pub key: ZoneKey,
    pub temperature: f64,
    pub temperature_bounds: Bounds,
    pub humidity: f64,
    pub humidity_bounds: Bounds,
    /// Alarms in the order the controller reported them.
    pub alarms: Vec<Alarm>,
    /// State of the running interval.
    pub current: Option<State>,
    /// State at the end of the running interval.
    pub current_end: Option<State>,
    /// Next scheduled state, if a forecast exists.
    pub next: Option<Forecast>,
    /// State at the end of the next interval.
    pub next_end: Option<State>,
}

impl Zone {
    /// Create a builder for the zone `name` on `host`.
    pub fn builder(host: impl Into<String>, name: impl Into<String>) -> ZoneBuilder {
        ZoneBuilder::new(ZoneKey::new(host, name))
    }

    pub fn host(&self) -> &str {
        &self.key.host
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }

    /// Temperature status. Too hot is a danger, too cold a warning.
    pub fn temperature_status(&self) -> MetricStatus {
        self.temperature_bounds
            .grade(self.temperature, MetricStatus::Warning, MetricStatus::Danger)
    }

    /// Humidity status. Too dry is a danger, too wet a warning.
    pub fn humidity_status(&self) -> MetricStatus {
        self.humidity_bounds
            .grade(self.humidity, MetricStatus::Danger, MetricStatus::Warning)
    }

    /// Severity of the alarm set as a whole.
    ///
    /// A zone reporting no alarms at all is `Danger`: it means the alarm
    /// telemetry is missing. Otherwise the highest-level active alarm decides
    /// (first one wins on equal levels); with no active alarm the first
    /// alarm decides, which is always `Info`.
    pub fn alarm_status(&self) -> AlarmSeverity {
        let Some(mut candidate) = self.alarms.first() else {
            return AlarmSeverity::Danger;
        };

        for alarm in self.alarms.iter().filter(|a| a.active) {
            if !candidate.active || alarm.level > candidate.level {
                candidate = alarm;
            }
        }

        candidate.classify()
    }

    /// Alarms in display order. The zone itself is left untouched.
    pub fn sorted_alarms(&self) -> Vec<Alarm> {
        let mut sorted = self.alarms.clone();
        sorted.sort_by(Alarm::display_cmp);
        sorted
    }

    /// Number of currently active alarms.
    pub fn active_alarm_count(&self) -> usize {
        self.alarms.iter().filter(|a| a.active).count()
    }
}

/// Builder for [`Zone`] values.
#[derive(Debug)]
pub struct ZoneBuilder {
    zone: Zone,
}

impl ZoneBuilder {
    pub fn new(key: ZoneKey) -> Self {
        Self {
            zone: Zone {
                key,
                temperature: 0.0,
                temperature_bounds: Bounds::default(),
                humidity: 0.0,
                humidity_bounds: Bounds::default(),
                alarms: Vec::new(),
                current: None,
                current_end: None,
                next: None,
                next_end: None,
            },
        }
    }

    pub fn temperature(mut self, value: f64, bounds: Bounds) -> Self {
        self.zone.temperature = value;
        self.zone.temperature_bounds = bounds;
        self
    }

    pub fn humidity(mut self, value: f64, bounds: Bounds) -> Self {
        self.zone.humidity = value;
        self.zone.humidity_bounds = bounds;
        self
    }

    /// Append an alarm, keeping insertion order.
    pub fn alarm(mut self, alarm: Alarm) -> Self {
        self.zone.alarms.push(alarm);
        self
    }

    pub fn alarms(mut self, alarms: impl IntoIterator<Item = Alarm>) -> Self {
        self.zone.alarms.extend(alarms);
        self
    }

    pub fn current(mut self, state: State) -> Self {
        self.zone.current = Some(state);
        self
    }

    pub fn current_end(mut self, state: State) -> Self {
        self.zone.current_end = Some(state);
        self
    }

    pub fn next(mut self, forecast: Forecast) -> Self {
        self.zone.next = Some(forecast);
        self
    }

    pub fn next_end(mut self, state: State) -> Self {
        self.zone.next_end = Some(state);
        self
    }

    pub fn build(self) -> Zone {
        self.zone
    }
}
