//! In-process zone simulation.
//!
//! Every detail fetch advances the fetched zone by one tick: readings follow
//! a fixed wave around a per-zone baseline, and alarms switch on and off
//! from those readings. Two sources built the same way return the same
//! sequence of zones, which keeps demos and tests reproducible.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use zonewatch_adapters::AdapterError;
use zonewatch_types::{Alarm, AlarmLevel, Bounds, Forecast, State, Zone, ZoneKey};

use super::ZoneSource;

const PHASE_STEP: f64 = 0.35;
const TEMPERATURE_SWING: f64 = 4.0;
const HUMIDITY_SWING: f64 = 20.0;
const WATER_PERIOD: u64 = 12;
const DAY_TICKS: u64 = 30;

const TEMPERATURE_ALARM: usize = 0;
const HUMIDITY_ALARM: usize = 1;
const WATER_ALARM: usize = 2;

/// A zone source that fabricates readings in memory.
#[derive(Debug)]
pub struct SimulatedSource {
    zones: Mutex<BTreeMap<ZoneKey, SimZone>>,
    fail_every: Option<u64>,
    fetches: Mutex<u64>,
}

#[derive(Debug, Clone)]
struct SimZone {
    key: ZoneKey,
    tick: u64,
    phase: f64,
    base_temperature: f64,
    base_humidity: f64,
    alarms: Vec<Alarm>,
}

impl SimulatedSource {
    /// Four zones spread over three hosts.
    pub fn new() -> Self {
        Self::with_zones([
            ZoneKey::new("helms-deep", "box"),
            ZoneKey::new("helms-deep", "tunnel"),
            ZoneKey::new("minas-tirith", "box"),
            ZoneKey::new("rivendel", "box"),
        ])
    }

    /// Simulate exactly the given zones.
    pub fn with_zones(keys: impl IntoIterator<Item = ZoneKey>) -> Self {
        let zones = keys
            .into_iter()
            .enumerate()
            .map(|(i, key)| (key.clone(), SimZone::new(key, i)))
            .collect();
        Self {
            zones: Mutex::new(zones),
            fail_every: None,
            fetches: Mutex::new(0),
        }
    }

    /// Make every `n`th detail fetch fail with a connection error.
    ///
    /// `0` disables failures.
    pub fn fail_every(mut self, n: u64) -> Self {
        self.fail_every = (n > 0).then_some(n);
        self
    }

    fn should_fail(&self) -> bool {
        let mut fetches = self.fetches.lock();
        *fetches += 1;
        matches!(self.fail_every, Some(n) if *fetches % n == 0)
    }
}

impl Default for SimulatedSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SimZone {
    fn new(key: ZoneKey, index: usize) -> Self {
        let index = index as f64;
        Self {
            key,
            tick: 0,
            phase: index * 1.3,
            base_temperature: 24.0 + index * 0.5,
            base_humidity: 58.0 - index * 2.0,
            alarms: vec![
                Alarm::new("Temperature is outside of boundaries", AlarmLevel::Warning),
                Alarm::new("Humidity is outside of boundaries", AlarmLevel::Warning),
                Alarm::new("Celaeno water level is low", AlarmLevel::Critical),
            ],
        }
    }

    fn temperature_bounds() -> Bounds {
        Bounds::new(22.0, 28.0)
    }

    fn humidity_bounds() -> Bounds {
        Bounds::new(40.0, 75.0)
    }

    fn advance(&mut self, now: DateTime<Utc>) -> Zone {
        self.tick += 1;
        let angle = self.phase + self.tick as f64 * PHASE_STEP;
        let temperature = round1(self.base_temperature + TEMPERATURE_SWING * angle.sin());
        let humidity = round1(self.base_humidity + HUMIDITY_SWING * angle.cos());

        let t_bounds = Self::temperature_bounds();
        let h_bounds = Self::humidity_bounds();
        self.switch(
            TEMPERATURE_ALARM,
            temperature < t_bounds.min || temperature > t_bounds.max,
            now,
        );
        self.switch(
            HUMIDITY_ALARM,
            humidity < h_bounds.min || humidity > h_bounds.max,
            now,
        );
        self.switch(WATER_ALARM, self.tick % WATER_PERIOD >= WATER_PERIOD - 2, now);

        let daytime = (self.tick / DAY_TICKS) % 2 == 0;
        let (current, upcoming) = if daytime {
            (day(), night())
        } else {
            (night(), day())
        };
        let remaining = DAY_TICKS - self.tick % DAY_TICKS;

        Zone::builder(self.key.host.clone(), self.key.name.clone())
            .temperature(temperature, t_bounds)
            .humidity(humidity, h_bounds)
            .alarms(self.alarms.iter().cloned())
            .current(current.clone())
            .next(Forecast::new(
                upcoming.clone(),
                now + Duration::minutes(remaining as i64),
            ))
            .next_end(upcoming)
            .current_end(current)
            .build()
    }

    fn switch(&mut self, index: usize, active: bool, now: DateTime<Utc>) {
        if self.alarms[index].active != active {
            self.alarms[index] = self.alarms[index].transition(active, now);
        }
    }
}

fn day() -> State {
    State::named("day")
        .temperature(26.0)
        .humidity(60.0)
        .wind(20.0)
        .visible_light(100.0)
        .uv_light(100.0)
}

fn night() -> State {
    State::named("night")
        .temperature(22.0)
        .humidity(70.0)
        .wind(0.0)
        .visible_light(0.0)
        .uv_light(0.0)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[async_trait]
impl ZoneSource for SimulatedSource {
    async fn list_zones(&self) -> Result<Vec<ZoneKey>, AdapterError> {
        Ok(self.zones.lock().keys().cloned().collect())
    }

    async fn get_zone(&self, key: &ZoneKey) -> Result<Zone, AdapterError> {
        if self.should_fail() {
            return Err(AdapterError::Connection("simulated outage".to_string()));
        }
        let mut zones = self.zones.lock();
        let zone = zones
            .get_mut(key)
            .ok_or_else(|| AdapterError::NotFound(key.clone()))?;
        Ok(zone.advance(Utc::now()))
    }

    fn description(&self) -> &str {
        "simulated"
    }
}
