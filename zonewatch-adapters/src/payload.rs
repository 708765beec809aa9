//! Wire payloads of the zone API and their adapters.
//!
//! The server serializes its zones with PascalCase field names and leaves
//! most nested objects out (or `null`) when it has nothing to say. Every
//! payload field is therefore optional here; the `adapt` methods decide which
//! absences get a default and which make the payload malformed.
//!
//! ## Example
//!
//! ```
//! use zonewatch_adapters::parse_zone;
//! use zonewatch_types::{AlarmSeverity, Bounds};
//!
//! let json = br#"{
//!     "Host": "helms-deep",
//!     "Name": "box",
//!     "Temperature": 21.2,
//!     "TemperatureBounds": { "Min": 22.0, "Max": null },
//!     "Humidity": 62.0,
//!     "Alarms": null
//! }"#;
//!
//! let zone = parse_zone(json).unwrap();
//! assert_eq!(zone.temperature_bounds, Bounds::new(22.0, 100.0));
//! assert_eq!(zone.humidity_bounds, Bounds::new(0.0, 100.0));
//! assert_eq!(zone.alarm_status(), AlarmSeverity::Danger);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use zonewatch_types::{Alarm, AlarmLevel, Bounds, Forecast, State, Zone, ZoneKey};

use crate::AdapterError;

/// Decode a zone detail body.
pub fn parse_zone(body: &[u8]) -> Result<Zone, AdapterError> {
    let payload: ZonePayload = serde_json::from_slice(body)?;
    payload.adapt()
}

/// Decode a zone list body into zone keys.
pub fn parse_zone_list(body: &[u8]) -> Result<Vec<ZoneKey>, AdapterError> {
    let payload: Option<Vec<ZoneSummaryPayload>> = serde_json::from_slice(body)?;
    payload
        .unwrap_or_default()
        .into_iter()
        .map(ZoneSummaryPayload::adapt)
        .collect()
}

/// Entry of the zone list. The server may send full zones here; only the
/// identity is read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ZoneSummaryPayload {
    pub host: Option<String>,
    pub name: Option<String>,
}

impl ZoneSummaryPayload {
    pub fn adapt(self) -> Result<ZoneKey, AdapterError> {
        let host = self.host.ok_or(AdapterError::Malformed("Host"))?;
        let name = self.name.ok_or(AdapterError::Malformed("Name"))?;
        Ok(ZoneKey::new(host, name))
    }
}

impl From<&ZoneKey> for ZoneSummaryPayload {
    fn from(key: &ZoneKey) -> Self {
        Self {
            host: Some(key.host.clone()),
            name: Some(key.name.clone()),
        }
    }
}

/// Bounds as sent on the wire; either end may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BoundsPayload {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl BoundsPayload {
    /// Missing ends fall back to `[0, 100]`. No range check is made.
    pub fn adapt(&self) -> Bounds {
        Bounds::from_parts(self.min, self.max)
    }
}

impl From<&Bounds> for BoundsPayload {
    fn from(bounds: &Bounds) -> Self {
        Self {
            min: Some(bounds.min),
            max: Some(bounds.max),
        }
    }
}

/// Adapt optional bounds; an absent object is the default range.
pub fn adapt_bounds(raw: Option<&BoundsPayload>) -> Bounds {
    raw.map(BoundsPayload::adapt).unwrap_or_default()
}

/// A climate state as sent on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatePayload {
    pub name: Option<String>,
    pub humidity: Option<f64>,
    pub temperature: Option<f64>,
    pub wind: Option<f64>,
    pub visible_light: Option<f64>,
    #[serde(rename = "UVLight")]
    pub uv_light: Option<f64>,
}

impl StatePayload {
    pub fn adapt(self) -> State {
        State {
            name: self.name,
            humidity: self.humidity,
            temperature: self.temperature,
            wind: self.wind,
            visible_light: self.visible_light,
            uv_light: self.uv_light,
        }
    }
}

impl From<&State> for StatePayload {
    fn from(state: &State) -> Self {
        Self {
            name: state.name.clone(),
            humidity: state.humidity,
            temperature: state.temperature,
            wind: state.wind,
            visible_light: state.visible_light,
            uv_light: state.uv_light,
        }
    }
}

/// An alarm as sent on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AlarmPayload {
    pub reason: Option<String>,
    pub on: Option<bool>,
    pub last_change: Option<DateTime<Utc>>,
    pub level: Option<i64>,
    pub triggers: Option<i64>,
}

impl AlarmPayload {
    pub fn adapt(self) -> Result<Alarm, AdapterError> {
        Ok(Alarm {
            reason: self.reason.ok_or(AdapterError::Malformed("Alarm.Reason"))?,
            active: self.on.ok_or(AdapterError::Malformed("Alarm.On"))?,
            last_change: self.last_change,
            level: AlarmLevel::from_code(self.level.ok_or(AdapterError::Malformed("Alarm.Level"))?),
            triggers: self.triggers.unwrap_or(0),
        })
    }
}

impl From<&Alarm> for AlarmPayload {
    fn from(alarm: &Alarm) -> Self {
        Self {
            reason: Some(alarm.reason.clone()),
            on: Some(alarm.active),
            last_change: alarm.last_change,
            level: Some(alarm.level.code()),
            triggers: Some(alarm.triggers),
        }
    }
}

/// Full zone detail as sent on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ZonePayload {
    pub host: Option<String>,
    pub name: Option<String>,
    pub temperature: Option<f64>,
    pub temperature_bounds: Option<BoundsPayload>,
    pub humidity: Option<f64>,
    pub humidity_bounds: Option<BoundsPayload>,
    pub alarms: Option<Vec<AlarmPayload>>,
    pub current: Option<StatePayload>,
    pub current_end: Option<StatePayload>,
    pub next: Option<StatePayload>,
    pub next_end: Option<StatePayload>,
    pub next_time: Option<DateTime<Utc>>,
}

impl ZonePayload {
    /// Build the typed zone.
    ///
    /// The forecast is kept only when both `Next` and `NextTime` are present;
    /// `NextEnd` and `CurrentEnd` stand on their own.
    pub fn adapt(self) -> Result<Zone, AdapterError> {
        let host = self.host.ok_or(AdapterError::Malformed("Host"))?;
        let name = self.name.ok_or(AdapterError::Malformed("Name"))?;
        let temperature = self.temperature.ok_or(AdapterError::Malformed("Temperature"))?;
        let humidity = self.humidity.ok_or(AdapterError::Malformed("Humidity"))?;

        let alarms = self
            .alarms
            .unwrap_or_default()
            .into_iter()
            .map(AlarmPayload::adapt)
            .collect::<Result<Vec<_>, _>>()?;

        let next = match (self.next, self.next_time) {
            (Some(state), Some(at)) => Some(Forecast::new(state.adapt(), at)),
            _ => None,
        };

        Ok(Zone {
            key: ZoneKey::new(host, name),
            temperature,
            temperature_bounds: adapt_bounds(self.temperature_bounds.as_ref()),
            humidity,
            humidity_bounds: adapt_bounds(self.humidity_bounds.as_ref()),
            alarms,
            current: self.current.map(StatePayload::adapt),
            current_end: self.current_end.map(StatePayload::adapt),
            next,
            next_end: self.next_end.map(StatePayload::adapt),
        })
    }
}

impl From<&Zone> for ZonePayload {
    fn from(zone: &Zone) -> Self {
        Self {
            host: Some(zone.key.host.clone()),
            name: Some(zone.key.name.clone()),
            temperature: Some(zone.temperature),
            temperature_bounds: Some(BoundsPayload::from(&zone.temperature_bounds)),
            humidity: Some(zone.humidity),
            humidity_bounds: Some(BoundsPayload::from(&zone.humidity_bounds)),
            alarms: Some(zone.alarms.iter().map(AlarmPayload::from).collect()),
            current: zone.current.as_ref().map(StatePayload::from),
            current_end: zone.current_end.as_ref().map(StatePayload::from),
            next: zone.next.as_ref().map(|f| StatePayload::from(&f.state)),
            next_end: zone.next_end.as_ref().map(StatePayload::from),
            next_time: zone.next.as_ref().map(|f| f.at),
        }
    }
}
