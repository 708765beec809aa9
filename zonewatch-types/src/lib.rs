//! # zonewatch-types
//!
//! Core types for zone climate monitoring. A zone is a monitored enclosure
//! attached to a host controller; it carries live temperature and humidity
//! readings, their acceptable bounds, an optional forecast window and a set
//! of alarms.
//!
//! The types here are plain values. They hold no I/O and no shared state:
//! a fresh [`Zone`] is built for every fetch and replaces the previous one
//! wholesale.
//!
//! ## Features
//!
//! - `serde`: derive `Serialize`/`Deserialize` on every type
//!
//! ## Example
//!
//! ```rust
//! use zonewatch_types::{Alarm, AlarmLevel, AlarmSeverity, Bounds, MetricStatus, Zone};
//!
//! let zone = Zone::builder("helms-deep", "box")
//!     .temperature(30.0, Bounds::new(15.0, 25.0))
//!     .humidity(50.0, Bounds::new(20.0, 80.0))
//!     .alarm(Alarm::new("Temperature is outside of boundaries", AlarmLevel::Critical).with_active(true))
//!     .build();
//!
//! assert_eq!(zone.temperature_status(), MetricStatus::Danger);
//! assert_eq!(zone.humidity_status(), MetricStatus::Success);
//! assert_eq!(zone.alarm_status(), AlarmSeverity::Danger);
//! assert_eq!(zone.active_alarm_count(), 1);
//! ```

mod alarm;
mod bounds;
mod collate;
mod key;
mod state;
mod status;
mod zone;

pub use alarm::*;
pub use bounds::*;
pub use collate::collate;
pub use key::*;
pub use state::*;
pub use status::*;
pub use zone::*;
