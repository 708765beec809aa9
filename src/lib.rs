//! # zonewatch
//!
//! Live climate and alarm monitor for the zones of building-automation
//! controllers.
//!
//! A zone is a climate-controlled space on a host controller. Each one
//! reports temperature and humidity with acceptable bounds, a set of alarms,
//! and its current and upcoming climate states. This crate keeps an
//! up-to-date, display-ready view of every zone by polling a monitoring
//! server.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          zonewatch                           │
//! │  ┌──────────┐   fetch   ┌───────────┐  snapshot ┌──────────┐ │
//! │  │  source  │◀──────────│ refresher │──────────▶│ directory│ │
//! │  │ (input)  │──────────▶│  (task)   │   watch   │  (view)  │ │
//! │  └──────────┘  results  └───────────┘           └────┬─────┘ │
//! │   HttpSource | FileSource | SimulatedSource          │       │
//! │                                                      ▼       │
//! │                                                ┌──────────┐  │
//! │                                                │  report  │  │
//! │                                                └──────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: the [`ZoneSource`] trait, with sources for the server's
//!   HTTP API, a JSON file, and an in-process simulation
//! - **[`refresher`]**: [`ZoneRefresher`] polls a source on a list interval
//!   and a zone interval and publishes [`ZoneDirectory`] snapshots
//! - **[`directory`]**: immutable snapshots of every tracked zone and whether
//!   its last fetch succeeded
//! - **[`report`]**: one-line summaries and JSON export
//! - **[`config`]**: layered [`Settings`]
//!
//! The domain model lives in `zonewatch-types`; wire decoding and the HTTP
//! client live in `zonewatch-adapters`.
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch the zones of a monitoring server
//! zonewatch --endpoint http://olympus.local:3000
//!
//! # One refresh, then write a JSON report
//! zonewatch --export zones-report.json
//!
//! # Offline, against a file or the simulation
//! zonewatch --file zones.json
//! zonewatch --simulate
//! ```
//!
//! ### As a library
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use zonewatch::{report, SimulatedSource, ZoneRefresher};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let refresher = ZoneRefresher::builder(Arc::new(SimulatedSource::new())).build();
//! let directory = refresher.refresh_once().await;
//!
//! for (key, entry) in directory.iter() {
//!     println!("{}", report::summary_line(key, entry));
//! }
//! # }
//! ```

pub mod config;
pub mod directory;
pub mod refresher;
pub mod report;
pub mod source;

pub use config::Settings;
pub use directory::{DirectoryWatch, Freshness, ZoneDirectory, ZoneEntry};
pub use refresher::{RefreshHandle, RefreshState, ZoneRefresher, ZoneRefresherBuilder};
pub use source::{FileSource, HttpSource, SimulatedSource, ZoneSource};

// Re-export the domain model for convenience
pub use zonewatch_adapters::AdapterError;
pub use zonewatch_types::{
    Alarm, AlarmLevel, AlarmSeverity, Bounds, Forecast, MetricStatus, State, Zone, ZoneKey,
};
