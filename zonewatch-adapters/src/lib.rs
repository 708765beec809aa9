//! # zonewatch-adapters
//!
//! Converts what a zone monitoring server sends into the typed model of
//! [`zonewatch_types`], and fetches it.
//!
//! - [`payload`]: wire shapes and the pure payload → entity adapters
//! - [`http`] (`http` feature): client for the server's JSON API
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use zonewatch_adapters::http::HttpZoneClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpZoneClient::builder()
//!         .endpoint("http://olympus.local:3000")
//!         .build()?;
//!
//!     for key in client.list_zones().await? {
//!         let zone = client.get_zone(&key).await?;
//!         println!("{}: {}", key, zone.alarm_status().label());
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod payload;

#[cfg(feature = "http")]
pub mod http;

pub use error::AdapterError;
pub use payload::{parse_zone, parse_zone_list};

// Re-export types for convenience
pub use zonewatch_types::{Alarm, AlarmLevel, Bounds, Forecast, State, Zone, ZoneKey};
