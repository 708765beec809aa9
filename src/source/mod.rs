//! Zone source abstraction.
//!
//! A [`ZoneSource`] answers the two questions the refresher asks: which zones
//! exist, and what does one zone look like right now. Implementations exist
//! for the monitoring server's HTTP API, a JSON file on disk, and an in-process
//! simulation.

mod file;
mod http;
mod simulated;

pub use file::FileSource;
pub use http::HttpSource;
pub use simulated::SimulatedSource;

use std::fmt::Debug;

use async_trait::async_trait;
use zonewatch_adapters::AdapterError;
use zonewatch_types::{Zone, ZoneKey};

/// Trait for fetching zone data from a backend.
///
/// Both operations may be called concurrently from spawned tasks, so
/// implementations must be `Send + Sync`.
///
/// # Example
///
/// ```
/// use zonewatch::{SimulatedSource, ZoneSource};
///
/// tokio_test::block_on(async {
///     let source = SimulatedSource::new();
///     for key in source.list_zones().await.unwrap() {
///         let zone = source.get_zone(&key).await.unwrap();
///         println!("{} {}", key, zone.alarm_status().label());
///     }
/// });
/// ```
#[async_trait]
pub trait ZoneSource: Send + Sync + Debug {
    /// Identities of every zone the backend currently knows.
    async fn list_zones(&self) -> Result<Vec<ZoneKey>, AdapterError>;

    /// Full detail of one zone.
    async fn get_zone(&self, key: &ZoneKey) -> Result<Zone, AdapterError>;

    /// Returns a human-readable description of the source.
    ///
    /// Used in log lines and the export header.
    fn description(&self) -> &str;
}
