//! File-based zone source.
//!
//! Reads zones from a JSON file holding an array of zone detail payloads,
//! the same shape the server returns from its detail endpoint.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use zonewatch_adapters::payload::{ZonePayload, ZoneSummaryPayload};
use zonewatch_adapters::AdapterError;
use zonewatch_types::{Zone, ZoneKey};

use super::ZoneSource;

/// A zone source backed by a JSON file.
///
/// The file is read again on every request, so edits are picked up on the
/// next cycle whatever their modification time.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self { path, description }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<ZonePayload>, AdapterError> {
        let content = tokio::fs::read(&self.path).await?;
        let zones: Option<Vec<ZonePayload>> = serde_json::from_slice(&content)?;
        Ok(zones.unwrap_or_default())
    }
}

#[async_trait]
impl ZoneSource for FileSource {
    async fn list_zones(&self) -> Result<Vec<ZoneKey>, AdapterError> {
        let zones = self.load().await?;
        zones
            .iter()
            .map(|zone| {
                ZoneSummaryPayload {
                    host: zone.host.clone(),
                    name: zone.name.clone(),
                }
                .adapt()
            })
            .collect()
    }

    async fn get_zone(&self, key: &ZoneKey) -> Result<Zone, AdapterError> {
        let zones = self.load().await?;
        let payload = zones
            .into_iter()
            .find(|zone| {
                zone.host.as_deref() == Some(key.host.as_str())
                    && zone.name.as_deref() == Some(key.name.as_str())
            })
            .ok_or_else(|| AdapterError::NotFound(key.clone()))?;
        payload.adapt()
    }

    fn description(&self) -> &str {
        &self.description
    }
}
