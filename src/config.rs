//! Runtime settings.
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file, then `ZONEWATCH_*` environment variables (e.g.
//! `ZONEWATCH_ENDPOINT`, `ZONEWATCH_ZONE_INTERVAL_SECS`).

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use zonewatch_types::ZoneKey;

/// Settings shared by every run mode.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Base URL of the monitoring server.
    pub endpoint: String,
    /// Seconds between zone list refreshes.
    pub list_interval_secs: u64,
    /// Seconds between zone detail refreshes.
    pub zone_interval_secs: u64,
    /// Per-request HTTP timeout in seconds.
    pub timeout_secs: u64,
    /// Discover zones from the server's list. When off, only `zones` are
    /// refreshed.
    pub discover: bool,
    /// Zones to always refresh, as `<host>/zone/<name>`.
    #[serde(default)]
    pub zones: Vec<String>,
}

impl Settings {
    /// Load settings, reading `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("endpoint", "http://localhost:3000")?
            .set_default("list_interval_secs", 20_i64)?
            .set_default("zone_interval_secs", 2_i64)?
            .set_default("timeout_secs", 10_i64)?
            .set_default("discover", true)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(Environment::with_prefix("ZONEWATCH"))
            .build()
            .context("failed to load settings")?;

        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject intervals and timeouts of zero seconds.
    pub fn validate(&self) -> Result<()> {
        for (name, secs) in [
            ("list_interval_secs", self.list_interval_secs),
            ("zone_interval_secs", self.zone_interval_secs),
            ("timeout_secs", self.timeout_secs),
        ] {
            if secs == 0 {
                bail!("{} must be at least 1 second", name);
            }
        }
        Ok(())
    }

    pub fn list_interval(&self) -> Duration {
        Duration::from_secs(self.list_interval_secs)
    }

    pub fn zone_interval(&self) -> Duration {
        Duration::from_secs(self.zone_interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parse the explicitly tracked zones.
    pub fn tracked_zones(&self) -> Result<Vec<ZoneKey>> {
        self.zones
            .iter()
            .map(|id| {
                id.parse::<ZoneKey>()
                    .with_context(|| format!("invalid zone in settings: {}", id))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.list_interval(), Duration::from_secs(20));
        assert_eq!(settings.zone_interval(), Duration::from_secs(2));
        assert_eq!(settings.timeout(), Duration::from_secs(10));
        assert!(settings.tracked_zones().unwrap().is_empty());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
endpoint = "http://olympus.local:3000"
zone_interval_secs = 5
discover = false
zones = ["helms-deep/zone/box", "rivendel/zone/box"]
"#
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.endpoint, "http://olympus.local:3000");
        assert_eq!(settings.zone_interval_secs, 5);
        assert_eq!(settings.list_interval_secs, 20);
        assert!(!settings.discover);
        assert_eq!(
            settings.tracked_zones().unwrap(),
            vec![
                ZoneKey::new("helms-deep", "box"),
                ZoneKey::new("rivendel", "box")
            ]
        );
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(Settings::load(Some(Path::new("/nonexistent/zonewatch.toml"))).is_err());
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "zone_interval_secs = 0").unwrap();

        let err = Settings::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("zone_interval_secs"));
    }

    #[test]
    fn test_validate_after_override() {
        let mut settings = Settings::load(None).unwrap();
        assert!(settings.validate().is_ok());
        settings.list_interval_secs = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_invalid_zone() {
        let settings = Settings {
            zones: vec!["helms-deep:box".to_string()],
            ..Settings::load(None).unwrap()
        };
        let err = settings.tracked_zones().unwrap_err();
        assert!(err.to_string().contains("helms-deep:box"));
    }
}
