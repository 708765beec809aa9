//! Zone identity.

use core::fmt;
use core::str::FromStr;

/// Identity of a zone: the host controller and the zone name on that host.
///
/// Rendered as `<host>/zone/<name>`, the identifier the controllers use.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneKey {
    pub host: String,
    pub name: String,
}

impl ZoneKey {
    pub fn new(host: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ZoneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/zone/{}", self.host, self.name)
    }
}

/// Error returned when a zone identifier is not `<host>/zone/<name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseZoneKeyError(String);

impl fmt::Display for ParseZoneKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid zone identifier '{}', expected <host>/zone/<name>", self.0)
    }
}

impl std::error::Error for ParseZoneKeyError {}

impl FromStr for ZoneKey {
    type Err = ParseZoneKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once("/zone/") {
            Some((host, name)) if !host.is_empty() && !name.is_empty() => Ok(ZoneKey::new(host, name)),
            _ => Err(ParseZoneKeyError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_controller_identifier() {
        let key = ZoneKey::new("helms-deep", "box");
        assert_eq!(key.to_string(), "helms-deep/zone/box");
    }

    #[test]
    fn test_parse_identifier() {
        let key: ZoneKey = "minas-tirith/zone/tunnel".parse().unwrap();
        assert_eq!(key, ZoneKey::new("minas-tirith", "tunnel"));
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        assert!("helms-deep".parse::<ZoneKey>().is_err());
        assert!("helms-deep/box".parse::<ZoneKey>().is_err());
        assert!("/zone/box".parse::<ZoneKey>().is_err());
        assert!("helms-deep/zone/".parse::<ZoneKey>().is_err());
    }

    #[test]
    fn test_ordered_by_host_then_name() {
        let mut keys = vec![
            ZoneKey::new("rivendel", "box"),
            ZoneKey::new("helms-deep", "tunnel"),
            ZoneKey::new("helms-deep", "box"),
        ];
        keys.sort();
        assert_eq!(keys[0], ZoneKey::new("helms-deep", "box"));
        assert_eq!(keys[1], ZoneKey::new("helms-deep", "tunnel"));
        assert_eq!(keys[2], ZoneKey::new("rivendel", "box"));
    }
}
