//! Text and JSON renderings of a zone directory.

use std::path::Path;

use anyhow::Result;
use serde_json::{json, Map, Value};
use zonewatch_types::{Alarm, AlarmLevel, AlarmSeverity, Bounds, Zone, ZoneKey};

use crate::directory::{ZoneDirectory, ZoneEntry};

/// One line describing a zone, as printed in watch mode.
pub fn summary_line(key: &ZoneKey, entry: &ZoneEntry) -> String {
    match entry {
        ZoneEntry::Fresh(zone) => format!(
            "{}  {:.1}°C [{}]  {:.1}% [{}]  {}/{} alarms [{}]",
            key,
            zone.temperature,
            zone.temperature_status().label(),
            zone.humidity,
            zone.humidity_status().label(),
            zone.active_alarm_count(),
            zone.alarms.len(),
            zone.alarm_status().label(),
        ),
        ZoneEntry::Unavailable { reason } => format!("{}  unavailable: {}", key, reason),
    }
}

/// Full directory report: summary counts and every zone with its statuses
/// and alarms in display order.
pub fn export_json(directory: &ZoneDirectory) -> Value {
    let mut export = Map::new();

    let mut summary = Map::new();
    summary.insert("total_zones".to_string(), json!(directory.len()));
    summary.insert("fresh".to_string(), json!(directory.zones().count()));
    summary.insert("unavailable".to_string(), json!(directory.unavailable_count()));

    let danger = directory
        .zones()
        .filter(|z| z.alarm_status() == AlarmSeverity::Danger)
        .count();
    let warning = directory
        .zones()
        .filter(|z| z.alarm_status() == AlarmSeverity::Warning)
        .count();
    summary.insert("danger".to_string(), json!(danger));
    summary.insert("warning".to_string(), json!(warning));

    let active_alarms: usize = directory.zones().map(Zone::active_alarm_count).sum();
    summary.insert("active_alarms".to_string(), json!(active_alarms));
    summary.insert(
        "updated_at".to_string(),
        json!(directory.updated_at().map(|t| t.to_rfc3339())),
    );

    export.insert("summary".to_string(), Value::Object(summary));

    let zones: Vec<Value> = directory
        .iter()
        .map(|(key, entry)| match entry {
            ZoneEntry::Fresh(zone) => zone_json(zone),
            ZoneEntry::Unavailable { reason } => json!({
                "zone": key.to_string(),
                "freshness": "unavailable",
                "reason": reason,
            }),
        })
        .collect();
    export.insert("zones".to_string(), Value::Array(zones));

    Value::Object(export)
}

/// Write the [`export_json`] report to `path`.
pub fn write_export(directory: &ZoneDirectory, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(&export_json(directory))?;
    std::fs::write(path, content)?;
    Ok(())
}

fn zone_json(zone: &Zone) -> Value {
    json!({
        "zone": zone.key.to_string(),
        "freshness": "fresh",
        "temperature": zone.temperature,
        "temperature_bounds": bounds_json(&zone.temperature_bounds),
        "temperature_status": zone.temperature_status().label(),
        "humidity": zone.humidity,
        "humidity_bounds": bounds_json(&zone.humidity_bounds),
        "humidity_status": zone.humidity_status().label(),
        "alarm_status": zone.alarm_status().label(),
        "active_alarms": zone.active_alarm_count(),
        "current": zone.current.as_ref().and_then(|s| s.name.clone()),
        "next": zone.next.as_ref().map(|f| json!({
            "state": f.state.name,
            "at": f.at.to_rfc3339(),
        })),
        "alarms": zone.sorted_alarms().iter().map(alarm_json).collect::<Vec<_>>(),
    })
}

fn bounds_json(bounds: &Bounds) -> Value {
    json!({ "min": bounds.min, "max": bounds.max })
}

fn alarm_json(alarm: &Alarm) -> Value {
    json!({
        "reason": alarm.reason,
        "active": alarm.active,
        "level": match alarm.level {
            AlarmLevel::Warning => "warning",
            AlarmLevel::Critical => "critical",
        },
        "severity": alarm.classify().label(),
        "triggers": alarm.triggers,
        "last_change": alarm.last_change.map(|t| t.to_rfc3339()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use zonewatch_types::{Alarm, AlarmLevel, Bounds};

    fn directory() -> ZoneDirectory {
        let mut dir = ZoneDirectory::new();
        dir.replace(
            Zone::builder("helms-deep", "box")
                .temperature(30.0, Bounds::new(15.0, 25.0))
                .humidity(55.0, Bounds::default())
                .alarm(Alarm::new("Humidity is outside of boundaries", AlarmLevel::Warning))
                .alarm(
                    Alarm::new("Temperature is outside of boundaries", AlarmLevel::Critical)
                        .with_active(true),
                )
                .build(),
        );
        dir.mark_unavailable(ZoneKey::new("rivendel", "box"), "Request timed out");
        dir
    }

    #[test]
    fn test_summary_line_fresh() {
        let dir = directory();
        let key = ZoneKey::new("helms-deep", "box");
        let line = summary_line(&key, dir.entry(&key).unwrap());
        assert_eq!(
            line,
            "helms-deep/zone/box  30.0°C [danger]  55.0% [success]  1/2 alarms [danger]"
        );
    }

    #[test]
    fn test_summary_line_unavailable() {
        let dir = directory();
        let key = ZoneKey::new("rivendel", "box");
        let line = summary_line(&key, dir.entry(&key).unwrap());
        assert_eq!(line, "rivendel/zone/box  unavailable: Request timed out");
    }

    #[test]
    fn test_export_json() {
        let export = export_json(&directory());

        let summary = &export["summary"];
        assert_eq!(summary["total_zones"], 2);
        assert_eq!(summary["fresh"], 1);
        assert_eq!(summary["unavailable"], 1);
        assert_eq!(summary["danger"], 1);
        assert_eq!(summary["active_alarms"], 1);

        let zones = export["zones"].as_array().unwrap();
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0]["zone"], "helms-deep/zone/box");
        assert_eq!(zones[0]["temperature_status"], "danger");
        // Active alarm first
        assert_eq!(
            zones[0]["alarms"][0]["reason"],
            "Temperature is outside of boundaries"
        );
        assert_eq!(zones[0]["alarms"][1]["severity"], "info");
        assert_eq!(zones[1]["freshness"], "unavailable");
    }

    #[test]
    fn test_write_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zones.json");
        write_export(&directory(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["summary"]["total_zones"], 2);
    }
}
