//! Display severities derived from zone readings and alarms.

/// Severity of a single alarm, or of a zone's alarm set, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AlarmSeverity {
    Info,
    Warning,
    Danger,
}

impl AlarmSeverity {
    /// Returns the label consumers style on.
    pub fn label(&self) -> &'static str {
        match self {
            AlarmSeverity::Info => "info",
            AlarmSeverity::Warning => "warning",
            AlarmSeverity::Danger => "danger",
        }
    }
}

/// Status of a bounded metric (temperature, humidity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MetricStatus {
    Success,
    Warning,
    Danger,
}

impl MetricStatus {
    /// Returns the label consumers style on.
    pub fn label(&self) -> &'static str {
        match self {
            MetricStatus::Success => "success",
            MetricStatus::Warning => "warning",
            MetricStatus::Danger => "danger",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(AlarmSeverity::Info.label(), "info");
        assert_eq!(AlarmSeverity::Danger.label(), "danger");
        assert_eq!(MetricStatus::Success.label(), "success");
        assert_eq!(MetricStatus::Warning.label(), "warning");
    }

    #[test]
    fn test_severities_are_ordered() {
        assert!(AlarmSeverity::Info < AlarmSeverity::Warning);
        assert!(AlarmSeverity::Warning < AlarmSeverity::Danger);
        assert!(MetricStatus::Success < MetricStatus::Danger);
    }
}
