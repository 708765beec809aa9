//! Acceptable ranges for zone metrics.

use crate::MetricStatus;

/// A closed range `[min, max]`.
///
/// `min <= max` is expected but not enforced; inverted bounds are kept as
/// given and classify according to the same comparisons.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    /// Lower bound used when none is configured.
    pub const DEFAULT_MIN: f64 = 0.0;
    /// Upper bound used when none is configured.
    pub const DEFAULT_MAX: f64 = 100.0;

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Bounds from optional ends, each defaulting independently.
    pub fn from_parts(min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            min: min.unwrap_or(Self::DEFAULT_MIN),
            max: max.unwrap_or(Self::DEFAULT_MAX),
        }
    }

    /// Grade `value`, with separate severities for each side of the range.
    ///
    /// The lower breach is tested first, so with inverted bounds a value that
    /// breaches both sides reports `below`.
    pub fn grade(&self, value: f64, below: MetricStatus, above: MetricStatus) -> MetricStatus {
        if value < self.min {
            below
        } else if value > self.max {
            above
        } else {
            MetricStatus::Success
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN, Self::DEFAULT_MAX)
    }
}
