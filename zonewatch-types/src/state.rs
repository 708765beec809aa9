//! Point-in-time climate states.

use chrono::{DateTime, Utc};

/// A named climate reading or setpoint.
///
/// Each quantity is `None` when the controller does not provide it.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct State {
    pub name: Option<String>,
    pub humidity: Option<f64>,
    pub temperature: Option<f64>,
    pub wind: Option<f64>,
    pub visible_light: Option<f64>,
    pub uv_light: Option<f64>,
}

impl State {
    /// Create an empty state with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn humidity(mut self, value: f64) -> Self {
        self.humidity = Some(value);
        self
    }

    pub fn temperature(mut self, value: f64) -> Self {
        self.temperature = Some(value);
        self
    }

    pub fn wind(mut self, value: f64) -> Self {
        self.wind = Some(value);
        self
    }

    pub fn visible_light(mut self, value: f64) -> Self {
        self.visible_light = Some(value);
        self
    }

    pub fn uv_light(mut self, value: f64) -> Self {
        self.uv_light = Some(value);
        self
    }
}

/// The next scheduled state and the time it starts.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Forecast {
    pub state: State,
    pub at: DateTime<Utc>,
}

impl Forecast {
    pub fn new(state: State, at: DateTime<Utc>) -> Self {
        Self { state, at }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_only_given_fields() {
        let s = State::named("day").temperature(26.0).humidity(70.0);
        assert_eq!(s.name.as_deref(), Some("day"));
        assert_eq!(s.temperature, Some(26.0));
        assert_eq!(s.humidity, Some(70.0));
        assert!(s.wind.is_none());
        assert!(s.visible_light.is_none());
        assert!(s.uv_light.is_none());
    }
}
