use serde::{Deserialize, Serialize};

use crate::{CompassDirection, ConditionIcon};

/// Current weather for one location. Every field has a default, so a
/// partially populated response still yields a valid snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature_celsius: f64,
    pub wind_speed_mps: f64,
    pub wind_direction: CompassDirection,
    pub condition_icon: ConditionIcon,
    pub city_name: String,
}

impl WeatherSnapshot {
    /// Snapshot with every field at its default.
    pub fn empty() -> Self {
        Self::default()
    }
}
