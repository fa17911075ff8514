use serde::{Deserialize, Serialize};

/// Icon shown for an upstream weather-condition code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConditionIcon {
    Tstorm1,
    Tstorm2,
    LightRain,
    Shower1,
    Snow1,
    Snow2,
    Fog,
    Sunny,
    Cloudy,
    Overcast,
    #[default]
    Unknown,
}

impl ConditionIcon {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionIcon::Tstorm1 => "tstorm1",
            ConditionIcon::Tstorm2 => "tstorm2",
            ConditionIcon::LightRain => "lightRain",
            ConditionIcon::Shower1 => "shower1",
            ConditionIcon::Snow1 => "snow1",
            ConditionIcon::Snow2 => "snow2",
            ConditionIcon::Fog => "fog",
            ConditionIcon::Sunny => "sunny",
            ConditionIcon::Cloudy => "cloudy",
            ConditionIcon::Overcast => "overcast",
            ConditionIcon::Unknown => "unknown",
        }
    }

    pub const fn all() -> &'static [ConditionIcon] {
        &[
            ConditionIcon::Tstorm1,
            ConditionIcon::Tstorm2,
            ConditionIcon::LightRain,
            ConditionIcon::Shower1,
            ConditionIcon::Snow1,
            ConditionIcon::Snow2,
            ConditionIcon::Fog,
            ConditionIcon::Sunny,
            ConditionIcon::Cloudy,
            ConditionIcon::Overcast,
            ConditionIcon::Unknown,
        ]
    }
}

impl std::fmt::Display for ConditionIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map an OpenWeather condition code to its icon. First matching range wins;
/// codes outside every range map to [`ConditionIcon::Unknown`].
pub fn classify_condition(code: i64) -> ConditionIcon {
    match code {
        200..=232 => ConditionIcon::Tstorm1,
        300..=321 => ConditionIcon::LightRain,
        500..=531 => ConditionIcon::Shower1,
        600..=622 => ConditionIcon::Snow1,
        701..=771 => ConditionIcon::Fog,
        781 => ConditionIcon::Tstorm2,
        800 => ConditionIcon::Sunny,
        801..=802 => ConditionIcon::Cloudy,
        803..=804 => ConditionIcon::Overcast,
        900..=902 | 905..=1000 => ConditionIcon::Tstorm2,
        903 => ConditionIcon::Snow2,
        904 => ConditionIcon::Sunny,
        _ => ConditionIcon::Unknown,
    }
}
