//! Turns a current-weather JSON body into a [`WeatherSnapshot`].
//!
//! Only a body that is not a JSON object is an error. Every field below the
//! top level is decoded on its own; absent or mistyped values fall back to a
//! default instead of failing the whole response.

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

use crate::{WeatherSnapshot, classify_condition, classify_direction, error::ParseError};

#[derive(Debug, Default, Deserialize)]
struct OwPayload {
    #[serde(default, deserialize_with = "lenient")]
    main: Option<OwMain>,
    #[serde(default, deserialize_with = "lenient")]
    wind: Option<OwWind>,
    #[serde(default, deserialize_with = "lenient")]
    weather: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient")]
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OwMain {
    #[serde(default, deserialize_with = "lenient")]
    temp: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct OwWind {
    #[serde(default, deserialize_with = "lenient")]
    speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    #[serde(default, deserialize_with = "integral")]
    id: Option<i64>,
}

/// Decode `T` if the value has the right shape, otherwise `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Whole number, also when written as a float such as `800.0`.
fn integral<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    }))
}

/// Apply a response body on top of `previous`.
///
/// Field rules:
/// - `main.temp` replaces the temperature only when present.
/// - a `wind` object resets speed to 0.0 and bearing to 0° unless it carries them.
/// - `weather[0].id` replaces the icon only when present.
/// - `name` replaces the city only when present.
pub fn extract_snapshot(
    raw: &[u8],
    previous: &WeatherSnapshot,
) -> Result<WeatherSnapshot, ParseError> {
    let value: Value = serde_json::from_slice(raw).map_err(|e| ParseError::new(e.to_string()))?;
    if !value.is_object() {
        return Err(ParseError::new("top-level value is not an object"));
    }

    let payload: OwPayload =
        serde_json::from_value(value).map_err(|e| ParseError::new(e.to_string()))?;

    let mut snapshot = previous.clone();

    if let Some(temp) = payload.main.and_then(|main| main.temp) {
        snapshot.temperature_celsius = temp;
    }

    if let Some(wind) = payload.wind {
        snapshot.wind_speed_mps = wind.speed.unwrap_or(0.0);
        snapshot.wind_direction = classify_direction(wind.deg.unwrap_or(0.0));
    }

    let condition = payload
        .weather
        .as_deref()
        .and_then(<[Value]>::first)
        .and_then(|entry| serde_json::from_value::<OwWeather>(entry.clone()).ok())
        .and_then(|entry| entry.id);
    if let Some(code) = condition {
        snapshot.condition_icon = classify_condition(code);
    }

    if let Some(name) = payload.name {
        snapshot.city_name = name;
    }

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompassDirection, ConditionIcon};

    const LONDON: &str = r#"{"main":{"temp":18.3},"wind":{"speed":4.1,"deg":200},"weather":[{"id":800}],"name":"London"}"#;

    fn extract(raw: &str) -> Result<WeatherSnapshot, ParseError> {
        extract_snapshot(raw.as_bytes(), &WeatherSnapshot::empty())
    }

    #[test]
    fn extracts_full_payload() {
        let snapshot = extract(LONDON).unwrap();

        assert_eq!(
            snapshot,
            WeatherSnapshot {
                temperature_celsius: 18.3,
                wind_speed_mps: 4.1,
                wind_direction: CompassDirection::SSW,
                condition_icon: ConditionIcon::Sunny,
                city_name: "London".into(),
            }
        );
    }

    #[test]
    fn full_payload_is_idempotent() {
        let once = extract(LONDON).unwrap();
        let twice = extract_snapshot(LONDON.as_bytes(), &once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_object_yields_defaults() {
        assert_eq!(extract("{}").unwrap(), WeatherSnapshot::empty());
    }

    #[test]
    fn non_json_is_parse_error() {
        let err = extract("<html>502 Bad Gateway</html>").unwrap_err();
        assert_eq!(err.to_string(), "unparsable response");
        assert!(extract_snapshot(b"", &WeatherSnapshot::empty()).is_err());
    }

    #[test]
    fn non_object_json_is_parse_error() {
        assert!(extract("[1, 2, 3]").is_err());
        assert!(extract("\"London\"").is_err());
        assert!(extract("null").is_err());
    }

    #[test]
    fn wind_object_without_fields_resets_to_north_and_calm() {
        let previous = extract(LONDON).unwrap();
        let snapshot = extract_snapshot(br#"{"wind":{}}"#, &previous).unwrap();

        assert_eq!(snapshot.wind_speed_mps, 0.0);
        assert_eq!(snapshot.wind_direction, CompassDirection::N);
        assert_eq!(snapshot.temperature_celsius, 18.3);
        assert_eq!(snapshot.city_name, "London");
    }

    #[test]
    fn missing_sections_keep_previous_values() {
        let previous = extract(LONDON).unwrap();
        let snapshot = extract_snapshot(br#"{"name":"Paris"}"#, &previous).unwrap();

        assert_eq!(snapshot.city_name, "Paris");
        assert_eq!(snapshot.temperature_celsius, 18.3);
        assert_eq!(snapshot.wind_direction, CompassDirection::SSW);
        assert_eq!(snapshot.condition_icon, ConditionIcon::Sunny);
    }

    #[test]
    fn mistyped_fields_are_ignored() {
        let snapshot = extract(
            r#"{"main":{"temp":"warm"},"wind":{"speed":null,"deg":"SW"},"weather":[{"id":"800"}],"name":42}"#,
        )
        .unwrap();

        assert_eq!(snapshot.temperature_celsius, 0.0);
        assert_eq!(snapshot.wind_speed_mps, 0.0);
        assert_eq!(snapshot.wind_direction, CompassDirection::N);
        assert_eq!(snapshot.condition_icon, ConditionIcon::Unknown);
        assert_eq!(snapshot.city_name, "");
    }

    #[test]
    fn mistyped_sections_are_ignored() {
        let snapshot =
            extract(r#"{"main":[],"wind":"calm","weather":{"id":800},"name":"Rome"}"#).unwrap();

        assert_eq!(snapshot.wind_direction, CompassDirection::Unknown);
        assert_eq!(snapshot.condition_icon, ConditionIcon::Unknown);
        assert_eq!(snapshot.city_name, "Rome");
    }

    #[test]
    fn empty_weather_array_leaves_icon_unset() {
        let snapshot = extract(r#"{"weather":[]}"#).unwrap();
        assert_eq!(snapshot.condition_icon, ConditionIcon::Unknown);
    }

    #[test]
    fn integral_float_condition_code_is_accepted() {
        let snapshot = extract(r#"{"weather":[{"id":800.0}]}"#).unwrap();
        assert_eq!(snapshot.condition_icon, ConditionIcon::Sunny);

        let snapshot = extract(r#"{"weather":[{"id":501.0}]}"#).unwrap();
        assert_eq!(snapshot.condition_icon, ConditionIcon::Shower1);
    }

    #[test]
    fn fractional_condition_code_is_ignored() {
        let snapshot = extract(r#"{"weather":[{"id":800.5}]}"#).unwrap();
        assert_eq!(snapshot.condition_icon, ConditionIcon::Unknown);
    }

    #[test]
    fn only_first_weather_entry_counts() {
        let snapshot = extract(r#"{"weather":[{"id":600},{"id":800}]}"#).unwrap();
        assert_eq!(snapshot.condition_icon, ConditionIcon::Snow1);
    }

    #[test]
    fn integer_temperature_is_accepted() {
        let snapshot = extract(r#"{"main":{"temp":-3}}"#).unwrap();
        assert_eq!(snapshot.temperature_celsius, -3.0);
    }

    #[test]
    fn extra_fields_are_ignored() {
        let snapshot = extract(
            r#"{"coord":{"lon":-0.13,"lat":51.51},"main":{"temp":7.5,"humidity":81},"cod":200,"name":"London"}"#,
        )
        .unwrap();
        assert_eq!(snapshot.temperature_celsius, 7.5);
        assert_eq!(snapshot.city_name, "London");
    }
}
