use weather_here_core::{FetchError, WeatherSnapshot};

/// Value with at most one fraction digit, dropping a trailing `.0`.
pub fn format_measurement(value: f64, unit: &str) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    // avoid printing "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };

    if rounded.fract() == 0.0 {
        format!("{rounded:.0} {unit}")
    } else {
        format!("{rounded:.1} {unit}")
    }
}

pub fn render_snapshot(snapshot: &WeatherSnapshot) -> String {
    let mut lines = Vec::with_capacity(3);
    lines.push(snapshot.city_name.clone());
    lines.push(format!(
        "{}  [{}]",
        format_measurement(snapshot.temperature_celsius, "°C"),
        snapshot.condition_icon
    ));

    let wind = format_measurement(snapshot.wind_speed_mps, "m/s");
    if snapshot.wind_direction.is_known() {
        lines.push(format!("Wind {wind} {}", snapshot.wind_direction));
    } else {
        lines.push(format!("Wind {wind}"));
    }

    lines.join("\n")
}

/// Short message shown in place of the city name when a fetch fails.
pub fn error_message(err: &FetchError) -> &'static str {
    match err {
        FetchError::Connection { .. } => "Connection error",
        FetchError::Parse(_) => "Weather unavailable",
        FetchError::Request(_) => "Invalid request",
        FetchError::Cancelled => "Cancelled",
    }
}

pub const LOCATION_UNAVAILABLE: &str = "Location unavailable";
