use crate::request::QueryParams;

/// Where to look up the weather.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    /// City name, optionally narrowed by an ISO 3166 country code.
    City { name: String, country_code: Option<String> },
    /// Device or user supplied coordinates in decimal degrees.
    Coordinates { lat: f64, lon: f64 },
}

impl LocationQuery {
    pub fn city(name: impl Into<String>, country_code: Option<&str>) -> Self {
        LocationQuery::City {
            name: name.into(),
            country_code: country_code.map(str::to_string),
        }
    }

    pub fn coordinates(lat: f64, lon: f64) -> Self {
        LocationQuery::Coordinates { lat, lon }
    }

    /// Query parameters for the request builder. The composition is not validated.
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        match self {
            LocationQuery::City { name, country_code } => {
                let q = match country_code.as_deref().map(str::trim) {
                    Some(code) if !code.is_empty() => format!("{}, {}", name.trim(), code),
                    _ => name.trim().to_string(),
                };
                params.insert("q".to_string(), q);
            }
            LocationQuery::Coordinates { lat, lon } => {
                params.insert("lat".to_string(), lat.to_string());
                params.insert("lon".to_string(), lon.to_string());
            }
        }
        params
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationQuery::City { name, country_code: Some(code) } => write!(f, "{name}, {code}"),
            LocationQuery::City { name, country_code: None } => f.write_str(name),
            LocationQuery::Coordinates { lat, lon } => write!(f, "{lat}, {lon}"),
        }
    }
}
