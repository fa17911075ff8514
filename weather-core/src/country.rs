use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Country used when nothing else is configured.
pub const DEFAULT_COUNTRY_CODE: &str = "GB";

/// One entry of a country catalog file: `{"Code": "GB", "Name": "United Kingdom"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Name")]
    pub name: String,
}

/// Country codes and display names offered when choosing a city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryCatalog {
    countries: Vec<Country>,
}

impl Default for CountryCatalog {
    fn default() -> Self {
        let builtin = [
            ("AU", "Australia"),
            ("BR", "Brazil"),
            ("CA", "Canada"),
            ("CN", "China"),
            ("DE", "Germany"),
            ("ES", "Spain"),
            ("FR", "France"),
            ("GB", "United Kingdom"),
            ("IE", "Ireland"),
            ("IN", "India"),
            ("IT", "Italy"),
            ("JP", "Japan"),
            ("MX", "Mexico"),
            ("NL", "Netherlands"),
            ("NO", "Norway"),
            ("NZ", "New Zealand"),
            ("SE", "Sweden"),
            ("US", "United States"),
            ("ZA", "South Africa"),
        ];
        Self::new(
            builtin
                .iter()
                .map(|(code, name)| Country { code: code.to_string(), name: name.to_string() })
                .collect(),
        )
    }
}

impl CountryCatalog {
    /// Entries are kept sorted by name.
    pub fn new(mut countries: Vec<Country>) -> Self {
        countries.sort_by(|a, b| a.name.cmp(&b.name));
        Self { countries }
    }

    /// Parse a JSON array of `{Code, Name}` objects. Entries missing either
    /// field are skipped; anything that is not an array is an error.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Vec<serde_json::Value> =
            serde_json::from_str(json).context("Country catalog must be a JSON array")?;

        let countries = raw
            .into_iter()
            .filter_map(|entry| serde_json::from_value::<Country>(entry).ok())
            .collect();

        Ok(Self::new(countries))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read country catalog: {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("Failed to parse country catalog: {}", path.display()))
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Code for a display name, case-insensitive.
    pub fn code_for_name(&self, name: &str) -> Option<&str> {
        self.countries
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
            .map(|c| c.code.as_str())
    }

    /// Display name for a code, case-insensitive.
    pub fn name_for_code(&self, code: &str) -> Option<&str> {
        self.countries
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code.trim()))
            .map(|c| c.name.as_str())
    }

    /// Accept either a code or a display name and return the canonical code.
    pub fn resolve(&self, code_or_name: &str) -> Option<&str> {
        let needle = code_or_name.trim();
        self.countries
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(needle))
            .map(|c| c.code.as_str())
            .or_else(|| self.code_for_name(needle))
    }
}
