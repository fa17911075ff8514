use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{country::DEFAULT_COUNTRY_CODE, request::ClientConfig};

/// Request timeout used when the config does not set one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Environment variable that takes precedence over the stored API key.
pub const API_KEY_ENV: &str = "WEATHER_HERE_API_KEY";

/// Settings stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_country = "GB"
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    pub api_key: Option<String>,

    /// ISO country code appended to city searches when none is given.
    pub default_country: Option<String>,

    /// Override for the current-weather endpoint.
    pub endpoint: Option<String>,

    /// Seconds before an unanswered request is abandoned.
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-here", "weather-here")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key.trim().to_string());
    }

    pub fn set_default_country(&mut self, code: &str) {
        self.default_country = Some(code.trim().to_uppercase());
    }

    pub fn default_country(&self) -> &str {
        self.default_country.as_deref().unwrap_or(DEFAULT_COUNTRY_CODE)
    }

    pub fn request_timeout(&self) -> Duration {
        let secs = self.timeout_secs.filter(|secs| *secs > 0).unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    /// API key from the environment, falling back to the stored one.
    pub fn effective_api_key(&self) -> Option<String> {
        self.api_key_with_override(std::env::var(API_KEY_ENV).ok().as_deref())
    }

    fn api_key_with_override(&self, env_value: Option<&str>) -> Option<String> {
        env_value
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .or_else(|| self.api_key.clone().filter(|key| !key.is_empty()))
    }

    /// Settings for [`WeatherClient`](crate::WeatherClient); fails when no API key is available.
    pub fn client_config(&self) -> Result<ClientConfig> {
        self.client_config_with(self.effective_api_key())
    }

    fn client_config_with(&self, api_key: Option<String>) -> Result<ClientConfig> {
        let api_key = api_key.ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `weather-here configure` or set {API_KEY_ENV}."
            )
        })?;

        let config = ClientConfig::new(api_key);
        Ok(match &self.endpoint {
            Some(endpoint) => config.with_endpoint(endpoint.clone()),
            None => config,
        })
    }
}
