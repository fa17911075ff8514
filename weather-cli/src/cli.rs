use anyhow::{Context, anyhow};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use weather_here_core::{
    CancellationToken, Config, CountryCatalog, LocationQuery, ReqwestTransport, WeatherClient,
};

use crate::display;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-here", version, about = "Current weather for a city or coordinates")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and default country.
    Configure {
        /// OpenWeather API key; prompted for when omitted.
        #[arg(long)]
        api_key: Option<String>,

        /// Default country code or name, e.g. "GB" or "Norway".
        #[arg(long)]
        country: Option<String>,
    },

    /// Show current weather.
    Show(ShowArgs),

    /// List known country codes.
    Countries {
        /// JSON file of `{"Code", "Name"}` entries instead of the built-in list.
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// City name.
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    pub city: Option<String>,

    /// Country code or name; defaults to the configured country.
    #[arg(long, requires = "city")]
    pub country: Option<String>,

    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Print the snapshot as JSON.
    #[arg(long)]
    pub json: bool,
}

impl ShowArgs {
    fn location(&self, config: &Config, catalog: &CountryCatalog) -> Option<LocationQuery> {
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            return Some(LocationQuery::coordinates(lat, lon));
        }

        let city = self.city.as_deref()?;
        let country = match self.country.as_deref() {
            Some(given) => catalog
                .resolve(given)
                .map(str::to_string)
                .unwrap_or_else(|| given.trim().to_uppercase()),
            None => config.default_country().to_string(),
        };
        Some(LocationQuery::city(city, Some(&country)))
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { api_key, country } => configure(api_key, country),
            Command::Show(args) => show(args).await,
            Command::Countries { catalog } => {
                let catalog = match catalog {
                    Some(path) => CountryCatalog::load(&path)?,
                    None => CountryCatalog::default(),
                };
                for country in catalog.countries() {
                    println!("{}  {}", country.code, country.name);
                }
                Ok(())
            }
        }
    }
}

fn configure(api_key: Option<String>, country: Option<String>) -> anyhow::Result<()> {
    let path = Config::config_file_path()?;
    configure_at(&path, api_key, country, prompt_api_key)?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

fn prompt_api_key() -> anyhow::Result<String> {
    inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")
}

/// Update the config at `path`. `prompt` is only asked for a key when none
/// was passed and none is stored yet.
fn configure_at(
    path: &Path,
    api_key: Option<String>,
    country: Option<String>,
    prompt: impl FnOnce() -> anyhow::Result<String>,
) -> anyhow::Result<Config> {
    let mut config = Config::load_from(path)?;

    let api_key = match api_key {
        Some(key) => Some(key),
        None if config.api_key.as_deref().is_none_or(str::is_empty) => Some(prompt()?),
        None => None,
    };
    if let Some(api_key) = api_key {
        if api_key.trim().is_empty() {
            return Err(anyhow!("API key must not be empty"));
        }
        config.set_api_key(api_key);
    }

    if let Some(country) = country {
        let catalog = CountryCatalog::default();
        let code = catalog.resolve(&country).unwrap_or(country.as_str()).to_string();
        config.set_default_country(&code);
    }

    config.save_to(path)?;
    Ok(config)
}

async fn show(args: ShowArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let catalog = CountryCatalog::default();

    let location = args
        .location(&config, &catalog)
        .ok_or_else(|| anyhow!("{}: pass --city or --lat/--lon", display::LOCATION_UNAVAILABLE))?;
    tracing::debug!(%location, "resolved location");

    let transport = ReqwestTransport::with_timeout(config.request_timeout())?;
    let client = WeatherClient::with_transport(config.client_config()?, transport);

    let token = CancellationToken::new();
    let on_interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let snapshot = client
        .fetch_weather_cancellable(&location.to_params(), &token)
        .await
        .map_err(|err| {
            let message = display::error_message(&err);
            anyhow::Error::new(err).context(message)
        })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("{}", display::render_snapshot(&snapshot));
    }

    Ok(())
}
