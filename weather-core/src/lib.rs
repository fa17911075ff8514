//! Core library for the `weather-here` client.
//!
//! This crate defines:
//! - Classification of condition codes and wind bearings
//! - Construction of the current-weather request
//! - Tolerant extraction of a [`WeatherSnapshot`] from the response
//! - A fetch orchestrator tying the above to an HTTP transport
//! - Configuration, location queries and the country catalog
//!
//! It is used by `weather-here-cli`, but can also be reused by other front ends.

pub mod condition;
pub mod config;
pub mod country;
pub mod direction;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod location;
pub mod model;
pub mod request;
pub mod transport;

pub use condition::{ConditionIcon, classify_condition};
pub use config::Config;
pub use country::{Country, CountryCatalog, DEFAULT_COUNTRY_CODE};
pub use direction::{CompassDirection, classify_direction};
pub use error::{FetchError, InvalidRequestError, ParseError, TransportError};
pub use extract::extract_snapshot;
pub use fetch::{FetchState, WeatherClient};
pub use location::LocationQuery;
pub use model::WeatherSnapshot;
pub use request::{ClientConfig, DEFAULT_ENDPOINT, QueryParams, RequestSpec, build_request};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};

pub use tokio_util::sync::CancellationToken;
