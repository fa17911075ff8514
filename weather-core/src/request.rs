use std::collections::{BTreeMap, HashMap};

use reqwest::{Method, Url};

use crate::error::InvalidRequestError;

/// Current-weather endpoint of the OpenWeather API.
pub const DEFAULT_ENDPOINT: &str = "http://api.openweathermap.org/data/2.5/weather";

const UNITS_PARAM: &str = "units";
const API_KEY_PARAM: &str = "appid";
const METRIC: &str = "metric";

/// Caller-supplied query parameters, e.g. `q` or `lat`/`lon`.
pub type QueryParams = BTreeMap<String, String>;

/// Everything the request builder needs besides the location parameters.
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub endpoint: String,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), endpoint: DEFAULT_ENDPOINT.to_string() }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Fully formed outbound GET request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    method: Method,
    url: Url,
}

impl RequestSpec {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Decoded query parameters.
    pub fn query(&self) -> HashMap<String, String> {
        self.url.query_pairs().into_owned().collect()
    }

    /// URL with the API key masked, for logs.
    pub fn redacted_url(&self) -> String {
        let mut url = self.url.clone();
        let pairs: Vec<(String, String)> = self
            .url
            .query_pairs()
            .into_owned()
            .map(|(k, v)| if k == API_KEY_PARAM { (k, "***".to_string()) } else { (k, v) })
            .collect();
        url.query_pairs_mut().clear().extend_pairs(pairs);
        url.to_string()
    }
}

/// Build the GET request for `params`, appending `units=metric` and the API key.
///
/// Caller-supplied `units` or `appid` entries are replaced by the injected ones.
pub fn build_request(
    params: &QueryParams,
    config: &ClientConfig,
) -> Result<RequestSpec, InvalidRequestError> {
    let endpoint = config.endpoint.as_str();
    let mut url = Url::parse(endpoint).map_err(|e| InvalidRequestError::new(endpoint, e))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(InvalidRequestError::new(
            endpoint,
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(InvalidRequestError::new(endpoint, "endpoint has no host"));
    }

    {
        let mut query = url.query_pairs_mut();
        for (key, value) in params {
            if key == UNITS_PARAM || key == API_KEY_PARAM {
                tracing::debug!(param = %key, "overriding caller-supplied query parameter");
                continue;
            }
            query.append_pair(key, value);
        }
        query.append_pair(UNITS_PARAM, METRIC);
        query.append_pair(API_KEY_PARAM, &config.api_key);
    }

    Ok(RequestSpec { method: Method::GET, url })
}
