use thiserror::Error;

/// The endpoint and parameters could not be turned into a valid URL.
#[derive(Debug, Error)]
#[error("invalid weather request for endpoint '{endpoint}': {reason}")]
pub struct InvalidRequestError {
    pub endpoint: String,
    pub reason: String,
}

impl InvalidRequestError {
    pub fn new(endpoint: impl Into<String>, reason: impl ToString) -> Self {
        Self { endpoint: endpoint.into(), reason: reason.to_string() }
    }
}

/// The response body was not a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unparsable response")]
pub struct ParseError {
    /// Underlying decoder message, kept for logging only.
    pub detail: Option<String>,
}

impl ParseError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self { detail: Some(detail.into()) }
    }
}

/// What an [`HttpTransport`](crate::transport::HttpTransport) reports when no response arrived.
#[derive(Debug, Error)]
#[error("transport failure: {message}")]
pub struct TransportError {
    pub message: String,
    #[source]
    pub source: Option<reqwest::Error>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), source: None }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self { message: err.to_string(), source: Some(err) }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Request(#[from] InvalidRequestError),

    /// Transport failure or non-success HTTP status.
    #[error("connection error{}: {message}", status_suffix(.status))]
    Connection { status: Option<u16>, message: String },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("fetch cancelled")]
    Cancelled,
}

impl FetchError {
    pub fn is_connection(&self) -> bool {
        matches!(self, FetchError::Connection { .. })
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}

impl From<TransportError> for FetchError {
    fn from(err: TransportError) -> Self {
        FetchError::Connection { status: None, message: err.message }
    }
}
