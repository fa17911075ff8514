use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{
    WeatherSnapshot,
    error::FetchError,
    extract::extract_snapshot,
    request::{ClientConfig, QueryParams, build_request},
    transport::{HttpTransport, ReqwestTransport},
};

/// Progress of the most recent fetch, for driving a loading indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Requesting,
    Succeeded,
    Failed,
}

/// Builds the request, performs it and extracts the snapshot.
///
/// One call models one request. Overlapping calls are not queued or
/// deduplicated, and nothing is retried.
#[derive(Debug)]
pub struct WeatherClient {
    config: ClientConfig,
    transport: Box<dyn HttpTransport>,
    state: watch::Sender<FetchState>,
}

impl WeatherClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, ReqwestTransport::new())
    }

    pub fn with_transport(config: ClientConfig, transport: impl HttpTransport + 'static) -> Self {
        let (state, _) = watch::channel(FetchState::Idle);
        Self { config, transport: Box::new(transport), state }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn state(&self) -> FetchState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state.subscribe()
    }

    /// Fetch current weather for `params` into a fresh snapshot.
    pub async fn fetch_weather(&self, params: &QueryParams) -> Result<WeatherSnapshot, FetchError> {
        self.fetch_weather_onto(params, &WeatherSnapshot::empty()).await
    }

    /// Fetch and apply the response over `previous`; fields missing from the
    /// response keep their previous values.
    pub async fn fetch_weather_onto(
        &self,
        params: &QueryParams,
        previous: &WeatherSnapshot,
    ) -> Result<WeatherSnapshot, FetchError> {
        self.state.send_replace(FetchState::Requesting);
        let result = self.perform(params, previous).await;
        self.finish(&result);
        result
    }

    /// Like [`fetch_weather`](Self::fetch_weather), but resolves to
    /// [`FetchError::Cancelled`] as soon as `token` fires.
    pub async fn fetch_weather_cancellable(
        &self,
        params: &QueryParams,
        token: &CancellationToken,
    ) -> Result<WeatherSnapshot, FetchError> {
        self.state.send_replace(FetchState::Requesting);
        let previous = WeatherSnapshot::empty();

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::debug!("weather fetch cancelled");
                Err(FetchError::Cancelled)
            }
            result = self.perform(params, &previous) => result,
        };

        self.finish(&result);
        result
    }

    async fn perform(
        &self,
        params: &QueryParams,
        previous: &WeatherSnapshot,
    ) -> Result<WeatherSnapshot, FetchError> {
        let request = build_request(params, &self.config)?;
        tracing::debug!(url = %request.redacted_url(), "requesting current weather");

        let response = self.transport.execute(&request).await.map_err(|err| {
            tracing::warn!(error = %err, "weather request failed");
            FetchError::from(err)
        })?;

        if !response.is_success() {
            let body = String::from_utf8_lossy(&response.body);
            let message = truncate_body(&body);
            tracing::warn!(status = response.status, body = %message, "weather request rejected");
            return Err(FetchError::Connection { status: Some(response.status), message });
        }

        let snapshot = extract_snapshot(&response.body, previous).map_err(|err| {
            tracing::warn!(detail = ?err.detail, "error parsing weather response");
            FetchError::Parse(err)
        })?;

        tracing::info!(city = %snapshot.city_name, "weather updated");
        Ok(snapshot)
    }

    fn finish(&self, result: &Result<WeatherSnapshot, FetchError>) {
        let state = if result.is_ok() { FetchState::Succeeded } else { FetchState::Failed };
        self.state.send_replace(state);
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        CompassDirection, ConditionIcon,
        error::TransportError,
        request::RequestSpec,
        transport::HttpResponse,
    };
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    const LONDON: &str = r#"{"main":{"temp":18.3},"wind":{"speed":4.1,"deg":200},"weather":[{"id":800}],"name":"London"}"#;

    #[derive(Debug, Clone)]
    enum Reply {
        Respond(u16, &'static str),
        Fail(&'static str),
        Hang,
    }

    #[derive(Debug, Clone)]
    struct FakeTransport {
        reply: Reply,
        seen: Arc<Mutex<Vec<RequestSpec>>>,
    }

    impl FakeTransport {
        fn new(reply: Reply) -> Self {
            Self { reply, seen: Arc::new(Mutex::new(Vec::new())) }
        }
    }

    #[async_trait]
    impl HttpTransport for FakeTransport {
        async fn execute(&self, request: &RequestSpec) -> Result<HttpResponse, TransportError> {
            self.seen.lock().unwrap().push(request.clone());
            match &self.reply {
                Reply::Respond(status, body) => {
                    Ok(HttpResponse { status: *status, body: body.as_bytes().to_vec() })
                }
                Reply::Fail(message) => Err(TransportError::new(*message)),
                Reply::Hang => std::future::pending().await,
            }
        }
    }

    fn city(name: &str) -> QueryParams {
        [("q".to_string(), name.to_string())].into_iter().collect()
    }

    fn client(reply: Reply) -> (WeatherClient, FakeTransport) {
        let transport = FakeTransport::new(reply);
        let client = WeatherClient::with_transport(ClientConfig::new("KEY123"), transport.clone());
        (client, transport)
    }

    #[tokio::test]
    async fn successful_fetch_returns_snapshot() {
        let (client, transport) = client(Reply::Respond(200, LONDON));

        let snapshot = client.fetch_weather(&city("London, GB")).await.unwrap();

        assert_eq!(snapshot.temperature_celsius, 18.3);
        assert_eq!(snapshot.wind_direction, CompassDirection::SSW);
        assert_eq!(snapshot.condition_icon, ConditionIcon::Sunny);
        assert_eq!(snapshot.city_name, "London");
        assert_eq!(client.state(), FetchState::Succeeded);

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].query()["q"], "London, GB");
        assert_eq!(seen[0].query()["appid"], "KEY123");
        assert_eq!(seen[0].query()["units"], "metric");
    }

    #[tokio::test]
    async fn transport_failure_is_connection_error() {
        let (client, _) = client(Reply::Fail("connection refused"));

        let err = client.fetch_weather(&city("London")).await.unwrap_err();

        assert!(err.is_connection());
        assert_eq!(client.state(), FetchState::Failed);
    }

    #[tokio::test]
    async fn non_success_status_is_connection_error() {
        let (client, _) = client(Reply::Respond(401, r#"{"cod":401,"message":"Invalid API key"}"#));

        let err = client.fetch_weather(&city("London")).await.unwrap_err();

        match err {
            FetchError::Connection { status, message } => {
                assert_eq!(status, Some(401));
                assert!(message.contains("Invalid API key"));
            }
            other => panic!("expected connection error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unparsable_body_is_parse_error() {
        let (client, _) = client(Reply::Respond(200, "<html>oops</html>"));

        let err = client.fetch_weather(&city("London")).await.unwrap_err();

        assert!(matches!(err, FetchError::Parse(_)));
        assert_eq!(client.state(), FetchState::Failed);
    }

    #[tokio::test]
    async fn invalid_endpoint_fails_before_sending() {
        let transport = FakeTransport::new(Reply::Respond(200, LONDON));
        let config = ClientConfig::new("K").with_endpoint("::not-a-url::");
        let client = WeatherClient::with_transport(config, transport.clone());

        let err = client.fetch_weather(&city("London")).await.unwrap_err();

        assert!(matches!(err, FetchError::Request(_)));
        assert!(transport.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn fetch_onto_keeps_fields_missing_from_response() {
        let (client, _) = client(Reply::Respond(200, r#"{"main":{"temp":21.0}}"#));
        let previous = WeatherSnapshot { city_name: "Madrid".into(), ..WeatherSnapshot::empty() };

        let snapshot = client.fetch_weather_onto(&city("Madrid"), &previous).await.unwrap();

        assert_eq!(snapshot.temperature_celsius, 21.0);
        assert_eq!(snapshot.city_name, "Madrid");
    }

    #[tokio::test]
    async fn cancelled_fetch_resolves_to_cancelled() {
        let (client, _) = client(Reply::Hang);
        let token = CancellationToken::new();
        token.cancel();

        let err = client.fetch_weather_cancellable(&city("London"), &token).await.unwrap_err();

        assert!(matches!(err, FetchError::Cancelled));
        assert_eq!(client.state(), FetchState::Failed);
    }

    #[tokio::test]
    async fn uncancelled_fetch_completes() {
        let (client, _) = client(Reply::Respond(200, LONDON));
        let token = CancellationToken::new();

        let snapshot = client.fetch_weather_cancellable(&city("London"), &token).await.unwrap();

        assert_eq!(snapshot.city_name, "London");
    }

    #[tokio::test]
    async fn subscribers_see_state_transitions() {
        let (client, _) = client(Reply::Respond(200, LONDON));
        let mut rx = client.subscribe();
        assert_eq!(*rx.borrow_and_update(), FetchState::Idle);

        client.fetch_weather(&city("London")).await.unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), FetchState::Succeeded);
    }

    #[tokio::test]
    async fn state_is_requesting_while_in_flight() {
        let (client, _) = client(Reply::Hang);
        let mut rx = client.subscribe();
        let token = CancellationToken::new();
        let cancel = token.clone();

        let watcher = async move {
            rx.changed().await.unwrap();
            let seen = *rx.borrow_and_update();
            cancel.cancel();
            seen
        };
        let london = city("London");
        let (result, seen_in_flight) =
            tokio::join!(client.fetch_weather_cancellable(&london, &token), watcher);

        assert_eq!(seen_in_flight, FetchState::Requesting);
        assert!(matches!(result, Err(FetchError::Cancelled)));
        assert_eq!(client.state(), FetchState::Failed);
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
