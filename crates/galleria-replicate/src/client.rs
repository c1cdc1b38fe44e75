use std::time::Duration;

use reqwest::{
    Client as HttpClient,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tokio::time::Instant;

use crate::{
    api_v1::{Prediction, PredictionRequest, PredictionStatus},
    error::ReplicateError,
    model_map::ModelRef,
};

pub(crate) const DEFAULT_BASE_URL: &str = "https://api.replicate.com/v1";
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub(crate) const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
pub(crate) const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(120);

/// Longest hold the API accepts for `Prefer: wait`.
const MAX_PREFER_WAIT_SECS: u64 = 60;
/// Head start the API gets to answer before our own request timeout fires.
const PREFER_WAIT_MARGIN: Duration = Duration::from_secs(5);

/// Seconds the create call may be held open, always below the per-request
/// timeout so a held call answers (with a result or a prediction to poll)
/// instead of being cut off.
pub(crate) fn prefer_wait_secs(request_timeout: Duration) -> u64 {
    request_timeout
        .saturating_sub(PREFER_WAIT_MARGIN)
        .as_secs()
        .clamp(1, MAX_PREFER_WAIT_SECS)
}

/// Minimal HTTP client for Replicate’s prediction endpoints.
///
/// * Creates a prediction with `Prefer: wait` so fast image models usually
///   answer in one round-trip.
/// * Falls back to polling `urls.get` until the prediction reaches a terminal
///   state or `max_wait` elapses.
/// * Shares a single `reqwest::Client`, so cloning `ReplicateClient` is cheap.
#[derive(Clone)]
pub struct ReplicateClient {
    headers: HeaderMap,
    http: HttpClient,
    base: String,
    poll_interval: Duration,
    max_wait: Duration,
    prefer_wait_secs: u64,
}

impl ReplicateClient {
    /// Build a client with its own `reqwest` client (per-request `timeout`,
    /// Rustls TLS).
    pub fn new(
        api_token: &str,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ReplicateError> {
        let http = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self::with_http(api_token, http, base_url)?.with_request_timeout(timeout))
    }

    /// Build with a custom `reqwest::Client` in case the caller needs proxy
    /// settings, custom TLS, etc. The client is assumed to use
    /// [`DEFAULT_TIMEOUT`]; call [`Self::with_request_timeout`] otherwise.
    pub fn with_http(
        api_token: &str,
        http: HttpClient,
        base_url: Option<String>,
    ) -> Result<Self, ReplicateError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let bearer = HeaderValue::from_str(&format!("Bearer {api_token}")).map_err(|_| {
            ReplicateError::Format("API token contains characters not allowed in a header".into())
        })?;
        headers.insert(AUTHORIZATION, bearer);

        Ok(Self {
            headers,
            http,
            base: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned())
                .trim_end_matches('/')
                .to_owned(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_wait: DEFAULT_MAX_WAIT,
            prefer_wait_secs: prefer_wait_secs(DEFAULT_TIMEOUT),
        })
    }

    /// Align the `Prefer: wait` hold with the per-request timeout of the
    /// underlying HTTP client.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.prefer_wait_secs = prefer_wait_secs(timeout);
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    /// Create a prediction and wait for it to reach a terminal state.
    ///
    /// Returns the prediction only if it **succeeded**; failed and canceled
    /// predictions become [`ReplicateError::PredictionFailed`].
    pub async fn run(
        &self,
        model: &ModelRef<'_>,
        input: Map<String, Value>,
    ) -> Result<Prediction, ReplicateError> {
        let started = Instant::now();
        let mut prediction = tokio::time::timeout(self.max_wait, self.create_prediction(model, input))
            .await
            .map_err(|_| ReplicateError::CreateTimeout {
                waited: started.elapsed(),
            })??;

        while !prediction.status.is_terminal() {
            if started.elapsed() >= self.max_wait {
                return Err(ReplicateError::Timeout {
                    id: prediction.id,
                    waited: started.elapsed(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;

            let Some(urls) = prediction.urls.as_ref() else {
                return Err(ReplicateError::Format(format!(
                    "prediction {} is {:?} but has no polling url",
                    prediction.id, prediction.status
                )));
            };
            prediction = self.get_prediction(&urls.get).await?;
        }

        if prediction.status == PredictionStatus::Succeeded {
            return Ok(prediction);
        }

        Err(ReplicateError::PredictionFailed {
            id: prediction.id,
            status: prediction.status,
            error: prediction.error,
        })
    }

    /// `POST` a new prediction for `model`.
    pub async fn create_prediction(
        &self,
        model: &ModelRef<'_>,
        input: Map<String, Value>,
    ) -> Result<Prediction, ReplicateError> {
        let (url, request) = match model.version {
            Some(version) => (
                format!("{}/predictions", self.base),
                PredictionRequest::new(input).with_version(version),
            ),
            None => (
                format!("{}/models/{}/{}/predictions", self.base, model.owner, model.name),
                PredictionRequest::new(input),
            ),
        };

        let mut headers = self.headers.clone();
        headers.insert(
            HeaderName::from_static("prefer"),
            HeaderValue::from_str(&format!("wait={}", self.prefer_wait_secs))
                .map_err(|e| ReplicateError::Format(e.to_string()))?,
        );

        let resp = self
            .http
            .post(url)
            .headers(headers)
            .json(&request)
            .send()
            .await?;

        Self::decode(resp).await
    }

    /// Fetch the current state of a prediction from its `urls.get` link.
    pub async fn get_prediction(&self, url: &str) -> Result<Prediction, ReplicateError> {
        let resp = self
            .http
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await?;

        Self::decode(resp).await
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ReplicateError> {
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ReplicateError::Api { status, body });
        }

        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
