use std::{env, sync::Arc, time::Duration};

use galleria_core::error::{GalleriaError, Result};

use crate::client::{DEFAULT_MAX_WAIT, DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT, ReplicateClient};

/// Thin wrapper that wires the HTTP client [`ReplicateClient`] into a value
/// that implements [`galleria_core::provider::GenerationProvider`].
///
/// Think of it as the **service locator** for the Replicate back-end:
///
/// * stores the API token and base URL,
/// * owns a shareable, connection-pooled `reqwest::Client`,
/// * provides a fluent [`ReplicateAdapterBuilder`] so callers don’t have to
///   juggle `Option<String>` manually.
pub struct ReplicateAdapter {
    pub(crate) client: Arc<ReplicateClient>,
}

impl ReplicateAdapter {
    pub fn client(&self) -> &ReplicateClient {
        &self.client
    }
}

/// Builder for [`ReplicateAdapter`].
///
/// # Typical usage
///
/// ```rust,no_run
/// use galleria_replicate::ReplicateAdapterBuilder;
///
/// let backend = ReplicateAdapterBuilder::new_from_env()
///     .build()
///     .expect("REPLICATE_API_TOKEN must be set");
/// ```
#[derive(Default)]
pub struct ReplicateAdapterBuilder {
    pub(crate) api_token: Option<String>,
    pub(crate) base_url: Option<String>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) poll_interval: Option<Duration>,
    pub(crate) max_wait: Option<Duration>,
}

impl ReplicateAdapterBuilder {
    /// Create an *empty* builder. Remember to supply an API token manually.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor that reads
    ///
    /// * `REPLICATE_API_TOKEN`
    /// * `REPLICATE_BASE_URL` (optional)
    /// * `REPLICATE_TIMEOUT_SECS` (optional, per HTTP request)
    /// * `REPLICATE_MAX_WAIT_SECS` (optional, whole prediction)
    ///
    /// Never panics. A missing token only surfaces during [`Self::build`].
    pub fn new_from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`Self::new_from_env`] but reading from an arbitrary lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let secs = |name: &str| {
            lookup(name)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
        };

        Self {
            api_token: lookup("REPLICATE_API_TOKEN").filter(|t| !t.trim().is_empty()),
            base_url: lookup("REPLICATE_BASE_URL"),
            timeout: secs("REPLICATE_TIMEOUT_SECS"),
            poll_interval: None,
            max_wait: secs("REPLICATE_MAX_WAIT_SECS"),
        }
    }

    pub fn with_api_token(mut self, api_token: impl Into<String>) -> Self {
        self.api_token = Some(api_token.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Timeout applied to every single HTTP request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = Some(poll_interval);
        self
    }

    /// Upper bound for a whole prediction, polling included.
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    /// Finalise the builder and return a ready-to-use adapter.
    ///
    /// # Errors
    ///
    /// * [`GalleriaError::Backend`] – if the API token is missing or the
    ///   HTTP client cannot be constructed.
    pub fn build(self) -> Result<ReplicateAdapter> {
        let api_token = self.api_token.ok_or_else(|| {
            GalleriaError::Backend("missing env variable: `REPLICATE_API_TOKEN`".into())
        })?;

        let client = ReplicateClient::new(
            &api_token,
            self.base_url,
            self.timeout.unwrap_or(DEFAULT_TIMEOUT),
        )
        .map_err(|e| GalleriaError::Backend(Box::new(e)))?
        .with_poll_interval(self.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL))
        .with_max_wait(self.max_wait.unwrap_or(DEFAULT_MAX_WAIT));

        Ok(ReplicateAdapter {
            client: Arc::new(client),
        })
    }
}
