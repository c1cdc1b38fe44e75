use std::time::Duration;

use galleria_core::error::{GalleriaError, ProviderError};
use reqwest::StatusCode;
use serde_json::Value;

use crate::api_v1::PredictionStatus;

/// High-level error type covering every failure mode the client can hit.
#[derive(Debug, thiserror::Error)]
pub enum ReplicateError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("couldn’t (de)serialise body: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Replicate returned non-success status {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("prediction {id} ended as {status:?}")]
    PredictionFailed {
        id: String,
        status: PredictionStatus,
        error: Option<Value>,
    },

    #[error("prediction {id} did not finish within {waited:?}")]
    Timeout { id: String, waited: Duration },

    /// The create call itself was still open when `max_wait` ran out.
    #[error("prediction request did not finish within {waited:?}")]
    CreateTimeout { waited: Duration },

    #[error("`{0}` is not a Replicate model id (expected `owner/name[:version]`)")]
    InvalidModel(String),

    #[error("Replicate format error: {0}")]
    Format(String),
}

impl ReplicateError {
    /// Structured payload worth forwarding to the caller.
    fn detail(&self) -> Option<Value> {
        match self {
            ReplicateError::Api { status, body } => Some(
                serde_json::from_str(body)
                    .unwrap_or_else(|_| serde_json::json!({ "status": status.as_u16(), "body": body })),
            ),
            ReplicateError::PredictionFailed { error, .. } => error.clone(),
            _ => None,
        }
    }
}

impl From<ReplicateError> for GalleriaError {
    fn from(value: ReplicateError) -> Self {
        let mut error = ProviderError::new(value.to_string());
        if let Some(detail) = value.detail() {
            error = error.with_detail(detail);
        }
        GalleriaError::Provider(error)
    }
}
