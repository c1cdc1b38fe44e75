//! Unified error type exposed by **`galleria-core`**.
//!
//! Provider and storage crates convert their internal errors into one of
//! these variants before bubbling them up to the orchestrator, the artifact
//! store or the gallery reconstructor. The variants line up with the points
//! in the pipeline where a failure is either surfaced to the caller or
//! swallowed:
//!
//! | Variant            | Where it originates            | Caller sees it? |
//! |--------------------|--------------------------------|-----------------|
//! | `Validation`       | orchestrator, before any call  | yes (400)       |
//! | `UnknownProfile`   | profile registry               | yes (400)       |
//! | `Provider`         | generation backend             | yes (500)       |
//! | `StorageWrite`     | `ArtifactStore::persist`       | logged only     |
//! | `StorageRead`      | per-artifact reconstruction    | logged only     |
//! | `MetadataMissing`  | per-artifact reconstruction    | logged only     |
//! | `GalleryList`      | gallery enumeration            | yes (500)       |
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::storage::StoreError;

/// Convenient alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, GalleriaError>;

#[derive(Debug, Error)]
pub enum GalleriaError {
    /// The requested profile key or model id is not part of the registry.
    #[error("unknown profile `{key}`")]
    UnknownProfile { key: String },

    /// The request is missing a mandatory field. Raised before any network
    /// traffic happens.
    #[error("{0}")]
    Validation(ValidationError),

    /// Caller supplied parameter overrides that do not fit the profile's
    /// parameter record.
    #[error("invalid parameters for `{profile}`: {reason}")]
    InvalidParameters { profile: String, reason: String },

    /// The generation backend failed. Message and detail are forwarded
    /// verbatim from upstream.
    #[error("{0}")]
    Provider(ProviderError),

    /// Owner identifiers become path segments, so anything that could escape
    /// the owner's namespace is rejected.
    #[error("invalid owner id `{0}`")]
    InvalidOwner(String),

    #[error("failed to write `{path}`: {source}")]
    StorageWrite {
        path: String,
        #[source]
        source: StoreError,
    },

    #[error("failed to read `{path}`: {source}")]
    StorageRead {
        path: String,
        #[source]
        source: StoreError,
    },

    /// A sidecar exists but carries no usable record.
    #[error("metadata for `{path}` is missing or unreadable")]
    MetadataMissing { path: String },

    /// The owner's namespace could not be enumerated at all.
    #[error("failed to list gallery for `{owner}`: {source}")]
    GalleryList {
        owner: String,
        #[source]
        source: StoreError,
    },

    /// Failure while serialising or deserialising JSON payloads.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic forwarding of any backend-specific error that doesn’t fit
    /// another category.
    #[error("backend returned an error: {0}")]
    Backend(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl GalleriaError {
    pub fn missing_prompt() -> Self {
        Self::Validation(ValidationError::MissingPrompt)
    }

    pub fn missing_model() -> Self {
        Self::Validation(ValidationError::MissingModel)
    }
}

/// Reasons a generation request is rejected up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingPrompt,
    MissingModel,
    /// Prompt length (in characters) outside the accepted window.
    PromptLength { len: usize, min: usize, max: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingPrompt => write!(f, "Prompt is required"),
            ValidationError::MissingModel => write!(f, "Model is required"),
            ValidationError::PromptLength { len, min, max } => write!(
                f,
                "Prompt must be between {min} and {max} characters (got {len})"
            ),
        }
    }
}

impl From<ValidationError> for GalleriaError {
    fn from(value: ValidationError) -> Self {
        GalleriaError::Validation(value)
    }
}

/// Upstream generation failure.
///
/// `detail` carries whatever structured payload the provider returned (an
/// HTTP error body, a failed prediction's `error` field, …) so it can be
/// handed to the caller for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderError {
    pub message: String,
    pub detail: Option<serde_json::Value>,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = Some(detail);
        self
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<ProviderError> for GalleriaError {
    fn from(value: ProviderError) -> Self {
        GalleriaError::Provider(value)
    }
}
