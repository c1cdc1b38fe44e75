use std::{future::Future, pin::Pin};

use serde_json::{Map, Value};

use crate::{artifact::ArtifactLocator, error::Result};

/// A **backend** turns a model id plus an input mapping into a network call
/// to a concrete generation service (Replicate, fal.ai, …) and returns a
/// locator for the produced content.
///
/// The trait is intentionally minimal:
///
/// * **One method** – `generate`, which performs a *single* round-trip (the
///   backend may poll internally until the result is ready).
/// * **No retries** – upstream failures surface as
///   [`crate::error::GalleriaError::Provider`] with the provider's own
///   message and detail. Retry policy belongs to the caller.
///
/// The method returns a [`Pin<Box<dyn Future>>`] so we stay object-safe
/// without pulling in `async_trait`.
pub trait GenerationProvider: Send + Sync {
    fn generate<'p>(
        &'p self,
        params: GenerateParameters,
    ) -> Pin<Box<dyn Future<Output = Result<ArtifactLocator>> + Send + 'p>>;
}

/// Input for a single generation call: the provider-specific model id and
/// the flattened parameter mapping (prompt included).
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateParameters {
    pub model: String,
    pub input: Map<String, Value>,
}

impl GenerateParameters {
    pub fn new(model: impl Into<String>, input: Map<String, Value>) -> Self {
        Self {
            model: model.into(),
            input,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn input(&self) -> &Map<String, Value> {
        &self.input
    }

    pub fn prompt(&self) -> Option<&str> {
        self.input.get("prompt").and_then(Value::as_str)
    }
}
