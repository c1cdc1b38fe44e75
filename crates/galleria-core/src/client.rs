//! Generic, lightweight client that turns a prompt plus a provider profile
//! into a single call against one concrete [`GenerationProvider`].
//!
//! The client is **generic over the backend type `B`**, so no dynamic
//! dispatch leaks into user code and tests can plug in a recording backend.
//!
//! ```rust
//! use std::{future::Future, pin::Pin};
//!
//! use galleria_core::{
//!     GenerationClient,
//!     artifact::ArtifactLocator,
//!     error::Result,
//!     profile::ProfileRegistry,
//!     provider::{GenerateParameters, GenerationProvider},
//! };
//!
//! struct Echo;
//!
//! impl GenerationProvider for Echo {
//!     fn generate<'p>(
//!         &'p self,
//!         params: GenerateParameters,
//!     ) -> Pin<Box<dyn Future<Output = Result<ArtifactLocator>> + Send + 'p>> {
//!         Box::pin(async move { Ok(ArtifactLocator::new(format!("echo://{}", params.model))) })
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<()> {
//! let registry = ProfileRegistry::builtin();
//! let client = GenerationClient::new(Echo);
//! let reference = client
//!     .generate("A futuristic cityscape", registry.resolve("ideogram")?)
//!     .await?;
//! assert_eq!(reference.locator.as_str(), "echo://ideogram-ai/ideogram-v2");
//! # Ok(())
//! # }
//! ```
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::{
    artifact::ArtifactReference,
    error::{GalleriaError, Result},
    parameters::ProfileParameters,
    profile::ProviderProfile,
    provider::{GenerateParameters, GenerationProvider},
};

/// A fully specified generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub canonical_model_id: String,
    pub parameters: ProfileParameters,
}

impl GenerationRequest {
    /// Request using the profile's default parameters.
    pub fn new(prompt: impl Into<String>, profile: &ProviderProfile) -> Self {
        Self {
            prompt: prompt.into(),
            canonical_model_id: profile.canonical_model_id.to_owned(),
            parameters: profile.default_parameters.clone(),
        }
    }

    /// Lay caller-supplied overrides over the current parameters.
    pub fn with_overrides(mut self, overrides: &Map<String, Value>) -> Result<Self> {
        self.parameters = self.parameters.overlay(overrides)?;
        Ok(self)
    }

    /// Provider input: the parameter record flattened, with `prompt` set last
    /// so it always wins.
    pub fn payload(&self) -> Result<Map<String, Value>> {
        let mut payload = self.parameters.to_map()?;
        payload.insert("prompt".into(), Value::String(self.prompt.clone()));
        Ok(payload)
    }

    fn validate(&self) -> Result<()> {
        if self.prompt.trim().is_empty() {
            return Err(GalleriaError::missing_prompt());
        }
        if self.canonical_model_id.trim().is_empty() {
            return Err(GalleriaError::missing_model());
        }
        Ok(())
    }
}

/// Orchestrates generation calls against a single provider.
///
/// Clone the client if you need to share it across tasks; the backend sits
/// behind an `Arc`, so that is cheap.
#[derive(Debug)]
pub struct GenerationClient<B> {
    backend: Arc<B>,
}

impl<B> Clone for GenerationClient<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B> GenerationClient<B>
where
    B: GenerationProvider,
{
    /// Create a new client that delegates all calls to `backend`.
    pub fn new(backend: B) -> Self {
        Self::from_arc(Arc::new(backend))
    }

    pub fn from_arc(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Access the underlying backend (e.g. to tweak provider-specific settings).
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Generate with the profile's defaults.
    pub async fn generate(
        &self,
        prompt: &str,
        profile: &ProviderProfile,
    ) -> Result<ArtifactReference> {
        self.execute(GenerationRequest::new(prompt, profile)).await
    }

    /// Validate `request`, then issue exactly one provider call.
    ///
    /// # Errors
    ///
    /// * [`GalleriaError::Validation`] – empty prompt or model id; no call
    ///   is made.
    /// * [`GalleriaError::Provider`] – forwarded unchanged from the backend.
    pub async fn execute(&self, request: GenerationRequest) -> Result<ArtifactReference> {
        request.validate()?;

        let params = GenerateParameters::new(request.canonical_model_id.clone(), request.payload()?);
        let locator = self.backend.generate(params).await?;

        Ok(ArtifactReference {
            locator,
            prompt: request.prompt,
            canonical_model_id: request.canonical_model_id,
            parameters: request.parameters,
        })
    }
}
