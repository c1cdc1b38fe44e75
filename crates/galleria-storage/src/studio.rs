//! Generation plus best-effort saving, the flow behind the generate
//! endpoint.
use std::sync::Arc;

use galleria_core::{
    GenerationClient, GenerationRequest,
    artifact::{ArtifactReference, OwnerId},
    error::Result,
    metadata::{GalleryEntry, MetadataDraft},
    profile::ProfileRegistry,
    provider::GenerationProvider,
};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::{
    artifact_store::{ArtifactSource, ArtifactStore, PersistedArtifact},
    gallery::GalleryReconstructor,
};

/// Result of [`Studio::generate`].
#[derive(Debug, Clone, PartialEq)]
pub struct StudioOutcome {
    pub reference: ArtifactReference,
    /// `None` when no owner was given or saving failed.
    pub saved: Option<PersistedArtifact>,
}

/// Result of [`Studio::generate_detached`].
#[derive(Debug)]
pub struct DetachedOutcome {
    pub reference: ArtifactReference,
    /// The save running in the background; `None` when no owner was given.
    /// Resolves to `None` if saving failed.
    pub save: Option<JoinHandle<Option<PersistedArtifact>>>,
}

/// Ties a provider, the profile registry and storage together.
pub struct Studio<B> {
    client: GenerationClient<B>,
    registry: Arc<ProfileRegistry>,
    artifacts: ArtifactStore,
    gallery: GalleryReconstructor,
}

impl<B> Clone for Studio<B> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            registry: Arc::clone(&self.registry),
            artifacts: self.artifacts.clone(),
            gallery: self.gallery.clone(),
        }
    }
}

impl<B> Studio<B>
where
    B: GenerationProvider,
{
    pub fn new(client: GenerationClient<B>, registry: ProfileRegistry, artifacts: ArtifactStore) -> Self {
        Self {
            client,
            registry: Arc::new(registry),
            gallery: GalleryReconstructor::new(artifacts.clone()),
            artifacts,
        }
    }

    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    pub fn client(&self) -> &GenerationClient<B> {
        &self.client
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    /// Run `request` and, if an owner is given, save the result in their
    /// namespace.
    ///
    /// Saving is best effort: the generated reference is returned even if
    /// persistence fails, with `saved` left empty and the failure logged.
    pub async fn generate(
        &self,
        owner: Option<&OwnerId>,
        request: GenerationRequest,
    ) -> Result<StudioOutcome> {
        let reference = self.client.execute(request).await?;
        info!(model = %reference.canonical_model_id, url = %reference.locator.as_str(), "image generated");

        let saved = match owner {
            Some(owner) => save_reference(&self.artifacts, owner, &reference).await,
            None => None,
        };

        Ok(StudioOutcome { reference, saved })
    }

    /// Like [`Studio::generate`], but returns as soon as the reference is
    /// known and saves on a spawned task.
    ///
    /// Must be called within a Tokio runtime.
    pub async fn generate_detached(
        &self,
        owner: Option<&OwnerId>,
        request: GenerationRequest,
    ) -> Result<DetachedOutcome> {
        let reference = self.client.execute(request).await?;
        info!(model = %reference.canonical_model_id, url = %reference.locator.as_str(), "image generated");

        let save = owner.map(|owner| {
            let artifacts = self.artifacts.clone();
            let owner = owner.clone();
            let reference = reference.clone();
            tokio::spawn(async move { save_reference(&artifacts, &owner, &reference).await })
        });

        Ok(DetachedOutcome { reference, save })
    }

    /// The owner's gallery, newest first.
    pub async fn gallery(&self, owner: &OwnerId) -> Result<Vec<GalleryEntry>> {
        self.gallery.reconstruct(owner).await
    }
}

async fn save_reference(
    artifacts: &ArtifactStore,
    owner: &OwnerId,
    reference: &ArtifactReference,
) -> Option<PersistedArtifact> {
    let attempt = async {
        let draft = MetadataDraft::from_reference(reference)?;
        artifacts
            .persist(owner, ArtifactSource::url(reference.locator.as_str()), draft)
            .await
    };

    match attempt.await {
        Ok(saved) => Some(saved),
        Err(err) => {
            error!(%owner, error = %err, "failed to save generated image");
            None
        }
    }
}
