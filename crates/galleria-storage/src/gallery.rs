//! Rebuilding an owner's gallery from what is in the object store.
//!
//! Reconstruction is read-only. Each artifact is resolved independently:
//! if its download URL cannot be produced the artifact is left out, and if
//! its sidecar is missing or unparseable a fallback record takes its place.
//! A sidecar lacking only some fields keeps the ones it has. One
//! bad artifact never fails the whole gallery; only a failure to enumerate
//! the namespace does.
use futures_util::future::join_all;
use galleria_core::{
    artifact::{OwnerId, now_millis},
    error::{GalleriaError, Result},
    metadata::{GalleryEntry, MetadataRecord},
};
use tracing::{debug, warn};

use crate::{
    artifact_store::{ArtifactStore, StoredArtifact},
    layout, with_timeout,
};

#[derive(Debug, Clone)]
pub struct GalleryReconstructor {
    artifacts: ArtifactStore,
}

impl GalleryReconstructor {
    pub fn new(artifacts: ArtifactStore) -> Self {
        Self { artifacts }
    }

    /// All resolvable artifacts of `owner`, newest first.
    ///
    /// Artifacts are resolved concurrently. Entries with equal timestamps
    /// keep the order in which the store listed them.
    ///
    /// # Errors
    ///
    /// [`GalleriaError::GalleryList`] when the namespace cannot be listed.
    pub async fn reconstruct(&self, owner: &OwnerId) -> Result<Vec<GalleryEntry>> {
        let listed = self.artifacts.list(owner).await?;
        debug!(%owner, count = listed.len(), "reconstructing gallery");

        let resolved = join_all(listed.iter().map(|artifact| self.entry_for(owner, artifact))).await;

        let mut entries: Vec<GalleryEntry> = resolved
            .into_iter()
            .zip(&listed)
            .filter_map(|(outcome, artifact)| match outcome {
                Ok(entry) => Some(entry),
                Err(error) => {
                    warn!(%owner, path = %artifact.full_path, %error, "skipping artifact");
                    None
                }
            })
            .collect();

        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(entries)
    }

    async fn entry_for(&self, owner: &OwnerId, artifact: &StoredArtifact) -> Result<GalleryEntry> {
        let store = self.artifacts.object_store();
        let timeout = self.artifacts.operation_timeout();

        let url = with_timeout(timeout, store.download_url(&artifact.full_path))
            .await
            .map_err(|source| GalleriaError::StorageRead {
                path: artifact.full_path.clone(),
                source,
            })?;

        let metadata = match self.read_sidecar(owner, &artifact.stem).await {
            Ok(record) => record,
            Err(error @ GalleriaError::MetadataMissing { .. }) => {
                debug!(%owner, %error, "using fallback metadata");
                MetadataRecord::fallback(fallback_timestamp(&artifact.stem))
            }
            Err(error) => {
                warn!(%owner, %error, "unreadable metadata, using fallback");
                MetadataRecord::fallback(fallback_timestamp(&artifact.stem))
            }
        };

        Ok(GalleryEntry::new(url, metadata))
    }

    async fn read_sidecar(&self, owner: &OwnerId, stem: &str) -> Result<MetadataRecord> {
        let path = layout::metadata_path(owner, stem);
        let store = self.artifacts.object_store();

        let meta = with_timeout(self.artifacts.operation_timeout(), store.head(&path))
            .await
            .map_err(|source| {
                if source.is_not_found() {
                    GalleriaError::MetadataMissing { path: path.clone() }
                } else {
                    GalleriaError::StorageRead {
                        path: path.clone(),
                        source,
                    }
                }
            })?;

        let raw = meta
            .custom_metadata
            .get(layout::METADATA_ATTRIBUTE)
            .ok_or_else(|| GalleriaError::MetadataMissing { path: path.clone() })?;

        Ok(MetadataRecord::from_sidecar(raw, fallback_timestamp(stem))?)
    }
}

/// Numeric stems are the id, and so the generation time. Anything else is
/// dated to now.
fn fallback_timestamp(stem: &str) -> u64 {
    stem.parse().unwrap_or_else(|_| now_millis())
}
