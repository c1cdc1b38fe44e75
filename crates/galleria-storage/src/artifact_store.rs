//! Persistence of artifacts and their sidecar records in an owner's
//! namespace.
use std::{collections::HashSet, sync::Arc, time::Duration};

use bytes::Bytes;
use galleria_core::{
    artifact::{ArtifactFormat, ArtifactId, OwnerId, now_millis},
    error::{GalleriaError, Result},
    metadata::MetadataDraft,
    storage::{ObjectStore, PutObject, StoreError},
};
use tracing::{debug, info, warn};

use crate::{IdClock, fetch::ContentFetcher, layout, with_timeout};

pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the artifact content comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactSource {
    /// Content already in memory.
    Bytes { bytes: Bytes, format: ArtifactFormat },
    /// Content served at a URL; fetched at persist time. The format is
    /// derived from the URL.
    Url(String),
}

impl ArtifactSource {
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    pub fn bytes(bytes: impl Into<Bytes>, format: ArtifactFormat) -> Self {
        Self::Bytes {
            bytes: bytes.into(),
            format,
        }
    }

    pub fn format(&self) -> ArtifactFormat {
        match self {
            Self::Bytes { format, .. } => *format,
            Self::Url(url) => ArtifactFormat::from_locator(url),
        }
    }
}

/// Paths written by a successful [`ArtifactStore::persist`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedArtifact {
    pub id: ArtifactId,
    pub format: ArtifactFormat,
    pub artifact_path: String,
    pub metadata_path: String,
}

/// An artifact found in an owner's namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    pub full_path: String,
    pub name: String,
    /// Name up to the first `.`, the key of the sidecar.
    pub stem: String,
    pub format: ArtifactFormat,
}

/// Writes and enumerates artifacts in an [`ObjectStore`].
///
/// Every store call is bounded by the operation timeout; a call that
/// exceeds it fails with [`StoreError::Timeout`].
#[derive(Clone)]
pub struct ArtifactStore {
    store: Arc<dyn ObjectStore>,
    fetcher: Arc<dyn ContentFetcher>,
    clock: Arc<IdClock>,
    op_timeout: Duration,
}

impl ArtifactStore {
    pub fn new(store: Arc<dyn ObjectStore>, fetcher: Arc<dyn ContentFetcher>) -> Self {
        Self {
            store,
            fetcher,
            clock: Arc::new(IdClock::new()),
            op_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    /// Share an id clock with other stores writing into the same namespace.
    pub fn with_clock(mut self, clock: Arc<IdClock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_operation_timeout(mut self, op_timeout: Duration) -> Self {
        self.op_timeout = op_timeout;
        self
    }

    pub fn object_store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    pub fn operation_timeout(&self) -> Duration {
        self.op_timeout
    }

    /// Save an artifact and its sidecar under a fresh id.
    ///
    /// The sidecar is written and confirmed first; the artifact is written
    /// only afterwards. A failure between the two leaves an orphaned
    /// sidecar, which [`ArtifactStore::sweep_orphaned_metadata`] cleans up,
    /// but never an artifact without its record.
    ///
    /// # Errors
    ///
    /// [`GalleriaError::StorageWrite`] naming the path that could not be
    /// written, or whose content could not be fetched.
    pub async fn persist(
        &self,
        owner: &OwnerId,
        source: ArtifactSource,
        draft: MetadataDraft,
    ) -> Result<PersistedArtifact> {
        let id = self.clock.next();
        let format = source.format();
        let artifact_path = layout::artifact_path(owner, id, format);
        let metadata_path = layout::metadata_path(owner, &id.to_string());

        let record = serde_json::to_string(&draft.stamp(id))?;
        let sidecar = PutObject::empty()
            .with_content_type("application/json")
            .with_custom(layout::METADATA_ATTRIBUTE, record);
        with_timeout(self.op_timeout, self.store.put(&metadata_path, sidecar))
            .await
            .map_err(|source| GalleriaError::StorageWrite {
                path: metadata_path.clone(),
                source,
            })?;
        debug!(%owner, %id, path = %metadata_path, "metadata written");

        let bytes = match source {
            ArtifactSource::Bytes { bytes, .. } => bytes,
            ArtifactSource::Url(url) => with_timeout(self.op_timeout, self.fetcher.fetch(&url))
                .await
                .map_err(|source| GalleriaError::StorageWrite {
                    path: artifact_path.clone(),
                    source,
                })?,
        };

        let content = PutObject::new(bytes).with_content_type(format.content_type());
        with_timeout(self.op_timeout, self.store.put(&artifact_path, content))
            .await
            .map_err(|source| GalleriaError::StorageWrite {
                path: artifact_path.clone(),
                source,
            })?;
        info!(%owner, %id, path = %artifact_path, "artifact saved");

        Ok(PersistedArtifact {
            id,
            format,
            artifact_path,
            metadata_path,
        })
    }

    /// Every artifact directly under the owner's namespace plus those in the
    /// `images/` group. Objects without a recognised extension are skipped.
    ///
    /// # Errors
    ///
    /// [`GalleriaError::GalleryList`] if the namespace cannot be enumerated.
    pub async fn list(&self, owner: &OwnerId) -> Result<Vec<StoredArtifact>> {
        let list_err = |source: StoreError| GalleriaError::GalleryList {
            owner: owner.to_string(),
            source,
        };

        let prefix = layout::owner_prefix(owner);
        let root = with_timeout(self.op_timeout, self.store.list(&prefix))
            .await
            .map_err(list_err)?;

        let mut objects = root.items;
        for group in root
            .prefixes
            .iter()
            .filter(|p| layout::last_segment(p) == layout::NESTED_GROUP)
        {
            let nested = with_timeout(self.op_timeout, self.store.list(group))
                .await
                .map_err(list_err)?;
            objects.extend(nested.items);
        }

        Ok(objects
            .into_iter()
            .filter_map(|object| {
                let format = ArtifactFormat::from_file_name(&object.name)?;
                Some(StoredArtifact {
                    stem: layout::stem(&object.name).to_owned(),
                    full_path: object.full_path,
                    name: object.name,
                    format,
                })
            })
            .collect())
    }

    /// Stems of sidecars that have no artifact next to them.
    pub async fn orphaned_metadata(&self, owner: &OwnerId) -> Result<Vec<String>> {
        let artifacts: HashSet<String> = self
            .list(owner)
            .await?
            .into_iter()
            .map(|a| a.stem)
            .collect();

        let prefix = layout::metadata_prefix(owner);
        let sidecars = with_timeout(self.op_timeout, self.store.list(&prefix))
            .await
            .map_err(|source| GalleriaError::GalleryList {
                owner: owner.to_string(),
                source,
            })?;

        Ok(sidecars
            .items
            .into_iter()
            .filter_map(|item| item.name.strip_suffix(".json").map(str::to_owned))
            .filter(|stem| !artifacts.contains(stem))
            .collect())
    }

    /// Delete orphaned sidecars older than `grace`.
    ///
    /// A sidecar is only written moments before its artifact, so young
    /// orphans may belong to a write still in flight and are kept. Sidecars
    /// with a non-numeric stem are never touched. Returns the removed stems;
    /// individual delete failures are logged and skipped.
    pub async fn sweep_orphaned_metadata(
        &self,
        owner: &OwnerId,
        grace: Duration,
    ) -> Result<Vec<String>> {
        let cutoff = now_millis().saturating_sub(u64::try_from(grace.as_millis()).unwrap_or(u64::MAX));

        let mut removed = Vec::new();
        for stem in self.orphaned_metadata(owner).await? {
            let Ok(id) = stem.parse::<u64>() else {
                continue;
            };
            if id > cutoff {
                continue;
            }

            let path = layout::metadata_path(owner, &stem);
            match with_timeout(self.op_timeout, self.store.delete(&path)).await {
                Ok(()) => {
                    debug!(%owner, %path, "orphaned metadata removed");
                    removed.push(stem);
                }
                Err(error) => warn!(%owner, %path, %error, "failed to remove orphaned metadata"),
            }
        }
        Ok(removed)
    }
}

impl std::fmt::Debug for ArtifactStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactStore")
            .field("op_timeout", &self.op_timeout)
            .finish_non_exhaustive()
    }
}
