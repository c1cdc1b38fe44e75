//! Storage side of Galleria.
//!
//! * [`ArtifactStore`] writes an artifact and its sidecar record under a
//!   fresh, unique, time-ordered id, and enumerates what an owner has.
//! * [`GalleryReconstructor`] turns an owner's namespace back into gallery
//!   entries, tolerating missing or broken sidecars.
//! * [`Studio`] runs a generation and saves the result on a best-effort
//!   basis.
//!
//! Two [`ObjectStore`] backends ship with the crate: [`MemoryObjectStore`]
//! and [`FsObjectStore`]. The store trait and its types are re-exported so
//! custom backends only need this crate.
use std::time::Duration;

pub use galleria_core::storage::{
    Listing, ObjectMeta, ObjectRef, ObjectStore, PutObject, StoreError, StoreFuture, StoreResult,
};

pub mod artifact_store;
pub mod fetch;
pub mod fs;
pub mod gallery;
pub mod layout;
pub mod memory;
pub mod studio;

mod id_clock;

pub use artifact_store::{ArtifactSource, ArtifactStore, PersistedArtifact, StoredArtifact};
pub use fetch::{ContentFetcher, HttpFetcher};
pub use fs::FsObjectStore;
pub use gallery::GalleryReconstructor;
pub use id_clock::IdClock;
pub use memory::MemoryObjectStore;
pub use studio::{DetachedOutcome, Studio, StudioOutcome};

pub(crate) async fn with_timeout<T>(limit: Duration, fut: StoreFuture<'_, T>) -> StoreResult<T> {
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| StoreError::Timeout(limit))?
}
