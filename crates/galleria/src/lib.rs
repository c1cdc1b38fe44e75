//! # `galleria` – The umbrella crate
//!
//! One dependency line for the whole workspace:
//!
//! | Crate                      | What it provides                                                         |
//! |----------------------------|--------------------------------------------------------------------------|
//! | **`galleria-core`**        | Profiles, parameter records, the generation client, metadata, store trait |
//! | **`galleria-storage`**     | Artifact persistence, gallery reconstruction, memory + filesystem stores  |
//! | **`galleria-replicate`**   | `GenerationProvider` for the Replicate prediction API *(optional)*        |
//!
//! `galleria::storage` is `galleria-storage`; it re-exports the object-store
//! trait, so it covers everything `galleria-core` keeps under that name.
//!
//! The `replicate` feature is on by default. Turn it off to stay
//! provider-agnostic and bring your own [`provider::GenerationProvider`].
//!
//! ## Quick example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use galleria::{
//!     GenerationClient, GenerationRequest,
//!     artifact::OwnerId,
//!     profile::ProfileRegistry,
//!     replicate::ReplicateAdapterBuilder,
//!     storage::{ArtifactStore, FsObjectStore, HttpFetcher, Studio},
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = ReplicateAdapterBuilder::new_from_env().build()?;
//!     let artifacts = ArtifactStore::new(
//!         Arc::new(FsObjectStore::new("./galleria-data")),
//!         Arc::new(HttpFetcher::new(std::time::Duration::from_secs(30))?),
//!     );
//!     let studio = Studio::new(GenerationClient::new(backend), ProfileRegistry::builtin(), artifacts);
//!
//!     let owner = OwnerId::parse("me")?;
//!     let profile = studio.registry().resolve("flux-pro")?;
//!     let outcome = studio
//!         .generate(Some(&owner), GenerationRequest::new("A lighthouse at dawn", profile))
//!         .await?;
//!     println!("{}", outcome.reference.locator.as_str());
//!
//!     for entry in studio.gallery(&owner).await? {
//!         println!("{} {}", entry.timestamp, entry.metadata.prompt);
//!     }
//!     Ok(())
//! }
//! ```
#![doc(html_root_url = "https://docs.rs/galleria/latest")]

pub use galleria_core::*;
pub use galleria_storage as storage;

#[cfg(feature = "replicate")]
pub use galleria_replicate as replicate;
