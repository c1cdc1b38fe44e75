//! HTTP boundary of Galleria, built on axum.
//!
//! [`build_app`] wires a generation provider, the configured object store
//! and the built-in profiles into a [`Router`]. Handlers stay generic over
//! the provider so tests can run the full stack against a scripted backend.
use std::sync::Arc;

use axum::Router;
use galleria_core::{
    GenerationClient, profile::ProfileRegistry, provider::GenerationProvider, storage::ObjectStore,
};
use galleria_storage::{ArtifactStore, FsObjectStore, HttpFetcher, MemoryObjectStore, Studio};
use tower_http::{services::ServeDir, trace::TraceLayer};

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

use config::{ServerConfig, StorageBackend};
use state::AppState;

/// Assemble the application for `config` around `provider`.
///
/// With the filesystem backend the storage root is also served under
/// `/files`, which is where the default public base URL points.
pub fn build_app<B>(config: &ServerConfig, provider: B) -> anyhow::Result<Router>
where
    B: GenerationProvider + 'static,
{
    let store: Arc<dyn ObjectStore> = match config.storage {
        StorageBackend::Memory => Arc::new(MemoryObjectStore::new()),
        StorageBackend::Fs => Arc::new(
            FsObjectStore::new(&config.storage_root).with_public_base_url(&config.public_base_url),
        ),
    };
    let fetcher = HttpFetcher::new(config.store_timeout)?;
    let artifacts =
        ArtifactStore::new(store, Arc::new(fetcher)).with_operation_timeout(config.store_timeout);
    let studio = Studio::new(GenerationClient::new(provider), ProfileRegistry::builtin(), artifacts);

    let mut app = routes::router(AppState::new(studio));
    if config.storage == StorageBackend::Fs {
        app = app.nest_service("/files", ServeDir::new(&config.storage_root));
    }
    Ok(app.layer(TraceLayer::new_for_http()))
}
