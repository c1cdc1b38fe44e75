//! Generate-then-save flow.

mod common;

use std::{future::Future, pin::Pin, sync::Arc};

use common::*;
use galleria_core::{
    GenerationClient, GenerationRequest,
    artifact::ArtifactLocator,
    error::{GalleriaError, ProviderError, Result},
    profile::ProfileRegistry,
    provider::{GenerateParameters, GenerationProvider},
};
use galleria_storage::{ArtifactStore, MemoryObjectStore, Studio};

struct Fixed(std::result::Result<&'static str, ProviderError>);

impl GenerationProvider for Fixed {
    fn generate<'p>(
        &'p self,
        _params: GenerateParameters,
    ) -> Pin<Box<dyn Future<Output = Result<ArtifactLocator>> + Send + 'p>> {
        Box::pin(async move {
            match &self.0 {
                Ok(url) => Ok(ArtifactLocator::new(*url)),
                Err(e) => Err(e.clone().into()),
            }
        })
    }
}

fn studio(provider: Fixed, artifacts: ArtifactStore) -> Studio<Fixed> {
    Studio::new(GenerationClient::new(provider), ProfileRegistry::builtin(), artifacts)
}

fn request(studio: &Studio<Fixed>) -> GenerationRequest {
    GenerationRequest::new("A red fox in the snow", studio.registry().resolve("ideogram").unwrap())
}

#[tokio::test]
async fn saves_into_the_owners_gallery() {
    let store = Arc::new(MemoryObjectStore::new());
    let studio = studio(Fixed(Ok("https://replicate.delivery/fox.jpg")), artifact_store(store));
    let owner = owner("u1");

    let outcome = studio.generate(Some(&owner), request(&studio)).await.unwrap();

    let saved = outcome.saved.expect("saved");
    let gallery = studio.gallery(&owner).await.unwrap();
    assert_eq!(gallery.len(), 1);
    assert_eq!(gallery[0].timestamp, saved.id.as_millis());
    assert_eq!(gallery[0].metadata.model, "ideogram-ai/ideogram-v2");
    assert_eq!(outcome.reference.locator.as_str(), "https://replicate.delivery/fox.jpg");
}

#[tokio::test]
async fn anonymous_generation_is_not_saved() {
    let store = Arc::new(MemoryObjectStore::new());
    let studio = studio(Fixed(Ok("https://replicate.delivery/fox.jpg")), artifact_store(store.clone()));

    let outcome = studio.generate(None, request(&studio)).await.unwrap();

    assert!(outcome.saved.is_none());
    assert!(store.is_empty());
}

#[tokio::test]
async fn storage_failure_still_returns_the_image() {
    let store = Arc::new(MemoryObjectStore::new());
    let artifacts = ArtifactStore::new(store, StubFetcher::failing());
    let studio = studio(Fixed(Ok("https://replicate.delivery/fox.webp")), artifacts);

    let outcome = studio.generate(Some(&owner("u1")), request(&studio)).await.unwrap();

    assert!(outcome.saved.is_none());
    assert_eq!(outcome.reference.locator.as_str(), "https://replicate.delivery/fox.webp");
}

#[tokio::test]
async fn provider_failure_saves_nothing() {
    let store = Arc::new(MemoryObjectStore::new());
    let studio = studio(
        Fixed(Err(ProviderError::new("Invalid version or not permitted"))),
        artifact_store(store.clone()),
    );

    let err = studio.generate(Some(&owner("u1")), request(&studio)).await.unwrap_err();

    assert!(matches!(err, GalleriaError::Provider(_)));
    assert!(store.is_empty());
}

#[tokio::test]
async fn detached_generation_returns_before_the_save_lands() {
    let store = Arc::new(MemoryObjectStore::new());
    let fetcher = GatedFetcher::new();
    let studio = studio(
        Fixed(Ok("https://replicate.delivery/fox.jpg")),
        ArtifactStore::new(store, fetcher.clone()),
    );
    let owner = owner("u1");

    let outcome = studio.generate_detached(Some(&owner), request(&studio)).await.unwrap();

    assert_eq!(outcome.reference.locator.as_str(), "https://replicate.delivery/fox.jpg");
    assert!(studio.gallery(&owner).await.unwrap().is_empty());

    fetcher.open();
    let saved = outcome.save.expect("owner given").await.unwrap().expect("saved");

    let gallery = studio.gallery(&owner).await.unwrap();
    assert_eq!(gallery.len(), 1);
    assert_eq!(gallery[0].timestamp, saved.id.as_millis());
}

#[tokio::test]
async fn detached_generation_without_owner_spawns_nothing() {
    let store = Arc::new(MemoryObjectStore::new());
    let studio = studio(Fixed(Ok("https://replicate.delivery/fox.jpg")), artifact_store(store.clone()));

    let outcome = studio.generate_detached(None, request(&studio)).await.unwrap();

    assert!(outcome.save.is_none());
    assert!(store.is_empty());
}
