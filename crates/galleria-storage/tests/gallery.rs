//! Gallery reconstruction over seeded namespaces.

mod common;

use std::{sync::Arc, time::Duration};

use common::*;
use galleria_core::{error::GalleriaError, metadata::MetadataRecord};
use galleria_storage::{GalleryReconstructor, MemoryObjectStore, ObjectStore};
use pretty_assertions::assert_eq;
use serde_json::json;

fn reconstructor(store: Arc<dyn galleria_core::storage::ObjectStore>) -> GalleryReconstructor {
    GalleryReconstructor::new(artifact_store(store))
}

#[tokio::test]
async fn orphan_artifact_sorts_after_described_one() {
    let store = Arc::new(MemoryObjectStore::new());
    put_artifact(store.as_ref(), "users/u2/200.webp").await;
    put_sidecar(
        store.as_ref(),
        "users/u2/metadata/200.json",
        json!({ "prompt": "x", "model": "m", "parameters": {}, "timestamp": 200 }),
    )
    .await;
    put_artifact(store.as_ref(), "users/u2/100.jpg").await;

    let entries = reconstructor(store).reconstruct(&owner("u2")).await.unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].url, "mem://users/u2/200.webp");
    assert_eq!(entries[0].metadata.prompt, "x");
    assert_eq!(entries[0].timestamp, 200);
    assert_eq!(entries[1].url, "mem://users/u2/100.jpg");
    assert_eq!(entries[1].metadata, MetadataRecord::fallback(100));
}

#[tokio::test]
async fn missing_sidecar_falls_back_to_numeric_stem() {
    let store = Arc::new(MemoryObjectStore::new());
    put_artifact(store.as_ref(), "users/u/100.jpg").await;

    let entries = reconstructor(store).reconstruct(&owner("u")).await.unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].metadata.prompt, "No prompt available");
    assert_eq!(entries[0].metadata.model, "Unknown model");
    assert!(entries[0].metadata.parameters.is_empty());
    assert_eq!(entries[0].timestamp, 100);
}

#[tokio::test]
async fn one_broken_item_does_not_affect_the_rest() {
    let store = Arc::new(MemoryObjectStore::new());
    for id in [300, 200, 100] {
        put_artifact(store.as_ref(), &format!("users/u1/{id}.webp")).await;
    }
    put_sidecar(
        store.as_ref(),
        "users/u1/metadata/300.json",
        json!({ "prompt": "newest", "model": "m", "timestamp": 300 }),
    )
    .await;
    put_raw_sidecar(store.as_ref(), "users/u1/metadata/200.json", "{not json").await;
    put_sidecar(
        store.as_ref(),
        "users/u1/metadata/100.json",
        json!({ "prompt": "oldest", "model": "m", "timestamp": 100 }),
    )
    .await;

    let entries = reconstructor(store).reconstruct(&owner("u1")).await.unwrap();

    let prompts: Vec<_> = entries.iter().map(|e| e.metadata.prompt.as_str()).collect();
    assert_eq!(prompts, vec!["newest", "No prompt available", "oldest"]);
}

#[tokio::test]
async fn sidecar_without_json_attribute_falls_back() {
    let store = Arc::new(MemoryObjectStore::new());
    put_artifact(store.as_ref(), "users/u1/5.webp").await;
    store
        .put(
            "users/u1/metadata/5.json",
            galleria_core::storage::PutObject::empty().with_custom("other", "{}"),
        )
        .await
        .unwrap();

    let entries = reconstructor(store).reconstruct(&owner("u1")).await.unwrap();
    assert!(entries[0].metadata.is_fallback());
}

#[tokio::test]
async fn unreadable_sidecar_falls_back() {
    let mut flaky = FlakyStore::default();
    flaky.fail_head.insert("users/u1/metadata/7.json".to_owned());
    put_artifact(&flaky.inner, "users/u1/7.jpg").await;
    put_sidecar(&flaky.inner, "users/u1/metadata/7.json", json!({ "prompt": "p", "model": "m", "timestamp": 7 })).await;

    let entries = reconstructor(Arc::new(flaky)).reconstruct(&owner("u1")).await.unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].metadata, MetadataRecord::fallback(7));
}

#[tokio::test]
async fn partial_sidecar_keeps_its_fields() {
    let store = Arc::new(MemoryObjectStore::new());
    put_artifact(store.as_ref(), "users/u/200.webp").await;
    put_sidecar(
        store.as_ref(),
        "users/u/metadata/200.json",
        json!({ "prompt": "x", "timestamp": 200, "seed": 42 }),
    )
    .await;
    put_artifact(store.as_ref(), "users/u/300.webp").await;
    put_sidecar(store.as_ref(), "users/u/metadata/300.json", json!({ "model": "m" })).await;

    let entries = reconstructor(store).reconstruct(&owner("u")).await.unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].timestamp, 300);
    assert_eq!(entries[0].metadata.prompt, "No prompt available");
    assert_eq!(entries[0].metadata.model, "m");
    assert_eq!(entries[1].metadata.prompt, "x");
    assert_eq!(entries[1].metadata.model, "Unknown model");
    assert_eq!(entries[1].timestamp, 200);
    assert_eq!(entries[1].metadata.extra["seed"], 42);
}

#[tokio::test]
async fn stalled_sidecar_read_falls_back() {
    let mut flaky = FlakyStore::default();
    flaky.stall_head.insert("users/u1/metadata/8.json".to_owned());
    put_artifact(&flaky.inner, "users/u1/8.jpg").await;
    put_sidecar(&flaky.inner, "users/u1/metadata/8.json", json!({ "prompt": "p", "model": "m", "timestamp": 8 })).await;
    put_artifact(&flaky.inner, "users/u1/9.jpg").await;
    put_sidecar(&flaky.inner, "users/u1/metadata/9.json", json!({ "prompt": "q", "model": "m", "timestamp": 9 })).await;

    let gallery = GalleryReconstructor::new(
        artifact_store(Arc::new(flaky)).with_operation_timeout(Duration::from_millis(50)),
    );
    let entries = tokio::time::timeout(Duration::from_secs(2), gallery.reconstruct(&owner("u1")))
        .await
        .expect("reconstruction must not wait for the stalled read")
        .unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].metadata.prompt, "q");
    assert_eq!(entries[1].metadata, MetadataRecord::fallback(8));
}

#[tokio::test]
async fn artifact_without_url_is_dropped() {
    let mut flaky = FlakyStore::default();
    flaky.fail_url.insert("users/u1/2.webp".to_owned());
    put_artifact(&flaky.inner, "users/u1/1.webp").await;
    put_artifact(&flaky.inner, "users/u1/2.webp").await;

    let entries = reconstructor(Arc::new(flaky)).reconstruct(&owner("u1")).await.unwrap();

    let urls: Vec<_> = entries.iter().map(|e| e.url.as_str()).collect();
    assert_eq!(urls, vec!["mem://users/u1/1.webp"]);
}

#[tokio::test]
async fn listing_failure_is_fatal() {
    let flaky = FlakyStore {
        fail_list: true,
        ..FlakyStore::default()
    };

    let err = reconstructor(Arc::new(flaky)).reconstruct(&owner("u1")).await.unwrap_err();

    let GalleriaError::GalleryList { owner, .. } = err else {
        panic!("expected GalleryList, got {err:?}");
    };
    assert_eq!(owner, "u1");
}

#[tokio::test]
async fn empty_namespace_is_an_empty_gallery() {
    let store = Arc::new(MemoryObjectStore::new());
    assert!(reconstructor(store).reconstruct(&owner("nobody")).await.unwrap().is_empty());
}

#[tokio::test]
async fn includes_images_group_and_skips_other_objects() {
    let store = Arc::new(MemoryObjectStore::new());
    put_artifact(store.as_ref(), "users/u1/10.webp").await;
    put_artifact(store.as_ref(), "users/u1/images/20.jpg").await;
    put_artifact(store.as_ref(), "users/u1/thumbs/30.jpg").await;
    put_artifact(store.as_ref(), "users/u1/notes.txt").await;
    put_sidecar(store.as_ref(), "users/u1/metadata/10.json", json!({ "prompt": "a", "model": "m", "timestamp": 10 })).await;

    let entries = reconstructor(store).reconstruct(&owner("u1")).await.unwrap();

    let urls: Vec<_> = entries.iter().map(|e| e.url.as_str()).collect();
    assert_eq!(urls, vec!["mem://users/u1/images/20.jpg", "mem://users/u1/10.webp"]);
}

#[tokio::test]
async fn reconstruction_is_idempotent_and_sorted() {
    let store = Arc::new(MemoryObjectStore::new());
    for id in [5, 50, 500, 42, 7] {
        put_artifact(store.as_ref(), &format!("users/u1/{id}.jpg")).await;
    }
    let gallery = reconstructor(store);

    let first = gallery.reconstruct(&owner("u1")).await.unwrap();
    let second = gallery.reconstruct(&owner("u1")).await.unwrap();

    assert_eq!(first, second);
    assert!(first.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    assert_eq!(first.len(), 5);
}

#[tokio::test]
async fn equal_timestamps_keep_listing_order() {
    let store = Arc::new(MemoryObjectStore::new());
    for name in ["a", "b", "c"] {
        put_artifact(store.as_ref(), &format!("users/u1/{name}.webp")).await;
        put_sidecar(
            store.as_ref(),
            &format!("users/u1/metadata/{name}.json"),
            json!({ "prompt": name, "model": "m", "timestamp": 1 }),
        )
        .await;
    }

    let entries = reconstructor(store).reconstruct(&owner("u1")).await.unwrap();

    let prompts: Vec<_> = entries.iter().map(|e| e.metadata.prompt.as_str()).collect();
    assert_eq!(prompts, vec!["a", "b", "c"]);
}
