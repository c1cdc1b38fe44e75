#![allow(dead_code)]

use std::{collections::HashSet, sync::Arc, time::Duration};

use bytes::Bytes;
use galleria_core::{
    artifact::OwnerId,
    storage::{Listing, ObjectMeta, ObjectStore, PutObject, StoreError, StoreFuture},
};
use galleria_storage::{ArtifactStore, ContentFetcher, MemoryObjectStore};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::Notify;

pub const IMAGE_BYTES: &[u8] = b"\x89PNG-not-really";

pub fn owner(raw: &str) -> OwnerId {
    OwnerId::parse(raw).unwrap()
}

/// Returns [`IMAGE_BYTES`] for any URL, or fails every call.
pub struct StubFetcher {
    fail: bool,
    pub fetched: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self {
            fail: false,
            fetched: Mutex::default(),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            fetched: Mutex::default(),
        })
    }
}

impl ContentFetcher for StubFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> StoreFuture<'a, Bytes> {
        Box::pin(async move {
            self.fetched.lock().push(url.to_owned());
            if self.fail {
                return Err(StoreError::Backend("upstream went away".into()));
            }
            Ok(Bytes::from_static(IMAGE_BYTES))
        })
    }
}

/// Holds every fetch until [`GatedFetcher::open`] is called.
pub struct GatedFetcher {
    gate: Notify,
}

impl GatedFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self { gate: Notify::new() })
    }

    pub fn open(&self) {
        self.gate.notify_one();
    }
}

impl ContentFetcher for GatedFetcher {
    fn fetch<'a>(&'a self, _url: &'a str) -> StoreFuture<'a, Bytes> {
        Box::pin(async move {
            self.gate.notified().await;
            Ok(Bytes::from_static(IMAGE_BYTES))
        })
    }
}

/// Longer than any operation timeout the tests configure.
pub const STALL: Duration = Duration::from_secs(10);

/// Memory store with injectable failures and a log of writes.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryObjectStore,
    pub puts: Mutex<Vec<String>>,
    pub fail_list: bool,
    pub fail_put_suffix: Option<&'static str>,
    pub fail_url: HashSet<String>,
    pub fail_head: HashSet<String>,
    pub stall_put_suffix: Option<&'static str>,
    pub stall_head: HashSet<String>,
}

impl ObjectStore for FlakyStore {
    fn put<'a>(&'a self, path: &'a str, object: PutObject) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            if self.stall_put_suffix.is_some_and(|s| path.ends_with(s)) {
                tokio::time::sleep(STALL).await;
            }
            if self.fail_put_suffix.is_some_and(|s| path.ends_with(s)) {
                return Err(StoreError::Backend("quota exceeded".into()));
            }
            self.puts.lock().push(path.to_owned());
            self.inner.put(path, object).await
        })
    }

    fn list<'a>(&'a self, prefix: &'a str) -> StoreFuture<'a, Listing> {
        Box::pin(async move {
            if self.fail_list {
                return Err(StoreError::Backend("permission denied".into()));
            }
            self.inner.list(prefix).await
        })
    }

    fn head<'a>(&'a self, path: &'a str) -> StoreFuture<'a, ObjectMeta> {
        Box::pin(async move {
            if self.stall_head.contains(path) {
                tokio::time::sleep(STALL).await;
            }
            if self.fail_head.contains(path) {
                return Err(StoreError::Backend("connection reset".into()));
            }
            self.inner.head(path).await
        })
    }

    fn download_url<'a>(&'a self, path: &'a str) -> StoreFuture<'a, String> {
        Box::pin(async move {
            if self.fail_url.contains(path) {
                return Err(StoreError::Backend("signing failed".into()));
            }
            self.inner.download_url(path).await
        })
    }

    fn delete<'a>(&'a self, path: &'a str) -> StoreFuture<'a, ()> {
        self.inner.delete(path)
    }
}

pub fn artifact_store(store: Arc<dyn ObjectStore>) -> ArtifactStore {
    ArtifactStore::new(store, StubFetcher::ok())
}

pub async fn put_artifact(store: &dyn ObjectStore, path: &str) {
    store.put(path, PutObject::new(IMAGE_BYTES)).await.unwrap();
}

pub async fn put_sidecar(store: &dyn ObjectStore, path: &str, record: Value) {
    put_raw_sidecar(store, path, &record.to_string()).await;
}

pub async fn put_raw_sidecar(store: &dyn ObjectStore, path: &str, raw: &str) {
    store
        .put(path, PutObject::empty().with_custom("json", raw))
        .await
        .unwrap();
}
