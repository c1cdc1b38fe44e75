//! Hierarchical object store abstraction.
//!
//! The model follows what cloud buckets expose: objects addressed by a
//! `/`-separated path, each carrying opaque bytes plus a small map of custom
//! string attributes. Listing a prefix returns the objects directly below it
//! and the names of the nested "folders", one level deep.
//!
//! Methods return a boxed future so the trait stays object-safe without
//! pulling in `async_trait`; backends are shared as `Arc<dyn ObjectStore>`.
use std::{collections::BTreeMap, time::Duration};

use bytes::Bytes;
use futures_core::future::BoxFuture;

/// Boxed future returned by every [`ObjectStore`] method.
pub type StoreFuture<'a, T> = BoxFuture<'a, StoreResult<T>>;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("object `{0}` not found")]
    NotFound(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("object store backend error: {0}")]
    Backend(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Payload and attributes of an object to be written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PutObject {
    pub bytes: Bytes,
    pub content_type: Option<String>,
    pub custom_metadata: BTreeMap<String, String>,
}

impl PutObject {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            ..Self::default()
        }
    }

    /// An object with no content, used when all information lives in the
    /// custom attributes.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_custom(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_metadata.insert(key.into(), value.into());
        self
    }
}

/// Attributes of a stored object, as returned by [`ObjectStore::head`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectMeta {
    pub full_path: String,
    pub size: u64,
    pub content_type: Option<String>,
    pub custom_metadata: BTreeMap<String, String>,
}

/// A listed object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    /// Path from the store root, e.g. `users/u1/100.jpg`.
    pub full_path: String,
    /// Last path segment, e.g. `100.jpg`.
    pub name: String,
}

impl ObjectRef {
    pub fn new(full_path: impl Into<String>) -> Self {
        let full_path = full_path.into();
        let name = full_path
            .rsplit('/')
            .next()
            .unwrap_or(full_path.as_str())
            .to_owned();
        Self { full_path, name }
    }
}

/// One level of a prefix: the objects directly under it and the nested
/// prefixes (full paths, without trailing slash).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub items: Vec<ObjectRef>,
    pub prefixes: Vec<String>,
}

/// A **backend** that stores objects in a hierarchical namespace.
///
/// Implementations must be safe to call from many tasks at once; none of the
/// callers in this workspace hold a lock across an `.await` on the store.
pub trait ObjectStore: Send + Sync {
    /// Create or replace the object at `path`.
    fn put<'a>(&'a self, path: &'a str, object: PutObject) -> StoreFuture<'a, ()>;

    /// List one level below `prefix`. An unknown prefix yields an empty
    /// listing, not an error.
    fn list<'a>(&'a self, prefix: &'a str) -> StoreFuture<'a, Listing>;

    /// Attributes of the object at `path`.
    ///
    /// Fails with [`StoreError::NotFound`] when the object does not exist.
    fn head<'a>(&'a self, path: &'a str) -> StoreFuture<'a, ObjectMeta>;

    /// Fetchable URL for the object at `path`.
    fn download_url<'a>(&'a self, path: &'a str) -> StoreFuture<'a, String>;

    /// Remove the object at `path`.
    fn delete<'a>(&'a self, path: &'a str) -> StoreFuture<'a, ()>;
}
