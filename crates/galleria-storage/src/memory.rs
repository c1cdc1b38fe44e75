use std::collections::{BTreeMap, BTreeSet};

use galleria_core::storage::{
    Listing, ObjectMeta, ObjectRef, ObjectStore, PutObject, StoreError, StoreFuture,
};
use parking_lot::RwLock;

const DEFAULT_URL_SCHEME: &str = "mem://";

/// In-process [`ObjectStore`]. Handy for tests and for running the server
/// without touching disk.
///
/// Download URLs are `{base}{path}` and are not fetchable outside the
/// process; override the base with [`MemoryObjectStore::with_url_base`].
#[derive(Debug)]
pub struct MemoryObjectStore {
    objects: RwLock<BTreeMap<String, PutObject>>,
    url_base: String,
}

impl Default for MemoryObjectStore {
    fn default() -> Self {
        Self {
            objects: RwLock::default(),
            url_base: DEFAULT_URL_SCHEME.to_owned(),
        }
    }
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_url_base(mut self, url_base: impl Into<String>) -> Self {
        self.url_base = url_base.into();
        self
    }

    /// Paths of every stored object, sorted.
    pub fn paths(&self) -> Vec<String> {
        self.objects.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    fn list_now(&self, prefix: &str) -> Listing {
        let prefix = prefix.trim_end_matches('/');
        let dir = format!("{prefix}/");
        let objects = self.objects.read();

        let mut items = Vec::new();
        let mut prefixes = BTreeSet::new();
        for path in objects.keys().filter(|p| p.starts_with(&dir)) {
            let rest = &path[dir.len()..];
            match rest.split_once('/') {
                Some((group, _)) => {
                    prefixes.insert(format!("{dir}{group}"));
                }
                None => items.push(ObjectRef::new(path.clone())),
            }
        }

        Listing {
            items,
            prefixes: prefixes.into_iter().collect(),
        }
    }

    fn head_now(&self, path: &str) -> Result<ObjectMeta, StoreError> {
        let objects = self.objects.read();
        let object = objects
            .get(path)
            .ok_or_else(|| StoreError::NotFound(path.to_owned()))?;
        Ok(ObjectMeta {
            full_path: path.to_owned(),
            size: object.bytes.len() as u64,
            content_type: object.content_type.clone(),
            custom_metadata: object.custom_metadata.clone(),
        })
    }
}

impl ObjectStore for MemoryObjectStore {
    fn put<'a>(&'a self, path: &'a str, object: PutObject) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.objects.write().insert(path.to_owned(), object);
            Ok(())
        })
    }

    fn list<'a>(&'a self, prefix: &'a str) -> StoreFuture<'a, Listing> {
        Box::pin(async move { Ok(self.list_now(prefix)) })
    }

    fn head<'a>(&'a self, path: &'a str) -> StoreFuture<'a, ObjectMeta> {
        Box::pin(async move { self.head_now(path) })
    }

    fn download_url<'a>(&'a self, path: &'a str) -> StoreFuture<'a, String> {
        Box::pin(async move {
            if !self.objects.read().contains_key(path) {
                return Err(StoreError::NotFound(path.to_owned()));
            }
            Ok(format!("{}{path}", self.url_base))
        })
    }

    fn delete<'a>(&'a self, path: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.objects
                .write()
                .remove(path)
                .map(|_| ())
                .ok_or_else(|| StoreError::NotFound(path.to_owned()))
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    async fn seeded() -> MemoryObjectStore {
        let store = MemoryObjectStore::new();
        for path in [
            "users/u1/100.jpg",
            "users/u1/200.webp",
            "users/u1/images/300.webp",
            "users/u1/metadata/200.json",
            "users/u2/1.webp",
        ] {
            store.put(path, PutObject::new(vec![1, 2, 3])).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn lists_one_level_deep() {
        let store = seeded().await;
        let listing = store.list("users/u1").await.unwrap();

        let names: Vec<_> = listing.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["100.jpg", "200.webp"]);
        assert_eq!(
            listing.prefixes,
            vec!["users/u1/images".to_owned(), "users/u1/metadata".to_owned()]
        );
    }

    #[tokio::test]
    async fn unknown_prefix_is_empty() {
        let store = seeded().await;
        assert_eq!(store.list("users/nobody").await.unwrap(), Listing::default());
        // `users/u` must not match `users/u1`
        assert_eq!(store.list("users/u").await.unwrap(), Listing::default());
    }

    #[tokio::test]
    async fn head_and_url_require_the_object() {
        let store = seeded().await;
        store
            .put(
                "users/u1/metadata/100.json",
                PutObject::empty().with_custom("json", "{}"),
            )
            .await
            .unwrap();

        let meta = store.head("users/u1/metadata/100.json").await.unwrap();
        assert_eq!(meta.custom_metadata["json"], "{}");
        assert_eq!(meta.size, 0);

        assert_eq!(
            store.download_url("users/u1/100.jpg").await.unwrap(),
            "mem://users/u1/100.jpg"
        );
        assert!(store.head("users/u1/nope.json").await.unwrap_err().is_not_found());
        assert!(store.download_url("users/u1/nope.jpg").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn delete_removes_the_object() {
        let store = seeded().await;
        store.delete("users/u2/1.webp").await.unwrap();
        assert!(!store.paths().contains(&"users/u2/1.webp".to_owned()));
        assert!(store.delete("users/u2/1.webp").await.unwrap_err().is_not_found());
    }
}
