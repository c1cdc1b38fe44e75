//! [`ObjectStore`] on a local directory tree.
//!
//! Object `a/b/c.jpg` lives at `{root}/a/b/c.jpg`. Content type and custom
//! attributes live next to it in a parallel tree,
//! `{root}/.attrs/a/b/c.jpg.json`, which listings never show. Entries whose
//! name starts with `.` are hidden the same way.
use std::{
    collections::BTreeMap,
    io,
    path::{Component, Path, PathBuf},
};

use galleria_core::storage::{
    Listing, ObjectMeta, ObjectRef, ObjectStore, PutObject, StoreError, StoreFuture,
};
use serde::{Deserialize, Serialize};
use tokio::fs;

const ATTRS_DIR: &str = ".attrs";

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredAttrs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content_type: Option<String>,
    #[serde(default)]
    custom_metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
    public_base_url: Option<String>,
}

impl FsObjectStore {
    /// Store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            public_base_url: None,
        }
    }

    /// Hand out `{base}/{path}` as download URL instead of a `file://` URL,
    /// e.g. when the root is served over HTTP.
    pub fn with_public_base_url(mut self, base: impl Into<String>) -> Self {
        self.public_base_url = Some(base.into().trim_end_matches('/').to_owned());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, path: &str) -> Result<PathBuf, StoreError> {
        Ok(self.root.join(checked(path)?))
    }

    fn attrs_path(&self, path: &str) -> Result<PathBuf, StoreError> {
        let relative = checked(path)?;
        Ok(self
            .root
            .join(ATTRS_DIR)
            .join(format!("{}.json", relative.display())))
    }

    async fn put_now(&self, path: &str, object: PutObject) -> Result<(), StoreError> {
        let target = self.object_path(path)?;
        let attrs_target = self.attrs_path(path)?;

        write_creating_parent(&target, &object.bytes).await?;

        let attrs = StoredAttrs {
            content_type: object.content_type,
            custom_metadata: object.custom_metadata,
        };
        let encoded = serde_json::to_vec(&attrs).map_err(|e| StoreError::Backend(Box::new(e)))?;
        write_creating_parent(&attrs_target, &encoded).await
    }

    async fn list_now(&self, prefix: &str) -> Result<Listing, StoreError> {
        let prefix = prefix.trim_end_matches('/');
        let dir = self.object_path(prefix)?;

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Listing::default()),
            Err(e) => return Err(e.into()),
        };

        let mut listing = Listing::default();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            let full_path = format!("{prefix}/{name}");
            if entry.file_type().await?.is_dir() {
                listing.prefixes.push(full_path);
            } else {
                listing.items.push(ObjectRef::new(full_path));
            }
        }

        listing.items.sort_by(|a, b| a.full_path.cmp(&b.full_path));
        listing.prefixes.sort();
        Ok(listing)
    }

    async fn head_now(&self, path: &str) -> Result<ObjectMeta, StoreError> {
        let target = self.object_path(path)?;
        let meta = fs::metadata(&target).await.map_err(|e| not_found_or(path, e))?;
        if !meta.is_file() {
            return Err(StoreError::NotFound(path.to_owned()));
        }

        let attrs: StoredAttrs = match fs::read(self.attrs_path(path)?).await {
            Ok(raw) => {
                serde_json::from_slice(&raw).map_err(|e| StoreError::Backend(Box::new(e)))?
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => StoredAttrs::default(),
            Err(e) => return Err(e.into()),
        };

        Ok(ObjectMeta {
            full_path: path.to_owned(),
            size: meta.len(),
            content_type: attrs.content_type,
            custom_metadata: attrs.custom_metadata,
        })
    }

    async fn download_url_now(&self, path: &str) -> Result<String, StoreError> {
        let target = self.object_path(path)?;
        if !fs::try_exists(&target).await? {
            return Err(StoreError::NotFound(path.to_owned()));
        }

        Ok(match &self.public_base_url {
            Some(base) => format!("{base}/{}", encode_segments(path)),
            None => {
                let absolute = std::path::absolute(&target)?;
                format!("file://{}", absolute.display())
            }
        })
    }

    async fn delete_now(&self, path: &str) -> Result<(), StoreError> {
        fs::remove_file(self.object_path(path)?)
            .await
            .map_err(|e| not_found_or(path, e))?;

        match fs::remove_file(self.attrs_path(path)?).await {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

impl ObjectStore for FsObjectStore {
    fn put<'a>(&'a self, path: &'a str, object: PutObject) -> StoreFuture<'a, ()> {
        Box::pin(self.put_now(path, object))
    }

    fn list<'a>(&'a self, prefix: &'a str) -> StoreFuture<'a, Listing> {
        Box::pin(self.list_now(prefix))
    }

    fn head<'a>(&'a self, path: &'a str) -> StoreFuture<'a, ObjectMeta> {
        Box::pin(self.head_now(path))
    }

    fn download_url<'a>(&'a self, path: &'a str) -> StoreFuture<'a, String> {
        Box::pin(self.download_url_now(path))
    }

    fn delete<'a>(&'a self, path: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(self.delete_now(path))
    }
}

/// Percent-encodes each `/`-separated segment so owner names survive as
/// single URL path segments.
fn encode_segments(path: &str) -> String {
    path.split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}

/// Object paths must stay below the root and out of the attribute tree.
fn checked(path: &str) -> Result<&Path, StoreError> {
    let relative = Path::new(path);
    let escapes = relative.components().any(|c| !matches!(c, Component::Normal(_)));
    let hidden = relative.starts_with(ATTRS_DIR);
    if path.is_empty() || escapes || hidden {
        return Err(StoreError::Backend(
            format!("object path `{path}` is not allowed").into(),
        ));
    }
    Ok(relative)
}

fn not_found_or(path: &str, e: io::Error) -> StoreError {
    if e.kind() == io::ErrorKind::NotFound {
        StoreError::NotFound(path.to_owned())
    } else {
        StoreError::Io(e)
    }
}

async fn write_creating_parent(target: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(target, bytes).await?;
    Ok(())
}
