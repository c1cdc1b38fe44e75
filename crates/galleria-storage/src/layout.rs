//! Object-store layout of an owner's namespace.
//!
//! ```text
//! users/{owner}/{id}.{webp|jpg}          artifact
//! users/{owner}/images/{id}.{webp|jpg}   artifact (legacy grouping)
//! users/{owner}/metadata/{id}.json       sidecar, record in the `json` attribute
//! ```
use galleria_core::artifact::{ArtifactFormat, ArtifactId, OwnerId};

pub const USERS_ROOT: &str = "users";
pub const METADATA_DIR: &str = "metadata";
/// The only nested grouping that is searched for artifacts.
pub const NESTED_GROUP: &str = "images";
/// Custom attribute of a sidecar object that carries the JSON record.
pub const METADATA_ATTRIBUTE: &str = "json";

pub fn owner_prefix(owner: &OwnerId) -> String {
    format!("{USERS_ROOT}/{owner}")
}

pub fn artifact_path(owner: &OwnerId, id: ArtifactId, format: ArtifactFormat) -> String {
    format!("{USERS_ROOT}/{owner}/{id}.{}", format.extension())
}

pub fn metadata_prefix(owner: &OwnerId) -> String {
    format!("{USERS_ROOT}/{owner}/{METADATA_DIR}")
}

/// Sidecar path for an artifact stem. The stem is usually a numeric id but
/// may be anything found in the namespace.
pub fn metadata_path(owner: &OwnerId, stem: &str) -> String {
    format!("{USERS_ROOT}/{owner}/{METADATA_DIR}/{stem}.json")
}

/// Everything before the first `.` of an object name.
pub fn stem(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

/// Last segment of a `/`-separated path.
pub fn last_segment(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or(path)
}
