//! Identifiers and references for generated artifacts.
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::{GalleriaError, Result},
    parameters::ProfileParameters,
};

/// Millisecond timestamp that names an artifact and its sidecar.
///
/// It is the only key joining the two, so it must be unique within an
/// owner's namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(u64);

impl ArtifactId {
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub const fn as_millis(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ArtifactId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
}

/// Storable image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    Webp,
    Jpg,
}

impl ArtifactFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactFormat::Webp => "webp",
            ArtifactFormat::Jpg => "jpg",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ArtifactFormat::Webp => "image/webp",
            ArtifactFormat::Jpg => "image/jpeg",
        }
    }

    /// Best guess from a locator: anything mentioning `webp` is webp,
    /// everything else is stored as jpg.
    pub fn from_locator(locator: &str) -> Self {
        if locator.to_ascii_lowercase().contains("webp") {
            ArtifactFormat::Webp
        } else {
            ArtifactFormat::Jpg
        }
    }

    /// Format of a stored object name, `None` for anything that is not a
    /// recognised artifact.
    pub fn from_file_name(name: &str) -> Option<Self> {
        if name.ends_with(".webp") {
            Some(ArtifactFormat::Webp)
        } else if name.ends_with(".jpg") {
            Some(ArtifactFormat::Jpg)
        } else {
            None
        }
    }
}

impl fmt::Display for ArtifactFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Opaque reference to generated content as returned by a provider,
/// usually an HTTPS URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactLocator(String);

impl ArtifactLocator {
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn format(&self) -> ArtifactFormat {
        ArtifactFormat::from_locator(&self.0)
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ArtifactLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a successful generation hands back: where the content lives plus
/// everything needed to describe how it was produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactReference {
    pub locator: ArtifactLocator,
    pub prompt: String,
    pub canonical_model_id: String,
    /// Effective parameters, i.e. profile defaults with overrides applied.
    pub parameters: ProfileParameters,
}

/// Owner of a namespace in the object store.
///
/// The value becomes a path segment (`users/{owner}/…`), so it must not be
/// empty and must not contain separators, `..` or control characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let valid = !raw.is_empty()
            && raw != "."
            && !raw.contains("..")
            && !raw.contains('/')
            && !raw.contains('\\')
            && !raw.chars().any(char::is_control);

        if valid {
            Ok(Self(raw))
        } else {
            Err(GalleriaError::InvalidOwner(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for OwnerId {
    type Err = GalleriaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
