//! Sidecar metadata records and the gallery entries built from them.
//!
//! The wire shape of a record is fixed by what is already stored in the
//! object store:
//!
//! ```json
//! { "prompt": "…", "model": "…", "parameters": { … }, "timestamp": 1700000000000, "imageUrl": "…" }
//! ```
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    artifact::{ArtifactId, ArtifactReference},
    error::Result,
};

pub const FALLBACK_PROMPT: &str = "No prompt available";
pub const FALLBACK_MODEL: &str = "Unknown model";

/// Description of the request that produced an artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub prompt: String,
    /// Canonical model id used for the generation.
    pub model: String,
    /// Snapshot of the parameters at generation time.
    #[serde(default)]
    pub parameters: Map<String, Value>,
    /// Equal to the id of the paired artifact.
    pub timestamp: u64,
    /// Where the provider originally served the content.
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Fields written by other producers, kept as they are.
    #[serde(flatten, default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

/// Sidecar as found in the store, where any field may be missing.
#[derive(Deserialize)]
struct StoredRecord {
    prompt: Option<String>,
    model: Option<String>,
    #[serde(default)]
    parameters: Option<Map<String, Value>>,
    timestamp: Option<u64>,
    #[serde(rename = "imageUrl", default)]
    image_url: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl MetadataRecord {
    /// Parse a stored sidecar, filling whatever it lacks.
    ///
    /// Missing prompt and model take the fallback placeholders, a missing
    /// timestamp takes `fallback_timestamp`. Only text that is not a JSON
    /// object of the expected field types is an error.
    pub fn from_sidecar(raw: &str, fallback_timestamp: u64) -> serde_json::Result<Self> {
        let stored: StoredRecord = serde_json::from_str(raw)?;
        Ok(Self {
            prompt: stored.prompt.unwrap_or_else(|| FALLBACK_PROMPT.to_owned()),
            model: stored.model.unwrap_or_else(|| FALLBACK_MODEL.to_owned()),
            parameters: stored.parameters.unwrap_or_default(),
            timestamp: stored.timestamp.unwrap_or(fallback_timestamp),
            image_url: stored.image_url,
            extra: stored.extra,
        })
    }

    /// Record synthesised for artifacts whose sidecar is missing or broken.
    pub fn fallback(timestamp: u64) -> Self {
        Self {
            prompt: FALLBACK_PROMPT.to_owned(),
            model: FALLBACK_MODEL.to_owned(),
            parameters: Map::new(),
            timestamp,
            image_url: None,
            extra: Map::new(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.prompt == FALLBACK_PROMPT && self.model == FALLBACK_MODEL && self.parameters.is_empty()
    }
}

/// A record that has not been assigned an id yet.
///
/// The artifact store mints the id at write time and stamps it into the
/// record, which keeps `timestamp == id` by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataDraft {
    pub prompt: String,
    pub model: String,
    pub parameters: Map<String, Value>,
    pub image_url: Option<String>,
}

impl MetadataDraft {
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            parameters: Map::new(),
            image_url: None,
        }
    }

    pub fn with_parameters(mut self, parameters: Map<String, Value>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Snapshot everything a generation result knows about itself.
    pub fn from_reference(reference: &ArtifactReference) -> Result<Self> {
        Ok(Self {
            prompt: reference.prompt.clone(),
            model: reference.canonical_model_id.clone(),
            parameters: reference.parameters.to_map()?,
            image_url: Some(reference.locator.as_str().to_owned()),
        })
    }

    pub fn stamp(self, id: ArtifactId) -> MetadataRecord {
        MetadataRecord {
            prompt: self.prompt,
            model: self.model,
            parameters: self.parameters,
            timestamp: id.as_millis(),
            image_url: self.image_url,
            extra: Map::new(),
        }
    }
}

/// One item of a reconstructed gallery. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryEntry {
    pub url: String,
    pub metadata: MetadataRecord,
    pub timestamp: u64,
}

impl GalleryEntry {
    /// The entry's timestamp is the one stored in its record.
    pub fn new(url: impl Into<String>, metadata: MetadataRecord) -> Self {
        Self {
            url: url.into(),
            timestamp: metadata.timestamp,
            metadata,
        }
    }

    pub fn generated_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        i64::try_from(self.timestamp)
            .ok()
            .and_then(chrono::DateTime::from_timestamp_millis)
    }
}
