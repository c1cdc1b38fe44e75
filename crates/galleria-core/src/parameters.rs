//! Strongly-typed parameter records, one per supported profile.
//!
//! Upstream APIs accept an open `{string → scalar}` bag. Inside the workspace
//! we keep a closed union instead so that
//!
//! * defaults are spelled out once, with real types,
//! * caller overrides are checked against a known shape (unknown keys are
//!   rejected rather than silently forwarded), and
//! * the JSON schema of every record can be published next to the catalog.
//!
//! Overlaying is structural: the record is serialised to a JSON object, the
//! override keys replace their counterparts, and the result is parsed back
//! into the same record type.
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    error::{GalleriaError, Result},
    profile::ProfileKey,
};

/// Parameters accepted by `black-forest-labs/flux-1.1-pro`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FluxProParameters {
    pub aspect_ratio: String,
    pub output_format: String,
    pub output_quality: u8,
    pub safety_tolerance: u8,
    pub prompt_upsampling: bool,
}

impl Default for FluxProParameters {
    fn default() -> Self {
        Self {
            aspect_ratio: "1:1".into(),
            output_format: "webp".into(),
            output_quality: 80,
            safety_tolerance: 2,
            prompt_upsampling: true,
        }
    }
}

/// Parameters accepted by `black-forest-labs/flux-1.1-pro-ultra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FluxProUltraParameters {
    pub aspect_ratio: String,
    pub image_prompt_strength: f64,
    pub output_format: String,
    pub raw: bool,
    pub safety_tolerance: u8,
}

impl Default for FluxProUltraParameters {
    fn default() -> Self {
        Self {
            aspect_ratio: "1:1".into(),
            image_prompt_strength: 0.1,
            output_format: "jpg".into(),
            raw: false,
            safety_tolerance: 2,
        }
    }
}

/// Parameters accepted by `ideogram-ai/ideogram-v2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct IdeogramParameters {
    pub resolution: String,
    pub style_type: String,
    pub aspect_ratio: String,
    pub magic_prompt_option: String,
}

impl Default for IdeogramParameters {
    fn default() -> Self {
        Self {
            resolution: "None".into(),
            style_type: "None".into(),
            aspect_ratio: "1:1".into(),
            magic_prompt_option: "Auto".into(),
        }
    }
}

/// Closed union of every parameter record the workspace knows about.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileParameters {
    FluxPro(FluxProParameters),
    FluxProUltra(FluxProUltraParameters),
    Ideogram(IdeogramParameters),
}

impl ProfileParameters {
    /// Default record for `key`.
    pub fn defaults_for(key: ProfileKey) -> Self {
        match key {
            ProfileKey::FluxPro => Self::FluxPro(FluxProParameters::default()),
            ProfileKey::FluxProUltra => Self::FluxProUltra(FluxProUltraParameters::default()),
            ProfileKey::Ideogram => Self::Ideogram(IdeogramParameters::default()),
        }
    }

    pub fn key(&self) -> ProfileKey {
        match self {
            Self::FluxPro(_) => ProfileKey::FluxPro,
            Self::FluxProUltra(_) => ProfileKey::FluxProUltra,
            Self::Ideogram(_) => ProfileKey::Ideogram,
        }
    }

    /// Flatten the record into the wire-level `{string → scalar}` mapping.
    pub fn to_map(&self) -> Result<Map<String, Value>> {
        let value = match self {
            Self::FluxPro(p) => serde_json::to_value(p)?,
            Self::FluxProUltra(p) => serde_json::to_value(p)?,
            Self::Ideogram(p) => serde_json::to_value(p)?,
        };

        match value {
            Value::Object(map) => Ok(map),
            other => Err(GalleriaError::InvalidParameters {
                profile: self.key().to_string(),
                reason: format!("record serialised to a non-object: {other}"),
            }),
        }
    }

    /// Return a copy of `self` with `overrides` laid over it.
    ///
    /// A `prompt` key in `overrides` is ignored; the prompt is always taken
    /// from the request itself.
    pub fn overlay(&self, overrides: &Map<String, Value>) -> Result<Self> {
        let mut merged = self.to_map()?;
        for (name, value) in overrides {
            if name == "prompt" {
                continue;
            }
            merged.insert(name.clone(), value.clone());
        }

        Self::decode(self.key(), Value::Object(merged)).map_err(|e| {
            GalleriaError::InvalidParameters {
                profile: self.key().to_string(),
                reason: e.to_string(),
            }
        })
    }

    /// `output_format` as configured for the profile, if the record has one.
    pub fn output_format(&self) -> Option<&str> {
        match self {
            Self::FluxPro(p) => Some(&p.output_format),
            Self::FluxProUltra(p) => Some(&p.output_format),
            Self::Ideogram(_) => None,
        }
    }

    fn decode(key: ProfileKey, value: Value) -> serde_json::Result<Self> {
        Ok(match key {
            ProfileKey::FluxPro => Self::FluxPro(serde_json::from_value(value)?),
            ProfileKey::FluxProUltra => Self::FluxProUltra(serde_json::from_value(value)?),
            ProfileKey::Ideogram => Self::Ideogram(serde_json::from_value(value)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected a JSON object"),
        }
    }

    #[test]
    fn flux_pro_defaults_flatten_to_wire_names() {
        let map = ProfileParameters::defaults_for(ProfileKey::FluxPro)
            .to_map()
            .unwrap();

        assert_eq!(
            Value::Object(map),
            json!({
                "aspect_ratio": "1:1",
                "output_format": "webp",
                "output_quality": 80,
                "safety_tolerance": 2,
                "prompt_upsampling": true
            })
        );
    }

    #[test]
    fn overlay_replaces_known_fields_only() {
        let base = ProfileParameters::defaults_for(ProfileKey::FluxProUltra);
        let merged = base
            .overlay(&object(json!({ "aspect_ratio": "16:9", "raw": true })))
            .unwrap();

        let ProfileParameters::FluxProUltra(params) = &merged else {
            panic!("overlay must keep the variant");
        };
        assert_eq!(params.aspect_ratio, "16:9");
        assert!(params.raw);
        assert_eq!(params.output_format, "jpg");
        // the source record is untouched
        assert_eq!(base, ProfileParameters::defaults_for(ProfileKey::FluxProUltra));
    }

    #[test]
    fn overlay_rejects_unknown_keys() {
        let base = ProfileParameters::defaults_for(ProfileKey::Ideogram);
        let err = base
            .overlay(&object(json!({ "guidance": 7 })))
            .unwrap_err();

        assert!(matches!(err, GalleriaError::InvalidParameters { .. }));
    }

    #[test]
    fn overlay_rejects_mistyped_values() {
        let base = ProfileParameters::defaults_for(ProfileKey::FluxPro);
        let err = base
            .overlay(&object(json!({ "output_quality": "high" })))
            .unwrap_err();

        assert!(matches!(err, GalleriaError::InvalidParameters { .. }));
    }

    #[test]
    fn overlay_ignores_prompt_key() {
        let base = ProfileParameters::defaults_for(ProfileKey::FluxPro);
        let merged = base
            .overlay(&object(json!({ "prompt": "sneaky" })))
            .unwrap();

        assert_eq!(merged, base);
    }

    #[test]
    fn output_format_follows_profile() {
        assert_eq!(
            ProfileParameters::defaults_for(ProfileKey::FluxPro).output_format(),
            Some("webp")
        );
        assert_eq!(
            ProfileParameters::defaults_for(ProfileKey::Ideogram).output_format(),
            None
        );
    }
}
