//! Provider profiles and the registry that resolves them.
//!
//! A *profile* bundles a canonical provider-model identifier (what the
//! generation backend expects, e.g. `"black-forest-labs/flux-1.1-pro"`) with
//! the default parameter record for that model. Profiles are immutable; the
//! registry is built once at startup and handed to whoever needs it. There is
//! no process-wide catalog.
//!
//! # Adding more profiles
//!
//! 1. **Key** – add the variant to [`ProfileKey`] and its wire name.
//! 2. **Parameters** – add a typed record to
//!    [`crate::parameters::ProfileParameters`].
//! 3. **Catalog** – append it to [`ProfileRegistry::builtin`].
//!
//! The compiler points out every `match` that still needs the new variant.
//!
//! ```rust
//! use galleria_core::profile::{ProfileKey, ProfileRegistry};
//!
//! let registry = ProfileRegistry::builtin();
//! let profile = registry.resolve("flux-pro").unwrap();
//! assert_eq!(profile.key, ProfileKey::FluxPro);
//! assert_eq!(profile.canonical_model_id, "black-forest-labs/flux-1.1-pro");
//! ```
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::{GalleriaError, Result},
    parameters::{
        FluxProParameters, FluxProUltraParameters, IdeogramParameters, ProfileParameters,
    },
    schema_util::derive_parameters_schema,
};

/// Wire name of a profile (`"flux-pro"`, `"flux-pro-ultra"`, `"ideogram"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfileKey {
    FluxPro,
    FluxProUltra,
    Ideogram,
}

impl ProfileKey {
    pub const ALL: [ProfileKey; 3] = [
        ProfileKey::FluxPro,
        ProfileKey::FluxProUltra,
        ProfileKey::Ideogram,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileKey::FluxPro => "flux-pro",
            ProfileKey::FluxProUltra => "flux-pro-ultra",
            ProfileKey::Ideogram => "ideogram",
        }
    }

    /// JSON schema describing the parameter record of this profile.
    pub fn parameters_schema(&self) -> serde_json::Value {
        match self {
            ProfileKey::FluxPro => derive_parameters_schema::<FluxProParameters>(),
            ProfileKey::FluxProUltra => derive_parameters_schema::<FluxProUltraParameters>(),
            ProfileKey::Ideogram => derive_parameters_schema::<IdeogramParameters>(),
        }
    }
}

impl fmt::Display for ProfileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileKey {
    type Err = GalleriaError;

    fn from_str(s: &str) -> Result<Self> {
        ProfileKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| GalleriaError::UnknownProfile { key: s.to_owned() })
    }
}

/// Named configuration bundling a model identifier with its defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderProfile {
    pub key: ProfileKey,
    /// Human readable label, as shown in a model picker.
    pub display_name: &'static str,
    pub canonical_model_id: &'static str,
    pub default_parameters: ProfileParameters,
}

impl ProviderProfile {
    pub fn new(key: ProfileKey, display_name: &'static str, canonical_model_id: &'static str) -> Self {
        Self {
            key,
            display_name,
            canonical_model_id,
            default_parameters: ProfileParameters::defaults_for(key),
        }
    }
}

/// Read-only catalog of provider profiles.
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: Vec<ProviderProfile>,
}

impl ProfileRegistry {
    pub fn new(profiles: Vec<ProviderProfile>) -> Self {
        Self { profiles }
    }

    /// The catalog shipped with the application.
    pub fn builtin() -> Self {
        Self::new(vec![
            ProviderProfile::new(
                ProfileKey::FluxPro,
                "Flux Pro",
                "black-forest-labs/flux-1.1-pro",
            ),
            ProviderProfile::new(
                ProfileKey::FluxProUltra,
                "Flux Pro Ultra",
                "black-forest-labs/flux-1.1-pro-ultra",
            ),
            ProviderProfile::new(ProfileKey::Ideogram, "Ideogram v2", "ideogram-ai/ideogram-v2"),
        ])
    }

    /// Look a profile up by its key.
    ///
    /// # Errors
    ///
    /// [`GalleriaError::UnknownProfile`] if the key is not registered.
    pub fn resolve(&self, key: &str) -> Result<&ProviderProfile> {
        self.profiles
            .iter()
            .find(|p| p.key.as_str() == key)
            .ok_or_else(|| GalleriaError::UnknownProfile { key: key.to_owned() })
    }

    /// Look a profile up by its canonical model id.
    pub fn resolve_model(&self, model_id: &str) -> Result<&ProviderProfile> {
        self.profiles
            .iter()
            .find(|p| p.canonical_model_id == model_id)
            .ok_or_else(|| GalleriaError::UnknownProfile {
                key: model_id.to_owned(),
            })
    }

    /// Accept either a profile key or a canonical model id.
    pub fn resolve_any(&self, key_or_model: &str) -> Result<&ProviderProfile> {
        self.resolve(key_or_model)
            .or_else(|_| self.resolve_model(key_or_model))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProviderProfile> {
        self.profiles.iter()
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
