//! HTTP routes.
//!
//! | Route                        | Purpose                                   |
//! |------------------------------|-------------------------------------------|
//! | `POST /generate`             | generate one image, save it if owned      |
//! | `GET /users/:owner/images`   | the owner's gallery, newest first         |
//! | `GET /profiles`              | available profiles with defaults + schema |
//! | `GET /health/ping`           | liveness                                  |
use axum::{
    Json, Router,
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, post},
};
use galleria_core::{
    GenerationRequest,
    artifact::OwnerId,
    error::GalleriaError,
    metadata::GalleryEntry,
    provider::GenerationProvider,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{error::ApiError, state::AppState};

/// Header naming the owner a generated image is saved for. Without it the
/// image is generated but not saved.
pub const OWNER_HEADER: &str = "x-owner-id";

#[derive(Debug, Default, Deserialize)]
pub struct GenerateBody {
    #[serde(default)]
    pub prompt: Option<String>,
    /// Profile key (`flux-pro`) or canonical model id.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub parameters: Option<Map<String, Value>>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub key: &'static str,
    pub display_name: &'static str,
    pub model: &'static str,
    pub defaults: Map<String, Value>,
    pub schema: Value,
}

pub fn router<B>(state: AppState<B>) -> Router
where
    B: GenerationProvider + 'static,
{
    Router::new()
        .route("/generate", post(generate::<B>))
        .route("/users/:owner/images", get(user_images::<B>))
        .route("/profiles", get(profiles::<B>))
        .route("/health/ping", get(ping))
        .with_state(state)
}

async fn generate<B>(
    State(state): State<AppState<B>>,
    headers: HeaderMap,
    Json(body): Json<GenerateBody>,
) -> Result<Json<GenerateResponse>, ApiError>
where
    B: GenerationProvider + 'static,
{
    let prompt = body
        .prompt
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(GalleriaError::missing_prompt)?;
    let model = body
        .model
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(GalleriaError::missing_model)?;
    state.policy.check(&prompt).map_err(GalleriaError::from)?;
    let owner = owner_from(&headers)?;

    let profile = state.studio.registry().resolve_any(&model)?;
    let mut request = GenerationRequest::new(prompt, profile);
    if let Some(overrides) = &body.parameters {
        request = request.with_overrides(overrides)?;
    }

    // The save keeps running after the response; its failures are logged.
    let outcome = state.studio.generate_detached(owner.as_ref(), request).await?;

    Ok(Json(GenerateResponse {
        url: outcome.reference.locator.into_inner(),
    }))
}

async fn user_images<B>(
    State(state): State<AppState<B>>,
    Path(owner): Path<String>,
) -> Result<Json<Vec<GalleryEntry>>, ApiError>
where
    B: GenerationProvider + 'static,
{
    let owner = OwnerId::parse(owner)?;
    Ok(Json(state.studio.gallery(&owner).await?))
}

async fn profiles<B>(State(state): State<AppState<B>>) -> Result<Json<Vec<ProfileView>>, ApiError>
where
    B: GenerationProvider + 'static,
{
    let views = state
        .studio
        .registry()
        .iter()
        .map(|profile| -> Result<ProfileView, GalleriaError> {
            Ok(ProfileView {
                key: profile.key.as_str(),
                display_name: profile.display_name,
                model: profile.canonical_model_id,
                defaults: profile.default_parameters.to_map()?,
                schema: profile.key.parameters_schema(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(views))
}

async fn ping() -> &'static str {
    "pong"
}

fn owner_from(headers: &HeaderMap) -> Result<Option<OwnerId>, ApiError> {
    let Some(raw) = headers.get(OWNER_HEADER) else {
        return Ok(None);
    };
    let raw = raw
        .to_str()
        .map_err(|_| ApiError::BadRequest(format!("{OWNER_HEADER} must be visible ASCII")))?;
    Ok(Some(OwnerId::parse(raw)?))
}
