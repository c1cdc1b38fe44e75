//! Mapping of pipeline failures onto HTTP responses.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use galleria_core::error::GalleriaError;
use serde::Serialize;
use serde_json::Value;

pub const NO_DETAILS: &str = "No additional details available";
pub const GALLERY_UNAVAILABLE: &str = "Failed to load images. Please try again.";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Rejected request; answered as plain text.
    #[error("{0}")]
    BadRequest(String),

    #[error("{message}")]
    Provider {
        message: String,
        details: Option<Value>,
    },

    #[error("Failed to load images. Please try again.")]
    GalleryUnavailable,

    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<GalleriaError> for ApiError {
    fn from(err: GalleriaError) -> Self {
        match err {
            GalleriaError::Validation(v) => ApiError::BadRequest(v.to_string()),
            e @ (GalleriaError::UnknownProfile { .. }
            | GalleriaError::InvalidParameters { .. }
            | GalleriaError::InvalidOwner(_)) => ApiError::BadRequest(e.to_string()),
            GalleriaError::Provider(p) => {
                tracing::error!(message = %p.message, details = ?p.detail, "generation failed");
                ApiError::Provider {
                    message: p.message,
                    details: p.detail,
                }
            }
            e @ GalleriaError::GalleryList { .. } => {
                tracing::error!(error = %e, "gallery listing failed");
                ApiError::GalleryUnavailable
            }
            e => {
                tracing::error!(error = %e, "request failed");
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            ApiError::Provider { message, details } => {
                let body = ErrorBody {
                    error: &message,
                    details: Some(details.unwrap_or_else(|| Value::String(NO_DETAILS.to_owned()))),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
            ApiError::GalleryUnavailable => {
                let body = ErrorBody {
                    error: GALLERY_UNAVAILABLE,
                    details: None,
                };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
            ApiError::Internal(message) => {
                let body = ErrorBody {
                    error: &message,
                    details: None,
                };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}
