//! Error handling for the relay.
//!
//! [`RelayError`] is the full failure taxonomy of a generation request and
//! carries the HTTP mapping with it: request-shape and image problems map to
//! 400, oversized bodies to 413, method misuse to 405, and upstream
//! generation failures to 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;
use thiserror::Error;

use crate::services::providers::ProviderError;

/// Everything that can go wrong while serving a generation request.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The request carried no prompt text.
    #[error("prompt is required")]
    MissingPrompt,

    /// The request body was not valid JSON.
    #[error("Invalid JSON body")]
    InvalidBody,

    /// The request body exceeded the size cap.
    #[error("Request body too large")]
    BodyTooLarge,

    /// The generation endpoint was called with a method other than POST.
    #[error("Only POST allowed")]
    MethodNotAllowed,

    /// Downloading the image behind `imageUrl` failed.
    #[error("Failed to fetch image from URL: {0}")]
    ImageFetch(String),

    /// Reading the file behind `imagePath` failed.
    #[error("Failed to read imagePath: {0}")]
    ImageRead(String),

    /// The image content was already submitted earlier in this process.
    #[error("Duplicate image detected")]
    DuplicateImage { previous_upload: DateTime<Utc> },

    /// The generation backend failed.
    #[error("generation failed: {0}")]
    Upstream(#[from] ProviderError),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingPrompt
            | RelayError::InvalidBody
            | RelayError::ImageFetch(_)
            | RelayError::ImageRead(_)
            | RelayError::DuplicateImage { .. } => StatusCode::BAD_REQUEST,
            RelayError::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The JSON body sent for this error.
    ///
    /// Duplicate rejections add the first-seen timestamp; upstream failures
    /// surface the backend's own error payload when one was returned.
    pub fn body(&self) -> serde_json::Value {
        match self {
            RelayError::DuplicateImage { previous_upload } => json!({
                "error": self.to_string(),
                "previousUpload": previous_upload.to_rfc3339_opts(SecondsFormat::Millis, true),
            }),
            RelayError::Upstream(err) => json!({ "error": err.body() }),
            other => json!({ "error": other.to_string() }),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}
