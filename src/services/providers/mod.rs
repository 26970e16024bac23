//! Generation provider abstraction.
//!
//! The relay talks to its upstream through [`CaptionProvider`], which lets
//! the HTTP surface be exercised against a scripted mock instead of the real
//! Gemini API.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

use crate::services::image::ResolvedImage;

/// Error type for provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The upstream answered with a non-success status.
    #[error("Gemini API error {status}: {message}")]
    Api {
        status: u16,
        message: String,
        /// Structured JSON error payload, when the upstream sent one.
        payload: Option<serde_json::Value>,
    },

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to decode response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// The value surfaced to callers: the structured payload when the
    /// upstream sent one, otherwise the string form of the error.
    pub fn body(&self) -> serde_json::Value {
        match self {
            ProviderError::Api {
                payload: Some(payload),
                ..
            } => payload.clone(),
            other => serde_json::Value::String(other.to_string()),
        }
    }
}

/// Result of one generation call.
#[derive(Debug, Clone)]
pub struct GeneratedCaption {
    /// First text part of the first candidate, when present.
    pub caption: Option<String>,
    /// The upstream `usageMetadata` object, verbatim.
    pub usage: Option<serde_json::Value>,
    /// Full upstream response body.
    pub raw: serde_json::Value,
}

/// A multimodal generation backend: prompt text plus an optional inline
/// image in, caption out.
#[async_trait]
pub trait CaptionProvider: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        image: Option<&ResolvedImage>,
    ) -> Result<GeneratedCaption, ProviderError>;
}
