//! Gemini provider implementation.
//!
//! Talks to the Gemini REST API with a fixed model, sending one text part
//! and at most one inline-image part per request.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::{CaptionProvider, GeneratedCaption, ProviderError};
use crate::services::image::ResolvedImage;

/// Gemini API base URL.
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used for captioning. Deliberately fixed rather than configurable.
const GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Gemini-backed caption provider.
pub struct GeminiCaptionProvider {
    api_key: String,
    base_url: String,
    client: Client,
}

impl GeminiCaptionProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, GEMINI_API_BASE.to_string())
    }

    fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    fn api_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, GEMINI_MODEL, self.api_key
        )
    }
}

#[async_trait]
impl CaptionProvider for GeminiCaptionProvider {
    async fn generate(
        &self,
        prompt: &str,
        image: Option<&ResolvedImage>,
    ) -> Result<GeneratedCaption, ProviderError> {
        let request = GenerateContentRequest::new(prompt, image);

        tracing::debug!(
            model = GEMINI_MODEL,
            prompt_len = prompt.len(),
            has_image = image.is_some(),
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(self.api_url())
            .json(&request)
            .send()
            .await
            // The request URL carries the API key; it must never reach
            // error text.
            .map_err(|e| ProviderError::Network(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let payload = serde_json::from_str::<serde_json::Value>(&error_text).ok();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: error_text,
                payload,
            });
        }

        let raw: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.without_url().to_string()))?;

        Ok(extract_caption(raw))
    }
}

/// Pulls the caption and usage metadata out of a raw `generateContent`
/// response, keeping the untouched value alongside. Missing pieces become
/// `None`; an unexpected shape is not an error.
fn extract_caption(raw: serde_json::Value) -> GeneratedCaption {
    let caption = raw
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(|value| value.as_str())
        .map(String::from);

    let usage = raw
        .get("usageMetadata")
        .filter(|value| !value.is_null())
        .cloned();

    GeneratedCaption {
        caption,
        usage,
        raw,
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// One content entry: the prompt text first, then the inline image when
    /// present.
    fn new(prompt: &str, image: Option<&ResolvedImage>) -> Self {
        let mut parts = vec![ContentPart::Text {
            text: prompt.to_string(),
        }];

        if let Some(image) = image {
            parts.push(ContentPart::InlineData {
                inline_data: InlineData {
                    mime_type: image.mime_type.clone(),
                    data: image.base64_content.clone(),
                },
            });
        }

        Self {
            contents: vec![Content { parts }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ContentPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}
