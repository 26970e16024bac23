//! The relay pipeline.
//!
//! One request flows normalize, resolve, dedup, generate; every step is
//! sequential and the first failure ends the request. This is the core both
//! entry points delegate to.

use std::sync::Arc;

use crate::dtos::{CaptionResponse, GenerationRequest};
use crate::error::RelayError;
use crate::services::dedup::{content_hash, ImageRegistry};
use crate::services::image::{ImageResolver, ImageSource, ResolvedImage};
use crate::services::providers::CaptionProvider;

/// Drives generation requests end to end. Owns the image resolver, the
/// duplicate registry, and the generation provider; cloning shares all
/// three.
#[derive(Clone)]
pub struct CaptionService {
    resolver: ImageResolver,
    registry: ImageRegistry,
    provider: Arc<dyn CaptionProvider>,
}

impl CaptionService {
    pub fn new(
        resolver: ImageResolver,
        registry: ImageRegistry,
        provider: Arc<dyn CaptionProvider>,
    ) -> Self {
        Self {
            resolver,
            registry,
            provider,
        }
    }

    /// Runs one generation request to completion.
    ///
    /// Prompt validation happens before any image work, and image resolution
    /// plus duplicate admission happen before the upstream call, so a
    /// rejected image never costs a generation.
    pub async fn handle(&self, request: GenerationRequest) -> Result<CaptionResponse, RelayError> {
        if request.prompt.is_empty() {
            return Err(RelayError::MissingPrompt);
        }

        let request_id = uuid::Uuid::new_v4().to_string();

        let image = match request.image_source() {
            Some(source) => Some(self.resolve_and_admit(&request_id, &source).await?),
            None => None,
        };

        tracing::info!(
            request_id = %request_id,
            prompt_len = request.prompt.len(),
            has_image = image.is_some(),
            "Dispatching generation request"
        );

        let generated = self
            .provider
            .generate(&request.prompt, image.as_ref())
            .await
            .map_err(|e| {
                tracing::error!(request_id = %request_id, error = %e, "Generation failed");
                RelayError::from(e)
            })?;

        Ok(CaptionResponse {
            caption: generated.caption,
            usage: generated.usage,
            raw: generated.raw,
        })
    }

    /// Resolves an image source and admits its content through the
    /// duplicate registry.
    async fn resolve_and_admit(
        &self,
        request_id: &str,
        source: &ImageSource,
    ) -> Result<ResolvedImage, RelayError> {
        let image = self.resolver.resolve(source).await.map_err(|e| {
            tracing::debug!(request_id = %request_id, error = %e, "Image resolution failed");
            e
        })?;

        let hash = content_hash(&image.base64_content);
        if let Some(previous_upload) = self.registry.check_and_record(&hash) {
            tracing::info!(
                request_id = %request_id,
                hash = %hash,
                previous_upload = %previous_upload,
                "Rejecting duplicate image"
            );
            return Err(RelayError::DuplicateImage { previous_upload });
        }

        Ok(image)
    }
}
