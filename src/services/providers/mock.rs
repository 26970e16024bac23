//! Scripted provider for tests.
//!
//! Returns a fixed caption (or a fixed failure) and records what it was
//! called with, so tests can assert which requests reached the upstream.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use super::{CaptionProvider, GeneratedCaption, ProviderError};
use crate::services::image::ResolvedImage;

pub struct MockCaptionProvider {
    caption: String,
    fail: bool,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
    last_image: Mutex<Option<ResolvedImage>>,
}

impl MockCaptionProvider {
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            fail: false,
            delay: None,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
            last_image: Mutex::new(None),
        }
    }

    /// A provider whose every call fails like an overloaded upstream.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new("")
        }
    }

    /// Pauses before every reply, so a test can hold a request in flight.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of generate calls observed.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().expect("lock poisoned").clone()
    }

    pub fn last_image(&self) -> Option<ResolvedImage> {
        self.last_image.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl CaptionProvider for MockCaptionProvider {
    async fn generate(
        &self,
        prompt: &str,
        image: Option<&ResolvedImage>,
    ) -> Result<GeneratedCaption, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().expect("lock poisoned") = Some(prompt.to_string());
        *self.last_image.lock().expect("lock poisoned") = image.cloned();

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail {
            return Err(ProviderError::Api {
                status: 503,
                message: "mock upstream unavailable".to_string(),
                payload: Some(json!({
                    "error": {
                        "code": 503,
                        "message": "The model is overloaded. Please try again later.",
                        "status": "UNAVAILABLE"
                    }
                })),
            });
        }

        let raw = json!({
            "candidates": [{
                "content": { "parts": [{ "text": self.caption }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": {
                "promptTokenCount": prompt.len() / 4,
                "candidatesTokenCount": 8,
                "totalTokenCount": prompt.len() / 4 + 8
            }
        });

        Ok(GeneratedCaption {
            caption: Some(self.caption.clone()),
            usage: raw.get("usageMetadata").cloned(),
            raw,
        })
    }
}
