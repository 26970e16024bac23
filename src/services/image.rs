//! Image-source resolution.
//!
//! Turns the image reference carried by a request (remote URL, local file
//! path, or inline base64) into base64 content plus a mime type, ready to be
//! embedded as an inline-data part of a generation call.

use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::Client;

use crate::error::RelayError;

/// Fallback when no better mime type can be determined.
const DEFAULT_MIME_TYPE: &str = "image/png";

/// Where the image bytes of a request come from, selected once during
/// request normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Fetch over HTTP.
    Url(String),
    /// Read from the local filesystem.
    Path(String),
    /// Base64 content supplied inline by the caller.
    Inline(String),
}

/// Base64 image content plus its mime type. Lives for one request; only the
/// hash of the content outlives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub base64_content: String,
    pub mime_type: String,
}

/// Resolves an [`ImageSource`] into a [`ResolvedImage`].
#[derive(Clone)]
pub struct ImageResolver {
    client: Client,
}

impl Default for ImageResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageResolver {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    pub async fn resolve(&self, source: &ImageSource) -> Result<ResolvedImage, RelayError> {
        match source {
            ImageSource::Url(url) => self.fetch_url(url).await,
            ImageSource::Path(path) => read_path(path),
            ImageSource::Inline(data) => Ok(ResolvedImage {
                base64_content: data.clone(),
                // Inline data carries no mime information; it is labeled png
                // without sniffing the content.
                mime_type: DEFAULT_MIME_TYPE.to_string(),
            }),
        }
    }

    /// Downloads a remote image and re-encodes it as base64. The mime type
    /// is taken from the `Content-Type` header when the server sends one.
    async fn fetch_url(&self, url: &str) -> Result<ResolvedImage, RelayError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RelayError::ImageFetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::ImageFetch(format!(
                "Failed to fetch image: {}",
                status.canonical_reason().unwrap_or(status.as_str())
            )));
        }

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RelayError::ImageFetch(e.to_string()))?;

        Ok(ResolvedImage {
            base64_content: BASE64.encode(&bytes),
            mime_type,
        })
    }
}

/// Reads a local image fully into memory and encodes it. The mime type is
/// inferred from the file extension.
fn read_path(path: &str) -> Result<ResolvedImage, RelayError> {
    let resolved = resolve_path(path).map_err(|e| RelayError::ImageRead(e.to_string()))?;

    let bytes = std::fs::read(&resolved).map_err(|e| RelayError::ImageRead(e.to_string()))?;

    let mime_type = mime_guess::from_path(&resolved)
        .first_raw()
        .unwrap_or(DEFAULT_MIME_TYPE)
        .to_string();

    Ok(ResolvedImage {
        base64_content: BASE64.encode(&bytes),
        mime_type,
    })
}

/// Normalizes backslash separators and anchors relative paths at the current
/// working directory, so paths pasted from other platforms still resolve.
fn resolve_path(path: &str) -> std::io::Result<PathBuf> {
    let normalized = path.replace('\\', "/");
    let candidate = Path::new(&normalized);
    if candidate.is_absolute() {
        Ok(candidate.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}", uuid::Uuid::new_v4(), name));
        std::fs::write(&path, contents).expect("failed to write temp file");
        path
    }

    #[tokio::test]
    async fn inline_data_passes_through_as_png() {
        let resolver = ImageResolver::new();
        let image = resolver
            .resolve(&ImageSource::Inline("Zm9vYmFy".into()))
            .await
            .unwrap();

        assert_eq!(image.base64_content, "Zm9vYmFy");
        assert_eq!(image.mime_type, "image/png");
    }

    #[tokio::test]
    async fn local_files_are_read_and_encoded() {
        let path = temp_file("picture.jpg", b"jpeg bytes");
        let resolver = ImageResolver::new();

        let image = resolver
            .resolve(&ImageSource::Path(path.to_string_lossy().into_owned()))
            .await
            .unwrap();

        assert_eq!(image.base64_content, BASE64.encode(b"jpeg bytes"));
        assert_eq!(image.mime_type, "image/jpeg");

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn unknown_extensions_fall_back_to_png() {
        let path = temp_file("picture.imgdata", b"raw bytes");
        let resolver = ImageResolver::new();

        let image = resolver
            .resolve(&ImageSource::Path(path.to_string_lossy().into_owned()))
            .await
            .unwrap();

        assert_eq!(image.mime_type, "image/png");

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn missing_files_surface_a_read_error() {
        let resolver = ImageResolver::new();
        let err = resolver
            .resolve(&ImageSource::Path("/definitely/not/here.png".into()))
            .await
            .unwrap_err();

        assert!(matches!(err, RelayError::ImageRead(_)));
        assert!(err.to_string().starts_with("Failed to read imagePath:"));
    }

    #[test]
    fn backslash_paths_are_normalized() {
        let resolved = resolve_path("shots\\latest.png").unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("shots/latest.png"));
    }

    #[test]
    fn absolute_paths_are_kept_as_is() {
        let resolved = resolve_path("/var/data/img.png").unwrap();
        assert_eq!(resolved, PathBuf::from("/var/data/img.png"));
    }
}
