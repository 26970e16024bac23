//! Wire-level request and response shapes for the generation endpoint.

use serde::{Deserialize, Serialize};

use crate::services::image::ImageSource;

/// Inbound body for `POST /api/gemini`.
///
/// At most one of the image fields is honored per request; see
/// [`image_source`](GenerationRequest::image_source).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub image_data: Option<String>,
}

impl GenerationRequest {
    /// Picks the image source for this request: the first non-empty of
    /// `imageUrl`, `imagePath`, `imageData`, in that order. Supplying several
    /// is not an error; lower-priority fields are simply ignored.
    pub fn image_source(&self) -> Option<ImageSource> {
        if let Some(url) = non_empty(&self.image_url) {
            return Some(ImageSource::Url(url.to_string()));
        }
        if let Some(path) = non_empty(&self.image_path) {
            return Some(ImageSource::Path(path.to_string()));
        }
        if let Some(data) = non_empty(&self.image_data) {
            return Some(ImageSource::Inline(data.to_string()));
        }
        None
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

/// Success body for the generation endpoint.
///
/// `caption` and `usage` are extracted conveniences; `raw` is the untouched
/// upstream response so callers can recover anything the extraction skipped.
#[derive(Debug, Serialize)]
pub struct CaptionResponse {
    pub caption: Option<String>,
    pub usage: Option<serde_json::Value>,
    pub raw: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(
        url: Option<&str>,
        path: Option<&str>,
        data: Option<&str>,
    ) -> GenerationRequest {
        GenerationRequest {
            prompt: "describe".to_string(),
            image_url: url.map(String::from),
            image_path: path.map(String::from),
            image_data: data.map(String::from),
        }
    }

    #[test]
    fn url_wins_over_path_and_data() {
        let source = request(Some("http://host/a.png"), Some("/tmp/a.png"), Some("Zm9v"))
            .image_source();
        assert_eq!(source, Some(ImageSource::Url("http://host/a.png".into())));
    }

    #[test]
    fn path_wins_over_data() {
        let source = request(None, Some("/tmp/a.png"), Some("Zm9v")).image_source();
        assert_eq!(source, Some(ImageSource::Path("/tmp/a.png".into())));
    }

    #[test]
    fn data_is_used_last() {
        let source = request(None, None, Some("Zm9v")).image_source();
        assert_eq!(source, Some(ImageSource::Inline("Zm9v".into())));
    }

    #[test]
    fn empty_strings_fall_through_to_the_next_source() {
        let source = request(Some(""), Some(""), Some("Zm9v")).image_source();
        assert_eq!(source, Some(ImageSource::Inline("Zm9v".into())));
    }

    #[test]
    fn no_image_fields_means_no_source() {
        assert_eq!(request(None, None, None).image_source(), None);
        assert_eq!(request(Some(""), None, Some("")).image_source(), None);
    }

    #[test]
    fn fields_deserialize_from_camel_case() {
        let parsed: GenerationRequest = serde_json::from_str(
            r#"{"prompt":"hi","imageUrl":"http://host/x.png","imagePath":"a.png","imageData":"Zm9v"}"#,
        )
        .unwrap();

        assert_eq!(parsed.prompt, "hi");
        assert_eq!(parsed.image_url.as_deref(), Some("http://host/x.png"));
        assert_eq!(parsed.image_path.as_deref(), Some("a.png"));
        assert_eq!(parsed.image_data.as_deref(), Some("Zm9v"));
    }

    #[test]
    fn missing_fields_default_cleanly() {
        let parsed: GenerationRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.prompt, "");
        assert!(parsed.image_source().is_none());
    }
}
