//! Input payload passed to a backend

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Image attached to an invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageInput {
    Url { url: String },
    Base64 { data: String, media_type: String },
}

/// Text/image payload handed to the invocation adapter untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvocationInput {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageInput>,
}

impl InvocationInput {
    /// Create a text-only input
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            images: Vec::new(),
        }
    }

    /// Attach an image by URL
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.images.push(ImageInput::Url { url: url.into() });
        self
    }

    /// Attach an inline base64 image
    pub fn with_image_base64(mut self, data: impl Into<String>, media_type: impl Into<String>) -> Self {
        self.images.push(ImageInput::Base64 {
            data: data.into(),
            media_type: media_type.into(),
        });
        self
    }

    /// Check if the input carries no content at all
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.images.is_empty()
    }

    /// Stable SHA-256 hex digest of the payload, used as a report reference
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.text.as_bytes());

        for image in &self.images {
            hasher.update([0u8]);

            match image {
                ImageInput::Url { url } => hasher.update(url.as_bytes()),
                ImageInput::Base64 { data, media_type } => {
                    hasher.update(media_type.as_bytes());
                    hasher.update(data.as_bytes());
                }
            }
        }

        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_input() {
        let input = InvocationInput::text("Summarize this");
        assert_eq!(input.text, "Summarize this");
        assert!(input.images.is_empty());
        assert!(!input.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(InvocationInput::text("  ").is_empty());
        assert!(!InvocationInput::text("").with_image_url("https://x/y.png").is_empty());
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = InvocationInput::text("hello").with_image_url("https://x/y.png");
        let b = InvocationInput::text("hello").with_image_url("https://x/y.png");
        let c = InvocationInput::text("hello");

        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }

    #[test]
    fn test_image_serialization() {
        let input = InvocationInput::text("describe").with_image_base64("aGk=", "image/png");
        let json = serde_json::to_string(&input).unwrap();
        assert!(json.contains("\"type\":\"base64\""));
        assert!(json.contains("\"media_type\":\"image/png\""));
    }
}
