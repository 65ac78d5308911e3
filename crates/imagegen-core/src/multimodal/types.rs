//! Multimodal result types
//!
//! The normalized shape every generation adapter returns.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One generated image
///
/// Either field may be set depending on what the backend returned. Both are
/// kept exactly as received; neither is derived from the other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    b64_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    revised_prompt: Option<String>,
}

impl ImageDescriptor {
    /// Create a descriptor from its raw parts
    pub fn new(
        url: Option<String>,
        b64_data: Option<String>,
        revised_prompt: Option<String>,
    ) -> Self {
        Self {
            url,
            b64_data,
            revised_prompt,
        }
    }

    /// Create a descriptor referencing an image by URL
    pub fn from_url(url: impl Into<String>) -> Self {
        Self::new(Some(url.into()), None, None)
    }

    /// Create a descriptor carrying inline image data
    pub fn from_b64(data: impl Into<String>) -> Self {
        Self::new(None, Some(data.into()), None)
    }

    /// Image URL, which may itself be a `data:` URI
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Inline payload (data URI or raw base64)
    pub fn b64_data(&self) -> Option<&str> {
        self.b64_data.as_deref()
    }

    /// Prompt as rewritten by the backend
    pub fn revised_prompt(&self) -> Option<&str> {
        self.revised_prompt.as_deref()
    }

    /// True when neither a URL nor inline data is present
    pub fn is_empty(&self) -> bool {
        self.url.is_none() && self.b64_data.is_none()
    }

    /// True when the image bytes are available without a network fetch
    pub fn is_inline(&self) -> bool {
        self.b64_data.is_some() || self.url.as_deref().is_some_and(is_data_uri)
    }

    /// Decode the inline image bytes
    ///
    /// Prefers `b64_data`; falls back to a `data:` URL. Remote URLs are not
    /// fetched.
    pub fn decode_bytes(&self) -> Result<Vec<u8>> {
        let payload = self
            .b64_data
            .as_deref()
            .or_else(|| self.url.as_deref().filter(|u| is_data_uri(u)))
            .ok_or_else(|| Error::Decode("image has no inline data".to_string()))?;

        decode_payload(payload)
    }

    /// MIME type of the inline image, if it can be determined
    ///
    /// Reads the data URI header when present, otherwise sniffs the decoded
    /// bytes.
    pub fn mime_type(&self) -> Option<&'static str> {
        let payload = self
            .b64_data
            .as_deref()
            .or_else(|| self.url.as_deref().filter(|u| is_data_uri(u)))?;

        if let Some((header, _)) = split_data_uri(payload) {
            return mime_from_header(header);
        }

        let bytes = decode_payload(payload).ok()?;
        sniff_mime_type(&bytes)
    }
}

/// A normalized generation response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultimodalResult {
    /// Narrative text returned alongside the images
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Images in the order the backend returned them
    #[serde(default)]
    pub images: Vec<ImageDescriptor>,
}

impl MultimodalResult {
    /// Create a result
    pub fn new(text: Option<String>, images: Vec<ImageDescriptor>) -> Self {
        Self { text, images }
    }

    /// Text-only result
    pub fn text_only(text: impl Into<String>) -> Self {
        Self::new(Some(text.into()), Vec::new())
    }

    /// Whether any image was returned
    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }

    /// First image, if any
    pub fn first_image(&self) -> Option<&ImageDescriptor> {
        self.images.first()
    }

    /// URLs of every image that has one, in order
    pub fn image_urls(&self) -> Vec<&str> {
        self.images.iter().filter_map(ImageDescriptor::url).collect()
    }

    /// Text content, or an empty string
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

fn is_data_uri(s: &str) -> bool {
    s.starts_with("data:")
}

/// Split `data:<header>,<payload>` into its parts
fn split_data_uri(s: &str) -> Option<(&str, &str)> {
    s.strip_prefix("data:")?.split_once(',')
}

fn decode_payload(payload: &str) -> Result<Vec<u8>> {
    let encoded = match split_data_uri(payload) {
        Some((header, data)) => {
            if !header.ends_with(";base64") {
                return Err(Error::Decode(format!(
                    "data URI is not base64 encoded: {}",
                    header
                )));
            }
            data
        }
        None => payload,
    };

    BASE64
        .decode(encoded.trim())
        .map_err(|e| Error::Decode(format!("Invalid base64: {}", e)))
}

fn mime_from_header(header: &str) -> Option<&'static str> {
    let mime = header.split(';').next()?;
    match mime {
        "image/png" => Some("image/png"),
        "image/jpeg" | "image/jpg" => Some("image/jpeg"),
        "image/webp" => Some("image/webp"),
        "image/gif" => Some("image/gif"),
        _ => None,
    }
}

/// Detect MIME type from image bytes
fn sniff_mime_type(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        Some("image/png")
    } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if data.starts_with(b"RIFF") && data.get(8..12) == Some(b"WEBP") {
        Some("image/webp")
    } else if data.starts_with(b"GIF8") {
        Some("image/gif")
    } else {
        None
    }
}
