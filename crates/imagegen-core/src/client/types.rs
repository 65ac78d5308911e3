//! Chat completion types
//!
//! These types match the OpenAI-compatible format OpenRouter uses when a
//! completion is asked for image output. Message fields are read leniently:
//! an unexpected content, image entry or missing message degrades to an
//! empty value instead of failing the completion.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Named parameters for one outbound call
pub type CallParams = Map<String, Value>;

/// Response from the chat completions API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletion {
    /// Unique identifier for this completion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Model used for the completion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Candidate choices
    #[serde(default, deserialize_with = "null_as_default")]
    pub choices: Vec<ChatChoice>,
}

impl ChatCompletion {
    /// Build a completion with a single choice
    pub fn single(message: ChatMessage) -> Self {
        Self {
            id: None,
            model: None,
            choices: vec![ChatChoice { index: 0, message }],
        }
    }

    /// Message of the first choice
    pub fn first_message(&self) -> Option<&ChatMessage> {
        self.choices.first().map(|choice| &choice.message)
    }
}

/// A single completion choice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatChoice {
    #[serde(default, deserialize_with = "null_as_default")]
    pub index: usize,
    /// Missing or null messages read as an empty message
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: ChatMessage,
}

/// The generated message of a choice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Narrative content, either a plain string or a list of parts
    #[serde(default)]
    pub content: Option<MessageContent>,
    /// Images attached to the message
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_images"
    )]
    pub images: Option<Vec<MessageImage>>,
}

impl ChatMessage {
    /// Create an assistant message with text and images
    pub fn assistant(content: impl Into<String>, images: Vec<MessageImage>) -> Self {
        Self {
            role: Some("assistant".to_string()),
            content: Some(MessageContent::Text(content.into())),
            images: Some(images),
        }
    }

    /// Narrative text of the message, if it carries any
    pub fn text(&self) -> Option<String> {
        self.content.as_ref().and_then(MessageContent::text)
    }
}

/// Message content - a plain string or structured content parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Simple string content
    Text(String),
    /// Structured content with parts
    Parts(Vec<ContentPart>),
    /// Anything else a provider sends
    Other(Value),
}

impl MessageContent {
    /// Plain text of the content
    ///
    /// Text parts are joined with newlines; content with no text part
    /// yields `None`.
    pub fn text(&self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text.clone()),
            Self::Parts(parts) => {
                let texts: Vec<&str> = parts.iter().filter_map(ContentPart::text).collect();
                (!texts.is_empty()).then(|| texts.join("\n"))
            }
            Self::Other(_) => None,
        }
    }
}

/// One part of structured message content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentPart {
    /// Part carrying text, usually `{"type": "text", "text": ...}`
    Text {
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        part_type: Option<String>,
        text: String,
    },
    /// Image or other non-text part
    Other(Value),
}

impl ContentPart {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text.as_str()),
            Self::Other(_) => None,
        }
    }
}

/// An image entry of a chat message
///
/// Providers return either the typed `{"type": "image_url", "image_url":
/// {"url": ...}}` object or a loose key/value mapping; both are accepted.
/// Entries of any other shape are kept as `Other` and carry no URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageImage {
    /// Typed image part
    Structured(ImagePart),
    /// Loose key/value mapping
    Mapping(Map<String, Value>),
    /// Null, string or other unusable entry
    Other(Value),
}

impl MessageImage {
    /// Typed image part referencing `url`
    pub fn structured(url: impl Into<String>) -> Self {
        Self::Structured(ImagePart {
            part_type: Some("image_url".to_string()),
            image_url: ImageUrl { url: url.into() },
        })
    }

    /// Mapping of the form `{"image_url": {"url": url}}`
    pub fn mapping(url: impl Into<String>) -> Self {
        let mut image_url = Map::new();
        image_url.insert("url".to_string(), Value::String(url.into()));

        let mut entry = Map::new();
        entry.insert("image_url".to_string(), Value::Object(image_url));
        Self::Mapping(entry)
    }

    /// The image URL, whichever representation carries it
    ///
    /// Mappings are read at `image_url.url`, then `image_url` as a bare
    /// string, then a top-level `url`.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Structured(part) => Some(part.image_url.url.as_str()),
            Self::Mapping(map) => match map.get("image_url") {
                Some(Value::Object(inner)) => inner.get("url").and_then(Value::as_str),
                Some(Value::String(url)) => Some(url.as_str()),
                _ => map.get("url").and_then(Value::as_str),
            },
            Self::Other(_) => None,
        }
    }
}

/// Typed image part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePart {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub part_type: Option<String>,
    pub image_url: ImageUrl,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `images` that is not an array reads as absent
fn lenient_images<'de, D>(deserializer: D) -> Result<Option<Vec<MessageImage>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(entries)) => Some(
            entries
                .into_iter()
                .map(|entry| {
                    serde_json::from_value(entry.clone()).unwrap_or(MessageImage::Other(entry))
                })
                .collect(),
        ),
        _ => None,
    })
}
