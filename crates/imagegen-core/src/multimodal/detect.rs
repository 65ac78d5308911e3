//! Provider response detection
//!
//! Adapts a provider-native payload into a [`MultimodalResult`]. Detection
//! never fails: anything it does not recognise is ignored and an empty or
//! partial result is returned.
//!
//! Field mapping:
//!
//! | provider field                                  | result field                    |
//! |-------------------------------------------------|---------------------------------|
//! | `data[].url`                                    | `ImageDescriptor::url`          |
//! | `data[].b64_json`, `data[].b64`, `data[].b64_data` | `ImageDescriptor::b64_data`  |
//! | `data[].revised_prompt`                         | `ImageDescriptor::revised_prompt` |
//! | `data[]` as a bare string                       | `url` for `http(s)://`, else `b64_data` |
//! | `images[]`, `choices[0].message.images[]`       | `url` from `image_url.url` or `url` |
//! | `text`                                          | `MultimodalResult::text`        |
//! | `choices[0].message.content` (string)           | `text`, when `text` is absent   |
//! | `choices[0].message.content[].text` (parts)     | `text`, parts joined by newlines |

use serde_json::Value;

use super::types::{ImageDescriptor, MultimodalResult};

/// Keys that carry inline image data in a `data[]` entry, in priority order
const INLINE_DATA_KEYS: &[&str] = &["b64_json", "b64", "b64_data"];

/// Normalize an arbitrary provider response
pub fn detect_multimodal_response(response: &Value) -> MultimodalResult {
    let Some(object) = response.as_object() else {
        return MultimodalResult::default();
    };

    let message = object
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"));

    let text = object
        .get("text")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| message.and_then(|m| m.get("content")).and_then(content_text));

    let mut images = Vec::new();

    if let Some(data) = object.get("data").and_then(Value::as_array) {
        images.extend(data.iter().filter_map(image_from_data_entry));
    }

    if let Some(entries) = object.get("images").and_then(Value::as_array) {
        images.extend(entries.iter().filter_map(image_from_message_entry));
    }

    if let Some(entries) = message
        .and_then(|m| m.get("images"))
        .and_then(Value::as_array)
    {
        images.extend(entries.iter().filter_map(image_from_message_entry));
    }

    MultimodalResult::new(text, images)
}

/// One entry of an image-generation `data` array
fn image_from_data_entry(entry: &Value) -> Option<ImageDescriptor> {
    if let Some(raw) = entry.as_str() {
        return Some(if is_remote_url(raw) {
            ImageDescriptor::from_url(raw)
        } else {
            ImageDescriptor::from_b64(raw)
        });
    }

    if !entry.is_object() {
        return None;
    }

    let url = string_field(entry, "url");
    let b64_data = INLINE_DATA_KEYS
        .iter()
        .find_map(|key| string_field(entry, key));
    let revised_prompt = string_field(entry, "revised_prompt");

    if url.is_none() && b64_data.is_none() && revised_prompt.is_none() {
        return None;
    }

    Some(ImageDescriptor::new(url, b64_data, revised_prompt))
}

/// One entry of a chat message `images` array
fn image_from_message_entry(entry: &Value) -> Option<ImageDescriptor> {
    let url = entry
        .get("image_url")
        .and_then(|image_url| match image_url {
            Value::String(url) => Some(url.as_str()),
            other => other.get("url").and_then(Value::as_str),
        })
        .or_else(|| entry.get("url").and_then(Value::as_str))?;

    Some(ImageDescriptor::new(
        Some(url.to_string()),
        None,
        string_field(entry, "revised_prompt"),
    ))
}

/// Text of a message `content`, either a string or a list of parts
fn content_text(content: &Value) -> Option<String> {
    match content {
        Value::String(text) => Some(text.clone()),
        Value::Array(parts) => {
            let texts: Vec<&str> = parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect();
            (!texts.is_empty()).then(|| texts.join("\n"))
        }
        _ => None,
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn is_remote_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_data_collection() {
        let result = detect_multimodal_response(&json!({"data": []}));
        assert!(result.images.is_empty());
        assert_eq!(result.text, None);
    }

    #[test]
    fn test_non_object_response() {
        assert_eq!(detect_multimodal_response(&json!(null)), MultimodalResult::default());
        assert_eq!(detect_multimodal_response(&json!([1, 2])), MultimodalResult::default());
        assert_eq!(detect_multimodal_response(&json!("text")), MultimodalResult::default());
    }

    #[test]
    fn test_image_generation_payload() {
        let response = json!({
            "created": 1700000000,
            "data": [
                {"url": "https://example.com/1.png", "revised_prompt": "A beautiful sunset"},
                {"b64_json": "aGVsbG8="}
            ]
        });

        let result = detect_multimodal_response(&response);
        assert_eq!(result.images.len(), 2);
        assert_eq!(result.images[0].url(), Some("https://example.com/1.png"));
        assert_eq!(result.images[0].revised_prompt(), Some("A beautiful sunset"));
        assert_eq!(result.images[0].b64_data(), None);
        assert_eq!(result.images[1].b64_data(), Some("aGVsbG8="));
        assert_eq!(result.images[1].url(), None);
    }

    #[test]
    fn test_url_and_inline_both_preserved() {
        let response = json!({
            "data": [{"url": "https://example.com/1.png", "b64_json": "aGVsbG8="}]
        });
        let result = detect_multimodal_response(&response);
        assert_eq!(result.images[0].url(), Some("https://example.com/1.png"));
        assert_eq!(result.images[0].b64_data(), Some("aGVsbG8="));
    }

    #[test]
    fn test_inline_key_aliases() {
        let response = json!({"data": [{"b64": "AAA="}, {"b64_data": "BBB="}]});
        let result = detect_multimodal_response(&response);
        assert_eq!(result.images[0].b64_data(), Some("AAA="));
        assert_eq!(result.images[1].b64_data(), Some("BBB="));
    }

    #[test]
    fn test_bare_string_entries() {
        let response = json!({"data": ["https://example.com/a.png", "aGVsbG8="]});
        let result = detect_multimodal_response(&response);
        assert_eq!(result.images[0].url(), Some("https://example.com/a.png"));
        assert_eq!(result.images[1].b64_data(), Some("aGVsbG8="));
    }

    #[test]
    fn test_empty_and_unknown_entries_are_skipped() {
        let response = json!({"data": [{}, 42, null, {"seed": 7}, {"url": "https://example.com/a.png"}]});
        let result = detect_multimodal_response(&response);
        assert_eq!(result.images.len(), 1);
    }

    #[test]
    fn test_chat_completion_payload() {
        let response = json!({
            "choices": [{
                "message": {
                    "content": "Here you go",
                    "images": [
                        {"type": "image_url", "image_url": {"url": "data:image/png;base64,abc"}},
                        {"image_url": "https://example.com/b.png"}
                    ]
                }
            }]
        });

        let result = detect_multimodal_response(&response);
        assert_eq!(result.text.as_deref(), Some("Here you go"));
        assert_eq!(
            result.image_urls(),
            vec!["data:image/png;base64,abc", "https://example.com/b.png"]
        );
    }

    #[test]
    fn test_content_parts_text() {
        let response = json!({
            "choices": [{
                "message": {
                    "content": [
                        {"type": "text", "text": "Here"},
                        {"type": "image_url", "image_url": {"url": "https://example.com/a.png"}},
                        {"type": "text", "text": "you go"}
                    ]
                }
            }]
        });
        let result = detect_multimodal_response(&response);
        assert_eq!(result.text.as_deref(), Some("Here\nyou go"));
    }

    #[test]
    fn test_top_level_text_wins() {
        let response = json!({
            "text": "top",
            "choices": [{"message": {"content": "nested"}}]
        });
        let result = detect_multimodal_response(&response);
        assert_eq!(result.text.as_deref(), Some("top"));
    }

    #[test]
    fn test_order_is_preserved_across_sections() {
        let response = json!({
            "data": [{"url": "1"}, {"url": "2"}],
            "images": [{"url": "3"}]
        });
        let result = detect_multimodal_response(&response);
        assert_eq!(result.image_urls(), vec!["1", "2", "3"]);
    }
}
