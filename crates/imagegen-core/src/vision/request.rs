//! Generation request types

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::CallParams;
use crate::config::GenerationConfig;
use crate::error::{Error, Result};

/// How the backend should return image data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Reference by URL
    #[default]
    Url,
    /// Inline base64 payload
    B64Json,
}

impl ResponseFormat {
    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "url" => Some(Self::Url),
            "b64_json" | "b64" | "base64" | "inline" => Some(Self::B64Json),
            _ => None,
        }
    }

    /// Wire value sent to the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::B64Json => "b64_json",
        }
    }
}

impl std::fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for one image generation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Text description of the image to generate
    pub prompt: String,
    /// Model identifier
    pub model: String,
    /// Backend-defined size, e.g. "1024x1024"
    pub size: String,
    /// Backend-defined quality, e.g. "standard" or "hd"
    pub quality: String,
    /// Style, omitted from the outbound call when `None`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default)]
    pub response_format: ResponseFormat,
    /// Additional parameters forwarded verbatim
    #[serde(default, skip_serializing_if = "CallParams::is_empty")]
    pub extra: CallParams,
}

impl GenerationRequest {
    /// Create a request with the given prompt and model
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        let defaults = GenerationConfig::default();
        Self {
            prompt: prompt.into(),
            model: model.into(),
            size: defaults.size,
            quality: defaults.quality,
            style: None,
            response_format: defaults.response_format,
            extra: CallParams::new(),
        }
    }

    /// Create a request for the direct provider using configured defaults
    pub fn from_config(prompt: impl Into<String>, config: &GenerationConfig) -> Self {
        Self::with_defaults(prompt, config.default_model.clone(), config)
    }

    /// Create a request for OpenRouter using configured defaults
    pub fn openrouter_from_config(prompt: impl Into<String>, config: &GenerationConfig) -> Self {
        Self::with_defaults(prompt, config.openrouter_model.clone(), config)
    }

    fn with_defaults(prompt: impl Into<String>, model: String, config: &GenerationConfig) -> Self {
        Self {
            prompt: prompt.into(),
            model,
            size: config.size.clone(),
            quality: config.quality.clone(),
            style: None,
            response_format: config.response_format,
            extra: CallParams::new(),
        }
    }

    /// Set the image size
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    /// Set the quality
    pub fn with_quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = quality.into();
        self
    }

    /// Set or clear the style
    pub fn with_style(mut self, style: Option<impl Into<String>>) -> Self {
        self.style = style.map(Into::into);
        self
    }

    /// Set the response format
    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = format;
        self
    }

    /// Add one extra named parameter
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// Add several extra named parameters
    pub fn with_params(mut self, params: CallParams) -> Self {
        self.extra.extend(params);
        self
    }

    /// Check required fields
    pub fn validate(&self) -> Result<()> {
        if self.prompt.trim().is_empty() {
            return Err(Error::InvalidRequest("prompt must not be empty".to_string()));
        }
        if self.model.trim().is_empty() {
            return Err(Error::InvalidRequest("model must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Merge extra parameters under a fixed parameter set
///
/// Fixed fields win on key collision.
pub(crate) fn merge_params(fixed: CallParams, extra: &CallParams) -> CallParams {
    let mut params = extra.clone();
    params.extend(fixed);
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_format_parse() {
        assert_eq!(ResponseFormat::parse("url"), Some(ResponseFormat::Url));
        assert_eq!(ResponseFormat::parse("B64_JSON"), Some(ResponseFormat::B64Json));
        assert_eq!(ResponseFormat::parse("inline"), Some(ResponseFormat::B64Json));
        assert_eq!(ResponseFormat::parse("gif"), None);
        assert_eq!(ResponseFormat::B64Json.to_string(), "b64_json");
    }

    #[test]
    fn test_request_builder() {
        let request = GenerationRequest::new("A sunset", "dall-e-3")
            .with_size("1792x1024")
            .with_quality("hd")
            .with_style(Some("vivid"))
            .with_response_format(ResponseFormat::B64Json)
            .with_param("temperature", 0.7);

        assert_eq!(request.prompt, "A sunset");
        assert_eq!(request.size, "1792x1024");
        assert_eq!(request.quality, "hd");
        assert_eq!(request.style.as_deref(), Some("vivid"));
        assert_eq!(request.response_format, ResponseFormat::B64Json);
        assert_eq!(request.extra["temperature"], json!(0.7));
    }

    #[test]
    fn test_with_style_none_clears() {
        let request = GenerationRequest::new("A cat", "stable-diffusion")
            .with_style(Some("vivid"))
            .with_style(None::<String>);
        assert!(request.style.is_none());
    }

    #[test]
    fn test_from_config() {
        let config = GenerationConfig {
            quality: "hd".to_string(),
            ..GenerationConfig::default()
        };
        let direct = GenerationRequest::from_config("A cat", &config);
        assert_eq!(direct.model, config.default_model);
        assert_eq!(direct.quality, "hd");

        let openrouter = GenerationRequest::openrouter_from_config("A cat", &config);
        assert_eq!(openrouter.model, config.openrouter_model);
    }

    #[test]
    fn test_validate() {
        assert!(GenerationRequest::new("A cat", "m").validate().is_ok());

        let err = GenerationRequest::new("   ", "m").validate().unwrap_err();
        assert_eq!(err.code(), "E300");

        assert!(GenerationRequest::new("A cat", "").validate().is_err());
    }

    #[test]
    fn test_merge_params_fixed_wins() {
        let mut fixed = CallParams::new();
        fixed.insert("model".to_string(), json!("dall-e-3"));

        let mut extra = CallParams::new();
        extra.insert("model".to_string(), json!("other"));
        extra.insert("seed".to_string(), json!(42));

        let merged = merge_params(fixed, &extra);
        assert_eq!(merged["model"], json!("dall-e-3"));
        assert_eq!(merged["seed"], json!(42));
    }
}
