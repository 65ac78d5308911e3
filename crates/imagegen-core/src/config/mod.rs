//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::client::OPENROUTER_BASE_URL;
use crate::vision::ResponseFormat;

/// imagegen configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub generation: GenerationConfig,
    pub client: ClientConfig,
}

/// Defaults applied to new generation requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub default_model: String,
    pub openrouter_model: String,
    pub size: String,
    pub quality: String,
    pub response_format: ResponseFormat,
}

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_model: "dall-e-3".to_string(),
            openrouter_model: "openrouter/google/gemini-2.5-flash-image-preview".to_string(),
            size: "1024x1024".to_string(),
            quality: "standard".to_string(),
            response_format: ResponseFormat::Url,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: OPENROUTER_BASE_URL.to_string(),
            timeout_secs: 120,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?
            .join("imagegen"))
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default location, or defaults if absent
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a file, or defaults if it doesn't exist
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a file
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        self.validate()?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.generation.default_model.trim().is_empty() {
            return Err(anyhow!("generation.default_model must not be empty"));
        }
        if self.generation.openrouter_model.trim().is_empty() {
            return Err(anyhow!("generation.openrouter_model must not be empty"));
        }
        if self.client.timeout_secs == 0 {
            return Err(anyhow!("client.timeout_secs must be greater than zero"));
        }
        if !self.client.base_url.starts_with("http://") && !self.client.base_url.starts_with("https://") {
            return Err(anyhow!("client.base_url must be an http(s) URL"));
        }
        Ok(())
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        match key {
            "generation.default_model" => Ok(self.generation.default_model.clone()),
            "generation.openrouter_model" => Ok(self.generation.openrouter_model.clone()),
            "generation.size" => Ok(self.generation.size.clone()),
            "generation.quality" => Ok(self.generation.quality.clone()),
            "generation.response_format" => Ok(self.generation.response_format.to_string()),
            "client.base_url" => Ok(self.client.base_url.clone()),
            "client.timeout_secs" => Ok(self.client.timeout_secs.to_string()),
            _ => Err(anyhow!("Unknown configuration key: {}", key)),
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "generation.default_model" => {
                self.generation.default_model = non_empty(key, value)?;
            }
            "generation.openrouter_model" => {
                self.generation.openrouter_model = non_empty(key, value)?;
            }
            "generation.size" => {
                self.generation.size = non_empty(key, value)?;
            }
            "generation.quality" => {
                self.generation.quality = non_empty(key, value)?;
            }
            "generation.response_format" => {
                self.generation.response_format = ResponseFormat::parse(value).ok_or_else(|| {
                    anyhow!("Invalid response format: {}. Valid options: url, b64_json", value)
                })?;
            }
            "client.base_url" => {
                if !value.starts_with("http://") && !value.starts_with("https://") {
                    return Err(anyhow!("client.base_url must be an http(s) URL"));
                }
                self.client.base_url = value.to_string();
            }
            "client.timeout_secs" => {
                let secs: u64 = value
                    .parse()
                    .with_context(|| format!("Invalid timeout_secs value: {}", value))?;
                if secs == 0 {
                    return Err(anyhow!("client.timeout_secs must be greater than zero"));
                }
                self.client.timeout_secs = secs;
            }
            "client.api_key" | "api_key" => {
                return Err(anyhow!(
                    "API keys cannot be stored in configuration. Pass the key to the client builder instead."
                ));
            }
            _ => return Err(anyhow!("Unknown configuration key: {}", key)),
        }
        Ok(())
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        let keys = [
            "generation.default_model",
            "generation.openrouter_model",
            "generation.size",
            "generation.quality",
            "generation.response_format",
            "client.base_url",
            "client.timeout_secs",
        ];

        keys.into_iter()
            .map(|key| Ok((key.to_string(), self.get(key)?)))
            .collect()
    }
}

fn non_empty(key: &str, value: &str) -> anyhow::Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(anyhow!("{} must not be empty", key));
    }
    Ok(value.to_string())
}
