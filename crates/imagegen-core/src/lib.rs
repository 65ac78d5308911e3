//! imagegen Core Library
//!
//! This crate provides:
//! - Image generation adapters (direct provider and OpenRouter)
//! - A unified multimodal result model and response detection
//! - The pluggable `GenerationClient` interface and an HTTP implementation
//! - TOML configuration for request and client defaults

pub mod client;
pub mod config;
pub mod error;
pub mod multimodal;
pub mod vision;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::client::{GenerationClient, HttpGenerationClient};
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::multimodal::{ImageDescriptor, MultimodalResult};
    pub use crate::vision::{
        DirectProviderAdapter, GenerationRequest, OpenRouterAdapter, ResponseFormat,
        generate_image_llm, generate_image_openrouter,
    };
}
