//! Error types for imagegen

use thiserror::Error;

/// Result type alias using imagegen's Error
pub type Result<T> = std::result::Result<T, Error>;

/// imagegen error types with helpful messages and suggestions
#[derive(Error, Debug)]
pub enum Error {
    // Integration errors (E100-E199)
    #[error("{dependency} is not installed. Provide a generation client to enable image generation.")]
    IntegrationNotInstalled { dependency: String },

    // Upstream errors (E200-E299)
    #[error("{0}")]
    Upstream(String),

    #[error("Network error: {0}. Check your internet connection.")]
    Network(#[from] reqwest::Error),

    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    // Input errors (E300-E399)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // Decode errors (E400-E499)
    #[error("Failed to decode inline image: {0}")]
    Decode(String),

    // Config errors (E500-E599)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Build an integration-unavailable error naming the missing dependency
    pub fn not_installed(dependency: impl Into<String>) -> Self {
        Self::IntegrationNotInstalled {
            dependency: dependency.into(),
        }
    }

    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::IntegrationNotInstalled { .. } => "E100",
            Self::Upstream(_) => "E200",
            Self::Network(_) => "E201",
            Self::Http { .. } => "E202",
            Self::InvalidRequest(_) => "E300",
            Self::Decode(_) => "E400",
            Self::Config(_) => "E500",
        }
    }

    /// Whether the failure came from the backend rather than from this crate
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream(_) | Self::Network(_) | Self::Http { .. })
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::IntegrationNotInstalled { dependency } => Some(format!(
                "Register a `{}` generation client with the adapter",
                dependency
            )),
            Self::Network(_) => Some("Check internet connection".to_string()),
            Self::Http { status: 401, .. } => Some("Check the API key passed to the client".to_string()),
            Self::Http { status: 402, .. } => Some("Add credits to the provider account".to_string()),
            Self::Config(_) => Some("Inspect config.toml or delete it to restore defaults".to_string()),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Config(format!("{:#}", err))
    }
}
