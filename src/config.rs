//! Configuration for the external model capabilities.
//!
//! Credentials and model selection are process-wide *inputs*, not ambient
//! globals: a [`CapabilityConfig`] is built once (usually via
//! [`CapabilityConfig::from_env`]) and handed to the capability providers and
//! extractor constructors explicitly.

use thiserror::Error;

/// Default base URL for the OpenAI-compatible capability endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Default model for speech transcription.
pub const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Default model for image description.
pub const DEFAULT_VISION_MODEL: &str = "gpt-4o";

/// Default model for excerpt planning.
pub const DEFAULT_EXCERPT_MODEL: &str = "gpt-4o-mini";

/// A required configuration value was absent from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing required environment variable {name}")]
pub struct MissingConfig {
    pub name: &'static str,
}

/// Connection and model selection settings for capability providers.
#[derive(Debug, Clone)]
pub struct CapabilityConfig {
    /// Bearer token for the capability endpoint.
    pub api_key: String,
    /// Base URL of the OpenAI-compatible API, without a trailing slash.
    pub api_base: String,
    /// Model used for `audio -> text` transcription.
    pub transcription_model: String,
    /// Model used for `image -> verbatim text` description.
    pub vision_model: String,
    /// Model used for excerpt planning over a document.
    pub excerpt_model: String,
}

impl CapabilityConfig {
    /// Build a configuration with default endpoint and models.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            transcription_model: DEFAULT_TRANSCRIPTION_MODEL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            excerpt_model: DEFAULT_EXCERPT_MODEL.to_string(),
        }
    }

    /// Load configuration from the environment (and a `.env` file if one is
    /// present).
    ///
    /// `OPENAI_API_KEY` is required; `OPENAI_API_BASE` and the per-capability
    /// model variables fall back to the defaults above.
    pub fn from_env() -> Result<Self, MissingConfig> {
        dotenvy::dotenv().ok();

        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| MissingConfig {
                name: "OPENAI_API_KEY",
            })?;

        let mut config = Self::new(api_key);
        if let Ok(base) = std::env::var("OPENAI_API_BASE") {
            config.api_base = base.trim_end_matches('/').to_string();
        }
        if let Ok(model) = std::env::var("CHUNKSMITH_TRANSCRIPTION_MODEL") {
            config.transcription_model = model;
        }
        if let Ok(model) = std::env::var("CHUNKSMITH_VISION_MODEL") {
            config.vision_model = model;
        }
        if let Ok(model) = std::env::var("CHUNKSMITH_EXCERPT_MODEL") {
            config.excerpt_model = model;
        }
        Ok(config)
    }

    /// Override the API base URL (useful for tests and proxies).
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }
}
