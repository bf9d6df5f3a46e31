//! Environment configuration for the relay

use mikan_translate::{TranslateError, TranslateResult};

/// Runtime configuration, loaded from the environment
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Shared token clients must present
    pub shared_token: String,
    /// Google Translate API key
    pub api_key: String,
    /// Source language of the pages being translated
    pub source_locale: String,
}

impl RelayConfig {
    /// Load configuration from environment variables
    ///
    /// `RELAY_TOKEN` and `GOOGLE_TRANSLATE_API_KEY` are required;
    /// `BIND_ADDR` and `SOURCE_LOCALE` have defaults.
    pub fn from_env() -> TranslateResult<Self> {
        let shared_token = std::env::var("RELAY_TOKEN").map_err(|_| {
            TranslateError::ConfigError("RELAY_TOKEN environment variable not set".to_string())
        })?;
        let api_key = std::env::var("GOOGLE_TRANSLATE_API_KEY").map_err(|_| {
            TranslateError::ConfigError(
                "GOOGLE_TRANSLATE_API_KEY environment variable not set".to_string(),
            )
        })?;

        Ok(Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string()),
            shared_token,
            api_key,
            source_locale: std::env::var("SOURCE_LOCALE").unwrap_or_else(|_| "ja".to_string()),
        })
    }
}
