//! HTTP client for the relay service
//!
//! [`RelayClient`] speaks the form-encoded wire contract from
//! [`crate::wire`] and implements [`MachineTranslator`], so a pipeline can
//! run against a relay exactly as it would against a direct API provider.
//!
//! One `translate_batch` call is one HTTP request: chunking stays in the
//! pipeline, which owns the ordering and sequencing guarantees.

use crate::error::{TranslateError, TranslateResult};
use crate::translator::MachineTranslator;
use crate::wire::{Envelope, RELAY_ACTION};
use async_trait::async_trait;

/// Client for a token-gated translation relay endpoint
#[derive(Clone)]
pub struct RelayClient {
    endpoint: String,
    token: String,
    client: reqwest::Client,
}

impl RelayClient {
    /// Request timeout in seconds
    const TIMEOUT_SECS: u64 = 45;

    /// Create a client for `endpoint`, authenticating with `token`
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> TranslateResult<Self> {
        let endpoint = endpoint.into();
        if endpoint.trim().is_empty() {
            return Err(TranslateError::ConfigError(
                "Relay endpoint cannot be empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(Self::TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                TranslateError::NetworkError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            endpoint,
            token: token.into(),
            client,
        })
    }
}

impl std::fmt::Debug for RelayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayClient")
            .field("endpoint", &self.endpoint)
            .field("token", &"***")
            .finish()
    }
}

#[async_trait]
impl MachineTranslator for RelayClient {
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> TranslateResult<String> {
        let texts = vec![text.to_string()];
        let results = self
            .translate_batch(&texts, source_locale, target_locale)
            .await?;
        Ok(results.into_iter().next().unwrap_or_default())
    }

    /// The source language is fixed on the relay side, so `source_locale`
    /// is not part of the wire request.
    async fn translate_batch(
        &self,
        texts: &[String],
        _source_locale: &str,
        target_locale: &str,
    ) -> TranslateResult<Vec<String>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let texts_json = serde_json::to_string(texts)
            .map_err(|e| TranslateError::DecodeError(format!("Failed to encode texts: {}", e)))?;
        let form = [
            ("action", RELAY_ACTION),
            ("texts", texts_json.as_str()),
            ("targetLang", target_locale),
            ("token", self.token.as_str()),
        ];

        let response = self
            .client
            .post(&self.endpoint)
            .form(&form)
            .send()
            .await
            .map_err(|e| TranslateError::NetworkError(format!("Relay request failed: {}", e)))?;

        let status = response.status().as_u16();
        let envelope: Envelope = response.json().await.map_err(|e| {
            TranslateError::DecodeError(format!("Failed to parse relay response: {}", e))
        })?;

        if !envelope.success {
            let message = envelope.message();
            return Err(match status {
                403 => TranslateError::AuthError(message),
                400 => TranslateError::ValidationError(message),
                _ => TranslateError::UpstreamError { status, message },
            });
        }

        let translated = envelope.translations()?;
        if translated.len() != texts.len() {
            return Err(TranslateError::DecodeError(format!(
                "Relay returned {} translations for {} texts",
                translated.len(),
                texts.len()
            )));
        }

        Ok(translated)
    }

    fn provider_name(&self) -> &str {
        "Translation Relay"
    }
}
