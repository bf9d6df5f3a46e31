//! Google Translate API provider
//!
//! Integrates with Google Translate API v2, the upstream service the relay
//! forwards batches to.
//!
//! # Authentication
//!
//! The provider loads the API key from the `GOOGLE_TRANSLATE_API_KEY`
//! environment variable. Obtain a key from:
//! https://console.cloud.google.com/

use crate::error::{TranslateError, TranslateResult};
use crate::translator::{MachineTranslator, normalize_locale, validate_locale};
use async_trait::async_trait;
use serde_json::json;

/// Google Translate API v2 provider
///
/// Supports both single and batch translations with automatic sequential
/// request chunking.
#[derive(Clone)]
pub struct GoogleTranslateProvider {
    /// API key for authentication
    api_key: String,
    /// HTTP client for async requests
    client: reqwest::Client,
    /// Base URL for Google Translate API
    base_url: String,
}

impl GoogleTranslateProvider {
    /// Maximum number of texts per API request
    pub const MAX_BATCH_SIZE: usize = 100;

    /// Maximum characters per string (30KB per Google Translate API limits)
    const MAX_CHARS_PER_STRING: usize = 30_000;

    /// Request timeout in seconds
    const TIMEOUT_SECS: u64 = 45;

    /// Create a new provider with an explicit API key
    pub fn new(api_key: String) -> TranslateResult<Self> {
        if api_key.trim().is_empty() {
            return Err(TranslateError::ConfigError(
                "API key cannot be empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(Self::TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                TranslateError::NetworkError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            api_key,
            client,
            base_url: "https://translation.googleapis.com/language/translate/v2".to_string(),
        })
    }

    /// Create a provider from the `GOOGLE_TRANSLATE_API_KEY` environment variable
    pub fn from_env() -> TranslateResult<Self> {
        let api_key = std::env::var("GOOGLE_TRANSLATE_API_KEY").map_err(|_| {
            TranslateError::ConfigError(
                "GOOGLE_TRANSLATE_API_KEY environment variable not set".to_string(),
            )
        })?;

        Self::new(api_key)
    }

    /// Override the API base URL (used to point tests at a local server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Chunk a batch of texts into API-safe sizes
    fn chunk_batch(texts: &[String]) -> Vec<&[String]> {
        texts.chunks(Self::MAX_BATCH_SIZE).collect()
    }

    /// Translate a single chunk of texts via the API
    async fn translate_chunk(
        &self,
        texts: &[String],
        source_locale: &str,
        target_locale: &str,
    ) -> TranslateResult<Vec<String>> {
        validate_locale(source_locale)?;
        validate_locale(target_locale)?;

        let url = format!("{}?key={}", self.base_url, self.api_key);

        let body = json!({
            "q": texts,
            "source": normalize_locale(source_locale),
            "target": normalize_locale(target_locale),
            "format": "text"
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| TranslateError::NetworkError(format!("API request failed: {}", e)))?;

        let http_status = response.status().as_u16();
        let payload: serde_json::Value = response.json().await.map_err(|e| {
            TranslateError::DecodeError(format!("Failed to parse API response: {}", e))
        })?;

        // The API reports failures both through the HTTP status and through
        // an error payload; the payload's code and message win when present.
        if http_status != 200 || payload.get("error").is_some() {
            let status = payload["error"]["code"]
                .as_u64()
                .map(|c| c as u16)
                .unwrap_or(http_status);
            let message = payload["error"]["message"]
                .as_str()
                .unwrap_or("Translation API error")
                .to_string();
            return Err(TranslateError::UpstreamError { status, message });
        }

        let translations = payload["data"]["translations"].as_array().ok_or_else(|| {
            TranslateError::DecodeError(
                "Invalid API response: missing 'data.translations' array".to_string(),
            )
        })?;

        translations
            .iter()
            .map(|t| {
                t["translatedText"]
                    .as_str()
                    .map(|s| s.to_string())
                    .ok_or_else(|| {
                        TranslateError::DecodeError(
                            "Invalid API response: missing 'translatedText' field".to_string(),
                        )
                    })
            })
            .collect()
    }
}

impl std::fmt::Debug for GoogleTranslateProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleTranslateProvider")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl MachineTranslator for GoogleTranslateProvider {
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> TranslateResult<String> {
        validate_locale(source_locale)?;
        validate_locale(target_locale)?;

        if text.is_empty() {
            return Ok(String::new());
        }

        if text.len() > Self::MAX_CHARS_PER_STRING {
            return Err(TranslateError::ValidationError(format!(
                "Text exceeds maximum length of {} characters",
                Self::MAX_CHARS_PER_STRING
            )));
        }

        let results = self
            .translate_chunk(&[text.to_string()], source_locale, target_locale)
            .await?;

        Ok(results.into_iter().next().unwrap_or_default())
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        source_locale: &str,
        target_locale: &str,
    ) -> TranslateResult<Vec<String>> {
        validate_locale(source_locale)?;
        validate_locale(target_locale)?;

        if texts.is_empty() {
            return Ok(Vec::new());
        }

        for (i, text) in texts.iter().enumerate() {
            if text.len() > Self::MAX_CHARS_PER_STRING {
                return Err(TranslateError::ValidationError(format!(
                    "Text at index {} exceeds maximum length of {} characters",
                    i,
                    Self::MAX_CHARS_PER_STRING
                )));
            }
        }

        // Chunks go out one at a time; the next starts only after the
        // previous response resolved.
        let chunks = Self::chunk_batch(texts);
        let mut all_results = Vec::with_capacity(texts.len());
        for chunk in chunks {
            let chunk_results = self
                .translate_chunk(chunk, source_locale, target_locale)
                .await?;
            all_results.extend(chunk_results);
        }

        if all_results.len() != texts.len() {
            return Err(TranslateError::DecodeError(format!(
                "API returned {} translations for {} texts",
                all_results.len(),
                texts.len()
            )));
        }

        Ok(all_results)
    }

    fn provider_name(&self) -> &str {
        "Google Translate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> GoogleTranslateProvider {
        GoogleTranslateProvider::new("test-api-key".to_string())
            .unwrap()
            .with_base_url(format!("{}/language/translate/v2", server.uri()))
    }

    fn success_body(translated: &[&str]) -> serde_json::Value {
        json!({
            "data": {
                "translations": translated
                    .iter()
                    .map(|t| json!({"translatedText": t}))
                    .collect::<Vec<_>>()
            }
        })
    }

    // ========== Initialization Tests ==========

    #[test]
    fn test_new_with_valid_key() {
        let provider = GoogleTranslateProvider::new("test-api-key".to_string());
        assert!(provider.is_ok());
        assert_eq!(provider.unwrap().provider_name(), "Google Translate");
    }

    #[test]
    fn test_new_with_empty_key() {
        match GoogleTranslateProvider::new("".to_string()) {
            Err(TranslateError::ConfigError(msg)) => assert!(msg.contains("empty")),
            _ => panic!("Expected ConfigError"),
        }
    }

    #[test]
    fn test_new_with_whitespace_key() {
        assert!(GoogleTranslateProvider::new("   ".to_string()).is_err());
    }

    #[test]
    fn test_from_env_without_key() {
        unsafe {
            std::env::remove_var("GOOGLE_TRANSLATE_API_KEY");
        }
        match GoogleTranslateProvider::from_env() {
            Err(TranslateError::ConfigError(msg)) => assert!(msg.contains("not set")),
            _ => panic!("Expected ConfigError"),
        }
    }

    // ========== Chunking Tests ==========

    #[test]
    fn test_chunk_under_limit() {
        let texts = vec!["a".to_string(), "b".to_string()];
        let chunks = GoogleTranslateProvider::chunk_batch(&texts);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].len(), 2);
    }

    #[test]
    fn test_chunk_at_limit() {
        let texts = (0..100).map(|i| format!("text{}", i)).collect::<Vec<_>>();
        let chunks = GoogleTranslateProvider::chunk_batch(&texts);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].len(), 100);
    }

    #[test]
    fn test_chunk_over_limit() {
        let texts = (0..250).map(|i| format!("text{}", i)).collect::<Vec<_>>();
        let chunks = GoogleTranslateProvider::chunk_batch(&texts);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 100);
        assert_eq!(chunks[1].len(), 100);
        assert_eq!(chunks[2].len(), 50);
    }

    #[test]
    fn test_chunk_empty() {
        let texts: Vec<String> = vec![];
        assert_eq!(GoogleTranslateProvider::chunk_batch(&texts).len(), 0);
    }

    // ========== Validation Tests ==========

    #[tokio::test]
    async fn test_translate_empty_text() {
        let provider = GoogleTranslateProvider::new("test-key".to_string()).unwrap();
        let result = provider.translate("", "ja", "en").await.unwrap();
        assert_eq!(result, "");
    }

    #[tokio::test]
    async fn test_translate_invalid_target_locale() {
        let provider = GoogleTranslateProvider::new("test-key".to_string()).unwrap();
        assert!(provider.translate("本", "ja", "invalid#code").await.is_err());
    }

    #[tokio::test]
    async fn test_translate_text_too_long() {
        let provider = GoogleTranslateProvider::new("test-key".to_string()).unwrap();
        let long_text = "x".repeat(30_001);
        match provider.translate(&long_text, "ja", "en").await {
            Err(TranslateError::ValidationError(msg)) => assert!(msg.contains("exceeds maximum")),
            _ => panic!("Expected ValidationError"),
        }
    }

    #[tokio::test]
    async fn test_batch_empty() {
        let provider = GoogleTranslateProvider::new("test-key".to_string()).unwrap();
        let texts: Vec<String> = vec![];
        let results = provider.translate_batch(&texts, "ja", "en").await.unwrap();
        assert!(results.is_empty());
    }

    // ========== Wire Contract Tests ==========

    #[tokio::test]
    async fn test_request_shape_and_success_parsing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/language/translate/v2"))
            .and(query_param("key", "test-api-key"))
            .and(body_partial_json(json!({
                "q": ["ようこそ", "続きを読む"],
                "source": "ja",
                "target": "en",
                "format": "text"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(success_body(&["Welcome", "Read more"])),
            )
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let texts = vec!["ようこそ".to_string(), "続きを読む".to_string()];
        let results = provider.translate_batch(&texts, "ja", "en").await.unwrap();
        assert_eq!(results, vec!["Welcome", "Read more"]);
    }

    #[tokio::test]
    async fn test_upstream_error_payload_is_propagated() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": {"code": 403, "message": "Daily limit exceeded"}
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let texts = vec!["ようこそ".to_string()];
        match provider.translate_batch(&texts, "ja", "en").await {
            Err(TranslateError::UpstreamError { status, message }) => {
                assert_eq!(status, 403);
                assert_eq!(message, "Daily limit exceeded");
            }
            other => panic!("Expected UpstreamError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_payload_wins_over_http_200() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": {"code": 429, "message": "Rate limited"}
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let texts = vec!["ようこそ".to_string()];
        match provider.translate_batch(&texts, "ja", "en").await {
            Err(TranslateError::UpstreamError { status, message }) => {
                assert_eq!(status, 429);
                assert_eq!(message, "Rate limited");
            }
            other => panic!("Expected UpstreamError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_success_payload_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let texts = vec!["ようこそ".to_string()];
        assert!(matches!(
            provider.translate_batch(&texts, "ja", "en").await,
            Err(TranslateError::DecodeError(_))
        ));
    }

    // ========== Debug Implementation Test ==========

    #[test]
    fn test_debug_output_masks_api_key() {
        let provider = GoogleTranslateProvider::new("test-key".to_string()).unwrap();
        let debug_str = format!("{:?}", provider);
        assert!(debug_str.contains("***"));
        assert!(!debug_str.contains("test-key"));
    }
}
