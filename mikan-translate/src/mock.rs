//! Mock translation backend for testing
//!
//! A deterministic, API-free implementation of [`MachineTranslator`] for
//! exercising the pipeline without API keys or network access. Records the
//! size of every batch it receives so tests can assert call counts, chunk
//! sizes, and ordering.

use crate::error::{TranslateError, TranslateResult};
use crate::translator::MachineTranslator;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock translation modes for simulating different scenarios
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Append locale suffix: "ようこそ" → "ようこそ_en"
    Suffix,

    /// Use predefined mappings: (text, target_locale) → translation,
    /// falling back to suffix mode for unknown pairs
    Mappings(HashMap<(String, String), String>),

    /// Fail every call with the given message
    Error(String),

    /// Succeed in suffix mode until the given zero-based batch call,
    /// then fail that call and every later one
    FailOnCall(usize, String),

    /// No-op: return input unchanged
    NoOp,
}

/// Mock translator simulating translation backends
#[derive(Debug, Clone)]
pub struct MockTranslator {
    mode: MockMode,
    /// Optional simulated network delay (in milliseconds)
    delay_ms: u64,
    /// Sizes of the batches received, in call order
    batch_sizes: Arc<Mutex<Vec<usize>>>,
}

impl MockTranslator {
    /// Create a new MockTranslator with the given mode
    pub fn new(mode: MockMode) -> Self {
        Self {
            mode,
            delay_ms: 0,
            batch_sizes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a MockTranslator with simulated network delay
    pub fn with_delay(mode: MockMode, delay_ms: u64) -> Self {
        Self {
            delay_ms,
            ..Self::new(mode)
        }
    }

    /// Sizes of the batches received so far, in call order
    ///
    /// Clones share the recording, so a test can keep a handle to the mock
    /// it moved into the pipeline.
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes.lock().expect("batch size lock").clone()
    }

    /// Number of batch calls received so far
    pub fn calls(&self) -> usize {
        self.batch_sizes().len()
    }

    async fn apply_delay(&self) {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
    }

    fn record_batch(&self, size: usize) -> usize {
        let mut sizes = self.batch_sizes.lock().expect("batch size lock");
        sizes.push(size);
        sizes.len() - 1
    }

    fn apply_translation(
        &self,
        text: &str,
        target: &str,
        call_index: usize,
    ) -> TranslateResult<String> {
        match &self.mode {
            MockMode::Suffix => Ok(format!("{}_{}", text, target)),
            MockMode::Mappings(map) => {
                let key = (text.to_string(), target.to_string());
                Ok(map
                    .get(&key)
                    .cloned()
                    .unwrap_or_else(|| format!("{}_{}", text, target)))
            }
            MockMode::Error(msg) => Err(TranslateError::UpstreamError {
                status: 500,
                message: msg.clone(),
            }),
            MockMode::FailOnCall(fail_at, msg) => {
                if call_index >= *fail_at {
                    Err(TranslateError::UpstreamError {
                        status: 500,
                        message: msg.clone(),
                    })
                } else {
                    Ok(format!("{}_{}", text, target))
                }
            }
            MockMode::NoOp => Ok(text.to_string()),
        }
    }
}

#[async_trait]
impl MachineTranslator for MockTranslator {
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

    async fn translate_batch(
        &self,
        texts: &[String],
        _source_locale: &str,
        target_locale: &str,
    ) -> TranslateResult<Vec<String>> {
        self.apply_delay().await;
        let call_index = self.record_batch(texts.len());

        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.apply_translation(text, target_locale, call_index)?);
        }
        Ok(results)
    }

    fn provider_name(&self) -> &str {
        "Mock Translator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== Suffix Mode Tests ==========

    #[tokio::test]
    async fn test_suffix_single_translation() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let result = mock.translate("ようこそ", "ja", "en").await.unwrap();
        assert_eq!(result, "ようこそ_en");
    }

    #[tokio::test]
    async fn test_suffix_batch_preserves_order() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let texts = vec!["一".to_string(), "二".to_string(), "三".to_string()];
        let results = mock.translate_batch(&texts, "ja", "en").await.unwrap();
        assert_eq!(results, vec!["一_en", "二_en", "三_en"]);
    }

    #[tokio::test]
    async fn test_suffix_different_targets() {
        let mock = MockTranslator::new(MockMode::Suffix);
        assert_eq!(mock.translate("本", "ja", "en").await.unwrap(), "本_en");
        assert_eq!(mock.translate("本", "ja", "fr").await.unwrap(), "本_fr");
    }

    // ========== Mapping Mode Tests ==========

    #[tokio::test]
    async fn test_mapping_translation() {
        let mut map = HashMap::new();
        map.insert(
            ("ようこそ".to_string(), "en".to_string()),
            "Welcome".to_string(),
        );
        let mock = MockTranslator::new(MockMode::Mappings(map));
        assert_eq!(
            mock.translate("ようこそ", "ja", "en").await.unwrap(),
            "Welcome"
        );
    }

    #[tokio::test]
    async fn test_mapping_fallback_to_suffix() {
        let mock = MockTranslator::new(MockMode::Mappings(HashMap::new()));
        assert_eq!(
            mock.translate("未登録", "ja", "en").await.unwrap(),
            "未登録_en"
        );
    }

    // ========== Error Mode Tests ==========

    #[tokio::test]
    async fn test_error_mode_fails_batch() {
        let mock = MockTranslator::new(MockMode::Error("quota exceeded".to_string()));
        let texts = vec!["ようこそ".to_string()];
        match mock.translate_batch(&texts, "ja", "en").await {
            Err(TranslateError::UpstreamError { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "quota exceeded");
            }
            other => panic!("Expected UpstreamError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fail_on_call_succeeds_then_fails() {
        let mock = MockTranslator::new(MockMode::FailOnCall(1, "down".to_string()));
        let texts = vec!["ようこそ".to_string()];
        assert!(mock.translate_batch(&texts, "ja", "en").await.is_ok());
        assert!(mock.translate_batch(&texts, "ja", "en").await.is_err());
        assert!(mock.translate_batch(&texts, "ja", "en").await.is_err());
    }

    // ========== NoOp Mode Tests ==========

    #[tokio::test]
    async fn test_noop_returns_unchanged() {
        let mock = MockTranslator::new(MockMode::NoOp);
        let texts = vec!["そのまま".to_string()];
        let results = mock.translate_batch(&texts, "ja", "en").await.unwrap();
        assert_eq!(results, texts);
    }

    // ========== Recording Tests ==========

    #[tokio::test]
    async fn test_batch_sizes_are_recorded_in_order() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let make = |n: usize| (0..n).map(|i| format!("t{}", i)).collect::<Vec<_>>();
        mock.translate_batch(&make(3), "ja", "en").await.unwrap();
        mock.translate_batch(&make(1), "ja", "en").await.unwrap();
        assert_eq!(mock.batch_sizes(), vec![3, 1]);
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn test_clones_share_the_recording() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let handle = mock.clone();
        let texts = vec!["ようこそ".to_string()];
        mock.translate_batch(&texts, "ja", "en").await.unwrap();
        assert_eq!(handle.calls(), 1);
    }

    // ========== Delay Tests ==========

    #[tokio::test]
    async fn test_delay_adds_latency() {
        let mock = MockTranslator::with_delay(MockMode::Suffix, 50);
        let start = std::time::Instant::now();
        let _ = mock.translate("ようこそ", "ja", "en").await.unwrap();
        assert!(start.elapsed().as_millis() >= 50);
    }

    // ========== Provider Name Test ==========

    #[test]
    fn test_provider_name() {
        let mock = MockTranslator::new(MockMode::Suffix);
        assert_eq!(mock.provider_name(), "Mock Translator");
    }
}
