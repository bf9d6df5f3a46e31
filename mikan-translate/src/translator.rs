//! Machine translation trait and locale utilities
//!
//! This module defines the `MachineTranslator` trait for backend abstraction,
//! so the page translation pipeline can run against a real API, a relay
//! service, or a mock without coupling to any specific implementation.

use crate::error::{TranslateError, TranslateResult};
use async_trait::async_trait;

/// Generic trait for machine translation backends
///
/// Implementations handle the actual translation work, whether through an
/// API (Google Translate), a relay service, or deterministic logic (mock).
///
/// All methods are async to support I/O-bound operations like network requests.
#[async_trait]
pub trait MachineTranslator: Send + Sync {
    /// Translate a single text string from source to target locale
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> TranslateResult<String>;

    /// Translate multiple strings in a single batch operation
    ///
    /// # Guarantees
    ///
    /// - Output order matches input order
    /// - Output length equals input length
    /// - Each translation is independent
    async fn translate_batch(
        &self,
        texts: &[String],
        source_locale: &str,
        target_locale: &str,
    ) -> TranslateResult<Vec<String>>;

    /// Name of this backend, used for logging and diagnostics
    fn provider_name(&self) -> &str;
}

/// Normalize a locale code to its base language
///
/// Strips region and script subtags and lowercases the result:
/// - `en-US` → `en`
/// - `zh-Hans` → `zh`
/// - `de_DE` → `de`
/// - `ja` → `ja` (unchanged)
///
/// The output never contains `-` or `_`, which keeps cache keys built from
/// it unambiguous to split.
pub fn normalize_locale(locale: &str) -> String {
    locale
        .split(['-', '_'])
        .next()
        .unwrap_or(locale)
        .to_lowercase()
}

/// Validate that a locale code is in acceptable format
///
/// Accepts only alphanumeric characters, hyphens, and underscores
/// (following ISO 639 conventions).
pub fn validate_locale(locale: &str) -> TranslateResult<()> {
    if locale.is_empty() {
        return Err(TranslateError::InvalidLocale(
            "Locale code is empty".to_string(),
        ));
    }

    if !locale
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(TranslateError::InvalidLocale(format!(
            "Invalid characters in locale code: {}",
            locale
        )));
    }

    Ok(())
}
