//! Wire contract between the page translator and the relay service
//!
//! Requests are HTTP POST, form-encoded: `action` (fixed dispatch
//! identifier), `texts` (a JSON-encoded list of strings), `targetLang`, and
//! the authenticity `token`. Responses are a JSON envelope
//! `{success, data}`: on success `data` is a list of `{translatedText}`
//! aligned with request order; on failure `data` is `{message}` and the
//! HTTP status carries the error class.

use crate::error::{TranslateError, TranslateResult};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Dispatch identifier every batch request must carry
pub const RELAY_ACTION: &str = "translate_page";

/// Form fields of a batch request, as the relay receives them
///
/// All fields are optional at the serde layer so the relay can answer
/// missing parameters with a structured 400 instead of a framework
/// rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub action: Option<String>,
    /// JSON-encoded list of strings
    #[serde(default)]
    pub texts: Option<String>,
    #[serde(default, rename = "targetLang")]
    pub target_lang: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

/// One translated string in a success response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranslatedText {
    #[serde(rename = "translatedText")]
    pub translated_text: String,
}

/// Failure payload carried in the envelope's `data` field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailureData {
    pub message: String,
}

/// Response envelope shared by every relay reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    pub data: serde_json::Value,
}

impl Envelope {
    /// Build a success envelope from translated strings, preserving order
    pub fn ok(translations: Vec<TranslatedText>) -> Self {
        Self {
            success: true,
            data: json!(translations),
        }
    }

    /// Build a failure envelope carrying a message
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: json!(FailureData {
                message: message.into()
            }),
        }
    }

    /// Extract the translated strings from a success envelope
    pub fn translations(&self) -> TranslateResult<Vec<String>> {
        let items: Vec<TranslatedText> =
            serde_json::from_value(self.data.clone()).map_err(|e| {
                TranslateError::DecodeError(format!("unexpected response data: {}", e))
            })?;
        Ok(items.into_iter().map(|t| t.translated_text).collect())
    }

    /// Extract the failure message, falling back to a generic one
    pub fn message(&self) -> String {
        serde_json::from_value::<FailureData>(self.data.clone())
            .map(|d| d.message)
            .unwrap_or_else(|_| "Translation request failed".to_string())
    }
}
