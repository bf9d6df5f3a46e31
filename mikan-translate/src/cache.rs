//! Translation cache: key construction and persistent storage
//!
//! Cache entries are keyed by `(target language, original text)` only, never
//! by document position, so a translation produced for one node is reusable
//! by every node carrying the same text. Entries are never expired.
//!
//! Key layout: `translation_cache_<lang>_<urlsafe-base64-of-text>`. The
//! language component is normalized (lowercase base language, no `-` or `_`),
//! so splitting the key at the first `_` after the prefix is unambiguous.

use crate::error::{TranslateError, TranslateResult};
use crate::translator::normalize_locale;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix shared by every cache key
pub const CACHE_KEY_PREFIX: &str = "translation_cache_";

/// Encode original text into the URL-safe form used inside cache keys
///
/// URL-safe base64 without padding over the UTF-8 bytes. Reversible via
/// [`decode_text`], and injective: two distinct texts never encode to the
/// same string.
pub fn encode_text(text: &str) -> String {
    URL_SAFE_NO_PAD.encode(text.as_bytes())
}

/// Recover original text from its cache-key encoding
pub fn decode_text(encoded: &str) -> TranslateResult<String> {
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|e| TranslateError::DecodeError(format!("invalid text encoding: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| TranslateError::DecodeError(format!("encoded text is not UTF-8: {}", e)))
}

/// Build the cache key for `(target locale, original text)`
///
/// Deterministic and position-independent. The locale is normalized before
/// use, so `en`, `en-US`, and `EN` all share one key space.
pub fn cache_key(target_locale: &str, original_text: &str) -> String {
    format!(
        "{}{}_{}",
        CACHE_KEY_PREFIX,
        normalize_locale(target_locale),
        encode_text(original_text)
    )
}

/// Split a cache key back into `(language, original text)`
pub fn parse_cache_key(key: &str) -> TranslateResult<(String, String)> {
    let rest = key
        .strip_prefix(CACHE_KEY_PREFIX)
        .ok_or_else(|| TranslateError::DecodeError(format!("not a cache key: {}", key)))?;
    let (lang, encoded) = rest
        .split_once('_')
        .ok_or_else(|| TranslateError::DecodeError(format!("malformed cache key: {}", key)))?;
    Ok((lang.to_string(), decode_text(encoded)?))
}

/// Key-value store for translated text
///
/// Writes are idempotent: a key always maps to the same translation, so
/// last-write-wins semantics are safe without locking.
pub trait TranslationCache {
    /// Look up a previously stored translation
    fn get(&self, key: &str) -> Option<String>;

    /// Store a translation. Never invalidated or expired by this system.
    fn put(&mut self, key: &str, value: &str);
}

/// In-memory cache, empty at construction
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: HashMap<String, String>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TranslationCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// File-backed cache persisted as JSON
///
/// Entries survive across runs the way browser-persistent storage survives
/// across page loads. Every `put` writes through to disk; load and save
/// errors are tolerated silently so a corrupt or missing cache file never
/// breaks a translation pass.
#[derive(Debug)]
pub struct DiskCache {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl DiskCache {
    /// Open a cache at `path`, loading existing entries if a valid JSON
    /// file is present
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::load(&path).unwrap_or_default();
        Self { path, entries }
    }

    fn load(path: &Path) -> Option<HashMap<String, String>> {
        let raw = fs::read_to_string(path).ok()?;
        serde_json::from_str(&raw).ok()
    }

    fn save(&self) {
        if let Ok(raw) = serde_json::to_string(&self.entries) {
            let _ = fs::write(&self.path, raw);
        }
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TranslationCache for DiskCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
        self.save();
    }
}
