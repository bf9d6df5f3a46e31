//! Text eligibility rules for a translation pass
//!
//! A candidate element's text is only worth a network round trip when it
//! carries actual prose. Whitespace, lone characters, and bare numbers are
//! skipped before they ever reach the cache or the backend.

use regex::Regex;
use std::sync::OnceLock;

fn numeric_pattern() -> &'static Regex {
    static NUMERIC: OnceLock<Regex> = OnceLock::new();
    NUMERIC.get_or_init(|| Regex::new(r"^[0-9]+$").expect("numeric pattern is valid"))
}

/// Decide whether a candidate's text should be translated
///
/// Returns `false` for text that is empty after trimming, a single
/// character, or purely numeric. Everything else is translatable.
pub fn is_translatable_text(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }
    if trimmed.chars().count() <= 1 {
        return false;
    }
    if numeric_pattern().is_match(trimmed) {
        return false;
    }
    true
}
