//! Translation pass orchestration
//!
//! [`PageTranslator`] owns a document, a cache, and a translation backend,
//! and runs complete passes over the document for a target language. A pass
//! scans candidates, serves what it can from the cache, and sends the rest
//! to the backend in ordered chunks of at most [`MAX_CHUNK_SIZE`] texts.
//!
//! Chunks are processed strictly sequentially: chunk *i+1* is never issued
//! before chunk *i* resolves. A chunk failure ends the pass; translations
//! applied by earlier chunks stay applied and cached.
//!
//! A pass moves through an explicit state machine,
//! `Idle → Scanning → AwaitingChunk(i) → Done | Failed`, so the one
//! in-flight-chunk-at-a-time invariant is a structural property of the type
//! rather than an artifact of control flow. `translate_page` takes
//! `&mut self`, which also rules out two concurrent passes over the same
//! document.

use crate::cache::{TranslationCache, cache_key};
use crate::document::{Document, ORIGINAL_TEXT_ATTR, TRANSLATED_ATTR};
use crate::error::{TranslateError, TranslateResult};
use crate::scan::is_translatable_text;
use crate::translator::{MachineTranslator, normalize_locale, validate_locale};
use tracing::{debug, error, info};

/// Maximum number of texts per relay request
///
/// Bounds request size and respects the upstream API's rate limits.
pub const MAX_CHUNK_SIZE: usize = 100;

/// Where a pass currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassState {
    /// No pass has run, or the last pass was a source-language reset
    Idle,
    /// Collecting candidates and resolving cache hits
    Scanning,
    /// Waiting for the response to the given zero-based chunk
    AwaitingChunk(usize),
    /// The last pass completed
    Done,
    /// The last pass aborted on a chunk failure
    Failed,
}

/// Result of a completed pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// The target was the source language; original text was restored and
    /// nothing was sent anywhere
    Reloaded,
    /// A full pass ran
    Completed(PassSummary),
}

/// Counters describing one completed pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Candidates whose text passed the eligibility rules
    pub scanned: usize,
    /// Nodes served directly from the cache
    pub cache_hits: usize,
    /// Texts sent to the backend
    pub requested: usize,
    /// Requests issued
    pub chunks: usize,
}

struct PendingItem<H> {
    text: String,
    handle: H,
    key: String,
}

/// Runs translation passes over a document
pub struct PageTranslator<D, C, T>
where
    D: Document,
    C: TranslationCache,
    T: MachineTranslator,
{
    document: D,
    cache: C,
    backend: T,
    source_locale: String,
    chunk_size: usize,
    state: PassState,
}

impl<D, C, T> PageTranslator<D, C, T>
where
    D: Document,
    C: TranslationCache,
    T: MachineTranslator,
{
    /// Create a translator over the given document, cache, and backend
    ///
    /// The source language defaults to `ja`.
    pub fn new(document: D, cache: C, backend: T) -> Self {
        Self {
            document,
            cache,
            backend,
            source_locale: "ja".to_string(),
            chunk_size: MAX_CHUNK_SIZE,
            state: PassState::Idle,
        }
    }

    /// Set the source/native language of the document
    pub fn with_source_locale(mut self, locale: &str) -> Self {
        self.source_locale = normalize_locale(locale);
        self
    }

    /// Override the chunk size (tests only need small documents this way)
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }

    /// Current pass state
    pub fn state(&self) -> PassState {
        self.state
    }

    /// The owned document
    pub fn document(&self) -> &D {
        &self.document
    }

    /// The owned cache
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Take the document, cache, and backend back out
    pub fn into_parts(self) -> (D, C, T) {
        (self.document, self.cache, self.backend)
    }

    /// Run one full translation pass for `target_locale`
    ///
    /// Selecting the source language restores every node's original text
    /// instead of translating. Re-invoking for the same language is safe:
    /// cache hits short-circuit the network, and the translated-marker
    /// reset picks up content rendered since the last pass.
    ///
    /// On a chunk failure the error is returned and the pass ends; earlier
    /// chunks' translations remain applied and cached.
    pub async fn translate_page(&mut self, target_locale: &str) -> TranslateResult<PassOutcome> {
        validate_locale(target_locale)?;
        let target = normalize_locale(target_locale);

        if target == self.source_locale {
            info!(locale = %target, "target is the source language, restoring original text");
            self.restore_originals();
            self.state = PassState::Idle;
            return Ok(PassOutcome::Reloaded);
        }

        self.state = PassState::Scanning;
        info!(target = %target, backend = self.backend.provider_name(), "translation pass started");

        // Marker state always starts clean; original-text attributes are
        // left untouched.
        self.document.clear_attr(TRANSLATED_ATTR);

        let mut summary = PassSummary::default();
        let mut pending: Vec<PendingItem<D::Handle>> = Vec::new();

        for handle in self.document.candidates() {
            let current = self.document.text(handle);
            let trimmed = current.trim();
            if !is_translatable_text(trimmed) {
                continue;
            }
            summary.scanned += 1;

            // Capture the original text once; later passes key off it even
            // when a translation is currently displayed.
            let original = match self.document.attr(handle, ORIGINAL_TEXT_ATTR) {
                Some(original) => original,
                None => {
                    self.document.set_attr(handle, ORIGINAL_TEXT_ATTR, trimmed);
                    trimmed.to_string()
                }
            };

            let key = cache_key(&target, &original);
            if let Some(cached) = self.cache.get(&key) {
                self.document.set_text(handle, &cached);
                self.document.set_attr(handle, TRANSLATED_ATTR, "true");
                summary.cache_hits += 1;
            } else {
                pending.push(PendingItem {
                    text: original,
                    handle,
                    key,
                });
            }
        }

        debug!(
            scanned = summary.scanned,
            cache_hits = summary.cache_hits,
            pending = pending.len(),
            "scan finished"
        );

        if pending.is_empty() {
            self.state = PassState::Done;
            info!("nothing to request, pass served from cache");
            return Ok(PassOutcome::Completed(summary));
        }

        summary.requested = pending.len();
        summary.chunks = pending.len().div_ceil(self.chunk_size);

        for (index, chunk) in pending.chunks(self.chunk_size).enumerate() {
            self.state = PassState::AwaitingChunk(index);
            let first = index * self.chunk_size + 1;
            let last = index * self.chunk_size + chunk.len();
            debug!(chunk = index, first, last, "requesting chunk");

            let texts: Vec<String> = chunk.iter().map(|item| item.text.clone()).collect();
            let translated = match self
                .backend
                .translate_batch(&texts, &self.source_locale, &target)
                .await
            {
                Ok(translated) => translated,
                Err(e) => {
                    error!(chunk = index, error = %e, "chunk failed, aborting pass");
                    self.state = PassState::Failed;
                    return Err(e);
                }
            };

            if translated.len() != chunk.len() {
                let e = TranslateError::DecodeError(format!(
                    "backend returned {} translations for {} texts",
                    translated.len(),
                    chunk.len()
                ));
                error!(chunk = index, error = %e, "chunk failed, aborting pass");
                self.state = PassState::Failed;
                return Err(e);
            }

            for (item, text) in chunk.iter().zip(translated) {
                self.document.set_text(item.handle, &text);
                self.document.set_attr(item.handle, TRANSLATED_ATTR, "true");
                self.cache.put(&item.key, &text);
            }
        }

        self.state = PassState::Done;
        info!(
            scanned = summary.scanned,
            cache_hits = summary.cache_hits,
            requested = summary.requested,
            chunks = summary.chunks,
            "translation pass finished"
        );
        Ok(PassOutcome::Completed(summary))
    }

    /// Put every translated node back to its captured original text
    fn restore_originals(&mut self) {
        for handle in self.document.candidates() {
            if let Some(original) = self.document.attr(handle, ORIGINAL_TEXT_ATTR) {
                self.document.set_text(handle, &original);
                self.document.remove_attr(handle, TRANSLATED_ATTR);
            }
        }
    }
}
