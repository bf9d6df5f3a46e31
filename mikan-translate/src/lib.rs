//! # mikan-translate
//!
//! Cache-aware page translation pipeline with chunked sequential batching.
//!
//! The crate orchestrates one complete translation pass over a document:
//! scan text-bearing nodes, serve repeats from a persistent cache, and send
//! the rest to a translation backend in ordered chunks of at most 100
//! texts, one request in flight at a time. Backends are pluggable through
//! the [`MachineTranslator`] trait: the Google Translate API directly, a
//! token-gated relay service, or a deterministic mock.
//!
//! # Example
//!
//! ```ignore
//! use mikan_translate::{
//!     DiskCache, HtmlDocument, MockMode, MockTranslator, PageTranslator,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let document = HtmlDocument::parse("<p>ようこそ</p>");
//!     let cache = DiskCache::open("translation-cache.json");
//!     let backend = MockTranslator::new(MockMode::Suffix);
//!
//!     let mut translator = PageTranslator::new(document, cache, backend);
//!     let outcome = translator.translate_page("en").await?;
//!     println!("{:?}", outcome);
//!     println!("{}", translator.document().render());
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod document;
pub mod error;
pub mod google_translate;
pub mod html;
pub mod mock;
pub mod pipeline;
pub mod relay;
pub mod scan;
pub mod translator;
pub mod wire;


pub use cache::{
    CACHE_KEY_PREFIX, DiskCache, MemoryCache, TranslationCache, cache_key, decode_text,
    encode_text, parse_cache_key,
};
pub use document::{Document, MemoryDocument, ORIGINAL_TEXT_ATTR, TRANSLATED_ATTR};
pub use error::{TranslateError, TranslateResult};
pub use google_translate::GoogleTranslateProvider;
pub use html::{HtmlDocument, ScanRules};
pub use mock::{MockMode, MockTranslator};
pub use pipeline::{MAX_CHUNK_SIZE, PageTranslator, PassOutcome, PassState, PassSummary};
pub use relay::RelayClient;
pub use scan::is_translatable_text;
pub use translator::{MachineTranslator, normalize_locale, validate_locale};
