//! Page retrieval and text extraction
//!
//! Key components:
//! - `FetchEngine`: one HTTP GET per URL with a fixed timeout
//! - `ContentExtractor`: HTML to clean prose via site-aware strategies

pub mod extractor;
pub mod fetcher;

pub use extractor::{ContentExtractor, ExtractError, ExtractedContent, ExtractorConfig};
pub use fetcher::{FetchConfig, FetchEngine, FetchError, FetchResult, FetchStatsSnapshot};
