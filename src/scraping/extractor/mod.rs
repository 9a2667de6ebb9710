//! Content extraction from HTML
//!
//! Turns a fetched page into plain prose suitable as QA context:
//! - Strips scripts and styles
//! - Dispatches to a site-aware strategy (Wikipedia, GeeksForGeeks, generic)
//! - Falls back to all visible text when a strategy finds too little
//! - Normalizes whitespace and quotes

mod strategy;
mod text;
mod types;

pub use strategy::{ExtractionStrategy, GeeksForGeeksStrategy, GenericStrategy, WikipediaStrategy};
pub use text::{normalize_text, word_count};
pub use types::*;

use scraper::Html;
use tracing::debug;
use url::Url;

/// Content extractor
pub struct ContentExtractor {
    pub(crate) config: ExtractorConfig,
    /// Site-specific strategies, tried in order
    strategies: Vec<Box<dyn ExtractionStrategy>>,
    /// Used when no site-specific strategy matches
    fallback: GenericStrategy,
}

impl ContentExtractor {
    /// Create an extractor with the built-in strategies
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            config,
            strategies: vec![Box::new(WikipediaStrategy), Box::new(GeeksForGeeksStrategy)],
            fallback: GenericStrategy,
        }
    }

    /// Register an extra strategy. It is tried after the built-in ones and
    /// before the generic fallback.
    pub fn with_strategy(mut self, strategy: impl ExtractionStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    fn strategy_for(&self, url: &Url) -> &dyn ExtractionStrategy {
        self.strategies
            .iter()
            .find(|s| s.matches(url))
            .map(|s| s.as_ref())
            .unwrap_or(&self.fallback)
    }

    /// Extract the readable text of a page
    pub fn extract(&self, html: &str, url: &Url) -> Result<ExtractedContent, ExtractError> {
        let mut document = Html::parse_document(html);
        text::remove_elements(&mut document, None, "script, style", |_| true);

        let strategy = self.strategy_for(url);
        let mut content = strategy.extract(&mut document, &self.config)?;

        let mut used_fallback = false;
        if word_count(&content) < self.config.fallback_word_count {
            debug!(url = %url, strategy = strategy.name(), "Content too small, extracting all text");
            content = text::stripped_strings(&document);
            used_fallback = true;
        }

        let text = normalize_text(&content);
        let words = word_count(&text);
        if words == 0 {
            return Err(ExtractError::NoContent);
        }
        if words < self.config.min_word_count {
            return Err(ExtractError::TooShort(words));
        }

        debug!(
            url = %url,
            strategy = strategy.name(),
            words,
            sample = %crate::util::truncate_str(&text, 200),
            "Extracted content"
        );

        Ok(ExtractedContent {
            url: url.to_string(),
            strategy: strategy.name(),
            text,
            word_count: words,
            used_fallback,
        })
    }
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn sentence(n: usize) -> String {
        (0..n).map(|i| format!("word{}", i)).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_extract_generic_article() {
        let body = sentence(60);
        let html = format!(
            r#"<html><head><title>T</title><style>body {{ color: red; }}</style></head>
            <body><nav>Home About</nav>
            <article><h1>Heading</h1><p>{}</p><script>track();</script></article>
            </body></html>"#,
            body
        );
        let extractor = ContentExtractor::default();
        let content = extractor.extract(&html, &url("https://example.com/post")).unwrap();

        assert_eq!(content.strategy, "generic");
        assert!(!content.used_fallback);
        assert_eq!(content.text, format!("Heading {}", body));
        assert_eq!(content.word_count, 61);
        assert!(!content.text.contains("track"));
        assert!(!content.text.contains("Home"));
    }

    #[test]
    fn test_extract_falls_back_to_all_text() {
        let html = r#"<html><body>
            <div class="sidebar">Alpha beta gamma delta epsilon.</div>
            <p>Zeta eta theta iota kappa lambda.</p>
            <script>var hidden = "never shown";</script>
        </body></html>"#;
        let extractor = ContentExtractor::default();
        let content = extractor.extract(html, &url("https://example.com/")).unwrap();

        assert!(content.used_fallback);
        assert_eq!(
            content.text,
            "Alpha beta gamma delta epsilon. Zeta eta theta iota kappa lambda."
        );
    }

    #[test]
    fn test_extract_rejects_short_pages() {
        let html = "<html><body><p>Just a few words here.</p></body></html>";
        let extractor = ContentExtractor::default();
        let err = extractor.extract(html, &url("https://example.com/")).unwrap_err();
        assert!(matches!(err, ExtractError::TooShort(5)));
    }

    #[test]
    fn test_extract_empty_page() {
        let extractor = ContentExtractor::default();
        let err = extractor
            .extract("<html><body></body></html>", &url("https://example.com/"))
            .unwrap_err();
        assert!(matches!(err, ExtractError::NoContent));
    }

    #[test]
    fn test_extract_normalizes_quotes() {
        let html = format!(
            "<html><body><main><p>\u{201C}Quoted\u{201D} and it\u{2019}s {}</p></main></body></html>",
            sentence(55)
        );
        let extractor = ContentExtractor::default();
        let content = extractor.extract(&html, &url("https://example.com/")).unwrap();
        assert!(content.text.starts_with("\"Quoted\" and it's word0"));
    }

    #[test]
    fn test_wikipedia_dispatch_without_content_area() {
        let html = format!("<html><body><p>{}</p></body></html>", sentence(80));
        let extractor = ContentExtractor::default();
        let err = extractor
            .extract(&html, &url("https://en.wikipedia.org/wiki/Nothing"))
            .unwrap_err();
        assert!(matches!(err, ExtractError::NoContent));
    }

    struct DocsStrategy;

    impl ExtractionStrategy for DocsStrategy {
        fn name(&self) -> &'static str {
            "docs"
        }

        fn matches(&self, url: &Url) -> bool {
            url.host_str() == Some("docs.example.com")
        }

        fn extract(&self, _document: &mut Html, _config: &ExtractorConfig) -> Result<String, ExtractError> {
            Ok(sentence(70))
        }
    }

    #[test]
    fn test_custom_strategy_is_dispatched() {
        let extractor = ContentExtractor::default().with_strategy(DocsStrategy);
        let content = extractor
            .extract("<html></html>", &url("https://docs.example.com/guide"))
            .unwrap();
        assert_eq!(content.strategy, "docs");
        assert_eq!(content.word_count, 70);

        let generic = extractor
            .extract(
                &format!("<html><body><main><p>{}</p></main></body></html>", sentence(60)),
                &url("https://example.com/guide"),
            )
            .unwrap();
        assert_eq!(generic.strategy, "generic");
    }
}
