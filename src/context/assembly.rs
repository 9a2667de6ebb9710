//! Combining stored pages into a single QA context

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::store::StoredPage;
use crate::scraping::extractor::word_count;
use crate::util::truncate_str;

/// Why no usable context could be built
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("No content was extracted from URLs")]
    Empty,
    #[error("No valid content was extracted from URLs")]
    NoValidPages,
    #[error("Not enough valid content extracted from URLs")]
    TooShort { words: usize },
}

/// Size of an assembled context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContextStats {
    /// Pages that contributed
    pub pages: usize,
    /// Words in the combined context
    pub words: usize,
    /// Characters in the combined context
    pub chars: usize,
}

/// Join the usable pages into one context string.
///
/// Pages with fewer than `min_page_words` words are skipped. Each remaining
/// text is trimmed of surrounding whitespace and trailing periods, the texts
/// are joined with `". "`, and a final `"."` is appended.
pub fn build_context(
    pages: &[StoredPage],
    min_page_words: usize,
    min_context_words: usize,
) -> Result<(String, ContextStats), ContextError> {
    if pages.is_empty() {
        return Err(ContextError::Empty);
    }

    let mut valid: Vec<&str> = Vec::with_capacity(pages.len());
    for page in pages {
        let text = page.text.trim();
        let words = word_count(text);
        if words >= min_page_words {
            debug!(url = %page.url, words, sample = %truncate_str(text, 100), "Using page content");
            valid.push(text.trim_end_matches('.'));
        } else {
            debug!(url = %page.url, words, "Skipping short page content");
        }
    }

    if valid.is_empty() {
        return Err(ContextError::NoValidPages);
    }

    let context = format!("{}.", valid.join(". "));
    let words = word_count(&context);
    if words < min_context_words {
        return Err(ContextError::TooShort { words });
    }

    let stats = ContextStats {
        pages: valid.len(),
        words,
        chars: context.chars().count(),
    };
    Ok((context, stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str, text: impl Into<String>) -> StoredPage {
        StoredPage {
            url: url.to_string(),
            text: text.into(),
        }
    }

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_short_pages_are_dropped() {
        let pages = vec![page("a", words(60)), page("b", "only three words")];
        let (context, stats) = build_context(&pages, 10, 50).unwrap();
        assert_eq!(context, format!("{}.", words(60)));
        assert_eq!(stats.pages, 1);
        assert_eq!(stats.words, 60);
    }

    #[test]
    fn test_join_strips_trailing_periods() {
        let pages = vec![
            page("a", format!("  {}...  ", words(30))),
            page("b", format!("{}.", words(30))),
        ];
        let (context, stats) = build_context(&pages, 10, 50).unwrap();
        assert_eq!(context, format!("{}. {}.", words(30), words(30)));
        assert_eq!(stats.pages, 2);
        assert_eq!(stats.chars, context.chars().count());
    }

    #[test]
    fn test_error_cases() {
        assert_eq!(build_context(&[], 10, 50), Err(ContextError::Empty));

        let short = vec![page("a", "tiny")];
        assert_eq!(build_context(&short, 10, 50), Err(ContextError::NoValidPages));

        let thin = vec![page("a", words(20))];
        assert_eq!(
            build_context(&thin, 10, 50),
            Err(ContextError::TooShort { words: 20 })
        );
    }
}
