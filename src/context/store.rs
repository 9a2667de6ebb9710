//! In-memory page store

use parking_lot::RwLock;
use serde::Serialize;

use crate::scraping::extractor::word_count;

/// Extracted text of one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredPage {
    pub url: String,
    pub text: String,
}

impl StoredPage {
    pub fn word_count(&self) -> usize {
        word_count(&self.text)
    }
}

/// URL → text mapping that lives for the whole session.
///
/// Pages keep their first insertion position; storing a URL again replaces
/// its text in place. There is no eviction.
#[derive(Debug)]
pub struct ContextStore {
    pages: RwLock<Vec<StoredPage>>,
    min_words: usize,
}

impl ContextStore {
    /// Create a store that refuses pages with fewer than `min_words` words
    pub fn new(min_words: usize) -> Self {
        Self {
            pages: RwLock::new(Vec::new()),
            min_words,
        }
    }

    /// Store or replace the text for `url`. Returns `false` (and stores
    /// nothing) when the text is too short.
    pub fn put(&self, url: impl Into<String>, text: impl Into<String>) -> bool {
        let url = url.into();
        let text = text.into();
        if word_count(&text) < self.min_words {
            return false;
        }

        let mut pages = self.pages.write();
        match pages.iter_mut().find(|p| p.url == url) {
            Some(existing) => existing.text = text,
            None => pages.push(StoredPage { url, text }),
        }
        true
    }

    /// Copy of all pages in insertion order
    pub fn snapshot(&self) -> Vec<StoredPage> {
        self.pages.read().clone()
    }

    pub fn len(&self) -> usize {
        self.pages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.read().is_empty()
    }
}

impl Default for ContextStore {
    fn default() -> Self {
        Self::new(10)
    }
}
