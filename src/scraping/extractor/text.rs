//! Text extraction and normalization helpers

use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};

/// Headings that never carry article content
const NAV_HEADINGS: &[&str] = &["references", "see also", "external links"];

/// `div` classes that usually wrap technical explanations
const EXPLANATION_CLASSES: &[&str] = &["explanation", "description", "note", "algorithm"];

/// Minimum words (exclusive) for a code block to be kept
const MIN_CODE_WORDS: usize = 3;

/// Minimum words (exclusive) for a paragraph to be kept
const MIN_PARAGRAPH_WORDS: usize = 5;

/// Whitespace-separated word count
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Collapse whitespace and straighten curly quotes.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'")
}

/// Trimmed text content of an element
pub(super) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Raw `class` attribute (empty if absent)
pub(super) fn class_attr<'a>(element: &ElementRef<'a>) -> &'a str {
    element.value().attr("class").unwrap_or("")
}

/// Whether the `class` attribute contains any of `needles` as a substring
pub(super) fn class_contains(element: &ElementRef<'_>, needles: &[&str]) -> bool {
    let classes = class_attr(element);
    needles.iter().any(|n| classes.contains(n))
}

/// All elements under `root` matching `css`, in document order
pub(super) fn select_all<'a>(root: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => root.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// First element under `root` matching `css`
pub(super) fn select_first<'a>(root: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    let found = root.select(&selector).next();
    found
}

/// Resolve a node id back to an element of `document`
pub(super) fn element_by_id(document: &Html, id: NodeId) -> Option<ElementRef<'_>> {
    document.tree.get(id).and_then(ElementRef::wrap)
}

/// Detach every element under `root` matching `css` for which `keep_out` holds.
pub(super) fn remove_elements<F>(document: &mut Html, root: Option<NodeId>, css: &str, keep_out: F)
where
    F: Fn(&ElementRef<'_>) -> bool,
{
    let ids: Vec<NodeId> = {
        let scope = root
            .and_then(|id| element_by_id(document, id))
            .unwrap_or_else(|| document.root_element());
        select_all(scope, css)
            .into_iter()
            .filter(|e| keep_out(e))
            .map(|e| e.id())
            .collect()
    };

    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// All non-empty, trimmed text fragments of the page joined by spaces
pub(super) fn stripped_strings(document: &Html) -> String {
    document
        .tree
        .root()
        .descendants()
        .filter_map(|node| node.value().as_text())
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text streams collected from a content container
#[derive(Debug, Default)]
pub(super) struct ContentStreams {
    pub headers: Vec<String>,
    pub paragraphs: Vec<String>,
    pub code_blocks: Vec<String>,
}

impl ContentStreams {
    /// Collect code blocks, paragraphs, and headers beneath `container`.
    pub fn collect(container: ElementRef<'_>) -> Self {
        let mut streams = Self::default();

        // The container itself is not a candidate, only its descendants
        for node in container.descendants().skip(1) {
            let Some(element) = ElementRef::wrap(node) else {
                continue;
            };
            let name = element.value().name();
            if !matches!(name, "p" | "pre" | "code" | "div") {
                continue;
            }

            let is_code = matches!(name, "pre" | "code")
                || element.value().classes().any(|c| c == "code");

            if is_code {
                let text = element_text(element);
                if word_count(&text) > MIN_CODE_WORDS {
                    streams.code_blocks.push(format!("Code example: {}", text));
                }
            } else if name == "p" {
                let text = element_text(element);
                if word_count(&text) > MIN_PARAGRAPH_WORDS {
                    streams.paragraphs.push(text);
                }
            } else if class_contains(&element, EXPLANATION_CLASSES) {
                let text = element_text(element);
                if word_count(&text) > MIN_PARAGRAPH_WORDS {
                    streams.paragraphs.push(text);
                }
            }
        }

        for heading in select_all(container, "h1, h2, h3") {
            let text = element_text(heading);
            if !text.is_empty() && !is_nav_heading(&text) {
                streams.headers.push(text);
            }
        }

        streams
    }

    /// Headers, then paragraphs, then code blocks, space separated
    pub fn compose(self) -> String {
        self.headers
            .into_iter()
            .chain(self.paragraphs)
            .chain(self.code_blocks)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn is_nav_heading(text: &str) -> bool {
    let lower = text.to_lowercase();
    NAV_HEADINGS.iter().any(|h| lower.contains(h))
}
