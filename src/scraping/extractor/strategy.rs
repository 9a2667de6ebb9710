//! Site-aware extraction strategies
//!
//! Each strategy decides whether it handles a URL and, if so, turns the
//! parsed document into plain text. The extractor tries strategies in order
//! and always ends with [`GenericStrategy`].

use ego_tree::NodeId;
use scraper::{ElementRef, Html};
use url::Url;

use super::text::{
    class_contains, element_by_id, element_text, remove_elements, select_all, select_first,
    word_count, ContentStreams,
};
use super::types::{ExtractError, ExtractorConfig};

/// A content extraction rule for a family of pages
pub trait ExtractionStrategy: Send + Sync {
    /// Short name used in logs and results
    fn name(&self) -> &'static str;

    /// Whether this strategy handles `url`
    fn matches(&self, url: &Url) -> bool;

    /// Extract the page text. The document may be modified in place.
    fn extract(&self, document: &mut Html, config: &ExtractorConfig) -> Result<String, ExtractError>;
}

/// Wikipedia articles: title, lead paragraphs, then headed sections
pub struct WikipediaStrategy;

/// Headings whose sections are dropped from Wikipedia articles
const WIKIPEDIA_SKIP_HEADINGS: &[&str] =
    &["references", "see also", "external links", "notes", "citations"];

/// Inline markers (citation numbers, `[edit]` links)
const WIKIPEDIA_INLINE_NOISE: &[&str] = &["reference", "edit"];

/// Block-level boilerplate (reference lists, navigation boxes)
const WIKIPEDIA_BLOCK_NOISE: &[&str] = &["reference", "reflist", "navbox", "vertical-navbox"];

/// Wikipedia paragraphs need more than this many words
const WIKIPEDIA_MIN_PARAGRAPH_WORDS: usize = 3;

impl ExtractionStrategy for WikipediaStrategy {
    fn name(&self) -> &'static str {
        "wikipedia"
    }

    fn matches(&self, url: &Url) -> bool {
        url.as_str().contains("wikipedia.org")
    }

    fn extract(&self, document: &mut Html, config: &ExtractorConfig) -> Result<String, ExtractError> {
        let root = document.root_element();
        let title = select_first(root, "#firstHeading")
            .map(|h| format!("{}. ", element_text(h)))
            .unwrap_or_default();

        let container_id: NodeId = select_first(root, "#mw-content-text")
            .map(|c| c.id())
            .ok_or(ExtractError::NoContent)?;

        remove_elements(document, Some(container_id), "sup, span", |e| {
            class_contains(e, WIKIPEDIA_INLINE_NOISE)
        });
        remove_elements(document, Some(container_id), "table, div", |e| {
            class_contains(e, WIKIPEDIA_BLOCK_NOISE)
        });

        let container = element_by_id(document, container_id).ok_or(ExtractError::NoContent)?;

        let lead: Vec<String> = select_all(container, "p")
            .into_iter()
            .take(config.lead_paragraphs)
            .map(element_text)
            .filter(|t| word_count(t) > WIKIPEDIA_MIN_PARAGRAPH_WORDS)
            .collect();

        let sections = collect_sections(container);

        let content = std::iter::once(title)
            .chain(lead)
            .chain(sections)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if word_count(&content) >= config.wikipedia_min_words {
            return Ok(content);
        }

        tracing::debug!("Wikipedia content too small, falling back to raw paragraphs");
        Ok(select_all(container, "p")
            .into_iter()
            .map(element_text)
            .filter(|t| word_count(t) > WIKIPEDIA_MIN_PARAGRAPH_WORDS)
            .collect::<Vec<_>>()
            .join(" "))
    }
}

/// Group paragraphs under the nearest preceding `h2`/`h3`.
fn collect_sections(container: ElementRef<'_>) -> Vec<String> {
    let mut sections = Vec::new();
    let mut heading: Option<String> = None;
    let mut body: Vec<String> = Vec::new();

    for element in section_children(container) {
        let name = element.value().name();
        let heading_element = match name {
            "h2" | "h3" => Some(element),
            "div" if element.value().classes().any(|c| c == "mw-heading") => {
                select_first(element, "h2, h3")
            }
            _ => None,
        };

        if let Some(h) = heading_element {
            if let Some(current) = heading.take() {
                if !body.is_empty() {
                    sections.push(format!("{}. {}", current, body.join(" ")));
                }
            }
            body.clear();

            let text = element_text(h);
            let lower = text.to_lowercase();
            if !WIKIPEDIA_SKIP_HEADINGS.iter().any(|s| lower.contains(s)) {
                heading = Some(text);
            }
        } else if name == "p" && heading.is_some() {
            let text = element_text(element);
            if word_count(&text) > WIKIPEDIA_MIN_PARAGRAPH_WORDS {
                body.push(text);
            }
        }
    }

    if let Some(current) = heading {
        if !body.is_empty() {
            sections.push(format!("{}. {}", current, body.join(" ")));
        }
    }

    sections
}

/// Direct element children, looking through `mw-parser-output` wrappers
fn section_children(container: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut out = Vec::new();
    for child in container.children().filter_map(ElementRef::wrap) {
        if child.value().classes().any(|c| c == "mw-parser-output") {
            out.extend(section_children(child));
        } else {
            out.push(child);
        }
    }
    out
}

/// GeeksForGeeks tutorials: article body with code examples
pub struct GeeksForGeeksStrategy;

impl ExtractionStrategy for GeeksForGeeksStrategy {
    fn name(&self) -> &'static str {
        "geeksforgeeks"
    }

    fn matches(&self, url: &Url) -> bool {
        url.as_str().contains("geeksforgeeks.org")
    }

    fn extract(&self, document: &mut Html, _config: &ExtractorConfig) -> Result<String, ExtractError> {
        let document: &Html = document;
        let root = document.root_element();
        let container = select_first(root, "article.content")
            .or_else(|| select_first(root, "div.article-body"))
            .unwrap_or_else(|| generic_container(document));
        Ok(ContentStreams::collect(container).compose())
    }
}

/// Any other page: common content containers, then the whole document
pub struct GenericStrategy;

impl ExtractionStrategy for GenericStrategy {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn matches(&self, _url: &Url) -> bool {
        true
    }

    fn extract(&self, document: &mut Html, _config: &ExtractorConfig) -> Result<String, ExtractError> {
        Ok(ContentStreams::collect(generic_container(document)).compose())
    }
}

/// Content container candidates, in priority order
const GENERIC_CONTAINERS: &[&str] = &[
    "article, main",
    "div.content, div.main, div.article, div.post-content",
    "div#content, div#main, div#article, div#post-content",
];

fn generic_container(document: &Html) -> ElementRef<'_> {
    let root = document.root_element();
    GENERIC_CONTAINERS
        .iter()
        .find_map(|css| select_first(root, css))
        .unwrap_or(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn filler(topic: &str, n: usize) -> String {
        (0..n).map(|i| format!("{}{}", topic, i)).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_matching_is_by_url_substring() {
        assert!(WikipediaStrategy.matches(&url("https://en.wikipedia.org/wiki/Paris")));
        assert!(!WikipediaStrategy.matches(&url("https://example.com/wiki")));
        assert!(GeeksForGeeksStrategy.matches(&url("https://www.geeksforgeeks.org/binary-search/")));
        assert!(GenericStrategy.matches(&url("https://example.com/")));
    }

    #[test]
    fn test_wikipedia_sections_skip_references() {
        let lead = filler("lead", 40);
        let history = filler("history", 40);
        let geography = filler("geo", 40);
        let html = format!(
            r#"<html><body>
            <h1 id="firstHeading">Paris</h1>
            <div id="mw-content-text"><div class="mw-parser-output">
                <p>{lead}<sup class="reference">[1]</sup></p>
                <div class="mw-heading mw-heading2"><h2>History</h2><span class="mw-editsection">edit</span></div>
                <p>{history}</p>
                <h2>Geography</h2>
                <p>{geography}</p>
                <h2>References</h2>
                <p>Cited work number one, page four.</p>
                <div class="reflist">reference list entries go here</div>
            </div></div>
            </body></html>"#
        );
        let mut doc = Html::parse_document(&html);
        let text = WikipediaStrategy
            .extract(&mut doc, &ExtractorConfig::default())
            .unwrap();

        assert!(text.starts_with("Paris. "));
        assert!(text.contains(&format!("History. {}", history)));
        assert!(text.contains(&format!("Geography. {}", geography)));
        assert!(!text.contains("[1]"));
        assert!(!text.contains("Cited work"));
        assert!(!text.contains("reference list"));
    }

    #[test]
    fn test_wikipedia_without_content_area_is_empty() {
        let mut doc = Html::parse_document("<html><body><p>nothing here at all</p></body></html>");
        let result = WikipediaStrategy.extract(&mut doc, &ExtractorConfig::default());
        assert!(matches!(result, Err(ExtractError::NoContent)));
    }

    #[test]
    fn test_wikipedia_short_structure_falls_back_to_paragraphs() {
        let html = r#"<html><body><div id="mw-content-text">
            <div><p>First nested paragraph with enough words.</p></div>
            <p>Second paragraph also has enough words.</p>
            <p>tiny one</p>
        </div></body></html>"#;
        let mut doc = Html::parse_document(html);
        let text = WikipediaStrategy
            .extract(&mut doc, &ExtractorConfig::default())
            .unwrap();
        assert_eq!(
            text,
            "First nested paragraph with enough words. Second paragraph also has enough words."
        );
    }

    #[test]
    fn test_geeksforgeeks_prefers_article_content() {
        let html = r#"<html><body>
            <nav><p>Navigation text that should not appear anywhere.</p></nav>
            <article class="content">
                <h1>Binary Search</h1>
                <p>Binary search finds a target value within a sorted array.</p>
                <pre>while lo &lt;= hi: mid = (lo + hi) // 2</pre>
            </article>
        </body></html>"#;
        let mut doc = Html::parse_document(html);
        let text = GeeksForGeeksStrategy
            .extract(&mut doc, &ExtractorConfig::default())
            .unwrap();
        assert_eq!(
            text,
            "Binary Search Binary search finds a target value within a sorted array. \
             Code example: while lo <= hi: mid = (lo + hi) // 2"
        );
    }

    #[test]
    fn test_generic_container_priority() {
        let html = r#"<html><body>
            <div id="content"><p>Identified by id, this paragraph should lose.</p></div>
            <div class="post-content"><p>Identified by class, this paragraph should win.</p></div>
        </body></html>"#;
        let mut doc = Html::parse_document(html);
        let text = GenericStrategy
            .extract(&mut doc, &ExtractorConfig::default())
            .unwrap();
        assert_eq!(text, "Identified by class, this paragraph should win.");

        let html = r#"<html><body>
            <div class="content"><p>Class container comes after the main element.</p></div>
            <main><p>The main element is always preferred when present.</p></main>
        </body></html>"#;
        let mut doc = Html::parse_document(html);
        let text = GenericStrategy
            .extract(&mut doc, &ExtractorConfig::default())
            .unwrap();
        assert_eq!(text, "The main element is always preferred when present.");
    }
}
