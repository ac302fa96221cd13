//! HTML parser for extracting page content and links
//!
//! This module handles parsing HTML content to extract:
//! - Visible text (the input to content fingerprinting)
//! - Page title and meta description
//! - The declared canonical URL
//! - Anchor links to follow

use crate::url::resolve_link;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Elements whose text is never rendered
const HIDDEN_ELEMENTS: [&str; 3] = ["script", "style", "template"];

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedPage {
    /// The page title (first <title>, trimmed; empty if absent)
    pub title: String,

    /// Content of `<meta name="description">`, trimmed; empty if absent
    pub meta_description: String,

    /// Declared canonical URL, resolved against the page URL
    pub canonical: Option<String>,

    /// Visible text, whitespace-joined
    pub text: String,

    /// Absolute URLs of every anchor on the page, in document order
    pub links: Vec<String>,
}

/// Parses HTML content and extracts text, metadata and links
///
/// # Link Extraction Rules
///
/// Every `<a href="...">` is resolved against `base_url`. Links are returned
/// raw: no canonicalization, no domain filtering and no deduplication, so the
/// caller decides what enters the frontier. Hrefs that do not resolve to an
/// http(s) URL (`mailto:`, `javascript:`, garbage) are dropped.
///
/// # Example
///
/// ```
/// use sitetrawl::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.title, "Test");
/// assert_eq!(parsed.links, vec!["https://example.com/page".to_string()]);
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        meta_description: extract_meta_description(&document),
        canonical: extract_canonical(&document, base_url),
        text: extract_visible_text(&document),
        links: extract_links(&document, base_url),
    }
}

/// Extracts the first page title from the HTML document
fn extract_title(document: &Html) -> String {
    first_match(document, "title")
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

fn extract_meta_description(document: &Html) -> String {
    first_match(document, "meta[name='description']")
        .and_then(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
        .unwrap_or_default()
}

/// Extracts the declared canonical link, if any
///
/// An empty href or one that cannot be resolved counts as not declared.
fn extract_canonical(document: &Html, base_url: &Url) -> Option<String> {
    let href = first_match(document, "link[rel~='canonical'][href]")?
        .value()
        .attr("href")?
        .trim();

    if href.is_empty() {
        return None;
    }

    base_url.join(href).ok().map(|url| url.to_string())
}

/// Collects every rendered text node, trimmed, in document order
fn extract_visible_text(document: &Html) -> String {
    let mut parts = Vec::new();

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map_or(false, |el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    parts.join(" ")
}

/// Extracts all resolvable anchor links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(base_url, href))
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .map(|url| url.to_string())
        .collect()
}

fn first_match<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    document.select(&selector).next()
}
