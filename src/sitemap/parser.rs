//! Sitemap XML parsing
//!
//! Only the document's root element and the `<loc>` children of its entries
//! matter. Namespace prefixes are ignored by matching on local names.

use super::{SitemapError, SitemapResult};
use quick_xml::events::Event;
use quick_xml::Reader;

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// `<sitemapindex>`: locations of further sitemaps
    Index(Vec<String>),

    /// `<urlset>`: page locations
    UrlSet(Vec<String>),

    /// Any other root element
    Unknown,
}

impl SitemapDocument {
    /// Returns the contained locations (empty for `Unknown`)
    pub fn locations(&self) -> &[String] {
        match self {
            Self::Index(locs) | Self::UrlSet(locs) => locs,
            Self::Unknown => &[],
        }
    }
}

/// Parses a sitemap or sitemap index
///
/// The root element decides the kind. Locations are read from
/// `<sitemapindex><sitemap><loc>` or `<urlset><url><loc>`, trimmed, with
/// empty ones dropped.
///
/// # Example
///
/// ```
/// use sitetrawl::sitemap::{parse_sitemap, SitemapDocument};
///
/// let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
///   <url><loc>https://ex.com/a</loc></url>
/// </urlset>"#;
/// assert_eq!(
///     parse_sitemap(xml).unwrap(),
///     SitemapDocument::UrlSet(vec!["https://ex.com/a".to_string()])
/// );
/// ```
pub fn parse_sitemap(xml: &str) -> SitemapResult<SitemapDocument> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut root: Option<Vec<u8>> = None;
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut current = String::new();
    let mut locs = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.local_name().as_ref().to_vec();
                if root.is_none() {
                    root = Some(name.clone());
                }
                path.push(name);
                current.clear();
            }
            Ok(Event::Empty(e)) => {
                if root.is_none() {
                    root = Some(e.local_name().as_ref().to_vec());
                }
            }
            Ok(Event::Text(t)) => {
                if is_entry_loc(&path) {
                    let text = t.unescape().map_err(|e| SitemapError::Xml(e.to_string()))?;
                    current.push_str(&text);
                }
            }
            Ok(Event::CData(c)) => {
                if is_entry_loc(&path) {
                    current.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Ok(Event::End(_)) => {
                if is_entry_loc(&path) {
                    let loc = current.trim();
                    if !loc.is_empty() {
                        locs.push(loc.to_string());
                    }
                    current.clear();
                }
                path.pop();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(SitemapError::Xml(format!(
                    "at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    let document = match root.as_deref() {
        Some(b"sitemapindex") => SitemapDocument::Index(locs),
        Some(b"urlset") => SitemapDocument::UrlSet(locs),
        Some(_) => SitemapDocument::Unknown,
        None => return Err(SitemapError::Xml("document has no root element".to_string())),
    };

    Ok(document)
}

/// True while inside `<root><sitemap|url><loc>`
fn is_entry_loc(path: &[Vec<u8>]) -> bool {
    match path {
        [root, entry, loc] => {
            loc.as_slice() == b"loc"
                && matches!(
                    (root.as_slice(), entry.as_slice()),
                    (b"sitemapindex", b"sitemap") | (b"urlset", b"url")
                )
        }
        _ => false,
    }
}
