//! URL handling module for Sitetrawl
//!
//! Link resolution, canonicalization and same-domain scoping. The frontier
//! only ever sees canonical URLs produced here.

mod domain;
mod normalize;

pub use domain::{authority, is_same_domain};
pub use normalize::{canonicalize, canonicalize_str, resolve_link};

use ::url::Url;

/// Turns an href into a frontier candidate, or `None` if it must not be crawled
///
/// The href is resolved against `page_url`, reduced to its canonical form and
/// kept only if it is an http(s) URL on the seed's domain.
///
/// # Examples
///
/// ```
/// use sitetrawl::url::frontier_candidate;
/// use url::Url;
///
/// let seed = Url::parse("http://ex.com/a").unwrap();
/// assert_eq!(
///     frontier_candidate(&seed, "/b?ref=nav", &seed),
///     Some("http://ex.com/b".to_string())
/// );
/// assert_eq!(frontier_candidate(&seed, "http://other.com/x", &seed), None);
/// ```
pub fn frontier_candidate(page_url: &Url, href: &str, seed: &Url) -> Option<String> {
    let resolved = resolve_link(page_url, href)?;

    if !is_same_domain(&resolved, seed) {
        return None;
    }

    canonicalize(&resolved).ok()
}
