use crate::UrlError;
use url::Url;

/// Resolves an href found on a page against that page's URL
///
/// Relative and protocol-relative references are joined onto `base`;
/// absolute references are parsed as-is. Surrounding whitespace is ignored.
/// No scheme filtering happens here, so `mailto:` and friends resolve fine and
/// are rejected later by [`canonicalize`].
///
/// # Examples
///
/// ```
/// use sitetrawl::url::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("http://ex.com/docs/intro").unwrap();
/// let url = resolve_link(&base, " ../faq?x=1#top ").unwrap();
/// assert_eq!(url.as_str(), "http://ex.com/faq?x=1#top");
/// ```
pub fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    base.join(href.trim()).ok()
}

/// Canonicalizes a resolved URL for the frontier
///
/// Keeps scheme, host (with explicit non-default port) and path; drops the
/// query string, the fragment and any userinfo. Only http and https URLs are
/// accepted.
///
/// # Examples
///
/// ```
/// use sitetrawl::url::canonicalize;
/// use url::Url;
///
/// let url = Url::parse("https://ex.com/a/b?utm_source=x#frag").unwrap();
/// assert_eq!(canonicalize(&url).unwrap(), "https://ex.com/a/b");
/// ```
pub fn canonicalize(url: &Url) -> Result<String, UrlError> {
    let scheme = url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(UrlError::InvalidScheme(scheme.to_string()));
    }

    let host = url.host_str().ok_or(UrlError::MissingHost)?;

    let mut canonical = format!("{}://{}", scheme, host);
    if let Some(port) = url.port() {
        canonical.push(':');
        canonical.push_str(&port.to_string());
    }
    canonical.push_str(url.path());

    Ok(canonical)
}

/// Parses and canonicalizes a URL string in one step
pub fn canonicalize_str(url_str: &str) -> Result<String, UrlError> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;
    canonicalize(&url)
}
