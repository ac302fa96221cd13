use url::Url;

/// Returns the authority used for domain scoping: host plus explicit port
///
/// The host is compared exactly as the URL parser reports it. There is no
/// subdomain folding and no `www.` stripping, so `www.ex.com` and `ex.com`
/// are different domains.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitetrawl::url::authority;
///
/// let url = Url::parse("https://ex.com/path").unwrap();
/// assert_eq!(authority(&url), Some("ex.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:9000/").unwrap();
/// assert_eq!(authority(&url), Some("127.0.0.1:9000".to_string()));
/// ```
pub fn authority(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Returns true if `candidate` lives on the same domain as `seed`
pub fn is_same_domain(candidate: &Url, seed: &Url) -> bool {
    match (authority(candidate), authority(seed)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
