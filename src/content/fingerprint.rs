use sha2::{Digest, Sha256};

/// Computes the content fingerprint of a page's extracted visible text
///
/// The hash is taken over the text the HTML parser produced, never over the
/// raw markup, so two pages that render the same words under different tags
/// share a fingerprint.
///
/// # Examples
///
/// ```
/// use sitetrawl::content::fingerprint;
///
/// let a = fingerprint("Hello world");
/// assert_eq!(a, fingerprint("Hello world"));
/// assert_ne!(a, fingerprint("Hello world!"));
/// assert_eq!(a.len(), 64);
/// ```
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// Returns the number of whitespace-separated tokens in the text
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
