use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Number of keywords reported in a density summary
pub const TOP_KEYWORDS: usize = 10;

/// Shortest alphabetic run counted as a keyword
pub const MIN_KEYWORD_LEN: usize = 3;

/// Keyword-density summary of a page's visible text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordDensity {
    /// Number of keyword tokens in the text (not the whitespace word count)
    pub total_words: usize,

    /// Most frequent keywords, highest count first
    pub top_keywords: Vec<KeywordStat>,
}

/// Frequency of a single keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordStat {
    pub keyword: String,
    pub count: usize,
    /// `count / total_words * 100`, rounded to two decimals
    pub density: f64,
}

/// Builds the keyword-density summary of a text
///
/// Tokens are runs of at least three ASCII letters after lowercasing the
/// whole text; everything else separates tokens. The ten most frequent tokens
/// are reported. Equal counts keep first-encountered order.
///
/// # Examples
///
/// ```
/// use sitetrawl::content::keyword_density;
///
/// let summary = keyword_density("Rust rust RUST is fun");
/// assert_eq!(summary.total_words, 4);
/// assert_eq!(summary.top_keywords[0].keyword, "rust");
/// assert_eq!(summary.top_keywords[0].density, 75.0);
///
/// let empty = keyword_density("a 12 !!");
/// assert_eq!(empty.total_words, 0);
/// assert!(empty.top_keywords.is_empty());
/// ```
pub fn keyword_density(text: &str) -> KeywordDensity {
    let tokens = tokenize(text);
    let total_words = tokens.len();

    if total_words == 0 {
        return KeywordDensity {
            total_words: 0,
            top_keywords: Vec::new(),
        };
    }

    // Counts in first-encountered order, so the stable sort below breaks ties by
    // appearance.
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for token in &tokens {
        match positions.get(token.as_str()) {
            Some(&index) => counts[index].1 += 1,
            None => {
                positions.insert(token.as_str(), counts.len());
                counts.push((token.as_str(), 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let top_keywords = counts
        .into_iter()
        .take(TOP_KEYWORDS)
        .map(|(keyword, count)| KeywordStat {
            keyword: keyword.to_string(),
            count,
            density: round2(count as f64 / total_words as f64 * 100.0),
        })
        .collect();

    KeywordDensity {
        total_words,
        top_keywords,
    }
}

/// Splits text into lowercase alphabetic tokens of at least three letters
fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut tokens = Vec::new();
    let mut current = String::new();

    for c in lowered.chars() {
        if c.is_ascii_alphabetic() {
            current.push(c);
        } else {
            flush_token(&mut current, &mut tokens);
        }
    }
    flush_token(&mut current, &mut tokens);

    tokens
}

fn flush_token(current: &mut String, tokens: &mut Vec<String>) {
    if current.len() >= MIN_KEYWORD_LEN {
        tokens.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

/// Rounds to two decimal places, halves to even
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
