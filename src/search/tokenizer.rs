//! Text normalisation and tokenisation
//!
//! Pipeline: lowercase → replace punctuation with spaces (the Arabic block
//! U+0600..=U+06FF is kept intact, diacritics included) → split on whitespace
//! → drop tokens of two characters or fewer.

use std::collections::HashSet;
use std::ops::RangeInclusive;

/// Arabic Unicode block, preserved verbatim by the normaliser
const ARABIC_BLOCK: RangeInclusive<char> = '\u{0600}'..='\u{06FF}';

/// Tokens must be strictly longer than this (in chars)
const MAX_DISCARDED_LEN: usize = 2;

/// Characters that survive normalisation inside a token
#[inline]
pub(crate) fn is_token_char(c: char) -> bool {
    c.is_alphanumeric() || ARABIC_BLOCK.contains(&c)
}

/// Lowercase and replace every non-word character with a space.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if is_token_char(c) { c } else { ' ' })
        .collect()
}

/// Tokenize text into index terms.
///
/// ```
/// use prayer_search::search::tokenizer::tokenize;
///
/// assert_eq!(tokenize("Doa Sebelum Makan!"), vec!["doa", "sebelum", "makan"]);
/// assert_eq!(tokenize("di ke rumah"), vec!["rumah"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split_whitespace()
        .filter(|t| t.chars().count() > MAX_DISCARDED_LEN)
        .map(str::to_string)
        .collect()
}

/// Tokenize and deduplicate, keeping first-occurrence order.
pub fn tokenize_unique(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    tokenize(text)
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Collapse whitespace and lowercase, keeping punctuation. Used for phrase
/// lookups and cache keys.
pub fn canonical_query(query: &str) -> String {
    query
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
