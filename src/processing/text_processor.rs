//! Text normalization and tokenization

use std::collections::{HashMap, HashSet};

/// Lower-case the text and replace every character that is not an ASCII
/// letter or whitespace with a single space. Runs of spaces are kept.
pub fn normalize(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_alphabetic() {
                c.to_ascii_lowercase()
            } else if c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect()
}

/// Whitespace-delimited tokens of the normalized text, in document order.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split_whitespace()
        .map(|token| token.to_string())
        .collect()
}

/// Distinct normalized tokens of the text.
pub fn token_set(text: &str) -> HashSet<String> {
    tokenize(text).into_iter().collect()
}

/// Raw term counts over the normalized token stream.
pub fn term_frequencies(text: &str) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for token in tokenize(text) {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

/// The first `max_chars` characters of the text, cut without regard to word
/// boundaries.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
