//! Keyword extraction for lexical overlap.
//!
//! # Invariants
//! - Output is a set; token order in the input never matters.
//! - Tokens of three characters or fewer are dropped.
//! - Empty or symbol-only text yields an empty set, never an error.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};

/// Tokens with this many characters or fewer are not significant.
const MIN_TOKEN_CHARS_EXCLUSIVE: usize = 3;

const STOP_WORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "also", "because", "been", "before", "being",
    "below", "between", "both", "could", "does", "doing", "down", "during", "each", "from",
    "further", "have", "having", "here", "into", "just", "more", "most", "once", "only", "other",
    "over", "same", "should", "some", "such", "than", "that", "their", "them", "then", "there",
    "these", "they", "this", "those", "through", "under", "until", "very", "were", "what",
    "when", "where", "which", "while", "will", "with", "would", "your",
];

static NON_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").expect("valid split regex"));
static STOP_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| STOP_WORDS.iter().copied().collect());

/// Extracts significant lowercase tokens from free text.
pub fn extract_keywords(text: &str) -> BTreeSet<String> {
    let lowered = text.to_lowercase();
    NON_WORD_RE
        .split(&lowered)
        .filter(|token| token.chars().count() > MIN_TOKEN_CHARS_EXCLUSIVE)
        .filter(|token| !STOP_SET.contains(token))
        .map(str::to_string)
        .collect()
}

/// Returns whether `token` is on the stop-word list.
pub fn is_stop_word(token: &str) -> bool {
    STOP_SET.contains(token)
}
