//! Term extraction shared by index build and query evaluation.
//!
//! A term is a lower-cased, whitespace-delimited token. There is no stemming,
//! no stop-word list and no punctuation stripping: `"India!"` and `"india"`
//! are different terms.

use std::collections::HashSet;

/// Split text into its full token sequence (duplicates kept, order preserved)
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Distinct terms of a text (for document frequency)
pub fn unique_terms(text: &str) -> HashSet<String> {
    tokenize(text).into_iter().collect()
}
