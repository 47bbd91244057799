//! Tokenizer (C1): lowercase + punctuation-strip + whitespace split with a
//! minimum-token-length filter.
//!
//! Used on both the ingestion path (building [`crate::bm25::LexicalIndex`])
//! and the query path. Any divergence between the two call sites is a
//! correctness bug, so there is exactly one [`tokenize`] function and
//! nothing else calls `str::split_whitespace` on raw passage text.

/// Tokenizes `text` into lowercase, punctuation-free tokens of length > 1.
///
/// 1. Lowercase.
/// 2. Replace every ASCII punctuation character with a space.
/// 3. Split on whitespace.
/// 4. Drop tokens of length <= 1 (chars).
///
/// No stemming, no stopword removal. Stable and deterministic: identical
/// input always produces identical output.
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .chars()
        .map(|c| if c.is_ascii_punctuation() { ' ' } else { c })
        .collect::<String>()
        .to_lowercase();

    cleaned
        .split_whitespace()
        .filter(|tok| tok.chars().count() > 1)
        .map(|tok| tok.to_string())
        .collect()
}
