//! Text canonicalization used before every comparison.

use std::sync::LazyLock;

use regex::Regex;

/// Anything that is not a word character, whitespace or a hyphen.
static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\p{Alphabetic}\p{N}_\s-]").expect("punctuation pattern is valid")
});

/// Canonicalize `text` for comparison.
///
/// Lowercases, replaces punctuation with spaces, collapses whitespace runs and
/// trims the ends. Idempotent and total over any input.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = PUNCTUATION.replace_all(&lowered, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
