//! Bundled stop-word list.
//!
//! English and Romanian function words that carry no meaning on their own.
//! They are dropped from word counts only; the other analysis modes never
//! consult this list.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Stop words for English and Romanian, already lower-cased.
///
/// A few Romanian entries are multi-word phrases ("de ce", "a fost"). Tokens
/// never contain whitespace, so those entries can only match if a caller
/// checks a phrase directly.
pub static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // English
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "with", "by", "of",
        "from", "as", "if", "then", "than", "when", "where", "why", "how", "is", "are", "was",
        "were", "be", "been", "being", "this", "that", "these", "those",
        // Romanian
        "și", "sau", "dar", "în", "pe", "la", "cu", "de", "din", "ca", "dacă", "apoi", "decât",
        "când", "unde", "de ce", "cum", "este", "sunt", "a fost", "au fost", "fi", "fost",
        "fiind", "acest", "acel", "acești", "acei", "cel", "cea", "cei", "cele",
    ]
    .into_iter()
    .collect()
});

/// Returns `true` if `word` (already lower-cased) is a stop word.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_function_words_are_listed() {
        for w in ["the", "and", "of", "those"] {
            assert!(is_stop_word(w), "{w} should be a stop word");
        }
    }

    #[test]
    fn romanian_function_words_are_listed() {
        for w in ["și", "în", "dacă", "acești"] {
            assert!(is_stop_word(w), "{w} should be a stop word");
        }
    }

    #[test]
    fn lookup_expects_lowercase() {
        assert!(!is_stop_word("The"));
        assert!(!is_stop_word("cat"));
    }
}
