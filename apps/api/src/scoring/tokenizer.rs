//! Tokenizer — lowercases free text and splits it into filtered keyword candidates.

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Tokens of this length or shorter are discarded.
const MIN_TOKEN_LEN: usize = 3;

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "and", "for", "with", "that", "this", "from", "your", "you", "our", "are", "will",
        "have", "has", "had", "was", "were", "been", "being", "not", "but", "all", "any", "can",
        "into", "about", "over", "such", "their", "them", "they", "who", "what", "when", "where",
        "which", "while", "within", "across", "also", "more", "most", "other", "some", "than",
        "then", "there", "these", "those", "its", "his", "her", "she", "him", "per", "via",
        "able", "etc", "each", "both", "work", "working", "team", "teams", "role", "roles",
        "including", "include", "includes", "must", "should", "would", "could", "may", "well",
        "using", "use", "used", "new", "years", "year", "experience", "strong", "ability",
        "skills", "knowledge", "plus", "preferred", "required", "requirements", "responsibilities",
        "job", "company", "join", "looking", "help", "make", "like", "just", "own", "out",
        "how", "why", "who", "get", "one", "two", "three", "very", "only", "through", "between",
        "need", "needs", "know", "seeking", "seek", "want", "wants", "ideal", "candidate",
    ]
    .into_iter()
    .collect()
});

fn is_token_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '+' | '#' | '.' | '/' | '-')
}

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

/// Splits `text` into lowercase tokens longer than two characters, skipping
/// stop words. Characters outside `[a-z0-9+#./-]` act as separators.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| if is_token_char(c) { c } else { ' ' })
        .collect();

    normalized
        .split_whitespace()
        .filter(|t| t.chars().count() >= MIN_TOKEN_LEN && !is_stop_word(t))
        .map(str::to_string)
        .collect()
}
