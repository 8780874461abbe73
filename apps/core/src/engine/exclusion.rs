//! Exclude-list parsing and token filtering.

use super::relatedness::related;

/// Normalized list of words to suppress.
///
/// Built from a comma-separated string. Entries are trimmed and lowercased,
/// empty entries are dropped and repeated entries are kept once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExcludeSet {
    words: Vec<String>,
}

impl ExcludeSet {
    /// Parses a raw comma-separated exclude string.
    pub fn parse(raw: &str) -> Self {
        let mut words: Vec<String> = Vec::new();
        for entry in raw.split(',') {
            let word = entry.trim().to_lowercase();
            if !word.is_empty() && !words.contains(&word) {
                words.push(word);
            }
        }
        Self { words }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Whether a token must be removed: exact match or a related word.
    pub fn excludes(&self, token: &str) -> bool {
        let lowered = token.to_lowercase();
        self.words.contains(&lowered) || self.words.iter().any(|word| related(&lowered, word))
    }

    /// Keeps the tokens that survive, in input order.
    pub fn filter<'a>(&self, tokens: &[&'a str]) -> Vec<&'a str> {
        if self.is_empty() {
            return tokens.to_vec();
        }
        tokens
            .iter()
            .copied()
            .filter(|token| !self.excludes(token))
            .collect()
    }
}
