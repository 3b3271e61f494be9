//! The profile analyzer: body/query and name tokenization.

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::stemmer::stem;
use crate::analysis::stop_words::is_stop_word;

lazy_static! {
    static ref WORD: Regex = Regex::new("[a-z]+").unwrap();
}

/// Tokenizer for profile bodies, queries, and display names.
///
/// `tokenize` is used for everything that is indexed or matched through the
/// inverted index. `tokenize_name` keeps every word of a display name,
/// however short and however common, so that a two-letter surname still
/// matches; only the stemmer is shared between the two paths.
///
/// The analyzer never fails.
#[derive(Debug, Clone, Default)]
pub struct ProfileAnalyzer;

impl ProfileAnalyzer {
    pub fn new() -> Self {
        ProfileAnalyzer
    }

    /// Tokenize body or query text.
    ///
    /// Lowercase, extract maximal `[a-z]+` runs, drop words of length <= 2
    /// and stop words, then stem.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        WORD.find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|word| word.len() > 2 && !is_stop_word(word))
            .map(|word| stem(word).to_string())
            .collect()
    }

    /// Tokenize a display name.
    ///
    /// No stop-word filter and no length gate; the stemmer still applies so
    /// name tokens compare equal to query tokens.
    pub fn tokenize_name(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        WORD.find_iter(&lowered)
            .map(|m| stem(m.as_str()).to_string())
            .collect()
    }
}
