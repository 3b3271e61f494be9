//! The fixed stop-word set shared by the build and query paths.

use ahash::AHashSet;
use lazy_static::lazy_static;

/// Stop words dropped by body and query tokenization.
///
/// Three groups: common English function words, domain words that carry no
/// discriminating signal in a football corpus, and tokens (some already
/// stemmed) that occur in virtually every profile.
const STOP_WORDS: &[&str] = &[
    // English function words
    "the", "and", "in", "for", "with", "on", "at", "from", "by", "as", "is", "was", "are", "were",
    "be", "been", "have", "has", "had", "to", "of", "a", "an", "that", "this", "these", "those",
    "it", "its", "or", "but", "not", "what", "which", "who", "when", "where", "why", "how", "all",
    "any", "both", "each", "few", "more", "most", "other", "some", "such", "no", "nor", "only",
    "own", "same", "so", "than", "too", "very", "can", "will", "just", "should", "now",
    // Domain words
    "player", "club", "team", "football", "soccer", "match", "game", "season", "league", "cup",
    "champions", "premier", "la", "bundesliga", "serie", "current", "main", "position",
    "nationality", "birth", "place",
    // Universal tokens, some in post-stem form
    "comprehensive", "international", "performance", "transfermarkt", "injury", "summary",
    "market", "history", "database", "value", "data", "teammat", "sourc", "career", "assist",
    "app", "minut", "available", "national", "significant", "teammate", "transfer", "goal",
];

lazy_static! {
    static ref STOP_WORD_SET: AHashSet<&'static str> = STOP_WORDS.iter().copied().collect();
}

/// Whether `word` (already lowercased) is in the stop-word set.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORD_SET.contains(word)
}
