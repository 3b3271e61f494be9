//! Suffix-stripping stemmer.
//!
//! A deliberately small stemmer: four suffix rules tried in order, first
//! match wins. The length gates keep short words intact ("ring" is not
//! stemmed to "r").

/// Strip a common English suffix from `word`.
///
/// Rules, in order:
/// - `ing` when the word is longer than 5 characters
/// - `ed` when longer than 4
/// - `es` when longer than 4
/// - `s` when longer than 3
///
/// Words that match no rule are returned unchanged. The input must already
/// be lowercase ASCII; the tokenizer guarantees this.
pub fn stem(word: &str) -> &str {
    let n = word.len();
    if word.ends_with("ing") && n > 5 {
        &word[..n - 3]
    } else if word.ends_with("ed") && n > 4 {
        &word[..n - 2]
    } else if word.ends_with("es") && n > 4 {
        &word[..n - 2]
    } else if word.ends_with('s') && n > 3 {
        &word[..n - 1]
    } else {
        word
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ing_suffix() {
        assert_eq!(stem("running"), "runn");
        assert_eq!(stem("goalkeeping"), "goalkeep");
        // Too short for the rule.
        assert_eq!(stem("going"), "going");
    }

    #[test]
    fn test_ed_suffix() {
        assert_eq!(stem("scored"), "scor");
        assert_eq!(stem("played"), "play");
        assert_eq!(stem("used"), "used");
    }

    #[test]
    fn test_es_suffix() {
        assert_eq!(stem("matches"), "match");
        assert_eq!(stem("goes"), "goes");
    }

    #[test]
    fn test_s_suffix() {
        assert_eq!(stem("runs"), "run");
        assert_eq!(stem("goals"), "goal");
        // "was" is exactly 3 characters, below the gate.
        assert_eq!(stem("was"), "was");
    }

    #[test]
    fn test_rule_order() {
        // "ing" is checked before "s"; "innings" only matches the "s" rule.
        assert_eq!(stem("innings"), "inning");
    }

    #[test]
    fn test_unchanged() {
        assert_eq!(stem("messi"), "messi");
        assert_eq!(stem("forward"), "forward");
    }
}
