//! Document-level types shared by the build, write, and query paths.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::analysis::ProfileAnalyzer;

/// One athlete profile as handed over by the ETL.
///
/// `doc_id` is caller-supplied and must be unique across the corpus. The
/// serde aliases accept the field names used by the processed-profile files,
/// so a corpus file can be deserialized straight into records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Unique numeric document identifier.
    #[serde(alias = "player_id")]
    pub doc_id: u64,

    /// Short display name.
    #[serde(alias = "player_name")]
    pub name: String,

    /// Long free-text body.
    #[serde(alias = "detailed_content", default)]
    pub body: String,
}

impl PlayerRecord {
    pub fn new(doc_id: u64, name: impl Into<String>, body: impl Into<String>) -> Self {
        PlayerRecord {
            doc_id,
            name: name.into(),
            body: body.into(),
        }
    }
}

/// Precomputed name forms consulted by the boost pass.
///
/// Built once per document at load (and once per added document), so the
/// scorer never re-tokenizes names inside the query loop.
#[derive(Debug, Clone)]
pub struct NameMetadata {
    /// Set of stemmed name tokens.
    pub token_set: AHashSet<String>,
    /// Space-joined stemmed name tokens.
    pub normalized: String,
    /// The raw name, lowercased.
    pub raw_lower: String,
}

impl NameMetadata {
    pub fn build(name: &str, analyzer: &ProfileAnalyzer) -> Self {
        let tokens = analyzer.tokenize_name(name);
        let normalized = tokens.join(" ");
        let token_set = tokens.into_iter().collect();
        NameMetadata {
            token_set,
            normalized,
            raw_lower: name.to_lowercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_metadata() {
        let analyzer = ProfileAnalyzer::new();
        let meta = NameMetadata::build("Lionel Messi", &analyzer);
        assert!(meta.token_set.contains("lionel"));
        assert!(meta.token_set.contains("messi"));
        assert_eq!(meta.normalized, "lionel messi");
        assert_eq!(meta.raw_lower, "lionel messi");
    }

    #[test]
    fn test_record_aliases() {
        let json = r#"{"player_id": 7, "player_name": "Kylian Mbappe", "detailed_content": "forward"}"#;
        let record: PlayerRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.doc_id, 7);
        assert_eq!(record.name, "Kylian Mbappe");
        assert_eq!(record.body, "forward");
    }
}
