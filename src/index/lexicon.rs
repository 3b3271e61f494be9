//! The lexicon: the authoritative bidirectional token / term-id map.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One persisted lexicon entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LexiconEntry {
    pub token: String,
    pub df: u64,
    pub term_id: u64,
}

/// Bidirectional map between surface tokens and compact term ids, with a
/// document frequency per term.
///
/// Term ids are assigned once and never reused: a new token always receives
/// `max_term_id + 1`. The on-disk file is ordered by decreasing df at build
/// time; readers must not rely on that ordering once incremental updates
/// have shuffled df values.
#[derive(Debug, Default)]
pub struct Lexicon {
    entries: Vec<LexiconEntry>,
    by_token: AHashMap<String, usize>,
    by_id: AHashMap<u64, usize>,
    max_term_id: Option<u64>,
}

impl Lexicon {
    pub fn new() -> Self {
        Lexicon::default()
    }

    /// Load the lexicon from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let entries: Vec<LexiconEntry> = serde_json::from_reader(reader)?;
        let mut lexicon = Lexicon::new();
        for entry in entries {
            lexicon.insert_entry(entry);
        }
        Ok(lexicon)
    }

    /// Persist the lexicon to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, &self.entries)?;
        Ok(())
    }

    fn insert_entry(&mut self, entry: LexiconEntry) {
        let idx = self.entries.len();
        self.by_token.insert(entry.token.clone(), idx);
        self.by_id.insert(entry.term_id, idx);
        self.max_term_id = Some(self.max_term_id.map_or(entry.term_id, |m| m.max(entry.term_id)));
        self.entries.push(entry);
    }

    /// Look up the term id for `token`.
    pub fn get(&self, token: &str) -> Option<u64> {
        self.by_token.get(token).map(|&idx| self.entries[idx].term_id)
    }

    /// Look up the surface token for `term_id`.
    pub fn token(&self, term_id: u64) -> Option<&str> {
        self.by_id
            .get(&term_id)
            .map(|&idx| self.entries[idx].token.as_str())
    }

    /// Document frequency for `term_id`; zero when the term is unknown.
    pub fn df(&self, term_id: u64) -> u64 {
        self.by_id.get(&term_id).map_or(0, |&idx| self.entries[idx].df)
    }

    /// Increment the document frequency of an existing term by one.
    pub fn increment_df(&mut self, term_id: u64) {
        if let Some(&idx) = self.by_id.get(&term_id) {
            self.entries[idx].df += 1;
        }
    }

    /// Intern `token`, assigning the next term id with `df = 1` when new.
    ///
    /// Returns the (existing or fresh) term id. Interning an existing token
    /// does not touch its df; callers increment it per containing document.
    pub fn intern(&mut self, token: &str) -> u64 {
        if let Some(term_id) = self.get(token) {
            return term_id;
        }
        let term_id = self.next_term_id();
        self.insert_entry(LexiconEntry {
            token: token.to_string(),
            df: 1,
            term_id,
        });
        term_id
    }

    /// Insert an entry with a pre-assigned term id (bulk build path).
    pub fn load_entry(&mut self, entry: LexiconEntry) {
        self.insert_entry(entry);
    }

    /// The id the next new token would receive.
    pub fn next_term_id(&self) -> u64 {
        self.max_term_id.map_or(0, |m| m + 1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LexiconEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_intern_assigns_sequential_ids() {
        let mut lexicon = Lexicon::new();
        assert_eq!(lexicon.intern("striker"), 0);
        assert_eq!(lexicon.intern("winger"), 1);
        // Re-interning returns the existing id without touching df.
        assert_eq!(lexicon.intern("striker"), 0);
        assert_eq!(lexicon.df(0), 1);
    }

    #[test]
    fn test_increment_df() {
        let mut lexicon = Lexicon::new();
        let tid = lexicon.intern("striker");
        lexicon.increment_df(tid);
        assert_eq!(lexicon.df(tid), 2);
        // Unknown ids are ignored.
        lexicon.increment_df(999);
        assert_eq!(lexicon.df(999), 0);
    }

    #[test]
    fn test_bidirectional_lookup() {
        let mut lexicon = Lexicon::new();
        let tid = lexicon.intern("madrid");
        assert_eq!(lexicon.get("madrid"), Some(tid));
        assert_eq!(lexicon.token(tid), Some("madrid"));
        assert_eq!(lexicon.get("barcelona"), None);
    }

    #[test]
    fn test_ids_never_reused_after_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lexicon_complete.json");

        let mut lexicon = Lexicon::new();
        lexicon.intern("striker");
        lexicon.intern("winger");
        lexicon.save(&path).unwrap();

        let mut reloaded = Lexicon::load(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get("winger"), Some(1));
        assert_eq!(reloaded.intern("keeper"), 2);
    }
}
