//! Barrels: the sharded inverted index on disk.
//!
//! One JSON file per barrel, each holding a slice of the inverted index
//! keyed by term id. Queries only ever read the barrels their terms route
//! to, so a short query touches one to three files.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoutError};

/// One posting: the term frequency of a term in a document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Posting {
    pub tf: u32,
}

/// The inverted-index slice for one term inside a barrel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TermPostings {
    pub token: String,
    pub df: u64,
    pub postings: AHashMap<u64, Posting>,
}

/// Barrel-level counters, kept consistent with the inverted index by
/// [`Barrel::recompute_metadata`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BarrelMetadata {
    pub term_count: u64,
    pub posting_count: u64,
    pub barrel_name: String,
}

/// One shard of the inverted index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Barrel {
    pub metadata: BarrelMetadata,
    pub inverted_index: AHashMap<u64, TermPostings>,
}

impl Barrel {
    /// An empty scaffold, used for the first write into a new shard.
    pub fn empty(name: &str) -> Self {
        Barrel {
            metadata: BarrelMetadata {
                term_count: 0,
                posting_count: 0,
                barrel_name: name.to_string(),
            },
            inverted_index: AHashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.barrel_name
    }

    pub fn get(&self, term_id: u64) -> Option<&TermPostings> {
        self.inverted_index.get(&term_id)
    }

    /// Get or create the entry for `term_id`.
    ///
    /// A fresh entry starts with `df = 0` and no postings; the writer sets
    /// df from the lexicon after inserting the posting.
    pub fn ensure_term(&mut self, term_id: u64, token: &str) -> &mut TermPostings {
        self.inverted_index
            .entry(term_id)
            .or_insert_with(|| TermPostings {
                token: token.to_string(),
                df: 0,
                postings: AHashMap::new(),
            })
    }

    /// Re-derive `term_count` and `posting_count` from the inverted index.
    pub fn recompute_metadata(&mut self) {
        self.metadata.term_count = self.inverted_index.len() as u64;
        self.metadata.posting_count = self
            .inverted_index
            .values()
            .map(|entry| entry.postings.len() as u64)
            .sum();
    }
}

/// Barrel naming: `barrel_NNN` with a zero-padded shard index.
pub fn barrel_name(shard: u32) -> String {
    format!("barrel_{shard:03}")
}

/// Parse the shard index back out of a barrel name.
pub fn parse_barrel_name(name: &str) -> Option<u32> {
    name.strip_prefix("barrel_")?.parse().ok()
}

/// Reads and writes barrel files under the barrel directory.
#[derive(Debug, Clone)]
pub struct BarrelStore {
    dir: PathBuf,
}

impl BarrelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        BarrelStore { dir: dir.into() }
    }

    fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    /// Read a barrel, returning `None` when the file does not exist.
    ///
    /// A file that exists but does not parse is a corrupt barrel.
    pub fn read(&self, name: &str) -> Result<Option<Barrel>> {
        let path = self.path_of(name);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let barrel: Barrel = serde_json::from_reader(BufReader::new(file))
            .map_err(|err| ScoutError::corrupt_barrel(name, err.to_string()))?;
        Ok(Some(barrel))
    }

    /// Write a barrel to its file, creating the directory if needed.
    pub fn write(&self, barrel: &Barrel) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_of(barrel.name());
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, barrel)?;
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_barrel_naming() {
        assert_eq!(barrel_name(7), "barrel_007");
        assert_eq!(parse_barrel_name("barrel_007"), Some(7));
        assert_eq!(parse_barrel_name("segment_007"), None);
    }

    #[test]
    fn test_ensure_term_and_metadata() {
        let mut barrel = Barrel::empty("barrel_000");
        let entry = barrel.ensure_term(3, "striker");
        entry.postings.insert(10, Posting { tf: 2 });
        entry.postings.insert(11, Posting { tf: 1 });
        entry.df = 2;
        barrel.ensure_term(4, "winger").postings.insert(10, Posting { tf: 1 });
        barrel.recompute_metadata();

        assert_eq!(barrel.metadata.term_count, 2);
        assert_eq!(barrel.metadata.posting_count, 3);
    }

    #[test]
    fn test_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = BarrelStore::new(dir.path());

        assert!(store.read("barrel_000").unwrap().is_none());

        let mut barrel = Barrel::empty("barrel_000");
        barrel.ensure_term(0, "striker").postings.insert(5, Posting { tf: 3 });
        barrel.recompute_metadata();
        store.write(&barrel).unwrap();

        let loaded = store.read("barrel_000").unwrap().unwrap();
        assert_eq!(loaded, barrel);
        assert_eq!(loaded.get(0).unwrap().postings[&5].tf, 3);
    }

    #[test]
    fn test_corrupt_barrel() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("barrel_001.json"), b"{not json").unwrap();
        let store = BarrelStore::new(dir.path());
        let err = store.read("barrel_001").unwrap_err();
        assert!(matches!(err, ScoutError::CorruptBarrel { .. }));
    }
}
