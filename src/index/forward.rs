//! The forward index: per-document term records.
//!
//! The query path only ever consults `doc_length`; the full term list
//! exists for the incremental writer and for a future proximity scorer
//! (positions are stored but unused at ranking time).

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How many occurrence positions are retained per term per document.
pub const MAX_POSITIONS: usize = 10;

/// One term occurrence inside a document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TermEntry {
    pub term_id: u64,
    pub tf: u32,
    /// First [`MAX_POSITIONS`] occurrence indices within the document's
    /// token stream.
    #[serde(default)]
    pub positions: Vec<u32>,
}

/// The per-document record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForwardEntry {
    pub player_id: u64,
    pub player_name: String,
    pub total_terms: u64,
    pub unique_terms: u64,
    pub terms: Vec<TermEntry>,
}

/// The forward index over the whole corpus.
///
/// Maintains the running sum of `total_terms` so the mean document length
/// used by BM25 is O(1) to read.
#[derive(Debug, Default)]
pub struct ForwardIndex {
    entries: Vec<ForwardEntry>,
    by_id: AHashMap<u64, usize>,
    total_term_sum: u64,
}

impl ForwardIndex {
    pub fn new() -> Self {
        ForwardIndex::default()
    }

    /// Load the forward index from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let entries: Vec<ForwardEntry> = serde_json::from_reader(reader)?;
        let mut index = ForwardIndex::new();
        for entry in entries {
            index.push(entry);
        }
        Ok(index)
    }

    /// Persist the forward index to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, &self.entries)?;
        Ok(())
    }

    fn push(&mut self, entry: ForwardEntry) {
        self.total_term_sum += entry.total_terms;
        self.by_id.insert(entry.player_id, self.entries.len());
        self.entries.push(entry);
    }

    /// Append a new document record. The caller has already checked for
    /// duplicates; appending an existing id would shadow the old record.
    pub fn append(&mut self, entry: ForwardEntry) {
        self.push(entry);
    }

    pub fn get(&self, doc_id: u64) -> Option<&ForwardEntry> {
        self.by_id.get(&doc_id).map(|&idx| &self.entries[idx])
    }

    pub fn contains(&self, doc_id: u64) -> bool {
        self.by_id.contains_key(&doc_id)
    }

    /// Total surviving-token count for `doc_id`.
    pub fn doc_length(&self, doc_id: u64) -> Option<u64> {
        self.get(doc_id).map(|entry| entry.total_terms)
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mean `total_terms` across all documents; zero for an empty corpus.
    pub fn avg_doc_len(&self) -> f64 {
        if self.entries.is_empty() {
            0.0
        } else {
            self.total_term_sum as f64 / self.entries.len() as f64
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ForwardEntry> {
        self.entries.iter()
    }
}
