//! The routing table: which barrel holds which term.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use ahash::AHashMap;

use crate::error::{Result, ScoutError};
use crate::index::barrel::{barrel_name, parse_barrel_name};

/// Maps every term id in the lexicon to the shard that stores its postings.
///
/// The shard count is never stored anywhere: it is inferred as one plus the
/// highest shard index currently routed to. A fresh table therefore needs
/// the bulk builder to have created at least one barrel before the first
/// add-document call.
#[derive(Debug, Default)]
pub struct RoutingTable {
    shards: AHashMap<u64, u32>,
    max_shard: Option<u32>,
}

impl RoutingTable {
    pub fn new() -> Self {
        RoutingTable::default()
    }

    /// Load the table from its JSON file (decimal-string term ids mapped to
    /// barrel names).
    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let wire: AHashMap<u64, String> = serde_json::from_reader(reader)?;
        let mut table = RoutingTable::new();
        for (term_id, name) in wire {
            let shard = parse_barrel_name(&name)
                .ok_or_else(|| ScoutError::index(format!("invalid barrel name '{name}'")))?;
            table.insert(term_id, shard);
        }
        Ok(table)
    }

    /// Persist the table to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let wire: AHashMap<u64, String> = self
            .shards
            .iter()
            .map(|(&term_id, &shard)| (term_id, barrel_name(shard)))
            .collect();
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, &wire)?;
        Ok(())
    }

    /// Shard index for `term_id`, if routed.
    pub fn get(&self, term_id: u64) -> Option<u32> {
        self.shards.get(&term_id).copied()
    }

    /// Barrel name for `term_id`, if routed.
    pub fn barrel_of(&self, term_id: u64) -> Option<String> {
        self.get(term_id).map(barrel_name)
    }

    /// Route a term explicitly (bulk build path).
    pub fn insert(&mut self, term_id: u64, shard: u32) {
        self.shards.insert(term_id, shard);
        self.max_shard = Some(self.max_shard.map_or(shard, |m| m.max(shard)));
    }

    /// Route a new term by the assignment policy: `term_id mod K` where `K`
    /// is the current shard count. Returns the assigned shard index.
    ///
    /// Deterministic given the prior shard set, and never triggers a global
    /// rebalance.
    pub fn assign(&mut self, term_id: u64) -> u32 {
        let shard = (term_id % self.shard_count() as u64) as u32;
        self.insert(term_id, shard);
        shard
    }

    /// One plus the highest shard index observed; 1 for an empty table.
    pub fn shard_count(&self) -> u32 {
        self.max_shard.map_or(1, |m| m + 1)
    }

    pub fn len(&self) -> usize {
        self.shards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, u32)> + '_ {
        self.shards.iter().map(|(&term_id, &shard)| (term_id, shard))
    }
}
