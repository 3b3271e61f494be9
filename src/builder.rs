//! Bulk index construction from an ETL record stream.
//!
//! Builds all three index layers plus the routing table in one pass and
//! writes them to disk. This is also what bootstraps the shard count: the
//! add path infers its `K` from the routing table this builder wrote, so a
//! corpus must be built (even from an empty record list it writes the
//! routing table) before the first add-document call.

use log::info;

use crate::analysis::ProfileAnalyzer;
use crate::document::PlayerRecord;
use crate::engine::config::{IndexPaths, SearchConfig};
use crate::error::Result;
use crate::index::barrel::{Barrel, BarrelStore, Posting, barrel_name};
use crate::index::forward::{ForwardEntry, ForwardIndex, MAX_POSITIONS, TermEntry};
use crate::index::lexicon::{Lexicon, LexiconEntry};
use crate::index::routing::RoutingTable;

use ahash::{AHashMap, AHashSet};

/// Statistics for one bulk build.
#[derive(Debug, Clone)]
pub struct BuildStats {
    pub documents: usize,
    pub terms: usize,
    pub barrels: u32,
}

/// Builds a fresh index under a data root.
#[derive(Debug)]
pub struct IndexBuilder {
    paths: IndexPaths,
    config: SearchConfig,
    analyzer: ProfileAnalyzer,
}

impl IndexBuilder {
    pub fn new(data_root: impl Into<std::path::PathBuf>) -> Self {
        IndexBuilder {
            paths: IndexPaths::new(data_root),
            config: SearchConfig::default(),
            analyzer: ProfileAnalyzer::new(),
        }
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Build and persist the lexicon, forward index, barrels, and routing
    /// table for `records`.
    ///
    /// Term ids are assigned in decreasing document-frequency order, ties
    /// broken by token, so the lexicon file reads highest-df first. Terms
    /// are distributed over `bootstrap_barrels` shards by `term_id mod K`,
    /// the same policy the add path uses for new terms.
    pub fn build(&self, records: &[PlayerRecord]) -> Result<BuildStats> {
        info!("building index for {} documents", records.len());

        // Tokenize every document once; name and body form one stream.
        let streams: Vec<Vec<String>> = records
            .iter()
            .map(|record| {
                self.analyzer
                    .tokenize(&format!("{} {}", record.name, record.body))
            })
            .collect();

        // Document frequency per token.
        let mut df: AHashMap<&str, u64> = AHashMap::new();
        for stream in &streams {
            let doc_tokens: AHashSet<&str> = stream.iter().map(String::as_str).collect();
            for token in doc_tokens {
                *df.entry(token).or_insert(0) += 1;
            }
        }

        // Lexicon: decreasing df, then token, ids 0..n.
        let mut ordered: Vec<(&str, u64)> = df.into_iter().collect();
        ordered.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        let mut lexicon = Lexicon::new();
        for (term_id, (token, df)) in ordered.into_iter().enumerate() {
            lexicon.load_entry(LexiconEntry {
                token: token.to_string(),
                df,
                term_id: term_id as u64,
            });
        }
        info!("lexicon: {} tokens", lexicon.len());

        // Forward index with tf and the first positions per term.
        let mut forward = ForwardIndex::new();
        for (record, stream) in records.iter().zip(&streams) {
            let mut term_freq: AHashMap<u64, (u32, Vec<u32>)> = AHashMap::new();
            for (position, token) in stream.iter().enumerate() {
                let Some(term_id) = lexicon.get(token) else {
                    continue;
                };
                let entry = term_freq.entry(term_id).or_insert((0, Vec::new()));
                entry.0 += 1;
                if entry.1.len() < MAX_POSITIONS {
                    entry.1.push(position as u32);
                }
            }
            let mut terms: Vec<TermEntry> = term_freq
                .into_iter()
                .map(|(term_id, (tf, positions))| TermEntry {
                    term_id,
                    tf,
                    positions,
                })
                .collect();
            terms.sort_by_key(|entry| entry.term_id);
            forward.append(ForwardEntry {
                player_id: record.doc_id,
                player_name: record.name.clone(),
                total_terms: stream.len() as u64,
                unique_terms: terms.len() as u64,
                terms,
            });
        }

        // Routing and barrels: term_id mod K.
        let shard_count = self.config.bootstrap_barrels.max(1);
        let mut routing = RoutingTable::new();
        let mut barrels: AHashMap<u32, Barrel> = AHashMap::new();
        for shard in 0..shard_count {
            barrels.insert(shard, Barrel::empty(&barrel_name(shard)));
        }
        for entry in lexicon.entries() {
            let shard = (entry.term_id % shard_count as u64) as u32;
            routing.insert(entry.term_id, shard);
            if let Some(barrel) = barrels.get_mut(&shard) {
                let slot = barrel.ensure_term(entry.term_id, &entry.token);
                slot.df = entry.df;
            }
        }
        for doc in forward.iter() {
            for term in &doc.terms {
                let Some(shard) = routing.get(term.term_id) else {
                    continue;
                };
                if let Some(barrel) = barrels.get_mut(&shard) {
                    if let Some(slot) = barrel.inverted_index.get_mut(&term.term_id) {
                        slot.postings.insert(doc.player_id, Posting { tf: term.tf });
                    }
                }
            }
        }

        // Persist everything; the routing table is written even for an
        // empty corpus so the add path has a shard set to infer K from.
        lexicon.save(&self.paths.lexicon())?;
        forward.save(&self.paths.forward_index())?;
        let store = BarrelStore::new(self.paths.barrel_dir());
        for (_, mut barrel) in barrels {
            barrel.recompute_metadata();
            store.write(&barrel)?;
        }
        routing.save(&self.paths.routing_table())?;

        let stats = BuildStats {
            documents: forward.len(),
            terms: lexicon.len(),
            barrels: shard_count,
        };
        info!(
            "index built: {} documents, {} terms, {} barrels",
            stats.documents, stats.terms, stats.barrels
        );
        Ok(stats)
    }
}
