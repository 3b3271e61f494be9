//! The incremental writer: add one document to every index layer without a
//! corpus rebuild.
//!
//! Ordering on disk: touched barrels first, then the lexicon, forward
//! index, and routing table. The operation is transactional at the intent
//! level but not atomic on disk; a crash mid-write can leave the files
//! inconsistent until the add is retried or the index rebuilt.

use std::time::Instant;

use ahash::AHashMap;
use log::{debug, info};
use serde::Serialize;

use crate::analysis::ProfileAnalyzer;
use crate::document::{NameMetadata, PlayerRecord};
use crate::engine::config::IndexPaths;
use crate::error::{Result, ScoutError};
use crate::index::barrel::{Barrel, Posting, barrel_name};
use crate::index::cache::BarrelCache;
use crate::index::forward::{ForwardEntry, ForwardIndex, MAX_POSITIONS, TermEntry};
use crate::index::lexicon::Lexicon;
use crate::index::routing::RoutingTable;

/// Budget for one add-document operation, in seconds.
pub const ADD_BUDGET_SECS: f64 = 60.0;

/// Statistics returned by a successful add.
#[derive(Debug, Clone, Serialize)]
pub struct AddStats {
    pub doc_id: u64,
    pub name: String,
    pub total_terms: u64,
    pub unique_terms: u64,
    pub new_tokens: usize,
    pub barrels_updated: usize,
    pub elapsed_secs: f64,
    /// Whether the operation finished inside the one-minute budget.
    pub within_budget: bool,
}

/// Mutable view of everything the add path updates.
pub(crate) struct WriteContext<'a> {
    pub lexicon: &'a mut Lexicon,
    pub forward: &'a mut ForwardIndex,
    pub routing: &'a mut RoutingTable,
    pub names: &'a mut AHashMap<u64, NameMetadata>,
}

/// Add `record` to the index and persist every affected file.
pub(crate) fn add_document(
    ctx: WriteContext<'_>,
    cache: &mut BarrelCache,
    analyzer: &ProfileAnalyzer,
    paths: &IndexPaths,
    record: PlayerRecord,
) -> Result<AddStats> {
    let start = Instant::now();

    if record.name.trim().is_empty() {
        return Err(ScoutError::missing_field("name"));
    }
    if ctx.forward.contains(record.doc_id) {
        return Err(ScoutError::DuplicateDocument(record.doc_id));
    }

    // 1. Tokenize name and body as one stream; count tf and positions.
    let text = format!("{} {}", record.name, record.body);
    let tokens = analyzer.tokenize(&text);
    if tokens.is_empty() {
        return Err(ScoutError::EmptyDocument);
    }

    let mut term_freq: AHashMap<&str, (u32, Vec<u32>)> = AHashMap::new();
    for (position, token) in tokens.iter().enumerate() {
        let entry = term_freq.entry(token.as_str()).or_insert((0, Vec::new()));
        entry.0 += 1;
        if entry.1.len() < MAX_POSITIONS {
            entry.1.push(position as u32);
        }
    }
    let total_terms = tokens.len() as u64;
    let unique_terms = term_freq.len() as u64;
    debug!(
        "add {}: {total_terms} tokens, {unique_terms} unique",
        record.doc_id
    );

    // 2-3. Update the lexicon: intern new tokens at df = 1, bump df of
    // existing tokens by exactly one (document-level, not per occurrence).
    let mut new_tokens = 0usize;
    let mut doc_terms: Vec<(u64, String, u32, Vec<u32>)> = Vec::with_capacity(term_freq.len());
    for (token, (tf, positions)) in term_freq {
        let term_id = match ctx.lexicon.get(token) {
            Some(term_id) => {
                ctx.lexicon.increment_df(term_id);
                term_id
            }
            None => {
                new_tokens += 1;
                ctx.lexicon.intern(token)
            }
        };
        doc_terms.push((term_id, token.to_string(), tf, positions));
    }
    doc_terms.sort_by_key(|(term_id, ..)| *term_id);

    // 4. Append the forward-index entry.
    let forward_entry = ForwardEntry {
        player_id: record.doc_id,
        player_name: record.name.clone(),
        total_terms,
        unique_terms,
        terms: doc_terms
            .iter()
            .map(|(term_id, _, tf, positions)| TermEntry {
                term_id: *term_id,
                tf: *tf,
                positions: positions.clone(),
            })
            .collect(),
    };
    ctx.forward.append(forward_entry);

    // 5. Update every touched barrel in memory, assigning shards for brand
    // new terms as we go.
    let mut touched: AHashMap<String, Barrel> = AHashMap::new();
    for (term_id, token, tf, _) in &doc_terms {
        let shard = match ctx.routing.get(*term_id) {
            Some(shard) => shard,
            None => ctx.routing.assign(*term_id),
        };
        let name = barrel_name(shard);
        if !touched.contains_key(&name) {
            touched.insert(name.clone(), cache.checkout(&name)?);
        }
        let barrel = touched
            .get_mut(&name)
            .ok_or_else(|| ScoutError::index("touched barrel vanished"))?;

        let entry = barrel.ensure_term(*term_id, token);
        entry.postings.insert(record.doc_id, Posting { tf: *tf });
        // Keep the barrel's df in lockstep with the lexicon, whichever
        // path (fresh intern or increment) produced it.
        entry.df = ctx.lexicon.df(*term_id);
    }

    // 6. Persist: barrels first, then the in-memory indexes.
    let barrels_updated = touched.len();
    for (_, mut barrel) in touched {
        barrel.recompute_metadata();
        cache.commit(barrel)?;
    }
    ctx.lexicon.save(&paths.lexicon())?;
    ctx.forward.save(&paths.forward_index())?;
    ctx.routing.save(&paths.routing_table())?;

    ctx.names.insert(
        record.doc_id,
        NameMetadata::build(&record.name, analyzer),
    );

    let elapsed_secs = start.elapsed().as_secs_f64();
    let stats = AddStats {
        doc_id: record.doc_id,
        name: record.name,
        total_terms,
        unique_terms,
        new_tokens,
        barrels_updated,
        elapsed_secs,
        within_budget: elapsed_secs < ADD_BUDGET_SECS,
    };
    info!(
        "added document {} ({} new tokens, {} barrels) in {:.2}s",
        stats.doc_id, stats.new_tokens, stats.barrels_updated, stats.elapsed_secs
    );
    Ok(stats)
}
