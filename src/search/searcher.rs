//! The query engine: parse, route, accumulate, boost, rank.

use std::time::Instant;

use ahash::{AHashMap, AHashSet};
use log::{debug, warn};
use serde::Serialize;

use crate::analysis::ProfileAnalyzer;
use crate::document::NameMetadata;
use crate::engine::config::SearchConfig;
use crate::error::{Result, ScoutError};
use crate::index::cache::BarrelCache;
use crate::index::forward::ForwardIndex;
use crate::index::lexicon::Lexicon;
use crate::index::routing::RoutingTable;
use crate::search::scorer::{self, QueryShape};
use crate::sidecar::SideMetadata;

/// Soft latency goal per query, in milliseconds. Overruns are logged but
/// the query still returns.
pub const QUERY_BUDGET_MS: f64 = 500.0;

/// One ranked result.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    /// 1-based rank.
    pub rank: usize,
    pub doc_id: u64,
    pub name: String,
    pub score: f64,
    /// Latest market valuation, when the side file knows the document.
    pub market_value: Option<f64>,
}

/// A ranked result list with its wall-clock cost.
#[derive(Debug, Clone, Serialize, Default)]
pub struct SearchResults {
    pub hits: Vec<SearchHit>,
    pub timing_ms: f64,
}

/// Borrowed view of everything the query path reads.
pub(crate) struct QueryContext<'a> {
    pub lexicon: &'a Lexicon,
    pub forward: &'a ForwardIndex,
    pub routing: &'a RoutingTable,
    pub names: &'a AHashMap<u64, NameMetadata>,
    pub side: &'a SideMetadata,
    pub config: &'a SearchConfig,
}

/// Execute a query against the index.
///
/// Unknown tokens are dropped rather than erroring; a query with no known
/// terms returns an empty result list.
pub(crate) fn execute(
    ctx: &QueryContext<'_>,
    cache: &mut BarrelCache,
    analyzer: &ProfileAnalyzer,
    query: &str,
    top_k: usize,
) -> Result<SearchResults> {
    if top_k == 0 {
        return Err(ScoutError::invalid_argument("top_k must be at least 1"));
    }
    let start = Instant::now();

    // 1-2. Tokenize, then deduplicate by term id, dropping unknown tokens.
    let query_tokens = analyzer.tokenize(query);
    let mut seen = AHashSet::new();
    let mut term_ids = Vec::new();
    for token in &query_tokens {
        if let Some(term_id) = ctx.lexicon.get(token) {
            if seen.insert(term_id) {
                term_ids.push(term_id);
            }
        }
    }

    // 3. Nothing survived: empty result.
    if term_ids.is_empty() {
        debug!("query {query:?}: no terms found in lexicon");
        return Ok(finish(Vec::new(), start));
    }

    // 4-7. Accumulate BM25 per document, reading only the routed barrels.
    let doc_count = ctx.forward.len() as u64;
    let avg_doc_len = ctx.forward.avg_doc_len();
    let mut scores: AHashMap<u64, f64> = AHashMap::new();

    for &term_id in &term_ids {
        let df = ctx.lexicon.df(term_id);
        if df == 0 {
            continue;
        }
        let Some(barrel_name) = ctx.routing.barrel_of(term_id) else {
            warn!("term {term_id} is in the lexicon but not in the routing table");
            continue;
        };
        let barrel = cache.shard(&barrel_name)?;
        let Some(entry) = barrel.get(term_id) else {
            continue;
        };
        for (&doc_id, posting) in entry.postings.iter() {
            let Some(doc_len) = ctx.forward.doc_length(doc_id) else {
                warn!("posting for unknown document {doc_id}");
                continue;
            };
            *scores.entry(doc_id).or_insert(0.0) += scorer::bm25(
                posting.tf,
                df,
                doc_len,
                doc_count,
                avg_doc_len,
                ctx.config.k1,
                ctx.config.b,
            );
        }
    }

    // 8. Boost pass over every accumulated candidate.
    if !scores.is_empty() {
        let shape = QueryShape {
            tokens: query_tokens,
            name: analyzer.tokenize_name(query).join(" "),
            raw_lower: query.to_lowercase().trim().to_string(),
        };
        for (&doc_id, score) in scores.iter_mut() {
            *score += scorer::boost(
                &shape,
                ctx.names.get(&doc_id),
                ctx.side,
                doc_id,
                &ctx.config.boosts,
            );
        }
    }

    // 9. Rank: score descending, doc id ascending on ties, truncate.
    let mut ranked: Vec<(u64, f64)> = scores.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    ranked.truncate(top_k);

    let hits = ranked
        .into_iter()
        .enumerate()
        .map(|(idx, (doc_id, score))| SearchHit {
            rank: idx + 1,
            doc_id,
            name: ctx
                .forward
                .get(doc_id)
                .map(|entry| entry.player_name.clone())
                .unwrap_or_default(),
            score,
            market_value: ctx.side.market_value(doc_id),
        })
        .collect();

    Ok(finish(hits, start))
}

fn finish(hits: Vec<SearchHit>, start: Instant) -> SearchResults {
    let timing_ms = start.elapsed().as_secs_f64() * 1000.0;
    if timing_ms > QUERY_BUDGET_MS {
        warn!("query took {timing_ms:.2} ms, above the {QUERY_BUDGET_MS} ms goal");
    } else {
        debug!("query took {timing_ms:.2} ms");
    }
    SearchResults { hits, timing_ms }
}
