//! The search engine facade: the index context every operation runs
//! against.
//!
//! All process-wide mutable state (lexicon, forward index, routing table,
//! barrel cache, name metadata) lives in this value rather than in ambient
//! globals, so tests can construct isolated indexes. Public operations take
//! `&self`; a writer lock serializes `add_document` against concurrent
//! searches, preserving the invocation-order visibility contract: a search
//! issued after an add returns sees the added document.

pub mod config;

use std::path::Path;

use ahash::AHashMap;
use log::info;
use parking_lot::{Mutex, RwLock};

use crate::analysis::ProfileAnalyzer;
use crate::document::{NameMetadata, PlayerRecord};
use crate::engine::config::{IndexPaths, SearchConfig};
use crate::error::Result;
use crate::index::barrel::BarrelStore;
use crate::index::cache::BarrelCache;
use crate::index::forward::ForwardIndex;
use crate::index::lexicon::Lexicon;
use crate::index::routing::RoutingTable;
use crate::search::searcher::{self, QueryContext, SearchResults};
use crate::sidecar::SideMetadata;
use crate::writer::{self, AddStats, WriteContext};

/// Corpus-level counters.
#[derive(Debug, Clone, Copy)]
pub struct EngineStats {
    pub documents: usize,
    pub terms: usize,
    pub routed_terms: usize,
    pub avg_doc_len: f64,
}

/// A loaded index plus its side metadata and barrel cache.
pub struct SearchEngine {
    paths: IndexPaths,
    config: SearchConfig,
    analyzer: ProfileAnalyzer,
    lexicon: RwLock<Lexicon>,
    forward: RwLock<ForwardIndex>,
    routing: RwLock<RoutingTable>,
    names: RwLock<AHashMap<u64, NameMetadata>>,
    side: RwLock<SideMetadata>,
    cache: Mutex<BarrelCache>,
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("root", &self.paths.root())
            .field("documents", &self.forward.read().len())
            .field("terms", &self.lexicon.read().len())
            .finish()
    }
}

impl SearchEngine {
    /// Open an index under `data_root` with the default configuration.
    pub fn open(data_root: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(data_root, SearchConfig::default())
    }

    /// Open an index under `data_root`.
    ///
    /// The three core index files must exist (the bulk builder writes
    /// them); missing side-metadata files only disable the boosts that
    /// consume them.
    pub fn open_with_config(data_root: impl AsRef<Path>, config: SearchConfig) -> Result<Self> {
        let paths = IndexPaths::new(data_root.as_ref());
        let analyzer = ProfileAnalyzer::new();

        let lexicon = Lexicon::load(&paths.lexicon())?;
        info!("lexicon loaded: {} tokens", lexicon.len());

        let forward = ForwardIndex::load(&paths.forward_index())?;
        info!(
            "forward index loaded: {} documents (avg_len={:.2})",
            forward.len(),
            forward.avg_doc_len()
        );

        let routing = RoutingTable::load(&paths.routing_table())?;
        info!(
            "routing table loaded: {} terms over {} shards",
            routing.len(),
            routing.shard_count()
        );

        let side = SideMetadata::load(&paths.market_values(), &paths.profile_data());

        let names: AHashMap<u64, NameMetadata> = forward
            .iter()
            .map(|entry| {
                (
                    entry.player_id,
                    NameMetadata::build(&entry.player_name, &analyzer),
                )
            })
            .collect();

        let cache = BarrelCache::new(
            BarrelStore::new(paths.barrel_dir()),
            config.cache_capacity,
        );

        Ok(SearchEngine {
            paths,
            config,
            analyzer,
            lexicon: RwLock::new(lexicon),
            forward: RwLock::new(forward),
            routing: RwLock::new(routing),
            names: RwLock::new(names),
            side: RwLock::new(side),
            cache: Mutex::new(cache),
        })
    }

    /// Search the corpus for `query`, returning up to `top_k` ranked hits.
    pub fn search(&self, query: &str, top_k: usize) -> Result<SearchResults> {
        let lexicon = self.lexicon.read();
        let forward = self.forward.read();
        let routing = self.routing.read();
        let names = self.names.read();
        let side = self.side.read();
        let mut cache = self.cache.lock();

        let ctx = QueryContext {
            lexicon: &lexicon,
            forward: &forward,
            routing: &routing,
            names: &names,
            side: &side,
            config: &self.config,
        };
        searcher::execute(&ctx, &mut cache, &self.analyzer, query, top_k)
    }

    /// Search with the configured default `top_k`.
    pub fn search_default(&self, query: &str) -> Result<SearchResults> {
        self.search(query, self.config.default_top_k)
    }

    /// Add one document to every index layer and persist the changes.
    ///
    /// Touched barrels are written before the lexicon, forward index, and
    /// routing table. Returns statistics including whether the operation
    /// met the one-minute budget.
    pub fn add_document(&self, record: PlayerRecord) -> Result<AddStats> {
        let mut lexicon = self.lexicon.write();
        let mut forward = self.forward.write();
        let mut routing = self.routing.write();
        let mut names = self.names.write();
        let mut cache = self.cache.lock();

        let ctx = WriteContext {
            lexicon: &mut lexicon,
            forward: &mut forward,
            routing: &mut routing,
            names: &mut names,
        };
        writer::add_document(ctx, &mut cache, &self.analyzer, &self.paths, record)
    }

    /// Re-read the side-metadata files, picking up a regenerated valuation
    /// CSV without reopening the engine.
    pub fn reload_side_metadata(&self) {
        let side = SideMetadata::load(&self.paths.market_values(), &self.paths.profile_data());
        *self.side.write() = side;
    }

    /// Corpus-level counters.
    pub fn stats(&self) -> EngineStats {
        let forward = self.forward.read();
        EngineStats {
            documents: forward.len(),
            terms: self.lexicon.read().len(),
            routed_terms: self.routing.read().len(),
            avg_doc_len: forward.avg_doc_len(),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn paths(&self) -> &IndexPaths {
        &self.paths
    }
}
