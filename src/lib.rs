//! # scout-search
//!
//! A domain-specialized full-text search engine over athlete profiles.
//!
//! ## Features
//!
//! - Three-layer index: lexicon, forward index, sharded inverted index
//! - BM25 ranking with name-match and metadata boosts
//! - Incremental add-document without a corpus rebuild
//! - Bounded barrel cache so queries only read term-relevant shards
//!
//! The engine consumes `{doc_id, name, body}` records produced by an
//! external ETL plus a CSV of per-document market valuations, and exposes
//! two operations: [`SearchEngine::search`] and
//! [`SearchEngine::add_document`].

// Core modules
pub mod analysis;
pub mod builder;
pub mod document;
mod engine;
mod error;
pub mod index;
pub mod search;
pub mod sidecar;
mod writer;

// Re-exports for the public API
pub use analysis::ProfileAnalyzer;
pub use builder::{BuildStats, IndexBuilder};
pub use document::{NameMetadata, PlayerRecord};
pub use engine::config::{BoostWeights, IndexPaths, SearchConfig, SearchConfigBuilder};
pub use engine::{EngineStats, SearchEngine};
pub use error::{Result, ScoutError};
pub use search::searcher::{SearchHit, SearchResults};
pub use sidecar::SideMetadata;
pub use writer::AddStats;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
