//! Query execution: BM25 scoring, the boost pass, and the query engine.

pub mod scorer;
pub mod searcher;

pub use searcher::{SearchHit, SearchResults};
