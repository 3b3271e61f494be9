//! Engine configuration: file layout and tuning constants.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::index::cache::DEFAULT_CAPACITY;

/// Derives every on-disk location from a single data root.
///
/// The layout is fixed: `index/` for the three index layers,
/// `index/barrels/` for the shards and the routing table, `raw/` and
/// `processed/` for the side-metadata files produced by the ETL.
#[derive(Debug, Clone)]
pub struct IndexPaths {
    root: PathBuf,
}

impl IndexPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        IndexPaths { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index_dir(&self) -> PathBuf {
        self.root.join("index")
    }

    pub fn lexicon(&self) -> PathBuf {
        self.index_dir().join("lexicon_complete.json")
    }

    pub fn forward_index(&self) -> PathBuf {
        self.index_dir().join("forward_index_termid.json")
    }

    pub fn barrel_dir(&self) -> PathBuf {
        self.index_dir().join("barrels")
    }

    pub fn routing_table(&self) -> PathBuf {
        self.barrel_dir().join("term_to_barrel_map.json")
    }

    pub fn market_values(&self) -> PathBuf {
        self.root
            .join("raw")
            .join("player_latest_market_value")
            .join("player_latest_market_value.csv")
    }

    pub fn profile_data(&self) -> PathBuf {
        self.root
            .join("processed")
            .join("complete_player_profiles.json")
    }
}

/// Boost constants applied after BM25 accumulation.
///
/// These are empirical tuning constants, not derived quantities, which is
/// why they live in configuration rather than in the scorer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoostWeights {
    /// Added per query token found among the document's name tokens.
    pub name_token: f64,
    /// Added when the normalized query equals the normalized name.
    pub exact_name: f64,
    /// Added when the normalized query is a proper prefix of the name.
    pub name_prefix: f64,
    /// Added when the raw lowercased query is a substring of the raw name.
    pub raw_substring: f64,
    /// Scales the log-normalized market valuation, gated on a name match.
    pub market_value: f64,
    /// Scales the log-normalized profile length, gated on a name match.
    pub profile_length: f64,
    /// Subtracted when no name condition fired for a non-empty token query.
    pub non_name_penalty: f64,
}

impl Default for BoostWeights {
    fn default() -> Self {
        BoostWeights {
            name_token: 0.75,
            exact_name: 3.0,
            name_prefix: 1.25,
            raw_substring: 0.25,
            market_value: 12.0,
            profile_length: 4.0,
            non_name_penalty: 1.5,
        }
    }
}

/// Full engine configuration.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// BM25 term-frequency saturation.
    pub k1: f64,
    /// BM25 document-length normalization.
    pub b: f64,
    /// Boost constants.
    pub boosts: BoostWeights,
    /// Barrel cache capacity.
    pub cache_capacity: usize,
    /// Shard count used by the bulk builder for a fresh index. The add
    /// path never consults this; it infers the count from the routing
    /// table.
    pub bootstrap_barrels: u32,
    /// Default `top_k` for callers that do not pass one.
    pub default_top_k: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            k1: 1.2,
            b: 0.75,
            boosts: BoostWeights::default(),
            cache_capacity: DEFAULT_CAPACITY,
            bootstrap_barrels: 8,
            default_top_k: 10,
        }
    }
}

impl SearchConfig {
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::default()
    }
}

/// Builder for [`SearchConfig`].
#[derive(Debug, Default)]
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    pub fn k1(mut self, k1: f64) -> Self {
        self.config.k1 = k1;
        self
    }

    pub fn b(mut self, b: f64) -> Self {
        self.config.b = b;
        self
    }

    pub fn boosts(mut self, boosts: BoostWeights) -> Self {
        self.config.boosts = boosts;
        self
    }

    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.config.cache_capacity = capacity;
        self
    }

    pub fn bootstrap_barrels(mut self, barrels: u32) -> Self {
        self.config.bootstrap_barrels = barrels.max(1);
        self
    }

    pub fn default_top_k(mut self, top_k: usize) -> Self {
        self.config.default_top_k = top_k.max(1);
        self
    }

    pub fn build(self) -> SearchConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_layout() {
        let paths = IndexPaths::new("/data");
        assert_eq!(
            paths.lexicon(),
            PathBuf::from("/data/index/lexicon_complete.json")
        );
        assert_eq!(
            paths.routing_table(),
            PathBuf::from("/data/index/barrels/term_to_barrel_map.json")
        );
        assert!(
            paths
                .market_values()
                .ends_with("raw/player_latest_market_value/player_latest_market_value.csv")
        );
    }

    #[test]
    fn test_builder_defaults_and_clamps() {
        let config = SearchConfig::builder()
            .cache_capacity(4)
            .bootstrap_barrels(0)
            .build();
        assert_eq!(config.k1, 1.2);
        assert_eq!(config.b, 0.75);
        assert_eq!(config.cache_capacity, 4);
        assert_eq!(config.bootstrap_barrels, 1);
        assert_eq!(config.boosts.exact_name, 3.0);
    }
}
