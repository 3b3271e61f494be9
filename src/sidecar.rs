//! Side-metadata loaders: market valuations and profile body lengths.
//!
//! Both files are produced outside the engine and may lag behind the index
//! (a freshly added document has no valuation until the CSV is
//! regenerated). A missing file is recoverable: the boosts that consume it
//! are skipped and a warning is logged.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use ahash::AHashMap;
use log::warn;
use serde::Deserialize;

use crate::error::{Result, ScoutError};

/// One row of the processed-profile file; only the fields the loader needs.
#[derive(Debug, Deserialize)]
struct ProfileRow {
    #[serde(default)]
    player_id: Option<u64>,
    #[serde(default)]
    detailed_content: Option<String>,
}

/// Latest market valuation and profile length per document, with the
/// log-normalizers the metadata boosts divide by.
#[derive(Debug, Default)]
pub struct SideMetadata {
    market_values: AHashMap<u64, f64>,
    profile_lengths: AHashMap<u64, u64>,
    market_log_max: f64,
    length_log_max: f64,
}

impl SideMetadata {
    /// Load both side files, degrading to empty maps when either is absent.
    pub fn load(market_value_path: &Path, profile_data_path: &Path) -> Self {
        let market_values = match load_market_values(market_value_path) {
            Ok(values) => values,
            Err(ScoutError::MissingSideFile(path)) => {
                warn!("market value file not found at {}", path.display());
                AHashMap::new()
            }
            Err(err) => {
                warn!("failed to load market values: {err}");
                AHashMap::new()
            }
        };
        let profile_lengths = match load_profile_lengths(profile_data_path) {
            Ok(lengths) => lengths,
            Err(ScoutError::MissingSideFile(path)) => {
                warn!("profile data file not found at {}", path.display());
                AHashMap::new()
            }
            Err(err) => {
                warn!("failed to load profile lengths: {err}");
                AHashMap::new()
            }
        };
        SideMetadata::from_maps(market_values, profile_lengths)
    }

    fn from_maps(
        market_values: AHashMap<u64, f64>,
        profile_lengths: AHashMap<u64, u64>,
    ) -> Self {
        let max_value = market_values.values().copied().fold(0.0_f64, f64::max);
        let max_length = profile_lengths.values().copied().max().unwrap_or(0);
        SideMetadata {
            market_values,
            profile_lengths,
            market_log_max: if max_value > 0.0 { max_value.ln_1p() } else { 1.0 },
            length_log_max: if max_length > 0 { (max_length as f64).ln_1p() } else { 1.0 },
        }
    }

    pub fn market_value(&self, doc_id: u64) -> Option<f64> {
        self.market_values.get(&doc_id).copied()
    }

    pub fn profile_length(&self, doc_id: u64) -> Option<u64> {
        self.profile_lengths.get(&doc_id).copied()
    }

    /// `ln(1 + v_max)`, computed once at load; 1.0 for an empty corpus.
    pub fn market_log_max(&self) -> f64 {
        self.market_log_max
    }

    /// `ln(1 + len_max)`, computed once at load; 1.0 for an empty corpus.
    pub fn length_log_max(&self) -> f64 {
        self.length_log_max
    }
}

/// Load the latest market value per document from the valuation CSV.
///
/// Rows carry `player_id`, `value`, and `date_unix`; the latest row by
/// lexicographic `date_unix` wins. Rows with unparseable ids or values are
/// skipped rather than failing the load.
pub fn load_market_values(path: &Path) -> Result<AHashMap<u64, f64>> {
    if !path.exists() {
        return Err(ScoutError::missing_side_file(path));
    }
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let id_col = headers.iter().position(|h| h == "player_id");
    let value_col = headers.iter().position(|h| h == "value");
    let date_col = headers.iter().position(|h| h == "date_unix");

    let mut latest: AHashMap<u64, (String, f64)> = AHashMap::new();
    for record in reader.records() {
        let record = record?;
        let Some(doc_id) = id_col
            .and_then(|col| record.get(col))
            .and_then(|raw| raw.parse::<u64>().ok())
        else {
            continue;
        };
        let Some(value) = value_col
            .and_then(|col| record.get(col))
            .and_then(|raw| raw.parse::<f64>().ok())
        else {
            continue;
        };
        let date_key = date_col
            .and_then(|col| record.get(col))
            .unwrap_or("")
            .to_string();
        match latest.get(&doc_id) {
            Some((current, _)) if date_key <= *current => {}
            _ => {
                latest.insert(doc_id, (date_key, value));
            }
        }
    }
    Ok(latest
        .into_iter()
        .map(|(doc_id, (_, value))| (doc_id, value))
        .collect())
}

/// Load the body character count per document from the processed-profile
/// JSON file. Entries without an id or with an empty body are skipped.
pub fn load_profile_lengths(path: &Path) -> Result<AHashMap<u64, u64>> {
    if !path.exists() {
        return Err(ScoutError::missing_side_file(path));
    }
    let reader = BufReader::new(File::open(path)?);
    let rows: Vec<ProfileRow> = serde_json::from_reader(reader)?;
    let mut lengths = AHashMap::new();
    for row in rows {
        let Some(doc_id) = row.player_id else { continue };
        match row.detailed_content {
            Some(content) if !content.is_empty() => {
                lengths.insert(doc_id, content.chars().count() as u64);
            }
            _ => {}
        }
    }
    Ok(lengths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_latest_market_value_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("player_latest_market_value.csv");
        std::fs::write(
            &path,
            "player_id,value,date_unix\n\
             10,5000000,1600000000\n\
             10,8000000,1700000000\n\
             20,1000000,1650000000\n\
             bogus,1,1\n",
        )
        .unwrap();

        let values = load_market_values(&path).unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[&10], 8_000_000.0);
        assert_eq!(values[&20], 1_000_000.0);
    }

    #[test]
    fn test_profile_lengths() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("complete_player_profiles.json");
        std::fs::write(
            &path,
            r#"[
                {"player_id": 10, "player_name": "A", "detailed_content": "abcd"},
                {"player_id": 20, "player_name": "B", "detailed_content": ""},
                {"player_name": "C", "detailed_content": "xyz"}
            ]"#,
        )
        .unwrap();

        let lengths = load_profile_lengths(&path).unwrap();
        assert_eq!(lengths.len(), 1);
        assert_eq!(lengths[&10], 4);
    }

    #[test]
    fn test_missing_files_are_recoverable() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.csv");
        assert!(matches!(
            load_market_values(&missing).unwrap_err(),
            ScoutError::MissingSideFile(_)
        ));

        let side = SideMetadata::load(&missing, &dir.path().join("nope.json"));
        assert_eq!(side.market_value(1), None);
        assert_eq!(side.market_log_max(), 1.0);
    }

    #[test]
    fn test_log_normalizers() {
        let mut market = AHashMap::new();
        market.insert(1, 100.0);
        let mut lengths = AHashMap::new();
        lengths.insert(1, 50);
        let side = SideMetadata::from_maps(market, lengths);
        assert!((side.market_log_max() - 101.0_f64.ln()).abs() < 1e-12);
        assert!((side.length_log_max() - 51.0_f64.ln()).abs() < 1e-12);
    }
}
