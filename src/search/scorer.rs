//! BM25 scoring and the post-accumulation boost pass.

use crate::analysis::ProfileAnalyzer;
use crate::document::NameMetadata;
use crate::engine::config::BoostWeights;
use crate::sidecar::SideMetadata;

/// BM25 contribution of one term to one document.
///
/// The idf uses the standard +1 smoothing so common terms never go
/// negative:
///
/// ```text
/// idf(t)  = ln((N - df + 0.5) / (df + 0.5) + 1)
/// tf_norm = tf * (k1 + 1) / (tf + k1 * (1 - b + b * doc_len / avg_doc_len))
/// ```
pub fn bm25(
    tf: u32,
    df: u64,
    doc_len: u64,
    doc_count: u64,
    avg_doc_len: f64,
    k1: f64,
    b: f64,
) -> f64 {
    if doc_count == 0 || avg_doc_len <= 0.0 {
        return 0.0;
    }
    let n = doc_count as f64;
    let df = df as f64;
    let tf = tf as f64;
    let idf = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();
    let denom = tf + k1 * (1.0 - b + b * (doc_len as f64 / avg_doc_len));
    idf * (tf * (k1 + 1.0) / denom)
}

/// The three normalized views of a query consulted by the boost pass.
#[derive(Debug, Clone)]
pub struct QueryShape {
    /// Analyzer-normalized query tokens (stop-filtered, stemmed).
    pub tokens: Vec<String>,
    /// Space-joined name-normalized query tokens.
    pub name: String,
    /// Raw lowercased query, trimmed.
    pub raw_lower: String,
}

impl QueryShape {
    pub fn of(query: &str, analyzer: &ProfileAnalyzer) -> Self {
        QueryShape {
            tokens: analyzer.tokenize(query),
            name: analyzer.tokenize_name(query).join(" "),
            raw_lower: query.to_lowercase().trim().to_string(),
        }
    }
}

/// Boost for one candidate document, added on top of its BM25 score.
///
/// The metadata boosts are gated on a name condition having fired, so bulk
/// body hits are not rewarded with popularity. Documents with no name
/// condition at all take a flat penalty instead.
pub fn boost(
    shape: &QueryShape,
    meta: Option<&NameMetadata>,
    side: &SideMetadata,
    doc_id: u64,
    weights: &BoostWeights,
) -> f64 {
    let mut boost = 0.0;
    let mut has_name_match = false;

    if let Some(meta) = meta {
        if !shape.tokens.is_empty() {
            let match_count = shape
                .tokens
                .iter()
                .filter(|token| meta.token_set.contains(token.as_str()))
                .count();
            if match_count > 0 {
                boost += weights.name_token * match_count as f64;
                has_name_match = true;
            }
        }
        if !shape.name.is_empty() {
            if meta.normalized == shape.name {
                boost += weights.exact_name;
                has_name_match = true;
            } else if meta.normalized.starts_with(&shape.name) {
                boost += weights.name_prefix;
                has_name_match = true;
            }
        }
        if !shape.raw_lower.is_empty() && meta.raw_lower.contains(&shape.raw_lower) {
            boost += weights.raw_substring;
            has_name_match = true;
        }
    }

    if !has_name_match && !shape.tokens.is_empty() {
        boost -= weights.non_name_penalty;
    }

    if has_name_match {
        if let Some(value) = side.market_value(doc_id) {
            if value > 0.0 && side.market_log_max() > 0.0 {
                boost += weights.market_value * (value.ln_1p() / side.market_log_max());
            }
        }
        if let Some(length) = side.profile_length(doc_id) {
            if length > 0 && side.length_log_max() > 0.0 {
                boost +=
                    weights.profile_length * ((length as f64).ln_1p() / side.length_log_max());
            }
        }
    }

    boost
}
