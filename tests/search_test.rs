//! End-to-end query scenarios against a bulk-built corpus.

use scout_search::{IndexBuilder, PlayerRecord, ScoutError, SearchConfig, SearchEngine};
use tempfile::TempDir;

fn build_and_open(records: &[PlayerRecord]) -> (TempDir, SearchEngine) {
    let dir = TempDir::new().unwrap();
    IndexBuilder::new(dir.path()).build(records).unwrap();
    let engine = SearchEngine::open(dir.path()).unwrap();
    (dir, engine)
}

fn messi_corpus() -> Vec<PlayerRecord> {
    vec![PlayerRecord::new(
        1,
        "Lionel Messi",
        "Messi is a forward who plays for Inter Miami.",
    )]
}

#[test]
fn test_single_document_name_query() {
    let (_dir, engine) = build_and_open(&messi_corpus());

    let results = engine.search("Messi", 10).unwrap();
    assert_eq!(results.hits.len(), 1);
    assert_eq!(results.hits[0].rank, 1);
    assert_eq!(results.hits[0].doc_id, 1);
    assert_eq!(results.hits[0].name, "Lionel Messi");
}

#[test]
fn test_single_document_body_query() {
    let (_dir, engine) = build_and_open(&messi_corpus());

    // Pure BM25 match: "forward" never appears in the name.
    let results = engine.search("forward", 10).unwrap();
    assert_eq!(results.hits.len(), 1);
    assert_eq!(results.hits[0].doc_id, 1);
}

#[test]
fn test_stop_word_query_is_empty() {
    let (_dir, engine) = build_and_open(&messi_corpus());

    let results = engine.search("the", 10).unwrap();
    assert!(results.hits.is_empty());
}

#[test]
fn test_unknown_term_query_is_empty() {
    let (_dir, engine) = build_and_open(&messi_corpus());

    let results = engine.search("xylophone", 10).unwrap();
    assert!(results.hits.is_empty());
}

#[test]
fn test_exact_name_outranks_body_mention() {
    let records = vec![
        PlayerRecord::new(
            1,
            "John Smith",
            "A defender praised by rivals across Europe.",
        ),
        PlayerRecord::new(
            2,
            "Alex Kim",
            "Alex Kim often trains alongside John Smith in preseason.",
        ),
    ];
    let (_dir, engine) = build_and_open(&records);

    let results = engine.search("John Smith", 10).unwrap();
    assert_eq!(results.hits.len(), 2);
    // The exact-name bonus beats the body-only BM25 hit.
    assert_eq!(results.hits[0].doc_id, 1);
    assert_eq!(results.hits[1].doc_id, 2);
    assert!(results.hits[0].score > results.hits[1].score);
}

#[test]
fn test_repeated_query_term_scores_once() {
    // Names share nothing with the query, so the boost pass contributes the
    // same flat penalty to both queries and any score difference would come
    // from BM25 double-counting.
    let records = vec![
        PlayerRecord::new(1, "Alex Kim", "A striker with a powerful shot."),
        PlayerRecord::new(2, "John Smith", "A defender who rarely pushes up."),
    ];
    let (_dir, engine) = build_and_open(&records);

    let single = engine.search("striker", 10).unwrap();
    let doubled = engine.search("striker striker", 10).unwrap();

    assert_eq!(single.hits.len(), 1);
    assert_eq!(doubled.hits.len(), 1);
    assert_eq!(single.hits[0].doc_id, doubled.hits[0].doc_id);
    assert!((single.hits[0].score - doubled.hits[0].score).abs() < 1e-12);
}

#[test]
fn test_stemming_converges_for_query_variants() {
    let records = vec![PlayerRecord::new(
        1,
        "Pace Setter",
        "Known for running runs runner drills every week.",
    )];
    let (_dir, engine) = build_and_open(&records);

    // "runs" in the body stems to "run"; both query forms reach it.
    let for_run = engine.search("run", 10).unwrap();
    let for_runs = engine.search("runs", 10).unwrap();
    assert_eq!(for_run.hits.len(), 1);
    assert_eq!(for_runs.hits.len(), 1);
    assert_eq!(for_run.hits[0].doc_id, 1);
    assert_eq!(for_runs.hits[0].doc_id, 1);
}

#[test]
fn test_query_determinism() {
    let records = vec![
        PlayerRecord::new(3, "Erling Haaland", "A striker known for ruthless finishing."),
        PlayerRecord::new(1, "Kylian Mbappe", "A striker with explosive pace."),
        PlayerRecord::new(2, "Harry Kane", "A striker who also creates chances."),
    ];
    let (_dir, engine) = build_and_open(&records);

    let first = engine.search("striker pace", 10).unwrap();
    let second = engine.search("striker pace", 10).unwrap();

    let ids: Vec<u64> = first.hits.iter().map(|h| h.doc_id).collect();
    let ids_again: Vec<u64> = second.hits.iter().map(|h| h.doc_id).collect();
    assert_eq!(ids, ids_again);
    for (a, b) in first.hits.iter().zip(&second.hits) {
        assert_eq!(a.score, b.score);
    }
}

#[test]
fn test_tie_break_by_doc_id() {
    // Identical documents score identically; ascending doc id decides.
    let records = vec![
        PlayerRecord::new(9, "Twin Striker", "Scores with either foot."),
        PlayerRecord::new(4, "Twin Striker", "Scores with either foot."),
    ];
    let (_dir, engine) = build_and_open(&records);

    let results = engine.search("foot", 10).unwrap();
    assert_eq!(results.hits.len(), 2);
    assert_eq!(results.hits[0].doc_id, 4);
    assert_eq!(results.hits[1].doc_id, 9);
}

#[test]
fn test_top_k_truncation() {
    let records: Vec<PlayerRecord> = (1..=5)
        .map(|id| {
            PlayerRecord::new(
                id,
                format!("Squad Member {id}"),
                "A versatile midfielder comfortable anywhere.",
            )
        })
        .collect();
    let (_dir, engine) = build_and_open(&records);

    let results = engine.search("midfielder", 3).unwrap();
    assert_eq!(results.hits.len(), 3);
    let ranks: Vec<usize> = results.hits.iter().map(|h| h.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
}

#[test]
fn test_top_k_zero_is_rejected() {
    let (_dir, engine) = build_and_open(&messi_corpus());
    let err = engine.search("messi", 0).unwrap_err();
    assert!(matches!(err, ScoutError::InvalidArgument(_)));
}

#[test]
fn test_market_value_boost_requires_name_match() {
    let records = vec![
        PlayerRecord::new(1, "John Smith", "A defender praised for composure."),
        PlayerRecord::new(2, "John Smith", "A defender praised for composure."),
    ];
    let dir = TempDir::new().unwrap();
    IndexBuilder::new(dir.path()).build(&records).unwrap();

    // Only document 2 has a valuation.
    let csv_dir = dir.path().join("raw").join("player_latest_market_value");
    std::fs::create_dir_all(&csv_dir).unwrap();
    std::fs::write(
        csv_dir.join("player_latest_market_value.csv"),
        "player_id,value,date_unix\n2,25000000,1700000000\n",
    )
    .unwrap();

    let engine = SearchEngine::open(dir.path()).unwrap();

    // Name-matching query: the valued twin wins despite the higher doc id.
    let results = engine.search("John Smith", 10).unwrap();
    assert_eq!(results.hits[0].doc_id, 2);
    assert_eq!(results.hits[0].market_value, Some(25_000_000.0));
    assert_eq!(results.hits[1].market_value, None);

    // Body-only query: no name condition fires, so the valuation must not
    // reorder anything and the tie falls back to ascending doc id.
    let results = engine.search("composure", 10).unwrap();
    assert_eq!(results.hits[0].doc_id, 1);
}

#[test]
fn test_timing_is_reported() {
    let (_dir, engine) = build_and_open(&messi_corpus());
    let results = engine.search("messi", 10).unwrap();
    assert!(results.timing_ms >= 0.0);
}

#[test]
fn test_search_with_custom_config() {
    let dir = TempDir::new().unwrap();
    let config = SearchConfig::builder()
        .cache_capacity(2)
        .bootstrap_barrels(3)
        .build();
    IndexBuilder::new(dir.path())
        .with_config(config.clone())
        .build(&messi_corpus())
        .unwrap();

    let engine = SearchEngine::open_with_config(dir.path(), config).unwrap();
    let results = engine.search("messi", 10).unwrap();
    assert_eq!(results.hits.len(), 1);
}
