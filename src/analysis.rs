//! Text analysis for profile bodies, names, and queries.
//!
//! The pipeline is fixed: lowercase, extract maximal runs of ASCII letters,
//! drop short words and stop words, stem. The exact same pipeline runs at
//! indexing time and at query time; any divergence between the two silently
//! destroys recall, so both paths share this one module.

pub mod analyzer;
pub mod stemmer;
pub mod stop_words;

pub use analyzer::ProfileAnalyzer;
pub use stemmer::stem;
pub use stop_words::is_stop_word;
