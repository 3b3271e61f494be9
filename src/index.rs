//! The three-layer index: lexicon, forward index, and sharded inverted
//! index (barrels), plus the routing table and the bounded barrel cache.

pub mod barrel;
pub mod cache;
pub mod forward;
pub mod lexicon;
pub mod routing;

pub use barrel::{Barrel, BarrelMetadata, BarrelStore, Posting, TermPostings};
pub use cache::BarrelCache;
pub use forward::{ForwardEntry, ForwardIndex, TermEntry};
pub use lexicon::{Lexicon, LexiconEntry};
pub use routing::RoutingTable;
