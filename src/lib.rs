pub mod api;
pub mod corpus;
pub mod engine;
pub mod index;
pub mod ranking;
pub mod record;
pub mod tokenizer;

// Re-export commonly used types
pub use corpus::{load_records, CorpusError};
pub use engine::{search, SearchEngine, SearchOptions, SearchResult};
pub use index::{CorpusIndex, IndexStats, TermStats};
pub use ranking::ScoredRecord;
pub use record::Record;
pub use tokenizer::tokenize;

pub use anyhow::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
