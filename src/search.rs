//! Provider-switchable semantic search over the movie catalog.
//!
//! The orchestrator owns the active embedding provider and the LanceDB-backed
//! vector index, rebuilding the index lazily on first use and in full after
//! every provider switch.

mod models;
mod orchestrator;
mod table;

pub use models::{IndexedMovie, MovieMatch, SearchOptions};
pub use orchestrator::MovieSearch;
pub use table::MovieTable;
