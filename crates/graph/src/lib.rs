//! Knowledge-graph store implementations and similarity search for skillweave.

pub mod in_memory;
pub mod json_store;
pub mod search;
pub mod vector;

pub use in_memory::InMemoryGraphStore;
pub use json_store::{GraphSnapshot, JsonGraphStore, SnapshotNode};
pub use search::{NO_EMBEDDINGS_NOTE, ScoredNode, SearchOutcome, SimilaritySearch};
pub use vector::{dot, rank_by_similarity};
