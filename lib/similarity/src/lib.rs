//! # simtab Similarity
//!
//! Nearest-neighbor queries over standardized feature tables.
//!
//! This crate answers "which items are most like this one?" for tables built
//! with `simtab-core`. Distances are plain Euclidean over standardized
//! columns, computed exactly by a brute-force scan.
//!
//! ## Features
//!
//! - **Query resolution**: exact identifiers or fuzzy name/secondary lookups
//!   with an explicit tie-break policy
//! - **Neighbor search**: top-K per row, per external vector, or in batches
//!   on the rayon pool
//! - **Explainability**: per-column contribution breakdown for any pair
//! - **Index seam**: queries run against the [`NeighborIndex`] trait
//!
//! ## Example
//!
//! ```rust
//! use simtab_core::{FeatureSchema, FeatureTable, Item, ItemId};
//! use simtab_similarity::{EngineConfig, QueryPredicate, SimilarityEngine};
//!
//! let schema = FeatureSchema::new(["bpm", "danceability_%"]).unwrap();
//! let table = FeatureTable::new(schema, vec![
//!     Item::new(ItemId::with_secondary("Blinding Lights", "The Weeknd"), vec![171.0, 50.0]),
//!     Item::new(ItemId::with_secondary("Shape of You", "Ed Sheeran"), vec![96.0, 83.0]),
//!     Item::new(ItemId::with_secondary("Starboy", "The Weeknd"), vec![186.0, 68.0]),
//! ]).unwrap();
//!
//! let engine = SimilarityEngine::new(table, EngineConfig::default()).unwrap();
//! let similar = engine
//!     .similar_to(&QueryPredicate::fuzzy_with_secondary("blindinglights", "theweeknd"))
//!     .unwrap();
//! assert_eq!(similar.neighbors[0].id.name, "Starboy");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ FeatureTable│────>│  normalize  │────>│ Normalized  │
//! │   (core)    │     │ (mean, std) │     │   Table     │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!       │                                        │
//!       │             ┌─────────────┐            │
//!       └────────────>│   locate    │            │
//!                     │ (predicate) │            │
//!                     └─────────────┘            │
//!                            │ row               │
//!                     ┌─────────────┐            │
//!                     │NeighborIndex│<───────────┘
//!                     │  (top-K)    │
//!                     └─────────────┘
//!                            │
//!                     ┌─────────────┐
//!                     │  Explain    │
//!                     └─────────────┘
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod explain;
pub mod index;
pub mod locate;
pub mod neighbors;

// Re-export main types for convenience
pub use config::{EngineConfig, DEFAULT_K};
pub use engine::SimilarityEngine;
pub use error::{Error, Result};
pub use explain::{explain, Explanation, FeatureContribution};
pub use index::{BruteForceIndex, NeighborIndex};
pub use locate::{fold, locate_all, locate_query, matching_rows, MatchPolicy, QueryPredicate};
pub use neighbors::{
    batch_nearest_neighbors, batch_nearest_neighbors_with, nearest_neighbors,
    nearest_neighbors_with, nearest_to_vector, nearest_to_vector_with, Neighbor, NeighborResult,
};
