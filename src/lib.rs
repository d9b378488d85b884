//! # simtab
//!
//! Standardized Euclidean nearest-neighbor search over tabular feature data.
//!
//! simtab takes a table of items with numeric features (for example songs
//! with tempo, danceability and energy), standardizes every column and
//! answers "top-K most similar items" queries.
//!
//! ## Quick Start
//!
//! ```rust
//! use simtab::prelude::*;
//! use serde_json::json;
//!
//! let records = vec![
//!     json!({"track_name": "Blinding Lights", "artist(s)_name": "The Weeknd", "bpm": 171, "energy_%": 80}),
//!     json!({"track_name": "Shape of You", "artist(s)_name": "Ed Sheeran", "bpm": 96, "energy_%": 65}),
//!     json!({"track_name": "Starboy", "artist(s)_name": "The Weeknd", "bpm": 186, "energy_%": 59}),
//! ];
//! let layout = RecordLayout::new("track_name").with_secondary("artist(s)_name");
//! let schema = FeatureSchema::new(["bpm", "energy_%"]).unwrap();
//! let (table, report) = FeatureTable::from_records(schema, &records, &layout).unwrap();
//! assert!(report.is_empty());
//!
//! let engine = SimilarityEngine::new(table, EngineConfig::default()).unwrap();
//! let similar = engine
//!     .similar_to(&QueryPredicate::fuzzy_with_secondary("shapeofyou", "edsheeran"))
//!     .unwrap();
//! assert_eq!(similar.len(), 2);
//! println!("{}", similar);
//! ```
//!
//! ## Crate Structure
//!
//! - `simtab-core` - Feature tables, record coercion, statistics and normalization
//! - `simtab-similarity` - Query resolution, neighbor search, explanations and the engine

// Re-export core types
pub use simtab_core::{
    normalize, CategoricalMapping, CoercionReason, CoercionReport, DegenerateColumnPolicy,
    FeatureSchema, FeatureTable, Item, ItemId, ItemIndex, NormalizationStats, NormalizedTable,
    RecordLayout, SchemaError, Vector,
};

// Re-export similarity
pub use simtab_similarity::{
    batch_nearest_neighbors, explain, locate_query, nearest_neighbors, nearest_to_vector,
    EngineConfig, Error, Explanation, MatchPolicy, Neighbor, NeighborIndex, NeighborResult,
    QueryPredicate, Result, SimilarityEngine,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        DegenerateColumnPolicy, EngineConfig, Error, FeatureSchema, FeatureTable, Item, ItemId,
        MatchPolicy, NeighborResult, QueryPredicate, RecordLayout, Result, SimilarityEngine,
        Vector,
    };
}
