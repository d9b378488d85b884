//! # simtab Core
//!
//! Core library for simtab.
//!
//! This crate provides the data structures every similarity query runs on:
//!
//! - [`Vector`] - Dense `f32` feature vector
//! - [`Item`] / [`ItemId`] - An identified feature vector
//! - [`FeatureSchema`] / [`FeatureTable`] - Immutable, validated feature table
//! - [`CoercionReport`] - Cells that were zero-filled while loading records
//! - [`NormalizationStats`] - Per-column mean and sample standard deviation
//! - [`normalize`] - Column standardization into a [`NormalizedTable`]
//!
//! ## Example
//!
//! ```rust
//! use simtab_core::{normalize, DegenerateColumnPolicy, FeatureSchema, FeatureTable, Item};
//!
//! let schema = FeatureSchema::new(["bpm", "energy_%"]).unwrap();
//! let table = FeatureTable::new(schema, vec![
//!     Item::new("a", vec![120.0, 80.0]),
//!     Item::new("b", vec![90.0, 40.0]),
//!     Item::new("c", vec![128.0, 75.0]),
//! ]).unwrap();
//!
//! let normalized = normalize(&table, DegenerateColumnPolicy::Zero).unwrap();
//! assert_eq!(normalized.len(), 3);
//! ```

pub mod distance;
pub mod error;
pub mod item;
pub mod normalize;
pub mod stats;
pub mod table;
pub mod vector;

pub use error::{Error, Result, SchemaError};
pub use item::{Item, ItemId, ItemIndex};
pub use normalize::{normalize, DegenerateColumnPolicy, NormalizedTable};
pub use stats::{ColumnStats, NormalizationStats};
pub use table::{
    CategoricalMapping, CoercedCell, CoercionReason, CoercionReport, FeatureSchema,
    FeatureTable, RecordLayout,
};
pub use vector::Vector;
