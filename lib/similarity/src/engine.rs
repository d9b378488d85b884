//! Similarity engine facade
//!
//! Owns a feature table together with its standardized form and answers
//! queries against it. Everything is computed in [`SimilarityEngine::new`];
//! afterwards the engine is read-only and can be shared across threads.
//!
//! Searches run on an exact brute-force scan unless another
//! [`NeighborIndex`] is attached with [`SimilarityEngine::with_index`].

use simtab_core::{
    normalize, FeatureTable, ItemIndex, NormalizationStats, NormalizedTable, Vector,
};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::explain::{explain, Explanation};
use crate::index::{BruteForceIndex, NeighborIndex};
use crate::locate::{locate_all, locate_query, QueryPredicate};
use crate::neighbors::{
    batch_nearest_neighbors_with, nearest_neighbors_with, nearest_to_vector_with, NeighborResult,
};

#[derive(Clone)]
pub struct SimilarityEngine {
    table: FeatureTable,
    normalized: NormalizedTable,
    config: EngineConfig,
    index: Option<Arc<dyn NeighborIndex>>,
}

impl fmt::Debug for SimilarityEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimilarityEngine")
            .field("table", &self.table)
            .field("normalized", &self.normalized)
            .field("config", &self.config)
            .field("custom_index", &self.index.is_some())
            .finish()
    }
}

impl SimilarityEngine {
    /// Validate `config` and standardize `table`
    pub fn new(table: FeatureTable, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let normalized = normalize(&table, config.degenerate_columns)?;

        debug!(
            rows = table.len(),
            columns = table.schema().len(),
            default_k = config.default_k,
            "similarity engine ready"
        );

        Ok(Self {
            table,
            normalized,
            config,
            index: None,
        })
    }

    /// Route every search through `index`.
    ///
    /// The index must be built over [`SimilarityEngine::normalized`] vectors
    /// in table order.
    pub fn with_index(mut self, index: Arc<dyn NeighborIndex>) -> Result<Self> {
        if index.len() != self.normalized.len() {
            return Err(Error::InvalidArgument(format!(
                "index holds {} vectors but the table has {} rows",
                index.len(),
                self.normalized.len()
            )));
        }
        self.index = Some(index);
        Ok(self)
    }

    fn search<R>(&self, f: impl FnOnce(&dyn NeighborIndex) -> R) -> R {
        match &self.index {
            Some(index) => f(index.as_ref()),
            None => f(&BruteForceIndex::new(self.normalized.vectors())),
        }
    }

    pub fn table(&self) -> &FeatureTable {
        &self.table
    }

    pub fn normalized(&self) -> &NormalizedTable {
        &self.normalized
    }

    pub fn stats(&self) -> &NormalizationStats {
        self.normalized.stats()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolve a query to a row index using the configured match policy
    pub fn locate(&self, predicate: &QueryPredicate) -> Result<ItemIndex> {
        locate_query(&self.table, predicate, self.config.match_policy)
    }

    /// `default_k` neighbors of the row matching `predicate`
    pub fn similar_to(&self, predicate: &QueryPredicate) -> Result<NeighborResult> {
        self.similar_to_k(predicate, self.config.default_k)
    }

    /// `k` neighbors of the row matching `predicate`
    pub fn similar_to_k(&self, predicate: &QueryPredicate, k: usize) -> Result<NeighborResult> {
        let row = self.locate(predicate)?;
        self.search(|index| nearest_neighbors_with(index, &self.normalized, row, k))
    }

    /// `default_k` neighbors for each query, in query order.
    ///
    /// Every query is resolved before any search runs, so a bad query fails
    /// fast without partial results.
    pub fn similar_to_many(&self, predicates: &[QueryPredicate]) -> Result<Vec<NeighborResult>> {
        let indices = locate_all(&self.table, predicates, self.config.match_policy)?;
        let results = self.search(|index| {
            batch_nearest_neighbors_with(
                index,
                &self.normalized,
                &indices,
                self.config.default_k,
                self.config.parallel_batch,
            )
        })?;
        Ok(results.into_iter().map(|(_, r)| r).collect())
    }

    /// `k` rows closest to an unstandardized external feature vector
    pub fn similar_to_vector(&self, raw: &Vector, k: usize) -> Result<NeighborResult> {
        self.search(|index| nearest_to_vector_with(index, &self.normalized, raw, k))
    }

    /// Per-column breakdown of the distance between two rows
    pub fn explain(&self, query: ItemIndex, neighbor: ItemIndex) -> Result<Explanation> {
        explain(&self.normalized, query, neighbor)
    }
}
