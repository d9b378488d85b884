//! Neighbor index seam
//!
//! Neighbor queries are written against [`NeighborIndex`]. The only
//! implementation is an exact brute-force scan, O(n·d) per query, which is
//! plenty for tables of a few thousand rows. A tree-based index can implement
//! the same trait without changing the query functions.

use ordered_float::OrderedFloat;
use simtab_core::distance::l2_distance;
use simtab_core::{ItemIndex, Vector};

/// Exact k-nearest-neighbor search over a fixed set of vectors
pub trait NeighborIndex: Send + Sync {
    /// Number of indexed vectors
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `k` closest rows to `query`, ascending by Euclidean distance.
    ///
    /// `exclude` is never returned. Equal distances keep table order.
    fn search(&self, query: &[f32], k: usize, exclude: Option<ItemIndex>) -> Vec<(ItemIndex, f32)>;
}

/// Linear scan over borrowed vectors
#[derive(Debug, Clone, Copy)]
pub struct BruteForceIndex<'a> {
    vectors: &'a [Vector],
}

impl<'a> BruteForceIndex<'a> {
    pub fn new(vectors: &'a [Vector]) -> Self {
        Self { vectors }
    }
}

impl NeighborIndex for BruteForceIndex<'_> {
    fn len(&self) -> usize {
        self.vectors.len()
    }

    fn search(&self, query: &[f32], k: usize, exclude: Option<ItemIndex>) -> Vec<(ItemIndex, f32)> {
        let mut scored: Vec<(ItemIndex, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != exclude)
            .map(|(i, v)| (i, l2_distance(query, v.as_slice())))
            .collect();

        // sort_by_key is stable, so ties keep table order
        scored.sort_by_key(|&(_, d)| OrderedFloat(d));
        scored.truncate(k);
        scored
    }
}
