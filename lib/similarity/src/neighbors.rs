//! Nearest-neighbor queries over a [`NormalizedTable`]

use rayon::prelude::*;
use serde::Serialize;
use simtab_core::{ItemId, ItemIndex, NormalizedTable, Vector};
use std::fmt;
use tracing::debug;

use crate::error::{Error, Result};
use crate::index::{BruteForceIndex, NeighborIndex};

/// One ranked neighbor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighbor {
    pub index: ItemIndex,
    pub id: ItemId,
    pub distance: f32,
}

/// Neighbors ascending by distance, query row excluded, at most `k` long
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeighborResult {
    /// Row the query was resolved to; `None` for external vectors
    pub query: Option<ItemIndex>,
    pub neighbors: Vec<Neighbor>,
}

impl NeighborResult {
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Neighbor> {
        self.neighbors.iter()
    }

    pub fn ids(&self) -> Vec<&ItemId> {
        self.neighbors.iter().map(|n| &n.id).collect()
    }

    pub fn indices(&self) -> Vec<ItemIndex> {
        self.neighbors.iter().map(|n| n.index).collect()
    }
}

impl<'a> IntoIterator for &'a NeighborResult {
    type Item = &'a Neighbor;
    type IntoIter = std::slice::Iter<'a, Neighbor>;

    fn into_iter(self) -> Self::IntoIter {
        self.neighbors.iter()
    }
}

/// Plain-text table: rank, identifier, distance
impl fmt::Display for NeighborResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .neighbors
            .iter()
            .map(|n| n.id.to_string().chars().count())
            .max()
            .unwrap_or(0)
            .max("item".len());

        writeln!(f, "{:>4}  {:<width$}  {:>10}", "rank", "item", "distance", width = width)?;
        for (rank, n) in self.neighbors.iter().enumerate() {
            writeln!(
                f,
                "{:>4}  {:<width$}  {:>10.4}",
                rank + 1,
                n.id.to_string(),
                n.distance,
                width = width
            )?;
        }
        Ok(())
    }
}

fn check_k(k: usize) -> Result<()> {
    if k == 0 {
        return Err(Error::InvalidArgument("k must be a positive integer".to_string()));
    }
    Ok(())
}

fn to_result(
    table: &NormalizedTable,
    query: Option<ItemIndex>,
    hits: Vec<(ItemIndex, f32)>,
) -> NeighborResult {
    let neighbors = hits
        .into_iter()
        .filter_map(|(index, distance)| {
            table.id(index).map(|id| Neighbor {
                index,
                id: id.clone(),
                distance,
            })
        })
        .collect();

    NeighborResult { query, neighbors }
}

/// The `k` rows closest to row `query_index`, excluding the row itself.
///
/// Asking for more neighbors than exist returns all `n - 1` of them.
pub fn nearest_neighbors(
    table: &NormalizedTable,
    query_index: ItemIndex,
    k: usize,
) -> Result<NeighborResult> {
    nearest_neighbors_with(&BruteForceIndex::new(table.vectors()), table, query_index, k)
}

/// [`nearest_neighbors`] against a caller-supplied index built over the
/// same vectors as `table`
pub fn nearest_neighbors_with<I: NeighborIndex + ?Sized>(
    index: &I,
    table: &NormalizedTable,
    query_index: ItemIndex,
    k: usize,
) -> Result<NeighborResult> {
    check_k(k)?;
    let query = table.vector(query_index).ok_or_else(|| {
        Error::InvalidArgument(format!(
            "query index {} out of range for table of {} rows",
            query_index,
            table.len()
        ))
    })?;

    let hits = index.search(query.as_slice(), k, Some(query_index));
    Ok(to_result(table, Some(query_index), hits))
}

/// The `k` rows closest to an external, unstandardized feature vector.
///
/// The vector is standardized with the table's statistics; no row is
/// excluded.
pub fn nearest_to_vector(
    table: &NormalizedTable,
    raw: &Vector,
    k: usize,
) -> Result<NeighborResult> {
    nearest_to_vector_with(&BruteForceIndex::new(table.vectors()), table, raw, k)
}

/// [`nearest_to_vector`] against a caller-supplied index
pub fn nearest_to_vector_with<I: NeighborIndex + ?Sized>(
    index: &I,
    table: &NormalizedTable,
    raw: &Vector,
    k: usize,
) -> Result<NeighborResult> {
    check_k(k)?;
    let query = table.stats().apply(raw)?;
    let hits = index.search(query.as_slice(), k, None);
    Ok(to_result(table, None, hits))
}

/// Run [`nearest_neighbors`] for every query index.
///
/// Results come back in submission order whether or not the queries ran in
/// parallel. Any failing query fails the whole batch.
pub fn batch_nearest_neighbors(
    table: &NormalizedTable,
    query_indices: &[ItemIndex],
    k: usize,
    parallel: bool,
) -> Result<Vec<(ItemIndex, NeighborResult)>> {
    batch_nearest_neighbors_with(
        &BruteForceIndex::new(table.vectors()),
        table,
        query_indices,
        k,
        parallel,
    )
}

/// [`batch_nearest_neighbors`] against a caller-supplied index
pub fn batch_nearest_neighbors_with<I: NeighborIndex + ?Sized>(
    index: &I,
    table: &NormalizedTable,
    query_indices: &[ItemIndex],
    k: usize,
    parallel: bool,
) -> Result<Vec<(ItemIndex, NeighborResult)>> {
    check_k(k)?;
    debug!(queries = query_indices.len(), k, parallel, "batch neighbor search");

    let run = |&q: &ItemIndex| nearest_neighbors_with(index, table, q, k).map(|r| (q, r));

    if parallel {
        query_indices.par_iter().map(run).collect()
    } else {
        query_indices.iter().map(run).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simtab_core::{normalize, DegenerateColumnPolicy, FeatureSchema, FeatureTable, Item};

    fn abc() -> NormalizedTable {
        let schema = FeatureSchema::new(["x", "y"]).unwrap();
        let table = FeatureTable::new(
            schema,
            vec![
                Item::new("A", vec![0.0, 0.0]),
                Item::new("B", vec![1.0, 0.0]),
                Item::new("C", vec![3.0, 0.0]),
            ],
        )
        .unwrap();
        normalize(&table, DegenerateColumnPolicy::Zero).unwrap()
    }

    #[test]
    fn test_abc_scenario() {
        let table = abc();
        let result = nearest_neighbors(&table, 0, 2).unwrap();
        let names: Vec<_> = result.ids().iter().map(|id| id.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C"]);
        assert_eq!(result.query, Some(0));
        assert!(result.neighbors[0].distance < result.neighbors[1].distance);
    }

    #[test]
    fn test_k_larger_than_table() {
        let table = abc();
        let result = nearest_neighbors(&table, 1, 50).unwrap();
        assert_eq!(result.len(), 2);
        assert!(!result.indices().contains(&1));
    }

    #[test]
    fn test_invalid_k_and_index() {
        let table = abc();
        assert!(nearest_neighbors(&table, 0, 0).unwrap_err().is_invalid_argument());
        assert!(nearest_neighbors(&table, 3, 1).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_nearest_to_vector() {
        let table = abc();
        // raw [2.6, 0] lies closest to C, then B, then A
        let result = nearest_to_vector(&table, &Vector::new(vec![2.6, 0.0]), 3).unwrap();
        assert_eq!(result.query, None);
        assert_eq!(result.indices(), vec![2, 1, 0]);

        let err = nearest_to_vector(&table, &Vector::new(vec![1.0]), 3).unwrap_err();
        assert!(matches!(err, Error::Core(e) if e.is_schema()));
    }

    #[test]
    fn test_batch_preserves_order() {
        let table = abc();
        let queries = [2, 0, 2, 1];
        let serial = batch_nearest_neighbors(&table, &queries, 1, false).unwrap();
        let parallel = batch_nearest_neighbors(&table, &queries, 1, true).unwrap();
        assert_eq!(serial, parallel);
        let order: Vec<_> = serial.iter().map(|(q, _)| *q).collect();
        assert_eq!(order, vec![2, 0, 2, 1]);
        assert_eq!(serial[0].1.indices(), vec![1]);
    }

    #[test]
    fn test_batch_fails_on_bad_index() {
        let table = abc();
        assert!(batch_nearest_neighbors(&table, &[0, 9], 1, true).is_err());
        assert!(batch_nearest_neighbors(&table, &[0], 0, false)
            .unwrap_err()
            .is_invalid_argument());
    }

    /// Index that ignores distances and always returns rows in reverse order
    struct ReverseIndex(usize);

    impl NeighborIndex for ReverseIndex {
        fn len(&self) -> usize {
            self.0
        }

        fn search(&self, _query: &[f32], k: usize, exclude: Option<ItemIndex>) -> Vec<(ItemIndex, f32)> {
            (0..self.0)
                .rev()
                .filter(|i| Some(*i) != exclude)
                .take(k)
                .map(|i| (i, 0.0))
                .collect()
        }
    }

    #[test]
    fn test_custom_index_used_on_every_path() {
        let table = abc();
        let index = ReverseIndex(3);

        let by_row = nearest_neighbors_with(&index, &table, 2, 2).unwrap();
        assert_eq!(by_row.indices(), vec![1, 0]);

        let by_vector =
            nearest_to_vector_with(&index, &table, &Vector::new(vec![0.0, 0.0]), 1).unwrap();
        assert_eq!(by_vector.indices(), vec![2]);

        let batch = batch_nearest_neighbors_with(&index, &table, &[0, 2], 1, true).unwrap();
        assert_eq!(batch[0].1.indices(), vec![2]);
        assert_eq!(batch[1].1.indices(), vec![1]);

        let dynamic: &dyn NeighborIndex = &index;
        assert_eq!(nearest_neighbors_with(dynamic, &table, 0, 1).unwrap().indices(), vec![2]);
    }

    #[test]
    fn test_display_table() {
        let table = abc();
        let text = nearest_neighbors(&table, 0, 2).unwrap().to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("distance"));
        assert!(lines[1].trim_start().starts_with("1  B"));
    }
}
