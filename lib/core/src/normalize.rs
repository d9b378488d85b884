//! Column standardization
//!
//! Turns a [`FeatureTable`] into a [`NormalizedTable`] where every column has
//! zero mean and unit sample standard deviation. Zero-variance columns are
//! handled according to a [`DegenerateColumnPolicy`]; the output never
//! contains NaN or infinite values.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::item::{ItemId, ItemIndex};
use crate::stats::NormalizationStats;
use crate::table::{FeatureSchema, FeatureTable};
use crate::vector::Vector;

/// What to do with a column whose standard deviation is zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateColumnPolicy {
    /// Every value of the column becomes `0.0`
    #[default]
    Zero,
    /// Fail with [`Error::DegenerateColumn`]
    Reject,
}

/// Standardized vectors aligned by row with the source table's identifiers
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    schema: FeatureSchema,
    ids: Vec<ItemId>,
    vectors: Vec<Vector>,
    stats: NormalizationStats,
}

impl NormalizedTable {
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn stats(&self) -> &NormalizationStats {
        &self.stats
    }

    pub fn ids(&self) -> &[ItemId] {
        &self.ids
    }

    pub fn id(&self, index: ItemIndex) -> Option<&ItemId> {
        self.ids.get(index)
    }

    pub fn vectors(&self) -> &[Vector] {
        &self.vectors
    }

    pub fn vector(&self, index: ItemIndex) -> Option<&Vector> {
        self.vectors.get(index)
    }
}

/// Standardize every column of `table`: `(value - mean) / std`.
///
/// Deterministic: the same table always produces identical output.
pub fn normalize(table: &FeatureTable, policy: DegenerateColumnPolicy) -> Result<NormalizedTable> {
    let stats = NormalizationStats::compute(table);

    let degenerate = stats.degenerate_columns();
    if !degenerate.is_empty() {
        match policy {
            DegenerateColumnPolicy::Reject => {
                return Err(Error::DegenerateColumn {
                    column: degenerate[0].to_string(),
                });
            }
            DegenerateColumnPolicy::Zero => {
                debug!(columns = ?degenerate, "zero-variance columns standardized to 0");
            }
        }
    }

    let vectors = table
        .items()
        .iter()
        .map(|item| {
            let data = item
                .features
                .as_slice()
                .iter()
                .zip(stats.columns())
                .map(|(v, col)| col.standardize(*v))
                .collect();
            Vector::new(data)
        })
        .collect();

    let ids = table.items().iter().map(|item| item.id.clone()).collect();

    debug!(rows = table.len(), columns = stats.len(), "table normalized");

    Ok(NormalizedTable {
        schema: table.schema().clone(),
        ids,
        vectors,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Item;

    fn abc_table() -> FeatureTable {
        let schema = FeatureSchema::new(["x", "y"]).unwrap();
        FeatureTable::new(
            schema,
            vec![
                Item::new("A", vec![0.0, 0.0]),
                Item::new("B", vec![1.0, 0.0]),
                Item::new("C", vec![3.0, 0.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_zero_policy_defined_values() {
        let normalized = normalize(&abc_table(), DegenerateColumnPolicy::Zero).unwrap();
        assert_eq!(normalized.len(), 3);
        for v in normalized.vectors() {
            assert!(v.as_slice().iter().all(|x| x.is_finite()));
            assert_eq!(v.as_slice()[1], 0.0);
        }
        assert_eq!(normalized.stats().degenerate_columns(), vec!["y"]);
    }

    #[test]
    fn test_standardized_column_moments() {
        let normalized = normalize(&abc_table(), DegenerateColumnPolicy::Zero).unwrap();
        let xs: Vec<f64> = normalized
            .vectors()
            .iter()
            .map(|v| f64::from(v.as_slice()[0]))
            .collect();
        let mean = xs.iter().sum::<f64>() / 3.0;
        let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / 2.0;
        assert!(mean.abs() < 1e-6);
        assert!((var - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_reject_policy() {
        let err = normalize(&abc_table(), DegenerateColumnPolicy::Reject).unwrap_err();
        assert!(err.is_degenerate_column());
        assert!(matches!(err, Error::DegenerateColumn { column } if column == "y"));
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let table = abc_table();
        let first = normalize(&table, DegenerateColumnPolicy::Zero).unwrap();
        let second = normalize(&table, DegenerateColumnPolicy::Zero).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_ids_stay_aligned() {
        let normalized = normalize(&abc_table(), DegenerateColumnPolicy::Zero).unwrap();
        assert_eq!(normalized.id(2), Some(&ItemId::new("C")));
        assert!(normalized.vector(3).is_none());
    }

    #[test]
    fn test_policy_serde() {
        let p: DegenerateColumnPolicy = serde_json::from_str("\"reject\"").unwrap();
        assert_eq!(p, DegenerateColumnPolicy::Reject);
        assert_eq!(DegenerateColumnPolicy::default(), DegenerateColumnPolicy::Zero);
    }
}
