//! Per-column normalization statistics
//!
//! Mean and sample standard deviation (n - 1 denominator) for every feature
//! column, computed once over an immutable table.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};
use crate::table::FeatureTable;
use crate::vector::Vector;

/// Relative threshold below which a standard deviation counts as zero.
///
/// Identical values rarely produce an exact `0.0` deviation once the mean has
/// been rounded, so the comparison is scaled by the column magnitude only.
/// Columns of any scale with real spread stay non-degenerate.
pub const DEGENERATE_STD_EPSILON: f64 = 1e-9;

/// Statistics for one feature column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub name: String,
    pub mean: f64,
    /// Sample standard deviation; `NaN` when fewer than two rows exist
    pub std_dev: f64,
    /// Zero, undefined or non-finite standard deviation
    pub degenerate: bool,
}

impl ColumnStats {
    fn from_values(name: &str, values: impl Iterator<Item = f32>) -> Self {
        let values: Vec<f64> = values.map(f64::from).collect();
        let count = values.len();

        let mean = if count == 0 {
            0.0
        } else {
            values.iter().sum::<f64>() / count as f64
        };

        let std_dev = if count < 2 {
            f64::NAN
        } else {
            let sum_sq: f64 = values.iter().map(|x| (x - mean).powi(2)).sum();
            (sum_sq / (count - 1) as f64).sqrt()
        };

        let degenerate = !std_dev.is_finite()
            || std_dev == 0.0
            || std_dev <= DEGENERATE_STD_EPSILON * mean.abs();

        Self {
            name: name.to_string(),
            mean,
            std_dev,
            degenerate,
        }
    }

    /// Standardize one raw value; degenerate columns always map to zero
    #[inline]
    pub fn standardize(&self, value: f32) -> f32 {
        if self.degenerate {
            0.0
        } else {
            ((f64::from(value) - self.mean) / self.std_dev) as f32
        }
    }
}

/// Mean and standard deviation for every column of a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationStats {
    columns: Vec<ColumnStats>,
}

impl NormalizationStats {
    /// Compute statistics over every column of `table`
    pub fn compute(table: &FeatureTable) -> Self {
        let columns = table
            .schema()
            .columns()
            .iter()
            .enumerate()
            .map(|(i, name)| ColumnStats::from_values(name, table.column_values(i)))
            .collect();

        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[ColumnStats] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&ColumnStats> {
        self.columns.get(index)
    }

    /// Names of zero-variance columns, in schema order
    pub fn degenerate_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.degenerate)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Standardize a raw vector with these statistics.
    ///
    /// Used for feature vectors that are not part of the table.
    pub fn apply(&self, raw: &Vector) -> Result<Vector> {
        if raw.dim() != self.columns.len() {
            return Err(SchemaError::DimensionMismatch {
                expected: self.columns.len(),
                actual: raw.dim(),
            }
            .into());
        }

        let data = raw
            .as_slice()
            .iter()
            .zip(&self.columns)
            .map(|(v, col)| if v.is_finite() { col.standardize(*v) } else { 0.0 })
            .collect();

        Ok(Vector::new(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Item, ItemId};
    use crate::table::FeatureSchema;

    fn table(rows: &[&[f32]]) -> FeatureTable {
        let dim = rows.first().map(|r| r.len()).unwrap_or(1);
        let schema = FeatureSchema::new((0..dim).map(|i| format!("f{}", i))).unwrap();
        let items = rows
            .iter()
            .enumerate()
            .map(|(i, v)| Item::new(ItemId::new(format!("r{}", i)), v.to_vec()))
            .collect();
        FeatureTable::new(schema, items).unwrap()
    }

    #[test]
    fn test_sample_std() {
        let t = table(&[&[2.0], &[4.0], &[4.0], &[4.0], &[5.0], &[5.0], &[7.0], &[9.0]]);
        let stats = NormalizationStats::compute(&t);
        let col = stats.column(0).unwrap();
        assert!((col.mean - 5.0).abs() < 1e-12);
        // population std is 2.0; sample std is sqrt(32 / 7)
        assert!((col.std_dev - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert!(!col.degenerate);
    }

    #[test]
    fn test_constant_column_degenerate() {
        let t = table(&[&[0.1, 1.0], &[0.1, 2.0], &[0.1, 3.0]]);
        let stats = NormalizationStats::compute(&t);
        assert_eq!(stats.degenerate_columns(), vec!["f0"]);
        assert_eq!(stats.column(0).unwrap().standardize(0.1), 0.0);
    }

    #[test]
    fn test_tiny_scale_column_not_degenerate() {
        let t = table(&[&[0.0], &[3e-10], &[1e-10]]);
        let stats = NormalizationStats::compute(&t);
        let col = stats.column(0).unwrap();
        assert!(col.std_dev > 0.0);
        assert!(stats.degenerate_columns().is_empty());

        let b = col.standardize(3e-10);
        let c = col.standardize(1e-10);
        assert!(b > c && c > col.standardize(0.0));
        assert!(b.is_finite());
    }

    #[test]
    fn test_large_constant_column_degenerate() {
        let t = table(&[&[123456.7, 1.0], &[123456.7, 2.0], &[123456.7, 4.0]]);
        let stats = NormalizationStats::compute(&t);
        assert_eq!(stats.degenerate_columns(), vec!["f0"]);
    }

    #[test]
    fn test_single_row_degenerate() {
        let t = table(&[&[3.0, 4.0]]);
        let stats = NormalizationStats::compute(&t);
        assert_eq!(stats.degenerate_columns(), vec!["f0", "f1"]);
    }

    #[test]
    fn test_apply_external_vector() {
        let t = table(&[&[0.0, 5.0], &[2.0, 5.0]]);
        let stats = NormalizationStats::compute(&t);
        let v = stats.apply(&Vector::new(vec![1.0, 9.0])).unwrap();
        assert_eq!(v.as_slice(), &[0.0, 0.0]);

        let err = stats.apply(&Vector::new(vec![1.0])).unwrap_err();
        assert!(err.is_schema());
    }
}
