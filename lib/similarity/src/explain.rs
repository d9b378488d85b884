//! Explainability for neighbor distances
//!
//! Breaks the squared Euclidean distance between two rows into per-column
//! contributions so a caller can see which features drove a match.

use serde::Serialize;
use simtab_core::distance::squared_differences;
use simtab_core::{ItemId, ItemIndex, NormalizedTable};

use crate::error::{Error, Result};

/// Contribution of one column to a distance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureContribution {
    pub column: String,
    /// Standardized value of the query row
    pub query_value: f32,
    /// Standardized value of the neighbor row
    pub neighbor_value: f32,
    /// `query_value - neighbor_value`
    pub difference: f32,
    /// Squared difference; all contributions sum to `distance²`
    pub contribution: f32,
}

/// Per-column breakdown of the distance between two rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub query: ItemId,
    pub neighbor: ItemId,
    pub distance: f32,
    /// Largest contribution first; equal contributions keep schema order
    pub contributions: Vec<FeatureContribution>,
}

impl Explanation {
    /// The column that contributes most to the distance
    pub fn dominant_feature(&self) -> Option<&FeatureContribution> {
        self.contributions.first()
    }
}

/// Explain the distance between rows `query_index` and `neighbor_index`
pub fn explain(
    table: &NormalizedTable,
    query_index: ItemIndex,
    neighbor_index: ItemIndex,
) -> Result<Explanation> {
    let row = |i: ItemIndex| {
        table
            .vector(i)
            .zip(table.id(i))
            .ok_or_else(|| Error::InvalidArgument(format!("row {} out of range", i)))
    };
    let (q, q_id) = row(query_index)?;
    let (n, n_id) = row(neighbor_index)?;

    let differences = q - n;
    let squares = squared_differences(q.as_slice(), n.as_slice());

    let mut contributions: Vec<FeatureContribution> = table
        .schema()
        .columns()
        .iter()
        .enumerate()
        .map(|(i, column)| FeatureContribution {
            column: column.clone(),
            query_value: q.as_slice()[i],
            neighbor_value: n.as_slice()[i],
            difference: differences.as_slice()[i],
            contribution: squares[i],
        })
        .collect();

    contributions.sort_by(|a, b| b.contribution.total_cmp(&a.contribution));

    Ok(Explanation {
        query: q_id.clone(),
        neighbor: n_id.clone(),
        distance: squares.iter().sum::<f32>().sqrt(),
        contributions,
    })
}
