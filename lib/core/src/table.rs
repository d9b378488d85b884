//! Feature schema and feature table
//!
//! A [`FeatureTable`] is an ordered, immutable collection of items that share
//! one [`FeatureSchema`]. Every structural problem (ragged rows, duplicate
//! identifiers, missing identifier fields) is rejected here, at construction
//! time, so queries never see a malformed table.
//!
//! Cells that cannot be read as numbers are coerced to zero rather than
//! dropped, which keeps row indices aligned with identifiers. Every coerced
//! cell is recorded in a [`CoercionReport`].

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::{Result, SchemaError};
use crate::item::{Item, ItemId, ItemIndex};
use crate::vector::Vector;

/// Ordered list of named numeric feature columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    columns: Vec<String>,
}

impl FeatureSchema {
    /// Create a schema, rejecting empty schemas and empty or repeated names
    pub fn new<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            return Err(SchemaError::EmptySchema.into());
        }

        let mut seen = AHashSet::with_capacity(columns.len());
        for name in &columns {
            if name.trim().is_empty() {
                return Err(SchemaError::EmptyColumnName.into());
            }
            if !seen.insert(name.as_str()) {
                return Err(SchemaError::DuplicateColumn(name.clone()).into());
            }
        }

        Ok(Self { columns })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(String::as_str)
    }

    /// Position of a column by name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// Why a cell was replaced with zero
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", content = "value", rename_all = "snake_case")]
pub enum CoercionReason {
    /// The field was absent or null
    Missing,
    /// The field held something that does not parse as a number
    NonNumeric(String),
    /// The value was NaN or infinite
    NonFinite,
}

/// A single cell that was coerced to zero
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoercedCell {
    pub row: ItemIndex,
    pub column: String,
    #[serde(flatten)]
    pub reason: CoercionReason,
}

/// Every cell that was coerced to zero while building a table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoercionReport {
    cells: Vec<CoercedCell>,
}

impl CoercionReport {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[CoercedCell] {
        &self.cells
    }

    /// Number of coerced cells in one column
    pub fn count_for_column(&self, column: &str) -> usize {
        self.cells.iter().filter(|c| c.column == column).count()
    }

    fn push(&mut self, row: ItemIndex, column: &str, reason: CoercionReason) {
        self.cells.push(CoercedCell {
            row,
            column: column.to_string(),
            reason,
        });
    }
}

/// Maps the string values of one column onto numbers before coercion.
///
/// Matching ignores ASCII case and surrounding whitespace. Values without an
/// entry take `default` and are not reported as coerced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalMapping {
    pub column: String,
    pub values: HashMap<String, f64>,
    #[serde(default)]
    pub default: f64,
}

impl CategoricalMapping {
    pub fn new(column: impl Into<String>, default: f64) -> Self {
        Self {
            column: column.into(),
            values: HashMap::new(),
            default,
        }
    }

    /// Add a value mapping
    pub fn map(mut self, value: impl Into<String>, number: f64) -> Self {
        self.values.insert(value.into().trim().to_ascii_lowercase(), number);
        self
    }

    /// Binary mapping: `positive` becomes 1.0, anything else 0.0
    pub fn binary(column: impl Into<String>, positive: impl Into<String>) -> Self {
        Self::new(column, 0.0).map(positive, 1.0)
    }

    fn lookup(&self, raw: &str) -> f64 {
        self.values
            .get(&raw.trim().to_ascii_lowercase())
            .copied()
            .unwrap_or(self.default)
    }
}

/// Where identifiers live in loosely typed records, plus categorical mappings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordLayout {
    pub name_field: String,
    #[serde(default)]
    pub secondary_field: Option<String>,
    #[serde(default)]
    pub categorical: Vec<CategoricalMapping>,
}

impl RecordLayout {
    pub fn new(name_field: impl Into<String>) -> Self {
        Self {
            name_field: name_field.into(),
            secondary_field: None,
            categorical: Vec::new(),
        }
    }

    pub fn with_secondary(mut self, field: impl Into<String>) -> Self {
        self.secondary_field = Some(field.into());
        self
    }

    pub fn with_categorical(mut self, mapping: CategoricalMapping) -> Self {
        self.categorical.push(mapping);
        self
    }

    fn mapping_for(&self, column: &str) -> Option<&CategoricalMapping> {
        self.categorical.iter().find(|m| m.column == column)
    }
}

/// Ordered, immutable collection of items sharing one schema
#[derive(Debug, Clone)]
pub struct FeatureTable {
    schema: FeatureSchema,
    items: Vec<Item>,
    by_id: AHashMap<ItemId, ItemIndex>,
}

impl FeatureTable {
    /// Build a table from items.
    ///
    /// Non-finite feature values are coerced to zero; use
    /// [`FeatureTable::from_rows`] to inspect which cells were touched.
    pub fn new(schema: FeatureSchema, items: Vec<Item>) -> Result<Self> {
        Self::from_rows(schema, items).map(|(table, _)| table)
    }

    /// Build a table from items and report every coerced cell
    pub fn from_rows(schema: FeatureSchema, mut items: Vec<Item>) -> Result<(Self, CoercionReport)> {
        let mut report = CoercionReport::default();

        for (row, item) in items.iter_mut().enumerate() {
            if item.features.dim() != schema.len() {
                return Err(SchemaError::RaggedRow {
                    row,
                    expected: schema.len(),
                    actual: item.features.dim(),
                }
                .into());
            }
            for dim in item.features.zero_non_finite() {
                report.push(row, &schema.columns[dim], CoercionReason::NonFinite);
            }
        }

        let table = Self::assemble(schema, items)?;
        log_coercions(&report);
        Ok((table, report))
    }

    /// Build a table from JSON-like records, the shape produced by CSV or
    /// JSON loaders.
    ///
    /// Rows are never dropped. Cells that are missing, null or non-numeric
    /// become zero and are listed in the returned report.
    pub fn from_records(
        schema: FeatureSchema,
        records: &[Value],
        layout: &RecordLayout,
    ) -> Result<(Self, CoercionReport)> {
        let mut report = CoercionReport::default();
        let mut items = Vec::with_capacity(records.len());

        for (row, record) in records.iter().enumerate() {
            let object = record
                .as_object()
                .ok_or(SchemaError::NotAnObject { row })?;

            let name = object
                .get(&layout.name_field)
                .and_then(id_text)
                .ok_or_else(|| SchemaError::MissingIdField {
                    row,
                    field: layout.name_field.clone(),
                })?;
            let secondary = layout
                .secondary_field
                .as_ref()
                .and_then(|field| object.get(field))
                .and_then(id_text);

            let mut features = Vec::with_capacity(schema.len());
            for column in schema.columns() {
                let value = match (object.get(column), layout.mapping_for(column)) {
                    (None | Some(Value::Null), _) => {
                        report.push(row, column, CoercionReason::Missing);
                        0.0
                    }
                    (Some(cell), mapping) => {
                        let coerced = match (cell, mapping) {
                            (Value::String(s), Some(mapping)) => finite(mapping.lookup(s)),
                            _ => coerce_number(cell),
                        };
                        match coerced {
                            Ok(v) => v,
                            Err(reason) => {
                                report.push(row, column, reason);
                                0.0
                            }
                        }
                    }
                };
                features.push(value as f32);
            }

            items.push(Item {
                id: ItemId { name, secondary },
                features: Vector::new(features),
            });
        }

        let table = Self::assemble(schema, items)?;
        log_coercions(&report);
        Ok((table, report))
    }

    fn assemble(schema: FeatureSchema, items: Vec<Item>) -> Result<Self> {
        let mut by_id = AHashMap::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            if by_id.insert(item.id.clone(), index).is_some() {
                return Err(SchemaError::DuplicateId(item.id.to_string()).into());
            }
        }

        debug!(
            rows = items.len(),
            columns = schema.len(),
            "feature table built"
        );

        Ok(Self {
            schema,
            items,
            by_id,
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, index: ItemIndex) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn id(&self, index: ItemIndex) -> Option<&ItemId> {
        self.items.get(index).map(|item| &item.id)
    }

    /// Row index of an exact identifier
    pub fn index_of(&self, id: &ItemId) -> Option<ItemIndex> {
        self.by_id.get(id).copied()
    }

    /// Values of one column in row order
    pub fn column_values(&self, column: usize) -> impl Iterator<Item = f32> + '_ {
        self.items
            .iter()
            .map(move |item| item.features.as_slice()[column])
    }
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read a cell as a number.
///
/// Strings are trimmed and may carry `,` thousands separators. Booleans are
/// not numbers.
fn coerce_number(cell: &Value) -> std::result::Result<f64, CoercionReason> {
    match cell {
        Value::Number(n) => n.as_f64().ok_or(CoercionReason::NonFinite).and_then(finite),
        Value::String(s) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
            match cleaned.parse::<f64>() {
                Ok(v) => finite(v),
                Err(_) => Err(CoercionReason::NonNumeric(s.clone())),
            }
        }
        Value::Null => Err(CoercionReason::Missing),
        other => Err(CoercionReason::NonNumeric(other.to_string())),
    }
}

/// Values must stay finite once narrowed to `f32`
fn finite(v: f64) -> std::result::Result<f64, CoercionReason> {
    if v.is_finite() && (v as f32).is_finite() {
        Ok(v)
    } else {
        Err(CoercionReason::NonFinite)
    }
}

fn log_coercions(report: &CoercionReport) {
    if !report.is_empty() {
        warn!(cells = report.len(), "coerced unreadable feature cells to zero");
    }
}
