use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Column '{column}' has zero variance and cannot be standardized")]
    DegenerateColumn { column: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Returns `true` when the table or a supplied vector does not fit the schema.
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema(_))
    }

    /// Returns `true` when normalization hit a zero-variance column.
    pub fn is_degenerate_column(&self) -> bool {
        matches!(self, Self::DegenerateColumn { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Problems detected while building a schema or a table.
///
/// All of these are raised at construction time so a query never runs
/// against a malformed table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Schema must declare at least one feature column")]
    EmptySchema,

    #[error("Column names cannot be empty")]
    EmptyColumnName,

    #[error("Column '{0}' is declared more than once")]
    DuplicateColumn(String),

    #[error("Row {row} has {actual} features, expected {expected}")]
    RaggedRow { row: usize, expected: usize, actual: usize },

    #[error("Identifier '{0}' appears more than once")]
    DuplicateId(String),

    #[error("Row {row} is missing identifier field '{field}'")]
    MissingIdField { row: usize, field: String },

    #[error("Row {row} is not an object")]
    NotAnObject { row: usize },

    #[error("Vector has {actual} features, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}
