//! Error types for similarity queries.

use simtab_core::{ItemId, SchemaError};
use thiserror::Error;

/// Errors raised while resolving or answering a similarity query.
#[derive(Debug, Error)]
pub enum Error {
    /// An error propagated from table construction or normalization.
    #[error(transparent)]
    Core(#[from] simtab_core::Error),

    /// No row matches the query.
    #[error("No item matches query {query}")]
    NotFound { query: String },

    /// Several rows match the query and no tie-break was configured.
    #[error("Query {query} is ambiguous: {} items match", .candidates.len())]
    AmbiguousMatch {
        query: String,
        candidates: Vec<ItemId>,
    },

    /// A caller-supplied argument is out of range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Returns `true` when the query matched nothing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` when the query matched more than one item.
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::AmbiguousMatch { .. })
    }

    /// Returns `true` when the caller passed an out-of-range argument.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_) | Self::Core(simtab_core::Error::InvalidArgument(_))
        )
    }
}

impl From<SchemaError> for Error {
    fn from(err: SchemaError) -> Self {
        Error::Core(err.into())
    }
}

/// Convenience alias for similarity results.
pub type Result<T> = std::result::Result<T, Error>;
