//! Engine configuration
//!
//! Every field has a default, so a config file only needs the keys it
//! changes:
//!
//! ```json
//! { "default_k": 5, "match_policy": "first_occurrence" }
//! ```

use serde::{Deserialize, Serialize};
use simtab_core::DegenerateColumnPolicy;
use std::path::Path;

use crate::error::Result;
use crate::locate::MatchPolicy;

/// Number of neighbors returned when the caller does not ask for a count
pub const DEFAULT_K: usize = 10;

/// Configuration for a [`crate::SimilarityEngine`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Neighbors per query
    pub default_k: usize,
    /// Handling of zero-variance columns during normalization
    pub degenerate_columns: DegenerateColumnPolicy,
    /// Handling of queries that match several rows
    pub match_policy: MatchPolicy,
    /// Run batch queries on the rayon thread pool
    pub parallel_batch: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_k: DEFAULT_K,
            degenerate_columns: DegenerateColumnPolicy::Zero,
            match_policy: MatchPolicy::Unique,
            parallel_batch: true,
        }
    }
}

impl EngineConfig {
    pub fn with_default_k(mut self, k: usize) -> Self {
        self.default_k = k;
        self
    }

    pub fn with_degenerate_columns(mut self, policy: DegenerateColumnPolicy) -> Self {
        self.degenerate_columns = policy;
        self
    }

    pub fn with_match_policy(mut self, policy: MatchPolicy) -> Self {
        self.match_policy = policy;
        self
    }

    pub fn with_parallel_batch(mut self, parallel: bool) -> Self {
        self.parallel_batch = parallel;
        self
    }

    /// Reject settings no query could satisfy
    pub fn validate(&self) -> Result<()> {
        if self.default_k == 0 {
            return Err(simtab_core::Error::Config("default_k must be at least 1".to_string()).into());
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(simtab_core::Error::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(simtab_core::Error::from)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.default_k, 10);
        assert_eq!(config.match_policy, MatchPolicy::Unique);
        assert_eq!(config.degenerate_columns, DegenerateColumnPolicy::Zero);
        assert!(config.parallel_batch);
    }

    #[test]
    fn test_partial_json() {
        let config =
            EngineConfig::from_json_str(r#"{"default_k": 3, "match_policy": "first_occurrence"}"#)
                .unwrap();
        assert_eq!(config.default_k, 3);
        assert_eq!(config.match_policy, MatchPolicy::FirstOccurrence);
        assert!(config.parallel_batch);
    }

    #[test]
    fn test_zero_k_rejected() {
        let err = EngineConfig::from_json_str(r#"{"default_k": 0}"#).unwrap_err();
        assert!(matches!(err, Error::Core(simtab_core::Error::Config(_))));
    }

    #[test]
    fn test_malformed_json() {
        let err = EngineConfig::from_json_str("{ nope").unwrap_err();
        assert!(matches!(err, Error::Core(simtab_core::Error::Serialization(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"degenerate_columns": "reject", "parallel_batch": false}}"#).unwrap();

        let config = EngineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.degenerate_columns, DegenerateColumnPolicy::Reject);
        assert!(!config.parallel_batch);
        assert_eq!(config.default_k, DEFAULT_K);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = EngineConfig::from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::Core(simtab_core::Error::Io(_))));
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::default()
            .with_default_k(4)
            .with_match_policy(MatchPolicy::FirstOccurrence)
            .with_parallel_batch(false)
            .with_degenerate_columns(DegenerateColumnPolicy::Reject);
        assert_eq!(config.default_k, 4);
        assert!(config.validate().is_ok());
    }
}
