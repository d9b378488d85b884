//! Query resolution
//!
//! Maps a human-entered query onto exactly one row of a [`FeatureTable`].
//! Fuzzy queries fold both sides (lowercase, whitespace removed) and match
//! by substring, so `"blindinglights"` finds "Blinding Lights".

use serde::{Deserialize, Serialize};
use simtab_core::{FeatureTable, ItemId, ItemIndex};
use std::fmt;
use tracing::debug;

use crate::error::{Error, Result};

/// How to resolve a query that matches several rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Several matches fail with [`Error::AmbiguousMatch`]
    #[default]
    Unique,
    /// Take the first match in table order
    FirstOccurrence,
}

/// A query identifying one row of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryPredicate {
    /// Exact identifier
    Id(ItemId),
    /// Substring match on the folded name and, when given, the folded
    /// secondary field
    Fuzzy {
        name: String,
        #[serde(default)]
        secondary: Option<String>,
    },
}

impl QueryPredicate {
    pub fn id(id: impl Into<ItemId>) -> Self {
        QueryPredicate::Id(id.into())
    }

    pub fn fuzzy(name: impl Into<String>) -> Self {
        QueryPredicate::Fuzzy {
            name: name.into(),
            secondary: None,
        }
    }

    pub fn fuzzy_with_secondary(name: impl Into<String>, secondary: impl Into<String>) -> Self {
        QueryPredicate::Fuzzy {
            name: name.into(),
            secondary: Some(secondary.into()),
        }
    }
}

impl fmt::Display for QueryPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryPredicate::Id(id) => write!(f, "'{}'", id),
            QueryPredicate::Fuzzy { name, secondary: None } => write!(f, "~'{}'", name),
            QueryPredicate::Fuzzy {
                name,
                secondary: Some(secondary),
            } => write!(f, "~'{}' by ~'{}'", name, secondary),
        }
    }
}

/// Lowercase and strip all whitespace
pub fn fold(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Resolve `predicate` to exactly one row index.
///
/// Zero matches fail with [`Error::NotFound`]. Several matches fail with
/// [`Error::AmbiguousMatch`] under [`MatchPolicy::Unique`], or resolve to the
/// first match in table order under [`MatchPolicy::FirstOccurrence`].
pub fn locate_query(
    table: &FeatureTable,
    predicate: &QueryPredicate,
    policy: MatchPolicy,
) -> Result<ItemIndex> {
    let matches = matching_rows(table, predicate)?;

    match matches.as_slice() {
        [] => Err(Error::NotFound {
            query: predicate.to_string(),
        }),
        [index] => {
            debug!(query = %predicate, index, "query resolved");
            Ok(*index)
        }
        [first, ..] => match policy {
            MatchPolicy::FirstOccurrence => {
                debug!(
                    query = %predicate,
                    index = *first,
                    matches = matches.len(),
                    "ambiguous query resolved to first occurrence"
                );
                Ok(*first)
            }
            MatchPolicy::Unique => Err(Error::AmbiguousMatch {
                query: predicate.to_string(),
                candidates: matches
                    .iter()
                    .filter_map(|i| table.id(*i).cloned())
                    .collect(),
            }),
        },
    }
}

/// Resolve several queries, failing on the first that does not resolve
pub fn locate_all(
    table: &FeatureTable,
    predicates: &[QueryPredicate],
    policy: MatchPolicy,
) -> Result<Vec<ItemIndex>> {
    predicates
        .iter()
        .map(|p| locate_query(table, p, policy))
        .collect()
}

/// Every row matching `predicate`, in table order
pub fn matching_rows(table: &FeatureTable, predicate: &QueryPredicate) -> Result<Vec<ItemIndex>> {
    match predicate {
        QueryPredicate::Id(id) => Ok(table.index_of(id).into_iter().collect()),
        QueryPredicate::Fuzzy { name, secondary } => {
            let name = fold(name);
            if name.is_empty() {
                return Err(Error::InvalidArgument(
                    "fuzzy query name cannot be empty".to_string(),
                ));
            }
            let secondary = secondary.as_deref().map(fold);

            Ok(table
                .items()
                .iter()
                .enumerate()
                .filter(|(_, item)| {
                    fold(&item.id.name).contains(&name)
                        && match (&secondary, &item.id.secondary) {
                            (None, _) => true,
                            (Some(wanted), Some(have)) => fold(have).contains(wanted.as_str()),
                            (Some(_), None) => false,
                        }
                })
                .map(|(i, _)| i)
                .collect())
        }
    }
}
