use serde::{Deserialize, Serialize};
use std::fmt;
use crate::vector::Vector;

/// Position of an item within its table.
pub type ItemIndex = usize;

/// Identifier of an item: a primary name plus an optional secondary field
/// (for songs, the track name and the artist).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
}

impl ItemId {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secondary: None,
        }
    }

    pub fn with_secondary(name: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secondary: Some(secondary.into()),
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.secondary {
            Some(secondary) => write!(f, "{} ({})", self.name, secondary),
            None => write!(f, "{}", self.name),
        }
    }
}

impl From<&str> for ItemId {
    fn from(name: &str) -> Self {
        ItemId::new(name)
    }
}

/// An identified feature vector
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub features: Vector,
}

impl Item {
    pub fn new(id: impl Into<ItemId>, features: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            features: Vector::new(features),
        }
    }
}
