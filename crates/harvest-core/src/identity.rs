//! Identity types for resources, products and entities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique handle of a harvestable entity in the host world
///
/// Handles are opaque: a handle may stop resolving at any time when the
/// entity is harvested, burnt or otherwise removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityHandle(pub u64);

impl EntityHandle {
    /// Create a new entity handle
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw handle value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity:{}", self.0)
    }
}

/// Identifier for a harvestable kind (a tree species, a plant species)
///
/// Defined by the host; string based so it can be written in RON files.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceType(pub String);

impl ResourceType {
    /// Create a new resource type
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ResourceType {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ResourceType {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identifier for a banked product counted by a stock trigger (wood, berries)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl ProductId {
    /// Create a new product ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_handle() {
        let handle = EntityHandle::new(42);
        assert_eq!(handle.raw(), 42);
        assert_eq!(format!("{}", handle), "entity:42");
    }

    #[test]
    fn test_resource_type() {
        let kind = ResourceType::new("oak");
        assert_eq!(kind.as_str(), "oak");
        assert_eq!(ResourceType::from("oak"), kind);
        assert_eq!(format!("{}", kind), "oak");
    }

    #[test]
    fn test_product_id_is_transparent_in_ron() {
        let product = ProductId::new("WoodLog");
        let text = ron::to_string(&product).unwrap();
        assert_eq!(text, "\"WoodLog\"");
    }
}
