//! Harvest metadata reported by the host

use crate::{Cell, EntityHandle, ProductId, ResourceType};
use serde::{Deserialize, Serialize};

/// Lifecycle stage of a harvestable entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleStage {
    Immature,
    Mature,
}

/// Static harvest metadata for a resource type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceInfo {
    pub kind: ResourceType,
    /// Display label, used for sorting allow-lists
    pub label: String,
    /// Yield of a fully grown specimen; zero for non-harvestable kinds
    pub harvest_yield: f32,
    /// Product banked when harvested
    pub product: Option<ProductId>,
    /// Host harvest tag ("Wood", "Standard", ...)
    pub harvest_tag: Option<String>,
}

impl ResourceInfo {
    /// Check whether this kind carries the given harvest tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.harvest_tag.as_deref() == Some(tag)
    }

    /// Check whether harvesting this kind banks the given product
    pub fn yields(&self, product: &ProductId) -> bool {
        self.product.as_ref() == Some(product)
    }
}

/// Snapshot of one live harvestable entity for the current tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantInfo {
    pub handle: EntityHandle,
    pub kind: ResourceType,
    pub position: Cell,
    pub stage: LifecycleStage,
    /// Quantity obtained if harvested right now
    pub yield_now: u32,
}

impl PlantInfo {
    pub fn is_mature(&self) -> bool {
        self.stage == LifecycleStage::Mature
    }
}
