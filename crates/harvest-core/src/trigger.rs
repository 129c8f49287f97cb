//! Stock threshold trigger

use crate::{ProductId, WorldView};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// The set of products a trigger counts as stock
///
/// # Example
///
/// ```
/// use harvest_core::{ProductId, StockFilter};
///
/// let mut filter = StockFilter::only(ProductId::new("Berries"));
/// filter.set_allow(ProductId::new("Agave"), true);
/// assert!(filter.allows(&ProductId::new("Agave")));
/// assert!(!filter.allows(&ProductId::new("WoodLog")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockFilter {
    allowed: IndexSet<ProductId>,
}

impl StockFilter {
    /// Create a filter that allows nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filter allowing exactly one product
    pub fn only(product: ProductId) -> Self {
        let mut filter = Self::new();
        filter.set_allow(product, true);
        filter
    }

    /// Whether `product` counts as stock
    pub fn allows(&self, product: &ProductId) -> bool {
        self.allowed.contains(product)
    }

    /// Add or remove one product; insertion order is kept
    pub fn set_allow(&mut self, product: ProductId, allow: bool) {
        if allow {
            self.allowed.insert(product);
        } else {
            self.allowed.shift_remove(&product);
        }
    }

    pub fn set_disallow_all(&mut self) {
        self.allowed.clear();
    }

    pub fn allowed(&self) -> impl Iterator<Item = &ProductId> {
        self.allowed.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}

/// Quota trigger: more work is needed while stock is below target
///
/// Stock is read from the host on every call and never cached; it changes
/// for reasons the job cannot see (consumption, trade, decay).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTrigger {
    /// Quantity to keep in stock; validated by the configuring surface
    pub target_count: u32,
    /// Products counted as stock
    pub filter: StockFilter,
}

impl ThresholdTrigger {
    /// # Arguments
    ///
    /// * `target_count` - Quantity to keep in stock
    /// * `filter` - Products whose stock is summed against the target
    pub fn new(target_count: u32, filter: StockFilter) -> Self {
        Self {
            target_count,
            filter,
        }
    }

    /// Current banked quantity
    pub fn current_count<W: WorldView + ?Sized>(&self, world: &W) -> u32 {
        world.current_stock(&self.filter)
    }

    /// Whether stock is below target
    pub fn needs_work<W: WorldView + ?Sized>(&self, world: &W) -> bool {
        self.current_count(world) < self.target_count
    }
}
