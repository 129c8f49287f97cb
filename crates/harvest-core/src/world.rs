//! Host seams: what the scheduler may read and what it may write
//!
//! All calls are synchronous queries against the host's current snapshot.
//! Nothing here is expected to fail: a handle that no longer resolves or an
//! area that was deleted simply yields `None`.

use crate::{
    AreaId, AreaSummary, Cell, Designation, EntityHandle, HarvestKind, PlantInfo, ResourceInfo,
    ResourceType, StockFilter,
};

/// Read-only view of the host world
pub trait WorldView {
    /// Banked quantity of every product the filter allows
    fn current_stock(&self, filter: &StockFilter) -> u32;

    /// Every live harvestable entity in the operating region
    fn live_plants(&self) -> Vec<PlantInfo>;

    /// Resolve a handle; `None` once the entity is gone
    fn plant(&self, handle: EntityHandle) -> Option<PlantInfo>;

    /// The harvestable entity standing on a cell, if any
    fn plant_at(&self, cell: Cell) -> Option<PlantInfo>;

    /// Harvest metadata for a resource type
    fn resource(&self, kind: &ResourceType) -> Option<ResourceInfo>;

    /// Resource types native to the operating region, whether or not any
    /// specimen currently stands on the map
    fn regional_resources(&self) -> Vec<ResourceType>;

    /// Whether a cell is cultivated (growing zone or planter)
    fn is_cultivated(&self, cell: Cell) -> bool;

    /// Pathing oracle for the default worker
    fn is_reachable(&self, handle: EntityHandle) -> bool;

    /// Reference point for distance ranking
    fn base_center(&self) -> Cell;

    /// Every area currently defined
    fn areas(&self) -> Vec<AreaSummary>;

    /// Whether an area contains a cell; `None` if the area no longer exists
    fn area_contains(&self, area: AreaId, cell: Cell) -> Option<bool>;

    /// Active cells of an area; `None` if the area no longer exists
    fn area_cells(&self, area: AreaId) -> Option<Vec<Cell>>;

    /// Cells that must stay clear for wind turbines, derived from the live
    /// building layout
    fn wind_cells(&self) -> Vec<Cell>;

    /// Distance from an entity to a point
    fn distance(&self, handle: EntityHandle, point: Cell) -> Option<f32> {
        self.plant(handle).map(|plant| plant.position.distance(point))
    }

    /// Display label of a resource type, falling back to its ID
    fn resource_label(&self, kind: &ResourceType) -> String {
        self.resource(kind)
            .map(|info| info.label)
            .unwrap_or_else(|| kind.to_string())
    }
}

/// The shared designation store
///
/// Other systems (players, unrelated jobs) write here too. The registry is
/// the source of truth for whether a designation exists.
pub trait DesignationRegistry {
    /// Every live designation of a kind
    fn designations_of(&self, kind: HarvestKind) -> Vec<Designation>;

    /// Every live designation on one entity
    fn designations_on(&self, target: EntityHandle) -> Vec<Designation>;

    /// Register a designation
    fn add_designation(&mut self, designation: Designation);

    /// Remove a designation; returns false if it did not exist
    fn remove_designation(&mut self, designation: &Designation) -> bool;

    /// Whether this exact designation is registered
    fn has_designation(&self, designation: &Designation) -> bool {
        self.designations_on(designation.target).contains(designation)
    }
}

/// A host the scheduler can run against
pub trait Host: WorldView + DesignationRegistry {}

impl<T: WorldView + DesignationRegistry + ?Sized> Host for T {}
