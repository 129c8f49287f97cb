//! In-memory world state

use crate::SimRegistry;
use harvest_core::{
    AreaId, AreaSummary, Cell, Designation, DesignationRegistry, EntityHandle, Error, HarvestKind,
    LifecycleStage, PlantInfo, ProductId, ResourceInfo, ResourceType, Result, StockFilter,
    WorldView,
};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;
use tracing::debug;

/// Cells a turbine keeps clear on its downwind (+x) side
pub const TURBINE_REACH: i32 = 5;

/// A named set of cells
#[derive(Debug, Clone)]
pub struct SimArea {
    pub label: String,
    pub cells: IndexSet<Cell>,
    pub assignable: bool,
}

/// A small host world kept entirely in memory
#[derive(Debug, Clone, Default)]
pub struct SimWorld {
    /// Harvest metadata by type
    resources: IndexMap<ResourceType, ResourceInfo>,
    /// Types native to the region
    regional: Vec<ResourceType>,
    /// Live plants by handle
    plants: IndexMap<EntityHandle, PlantInfo>,
    /// Index: cell -> plant
    by_cell: IndexMap<Cell, EntityHandle>,
    /// Next plant handle to assign
    next_id: u64,
    /// Banked products
    stock: IndexMap<ProductId, u32>,
    /// Areas by ID
    areas: IndexMap<AreaId, SimArea>,
    /// Next area ID to assign
    next_area: u64,
    /// Growing zones and planters
    cultivated: HashSet<Cell>,
    /// Plants the default worker cannot path to
    unreachable: HashSet<EntityHandle>,
    /// Wind turbine positions
    turbines: Vec<Cell>,
    /// Reference point for distance ranking
    base_center: Cell,
    /// Shared designation store
    registry: SimRegistry,
}

impl SimWorld {
    /// Create an empty world centered on the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty world with a given base center
    pub fn with_base_center(center: Cell) -> Self {
        Self {
            base_center: center,
            ..Self::default()
        }
    }

    /// Register harvest metadata for a type
    pub fn define_resource(&mut self, info: ResourceInfo) {
        self.resources.insert(info.kind.clone(), info);
    }

    /// Forget a type's harvest metadata; it no longer counts as harvestable
    pub fn remove_resource(&mut self, kind: &ResourceType) -> Result<ResourceInfo> {
        self.regional.retain(|k| k != kind);
        self.resources
            .shift_remove(kind)
            .ok_or_else(|| Error::ResourceNotFound(kind.clone()))
    }

    /// Mark a type as native to the region
    pub fn add_regional(&mut self, kind: impl Into<ResourceType>) {
        let kind = kind.into();
        if !self.regional.contains(&kind) {
            self.regional.push(kind);
        }
    }

    /// Spawn a plant; an existing plant on the same cell is replaced
    pub fn spawn_plant(
        &mut self,
        kind: impl Into<ResourceType>,
        position: Cell,
        stage: LifecycleStage,
        yield_now: u32,
    ) -> EntityHandle {
        if let Some(previous) = self.by_cell.get(&position).copied() {
            self.despawn(previous);
        }

        let handle = EntityHandle::new(self.next_id);
        self.next_id += 1;
        self.plants.insert(
            handle,
            PlantInfo {
                handle,
                kind: kind.into(),
                position,
                stage,
                yield_now,
            },
        );
        self.by_cell.insert(position, handle);
        handle
    }

    /// Remove a plant and every designation on it
    pub fn despawn(&mut self, handle: EntityHandle) -> Option<PlantInfo> {
        let plant = self.plants.shift_remove(&handle)?;
        self.by_cell.shift_remove(&plant.position);
        self.unreachable.remove(&handle);
        self.registry.clear_target(handle);
        Some(plant)
    }

    /// Execute a harvest: bank the yield and remove the plant
    ///
    /// Designations on the plant go with it. Kinds without a product are
    /// removed without banking anything.
    ///
    /// # Example
    ///
    /// ```
    /// use harvest_core::{
    ///     Cell, Designation, DesignationRegistry, LifecycleStage, ProductId, ResourceInfo,
    ///     ResourceType,
    /// };
    /// use harvest_sim::SimWorld;
    ///
    /// let mut world = SimWorld::new();
    /// world.define_resource(ResourceInfo {
    ///     kind: ResourceType::new("berry"),
    ///     label: "berry bush".to_string(),
    ///     harvest_yield: 10.0,
    ///     product: Some(ProductId::new("Berries")),
    ///     harvest_tag: None,
    /// });
    /// let bush = world.spawn_plant("berry", Cell::new(1, 1), LifecycleStage::Mature, 8);
    /// world.add_designation(Designation::harvest(bush));
    ///
    /// assert_eq!(world.harvest(bush), Ok(8));
    /// assert_eq!(world.stock_of(&ProductId::new("Berries")), 8);
    /// assert!(world.registry().is_empty());
    /// assert!(world.harvest(bush).is_err());
    /// ```
    pub fn harvest(&mut self, handle: EntityHandle) -> Result<u32> {
        let plant = self
            .despawn(handle)
            .ok_or(Error::EntityNotFound(handle))?;
        let product = self
            .resources
            .get(&plant.kind)
            .and_then(|info| info.product.clone());

        if let Some(product) = product {
            *self.stock.entry(product).or_insert(0) += plant.yield_now;
        }
        debug!(entity = %handle, kind = %plant.kind, yield_now = plant.yield_now, "Harvested");
        Ok(plant.yield_now)
    }

    /// Change what a plant would yield now
    pub fn set_yield(&mut self, handle: EntityHandle, yield_now: u32) -> Result<()> {
        let plant = self
            .plants
            .get_mut(&handle)
            .ok_or(Error::EntityNotFound(handle))?;
        plant.yield_now = yield_now;
        Ok(())
    }

    /// Change a plant's lifecycle stage
    pub fn set_stage(&mut self, handle: EntityHandle, stage: LifecycleStage) -> Result<()> {
        let plant = self
            .plants
            .get_mut(&handle)
            .ok_or(Error::EntityNotFound(handle))?;
        plant.stage = stage;
        Ok(())
    }

    /// Mark a plant reachable or not
    pub fn set_reachable(&mut self, handle: EntityHandle, reachable: bool) -> Result<()> {
        if !self.plants.contains_key(&handle) {
            return Err(Error::EntityNotFound(handle));
        }
        if reachable {
            self.unreachable.remove(&handle);
        } else {
            self.unreachable.insert(handle);
        }
        Ok(())
    }

    /// Add banked product
    pub fn add_stock(&mut self, product: impl Into<ProductId>, amount: u32) {
        *self.stock.entry(product.into()).or_insert(0) += amount;
    }

    /// Consume banked product, saturating at zero
    pub fn consume_stock(&mut self, product: &ProductId, amount: u32) {
        if let Some(count) = self.stock.get_mut(product) {
            *count = count.saturating_sub(amount);
        }
    }

    /// Banked quantity of one product
    pub fn stock_of(&self, product: &ProductId) -> u32 {
        self.stock.get(product).copied().unwrap_or(0)
    }

    /// Define an area
    pub fn add_area(
        &mut self,
        label: impl Into<String>,
        cells: impl IntoIterator<Item = Cell>,
        assignable: bool,
    ) -> AreaId {
        let id = AreaId::new(self.next_area);
        self.next_area += 1;
        self.areas.insert(
            id,
            SimArea {
                label: label.into(),
                cells: cells.into_iter().collect(),
                assignable,
            },
        );
        id
    }

    /// Delete an area
    pub fn delete_area(&mut self, id: AreaId) -> Result<SimArea> {
        self.areas.shift_remove(&id).ok_or(Error::AreaNotFound(id))
    }

    /// Mark a cell as cultivated (growing zone or planter)
    pub fn mark_cultivated(&mut self, cell: Cell) {
        self.cultivated.insert(cell);
    }

    /// Place a wind turbine
    pub fn add_turbine(&mut self, position: Cell) {
        self.turbines.push(position);
    }

    /// Remove every turbine
    pub fn clear_turbines(&mut self) {
        self.turbines.clear();
    }

    /// Number of live plants
    pub fn plant_count(&self) -> usize {
        self.plants.len()
    }

    /// Every designation the world holds, from all writers
    pub fn registry(&self) -> &SimRegistry {
        &self.registry
    }
}

impl WorldView for SimWorld {
    fn current_stock(&self, filter: &StockFilter) -> u32 {
        filter.allowed().map(|product| self.stock_of(product)).sum()
    }

    fn live_plants(&self) -> Vec<PlantInfo> {
        self.plants.values().cloned().collect()
    }

    fn plant(&self, handle: EntityHandle) -> Option<PlantInfo> {
        self.plants.get(&handle).cloned()
    }

    fn plant_at(&self, cell: Cell) -> Option<PlantInfo> {
        self.by_cell
            .get(&cell)
            .and_then(|handle| self.plants.get(handle))
            .cloned()
    }

    fn resource(&self, kind: &ResourceType) -> Option<ResourceInfo> {
        self.resources.get(kind).cloned()
    }

    fn regional_resources(&self) -> Vec<ResourceType> {
        self.regional.clone()
    }

    fn is_cultivated(&self, cell: Cell) -> bool {
        self.cultivated.contains(&cell)
    }

    fn is_reachable(&self, handle: EntityHandle) -> bool {
        self.plants.contains_key(&handle) && !self.unreachable.contains(&handle)
    }

    fn base_center(&self) -> Cell {
        self.base_center
    }

    fn areas(&self) -> Vec<AreaSummary> {
        self.areas
            .iter()
            .map(|(id, area)| AreaSummary {
                id: *id,
                label: area.label.clone(),
                assignable: area.assignable,
            })
            .collect()
    }

    fn area_contains(&self, area: AreaId, cell: Cell) -> Option<bool> {
        self.areas.get(&area).map(|a| a.cells.contains(&cell))
    }

    fn area_cells(&self, area: AreaId) -> Option<Vec<Cell>> {
        self.areas.get(&area).map(|a| a.cells.iter().copied().collect())
    }

    fn wind_cells(&self) -> Vec<Cell> {
        // three-wide strip running downwind from each turbine
        let mut cells = IndexSet::new();
        for turbine in &self.turbines {
            for dx in 1..=TURBINE_REACH {
                for dz in -1..=1 {
                    cells.insert(Cell::new(turbine.x + dx, turbine.z + dz));
                }
            }
        }
        cells.into_iter().collect()
    }
}

impl DesignationRegistry for SimWorld {
    fn designations_of(&self, kind: HarvestKind) -> Vec<Designation> {
        self.registry.designations_of(kind)
    }

    fn designations_on(&self, target: EntityHandle) -> Vec<Designation> {
        self.registry.designations_on(target)
    }

    fn add_designation(&mut self, designation: Designation) {
        self.registry.add_designation(designation);
    }

    fn remove_designation(&mut self, designation: &Designation) -> bool {
        self.registry.remove_designation(designation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn berry_info() -> ResourceInfo {
        ResourceInfo {
            kind: ResourceType::new("berry_bush"),
            label: "berry bush".to_string(),
            harvest_yield: 10.0,
            product: Some(ProductId::new("Berries")),
            harvest_tag: Some("Standard".to_string()),
        }
    }

    #[test]
    fn test_spawn_and_lookup() {
        let mut world = SimWorld::new();
        let handle = world.spawn_plant("berry_bush", Cell::new(2, 3), LifecycleStage::Mature, 8);

        assert_eq!(world.plant(handle).map(|p| p.yield_now), Some(8));
        assert_eq!(world.plant_at(Cell::new(2, 3)).map(|p| p.handle), Some(handle));
        assert!(world.is_reachable(handle));
        assert_eq!(world.live_plants().len(), 1);
    }

    #[test]
    fn test_spawn_replaces_plant_on_same_cell() {
        let mut world = SimWorld::new();
        let first = world.spawn_plant("a", Cell::new(0, 0), LifecycleStage::Mature, 1);
        let second = world.spawn_plant("b", Cell::new(0, 0), LifecycleStage::Mature, 1);

        assert!(world.plant(first).is_none());
        assert!(world.plant(second).is_some());
        assert_eq!(world.plant_count(), 1);
    }

    #[test]
    fn test_harvest_banks_yield_and_clears_designations() {
        let mut world = SimWorld::new();
        world.define_resource(berry_info());
        let handle = world.spawn_plant("berry_bush", Cell::new(1, 1), LifecycleStage::Mature, 6);
        world.add_designation(Designation::harvest(handle));

        assert_eq!(world.harvest(handle), Ok(6));
        assert_eq!(world.stock_of(&ProductId::new("Berries")), 6);
        assert!(world.registry().is_empty());
        assert_eq!(world.harvest(handle), Err(Error::EntityNotFound(handle)));
    }

    #[test]
    fn test_remove_resource() {
        let mut world = SimWorld::new();
        world.define_resource(berry_info());
        world.add_regional("berry_bush");
        let kind = ResourceType::new("berry_bush");

        assert!(world.remove_resource(&kind).is_ok());
        assert!(world.resource(&kind).is_none());
        assert!(world.regional_resources().is_empty());
        assert_eq!(world.remove_resource(&kind), Err(Error::ResourceNotFound(kind.clone())));
    }

    #[test]
    fn test_current_stock_sums_allowed_products() {
        let mut world = SimWorld::new();
        world.add_stock("Berries", 5);
        world.add_stock("Agave", 3);
        world.add_stock("WoodLog", 100);

        let mut filter = StockFilter::new();
        filter.set_allow(ProductId::new("Berries"), true);
        filter.set_allow(ProductId::new("Agave"), true);
        assert_eq!(world.current_stock(&filter), 8);

        world.consume_stock(&ProductId::new("Agave"), 10);
        assert_eq!(world.current_stock(&filter), 5);
    }

    #[test]
    fn test_deleted_area_resolves_to_none() {
        let mut world = SimWorld::new();
        let area = world.add_area("grove", [Cell::new(0, 0)], true);
        assert_eq!(world.area_contains(area, Cell::new(0, 0)), Some(true));
        assert_eq!(world.area_contains(area, Cell::new(5, 5)), Some(false));

        assert!(world.delete_area(area).is_ok());
        assert_eq!(world.area_contains(area, Cell::new(0, 0)), None);
        assert!(world.area_cells(area).is_none());
        assert_eq!(world.delete_area(area).err(), Some(Error::AreaNotFound(area)));
    }

    #[test]
    fn test_wind_cells() {
        let mut world = SimWorld::new();
        world.add_turbine(Cell::new(0, 0));

        let cells = world.wind_cells();
        assert_eq!(cells.len(), (TURBINE_REACH * 3) as usize);
        assert!(cells.contains(&Cell::new(1, -1)));
        assert!(cells.contains(&Cell::new(TURBINE_REACH, 1)));
        assert!(!cells.contains(&Cell::new(0, 0)));

        world.clear_turbines();
        assert!(world.wind_cells().is_empty());
    }

    #[test]
    fn test_unreachable_plants() {
        let mut world = SimWorld::new();
        let handle = world.spawn_plant("a", Cell::new(0, 0), LifecycleStage::Mature, 1);
        world.set_reachable(handle, false).unwrap();
        assert!(!world.is_reachable(handle));

        let missing = EntityHandle::new(99);
        assert_eq!(world.set_reachable(missing, true), Err(Error::EntityNotFound(missing)));
    }
}
