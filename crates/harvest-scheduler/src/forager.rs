//! Foraging: keep a food stock topped up from wild plants

use crate::config::SchedulerConfig;
use crate::engine::HarvestEngine;
use crate::job::{wild_options, HarvestJob};
use harvest_core::{
    AreaId, HarvestKind, History, Host, ProductId, ResourceType, StockFilter, ThresholdTrigger,
    Tick, WorldView,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Single-area quota job over non-wood wild plants
///
/// Immature plants are taken by default as long as they already carry
/// meaningful yield.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForagerJob {
    engine: HarvestEngine,
    /// Harvest tag excluded from foraging
    wood_tag: String,
}

impl ForagerJob {
    /// Create a forager and populate its allow-list from the region
    ///
    /// # Arguments
    ///
    /// * `world` - Host the allow-list and stock filter are built from
    /// * `target_count` - Stock level the job keeps topped up
    /// * `config` - Shared scheduler tunables
    ///
    /// Every food product found in the region counts toward the target.
    /// Kinds start disabled.
    ///
    /// # Example
    ///
    /// ```
    /// use harvest_core::{ProductId, ResourceInfo, ResourceType};
    /// use harvest_scheduler::{ForagerJob, SchedulerConfig};
    /// use harvest_sim::SimWorld;
    ///
    /// let mut world = SimWorld::new();
    /// world.define_resource(ResourceInfo {
    ///     kind: ResourceType::new("agave"),
    ///     label: "agave".to_string(),
    ///     harvest_yield: 6.0,
    ///     product: Some(ProductId::new("Agave")),
    ///     harvest_tag: None,
    /// });
    /// world.add_regional("agave");
    ///
    /// let forager = ForagerJob::new(&world, 30, &SchedulerConfig::default());
    /// let list = &forager.engine().allow_list;
    /// assert!(list.contains(&ResourceType::new("agave")));
    /// assert!(!list.is_enabled(&ResourceType::new("agave")));
    /// ```
    pub fn new<W: WorldView + ?Sized>(world: &W, target_count: u32, config: &SchedulerConfig) -> Self {
        let trigger = ThresholdTrigger::new(target_count, StockFilter::new());
        let mut engine = HarvestEngine::new(HarvestKind::Harvest, trigger, config);
        engine.settings.allow_immature = true;

        let mut job = Self {
            engine,
            wood_tag: config.wood_tag.clone(),
        };
        job.refresh(world, true);
        job
    }

    /// The underlying engine, for inspecting settings and owned designations
    pub fn engine(&self) -> &HarvestEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut HarvestEngine {
        &mut self.engine
    }

    /// Area the job is confined to; `None` means the whole map
    pub fn area(&self) -> Option<AreaId> {
        self.engine.settings.area
    }

    pub fn set_area(&mut self, area: Option<AreaId>) {
        self.engine.settings.area = area;
    }

    /// Require plants to be fully mature
    pub fn set_force_fully_mature(&mut self, force: bool) {
        self.engine.settings.allow_immature = !force;
    }

    /// Enable or disable one kind; unknown kinds are ignored
    pub fn set_allowed(&mut self, kind: &ResourceType, enabled: bool) -> bool {
        self.engine.allow_list.set(kind, enabled)
    }

    pub fn history(&self) -> &History {
        self.engine.history()
    }

    /// Kinds worth foraging: harvestable, with a product, and not wood
    fn options<W: WorldView + ?Sized>(&self, world: &W) -> Vec<ResourceType> {
        wild_options(world)
            .into_iter()
            .filter(|kind| {
                world.resource(kind).is_some_and(|info| {
                    info.harvest_yield > 0.0
                        && info.product.is_some()
                        && !info.has_tag(&self.wood_tag)
                })
            })
            .collect()
    }

    fn refresh<W: WorldView + ?Sized>(&mut self, world: &W, first_time: bool) {
        let options = self.options(world);
        let added = self.engine.allow_list.add_missing(options);
        self.engine
            .allow_list
            .sort_by_label(|kind| world.resource_label(kind));
        debug!(added, total = self.engine.allow_list.len(), "Refreshed forager allow-list");

        if first_time {
            let products: Vec<ProductId> = self
                .engine
                .allow_list
                .keys()
                .filter_map(|kind| world.resource(kind).and_then(|info| info.product))
                .collect();
            let filter = &mut self.engine.trigger.filter;
            filter.set_disallow_all();
            for product in products {
                filter.set_allow(product, true);
            }
        }
    }
}

impl<H: Host + ?Sized> HarvestJob<H> for ForagerJob {
    fn label(&self) -> &str {
        "foraging"
    }

    fn completed(&self, host: &H) -> bool {
        !self.engine.needs_work(host)
    }

    fn targets(&self, host: &H) -> Vec<String> {
        self.engine
            .allow_list
            .enabled()
            .map(|kind| host.resource_label(kind))
            .collect()
    }

    fn tick(&mut self, host: &H, now: Tick) {
        self.engine.sample_history(host, now);
    }

    fn try_do_job(&mut self, host: &mut H, now: Tick) -> bool {
        self.engine.run_quota(host, now)
    }

    fn clean_up(&mut self, host: &mut H) -> usize {
        self.engine.clean_up(host)
    }

    fn refresh_allow_list(&mut self, host: &H, first_time: bool) {
        self.refresh(host, first_time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvest_core::{Cell, Designation, DesignationRegistry, LifecycleStage, ResourceInfo};
    use harvest_sim::SimWorld;

    fn info(kind: &str, label: &str, product: Option<&str>, tag: &str, harvest_yield: f32) -> ResourceInfo {
        ResourceInfo {
            kind: ResourceType::new(kind),
            label: label.to_string(),
            harvest_yield,
            product: product.map(ProductId::new),
            harvest_tag: Some(tag.to_string()),
        }
    }

    fn forest_floor() -> SimWorld {
        let mut world = SimWorld::new();
        world.define_resource(info("berry", "berry bush", Some("Berries"), "Standard", 10.0));
        world.define_resource(info("agave", "agave", Some("Agave"), "Standard", 6.0));
        world.define_resource(info("oak", "oak tree", Some("WoodLog"), "Wood", 25.0));
        world.define_resource(info("grass", "grass", None, "Standard", 0.0));
        world.add_regional("berry");
        world.add_regional("oak");
        world.add_regional("grass");
        world
    }

    fn berry() -> ResourceType {
        ResourceType::new("berry")
    }

    #[test]
    fn test_first_refresh_builds_list_and_filter() {
        let mut world = forest_floor();
        world.spawn_plant("agave", Cell::new(3, 3), LifecycleStage::Mature, 4);

        let job = ForagerJob::new(&world, 50, &SchedulerConfig::default());
        let keys: Vec<_> = job.engine().allow_list.keys().map(|k| k.as_str()).collect();
        // sorted by label, wood and yieldless kinds excluded, all disabled
        assert_eq!(keys, vec!["agave", "berry"]);
        assert_eq!(job.engine().allow_list.enabled().count(), 0);

        let filter = &job.engine().trigger.filter;
        assert!(filter.allows(&ProductId::new("Berries")));
        assert!(filter.allows(&ProductId::new("Agave")));
        assert!(!filter.allows(&ProductId::new("WoodLog")));
    }

    #[test]
    fn test_later_refresh_only_adds() {
        let mut world = forest_floor();
        let mut job = ForagerJob::new(&world, 50, &SchedulerConfig::default());
        job.set_allowed(&berry(), true);
        job.engine_mut().trigger.filter.set_disallow_all();

        world.spawn_plant("agave", Cell::new(3, 3), LifecycleStage::Mature, 4);
        HarvestJob::<SimWorld>::refresh_allow_list(&mut job, &world, false);

        assert_eq!(job.engine().allow_list.len(), 2);
        assert!(job.engine().allow_list.is_enabled(&berry()));
        // the stock filter is only rebuilt on the first refresh
        assert!(job.engine().trigger.filter.is_empty());
    }

    #[test]
    fn test_forages_ripe_immature_plants_by_default() {
        let mut world = forest_floor();
        let ripe = world.spawn_plant("berry", Cell::new(1, 0), LifecycleStage::Immature, 3);
        let mut job = ForagerJob::new(&world, 20, &SchedulerConfig::default());
        job.set_allowed(&berry(), true);

        assert!(job.try_do_job(&mut world, 0));
        assert!(world.has_designation(&Designation::harvest(ripe)));

        job.clean_up(&mut world);
        job.set_force_fully_mature(true);
        assert!(!job.try_do_job(&mut world, 1));
    }

    #[test]
    fn test_completed_and_targets() {
        let mut world = forest_floor();
        let mut job = ForagerJob::new(&world, 10, &SchedulerConfig::default());
        job.set_allowed(&berry(), true);

        assert!(!HarvestJob::<SimWorld>::completed(&job, &world));
        assert_eq!(HarvestJob::<SimWorld>::targets(&job, &world), vec!["berry bush"]);

        world.add_stock("Berries", 10);
        assert!(HarvestJob::<SimWorld>::completed(&job, &world));
    }

    #[test]
    fn test_area_deletion_between_ticks() {
        let mut world = forest_floor();
        let area = world.add_area("patch", [Cell::new(1, 0)], true);
        world.spawn_plant("berry", Cell::new(1, 0), LifecycleStage::Mature, 5);
        let outside = world.spawn_plant("berry", Cell::new(6, 0), LifecycleStage::Mature, 5);

        let mut job = ForagerJob::new(&world, 100, &SchedulerConfig::default());
        job.set_allowed(&berry(), true);
        job.set_area(Some(area));

        job.try_do_job(&mut world, 0);
        assert_eq!(job.engine().designations().len(), 1);
        let inside = job.engine().designations().iter().next().copied();

        world.delete_area(area).unwrap();
        assert!(job.try_do_job(&mut world, 1));
        assert!(world.has_designation(&Designation::harvest(outside)));
        // the designation issued inside the area survives the prune
        assert_eq!(job.engine().designations().len(), 2);
        assert!(inside.is_some_and(|d| job.engine().designations().contains(&d)));
        assert_eq!(job.area(), Some(area));
    }

    #[test]
    fn test_tick_records_history() {
        let mut world = forest_floor();
        world.add_stock("Berries", 7);
        let mut job = ForagerJob::new(&world, 10, &SchedulerConfig::default());

        job.tick(&world, 0);
        job.tick(&world, 1);
        assert_eq!(job.history().len(), 1);
        assert_eq!(job.history().latest().map(|s| s.stock), Some(7));
    }
}
