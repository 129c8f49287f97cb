//! Forestry: logging toward a wood quota, or clearing regions of plants

use crate::config::SchedulerConfig;
use crate::engine::HarvestEngine;
use crate::job::{wild_options, HarvestJob};
use harvest_core::{
    AreaId, ClearAreaSet, HarvestKind, History, Host, ProductId, ResourceType, StockFilter,
    ThresholdTrigger, Tick, WorldView,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Label used for the wind turbine clearing region
pub const TURBINE_AREA_LABEL: &str = "turbine area";

/// What a forestry job is doing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForestryMode {
    /// Keep wood stock at the target by harvesting the best trees
    #[default]
    Logging,
    /// Cut everything in the enabled regions, with no quota
    ClearArea,
}

impl fmt::Display for ForestryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForestryMode::Logging => write!(f, "logging"),
            ForestryMode::ClearArea => write!(f, "clear area"),
        }
    }
}

/// Multi-mode forestry job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestryJob {
    engine: HarvestEngine,
    mode: ForestryMode,
    /// Regions to clear in `ClearArea` mode
    clear_areas: ClearAreaSet,
    /// Also clear the cells wind turbines need
    clear_wind_cells: bool,
    wood_product: ProductId,
    wood_tag: String,
}

impl ForestryJob {
    /// Create a logging job counting `wood_product` as stock
    ///
    /// # Arguments
    ///
    /// * `world` - Host the allow-list and clear areas are built from
    /// * `target_count` - Wood stock to keep; unused in `ClearArea` mode
    /// * `config` - Supplies `wood_product`, `wood_tag` and engine tunables
    ///
    /// # Example
    ///
    /// ```
    /// use harvest_core::{ProductId, ResourceInfo, ResourceType};
    /// use harvest_scheduler::{ForestryJob, ForestryMode, SchedulerConfig};
    /// use harvest_sim::SimWorld;
    ///
    /// let mut world = SimWorld::new();
    /// world.define_resource(ResourceInfo {
    ///     kind: ResourceType::new("pine"),
    ///     label: "pine tree".to_string(),
    ///     harvest_yield: 20.0,
    ///     product: Some(ProductId::new("WoodLog")),
    ///     harvest_tag: Some("Wood".to_string()),
    /// });
    /// world.add_regional("pine");
    ///
    /// let job = ForestryJob::new(&world, 200, &SchedulerConfig::default());
    /// assert_eq!(job.mode(), ForestryMode::Logging);
    /// assert!(job.engine().allow_list.contains(&ResourceType::new("pine")));
    /// ```
    pub fn new<W: WorldView + ?Sized>(world: &W, target_count: u32, config: &SchedulerConfig) -> Self {
        let trigger = ThresholdTrigger::new(
            target_count,
            StockFilter::only(config.wood_product.clone()),
        );
        let mut job = Self {
            engine: HarvestEngine::new(HarvestKind::Harvest, trigger, config),
            mode: ForestryMode::Logging,
            clear_areas: ClearAreaSet::new(),
            clear_wind_cells: false,
            wood_product: config.wood_product.clone(),
            wood_tag: config.wood_tag.clone(),
        };
        job.update_clear_areas(world);
        job.refresh(world, true);
        job
    }

    /// The underlying engine
    pub fn engine(&self) -> &HarvestEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut HarvestEngine {
        &mut self.engine
    }

    pub fn mode(&self) -> ForestryMode {
        self.mode
    }

    /// Switch modes; the allow-list is resynced for the new mode
    pub fn set_mode<W: WorldView + ?Sized>(&mut self, world: &W, mode: ForestryMode) {
        if self.mode == mode {
            return;
        }
        info!(from = %self.mode, to = %mode, "Forestry mode changed");
        self.mode = mode;
        self.refresh(world, false);
    }

    /// Area logging is confined to; clearing ignores it
    pub fn logging_area(&self) -> Option<AreaId> {
        self.engine.settings.area
    }

    pub fn set_logging_area(&mut self, area: Option<AreaId>) {
        self.engine.settings.area = area;
    }

    pub fn allow_saplings(&self) -> bool {
        self.engine.settings.allow_immature
    }

    /// Allow immature trees that already carry yield above the minimum
    pub fn set_allow_saplings(&mut self, allow: bool) {
        self.engine.settings.allow_immature = allow;
    }

    pub fn clear_areas(&self) -> &ClearAreaSet {
        &self.clear_areas
    }

    /// Toggle clearing of one region; unknown regions are ignored
    pub fn set_clear_area(&mut self, area: AreaId, clear: bool) -> bool {
        self.clear_areas.set(area, clear)
    }

    pub fn clear_wind_cells(&self) -> bool {
        self.clear_wind_cells
    }

    pub fn set_clear_wind_cells(&mut self, clear: bool) {
        self.clear_wind_cells = clear;
    }

    /// Enable or disable one kind; unknown kinds are ignored
    pub fn set_allowed(&mut self, kind: &ResourceType, enabled: bool) -> bool {
        self.engine.allow_list.set(kind, enabled)
    }

    pub fn history(&self) -> &History {
        self.engine.history()
    }

    /// Mirror the host's assignable areas into the clear-area set
    pub fn update_clear_areas<W: WorldView + ?Sized>(&mut self, world: &W) {
        let (added, removed) = self.clear_areas.sync(&world.areas());
        if added > 0 || removed > 0 {
            debug!(added, removed, "Updated clear areas");
        }
    }

    /// Whether a kind counts as wood
    fn is_wood<W: WorldView + ?Sized>(&self, world: &W, kind: &ResourceType) -> bool {
        world.resource(kind).is_some_and(|info| {
            info.has_tag(&self.wood_tag) || info.yields(&self.wood_product)
        })
    }

    /// Kinds this job may target in the current mode
    ///
    /// With `keep_listed`, a listed kind whose metadata is missing stays
    /// listed in logging mode. Mode switches pass `false`.
    fn options<W: WorldView + ?Sized>(&self, world: &W, keep_listed: bool) -> Vec<ResourceType> {
        let mut options = wild_options(world);
        options.extend(self.engine.allow_list.keys().cloned());
        options
            .into_iter()
            .filter(|kind| {
                self.mode == ForestryMode::ClearArea
                    || self.is_wood(world, kind)
                    || (keep_listed
                        && world.resource(kind).is_none()
                        && self.engine.allow_list.contains(kind))
            })
            .collect()
    }

    fn refresh<W: WorldView + ?Sized>(&mut self, world: &W, keep_listed: bool) {
        let options = self.options(world, keep_listed);
        let removed = self.engine.allow_list.retain_options(&options);
        let added = self.engine.allow_list.add_missing(options);
        self.engine
            .allow_list
            .sort_by_label(|kind| world.resource_label(kind));
        debug!(
            mode = %self.mode,
            added,
            removed = removed.len(),
            total = self.engine.allow_list.len(),
            "Refreshed forestry allow-list"
        );
    }

    /// One clearing pass over the wind cells and every enabled region
    fn run_clearing<H: Host + ?Sized>(&mut self, host: &mut H, now: Tick) -> bool {
        self.engine.prune(host);
        self.update_clear_areas(&*host);

        let mut issued = 0;
        if self.clear_wind_cells {
            let cells = host.wind_cells();
            issued += self.engine.clear_cells(host, cells);
        }

        let areas: Vec<AreaId> = self.clear_areas.enabled().collect();
        for area in areas {
            match host.area_cells(area) {
                Some(cells) => issued += self.engine.clear_cells(host, cells),
                None => debug!(%area, "Clear area no longer exists"),
            }
        }

        if issued > 0 {
            info!(tick = now, issued, "Scheduled clearing");
        }
        issued > 0
    }
}

impl<H: Host + ?Sized> HarvestJob<H> for ForestryJob {
    fn label(&self) -> &str {
        "forestry"
    }

    fn completed(&self, host: &H) -> bool {
        match self.mode {
            ForestryMode::Logging => !self.engine.needs_work(host),
            ForestryMode::ClearArea => false,
        }
    }

    fn targets(&self, host: &H) -> Vec<String> {
        match self.mode {
            ForestryMode::Logging => self
                .engine
                .allow_list
                .enabled()
                .map(|kind| host.resource_label(kind))
                .collect(),
            ForestryMode::ClearArea => {
                let areas = host.areas();
                let mut targets: Vec<String> = self
                    .clear_areas
                    .enabled()
                    .filter_map(|id| areas.iter().find(|a| a.id == id).map(|a| a.label.clone()))
                    .collect();
                if self.clear_wind_cells {
                    targets.push(TURBINE_AREA_LABEL.to_string());
                }
                if targets.is_empty() {
                    targets.push("none".to_string());
                }
                targets
            }
        }
    }

    fn tick(&mut self, host: &H, now: Tick) {
        self.engine.sample_history(host, now);
    }

    fn try_do_job(&mut self, host: &mut H, now: Tick) -> bool {
        match self.mode {
            ForestryMode::Logging => self.engine.run_quota(host, now),
            ForestryMode::ClearArea => self.run_clearing(host, now),
        }
    }

    fn clean_up(&mut self, host: &mut H) -> usize {
        self.engine.clean_up(host)
    }

    fn refresh_allow_list(&mut self, host: &H, _first_time: bool) {
        self.update_clear_areas(host);
        self.refresh(host, true);
    }
}
