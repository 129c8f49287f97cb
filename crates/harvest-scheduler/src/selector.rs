//! Target selection and ranking
//!
//! A plant is a valid target when every gate passes:
//! - its kind has harvest metadata and is enabled in the allow-list
//! - it carries no designation (other than one being considered for adoption)
//! - it is mature, or immature targets are allowed and its yield is above
//!   the configured minimum
//! - it stands inside the configured area (a deleted area constrains nothing)
//! - the host reports it reachable
//!
//! Valid targets are ranked by yield density, `yield / distance`, so large
//! close plants come before small distant ones.

use harvest_core::{AllowList, AreaId, Cell, Designation, Host, PlantInfo, WorldView};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The per-job knobs of the validity predicate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionSettings {
    /// Spatial constraint; `None` means the whole map
    pub area: Option<AreaId>,
    /// Whether immature plants with meaningful yield qualify
    pub allow_immature: bool,
    /// Immature plants need a yield strictly above this
    pub min_immature_yield: u32,
    /// Distance clamp used by the ranking; never below [`f32::EPSILON`]
    pub min_distance: f32,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            area: None,
            allow_immature: false,
            min_immature_yield: 1,
            min_distance: 1.0,
        }
    }
}

/// A valid target with its ranking score
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub plant: PlantInfo,
    /// `yield_now / max(distance, min_distance)`
    pub density: f32,
}

/// Evaluates and ranks targets for one job
#[derive(Debug, Clone, Copy)]
pub struct TargetSelector<'a> {
    allow_list: &'a AllowList,
    settings: SelectionSettings,
}

impl<'a> TargetSelector<'a> {
    /// Borrow a job's allow-list together with a copy of its settings
    pub fn new(allow_list: &'a AllowList, settings: SelectionSettings) -> Self {
        Self {
            allow_list,
            settings,
        }
    }

    /// Whether a cell satisfies the spatial constraint
    ///
    /// A reference to a deleted area degrades to "entire map".
    pub fn in_area<W: WorldView + ?Sized>(&self, world: &W, cell: Cell) -> bool {
        let Some(area) = self.settings.area else {
            return true;
        };
        match world.area_contains(area, cell) {
            Some(inside) => inside,
            None => {
                debug!(%area, "Area no longer exists, treating as unconstrained");
                true
            }
        }
    }

    /// Whether the plant's kind is harvestable and enabled
    pub fn is_allowed<W: WorldView + ?Sized>(&self, world: &W, plant: &PlantInfo) -> bool {
        world.resource(&plant.kind).is_some() && self.allow_list.is_enabled(&plant.kind)
    }

    /// Whether the plant is grown enough to take
    pub fn passes_lifecycle(&self, plant: &PlantInfo) -> bool {
        plant.is_mature()
            || (self.settings.allow_immature && plant.yield_now > self.settings.min_immature_yield)
    }

    /// The full validity predicate
    ///
    /// `ignore` names one designation that does not count as a conflict; used
    /// when deciding whether to adopt that very designation.
    pub fn is_valid<H: Host + ?Sized>(
        &self,
        host: &H,
        plant: &PlantInfo,
        ignore: Option<&Designation>,
    ) -> bool {
        self.is_allowed(host, plant)
            && host
                .designations_on(plant.handle)
                .iter()
                .all(|d| Some(d) == ignore)
            && self.passes_lifecycle(plant)
            && self.in_area(host, plant.position)
            && host.is_reachable(plant.handle)
    }

    /// Yield density of a plant relative to a reference point
    ///
    /// The divisor is at least `min_distance` and never below
    /// [`f32::EPSILON`], so the result is always a number.
    ///
    /// # Example
    ///
    /// ```
    /// use harvest_core::{AllowList, Cell, EntityHandle, LifecycleStage, PlantInfo, ResourceType};
    /// use harvest_scheduler::{SelectionSettings, TargetSelector};
    ///
    /// let list = AllowList::new();
    /// let selector = TargetSelector::new(&list, SelectionSettings::default());
    /// let plant = PlantInfo {
    ///     handle: EntityHandle::new(1),
    ///     kind: ResourceType::new("berry"),
    ///     position: Cell::new(0, 4),
    ///     stage: LifecycleStage::Mature,
    ///     yield_now: 8,
    /// };
    /// assert_eq!(selector.density(&plant, Cell::new(0, 0)), 2.0);
    /// ```
    pub fn density(&self, plant: &PlantInfo, center: Cell) -> f32 {
        let distance = plant
            .position
            .distance(center)
            .max(self.settings.min_distance)
            .max(f32::EPSILON);
        plant.yield_now as f32 / distance
    }

    /// Every valid target, best first
    ///
    /// The sort is stable: equal densities keep the host's iteration order.
    pub fn ranked<H: Host + ?Sized>(&self, host: &H) -> Vec<Candidate> {
        let center = host.base_center();
        let mut candidates: Vec<Candidate> = host
            .live_plants()
            .into_iter()
            .filter(|plant| self.is_valid(host, plant, None))
            .map(|plant| Candidate {
                density: self.density(&plant, center),
                plant,
            })
            .collect();

        candidates.sort_by(|a, b| b.density.total_cmp(&a.density));
        candidates
    }
}
