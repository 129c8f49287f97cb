//! Reconciliation of a job's designation set against the host registry
//!
//! The registry is shared with other writers and is the source of truth for
//! whether a designation exists. Each pass has two sweeps:
//!
//! 1. **Prune**: owned designations that vanished from the registry are
//!    dropped from the set. Owned designations whose target died, left the
//!    area, or is no longer allow-listed are released (removed from both).
//! 2. **Adopt**: registry designations of the job's kind that the job does
//!    not own are added to the set when their target passes the full
//!    validity predicate. Nothing is written to the registry.
//!
//! Dead handles and deleted areas are ordinary steady-state conditions and
//! never surface as errors.

use crate::selector::TargetSelector;
use harvest_core::{DesignationSet, HarvestKind, Host};
use tracing::{debug, trace};

/// What one reconciliation pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Owned designations that no longer existed in the registry
    pub dropped: usize,
    /// Owned designations the job destroyed
    pub released: usize,
    /// Foreign designations taken over
    pub adopted: usize,
}

impl ReconcileReport {
    /// True when the pass changed nothing
    pub fn is_empty(&self) -> bool {
        self.dropped == 0 && self.released == 0 && self.adopted == 0
    }
}

/// Aligns a [`DesignationSet`] with the host registry
pub struct Reconciler<'s, 'a> {
    kind: HarvestKind,
    selector: &'s TargetSelector<'a>,
}

impl<'s, 'a> Reconciler<'s, 'a> {
    /// Create a reconciler adopting designations of `kind` that `selector`
    /// accepts
    pub fn new(kind: HarvestKind, selector: &'s TargetSelector<'a>) -> Self {
        Self { kind, selector }
    }

    /// Sweep 1: drop vanished designations and release invalid ones
    ///
    /// Returns `(dropped, released)`.
    pub fn prune_dead<H: Host + ?Sized>(
        &self,
        host: &mut H,
        set: &mut DesignationSet,
    ) -> (usize, usize) {
        let mut dropped = 0;
        let mut released = 0;

        for designation in set.to_vec() {
            if !host.has_designation(&designation) {
                set.remove(&designation);
                dropped += 1;
                trace!(%designation, "Dropped designation missing from registry");
                continue;
            }

            let keep = match host.plant(designation.target) {
                Some(plant) => {
                    self.selector.in_area(&*host, plant.position)
                        && self.selector.is_allowed(&*host, &plant)
                }
                None => false,
            };
            if !keep {
                host.remove_designation(&designation);
                set.remove(&designation);
                released += 1;
                trace!(%designation, "Released designation");
            }
        }

        (dropped, released)
    }

    /// Sweep 2: adopt matching foreign designations
    pub fn adopt_foreign<H: Host + ?Sized>(&self, host: &H, set: &mut DesignationSet) -> usize {
        let mut adopted = 0;

        for designation in host.designations_of(self.kind) {
            if set.owns_target(designation.target) {
                continue;
            }
            let Some(plant) = host.plant(designation.target) else {
                continue;
            };
            if self.selector.is_valid(host, &plant, Some(&designation)) && set.insert(designation) {
                adopted += 1;
                trace!(%designation, "Adopted designation");
            }
        }

        adopted
    }

    /// Both sweeps, prune first
    pub fn run<H: Host + ?Sized>(&self, host: &mut H, set: &mut DesignationSet) -> ReconcileReport {
        let (dropped, released) = self.prune_dead(host, set);
        let adopted = self.adopt_foreign(&*host, set);
        let report = ReconcileReport {
            dropped,
            released,
            adopted,
        };

        if !report.is_empty() {
            debug!(
                kind = %self.kind,
                dropped,
                released,
                adopted,
                owned = set.len(),
                "Reconciled designations"
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::SelectionSettings;
    use harvest_core::{
        AllowList, Cell, Designation, DesignationRegistry, LifecycleStage, ProductId,
        ResourceInfo, ResourceType,
    };
    use harvest_sim::SimWorld;

    fn setup() -> (SimWorld, AllowList) {
        let mut world = SimWorld::new();
        world.define_resource(ResourceInfo {
            kind: ResourceType::new("oak"),
            label: "oak".to_string(),
            harvest_yield: 25.0,
            product: Some(ProductId::new("WoodLog")),
            harvest_tag: Some("Wood".to_string()),
        });
        let mut list = AllowList::new();
        list.add_missing([ResourceType::new("oak")]);
        list.set(&ResourceType::new("oak"), true);
        (world, list)
    }

    #[test]
    fn test_adopts_matching_foreign_designation() {
        let (mut world, list) = setup();
        let tree = world.spawn_plant("oak", Cell::new(1, 0), LifecycleStage::Mature, 20);
        world.add_designation(Designation::harvest(tree));

        let selector = TargetSelector::new(&list, SelectionSettings::default());
        let reconciler = Reconciler::new(HarvestKind::Harvest, &selector);
        let mut set = DesignationSet::new();

        let report = reconciler.run(&mut world, &mut set);
        assert_eq!(report.adopted, 1);
        assert!(set.contains(&Designation::harvest(tree)));
        // adoption never writes to the registry
        assert_eq!(world.registry().len(), 1);
    }

    #[test]
    fn test_ignores_non_matching_foreign_designations() {
        let (mut world, list) = setup();
        let sapling = world.spawn_plant("oak", Cell::new(1, 0), LifecycleStage::Immature, 0);
        let other_kind = world.spawn_plant("oak", Cell::new(2, 0), LifecycleStage::Mature, 20);
        world.add_designation(Designation::harvest(sapling));
        world.add_designation(Designation::cut(other_kind));

        let selector = TargetSelector::new(&list, SelectionSettings::default());
        let reconciler = Reconciler::new(HarvestKind::Harvest, &selector);
        let mut set = DesignationSet::new();

        let report = reconciler.run(&mut world, &mut set);
        assert!(report.is_empty());
        assert!(set.is_empty());
        assert_eq!(world.registry().len(), 2);
    }

    #[test]
    fn test_prunes_dead_and_vanished() {
        let (mut world, list) = setup();
        let a = world.spawn_plant("oak", Cell::new(1, 0), LifecycleStage::Mature, 20);
        let b = world.spawn_plant("oak", Cell::new(2, 0), LifecycleStage::Mature, 20);
        let c = world.spawn_plant("oak", Cell::new(3, 0), LifecycleStage::Mature, 20);

        let mut set = DesignationSet::new();
        for handle in [a, b, c] {
            let d = Designation::harvest(handle);
            world.add_designation(d);
            set.insert(d);
        }

        // someone else removed b's designation; c died
        world.remove_designation(&Designation::harvest(b));
        world.despawn(c);

        let selector = TargetSelector::new(&list, SelectionSettings::default());
        let reconciler = Reconciler::new(HarvestKind::Harvest, &selector);
        let (dropped, released) = reconciler.prune_dead(&mut world, &mut set);

        assert_eq!((dropped, released), (2, 0));
        assert_eq!(set.to_vec(), vec![Designation::harvest(a)]);
    }

    #[test]
    fn test_releases_outside_area_and_disallowed() {
        let (mut world, mut list) = setup();
        let area = world.add_area("logging", [Cell::new(1, 0), Cell::new(2, 0)], true);
        let inside = world.spawn_plant("oak", Cell::new(1, 0), LifecycleStage::Mature, 20);
        let outside = world.spawn_plant("oak", Cell::new(8, 0), LifecycleStage::Mature, 20);

        let mut set = DesignationSet::new();
        for handle in [inside, outside] {
            let d = Designation::harvest(handle);
            world.add_designation(d);
            set.insert(d);
        }

        let settings = SelectionSettings {
            area: Some(area),
            ..SelectionSettings::default()
        };
        {
            let selector = TargetSelector::new(&list, settings);
            let reconciler = Reconciler::new(HarvestKind::Harvest, &selector);
            let report = reconciler.run(&mut world, &mut set);
            assert_eq!(report.released, 1);
            assert!(!world.has_designation(&Designation::harvest(outside)));
        }

        list.set(&ResourceType::new("oak"), false);
        let selector = TargetSelector::new(&list, settings);
        let reconciler = Reconciler::new(HarvestKind::Harvest, &selector);
        let report = reconciler.run(&mut world, &mut set);
        assert_eq!(report.released, 1);
        assert!(set.is_empty());
        assert!(world.registry().is_empty());
    }

    #[test]
    fn test_reconciliation_is_idempotent() {
        let (mut world, list) = setup();
        let a = world.spawn_plant("oak", Cell::new(1, 0), LifecycleStage::Mature, 20);
        let b = world.spawn_plant("oak", Cell::new(2, 0), LifecycleStage::Mature, 20);
        world.add_designation(Designation::harvest(a));
        world.add_designation(Designation::harvest(b));
        world.despawn(b);

        let selector = TargetSelector::new(&list, SelectionSettings::default());
        let reconciler = Reconciler::new(HarvestKind::Harvest, &selector);
        let mut set = DesignationSet::new();

        reconciler.run(&mut world, &mut set);
        let first = set.clone();
        let second = reconciler.run(&mut world, &mut set);

        assert!(second.is_empty());
        assert_eq!(set, first);
    }
}
