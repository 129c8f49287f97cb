//! The job surface seen by the job manager

use harvest_core::{Host, ResourceType, Tick, WorldView};
use indexmap::IndexSet;

/// A harvest job driven by the host's tick loop
///
/// Calls for one job are never concurrent; the manager serializes them.
pub trait HarvestJob<H: Host + ?Sized> {
    /// Short display name
    fn label(&self) -> &str;

    /// Whether the job currently has nothing to do
    fn completed(&self, host: &H) -> bool;

    /// Display labels of what the job is targeting
    fn targets(&self, host: &H) -> Vec<String>;

    /// Cheap per-tick bookkeeping (history sampling)
    fn tick(&mut self, host: &H, now: Tick);

    /// One scheduling pass; returns whether any designation was issued
    fn try_do_job(&mut self, host: &mut H, now: Tick) -> bool;

    /// Release every owned designation; returns how many were released
    fn clean_up(&mut self, host: &mut H) -> usize;

    /// Resync the allow-list with what the region offers
    fn refresh_allow_list(&mut self, host: &H, first_time: bool);
}

/// Resource types a region can offer: native kinds plus the kinds of wild
/// plants standing on uncultivated cells, in first-seen order
pub(crate) fn wild_options<W: WorldView + ?Sized>(world: &W) -> IndexSet<ResourceType> {
    let mut options: IndexSet<ResourceType> = world.regional_resources().into_iter().collect();
    options.extend(
        world
            .live_plants()
            .into_iter()
            .filter(|plant| !world.is_cultivated(plant.position))
            .map(|plant| plant.kind),
    );
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvest_core::{Cell, LifecycleStage};
    use harvest_sim::SimWorld;

    #[test]
    fn test_wild_options_skip_cultivated_cells() {
        let mut world = SimWorld::new();
        world.add_regional("oak");
        world.spawn_plant("rice", Cell::new(0, 0), LifecycleStage::Mature, 5);
        world.spawn_plant("berry", Cell::new(1, 0), LifecycleStage::Mature, 5);
        world.spawn_plant("oak", Cell::new(2, 0), LifecycleStage::Mature, 5);
        world.mark_cultivated(Cell::new(0, 0));

        let options: Vec<_> = wild_options(&world).into_iter().map(|k| k.0).collect();
        assert_eq!(options, vec!["oak", "berry"]);
    }
}
