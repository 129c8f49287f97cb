//! The shared harvest engine
//!
//! Both job variants are thin shells around a [`HarvestEngine`]. One
//! scheduling pass in quota mode:
//!
//! 1. Reconcile the owned designations with the registry.
//! 2. `deficit = target - (stock + designated_yield)`; stop if `<= 0`.
//! 3. Walk the ranked candidates, issuing a designation for each and
//!    subtracting its yield, until the deficit is closed or candidates run
//!    out.
//!
//! The designated yield is served from a [`CachedValue`]. Invalidation is
//! time-based only, so a designation issued inside the cache window does not
//! count toward the deficit until the window expires. A second pass inside
//! that window can therefore over-issue.

use crate::config::SchedulerConfig;
use crate::reconcile::{ReconcileReport, Reconciler};
use crate::selector::{SelectionSettings, TargetSelector};
use harvest_core::{
    AllowList, CachedValue, Cell, Designation, DesignationSet, HarvestKind, History, Host, Tick,
    ThresholdTrigger, WorldView,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

/// Trigger, allow-list, owned designations and yield cache for one job
///
/// Settings serialize; the owned designations and the cached yield do not.
/// After loading, the first reconciliation re-adopts matching designations
/// from the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestEngine {
    /// Kind of designation issued and adopted by quota passes
    kind: HarvestKind,
    pub trigger: ThresholdTrigger,
    pub allow_list: AllowList,
    pub settings: SelectionSettings,
    /// Owned designations
    #[serde(skip)]
    designations: DesignationSet,
    /// Yield still pending in owned designations
    yield_cache: CachedValue<u32>,
    history: History,
    /// Ticks between history samples
    history_interval: Tick,
    /// Tick of the last history sample
    last_sample: Option<Tick>,
}

impl HarvestEngine {
    /// Create an engine for `kind` with tunables from `config`
    ///
    /// # Arguments
    ///
    /// * `kind` - Designation kind issued and adopted by quota passes
    /// * `trigger` - Stock target and the products that count toward it
    /// * `config` - Cache TTL, ranking and history tunables
    ///
    /// Out-of-range tunables are clamped rather than rejected: a zero
    /// `history_capacity` keeps one sample, and a `min_distance` that is not
    /// positive becomes [`f32::EPSILON`].
    ///
    /// # Example
    ///
    /// ```
    /// use harvest_core::{HarvestKind, ProductId, StockFilter, ThresholdTrigger};
    /// use harvest_scheduler::{HarvestEngine, SchedulerConfig};
    ///
    /// let trigger = ThresholdTrigger::new(50, StockFilter::only(ProductId::new("Berries")));
    /// let config = SchedulerConfig {
    ///     history_capacity: 0,
    ///     ..SchedulerConfig::default()
    /// };
    /// let engine = HarvestEngine::new(HarvestKind::Harvest, trigger, &config);
    /// assert_eq!(engine.history().capacity(), 1);
    /// assert!(engine.designations().is_empty());
    /// ```
    pub fn new(kind: HarvestKind, trigger: ThresholdTrigger, config: &SchedulerConfig) -> Self {
        Self {
            kind,
            trigger,
            allow_list: AllowList::new(),
            settings: SelectionSettings {
                area: None,
                allow_immature: false,
                min_immature_yield: config.min_immature_yield,
                min_distance: config.min_distance.max(f32::EPSILON),
            },
            designations: DesignationSet::new(),
            yield_cache: CachedValue::with_ttl(config.yield_cache_ttl),
            history: History::new(config.history_capacity.max(1)),
            history_interval: config.history_interval,
            last_sample: None,
        }
    }

    /// The job's owned designations
    pub fn designations(&self) -> &DesignationSet {
        &self.designations
    }

    /// Stock samples taken by [`sample_history`](Self::sample_history)
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Selector over the current settings
    pub fn selector(&self) -> TargetSelector<'_> {
        TargetSelector::new(&self.allow_list, self.settings)
    }

    /// Whether stock is below target
    pub fn needs_work<W: WorldView + ?Sized>(&self, world: &W) -> bool {
        self.trigger.needs_work(world)
    }

    /// Full reconciliation: prune, then adopt designations of the engine's kind
    pub fn reconcile<H: Host + ?Sized>(&mut self, host: &mut H) -> ReconcileReport {
        let selector = TargetSelector::new(&self.allow_list, self.settings);
        Reconciler::new(self.kind, &selector).run(host, &mut self.designations)
    }

    /// Prune only, ignoring the spatial constraint
    ///
    /// Used by area clearing, where targets come from clear regions rather
    /// than the configured area and foreign designations are never adopted.
    pub fn prune<H: Host + ?Sized>(&mut self, host: &mut H) -> ReconcileReport {
        let settings = SelectionSettings {
            area: None,
            ..self.settings
        };
        let selector = TargetSelector::new(&self.allow_list, settings);
        let (dropped, released) =
            Reconciler::new(self.kind, &selector).prune_dead(host, &mut self.designations);
        ReconcileReport {
            dropped,
            released,
            adopted: 0,
        }
    }

    /// Yield pending in owned designations, cached for the configured TTL
    pub fn designated_yield<W: WorldView + ?Sized>(&mut self, world: &W, now: Tick) -> u32 {
        let designations = &self.designations;
        self.yield_cache.get_or_compute(now, || {
            designations
                .iter()
                .filter_map(|d| world.plant(d.target))
                .map(|plant| plant.yield_now)
                .sum()
        })
    }

    /// `target - (stock + designated_yield)`
    pub fn deficit<W: WorldView + ?Sized>(&mut self, world: &W, now: Tick) -> i64 {
        let stock = self.trigger.current_count(world);
        let designated = self.designated_yield(world, now);
        i64::from(self.trigger.target_count) - (i64::from(stock) + i64::from(designated))
    }

    /// Register a designation with the host and take ownership of it
    ///
    /// Returns false if the job already owns a designation on the target.
    pub fn issue<H: Host + ?Sized>(&mut self, host: &mut H, designation: Designation) -> bool {
        if self.designations.owns_target(designation.target) {
            return false;
        }
        host.add_designation(designation);
        self.designations.insert(designation);
        trace!(%designation, "Issued designation");
        true
    }

    /// One quota-mode scheduling pass; returns whether anything was issued
    pub fn run_quota<H: Host + ?Sized>(&mut self, host: &mut H, now: Tick) -> bool {
        self.reconcile(host);

        let deficit = self.deficit(&*host, now);
        if deficit <= 0 {
            debug!(tick = now, deficit, "Quota satisfied, nothing to schedule");
            return false;
        }

        let candidates = self.selector().ranked(&*host);
        let mut remaining = deficit;
        let mut issued = 0;
        for candidate in candidates {
            if remaining <= 0 {
                break;
            }
            if self.issue(host, Designation::new(candidate.plant.handle, self.kind)) {
                remaining -= i64::from(candidate.plant.yield_now);
                issued += 1;
            }
        }

        if issued > 0 {
            info!(tick = now, kind = %self.kind, issued, deficit, remaining, "Scheduled harvest");
        } else {
            debug!(tick = now, deficit, "No valid targets for outstanding deficit");
        }
        issued > 0
    }

    /// Issue a cut designation for every clearable plant on `cells`
    ///
    /// A plant qualifies when it carries no designation at all, its kind is
    /// enabled, and it does not stand on a cultivated cell. There is no cap.
    pub fn clear_cells<H, I>(&mut self, host: &mut H, cells: I) -> usize
    where
        H: Host + ?Sized,
        I: IntoIterator<Item = Cell>,
    {
        let mut issued = 0;
        for cell in cells {
            let Some(plant) = host.plant_at(cell) else {
                continue;
            };
            if !host.designations_on(plant.handle).is_empty()
                || !self.allow_list.is_enabled(&plant.kind)
                || host.is_cultivated(cell)
            {
                continue;
            }
            if self.issue(host, Designation::cut(plant.handle)) {
                issued += 1;
            }
        }
        issued
    }

    /// Record a history sample if the sampling interval has elapsed
    pub fn sample_history<W: WorldView + ?Sized>(&mut self, world: &W, now: Tick) -> bool {
        let due = match self.last_sample {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.history_interval,
        };
        if !due {
            return false;
        }

        let stock = self.trigger.current_count(world);
        let designated = self.designated_yield(world, now);
        self.history.record(now, stock, designated);
        self.last_sample = Some(now);
        true
    }

    /// Release every owned designation back to the host
    pub fn clean_up<H: Host + ?Sized>(&mut self, host: &mut H) -> usize {
        let released = self.designations.drain();
        for designation in &released {
            host.remove_designation(designation);
        }
        self.yield_cache.invalidate();
        if !released.is_empty() {
            debug!(kind = %self.kind, released = released.len(), "Released all designations");
        }
        released.len()
    }
}
