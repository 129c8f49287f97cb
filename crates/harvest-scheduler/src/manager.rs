//! Job manager: priority-ordered jobs sharing one update cadence
//!
//! Every manager tick runs each job's cheap `tick`. Then the first job in
//! priority order that is not suspended, not completed and due gets a
//! scheduling pass. At most one job schedules per manager tick.

use crate::config::SchedulerConfig;
use crate::job::HarvestJob;
use harvest_core::{Host, Tick};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Stable identifier for a managed job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job:{}", self.0)
    }
}

struct ManagedJob<H: Host + ?Sized> {
    id: JobId,
    job: Box<dyn HarvestJob<H>>,
    suspended: bool,
    /// Tick of the last scheduling pass
    last_action: Option<Tick>,
}

impl<H: Host + ?Sized> ManagedJob<H> {
    fn is_due(&self, now: Tick, interval: Tick) -> bool {
        match self.last_action {
            None => true,
            Some(last) => now.saturating_sub(last) >= interval,
        }
    }
}

/// Ordered collection of jobs for one host
pub struct JobManager<H: Host + ?Sized> {
    jobs: Vec<ManagedJob<H>>,
    next_id: u64,
    update_interval: Tick,
}

impl<H: Host + ?Sized> JobManager<H> {
    /// Create a manager running each job at most once per `update_interval`
    ///
    /// # Arguments
    ///
    /// * `update_interval` - Minimum ticks between two passes of the same job
    ///
    /// # Example
    ///
    /// ```
    /// use harvest_scheduler::JobManager;
    /// use harvest_sim::SimWorld;
    ///
    /// let mut world = SimWorld::new();
    /// let mut manager: JobManager<SimWorld> = JobManager::new(500);
    /// assert!(manager.is_empty());
    /// assert_eq!(manager.tick(&mut world, 0), None);
    /// ```
    pub fn new(update_interval: Tick) -> Self {
        Self {
            jobs: Vec::new(),
            next_id: 0,
            update_interval,
        }
    }

    /// Manager using `config.update_interval`
    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self::new(config.update_interval)
    }

    pub fn update_interval(&self) -> Tick {
        self.update_interval
    }

    /// Append a job at the lowest priority
    pub fn add(&mut self, job: Box<dyn HarvestJob<H>>) -> JobId {
        let id = JobId(self.next_id);
        self.next_id += 1;
        info!(job = %id, label = job.label(), "Added job");
        self.jobs.push(ManagedJob {
            id,
            job,
            suspended: false,
            last_action: None,
        });
        id
    }

    /// Remove a job, releasing its designations
    pub fn remove(&mut self, id: JobId, host: &mut H) -> Option<Box<dyn HarvestJob<H>>> {
        let index = self.position(id)?;
        let mut entry = self.jobs.remove(index);
        let released = entry.job.clean_up(host);
        info!(job = %id, released, "Removed job");
        Some(entry.job)
    }

    /// Look up a job by id
    pub fn get(&self, id: JobId) -> Option<&dyn HarvestJob<H>> {
        self.jobs
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.job.as_ref())
    }

    /// Mutable access to a job, for example to refresh its allow-list
    pub fn get_mut(&mut self, id: JobId) -> Option<&mut (dyn HarvestJob<H> + 'static)> {
        self.jobs
            .iter_mut()
            .find(|entry| entry.id == id)
            .map(|entry| entry.job.as_mut())
    }

    /// Priority index of a job; 0 runs first
    pub fn position(&self, id: JobId) -> Option<usize> {
        self.jobs.iter().position(|entry| entry.id == id)
    }

    /// Job IDs in priority order
    pub fn ids(&self) -> impl Iterator<Item = JobId> + '_ {
        self.jobs.iter().map(|entry| entry.id)
    }

    pub fn suspend(&mut self, id: JobId) -> bool {
        self.set_suspended(id, true)
    }

    pub fn resume(&mut self, id: JobId) -> bool {
        self.set_suspended(id, false)
    }

    pub fn is_suspended(&self, id: JobId) -> Option<bool> {
        self.jobs
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.suspended)
    }

    fn set_suspended(&mut self, id: JobId, suspended: bool) -> bool {
        match self.jobs.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                entry.suspended = suspended;
                debug!(job = %id, suspended, "Changed suspension");
                true
            }
            None => false,
        }
    }

    /// Raise a job's priority by one; false if already first or unknown
    pub fn move_up(&mut self, id: JobId) -> bool {
        match self.position(id) {
            Some(index) if index > 0 => {
                self.jobs.swap(index, index - 1);
                true
            }
            _ => false,
        }
    }

    /// Lower a job's priority by one; false if already last or unknown
    pub fn move_down(&mut self, id: JobId) -> bool {
        match self.position(id) {
            Some(index) if index + 1 < self.jobs.len() => {
                self.jobs.swap(index, index + 1);
                true
            }
            _ => false,
        }
    }

    /// Tick of a job's last scheduling pass
    pub fn last_action(&self, id: JobId) -> Option<Tick> {
        self.jobs
            .iter()
            .find(|entry| entry.id == id)
            .and_then(|entry| entry.last_action)
    }

    /// Run one manager tick; returns the job that got a scheduling pass
    pub fn tick(&mut self, host: &mut H, now: Tick) -> Option<JobId> {
        for entry in &mut self.jobs {
            entry.job.tick(&*host, now);
        }

        let interval = self.update_interval;
        let entry = self.jobs.iter_mut().find(|entry| {
            !entry.suspended && entry.is_due(now, interval) && !entry.job.completed(&*host)
        })?;

        entry.last_action = Some(now);
        let worked = entry.job.try_do_job(host, now);
        debug!(tick = now, job = %entry.id, label = entry.job.label(), worked, "Ran job");
        Some(entry.id)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ForagerJob, ForestryJob};
    use harvest_core::{
        Cell, DesignationRegistry, LifecycleStage, ProductId, ResourceInfo, ResourceType,
    };
    use harvest_sim::SimWorld;

    fn world() -> SimWorld {
        let mut world = SimWorld::new();
        world.define_resource(ResourceInfo {
            kind: ResourceType::new("oak"),
            label: "oak".to_string(),
            harvest_yield: 20.0,
            product: Some(ProductId::new("WoodLog")),
            harvest_tag: Some("Wood".to_string()),
        });
        world.define_resource(ResourceInfo {
            kind: ResourceType::new("berry"),
            label: "berry bush".to_string(),
            harvest_yield: 10.0,
            product: Some(ProductId::new("Berries")),
            harvest_tag: Some("Standard".to_string()),
        });
        world.add_regional("oak");
        world.add_regional("berry");
        world.spawn_plant("oak", Cell::new(1, 0), LifecycleStage::Mature, 20);
        world.spawn_plant("berry", Cell::new(2, 0), LifecycleStage::Mature, 5);
        world
    }

    fn manager(world: &SimWorld) -> (JobManager<SimWorld>, JobId, JobId) {
        let config = SchedulerConfig::default();
        let mut forestry = ForestryJob::new(world, 50, &config);
        forestry.set_allowed(&ResourceType::new("oak"), true);
        let mut forager = ForagerJob::new(world, 50, &config);
        forager.set_allowed(&ResourceType::new("berry"), true);

        let mut manager: JobManager<SimWorld> = JobManager::new(100);
        let logging = manager.add(Box::new(forestry));
        let foraging = manager.add(Box::new(forager));
        (manager, logging, foraging)
    }

    #[test]
    fn test_runs_first_due_job_in_priority_order() {
        let mut world = world();
        let (mut manager, logging, foraging) = manager(&world);

        assert_eq!(manager.tick(&mut world, 0), Some(logging));
        assert_eq!(manager.tick(&mut world, 1), Some(foraging));
        // both ran recently
        assert_eq!(manager.tick(&mut world, 2), None);
        assert_eq!(manager.tick(&mut world, 100), Some(logging));
        assert_eq!(manager.last_action(logging), Some(100));
        assert_eq!(world.registry().len(), 2);
    }

    #[test]
    fn test_skips_suspended_and_completed_jobs() {
        let mut world = world();
        let (mut manager, logging, foraging) = manager(&world);
        world.add_stock("Berries", 50);

        assert!(manager.suspend(logging));
        assert_eq!(manager.is_suspended(logging), Some(true));
        assert_eq!(manager.tick(&mut world, 0), None);

        assert!(manager.get(foraging).is_some_and(|job| job.completed(&world)));
        assert!(manager.resume(logging));
        assert_eq!(manager.tick(&mut world, 1), Some(logging));
    }

    #[test]
    fn test_reorder() {
        let world = world();
        let (mut manager, logging, foraging) = manager(&world);

        assert!(!manager.move_up(logging));
        assert!(manager.move_up(foraging));
        assert_eq!(manager.ids().collect::<Vec<_>>(), vec![foraging, logging]);
        assert!(!manager.move_down(logging));
        assert!(manager.move_down(foraging));
        assert_eq!(manager.position(foraging), Some(1));
    }

    #[test]
    fn test_remove_cleans_up() {
        let mut world = world();
        let (mut manager, logging, _) = manager(&world);

        manager.tick(&mut world, 0);
        assert_eq!(world.registry().len(), 1);

        let removed = manager.remove(logging, &mut world);
        assert_eq!(removed.map(|job| job.label().to_string()), Some("forestry".to_string()));
        assert!(world.registry().is_empty());
        assert_eq!(manager.len(), 1);
        assert!(manager.remove(logging, &mut world).is_none());
    }

    #[test]
    fn test_suspended_jobs_never_schedule() {
        let mut world = world();
        let (mut manager, logging, foraging) = manager(&world);
        manager.suspend(logging);
        manager.suspend(foraging);

        assert_eq!(manager.tick(&mut world, 0), None);
        assert_eq!(manager.tick(&mut world, 300), None);
        assert!(world.registry().is_empty());
        assert_eq!(manager.last_action(logging), None);
        assert!(!manager.suspend(JobId(99)));
    }

    #[test]
    fn test_direct_job_access_bypasses_cadence() {
        let mut world = world();
        let (mut manager, logging, foraging) = manager(&world);

        let ran = manager
            .get_mut(foraging)
            .map(|job| job.try_do_job(&mut world, 5));
        assert_eq!(ran, Some(true));
        assert_eq!(world.registry().len(), 1);
        // only manager ticks stamp the cadence
        assert_eq!(manager.last_action(foraging), None);
        assert!(manager.get_mut(JobId(99)).is_none());

        assert_eq!(manager.tick(&mut world, 6), Some(logging));
    }
}
