//! Harvest Scheduler - Keeps stock above target by issuing harvest designations
//!
//! Each job wraps a [`HarvestEngine`] that, once per scheduling pass:
//!
//! 1. Reconciles its owned designations against the host registry, which
//!    other writers share ([`Reconciler`])
//! 2. Computes the remaining deficit from live stock plus the cached yield
//!    of outstanding designations
//! 3. Issues designations on the best-ranked valid targets until the deficit
//!    closes ([`TargetSelector`])
//!
//! Two jobs are provided:
//! - [`ForagerJob`]: one area, non-wood wild plants, food quota
//! - [`ForestryJob`]: logging toward a wood quota, or clearing regions and
//!   wind turbine cells with no quota
//!
//! [`JobManager`] orders jobs by priority and gives at most one of them a
//! scheduling pass per tick.
//!
//! ## Example
//!
//! ```
//! use harvest_core::{Cell, LifecycleStage, ProductId, ResourceInfo, ResourceType};
//! use harvest_scheduler::{ForagerJob, JobManager, SchedulerConfig};
//! use harvest_sim::SimWorld;
//!
//! let mut world = SimWorld::new();
//! world.define_resource(ResourceInfo {
//!     kind: ResourceType::new("berry"),
//!     label: "berry bush".to_string(),
//!     harvest_yield: 10.0,
//!     product: Some(ProductId::new("Berries")),
//!     harvest_tag: None,
//! });
//! let bush = world.spawn_plant("berry", Cell::new(3, 4), LifecycleStage::Mature, 10);
//!
//! let config = SchedulerConfig::default();
//! let mut forager = ForagerJob::new(&world, 20, &config);
//! forager.set_allowed(&ResourceType::new("berry"), true);
//!
//! let mut manager: JobManager<SimWorld> = JobManager::from_config(&config);
//! let id = manager.add(Box::new(forager));
//! assert_eq!(manager.tick(&mut world, 0), Some(id));
//!
//! assert_eq!(world.harvest(bush), Ok(10));
//! assert_eq!(world.stock_of(&ProductId::new("Berries")), 10);
//! ```

mod config;
mod engine;
mod error;
mod forager;
mod forestry;
mod job;
mod manager;
mod reconcile;
mod selector;

pub use config::SchedulerConfig;
pub use engine::HarvestEngine;
pub use error::{Error, Result};
pub use forager::ForagerJob;
pub use forestry::{ForestryJob, ForestryMode, TURBINE_AREA_LABEL};
pub use job::HarvestJob;
pub use manager::{JobId, JobManager};
pub use reconcile::{ReconcileReport, Reconciler};
pub use selector::{Candidate, SelectionSettings, TargetSelector};
