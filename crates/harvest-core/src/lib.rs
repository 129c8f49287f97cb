//! Harvest Core - Data model for the harvest-designation scheduler
//!
//! This crate provides the plain data and the host seams the scheduler
//! works through:
//! - Identifiers for resource kinds, stock products, entities and areas
//! - Tick-based time (`Tick`, `Clock`)
//! - Designations and the job-owned `DesignationSet`
//! - Allow-lists, clear-area maps and stock triggers
//! - `CachedValue`, a time-to-live memo for expensive aggregates
//! - `History`, a bounded ring buffer of stock samples
//!
//! ## Host Seams
//!
//! The scheduler never owns the world. It reads through [`WorldView`] and
//! writes designations through [`DesignationRegistry`]; anything that
//! implements both is a [`Host`]:
//!
//! ```text
//! ┌──────────────┐   reads    ┌─────────────┐
//! │  Scheduler   │───────────▶│  WorldView  │  plants, stock, areas, pathing
//! │  (per job)   │            └─────────────┘
//! │              │   writes   ┌──────────────────────┐
//! │              │───────────▶│ DesignationRegistry  │  shared with other writers
//! └──────────────┘            └──────────────────────┘
//! ```

mod allow_list;
mod area;
pub mod cached;
mod designation;
mod error;
pub mod history;
mod identity;
mod plant;
pub mod time;
mod trigger;
mod world;

pub use allow_list::AllowList;
pub use area::{AreaId, AreaSummary, Cell, ClearAreaSet};
pub use cached::CachedValue;
pub use designation::{Designation, DesignationSet, HarvestKind};
pub use error::{Error, Result};
pub use history::{History, HistorySample};
pub use identity::{EntityHandle, ProductId, ResourceType};
pub use plant::{LifecycleStage, PlantInfo, ResourceInfo};
pub use time::{Clock, Tick};
pub use trigger::{StockFilter, ThresholdTrigger};
pub use world::{DesignationRegistry, Host, WorldView};
