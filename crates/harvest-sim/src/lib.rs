//! Harvest Sim - In-memory host world
//!
//! `SimWorld` implements both host seams of `harvest-core` over plain
//! collections. It stands in for the game: plants grow on cells, areas
//! come and go, wind turbines claim cells, and [`SimWorld::harvest`] plays
//! the worker that executes a designation and banks its yield.

mod registry;
mod world;

pub use registry::SimRegistry;
pub use world::{SimArea, SimWorld, TURBINE_REACH};
