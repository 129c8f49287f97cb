//! Time for tick-driven hosts
//!
//! The scheduler never looks at wall-clock time. Every time-bounded behavior
//! (yield caching, history sampling, job intervals) is expressed in `Tick`s,
//! whatever unit the host chooses to count in.

use serde::{Deserialize, Serialize};

/// A discrete time value in host units
pub type Tick = u64;

/// Host clock state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Clock {
    /// Current tick number
    pub tick: Tick,
}

impl Clock {
    /// Create a new clock at tick zero
    pub fn new() -> Self {
        Self { tick: 0 }
    }

    /// Create a clock starting at a given tick
    pub fn starting_at(tick: Tick) -> Self {
        Self { tick }
    }

    /// Advance to the next tick
    pub fn advance(&mut self) {
        self.tick += 1;
    }

    /// Advance by several ticks at once
    pub fn advance_by(&mut self, ticks: Tick) {
        self.tick += ticks;
    }

    /// Ticks elapsed since `earlier`, zero if `earlier` lies in the future
    pub fn elapsed_since(&self, earlier: Tick) -> Tick {
        self.tick.saturating_sub(earlier)
    }
}
