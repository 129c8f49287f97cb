//! Time-to-live memo for expensive aggregates
//!
//! `CachedValue` keeps one `(value, computed_at)` pair and hands it back
//! while it is younger than the TTL. Invalidation is purely time based:
//! mutating whatever the value was computed from does not refresh it early.

use crate::Tick;
use serde::{Deserialize, Serialize};

/// Default time-to-live, in ticks
pub const DEFAULT_TTL: Tick = 250;

/// A memoized value that expires after a fixed number of ticks
///
/// # Example
///
/// ```
/// use harvest_core::CachedValue;
///
/// let mut cache = CachedValue::with_ttl(10);
/// assert_eq!(cache.get_or_compute(0, || 5), 5);
///
/// // still fresh: the closure is not consulted
/// assert_eq!(cache.get_or_compute(9, || 99), 5);
///
/// // expired
/// assert_eq!(cache.get_or_compute(10, || 99), 99);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedValue<T> {
    /// Cached entry: (value, tick it was computed at)
    #[serde(skip)]
    entry: Option<(T, Tick)>,
    /// Ticks an entry stays valid
    ttl: Tick,
}

impl<T: Clone> CachedValue<T> {
    /// Create an empty cache with the default TTL
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Create an empty cache with the given TTL
    pub fn with_ttl(ttl: Tick) -> Self {
        Self { entry: None, ttl }
    }

    /// Get the cached value if it is still fresh at `now`
    pub fn get(&self, now: Tick) -> Option<T> {
        let (value, computed_at) = self.entry.as_ref()?;
        // a clock that went backwards is treated as a miss
        if now < *computed_at || now - computed_at >= self.ttl {
            return None;
        }
        Some(value.clone())
    }

    /// Store a freshly computed value
    pub fn update(&mut self, now: Tick, value: T) {
        self.entry = Some((value, now));
    }

    /// Return the fresh cached value, or compute, store and return a new one
    pub fn get_or_compute<F>(&mut self, now: Tick, compute: F) -> T
    where
        F: FnOnce() -> T,
    {
        if let Some(value) = self.get(now) {
            return value;
        }
        let value = compute();
        self.update(now, value.clone());
        value
    }

    /// Drop the cached entry
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Tick the current entry was computed at
    pub fn computed_at(&self) -> Option<Tick> {
        self.entry.as_ref().map(|(_, at)| *at)
    }

    /// Ticks an entry stays fresh
    pub fn ttl(&self) -> Tick {
        self.ttl
    }
}

impl<T: Clone> Default for CachedValue<T> {
    fn default() -> Self {
        Self::new()
    }
}
