//! Bounded stock history
//!
//! A fixed-size ring buffer of `(tick, stock, designated)` samples. Old
//! samples are evicted as new ones arrive, so memory stays bounded however
//! long a job lives.
//!
//! The persisted form is the capacity plus the samples from oldest to
//! newest; the ring is rebuilt on load, so a save never carries ring
//! positions that could point outside the storage.

use crate::{Error, Tick};
use serde::{Deserialize, Serialize};

/// Default number of samples kept
pub const DEFAULT_CAPACITY: usize = 100;

/// One recorded sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySample {
    pub tick: Tick,
    /// Banked quantity
    pub stock: u32,
    /// Yield pending in the job's designations
    pub designated: u32,
}

/// Ring buffer of stock samples
///
/// # Example
///
/// ```
/// use harvest_core::History;
///
/// let mut history = History::new(2);
/// history.record(10, 4, 0);
/// history.record(20, 6, 2);
/// history.record(30, 9, 1);
///
/// let ticks: Vec<_> = history.iter().map(|s| s.tick).collect();
/// assert_eq!(ticks, vec![20, 30]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SavedHistory", into = "SavedHistory")]
pub struct History {
    /// Ring storage; `None` marks an unused slot
    samples: Vec<Option<HistorySample>>,
    /// Next write position
    head: usize,
    /// Number of samples currently stored
    count: usize,
}

/// Persisted form of a [`History`]
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SavedHistory {
    capacity: usize,
    /// Oldest first
    samples: Vec<HistorySample>,
}

impl From<History> for SavedHistory {
    fn from(history: History) -> Self {
        Self {
            capacity: history.capacity(),
            samples: history.iter().copied().collect(),
        }
    }
}

impl TryFrom<SavedHistory> for History {
    type Error = Error;

    /// Rebuild the ring; a save with more samples than capacity keeps the newest
    fn try_from(saved: SavedHistory) -> Result<Self, Self::Error> {
        if saved.capacity == 0 {
            return Err(Error::InvalidHistory(
                "capacity must be greater than 0".to_string(),
            ));
        }
        let mut history = Self::new(saved.capacity);
        for sample in saved.samples {
            history.record(sample.tick, sample.stock, sample.designated);
        }
        Ok(history)
    }
}

impl History {
    /// Create a history holding at most `capacity` samples
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of samples kept before the oldest is evicted
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than 0");
        Self {
            samples: vec![None; capacity],
            head: 0,
            count: 0,
        }
    }

    /// Record a sample, evicting the oldest one when full
    pub fn record(&mut self, tick: Tick, stock: u32, designated: u32) {
        self.samples[self.head] = Some(HistorySample {
            tick,
            stock,
            designated,
        });
        self.head = (self.head + 1) % self.samples.len();
        if self.count < self.samples.len() {
            self.count += 1;
        }
    }

    /// Samples from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &HistorySample> {
        let capacity = self.samples.len();
        let start = (self.head + capacity - self.count) % capacity;
        (0..self.count).filter_map(move |offset| self.samples[(start + offset) % capacity].as_ref())
    }

    /// Most recent sample
    pub fn latest(&self) -> Option<&HistorySample> {
        if self.count == 0 {
            return None;
        }
        let capacity = self.samples.len();
        self.samples[(self.head + capacity - 1) % capacity].as_ref()
    }

    /// `(oldest_tick, newest_tick)` of the stored samples
    pub fn tick_range(&self) -> Option<(Tick, Tick)> {
        let oldest = self.iter().next()?.tick;
        let newest = self.latest()?.tick;
        Some((oldest, newest))
    }

    /// Drop every sample
    pub fn clear(&mut self) {
        for slot in &mut self.samples {
            *slot = None;
        }
        self.head = 0;
        self.count = 0;
    }

    /// Maximum number of samples kept
    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    /// Number of samples currently stored
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Equal when capacity and samples match, wherever the ring starts
impl PartialEq for History {
    fn eq(&self, other: &Self) -> bool {
        self.capacity() == other.capacity() && self.iter().eq(other.iter())
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
