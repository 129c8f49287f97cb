//! Spatial types: cells, area references and the clear-area map

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A map cell in the host's ground plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Cell {
    pub x: i32,
    pub z: i32,
}

impl Cell {
    /// Create a new cell
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Euclidean distance between two cells
    pub fn distance(&self, other: Cell) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dz = (self.z - other.z) as f32;
        (dx * dx + dz * dz).sqrt()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Identity reference to a host-owned area
///
/// The area itself lives in the host and may be deleted between ticks; a job
/// only ever holds this reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AreaId(pub u64);

impl AreaId {
    /// Create a new area reference
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "area:{}", self.0)
    }
}

/// Description of an existing area as reported by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaSummary {
    pub id: AreaId,
    pub label: String,
    /// Whether the area can be offered as a clearing region
    pub assignable: bool,
}

/// Per-area "clear this region" switches for forestry clearing jobs
///
/// Insertion order is the display order. Entries are only added or removed
/// through [`ClearAreaSet::sync`], which mirrors the host's area list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClearAreaSet {
    entries: IndexMap<AreaId, bool>,
}

impl ClearAreaSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Align the set with the host's current areas
    ///
    /// New assignable areas are added disabled; entries whose area no longer
    /// exists are removed. Returns `(added, removed)`.
    pub fn sync(&mut self, areas: &[AreaSummary]) -> (usize, usize) {
        let mut added = 0;
        for area in areas.iter().filter(|a| a.assignable) {
            if !self.entries.contains_key(&area.id) {
                self.entries.insert(area.id, false);
                added += 1;
            }
        }

        let before = self.entries.len();
        self.entries
            .retain(|id, _| areas.iter().any(|area| area.id == *id));
        (added, before - self.entries.len())
    }

    /// Enable or disable clearing of an area; ignored for unknown areas
    pub fn set(&mut self, area: AreaId, clear: bool) -> bool {
        match self.entries.get_mut(&area) {
            Some(value) => {
                *value = clear;
                true
            }
            None => false,
        }
    }

    /// Check whether an area is marked for clearing
    pub fn is_enabled(&self, area: AreaId) -> bool {
        self.entries.get(&area).copied().unwrap_or(false)
    }

    /// Areas marked for clearing, in display order
    pub fn enabled(&self) -> impl Iterator<Item = AreaId> + '_ {
        self.entries
            .iter()
            .filter(|(_, clear)| **clear)
            .map(|(id, _)| *id)
    }

    /// All entries in display order
    pub fn iter(&self) -> impl Iterator<Item = (AreaId, bool)> + '_ {
        self.entries.iter().map(|(id, clear)| (*id, *clear))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
