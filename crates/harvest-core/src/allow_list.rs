//! Per-resource-type enable map

use crate::ResourceType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Which resource types a job is allowed to target
///
/// Insertion order is the display order. Keys are added lazily as the host
/// reports new harvestable kinds and are only removed by an explicit
/// [`AllowList::retain_options`] resync.
///
/// # Example
///
/// ```
/// use harvest_core::{AllowList, ResourceType};
///
/// let mut list = AllowList::new();
/// list.add_missing([ResourceType::new("oak"), ResourceType::new("birch")]);
/// assert!(!list.is_enabled(&ResourceType::new("oak")));
///
/// list.set(&ResourceType::new("oak"), true);
/// assert_eq!(list.enabled().count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllowList {
    entries: IndexMap<ResourceType, bool>,
}

impl AllowList {
    /// Create an empty allow-list
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a type is present and enabled
    pub fn is_enabled(&self, kind: &ResourceType) -> bool {
        self.entries.get(kind).copied().unwrap_or(false)
    }

    /// Check whether a type is present at all
    pub fn contains(&self, kind: &ResourceType) -> bool {
        self.entries.contains_key(kind)
    }

    /// Enable or disable a known type; unknown types are ignored
    pub fn set(&mut self, kind: &ResourceType, enabled: bool) -> bool {
        match self.entries.get_mut(kind) {
            Some(value) => {
                *value = enabled;
                true
            }
            None => false,
        }
    }

    /// Enable or disable every known type
    pub fn set_all(&mut self, enabled: bool) {
        for value in self.entries.values_mut() {
            *value = enabled;
        }
    }

    /// Add every option not already present, disabled. Returns the number added.
    pub fn add_missing(&mut self, options: impl IntoIterator<Item = ResourceType>) -> usize {
        let mut added = 0;
        for kind in options {
            if !self.entries.contains_key(&kind) {
                self.entries.insert(kind, false);
                added += 1;
            }
        }
        added
    }

    /// Remove every key that is not among `options`, returning the removed keys
    pub fn retain_options(&mut self, options: &[ResourceType]) -> Vec<ResourceType> {
        let removed: Vec<ResourceType> = self
            .entries
            .keys()
            .filter(|kind| !options.contains(kind))
            .cloned()
            .collect();
        for kind in &removed {
            self.entries.shift_remove(kind);
        }
        removed
    }

    /// Reorder entries by display label
    pub fn sort_by_label<F>(&mut self, label: F)
    where
        F: Fn(&ResourceType) -> String,
    {
        self.entries
            .sort_by(|a, _, b, _| label(a).cmp(&label(b)));
    }

    /// Enabled types in display order
    pub fn enabled(&self) -> impl Iterator<Item = &ResourceType> {
        self.entries
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(kind, _)| kind)
    }

    /// All types in display order
    pub fn keys(&self) -> impl Iterator<Item = &ResourceType> {
        self.entries.keys()
    }

    /// All entries in display order
    pub fn iter(&self) -> impl Iterator<Item = (&ResourceType, bool)> {
        self.entries.iter().map(|(kind, enabled)| (kind, *enabled))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
