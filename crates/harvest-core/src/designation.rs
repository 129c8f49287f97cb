//! Designations (harvest work orders) and the job-owned designation set

use crate::EntityHandle;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a designation asks the execution layer to do with its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HarvestKind {
    /// Harvest the yield (foraging, logging)
    Harvest,
    /// Cut the plant down regardless of yield (area clearing)
    Cut,
}

impl fmt::Display for HarvestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarvestKind::Harvest => write!(f, "harvest"),
            HarvestKind::Cut => write!(f, "cut"),
        }
    }
}

/// A pending harvest work order referencing one target entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Designation {
    pub target: EntityHandle,
    pub kind: HarvestKind,
}

impl Designation {
    /// Create a new designation
    pub fn new(target: EntityHandle, kind: HarvestKind) -> Self {
        Self { target, kind }
    }

    /// Shorthand for a harvest designation
    pub fn harvest(target: EntityHandle) -> Self {
        Self::new(target, HarvestKind::Harvest)
    }

    /// Shorthand for a cut designation
    pub fn cut(target: EntityHandle) -> Self {
        Self::new(target, HarvestKind::Cut)
    }
}

impl fmt::Display for Designation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.target)
    }
}

/// The job's record of outstanding designations it owns
///
/// Keyed by target so one job can never hold two designations on the same
/// entity. Iteration follows insertion order. This is only the job's view:
/// the host registry decides whether a designation still exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesignationSet {
    by_target: IndexMap<EntityHandle, Designation>,
}

impl DesignationSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a designation; returns false if its target is already owned
    pub fn insert(&mut self, designation: Designation) -> bool {
        if self.by_target.contains_key(&designation.target) {
            return false;
        }
        self.by_target.insert(designation.target, designation);
        true
    }

    /// Remove an exact designation
    pub fn remove(&mut self, designation: &Designation) -> bool {
        match self.by_target.get(&designation.target) {
            Some(owned) if owned == designation => {
                self.by_target.shift_remove(&designation.target);
                true
            }
            _ => false,
        }
    }

    /// Check whether this exact designation is owned
    pub fn contains(&self, designation: &Designation) -> bool {
        self.by_target.get(&designation.target) == Some(designation)
    }

    /// Check whether any owned designation targets this entity
    pub fn owns_target(&self, target: EntityHandle) -> bool {
        self.by_target.contains_key(&target)
    }

    /// Owned designations in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Designation> {
        self.by_target.values()
    }

    /// Snapshot of the owned designations
    pub fn to_vec(&self) -> Vec<Designation> {
        self.by_target.values().copied().collect()
    }

    /// Remove and return every owned designation
    pub fn drain(&mut self) -> Vec<Designation> {
        self.by_target.drain(..).map(|(_, d)| d).collect()
    }

    pub fn len(&self) -> usize {
        self.by_target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_target.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_designation_per_target() {
        let mut set = DesignationSet::new();
        let target = EntityHandle::new(1);

        assert!(set.insert(Designation::harvest(target)));
        assert!(!set.insert(Designation::harvest(target)));
        assert!(!set.insert(Designation::cut(target)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove_requires_exact_match() {
        let mut set = DesignationSet::new();
        let target = EntityHandle::new(7);
        set.insert(Designation::harvest(target));

        assert!(!set.remove(&Designation::cut(target)));
        assert!(set.owns_target(target));
        assert!(set.remove(&Designation::harvest(target)));
        assert!(set.is_empty());
    }

    #[test]
    fn test_insertion_order_and_drain() {
        let mut set = DesignationSet::new();
        for id in [5, 2, 9] {
            set.insert(Designation::harvest(EntityHandle::new(id)));
        }

        let order: Vec<u64> = set.iter().map(|d| d.target.raw()).collect();
        assert_eq!(order, vec![5, 2, 9]);

        let drained = set.drain();
        assert_eq!(drained.len(), 3);
        assert!(set.is_empty());
    }

    #[test]
    fn test_display() {
        let designation = Designation::cut(EntityHandle::new(3));
        assert_eq!(designation.to_string(), "cut entity:3");
    }
}
