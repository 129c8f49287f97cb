//! In-memory designation registry

use harvest_core::{Designation, DesignationRegistry, EntityHandle, HarvestKind};
use indexmap::IndexMap;

/// Designations indexed by target, at most one per `(target, kind)`
#[derive(Debug, Clone, Default)]
pub struct SimRegistry {
    by_target: IndexMap<EntityHandle, Vec<Designation>>,
}

impl SimRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every designation on a target, returning how many there were
    pub fn clear_target(&mut self, target: EntityHandle) -> usize {
        self.by_target
            .shift_remove(&target)
            .map(|list| list.len())
            .unwrap_or(0)
    }

    /// Total number of registered designations
    pub fn len(&self) -> usize {
        self.by_target.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All designations in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Designation> {
        self.by_target.values().flatten()
    }
}

impl DesignationRegistry for SimRegistry {
    fn designations_of(&self, kind: HarvestKind) -> Vec<Designation> {
        self.iter().filter(|d| d.kind == kind).copied().collect()
    }

    fn designations_on(&self, target: EntityHandle) -> Vec<Designation> {
        self.by_target.get(&target).cloned().unwrap_or_default()
    }

    fn add_designation(&mut self, designation: Designation) {
        let list = self.by_target.entry(designation.target).or_default();
        if !list.contains(&designation) {
            list.push(designation);
        }
    }

    fn remove_designation(&mut self, designation: &Designation) -> bool {
        let Some(list) = self.by_target.get_mut(&designation.target) else {
            return false;
        };
        let before = list.len();
        list.retain(|d| d != designation);
        let removed = list.len() != before;
        if list.is_empty() {
            self.by_target.shift_remove(&designation.target);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_idempotent() {
        let mut registry = SimRegistry::new();
        let d = Designation::harvest(EntityHandle::new(1));
        registry.add_designation(d);
        registry.add_designation(d);
        assert_eq!(registry.len(), 1);
        assert!(registry.has_designation(&d));
    }

    #[test]
    fn test_query_by_kind_and_target() {
        let mut registry = SimRegistry::new();
        registry.add_designation(Designation::harvest(EntityHandle::new(1)));
        registry.add_designation(Designation::cut(EntityHandle::new(2)));
        registry.add_designation(Designation::cut(EntityHandle::new(1)));

        assert_eq!(registry.designations_of(HarvestKind::Cut).len(), 2);
        assert_eq!(registry.designations_on(EntityHandle::new(1)).len(), 2);
        assert!(registry.designations_on(EntityHandle::new(3)).is_empty());
    }

    #[test]
    fn test_remove() {
        let mut registry = SimRegistry::new();
        let d = Designation::cut(EntityHandle::new(4));
        registry.add_designation(d);

        assert!(registry.remove_designation(&d));
        assert!(!registry.remove_designation(&d));
        assert!(registry.is_empty());
    }
}
