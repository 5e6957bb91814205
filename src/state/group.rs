//! Cached particle groups and their degrees of freedom.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::filter::{FilterKey, ParticleFilter};
use crate::store::SystemStore;

/// Capability of the external integrator queried during DOF updates.
///
/// The integrator is only ever queried; the state layer never owns one.
pub trait Integrator {
    /// Translational and rotational degrees of freedom this integrator
    /// grants the group.
    fn recompute_dof(&self, group: &ParticleGroup) -> (u64, u64);
}

/// Derived view over the particle set: the members matching a filter at
/// creation time, plus DOF counters supplied by the integrator.
///
/// Membership is fixed at creation. Mutating the underlying particle data
/// does not refresh existing groups; that staleness is part of the caching
/// contract, and callers refresh DOF explicitly through
/// [`State::update_group_dof`](crate::State::update_group_dof).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticleGroup {
    members: Vec<u32>,
    translational_dof: u64,
    rotational_dof: u64,
}

impl ParticleGroup {
    /// New group with both DOF counters zero. `members` are particle
    /// indices in ascending order.
    pub fn new(members: Vec<u32>) -> Self {
        Self {
            members,
            translational_dof: 0,
            rotational_dof: 0,
        }
    }

    pub fn members(&self) -> &[u32] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn translational_dof(&self) -> u64 {
        self.translational_dof
    }

    pub fn rotational_dof(&self) -> u64 {
        self.rotational_dof
    }

    pub fn set_translational_dof(&mut self, dof: u64) {
        self.translational_dof = dof;
    }

    pub fn set_rotational_dof(&mut self, dof: u64) {
        self.rotational_dof = dof;
    }
}

/// Shared handle to a cached group. Equal filters yield handles to the
/// identical group; compare with [`Rc::ptr_eq`] to observe that.
pub type GroupHandle = Rc<RefCell<ParticleGroup>>;

/// Memoizes groups by filter key. Entries are never evicted for the
/// lifetime of the owning state.
#[derive(Debug, Default)]
pub(crate) struct GroupCache {
    groups: HashMap<FilterKey, GroupHandle>,
}

impl GroupCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Cached handle for `filter`, evaluating the filter against the
    /// store's current particle set only on the first request.
    pub(crate) fn get_or_create(
        &mut self,
        filter: &dyn ParticleFilter,
        store: &SystemStore,
    ) -> GroupHandle {
        let key = filter.key();
        if let Some(handle) = self.groups.get(&key) {
            return Rc::clone(handle);
        }
        let group = ParticleGroup::new(filter.select(store));
        let handle = Rc::new(RefCell::new(group));
        self.groups.insert(key, Rc::clone(&handle));
        handle
    }

    pub(crate) fn handles(&self) -> impl Iterator<Item = &GroupHandle> {
        self.groups.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::Device;
    use crate::model::boxdim::SimulationBox;
    use crate::model::snapshot::{ParticleSection, Snapshot};
    use crate::state::filter::{AllFilter, TagFilter};

    fn store_with(n: usize) -> SystemStore {
        let mut snap = Snapshot::new(SimulationBox::cubic(10.0).unwrap());
        snap.particles = ParticleSection::with_count(n);
        snap.particles.types = vec!["A".to_string()];
        SystemStore::new(&snap, Device::cpu())
    }

    #[test]
    fn fresh_groups_have_zero_dof() {
        let group = ParticleGroup::new(vec![0, 1, 2]);
        assert_eq!(group.len(), 3);
        assert_eq!(group.translational_dof(), 0);
        assert_eq!(group.rotational_dof(), 0);
    }

    #[test]
    fn cache_hit_returns_the_identical_handle() {
        let store = store_with(3);
        let mut cache = GroupCache::new();
        let g1 = cache.get_or_create(&AllFilter, &store);
        let g2 = cache.get_or_create(&AllFilter, &store);
        assert!(Rc::ptr_eq(&g1, &g2));
        assert_eq!(cache.handles().count(), 1);
    }

    #[test]
    fn cache_hit_skips_re_evaluation() {
        let mut store = store_with(3);
        let mut cache = GroupCache::new();
        let g1 = cache.get_or_create(&AllFilter, &store);
        assert_eq!(g1.borrow().members(), &[0, 1, 2]);

        // grow the particle set; the cached group stays as created
        let mut bigger = Snapshot::new(SimulationBox::cubic(10.0).unwrap());
        bigger.particles = ParticleSection::with_count(5);
        bigger.particles.types = vec!["A".to_string()];
        store.load(&bigger);

        let g2 = cache.get_or_create(&AllFilter, &store);
        assert!(Rc::ptr_eq(&g1, &g2));
        assert_eq!(g2.borrow().members(), &[0, 1, 2]);
    }

    #[test]
    fn distinct_filters_get_distinct_groups() {
        let store = store_with(4);
        let mut cache = GroupCache::new();
        let g1 = cache.get_or_create(&TagFilter::new([0, 1]), &store);
        let g2 = cache.get_or_create(&TagFilter::new([2, 3]), &store);
        assert!(!Rc::ptr_eq(&g1, &g2));
        assert_eq!(cache.handles().count(), 2);
    }
}
