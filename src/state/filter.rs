//! Selection predicates over the particle set.
//!
//! A filter describes which particles belong to a derived group. Filters
//! compare by value: two filters of the same kind with equal parameters
//! produce the same [`FilterKey`] and therefore resolve to the same cached
//! group.

use std::collections::BTreeSet;

use crate::error::EntityKind;
use crate::store::SystemStore;

/// Stable, hashable cache key identifying a filter by kind and value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterKey {
    kind: &'static str,
    value: String,
}

impl FilterKey {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// A value-comparable predicate selecting a subset of particles.
///
/// `key` must be stable: equal filters return equal keys, and the key never
/// depends on the particle data. `select` evaluates against the store's
/// current particle set and returns member indices in ascending order.
pub trait ParticleFilter {
    fn key(&self) -> FilterKey;

    fn select(&self, store: &SystemStore) -> Vec<u32>;
}

/// Selects every particle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllFilter;

impl ParticleFilter for AllFilter {
    fn key(&self) -> FilterKey {
        FilterKey::new("all", "")
    }

    fn select(&self, store: &SystemStore) -> Vec<u32> {
        (0..store.particle_count() as u32).collect()
    }
}

/// Selects particles whose type name is in a set.
///
/// The set is canonicalized at construction, so the order in which type
/// names are listed never splits the cache key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeFilter {
    types: BTreeSet<String>,
}

impl TypeFilter {
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            types: types.into_iter().map(Into::into).collect(),
        }
    }
}

impl ParticleFilter for TypeFilter {
    fn key(&self) -> FilterKey {
        let value = self
            .types
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",");
        FilterKey::new("type", value)
    }

    fn select(&self, store: &SystemStore) -> Vec<u32> {
        let names = store.types(EntityKind::Particle);
        let wanted: Vec<bool> = names.iter().map(|n| self.types.contains(n)).collect();
        store
            .particle_typeids()
            .iter()
            .enumerate()
            .filter(|(_, id)| wanted.get(**id as usize).copied().unwrap_or(false))
            .map(|(i, _)| i as u32)
            .collect()
    }
}

/// Selects an explicit list of particle tags.
///
/// Tags are sorted and deduplicated at construction; evaluation drops tags
/// beyond the current particle range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    tags: Vec<u32>,
}

impl TagFilter {
    pub fn new(tags: impl IntoIterator<Item = u32>) -> Self {
        let mut tags: Vec<u32> = tags.into_iter().collect();
        tags.sort_unstable();
        tags.dedup();
        Self { tags }
    }
}

impl ParticleFilter for TagFilter {
    fn key(&self) -> FilterKey {
        let value = self
            .tags
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(",");
        FilterKey::new("tags", value)
    }

    fn select(&self, store: &SystemStore) -> Vec<u32> {
        let count = store.particle_count() as u32;
        self.tags.iter().copied().filter(|t| *t < count).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::Device;
    use crate::model::boxdim::SimulationBox;
    use crate::model::snapshot::{ParticleSection, Snapshot};

    fn make_store() -> SystemStore {
        let mut snap = Snapshot::new(SimulationBox::cubic(10.0).unwrap());
        snap.particles = ParticleSection::with_count(5);
        snap.particles.types = vec!["A".to_string(), "B".to_string()];
        snap.particles.typeid = vec![0, 1, 0, 1, 0];
        SystemStore::new(&snap, Device::cpu())
    }

    #[test]
    fn all_filter_selects_everything() {
        let store = make_store();
        assert_eq!(AllFilter.select(&store), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn type_filter_selects_by_type_name() {
        let store = make_store();
        assert_eq!(TypeFilter::new(["A"]).select(&store), vec![0, 2, 4]);
        assert_eq!(TypeFilter::new(["B"]).select(&store), vec![1, 3]);
        assert_eq!(
            TypeFilter::new(["A", "B"]).select(&store),
            vec![0, 1, 2, 3, 4]
        );
        assert!(TypeFilter::new(["C"]).select(&store).is_empty());
    }

    #[test]
    fn type_filter_key_ignores_listing_order() {
        let f1 = TypeFilter::new(["B", "A"]);
        let f2 = TypeFilter::new(["A", "B", "A"]);
        assert_eq!(f1.key(), f2.key());
        assert_ne!(f1.key(), TypeFilter::new(["A"]).key());
    }

    #[test]
    fn tag_filter_sorts_dedups_and_clamps() {
        let store = make_store();
        let f = TagFilter::new([4, 1, 4, 99]);
        assert_eq!(f.select(&store), vec![1, 4]);
        assert_eq!(f.key(), TagFilter::new([1, 4, 99]).key());
    }

    #[test]
    fn keys_differ_across_filter_kinds() {
        assert_ne!(AllFilter.key(), TypeFilter::new(Vec::<String>::new()).key());
        assert_ne!(AllFilter.key(), TagFilter::new([]).key());
    }
}
