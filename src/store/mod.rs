//! Authoritative data store underlying the state controller.
//!
//! The [`SystemStore`] is the single owner of canonical particle and
//! topology data, the global box, and the active domain decomposition. It
//! is constructed exactly once per [`State`](crate::State) and mutated in
//! place thereafter: re-initialization goes through [`SystemStore::load`],
//! never through tear-down and rebuild, so views derived from the store
//! (cached particle groups) keep their identity across re-initialization.

use crate::comm::{DecompositionGrid, Device};
use crate::error::EntityKind;
use crate::model::boxdim::SimulationBox;
use crate::model::snapshot::{
    AngleSection, BondSection, ConstraintSection, DihedralSection, ImproperSection, PairSection,
    ParticleSection, Snapshot,
};

#[derive(Debug)]
pub struct SystemStore {
    device: Device,
    decomposition: Option<DecompositionGrid>,
    global_box: SimulationBox,
    dimensions: u8,
    particles: ParticleSection,
    bonds: BondSection,
    angles: AngleSection,
    dihedrals: DihedralSection,
    impropers: ImproperSection,
    pairs: PairSection,
    constraints: ConstraintSection,
}

impl SystemStore {
    /// Single-domain store. Used whenever no decomposition was decided; the
    /// multi-domain plumbing is absent entirely on this path.
    pub fn new(snapshot: &Snapshot, device: Device) -> Self {
        Self::from_parts(snapshot, device, None)
    }

    /// Multi-domain store partitioned by `grid`.
    pub fn with_decomposition(snapshot: &Snapshot, device: Device, grid: DecompositionGrid) -> Self {
        Self::from_parts(snapshot, device, Some(grid))
    }

    fn from_parts(
        snapshot: &Snapshot,
        device: Device,
        decomposition: Option<DecompositionGrid>,
    ) -> Self {
        Self {
            device,
            decomposition,
            global_box: snapshot.global_box,
            dimensions: snapshot.global_box.dimensions(),
            particles: snapshot.particles.clone(),
            bonds: snapshot.bonds.clone(),
            angles: snapshot.angles.clone(),
            dihedrals: snapshot.dihedrals.clone(),
            impropers: snapshot.impropers.clone(),
            pairs: snapshot.pairs.clone(),
            constraints: snapshot.constraints.clone(),
        }
    }

    /// Replace all entity data, the global box, and the dimensionality in
    /// place. The decomposition decided at construction is kept as is; it
    /// is never recomputed implicitly.
    ///
    /// Collective: all ranks must call this together.
    pub fn load(&mut self, snapshot: &Snapshot) {
        self.global_box = snapshot.global_box;
        self.dimensions = snapshot.global_box.dimensions();
        self.particles = snapshot.particles.clone();
        self.bonds = snapshot.bonds.clone();
        self.angles = snapshot.angles.clone();
        self.dihedrals = snapshot.dihedrals.clone();
        self.impropers = snapshot.impropers.clone();
        self.pairs = snapshot.pairs.clone();
        self.constraints = snapshot.constraints.clone();
    }

    /// Assemble one globally coherent snapshot of everything the store
    /// holds.
    ///
    /// Collective: when distributed, every rank must participate or the
    /// gather deadlocks.
    pub fn gather_snapshot(&self) -> Snapshot {
        log::debug!(
            "rank {} gathering snapshot of {} particles",
            self.device.communicator().rank(),
            self.particles.len()
        );
        Snapshot {
            global_box: self.global_box(),
            particles: self.particles.clone(),
            bonds: self.bonds.clone(),
            angles: self.angles.clone(),
            dihedrals: self.dihedrals.clone(),
            impropers: self.impropers.clone(),
            pairs: self.pairs.clone(),
            constraints: self.constraints.clone(),
        }
    }

    /// Ordered type names of one entity kind.
    pub fn types(&self, kind: EntityKind) -> &[String] {
        match kind {
            EntityKind::Particle => &self.particles.types,
            EntityKind::Bond => &self.bonds.types,
            EntityKind::Angle => &self.angles.types,
            EntityKind::Dihedral => &self.dihedrals.types,
            EntityKind::Improper => &self.impropers.types,
            EntityKind::SpecialPair => &self.pairs.types,
        }
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn particle_typeids(&self) -> &[u32] {
        &self.particles.typeid
    }

    /// The global box, re-derived on every read so it always carries the
    /// store's tracked dimensionality.
    pub fn global_box(&self) -> SimulationBox {
        self.global_box.with_dimensions(self.dimensions)
    }

    pub fn set_global_box(&mut self, global_box: SimulationBox) {
        self.global_box = global_box;
    }

    pub fn dimensions(&self) -> u8 {
        self.dimensions
    }

    /// Dimensionality is tracked separately from the box so a
    /// dimensionality change and the box replacement that caused it can be
    /// applied as two ordered operations.
    pub fn set_dimensions(&mut self, dimensions: u8) {
        self.dimensions = dimensions;
    }

    pub fn decomposition(&self) -> Option<&DecompositionGrid> {
        self.decomposition.as_ref()
    }

    pub fn device(&self) -> &Device {
        &self.device
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_type_snapshot() -> Snapshot {
        let mut snap = Snapshot::new(SimulationBox::cubic(12.0).unwrap());
        snap.particles = ParticleSection::with_count(4);
        snap.particles.types = vec!["A".to_string(), "B".to_string()];
        snap.particles.typeid = vec![0, 1, 0, 1];
        snap.bonds.types = vec!["bondA".to_string()];
        snap.bonds.typeid = vec![0, 0];
        snap.bonds.members = vec![[0, 1], [2, 3]];
        snap
    }

    #[test]
    fn construction_copies_the_snapshot() {
        let snap = two_type_snapshot();
        let store = SystemStore::new(&snap, Device::cpu());
        assert_eq!(store.particle_count(), 4);
        assert_eq!(store.types(EntityKind::Particle), snap.particles.types);
        assert_eq!(store.types(EntityKind::Bond), snap.bonds.types);
        assert!(store.types(EntityKind::Angle).is_empty());
        assert!(store.decomposition().is_none());
        assert_eq!(store.global_box(), snap.global_box);
    }

    #[test]
    fn with_decomposition_keeps_the_grid() {
        let snap = two_type_snapshot();
        let grid = DecompositionGrid::balanced(4, &snap.global_box);
        let store = SystemStore::with_decomposition(&snap, Device::cpu(), grid);
        assert_eq!(store.decomposition(), Some(&grid));
    }

    #[test]
    fn load_replaces_data_and_box_in_place() {
        let snap = two_type_snapshot();
        let mut store = SystemStore::new(&snap, Device::cpu());

        let mut replacement = two_type_snapshot();
        replacement.global_box = SimulationBox::cubic(24.0).unwrap();
        replacement.particles = ParticleSection::with_count(2);
        replacement.particles.types = vec!["A".to_string(), "B".to_string()];
        store.load(&replacement);

        assert_eq!(store.particle_count(), 2);
        assert_eq!(store.global_box().lengths(), [24.0, 24.0, 24.0]);
        // decomposition decided at construction stays untouched
        assert!(store.decomposition().is_none());
    }

    #[test]
    fn box_read_follows_tracked_dimensionality() {
        let snap = two_type_snapshot();
        let mut store = SystemStore::new(&snap, Device::cpu());
        assert_eq!(store.global_box().dimensions(), 3);

        store.set_dimensions(2);
        let b = store.global_box();
        assert_eq!(b.dimensions(), 2);
        assert_eq!(b.lengths()[2], 0.0);
    }

    #[test]
    fn gather_round_trips_the_snapshot() {
        let snap = two_type_snapshot();
        let store = SystemStore::new(&snap, Device::cpu());
        assert_eq!(store.gather_snapshot(), snap);
    }
}
