//! The state controller owning the authoritative simulation data.
//!
//! [`State`] composes the authoritative data store, the global box, the
//! domain decomposition, and the particle-group cache behind one mutation
//! boundary: nothing else in the process writes to the store or the cache.
//!
//! # Collective operations
//!
//! Constructing a state, gathering a snapshot, replacing a snapshot, and
//! replacing the box are collective: in a distributed run, every rank must
//! perform the call together or the operation deadlocks. This is a caller
//! contract; it is not guarded against internally. Type queries, group
//! retrieval, and DOF updates are rank-local.

mod filter;
mod group;

pub use filter::{AllFilter, FilterKey, ParticleFilter, TagFilter, TypeFilter};
pub use group::{GroupHandle, Integrator, ParticleGroup};

use group::GroupCache;

use crate::comm::{decide_decomposition, DecompositionGrid, Device};
use crate::error::{EntityKind, Error};
use crate::model::boxdim::{InvalidGeometryError, SimulationBox};
use crate::model::snapshot::Snapshot;
use crate::store::SystemStore;

/// All six ordered type-name lists in one structure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeNames {
    pub particle: Vec<String>,
    pub bond: Vec<String>,
    pub angle: Vec<String>,
    pub dihedral: Vec<String>,
    pub improper: Vec<String>,
    pub special_pair: Vec<String>,
}

/// Simulation state controller.
///
/// Owns the authoritative data store and the group cache; holds the
/// execution device through the store. See the [module docs](self) for the
/// collective-operation contract.
#[derive(Debug)]
pub struct State {
    store: SystemStore,
    groups: GroupCache,
}

impl State {
    /// Build a state from a snapshot.
    ///
    /// The snapshot's box is first broadcast from rank 0 so decomposition
    /// runs against a single agreed global geometry, then the domain
    /// decomposition is decided once, and the data store is constructed
    /// with or without it. Construction either completes in full or fails
    /// without leaving partial state behind. Collective.
    pub fn new(device: Device, mut snapshot: Snapshot) -> Result<Self, Error> {
        snapshot.global_box = device.communicator().broadcast_box(snapshot.global_box);
        let decomposition = decide_decomposition(&device, &snapshot.global_box)?;
        let store = match decomposition {
            Some(grid) => SystemStore::with_decomposition(&snapshot, device, grid),
            None => SystemStore::new(&snapshot, device),
        };
        Ok(Self {
            store,
            groups: GroupCache::new(),
        })
    }

    /// Gather a complete, globally coherent snapshot. Collective.
    pub fn snapshot(&self) -> Snapshot {
        self.store.gather_snapshot()
    }

    /// Re-initialize the state from `snapshot`, replacing all particle and
    /// topology data and the global box in place.
    ///
    /// The number of types of every entity kind must match the current
    /// state; on mismatch the first offending kind is reported and nothing
    /// is mutated. The check runs identically on every rank, so all ranks
    /// observe the same outcome before any rank touches shared state.
    ///
    /// Replacing the snapshot mid-run can invalidate per-type quantities
    /// cached by collaborators (group DOF, cutoff-dependent neighbor data)
    /// unless the snapshot describes a state prior to the running one;
    /// re-initialize between simulation steps, not from a mid-step
    /// callback. Collective.
    pub fn set_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), Error> {
        for kind in EntityKind::ALL {
            if snapshot.types(kind).len() != self.store.types(kind).len() {
                return Err(Error::TypeCountMismatch(kind));
            }
        }
        self.store.load(snapshot);
        Ok(())
    }

    pub fn particle_types(&self) -> &[String] {
        self.store.types(EntityKind::Particle)
    }

    pub fn bond_types(&self) -> &[String] {
        self.store.types(EntityKind::Bond)
    }

    pub fn angle_types(&self) -> &[String] {
        self.store.types(EntityKind::Angle)
    }

    pub fn dihedral_types(&self) -> &[String] {
        self.store.types(EntityKind::Dihedral)
    }

    pub fn improper_types(&self) -> &[String] {
        self.store.types(EntityKind::Improper)
    }

    pub fn special_pair_types(&self) -> &[String] {
        self.store.types(EntityKind::SpecialPair)
    }

    /// All six type-name lists at once.
    pub fn types(&self) -> TypeNames {
        TypeNames {
            particle: self.particle_types().to_vec(),
            bond: self.bond_types().to_vec(),
            angle: self.angle_types().to_vec(),
            dihedral: self.dihedral_types().to_vec(),
            improper: self.improper_types().to_vec(),
            special_pair: self.special_pair_types().to_vec(),
        }
    }

    /// Value copy of the global box, re-derived from the store on every
    /// read.
    pub fn global_box(&self) -> SimulationBox {
        self.store.global_box()
    }

    /// Replace the global box.
    ///
    /// The input is coerced into a [`SimulationBox`] first; inputs that do
    /// not describe a valid geometry fail with
    /// [`Error::InvalidGeometry`]. A dimensionality change is applied to
    /// the store before the new box is installed and emits a non-fatal
    /// warning. Collective.
    pub fn set_global_box<B>(&mut self, value: B) -> Result<(), Error>
    where
        B: TryInto<SimulationBox>,
        B::Error: Into<InvalidGeometryError>,
    {
        let new_box = value
            .try_into()
            .map_err(|e| Error::InvalidGeometry(e.into()))?;
        let current = self.store.dimensions();
        if new_box.dimensions() != current {
            log::warn!(
                "box changing dimensionality from {} to {}",
                current,
                new_box.dimensions()
            );
            self.store.set_dimensions(new_box.dimensions());
        }
        self.store.set_global_box(new_box);
        Ok(())
    }

    /// Cached group for `filter`, created on first request.
    ///
    /// Equal filters of the same kind return the identical cached group.
    /// Membership is evaluated once at creation and not refreshed when the
    /// particle data changes afterwards.
    pub fn get_group(&mut self, filter: &dyn ParticleFilter) -> GroupHandle {
        self.groups.get_or_create(filter, &self.store)
    }

    /// Refresh the DOF counters of every cached group.
    ///
    /// With an integrator attached each group receives exactly what the
    /// integrator reports for it; with none attached both counters are
    /// forced to zero. The owning simulation calls this whenever an
    /// integrator becomes attached; calling it manually at any time forces
    /// a refresh.
    pub fn update_group_dof(&self, integrator: Option<&dyn Integrator>) {
        for handle in self.groups.handles() {
            match integrator {
                Some(integrator) => {
                    let (translational, rotational) = integrator.recompute_dof(&handle.borrow());
                    let mut group = handle.borrow_mut();
                    group.set_translational_dof(translational);
                    group.set_rotational_dof(rotational);
                }
                None => {
                    let mut group = handle.borrow_mut();
                    group.set_translational_dof(0);
                    group.set_rotational_dof(0);
                }
            }
        }
    }

    /// Tile the box and duplicate its contents. Reserved; fails loudly
    /// instead of silently doing nothing.
    pub fn replicate(&mut self, _nx: usize, _ny: usize, _nz: usize) -> Result<(), Error> {
        Err(Error::NotImplemented("replicate"))
    }

    /// Uniformly rescale the system. Reserved; fails loudly instead of
    /// silently doing nothing.
    pub fn scale_system(&mut self, _factor: f64) -> Result<(), Error> {
        Err(Error::NotImplemented("scale_system"))
    }

    pub fn device(&self) -> &Device {
        self.store.device()
    }

    pub fn decomposition(&self) -> Option<&DecompositionGrid> {
        self.store.decomposition()
    }
}
