//! A pure Rust library for managing the authoritative state of particle-based
//! simulations that may execute across multiple cooperating compute ranks.
//! It owns the canonical description of all simulated entities (particles and
//! their bonded topology), the simulation box geometry, the partitioning of
//! that box across ranks, and cached particle groups derived from selection
//! filters.
//!
//! # Features
//!
//! - **Snapshot lifecycle** — Construct and re-initialize state from a
//!   complete point-in-time capture, with cross-kind type-count validation
//! - **Domain decomposition** — Automatic single-domain vs. multi-domain
//!   decision from the rank count and global box geometry
//! - **Box management** — Wholesale box replacement with dimensionality
//!   change handling
//! - **Group caching** — Particle groups memoized by filter value, with DOF
//!   counters synchronized against an external integrator
//!
//! # Quick Start
//!
//! The main entry point is [`State`], built from a [`Device`] and a
//! [`Snapshot`]:
//!
//! ```
//! use simstate::{AllFilter, Device, ParticleSection, SimulationBox, Snapshot, State};
//!
//! // Three particles of one type in a cubic box
//! let mut snapshot = Snapshot::new(SimulationBox::cubic(20.0)?);
//! snapshot.particles = ParticleSection::with_count(3);
//! snapshot.particles.types = vec!["A".to_string()];
//!
//! let mut state = State::new(Device::cpu(), snapshot)?;
//! assert_eq!(state.particle_types().len(), 1);
//! assert_eq!(state.particle_types()[0], "A");
//! assert_eq!(state.global_box().dimensions(), 3);
//!
//! // Groups are cached by filter value and start with zero DOF
//! let group = state.get_group(&AllFilter);
//! assert_eq!(group.borrow().members(), &[0, 1, 2]);
//! assert_eq!(group.borrow().translational_dof(), 0);
//! # Ok::<(), simstate::Error>(())
//! ```
//!
//! # Module Organization
//!
//! - [`comm`] — Communicator capability, execution device, and the domain
//!   decomposition factory
//!
//! # Data Types
//!
//! ## State & Store
//!
//! - [`State`] — Top-level state controller
//! - [`SystemStore`] — Authoritative data store owned by the controller
//! - [`TypeNames`] — All six type-name lists bundled
//!
//! ## Snapshots & Geometry
//!
//! - [`Snapshot`] — Complete serializable capture of particles, topology,
//!   and box
//! - [`ParticleSection`], [`BondSection`], [`AngleSection`],
//!   [`DihedralSection`], [`ImproperSection`], [`PairSection`],
//!   [`ConstraintSection`] — Per-kind snapshot payloads
//! - [`SimulationBox`] — Orthorhombic/triclinic box with dimensionality
//!
//! ## Groups & Filters
//!
//! - [`ParticleFilter`] — Value-comparable selection predicate
//! - [`AllFilter`], [`TypeFilter`], [`TagFilter`] — Provided filters
//! - [`ParticleGroup`], [`GroupHandle`] — Cached derived views
//! - [`Integrator`] — Capability queried during DOF updates
//!
//! ## Errors
//!
//! - [`Error`] — Validation, configuration, and reserved-operation failures
//! - [`EntityKind`] — The six type-carrying entity kinds

mod error;
mod model;
mod state;
mod store;

pub mod comm;

pub use comm::{
    decide_decomposition, Communicator, DecompositionGrid, Device, DeviceKind, LocalCommunicator,
};
pub use error::{EntityKind, Error};
pub use model::boxdim::{InvalidGeometryError, SimulationBox};
pub use model::snapshot::{
    AngleSection, BondSection, ConstraintSection, DihedralSection, ImproperSection, PairSection,
    ParticleSection, Snapshot,
};
pub use state::{
    AllFilter, FilterKey, GroupHandle, Integrator, ParticleFilter, ParticleGroup, State, TagFilter,
    TypeFilter, TypeNames,
};
pub use store::SystemStore;
