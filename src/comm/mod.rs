//! Communication and execution-context boundary.
//!
//! Simulation state is rank-parallel: every rank runs the same control flow
//! over its partition of the data and coordinates only at collective points.
//! This module defines the [`Communicator`] capability the state layer
//! queries at those points, the single-process [`LocalCommunicator`], and
//! the opaque [`Device`] execution handle that bundles a communicator with
//! the compute backend kind.

mod decomposition;

pub use decomposition::{decide_decomposition, DecompositionGrid};

use std::fmt;
use std::rc::Rc;

use crate::error::Error;
use crate::model::boxdim::SimulationBox;

/// Rank-level view of the communication layer.
///
/// Implementations wrap a distributed backend (or the absence of one).
/// `num_ranks` fails with [`Error::DistributedBackend`] when the backend
/// reports itself available but cannot be queried; that failure is fatal to
/// any collective operation in flight.
pub trait Communicator {
    /// Whether a distributed backend is compiled in and initialized.
    fn backend_available(&self) -> bool;

    fn num_ranks(&self) -> Result<usize, Error>;

    fn rank(&self) -> usize;

    /// Broadcast a box from rank 0 so every rank agrees on one global
    /// geometry. Identity on a single rank.
    fn broadcast_box(&self, global_box: SimulationBox) -> SimulationBox;
}

/// Single-process communicator: one rank, no distributed backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalCommunicator;

impl Communicator for LocalCommunicator {
    fn backend_available(&self) -> bool {
        false
    }

    fn num_ranks(&self) -> Result<usize, Error> {
        Ok(1)
    }

    fn rank(&self) -> usize {
        0
    }

    fn broadcast_box(&self, global_box: SimulationBox) -> SimulationBox {
        global_box
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Cpu,
    Gpu,
}

/// Opaque execution handle: compute backend kind plus the communicator.
///
/// Cheap to clone; every holder shares the same communicator.
#[derive(Clone)]
pub struct Device {
    kind: DeviceKind,
    comm: Rc<dyn Communicator>,
}

impl Device {
    /// CPU execution in a single process.
    pub fn cpu() -> Self {
        Self {
            kind: DeviceKind::Cpu,
            comm: Rc::new(LocalCommunicator),
        }
    }

    pub fn with_communicator(kind: DeviceKind, comm: Rc<dyn Communicator>) -> Self {
        Self { kind, comm }
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn communicator(&self) -> &dyn Communicator {
        self.comm.as_ref()
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("kind", &self.kind)
            .field("rank", &self.comm.rank())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_communicator_is_a_single_rank() {
        let comm = LocalCommunicator;
        assert!(!comm.backend_available());
        assert_eq!(comm.num_ranks().unwrap(), 1);
        assert_eq!(comm.rank(), 0);
    }

    #[test]
    fn local_broadcast_is_identity() {
        let b = SimulationBox::cubic(5.0).unwrap();
        assert_eq!(LocalCommunicator.broadcast_box(b), b);
    }

    #[test]
    fn cpu_device_uses_the_local_communicator() {
        let device = Device::cpu();
        assert_eq!(device.kind(), DeviceKind::Cpu);
        assert!(!device.communicator().backend_available());
    }
}
