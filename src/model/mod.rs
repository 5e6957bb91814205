//! Core data structures representing simulation state.
//!
//! This module provides the value types that flow through `simstate`:
//!
//! - [`boxdim`] – Simulation box geometry with edge lengths, tilt factors,
//!   and dimensionality.
//! - [`snapshot`] – Complete point-in-time capture of particles, bonded
//!   topology, and the global box.

pub mod boxdim;
pub mod snapshot;
