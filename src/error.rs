//! Error types for simulation state management.
//!
//! This module defines the error type surfaced by the [`State`](crate::State)
//! controller and its collaborators. Errors are categorized by source:
//! snapshot validation, box geometry conversion, distributed-backend
//! configuration, and reserved operations.

use std::fmt;

use thiserror::Error;

use crate::model::boxdim::InvalidGeometryError;

/// The six entity kinds carrying an ordered type-name list.
///
/// The order of [`EntityKind::ALL`] is the order in which snapshot
/// re-initialization validates type counts, so the first offending kind is
/// the one reported on mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Particle,
    Bond,
    Angle,
    Dihedral,
    Improper,
    SpecialPair,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Particle,
        EntityKind::Bond,
        EntityKind::Angle,
        EntityKind::Dihedral,
        EntityKind::Improper,
        EntityKind::SpecialPair,
    ];
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Particle => write!(f, "particle"),
            EntityKind::Bond => write!(f, "bond"),
            EntityKind::Angle => write!(f, "angle"),
            EntityKind::Dihedral => write!(f, "dihedral"),
            EntityKind::Improper => write!(f, "improper"),
            EntityKind::SpecialPair => write!(f, "special pair"),
        }
    }
}

/// Errors that can occur while constructing or mutating simulation state.
#[derive(Debug, Error)]
pub enum Error {
    /// A replacement snapshot declares a different number of types for one
    /// of the entity kinds.
    ///
    /// Per-type quantities held by collaborators are indexed by type id, so
    /// the number of types of every kind must remain the same across
    /// re-initialization. No state is mutated when this is returned.
    #[error("number of {0} types must remain the same across re-initialization")]
    TypeCountMismatch(EntityKind),

    /// An input could not be coerced into a valid box geometry.
    #[error(transparent)]
    InvalidGeometry(#[from] InvalidGeometryError),

    /// The distributed backend reported itself available but could not be
    /// queried. Fatal: the collective operation cannot proceed consistently
    /// on all ranks.
    #[error("distributed backend error: {0}")]
    DistributedBackend(String),

    /// The operation is reserved for a future extension.
    #[error("'{0}' is reserved for a future extension and is not implemented")]
    NotImplemented(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_message_names_the_kind() {
        let err = Error::TypeCountMismatch(EntityKind::SpecialPair);
        assert_eq!(
            err.to_string(),
            "number of special pair types must remain the same across re-initialization"
        );
    }

    #[test]
    fn validation_order_starts_with_particles() {
        assert_eq!(EntityKind::ALL[0], EntityKind::Particle);
        assert_eq!(EntityKind::ALL.len(), 6);
    }
}
