use std::convert::Infallible;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid box geometry: {0}")]
pub struct InvalidGeometryError(String);

impl From<Infallible> for InvalidGeometryError {
    fn from(x: Infallible) -> Self {
        match x {}
    }
}

/// Orthorhombic or triclinic simulation box.
///
/// Edge lengths `[lx, ly, lz]`, tilt factors `[xy, xz, yz]`, and a
/// dimensionality of 2 or 3. For 2-D boxes the `lz` edge and the `xz`/`yz`
/// tilts carry no meaning and are forced to zero on construction.
///
/// Boxes are plain values. Containers holding a box replace it wholesale;
/// no field-level mutation is exposed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationBox {
    lengths: [f64; 3],
    tilts: [f64; 3],
    dimensions: u8,
}

impl SimulationBox {
    pub fn new(
        lengths: [f64; 3],
        tilts: [f64; 3],
        dimensions: u8,
    ) -> Result<Self, InvalidGeometryError> {
        if dimensions != 2 && dimensions != 3 {
            return Err(InvalidGeometryError(format!(
                "dimensionality must be 2 or 3, got {dimensions}"
            )));
        }
        if lengths.iter().chain(tilts.iter()).any(|v| !v.is_finite()) {
            return Err(InvalidGeometryError(format!(
                "non-finite value in lengths {lengths:?} / tilts {tilts:?}"
            )));
        }
        if lengths[0] <= 0.0 || lengths[1] <= 0.0 {
            return Err(InvalidGeometryError(format!(
                "in-plane edge lengths must be positive, got {lengths:?}"
            )));
        }
        let mut boxdim = Self {
            lengths,
            tilts,
            dimensions,
        };
        if dimensions == 2 {
            boxdim.lengths[2] = 0.0;
            boxdim.tilts[1] = 0.0;
            boxdim.tilts[2] = 0.0;
        } else if lengths[2] <= 0.0 {
            return Err(InvalidGeometryError(format!(
                "3-dimensional box requires a positive z edge, got {lengths:?}"
            )));
        }
        Ok(boxdim)
    }

    /// Cubic 3-D box with edge length `l`.
    pub fn cubic(l: f64) -> Result<Self, InvalidGeometryError> {
        Self::new([l, l, l], [0.0; 3], 3)
    }

    /// Untilted box from edge lengths, inferring dimensionality: a zero `lz`
    /// means a 2-D box.
    pub fn from_lengths(lengths: [f64; 3]) -> Result<Self, InvalidGeometryError> {
        let dimensions = if lengths[2] == 0.0 { 2 } else { 3 };
        Self::new(lengths, [0.0; 3], dimensions)
    }

    pub fn lengths(&self) -> [f64; 3] {
        self.lengths
    }

    pub fn tilts(&self) -> [f64; 3] {
        self.tilts
    }

    pub fn dimensions(&self) -> u8 {
        self.dimensions
    }

    pub fn is_2d(&self) -> bool {
        self.dimensions == 2
    }

    /// Box volume; area for 2-D boxes. Tilt factors do not change the
    /// volume under the row-triangular cell convention.
    pub fn volume(&self) -> f64 {
        let [lx, ly, lz] = self.lengths;
        if self.is_2d() {
            lx * ly
        } else {
            lx * ly * lz
        }
    }

    /// Same geometry with the dimensionality replaced. `dimensions` must
    /// already be validated by the caller.
    pub(crate) fn with_dimensions(mut self, dimensions: u8) -> Self {
        self.dimensions = dimensions;
        if dimensions == 2 {
            self.lengths[2] = 0.0;
            self.tilts[1] = 0.0;
            self.tilts[2] = 0.0;
        }
        self
    }
}

impl TryFrom<[f64; 3]> for SimulationBox {
    type Error = InvalidGeometryError;

    fn try_from(lengths: [f64; 3]) -> Result<Self, Self::Error> {
        Self::from_lengths(lengths)
    }
}

impl TryFrom<[f64; 6]> for SimulationBox {
    type Error = InvalidGeometryError;

    fn try_from(v: [f64; 6]) -> Result<Self, Self::Error> {
        let dimensions = if v[2] == 0.0 { 2 } else { 3 };
        Self::new([v[0], v[1], v[2]], [v[3], v[4], v[5]], dimensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cubic_box_is_three_dimensional() {
        let b = SimulationBox::cubic(10.0).unwrap();
        assert_eq!(b.lengths(), [10.0, 10.0, 10.0]);
        assert_eq!(b.tilts(), [0.0, 0.0, 0.0]);
        assert_eq!(b.dimensions(), 3);
        assert!(!b.is_2d());
        assert_relative_eq!(b.volume(), 1000.0);
    }

    #[test]
    fn two_d_box_zero_forces_out_of_plane_fields() {
        let b = SimulationBox::new([8.0, 6.0, 5.0], [0.5, 0.3, 0.2], 2).unwrap();
        assert_eq!(b.lengths(), [8.0, 6.0, 0.0]);
        assert_eq!(b.tilts(), [0.5, 0.0, 0.0]);
        assert!(b.is_2d());
        assert_relative_eq!(b.volume(), 48.0);
    }

    #[test]
    fn from_lengths_infers_dimensionality() {
        assert_eq!(
            SimulationBox::from_lengths([10.0, 10.0, 0.0])
                .unwrap()
                .dimensions(),
            2
        );
        assert_eq!(
            SimulationBox::from_lengths([10.0, 10.0, 10.0])
                .unwrap()
                .dimensions(),
            3
        );
    }

    #[test]
    fn rejects_bad_dimensionality() {
        let err = SimulationBox::new([1.0, 1.0, 1.0], [0.0; 3], 4).unwrap_err();
        assert!(err.to_string().contains("2 or 3"));
    }

    #[test]
    fn rejects_non_finite_and_non_positive_edges() {
        assert!(SimulationBox::from_lengths([f64::NAN, 1.0, 1.0]).is_err());
        assert!(SimulationBox::from_lengths([f64::INFINITY, 1.0, 1.0]).is_err());
        assert!(SimulationBox::from_lengths([0.0, 1.0, 1.0]).is_err());
        assert!(SimulationBox::from_lengths([1.0, -1.0, 1.0]).is_err());
    }

    #[test]
    fn converts_from_six_element_representation() {
        let b = SimulationBox::try_from([20.0, 20.0, 20.0, 0.1, 0.2, 0.3]).unwrap();
        assert_eq!(b.dimensions(), 3);
        assert_eq!(b.tilts(), [0.1, 0.2, 0.3]);

        let flat = SimulationBox::try_from([20.0, 20.0, 0.0, 0.1, 0.0, 0.0]).unwrap();
        assert_eq!(flat.dimensions(), 2);
    }
}
