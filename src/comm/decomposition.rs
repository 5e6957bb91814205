use super::Device;
use crate::error::Error;
use crate::model::boxdim::SimulationBox;

/// Spatial split of the global box into `nx * ny * nz` rank-local domains.
///
/// A grid exists only for multi-rank execution; single-rank runs carry no
/// decomposition at all (`Option::None` throughout the state layer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecompositionGrid {
    nx: u32,
    ny: u32,
    nz: u32,
}

impl DecompositionGrid {
    /// Default split of `global_box` across `num_ranks` domains.
    ///
    /// Enumerates every factorization `nx * ny * nz == num_ranks` (forcing
    /// `nz == 1` for 2-D boxes) and keeps the one with the smallest total
    /// cut-plane area, so long boxes are split along their long axes first.
    /// Ties resolve to the lexicographically smallest `(nx, ny, nz)`. The
    /// choice affects communication volume, not correctness.
    pub fn balanced(num_ranks: usize, global_box: &SimulationBox) -> Self {
        let n = num_ranks.max(1) as u32;
        let [lx, ly, lz] = global_box.lengths();
        let two_d = global_box.is_2d();
        // 2-D boxes have lz == 0; rank cuts there by edge length instead.
        let lz_cost = if two_d { 1.0 } else { lz };

        let mut best = Self { nx: n, ny: 1, nz: 1 };
        let mut best_area = f64::INFINITY;
        for nx in 1..=n {
            if n % nx != 0 {
                continue;
            }
            let rest = n / nx;
            for ny in 1..=rest {
                if rest % ny != 0 {
                    continue;
                }
                let nz = rest / ny;
                if two_d && nz != 1 {
                    continue;
                }
                let cut_area = (nx - 1) as f64 * ly * lz_cost
                    + (ny - 1) as f64 * lx * lz_cost
                    + (nz - 1) as f64 * lx * ly;
                if cut_area < best_area {
                    best = Self { nx, ny, nz };
                    best_area = cut_area;
                }
            }
        }
        best
    }

    pub fn dims(&self) -> (u32, u32, u32) {
        (self.nx, self.ny, self.nz)
    }

    pub fn domain_count(&self) -> u32 {
        self.nx * self.ny * self.nz
    }
}

/// Decide whether the global box gets partitioned across ranks.
///
/// Returns `None` when there is nothing to distribute: no backend, or a
/// single rank (single-domain execution skips the multi-domain code paths
/// entirely). A backend that is available but cannot report its rank count
/// is a fatal configuration error, never a silent fall back to `None`.
pub fn decide_decomposition(
    device: &Device,
    global_box: &SimulationBox,
) -> Result<Option<DecompositionGrid>, Error> {
    let comm = device.communicator();
    if !comm.backend_available() {
        return Ok(None);
    }
    let ranks = comm.num_ranks()?;
    // one rank keeps the optimized single-domain code paths
    if ranks == 1 {
        return Ok(None);
    }
    let grid = DecompositionGrid::balanced(ranks, global_box);
    let (nx, ny, nz) = grid.dims();
    log::debug!("splitting global box into {nx}x{ny}x{nz} domains across {ranks} ranks");
    Ok(Some(grid))
}
