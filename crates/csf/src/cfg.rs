//! Tolerances and solver configuration.
//!
//! Policy
//! - Every geometric threshold derives from one characteristic length `L`
//!   fixed when a field (or a standalone section analysis) starts, so
//!   thresholds scale with model size instead of being absolute constants.
//! - Solver knobs are plain `Copy` structs with `Default`; `validate()` is
//!   called by the solver before any work happens.

use serde::{Deserialize, Serialize};

use crate::error::{CsfError, CsfResult};

/// Relative factor for the linear tolerance: `eps_lin = REL_LIN * L`.
pub const REL_LIN: f64 = 1e-9;
/// Relative factor for the area tolerance: `eps_area = REL_AREA * L²`.
pub const REL_AREA: f64 = 1e-12;
/// Relative Mohr radius under which principal axes are treated as isotropic.
pub const ISOTROPY_RTOL: f64 = 1e-9;

/// Geometric tolerances derived from a characteristic length scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tolerances {
    pub length_scale: f64,
    pub eps_lin: f64,
    pub eps_area: f64,
}

impl Tolerances {
    /// Tolerances for a characteristic length `l`. Non-finite or non-positive
    /// lengths fall back to `l = 1`.
    pub fn from_length_scale(l: f64) -> Self {
        let l = if l.is_finite() && l > 0.0 { l } else { 1.0 };
        Self {
            length_scale: l,
            eps_lin: REL_LIN * l,
            eps_area: REL_AREA * l * l,
        }
    }

    /// `L = max(width, height, member_length)`.
    pub fn from_extent(width: f64, height: f64, member_length: f64) -> Self {
        Self::from_length_scale(width.max(height).max(member_length.abs()))
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self::from_length_scale(1.0)
    }
}

/// Grid Poisson/SOR torsion solver settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SorCfg {
    /// Cells across the longer bounding-box side.
    pub cells_long: usize,
    /// Minimum cells across the shorter side (refines `h` for slender shapes).
    pub cells_short_min: usize,
    /// Zero-valued padding cells around the bounding box.
    pub pad_cells: usize,
    /// Over-relaxation factor in (0, 2). `None` picks the optimal factor for
    /// the grid's larger dimension.
    pub omega: Option<f64>,
    /// Convergence: max nodal update ≤ `tol · max|ψ|`.
    pub tol: f64,
    pub max_iter: usize,
    /// Hard cap on grid nodes; larger grids are rejected.
    pub max_nodes: usize,
}

impl Default for SorCfg {
    fn default() -> Self {
        Self {
            cells_long: 100,
            cells_short_min: 20,
            pad_cells: 2,
            omega: None,
            tol: 1e-7,
            max_iter: 20_000,
            max_nodes: 1_000_000,
        }
    }
}

impl SorCfg {
    pub fn validate(&self) -> CsfResult<()> {
        if self.cells_long < 2 || self.cells_short_min < 1 {
            return Err(CsfError::InvalidConfig(
                "SOR grid needs cells_long >= 2 and cells_short_min >= 1".into(),
            ));
        }
        if let Some(w) = self.omega {
            if !(w > 0.0 && w < 2.0) {
                return Err(CsfError::InvalidConfig(format!(
                    "SOR omega must lie in (0, 2), got {w}"
                )));
            }
        }
        if !(self.tol.is_finite() && self.tol > 0.0) {
            return Err(CsfError::InvalidConfig(format!(
                "SOR tolerance must be > 0, got {}",
                self.tol
            )));
        }
        if self.max_iter == 0 || self.max_nodes == 0 {
            return Err(CsfError::InvalidConfig(
                "SOR max_iter and max_nodes must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Settings for `section_full_analysis`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisCfg {
    /// Scaled-polar factor; `None` uses the rectangle-equivalent heuristic.
    pub alpha: Option<f64>,
    /// Grid solver settings; `None` skips estimator E.
    pub sor: Option<SorCfg>,
    /// Relative tolerance of the closed-cell area consistency warning.
    pub cell_area_rtol: f64,
}

impl Default for AnalysisCfg {
    fn default() -> Self {
        Self {
            alpha: None,
            sor: Some(SorCfg::default()),
            cell_area_rtol: 1e-3,
        }
    }
}
