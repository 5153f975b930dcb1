//! Torsion-constant estimators.
//!
//! Purpose
//! - Several independent models of the Saint-Venant constant `J`, each exact
//!   for some family of shapes and rough elsewhere. Reporting them side by
//!   side lets the caller judge the spread instead of trusting one number.
//!
//! Estimators
//! - A `polar`: `alpha·(Ix + Iy)` with a heuristic `alpha`.
//! - B `roark`: equivalent solid rectangle of the aggregated section.
//! - C `wall`: open thin walls, `Σ A·t²/3`.
//! - D `cell`: closed single cell from a slit loop, Bredt–Batho.
//! - E `poisson`: Prandtl stress function on a grid (SOR).
//!
//! References
//! - Roark's Formulas for Stress and Strain, table 10.7 (rectangle factor).
//! - Timoshenko & Goodier, Theory of Elasticity, ch. 10 (membrane analogy).

pub mod cell;
pub mod poisson;
pub mod polar;
pub mod roark;
pub mod wall;

use serde::{Deserialize, Serialize};

use crate::cfg::AnalysisCfg;
use crate::error::CsfResult;
use crate::geom2::Section;
use crate::props::{DerivedProperties, SectionProperties};

pub use cell::{closed_cell_polygon_j, closed_cell_torsion, split_slit_loop, CellLoops, CellTorsion};
pub use poisson::{optimal_omega, poisson_torsion, poisson_torsion_section, PoissonTorsion, SectionPoisson};
pub use polar::{alpha_from_k_torsion, alpha_rectangle_equivalent, k_torsion_saint_venant, scaled_polar};
pub use roark::{roark_beta, roark_equivalent_rectangle, roark_from_properties, RoarkTorsion};
pub use wall::{open_wall_torsion, wall_polygon_j, wall_thickness};

/// All torsion estimates of one section.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TorsionReport {
    /// Polar factor actually used by estimator A.
    pub alpha: f64,
    pub j_polar: f64,
    pub j_roark: f64,
    pub roark_aspect: f64,
    pub roark_fidelity: f64,
    pub j_wall: f64,
    pub j_cell: f64,
    /// `None` when the grid solver is disabled or the section has no solid
    /// polygon with non-zero weight to solve.
    pub j_poisson: Option<f64>,
    pub poisson_converged: Option<bool>,
}

/// Run estimators A–E on `section`.
///
/// `props`/`derived` must belong to `section`; they are taken as arguments so
/// the full analysis computes them once.
pub fn torsion_ensemble(
    section: &Section,
    props: &SectionProperties,
    derived: &DerivedProperties,
    cfg: &AnalysisCfg,
) -> CsfResult<TorsionReport> {
    let alpha = match cfg.alpha {
        Some(a) => a,
        None => alpha_rectangle_equivalent(derived.i1, derived.i2)?,
    };
    let roark = roark_from_properties(props)?;
    let poisson = cfg
        .sor
        .map(|sor| poisson_torsion_section(section, &sor))
        .transpose()?
        .filter(|p| p.solved > 0);
    Ok(TorsionReport {
        alpha,
        j_polar: scaled_polar(props, alpha),
        j_roark: roark.j,
        roark_aspect: roark.aspect,
        roark_fidelity: roark.fidelity,
        j_wall: open_wall_torsion(section),
        j_cell: closed_cell_torsion(section, cfg.cell_area_rtol)?,
        j_poisson: poisson.map(|p| p.j),
        poisson_converged: poisson.map(|p| p.converged),
    })
}
