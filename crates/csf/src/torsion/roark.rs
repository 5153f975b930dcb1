//! Estimator B: equivalent solid rectangle (Roark).
//!
//! The mapping is non-linear in the inertia, so it runs once on the
//! aggregated section: summing per-polygon results would make the answer
//! depend on how a shape was split into polygons.

use serde::{Deserialize, Serialize};

use crate::error::{CsfError, CsfResult};
use crate::geom2::Section;
use crate::props::{principal_moments, section_properties, SectionProperties};

/// Equivalent-rectangle torsion estimate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoarkTorsion {
    pub j: f64,
    /// Long side.
    pub a: f64,
    /// Short side.
    pub b: f64,
    /// `a / b >= 1`.
    pub aspect: f64,
    /// Agreement in (0, 1] between the rectangle's major inertia `A·a²/12`
    /// and the section's `I1`; 1 means the section behaves like the rectangle
    /// about both principal axes.
    pub fidelity: f64,
}

/// Roark's shape factor `β(r) = 1/3 − 0.21·r·(1 − r⁴/12)`, `r = b/a ∈ (0, 1]`.
#[inline]
pub fn roark_beta(r: f64) -> f64 {
    1.0 / 3.0 - 0.21 * r * (1.0 - r.powi(4) / 12.0)
}

/// Roark estimate from aggregated properties.
pub fn roark_from_properties(props: &SectionProperties) -> CsfResult<RoarkTorsion> {
    let (i1, i_min, _) = principal_moments(props.ix, props.iy, props.ixy);
    let area = props.a;
    if !(area > 0.0 && i_min > 0.0 && i1.is_finite()) {
        return Err(CsfError::DegenerateSection(format!(
            "equivalent rectangle needs A > 0 and I_min > 0 (A = {area:e}, I_min = {i_min:e})"
        )));
    }
    let t = (12.0 * i_min / area).sqrt();
    let other = area / t;
    let (a, b) = if other >= t { (other, t) } else { (t, other) };
    let r = b / a;
    let j = roark_beta(r) * a * b.powi(3);
    let i1_rect = area * a * a / 12.0;
    let fidelity = (i1_rect / i1).min(i1 / i1_rect);
    Ok(RoarkTorsion {
        j,
        a,
        b,
        aspect: a / b,
        fidelity,
    })
}

/// Roark estimate of a whole section (aggregates all polygons first).
pub fn roark_equivalent_rectangle(section: &Section) -> CsfResult<RoarkTorsion> {
    roark_from_properties(&section_properties(section)?)
}
