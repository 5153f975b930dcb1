//! Elastic moduli, first moment about the neutral axis and the section
//! stiffness matrix.

use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

use super::{section_moments, AreaMoments, SectionProperties};
use crate::error::{CsfError, CsfResult};
use crate::geom2::{clip_above, Section};

/// Elastic section moduli `W = I / c_max`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectionModuli {
    #[serde(rename = "Wx")]
    pub wx: f64,
    #[serde(rename = "Wy")]
    pub wy: f64,
    /// Extreme fibre distance from the centroidal x-axis.
    pub c_y: f64,
    /// Extreme fibre distance from the centroidal y-axis.
    pub c_x: f64,
}

/// `Wx = Ix / max|y − Cy|`, `Wy = Iy / max|x − Cx|` over the vertices of all
/// polygons with a non-zero weight.
pub fn section_moduli(section: &Section, props: &SectionProperties) -> CsfResult<SectionModuli> {
    let mut c_x: f64 = 0.0;
    let mut c_y: f64 = 0.0;
    for p in section.polygons().iter().filter(|p| p.weight() != 0.0) {
        for v in p.vertices() {
            c_x = c_x.max((v.x - props.cx).abs());
            c_y = c_y.max((v.y - props.cy).abs());
        }
    }
    let eps = section.tolerances().eps_lin;
    if c_x <= eps || c_y <= eps {
        return Err(CsfError::DegenerateSection(format!(
            "extreme fibre distance vanishes at z = {}",
            section.z()
        )));
    }
    Ok(SectionModuli {
        wx: props.ix / c_y,
        wy: props.iy / c_x,
        c_y,
        c_x,
    })
}

/// First moment of the weighted area above `y = Cy` about that axis
/// (the shear-flow `Q` at the neutral axis).
pub fn first_moment_na(section: &Section, props: &SectionProperties) -> f64 {
    section
        .polygons()
        .iter()
        .map(|p| {
            let upper = clip_above(p.vertices(), props.cy);
            if upper.len() < 3 {
                return 0.0;
            }
            let m = AreaMoments::of_loop(&upper);
            p.weight() * (m.sx - props.cy * m.a)
        })
        .sum()
}

/// Generalized axial/bending stiffness about the reference origin.
///
/// With strain `ε(x, y) = ε0 + κx·y − κy·x`, `[N, Mx, My] = K · [ε0, κx, κy]`
/// and `K = E·[[A, Sx, −Sy], [Sx, Ixx, −Ixy], [−Sy, −Ixy, Iyy]]` (origin
/// moments, weights included).
pub fn section_stiffness_matrix(section: &Section, e_ref: f64) -> CsfResult<Matrix3<f64>> {
    if !e_ref.is_finite() {
        return Err(CsfError::InvalidConfig(format!(
            "reference modulus must be finite, got {e_ref}"
        )));
    }
    let m = section_moments(section);
    Ok(Matrix3::new(
        m.a, m.sx, -m.sy,
        m.sx, m.ixx, -m.ixy,
        -m.sy, -m.ixy, m.iyy,
    ) * e_ref)
}
