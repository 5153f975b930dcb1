//! Integral property engine.
//!
//! Purpose
//! - Weighted area, centroid and second moments of a `Section`, principal
//!   values and radii of gyration, plus the merged full analysis that carries
//!   the torsion ensemble.
//!
//! Conventions
//! - `Ix = ∫(y − Cy)² dA`, `Iy = ∫(x − Cx)² dA`, `Ixy = ∫(x − Cx)(y − Cy) dA`.
//! - Each polygon contributes `weight × (its signed integrals)`. Weights on
//!   field sections are relative to the immediate container, so nested voids
//!   and material layers are plain sums; no boolean geometry is involved.
//! - `J` in `SectionProperties` is the centroidal polar moment `Ix + Iy`.

mod moments;
pub mod modulus;

use serde::{Deserialize, Serialize};

use crate::cfg::{AnalysisCfg, ISOTROPY_RTOL};
use crate::error::{CsfError, CsfResult};
use crate::geom2::Section;
use crate::torsion::{k_torsion_saint_venant, torsion_ensemble, TorsionReport};

pub use moments::AreaMoments;
pub use modulus::{first_moment_na, section_moduli, section_stiffness_matrix, SectionModuli};

/// Area, centroid and centroidal second moments of a section.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectionProperties {
    #[serde(rename = "A")]
    pub a: f64,
    #[serde(rename = "Cx")]
    pub cx: f64,
    #[serde(rename = "Cy")]
    pub cy: f64,
    #[serde(rename = "Ix")]
    pub ix: f64,
    #[serde(rename = "Iy")]
    pub iy: f64,
    #[serde(rename = "Ixy")]
    pub ixy: f64,
    /// Polar moment `Ix + Iy`.
    #[serde(rename = "J")]
    pub j: f64,
}

/// Principal moments, principal angle and radii of gyration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DerivedProperties {
    #[serde(rename = "I1")]
    pub i1: f64,
    #[serde(rename = "I2")]
    pub i2: f64,
    /// Angle (radians, CCW from +x) of the `I1` axis.
    pub theta: f64,
    pub rx: f64,
    pub ry: f64,
}

/// Weighted moments about the origin, summed over all polygons.
pub fn section_moments(section: &Section) -> AreaMoments {
    section
        .polygons()
        .iter()
        .fold(AreaMoments::default(), |acc, p| {
            acc + AreaMoments::of_loop(p.vertices()).scaled(p.weight())
        })
}

/// Area, centroid, centroidal inertia and polar moment of `section`.
///
/// Fails when the weighted area magnitude is below the area tolerance of the
/// section's own extent.
pub fn section_properties(section: &Section) -> CsfResult<SectionProperties> {
    let m = section_moments(section);
    let tol = section.tolerances();
    if !m.a.is_finite() || m.a.abs() < tol.eps_area {
        return Err(CsfError::DegenerateSection(format!(
            "weighted area {:e} at z = {} is below tolerance {:e}",
            m.a,
            section.z(),
            tol.eps_area
        )));
    }
    let c = m.centroid();
    let (ix, iy, ixy) = m.centroidal();
    Ok(SectionProperties {
        a: m.a,
        cx: c.x,
        cy: c.y,
        ix,
        iy,
        ixy,
        j: ix + iy,
    })
}

/// Closed-form principal decomposition of the 2×2 inertia tensor.
///
/// Returns `(I1, I2, theta)` with `I1 >= I2`; `theta` is forced to zero when
/// the Mohr radius is negligible against the mean (isotropic sections).
pub fn principal_moments(ix: f64, iy: f64, ixy: f64) -> (f64, f64, f64) {
    let avg = 0.5 * (ix + iy);
    let half_diff = 0.5 * (ix - iy);
    let radius = half_diff.hypot(ixy);
    let theta = if radius <= ISOTROPY_RTOL * avg.abs() {
        0.0
    } else {
        0.5 * (-ixy).atan2(half_diff)
    };
    (avg + radius, avg - radius, theta)
}

/// Principal values, principal angle and radii of gyration.
pub fn section_derived_properties(props: &SectionProperties) -> CsfResult<DerivedProperties> {
    let (i1, i2, theta) = principal_moments(props.ix, props.iy, props.ixy);
    let gyration = |i: f64, axis: &str| -> CsfResult<f64> {
        let r2 = i / props.a;
        if !(r2.is_finite() && r2 >= 0.0) {
            return Err(CsfError::DegenerateSection(format!(
                "radius of gyration about {axis} undefined (I = {i:e}, A = {:e})",
                props.a
            )));
        }
        Ok(r2.sqrt())
    };
    Ok(DerivedProperties {
        i1,
        i2,
        theta,
        rx: gyration(props.ix, "x")?,
        ry: gyration(props.iy, "y")?,
    })
}

/// Every property and torsion estimate of one section, flattened for export.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FullAnalysis {
    pub z: f64,
    #[serde(flatten)]
    pub props: SectionProperties,
    #[serde(flatten)]
    pub derived: DerivedProperties,
    #[serde(flatten)]
    pub moduli: SectionModuli,
    /// First moment of area above the centroidal x-axis.
    #[serde(rename = "Q_na")]
    pub q_na: f64,
    /// Saint-Venant torsion heuristic `A⁴ / (4π² Ip)`.
    #[serde(rename = "K_torsion")]
    pub k_torsion: f64,
    #[serde(flatten)]
    pub torsion: TorsionReport,
}

/// Full analysis with default settings and the given polar factor
/// (`None` selects the rectangle-equivalent heuristic).
pub fn section_full_analysis(section: &Section, alpha: Option<f64>) -> CsfResult<FullAnalysis> {
    let cfg = AnalysisCfg {
        alpha,
        ..AnalysisCfg::default()
    };
    section_full_analysis_with(section, &cfg)
}

pub fn section_full_analysis_with(section: &Section, cfg: &AnalysisCfg) -> CsfResult<FullAnalysis> {
    let props = section_properties(section)?;
    let derived = section_derived_properties(&props)?;
    let moduli = section_moduli(section, &props)?;
    let q_na = first_moment_na(section, &props);
    let k_torsion = k_torsion_saint_venant(props.a, props.j)?;
    let torsion = torsion_ensemble(section, &props, &derived, cfg)?;
    Ok(FullAnalysis {
        z: section.z(),
        props,
        derived,
        moduli,
        q_na,
        k_torsion,
        torsion,
    })
}
