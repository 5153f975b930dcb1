//! Estimator A: scaled polar moment `J ≈ alpha·(Ix + Iy)` and the companion
//! heuristics that pick `alpha`.

use std::f64::consts::PI;

use super::roark::roark_beta;
use crate::error::{CsfError, CsfResult};
use crate::props::SectionProperties;

/// `alpha·(Ix + Iy)`.
#[inline]
pub fn scaled_polar(props: &SectionProperties, alpha: f64) -> f64 {
    alpha * (props.ix + props.iy)
}

/// Saint-Venant's approximation `K ≈ A⁴ / (4π²·Ip)` (exact for ellipses).
pub fn k_torsion_saint_venant(area: f64, ip: f64) -> CsfResult<f64> {
    if !(ip.is_finite() && ip > 0.0) {
        return Err(CsfError::DegenerateSection(format!(
            "polar moment must be positive for K_torsion, got {ip:e}"
        )));
    }
    Ok(area.powi(4) / (4.0 * PI * PI * ip))
}

/// `alpha = K / Ip` from a known torsion constant estimate.
pub fn alpha_from_k_torsion(k: f64, ip: f64) -> CsfResult<f64> {
    if !(ip.is_finite() && ip > 0.0) || !k.is_finite() {
        return Err(CsfError::DegenerateSection(format!(
            "cannot derive alpha from K = {k:e}, Ip = {ip:e}"
        )));
    }
    Ok(k / ip)
}

/// `alpha` of the rectangle whose principal inertia ratio matches `I2/I1`:
/// `12·β(r)·r² / (1 + r²)` with `r = sqrt(I2/I1)` (the side ratio `b/a`).
pub fn alpha_rectangle_equivalent(i1: f64, i2: f64) -> CsfResult<f64> {
    if !(i1.is_finite() && i2.is_finite() && i1 > 0.0 && i2 > 0.0) {
        return Err(CsfError::DegenerateSection(format!(
            "principal inertias must be positive, got I1 = {i1:e}, I2 = {i2:e}"
        )));
    }
    let r = (i2.min(i1) / i1.max(i2)).sqrt();
    Ok(12.0 * roark_beta(r) * r * r / (1.0 + r * r))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn square_alpha_matches_saint_venant_ratio() {
        // square: J = 0.1406·a⁴, Ip = a⁴/6
        let alpha = alpha_rectangle_equivalent(1.0, 1.0).unwrap();
        assert_relative_eq!(alpha, 0.845, epsilon = 2e-3);
    }

    #[test]
    fn circle_k_torsion_is_exact() {
        let r: f64 = 0.3;
        let a = PI * r * r;
        let ip = PI * r.powi(4) / 2.0;
        assert_relative_eq!(k_torsion_saint_venant(a, ip).unwrap(), ip, max_relative = 1e-12);
        assert_relative_eq!(alpha_from_k_torsion(ip, ip).unwrap(), 1.0);
        assert!(k_torsion_saint_venant(a, 0.0).is_err());
    }
}
