//! Estimator C: open thin-walled polygons (`Wall` topology).
//!
//! Midline length is taken as `A/t`, so each wall contributes
//! `J_i = (A/t)·t³/3 = A·t²/3` without building a medial line.

use crate::geom2::{Polygon, Section, Topology};

/// Wall thickness: the explicit tag, else `2·A/P`.
pub fn wall_thickness(poly: &Polygon) -> f64 {
    poly.topology()
        .thickness()
        .unwrap_or_else(|| 2.0 * poly.area() / poly.perimeter())
}

/// Unweighted `A·t²/3` of one polygon.
pub fn wall_polygon_j(poly: &Polygon) -> f64 {
    let t = wall_thickness(poly);
    poly.area() * t * t / 3.0
}

/// Weighted sum over all `Wall` polygons; zero when there are none.
pub fn open_wall_torsion(section: &Section) -> f64 {
    section
        .polygons()
        .iter()
        .filter(|p| matches!(p.topology(), Topology::Wall { .. }))
        .map(|p| p.weight() * wall_polygon_j(p))
        .sum()
}
