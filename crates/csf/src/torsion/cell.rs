//! Estimator D: closed thin-walled single cell (Bredt–Batho).
//!
//! A `Cell` polygon is one CCW loop encoding a slit ring:
//! outer boundary → bridge → inner boundary → closure. The first vertex that
//! repeats vertex 0 ends the outer loop; the tail is the inner loop (an
//! explicit closing vertex is accepted). Each loop is re-oriented CCW and
//! `J = 4·A_m²·t / b_m` with `A_m`, `b_m` the mean enclosed area and mean
//! perimeter of the two boundaries.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CsfError, CsfResult};
use crate::geom2::{perimeter, signed_area, to_ccw, Point, Polygon, Section, Topology};

/// Outer and inner boundaries of a slit loop, both CCW.
#[derive(Clone, Debug, PartialEq)]
pub struct CellLoops {
    pub outer: Vec<Point>,
    pub inner: Vec<Point>,
}

/// Bredt–Batho result for one cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellTorsion {
    pub j: f64,
    pub a_outer: f64,
    pub a_inner: f64,
    /// Mean enclosed area `(A_outer + A_inner)/2`.
    pub a_mid: f64,
    /// Mean perimeter `(P_outer + P_inner)/2`.
    pub b_mid: f64,
    pub t: f64,
}

/// Split a slit loop into outer and inner boundaries.
pub fn split_slit_loop(poly: &Polygon, eps: f64) -> CsfResult<CellLoops> {
    let v = poly.vertices();
    if v.len() < 7 {
        return Err(CsfError::cell(
            poly.name(),
            format!("slit loop needs at least 7 vertices, got {}", v.len()),
        ));
    }
    let start = v[0];
    let k = (1..v.len())
        .find(|&i| (v[i] - start).norm() <= eps)
        .ok_or_else(|| CsfError::cell(poly.name(), "no repeated start vertex closes the outer loop"))?;

    let first_loop = v[..k].to_vec();
    let mut second_loop = v[k + 1..].to_vec();
    // explicit return to the outer start, then explicit inner closure
    if second_loop.last().is_some_and(|p| (p - start).norm() <= eps) {
        second_loop.pop();
    }
    if second_loop.len() >= 2 {
        let (first, last) = (second_loop[0], second_loop[second_loop.len() - 1]);
        if (last - first).norm() <= eps {
            second_loop.pop();
        }
    }
    if first_loop.len() < 3 || second_loop.len() < 3 {
        return Err(CsfError::cell(
            poly.name(),
            format!(
                "boundaries need at least 3 vertices each, got {} and {}",
                first_loop.len(),
                second_loop.len()
            ),
        ));
    }

    let (outer, inner) = if signed_area(&second_loop).abs() > signed_area(&first_loop).abs() {
        (second_loop, first_loop)
    } else {
        (first_loop, second_loop)
    };
    Ok(CellLoops {
        outer: to_ccw(outer),
        inner: to_ccw(inner),
    })
}

/// Bredt–Batho torsion constant of one `Cell` polygon (unweighted).
///
/// `z` is only used for error context. A mismatch between `A_outer − A_inner`
/// and the raw loop area beyond `area_rtol` is logged, not fatal.
pub fn closed_cell_polygon_j(
    poly: &Polygon,
    z: f64,
    eps: f64,
    area_rtol: f64,
) -> CsfResult<CellTorsion> {
    let t = poly.topology().thickness().ok_or_else(|| CsfError::MissingThickness {
        name: poly.name().to_string(),
        z,
    })?;
    let loops = split_slit_loop(poly, eps)?;
    let a_outer = signed_area(&loops.outer);
    let a_inner = signed_area(&loops.inner);
    let wall = a_outer - a_inner;
    if !(wall > 0.0) {
        return Err(CsfError::cell(
            poly.name(),
            format!("non-positive wall area {wall:e}"),
        ));
    }
    let a_mid = 0.5 * (a_outer + a_inner);
    let b_mid = 0.5 * (perimeter(&loops.outer) + perimeter(&loops.inner));
    if !(a_mid > 0.0 && b_mid > 0.0 && a_mid.is_finite() && b_mid.is_finite()) {
        return Err(CsfError::cell(
            poly.name(),
            format!("degenerate mid-line quantities A_m = {a_mid:e}, b_m = {b_mid:e}"),
        ));
    }
    let raw = poly.signed_area();
    if (wall - raw).abs() > area_rtol * wall {
        warn!(
            polygon = poly.name(),
            z,
            wall_area = wall,
            loop_area = raw,
            "closed-cell reconstruction disagrees with the polygon's own area"
        );
    }
    Ok(CellTorsion {
        j: 4.0 * a_mid * a_mid * t / b_mid,
        a_outer,
        a_inner,
        a_mid,
        b_mid,
        t,
    })
}

/// Weighted sum over all `Cell` polygons; zero when there are none.
pub fn closed_cell_torsion(section: &Section, area_rtol: f64) -> CsfResult<f64> {
    let eps = section.tolerances().eps_lin;
    section
        .polygons()
        .iter()
        .filter(|p| matches!(p.topology(), Topology::Cell { .. }))
        .map(|p| {
            closed_cell_polygon_j(p, section.z(), eps, area_rtol).map(|c| p.weight() * c.j)
        })
        .sum()
}
