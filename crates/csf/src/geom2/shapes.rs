//! Vertex-loop builders for common section shapes.
//!
//! Loops are CCW. Closed cells use the slit encoding consumed by the
//! closed-cell torsion estimator: outer loop CCW, a repeat of the first outer
//! vertex, then the inner loop CW with an explicit closure.

use std::f64::consts::TAU;

use super::types::Point;

/// Axis-aligned `width × height` rectangle centred at `center`.
pub fn rectangle(center: Point, width: f64, height: f64) -> Vec<Point> {
    let (hw, hh) = (0.5 * width, 0.5 * height);
    vec![
        center + Point::new(-hw, -hh),
        center + Point::new(hw, -hh),
        center + Point::new(hw, hh),
        center + Point::new(-hw, hh),
    ]
}

/// Regular `n`-gon inscribed in a circle of `radius`; first vertex at `phase`.
pub fn regular_polygon(center: Point, radius: f64, n: usize, phase: f64) -> Vec<Point> {
    let n = n.max(3);
    (0..n)
        .map(|k| {
            let th = phase + TAU * (k as f64) / (n as f64);
            center + Point::new(radius * th.cos(), radius * th.sin())
        })
        .collect()
}

/// Circle of `radius` approximated by `n` segments.
#[inline]
pub fn circle(center: Point, radius: f64, n: usize) -> Vec<Point> {
    regular_polygon(center, radius, n, 0.0)
}

/// Join an outer CCW loop and an inner CCW loop into one slit loop.
///
/// Layout: `outer[0..], outer[0], inner reversed (CW) starting at inner[0],
/// inner[0]`. Bridge edges `outer[0] ↔ inner[0]` cancel in boundary integrals.
pub fn slit_loop(outer: &[Point], inner: &[Point]) -> Vec<Point> {
    let mut out = Vec::with_capacity(outer.len() + inner.len() + 2);
    out.extend_from_slice(outer);
    if let Some(&first) = outer.first() {
        out.push(first);
    }
    if let Some(&first) = inner.first() {
        out.push(first);
        out.extend(inner[1..].iter().rev().copied());
        out.push(first);
    }
    out
}

/// Circular annulus (`r_in < r_out`) as one slit loop with `n` segments per ring.
pub fn slit_annulus(center: Point, r_out: f64, r_in: f64, n: usize) -> Vec<Point> {
    slit_loop(&circle(center, r_out, n), &circle(center, r_in, n))
}

/// Rectangular hollow section (outer `width × height`, wall `t`) as one slit loop.
pub fn slit_box(center: Point, width: f64, height: f64, t: f64) -> Vec<Point> {
    slit_loop(
        &rectangle(center, width, height),
        &rectangle(center, width - 2.0 * t, height - 2.0 * t),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom2::util::{perimeter, signed_area};

    #[test]
    fn rectangle_area_and_orientation() {
        let r = rectangle(Point::new(1.0, 2.0), 3.0, 0.5);
        assert!((signed_area(&r) - 1.5).abs() < 1e-12);
        assert!((perimeter(&r) - 7.0).abs() < 1e-12);
    }

    #[test]
    fn slit_box_area_is_wall_area() {
        let s = slit_box(Point::zeros(), 2.0, 1.0, 0.1);
        // outer 4 + repeat + inner 4 + closure
        assert_eq!(s.len(), 10);
        let wall = 2.0 * 1.0 - 1.8 * 0.8;
        assert!((signed_area(&s) - wall).abs() < 1e-12);
    }
}
