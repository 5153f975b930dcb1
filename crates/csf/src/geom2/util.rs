//! Vertex-loop predicates and measures.
//!
//! All functions take an implicitly closed loop `pts[0..n]` (edge `n-1 → 0`
//! included). Predicates accept an explicit linear tolerance `eps`.

use super::types::{Bounds2, Point};

#[inline]
pub(crate) fn cross(a: Point, b: Point, c: Point) -> f64 {
    let ab = b - a;
    let ac = c - a;
    ab.x * ac.y - ab.y * ac.x
}

/// Iterate edges `(p_i, p_{i+1})` of the closed loop.
#[inline]
pub(crate) fn edges(pts: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    let n = pts.len();
    (0..n).map(move |i| (pts[i], pts[(i + 1) % n]))
}

/// Shoelace signed area; positive for CCW loops.
pub fn signed_area(pts: &[Point]) -> f64 {
    0.5 * edges(pts).map(|(a, b)| a.x * b.y - b.x * a.y).sum::<f64>()
}

pub fn perimeter(pts: &[Point]) -> f64 {
    edges(pts).map(|(a, b)| (b - a).norm()).sum()
}

pub fn bounds_of(pts: &[Point]) -> Bounds2 {
    let mut min = Point::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in pts {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Bounds2 { min, max }
}

/// `p` lies on segment `ab` within distance `eps`.
pub fn point_on_segment(p: Point, a: Point, b: Point, eps: f64) -> bool {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 <= eps * eps {
        return (p - a).norm() <= eps;
    }
    let s = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    (a + ab * s - p).norm() <= eps
}

/// Ray casting with an inclusive boundary: points within `eps` of an edge
/// count as inside.
pub fn point_in_polygon(p: Point, pts: &[Point], eps: f64) -> bool {
    let mut inside = false;
    for (a, b) in edges(pts) {
        if point_on_segment(p, a, b, eps) {
            return true;
        }
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}

/// Proper crossing of segments `ab` and `cd` (interiors intersect, touching
/// within `eps` excluded).
pub fn segments_cross(a: Point, b: Point, c: Point, d: Point, eps: f64) -> bool {
    let d1 = cross(c, d, a);
    let d2 = cross(c, d, b);
    let d3 = cross(a, b, c);
    let d4 = cross(a, b, d);
    let tol_cd = eps * (d - c).norm().max(eps);
    let tol_ab = eps * (b - a).norm().max(eps);
    ((d1 > tol_cd && d2 < -tol_cd) || (d1 < -tol_cd && d2 > tol_cd))
        && ((d3 > tol_ab && d4 < -tol_ab) || (d3 < -tol_ab && d4 > tol_ab))
}

/// First pair of non-adjacent edges that cross, if any. O(n²).
pub fn find_self_intersection(pts: &[Point], eps: f64) -> Option<(usize, usize)> {
    let n = pts.len();
    if n < 4 {
        return None;
    }
    for i in 0..n {
        let (a, b) = (pts[i], pts[(i + 1) % n]);
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let (c, d) = (pts[j], pts[(j + 1) % n]);
            if segments_cross(a, b, c, d, eps) {
                return Some((i, j));
            }
        }
    }
    None
}

/// Sutherland–Hodgman clip of the loop against the half-plane `y >= y0`.
///
/// Non-convex inputs may produce zero-width bridges along `y = y0`; they carry
/// no area, so boundary integrals over the result stay exact.
pub fn clip_above(pts: &[Point], y0: f64) -> Vec<Point> {
    let mut out = Vec::with_capacity(pts.len() + 2);
    for (a, b) in edges(pts) {
        let a_in = a.y >= y0;
        let b_in = b.y >= y0;
        if a_in {
            out.push(a);
        }
        if a_in != b_in {
            let s = (y0 - a.y) / (b.y - a.y);
            out.push(Point::new(a.x + s * (b.x - a.x), y0));
        }
    }
    out
}

/// Rotate every vertex by `angle` (radians, CCW) about `center`.
pub fn rotate(pts: &[Point], angle: f64, center: Point) -> Vec<Point> {
    let (s, c) = angle.sin_cos();
    pts.iter()
        .map(|p| {
            let d = p - center;
            center + Point::new(c * d.x - s * d.y, s * d.x + c * d.y)
        })
        .collect()
}

/// Reverse the loop if it is clockwise.
pub fn to_ccw(mut pts: Vec<Point>) -> Vec<Point> {
    if signed_area(&pts) < 0.0 {
        pts.reverse();
    }
    pts
}

#[inline]
pub(crate) fn lerp(a: f64, b: f64, tau: f64) -> f64 {
    a * (1.0 - tau) + b * tau
}
