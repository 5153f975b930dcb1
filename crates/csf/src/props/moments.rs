//! Closed-form boundary integrals of a single vertex loop.
//!
//! With `c_i = x_i·y_{i+1} − x_{i+1}·y_i` (Green's theorem on each edge):
//! - `A   = ½  Σ c_i`
//! - `∫x  = ⅙  Σ (x_i + x_{i+1}) c_i`, `∫y` likewise
//! - `∫y² = 1/12 Σ (y_i² + y_i y_{i+1} + y_{i+1}²) c_i`, `∫x²` likewise
//! - `∫xy = 1/24 Σ (x_i y_{i+1} + 2 x_i y_i + 2 x_{i+1} y_{i+1} + x_{i+1} y_i) c_i`
//!
//! Integrals are signed: CCW loops give positive area. No `abs()` is applied
//! anywhere; voids and materials enter only through weights.

use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use crate::geom2::util::edges;
use crate::geom2::Point;

/// Area moments about the origin of the reference frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AreaMoments {
    /// Area.
    pub a: f64,
    /// First moment `∫y dA`.
    pub sx: f64,
    /// First moment `∫x dA`.
    pub sy: f64,
    /// Second moment `∫y² dA`.
    pub ixx: f64,
    /// Second moment `∫x² dA`.
    pub iyy: f64,
    /// Product moment `∫xy dA`.
    pub ixy: f64,
}

impl AreaMoments {
    /// Moments of the loop `pts` (implicitly closed).
    pub fn of_loop(pts: &[Point]) -> Self {
        let mut m = AreaMoments::default();
        for (p, q) in edges(pts) {
            let c = p.x * q.y - q.x * p.y;
            m.a += c;
            m.sy += (p.x + q.x) * c;
            m.sx += (p.y + q.y) * c;
            m.iyy += (p.x * p.x + p.x * q.x + q.x * q.x) * c;
            m.ixx += (p.y * p.y + p.y * q.y + q.y * q.y) * c;
            m.ixy += (p.x * q.y + 2.0 * p.x * p.y + 2.0 * q.x * q.y + q.x * p.y) * c;
        }
        AreaMoments {
            a: m.a / 2.0,
            sx: m.sx / 6.0,
            sy: m.sy / 6.0,
            ixx: m.ixx / 12.0,
            iyy: m.iyy / 12.0,
            ixy: m.ixy / 24.0,
        }
    }

    /// Every moment multiplied by `w`.
    #[inline]
    pub fn scaled(&self, w: f64) -> Self {
        AreaMoments {
            a: self.a * w,
            sx: self.sx * w,
            sy: self.sy * w,
            ixx: self.ixx * w,
            iyy: self.iyy * w,
            ixy: self.ixy * w,
        }
    }

    /// Centroid `(∫x/A, ∫y/A)`; caller guarantees `a != 0`.
    #[inline]
    pub fn centroid(&self) -> Point {
        Point::new(self.sy / self.a, self.sx / self.a)
    }

    /// `(Ix, Iy, Ixy)` about the centroid via the parallel-axis theorem.
    #[inline]
    pub fn centroidal(&self) -> (f64, f64, f64) {
        let c = self.centroid();
        (
            self.ixx - self.a * c.y * c.y,
            self.iyy - self.a * c.x * c.x,
            self.ixy - self.a * c.x * c.y,
        )
    }
}

impl Add for AreaMoments {
    type Output = AreaMoments;
    fn add(self, rhs: AreaMoments) -> AreaMoments {
        AreaMoments {
            a: self.a + rhs.a,
            sx: self.sx + rhs.sx,
            sy: self.sy + rhs.sy,
            ixx: self.ixx + rhs.ixx,
            iyy: self.iyy + rhs.iyy,
            ixy: self.ixy + rhs.ixy,
        }
    }
}

impl AddAssign for AreaMoments {
    fn add_assign(&mut self, rhs: AreaMoments) {
        *self = *self + rhs;
    }
}
