//! Planar geometry model for cross-sections.
//!
//! Purpose
//! - Immutable value types (`Point`, `Polygon`, `Section`) whose invariants are
//!   checked once at construction: CCW loops, non-degenerate area, unique
//!   names.
//! - Tolerance-aware predicates (inclusive point-in-polygon, crossings,
//!   half-plane clipping) used by the hierarchy resolver and property engine.
//! - Shape builders and a reproducible random sampler for tests and benches.
//!
//! Conventions
//! - Loops are implicitly closed; a repeated closing vertex is allowed.
//! - Topology (wall/cell/closed) is a first-class enum; tagged names like
//!   `"web@wall@t=0.02"` are an interchange format only.

pub mod rand;
pub mod shapes;
mod types;
pub mod util;

pub use types::{compose_tagged_name, parse_tagged_name, Bounds2, Point, Polygon, Section, Topology};
pub use util::{
    bounds_of, clip_above, find_self_intersection, perimeter, point_in_polygon, point_on_segment,
    rotate, segments_cross, signed_area, to_ccw,
};

#[cfg(test)]
mod tests;
