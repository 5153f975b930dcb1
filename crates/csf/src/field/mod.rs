//! Continuous section field: a cross-section morphing between two stations.
//!
//! Purpose
//! - Own the two endpoint sections and answer `section(z)` queries with a
//!   freshly allocated intermediate `Section`.
//! - Resolve per-polygon topology, wall thickness and weight at `z`, and store
//!   weights relative to each polygon's immediate container so the property
//!   engine can sum polygon contributions independently.
//!
//! Lifecycle
//! - Construct once from validated endpoint sections (the container table is
//!   computed here), optionally configure weight laws once, then query freely.
//!   Queries take `&self`; no state changes after setup.

pub mod hierarchy;
pub mod weight;

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, warn};

use crate::cfg::Tolerances;
use crate::error::{CsfError, CsfResult};
use crate::geom2::util::lerp;
use crate::geom2::{find_self_intersection, Point, Polygon, Section, Topology};

pub use hierarchy::{children_map, immediate_container, polygon_contains};
pub use weight::{FnLaw, LinearLaw, LookupLaw, WeightCtx, WeightLaw, WeightLaws};

/// Section field between `s0` (at `z0`) and `s1` (at `z1`).
pub struct ContinuousSectionField {
    s0: Section,
    s1: Section,
    tol: Tolerances,
    containers: Vec<Option<usize>>,
    weight_laws: Option<WeightLaws>,
}

impl ContinuousSectionField {
    /// Pair two endpoint sections polygon-by-polygon (by index).
    ///
    /// Fails when polygon or vertex counts differ, when the stations coincide,
    /// or when the container table of `s0` has a cycle.
    pub fn new(s0: Section, s1: Section) -> CsfResult<Self> {
        if s0.len() != s1.len() {
            return Err(CsfError::CardinalityMismatch(format!(
                "{} polygons at z0 vs {} at z1",
                s0.len(),
                s1.len()
            )));
        }
        for (p0, p1) in s0.polygons().iter().zip(s1.polygons()) {
            if p0.len() != p1.len() {
                return Err(CsfError::CardinalityMismatch(format!(
                    "polygon '{}' has {} vertices at z0 vs {} at z1 ('{}')",
                    p0.name(),
                    p0.len(),
                    p1.len(),
                    p1.name()
                )));
            }
            if p0.name() != p1.name() {
                warn!(
                    polygon0 = p0.name(),
                    polygon1 = p1.name(),
                    "endpoint polygons paired by index have different names; using the z0 name"
                );
            }
        }
        let b = s0.bounds().union(&s1.bounds());
        let tol = Tolerances::from_extent(b.width(), b.height(), s1.z() - s0.z());
        if (s1.z() - s0.z()).abs() <= tol.eps_lin {
            return Err(CsfError::DegenerateSection(format!(
                "endpoint stations coincide (z0 = {}, z1 = {})",
                s0.z(),
                s1.z()
            )));
        }
        let containers = hierarchy::container_table(&s0, tol.eps_lin)?;
        debug!(
            polygons = s0.len(),
            z0 = s0.z(),
            z1 = s1.z(),
            length_scale = tol.length_scale,
            "section field constructed"
        );
        Ok(Self {
            s0,
            s1,
            tol,
            containers,
            weight_laws: None,
        })
    }

    #[inline]
    pub fn s0(&self) -> &Section {
        &self.s0
    }
    #[inline]
    pub fn s1(&self) -> &Section {
        &self.s1
    }
    #[inline]
    pub fn z0(&self) -> f64 {
        self.s0.z()
    }
    #[inline]
    pub fn z1(&self) -> f64 {
        self.s1.z()
    }
    /// Member length `|z1 - z0|`.
    #[inline]
    pub fn length(&self) -> f64 {
        (self.z1() - self.z0()).abs()
    }
    #[inline]
    pub fn tolerances(&self) -> Tolerances {
        self.tol
    }
    #[inline]
    pub fn len(&self) -> usize {
        self.s0.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.s0.is_empty()
    }

    /// Install the weight-law table (1-based polygon indices). Allowed once.
    pub fn set_weight_laws(&mut self, laws: WeightLaws) -> CsfResult<()> {
        if self.weight_laws.is_some() {
            return Err(CsfError::InvalidConfig("weight laws are already configured".into()));
        }
        let n = self.len();
        if let Some(bad) = laws.indices().find(|&i| i == 0 || i > n) {
            return Err(CsfError::InvalidConfig(format!(
                "weight law index {bad} outside 1..={n}"
            )));
        }
        debug!(laws = laws.len(), "weight laws configured");
        self.weight_laws = Some(laws);
        Ok(())
    }

    pub fn weight_laws(&self) -> Option<&WeightLaws> {
        self.weight_laws.as_ref()
    }

    /// Immediate container (0-based index) of polygon `i` in the reference section.
    pub fn immediate_container(&self, i: usize) -> Option<usize> {
        self.containers.get(i).copied().flatten()
    }

    /// Containers of `i` from the immediate one up to the outermost.
    pub fn container_chain(&self, i: usize) -> Vec<usize> {
        let mut chain = Vec::new();
        let mut cur = self.immediate_container(i);
        while let Some(c) = cur {
            chain.push(c);
            cur = self.immediate_container(c);
        }
        chain
    }

    /// Container → direct children; top-level polygons sit under `None`.
    pub fn direct_children_map(&self) -> BTreeMap<Option<usize>, Vec<usize>> {
        children_map(&self.containers)
    }

    fn check_z(&self, z: f64) -> CsfResult<f64> {
        let lo = self.z0().min(self.z1());
        let hi = self.z0().max(self.z1());
        if !z.is_finite() || z < lo - self.tol.eps_lin || z > hi + self.tol.eps_lin {
            return Err(CsfError::ZOutOfRange { z, lo, hi });
        }
        Ok(z.clamp(lo, hi))
    }

    /// Absolute weight of polygon `i` (0-based) at `z` (law if configured, else linear).
    pub fn absolute_weight(&self, i: usize, z: f64) -> CsfResult<f64> {
        if i >= self.len() {
            return Err(CsfError::IndexOutOfRange {
                index: i,
                len: self.len(),
            });
        }
        let z = self.check_z(z)?;
        self.absolute_weight_unchecked(i, z)
    }

    fn absolute_weight_unchecked(&self, i: usize, z: f64) -> CsfResult<f64> {
        let (p0, p1) = (&self.s0.polygons()[i], &self.s1.polygons()[i]);
        let ctx = WeightCtx {
            z,
            z0: self.z0(),
            z1: self.z1(),
            w0: p0.weight(),
            w1: p1.weight(),
            polygon0: p0,
            polygon1: p1,
            eps: self.tol.eps_lin,
        };
        let w = match self.weight_laws.as_ref().and_then(|laws| laws.get(i + 1)) {
            Some(law) => law.weight(&ctx)?,
            None => LinearLaw.weight(&ctx)?,
        };
        if !w.is_finite() {
            return Err(ctx.error(format!("law returned non-finite weight {w}")));
        }
        Ok(w)
    }

    /// Intermediate section at `z`.
    ///
    /// Output polygons carry weights relative to their immediate container.
    /// `section(z0)` and `section(z1)` reproduce the endpoint vertices exactly.
    pub fn section(&self, z: f64) -> CsfResult<Section> {
        let z = self.check_z(z)?;
        let tau = (z - self.z0()) / (self.z1() - self.z0());

        let absolute: Vec<f64> = (0..self.len())
            .map(|i| self.absolute_weight_unchecked(i, z))
            .collect::<CsfResult<_>>()?;

        let mut polygons = Vec::with_capacity(self.len());
        for (i, (p0, p1)) in self.s0.polygons().iter().zip(self.s1.polygons()).enumerate() {
            let vertices: Vec<Point> = p0
                .vertices()
                .iter()
                .zip(p1.vertices())
                .map(|(a, b)| a * (1.0 - tau) + b * tau)
                .collect();
            let topology = resolve_topology(p0, p1, tau, z)?;
            let relative = match self.immediate_container(i) {
                Some(c) => absolute[i] - absolute[c],
                None => absolute[i],
            };
            let poly = Polygon::with_topology(vertices, relative, p0.name(), topology).map_err(
                |err| match err {
                    CsfError::InvalidPolygon { name, reason } => CsfError::InvalidPolygon {
                        name,
                        reason: format!("at z = {z}: {reason}"),
                    },
                    other => other,
                },
            )?;
            if !topology.is_tagged() {
                if let Some((e1, e2)) = find_self_intersection(poly.vertices(), self.tol.eps_lin) {
                    warn!(
                        polygon = poly.name(),
                        z,
                        edge_a = e1,
                        edge_b = e2,
                        "interpolated polygon is self-intersecting; integrals remain defined"
                    );
                }
            }
            polygons.push(poly);
        }
        Section::new(polygons, z)
    }
}

/// Topology at `tau` from both endpoint declarations.
///
/// Kind: the tagged end wins; two different tags conflict. Thickness: lerp
/// when both ends define it, else the defined end's value.
fn resolve_topology(p0: &Polygon, p1: &Polygon, tau: f64, z: f64) -> CsfResult<Topology> {
    let (a, b) = (p0.topology(), p1.topology());
    let kind = match (a.is_tagged(), b.is_tagged()) {
        (true, true) if !a.same_kind(&b) => {
            return Err(CsfError::TopologyConflict {
                name: p0.name().to_string(),
                tag0: a.to_string(),
                tag1: b.to_string(),
            })
        }
        (true, _) => a,
        (false, true) => b,
        (false, false) => Topology::Plain,
    };
    let t = match (a.thickness(), b.thickness()) {
        (Some(t0), Some(t1)) => Some(lerp(t0, t1, tau)),
        (Some(t), None) | (None, Some(t)) => Some(t),
        (None, None) => None,
    };
    if matches!(kind, Topology::Cell { .. }) && t.is_none() {
        return Err(CsfError::MissingThickness {
            name: p0.name().to_string(),
            z,
        });
    }
    Ok(kind.with_thickness(t))
}

impl fmt::Debug for ContinuousSectionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContinuousSectionField")
            .field("z0", &self.z0())
            .field("z1", &self.z1())
            .field("polygons", &self.len())
            .field("containers", &self.containers)
            .field("weight_laws", &self.weight_laws)
            .finish()
    }
}

#[cfg(test)]
mod tests;
