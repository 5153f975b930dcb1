//! Geometry model: points, topology tags, polygons and sections.
//!
//! - `Polygon`: CCW vertex loop with a homogenization weight, a name and a
//!   first-class `Topology`. Invariants are checked at construction and never
//!   repaired.
//! - `Section`: polygons with unique names at a station `z`.
//!
//! Both (de)serialize through plain records so deserialization runs the same
//! validation as the constructors.

use std::collections::HashSet;
use std::fmt;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use super::util::{bounds_of, perimeter, signed_area};
use crate::cfg::{Tolerances, REL_AREA};
use crate::error::{CsfError, CsfResult};

/// A point of the section plane.
pub type Point = Vector2<f64>;

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds2 {
    pub min: Point,
    pub max: Point,
}

impl Bounds2 {
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }
    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
    #[inline]
    pub fn union(&self, other: &Bounds2) -> Bounds2 {
        Bounds2 {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }
    /// `other ⊆ self` with slack `eps`.
    #[inline]
    pub fn contains_bounds(&self, other: &Bounds2, eps: f64) -> bool {
        other.min.x >= self.min.x - eps
            && other.min.y >= self.min.y - eps
            && other.max.x <= self.max.x + eps
            && other.max.y <= self.max.y + eps
    }
}

/// Structural role of a polygon for the thin-walled torsion estimators.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Topology {
    /// Solid (or void, through its weight) region.
    #[default]
    Plain,
    /// Open thin wall; thickness estimated as `2A/P` when absent.
    Wall { t: Option<f64> },
    /// Closed single cell encoded as one slit loop; thickness is mandatory
    /// for torsion.
    Cell { t: Option<f64> },
    /// Closed region tag carried for exporters; treated as solid here.
    Closed { t: Option<f64> },
}

impl Topology {
    /// Tag text as used in tagged names (`None` for `Plain`).
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            Topology::Plain => None,
            Topology::Wall { .. } => Some("wall"),
            Topology::Cell { .. } => Some("cell"),
            Topology::Closed { .. } => Some("closed"),
        }
    }

    pub fn thickness(&self) -> Option<f64> {
        match *self {
            Topology::Plain => None,
            Topology::Wall { t } | Topology::Cell { t } | Topology::Closed { t } => t,
        }
    }

    #[inline]
    pub fn is_tagged(&self) -> bool {
        !matches!(self, Topology::Plain)
    }

    /// Same kind, different thickness. `Plain` ignores the thickness.
    pub fn with_thickness(&self, t: Option<f64>) -> Topology {
        match self {
            Topology::Plain => Topology::Plain,
            Topology::Wall { .. } => Topology::Wall { t },
            Topology::Cell { .. } => Topology::Cell { t },
            Topology::Closed { .. } => Topology::Closed { t },
        }
    }

    /// Kind equality, thickness ignored.
    #[inline]
    pub fn same_kind(&self, other: &Topology) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    fn validate(&self, name: &str) -> CsfResult<()> {
        if let Some(t) = self.thickness() {
            if !(t.is_finite() && t > 0.0) {
                return Err(CsfError::polygon(
                    name,
                    format!("wall thickness must be finite and > 0, got {t}"),
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag().unwrap_or("plain"))
    }
}

/// Split a legacy tagged name (`"web@wall@t=0.02"`) into base name and topology.
pub fn parse_tagged_name(tagged: &str) -> CsfResult<(String, Topology)> {
    let invalid = |reason: String| CsfError::InvalidTag {
        name: tagged.to_string(),
        reason,
    };
    let mut parts = tagged.split('@');
    let base = parts.next().unwrap_or_default().trim();
    if base.is_empty() {
        return Err(invalid("empty base name".into()));
    }
    let mut kind: Option<Topology> = None;
    let mut t: Option<f64> = None;
    for token in parts {
        let token = token.trim();
        if let Some(value) = token.strip_prefix("t=") {
            if t.is_some() {
                return Err(invalid("repeated @t= tag".into()));
            }
            let v: f64 = value
                .trim()
                .parse()
                .map_err(|_| invalid(format!("bad thickness '{value}'")))?;
            t = Some(v);
            continue;
        }
        let next = match token.to_ascii_lowercase().as_str() {
            "cell" => Topology::Cell { t: None },
            "wall" => Topology::Wall { t: None },
            "closed" => Topology::Closed { t: None },
            other => return Err(invalid(format!("unknown tag '@{other}'"))),
        };
        if kind.is_some() {
            return Err(invalid("more than one topology tag".into()));
        }
        kind = Some(next);
    }
    match kind {
        Some(k) => Ok((base.to_string(), k.with_thickness(t))),
        None if t.is_some() => Err(invalid("@t= given without a topology tag".into())),
        None => Ok((base.to_string(), Topology::Plain)),
    }
}

/// Compose `base@tag@t=value` (or just `base` for `Plain`).
pub fn compose_tagged_name(base: &str, topology: &Topology) -> String {
    let mut out = base.to_string();
    if let Some(tag) = topology.tag() {
        out.push('@');
        out.push_str(tag);
        if let Some(t) = topology.thickness() {
            out.push_str(&format!("@t={t}"));
        }
    }
    out
}

/// CCW polygon with weight, name and topology.
///
/// Invariants:
/// - at least 3 finite vertices;
/// - signed area above `REL_AREA · extent²` (so CCW, non-degenerate);
/// - non-empty name without `@` (tags live in `topology`);
/// - finite weight, positive finite thickness when present.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolygonRecord", into = "PolygonRecord")]
pub struct Polygon {
    vertices: Vec<Point>,
    weight: f64,
    name: String,
    topology: Topology,
}

impl Polygon {
    /// Untagged polygon.
    pub fn new(vertices: Vec<Point>, weight: f64, name: impl Into<String>) -> CsfResult<Self> {
        Self::with_topology(vertices, weight, name, Topology::Plain)
    }

    pub fn with_topology(
        vertices: Vec<Point>,
        weight: f64,
        name: impl Into<String>,
        topology: Topology,
    ) -> CsfResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CsfError::polygon("<unnamed>", "name must not be empty"));
        }
        if name.contains('@') {
            return Err(CsfError::polygon(
                &name,
                "base name must not contain '@' (use Topology or from_tagged_name)",
            ));
        }
        if vertices.len() < 3 {
            return Err(CsfError::polygon(
                &name,
                format!("needs at least 3 vertices, got {}", vertices.len()),
            ));
        }
        if let Some(p) = vertices.iter().find(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return Err(CsfError::polygon(&name, format!("non-finite vertex {p:?}")));
        }
        if !weight.is_finite() {
            return Err(CsfError::polygon(&name, format!("non-finite weight {weight}")));
        }
        topology.validate(&name)?;

        let b = bounds_of(&vertices);
        let extent = b.width().max(b.height());
        let area = signed_area(&vertices);
        let eps_area = REL_AREA * extent * extent;
        if extent <= 0.0 || area.abs() <= eps_area {
            return Err(CsfError::polygon(
                &name,
                format!("area {area:e} below tolerance {eps_area:e}"),
            ));
        }
        if area < 0.0 {
            return Err(CsfError::polygon(
                &name,
                format!("vertices are clockwise (signed area {area:e})"),
            ));
        }
        Ok(Self {
            vertices,
            weight,
            name,
            topology,
        })
    }

    /// Build from a legacy tagged name such as `"flange@wall@t=0.012"`.
    pub fn from_tagged_name(vertices: Vec<Point>, weight: f64, tagged: &str) -> CsfResult<Self> {
        let (base, topology) = parse_tagged_name(tagged)?;
        Self::with_topology(vertices, weight, base, topology)
    }

    #[inline]
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }
    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
    #[inline]
    pub fn topology(&self) -> Topology {
        self.topology
    }
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Name with topology and thickness tags, for exporters.
    pub fn tagged_name(&self) -> String {
        compose_tagged_name(&self.name, &self.topology)
    }

    /// Shoelace signed area (positive by construction).
    #[inline]
    pub fn signed_area(&self) -> f64 {
        signed_area(&self.vertices)
    }
    #[inline]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }
    #[inline]
    pub fn perimeter(&self) -> f64 {
        perimeter(&self.vertices)
    }
    #[inline]
    pub fn bounds(&self) -> Bounds2 {
        bounds_of(&self.vertices)
    }

    /// Copy with a different weight; geometry invariants are unaffected.
    pub fn with_weight(&self, weight: f64) -> Polygon {
        Polygon {
            weight,
            ..self.clone()
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct PolygonRecord {
    vertices: Vec<[f64; 2]>,
    weight: f64,
    name: String,
    #[serde(default)]
    topology: Topology,
}

impl TryFrom<PolygonRecord> for Polygon {
    type Error = CsfError;

    fn try_from(r: PolygonRecord) -> CsfResult<Self> {
        let vertices = r.vertices.iter().map(|v| Point::new(v[0], v[1])).collect();
        Polygon::with_topology(vertices, r.weight, r.name, r.topology)
    }
}

impl From<Polygon> for PolygonRecord {
    fn from(p: Polygon) -> Self {
        PolygonRecord {
            vertices: p.vertices.iter().map(|v| [v.x, v.y]).collect(),
            weight: p.weight,
            name: p.name,
            topology: p.topology,
        }
    }
}

/// Cross-section at station `z`: polygons with unique names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SectionRecord", into = "SectionRecord")]
pub struct Section {
    polygons: Vec<Polygon>,
    z: f64,
}

impl Section {
    pub fn new(polygons: Vec<Polygon>, z: f64) -> CsfResult<Self> {
        if !z.is_finite() {
            return Err(CsfError::DegenerateSection(format!("non-finite station z = {z}")));
        }
        if polygons.is_empty() {
            return Err(CsfError::DegenerateSection("section has no polygons".into()));
        }
        let mut seen = HashSet::with_capacity(polygons.len());
        for p in &polygons {
            if !seen.insert(p.name()) {
                return Err(CsfError::DuplicateName(p.name().to_string()));
            }
        }
        Ok(Self { polygons, z })
    }

    #[inline]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }
    #[inline]
    pub fn z(&self) -> f64 {
        self.z
    }
    #[inline]
    pub fn len(&self) -> usize {
        self.polygons.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Polygon> {
        self.polygons.iter().find(|p| p.name() == name)
    }

    pub fn bounds(&self) -> Bounds2 {
        // non-empty by construction
        let first = self.polygons[0].bounds();
        self.polygons[1..]
            .iter()
            .fold(first, |acc, p| acc.union(&p.bounds()))
    }

    /// Tolerances from this section's own extent.
    pub fn tolerances(&self) -> Tolerances {
        let b = self.bounds();
        Tolerances::from_extent(b.width(), b.height(), 0.0)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct SectionRecord {
    z: f64,
    polygons: Vec<Polygon>,
}

impl TryFrom<SectionRecord> for Section {
    type Error = CsfError;

    fn try_from(r: SectionRecord) -> CsfResult<Self> {
        Section::new(r.polygons, r.z)
    }
}

impl From<Section> for SectionRecord {
    fn from(s: Section) -> Self {
        SectionRecord {
            z: s.z,
            polygons: s.polygons,
        }
    }
}
