//! Continuous section fields for tapered, composite and voided members.
//!
//! A field pairs two polygonal cross-sections at stations `z0` and `z1` and
//! answers `section(z)` for any station in between. Sections feed the
//! integral property engine (area, centroid, second moments, principal axes)
//! and an ensemble of torsion-constant estimators.
//!
//! Layout
//! - `geom2`: points, polygons, sections, planar predicates, shape builders.
//! - `field`: the field itself, containment hierarchy, weight laws.
//! - `props`: section properties, moduli, stiffness, full analysis.
//! - `torsion`: estimators A–E and the ensemble report.
//! - `integrate`: Gauss–Legendre integration along `z`, station tables.
//!
//! API Policy
//! - All fallible operations return `CsfResult`. Non-fatal anomalies are
//!   reported through `tracing`; the crate never installs a subscriber.
//! - Values are immutable after construction; a configured field is `Sync`.

pub mod cfg;
pub mod error;
pub mod field;
pub mod geom2;
pub mod integrate;
pub mod props;
pub mod torsion;

#[cfg(test)]
mod testutil;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::{AnalysisCfg, SorCfg, Tolerances};
pub use error::{CsfError, CsfResult};
pub use field::ContinuousSectionField;
pub use geom2::{Point, Polygon, Section, Topology};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::{AnalysisCfg, SorCfg, Tolerances};
    pub use crate::error::{CsfError, CsfResult};
    pub use crate::field::{
        ContinuousSectionField, FnLaw, LinearLaw, LookupLaw, WeightCtx, WeightLaw, WeightLaws,
    };
    pub use crate::geom2::shapes::{circle, rectangle, regular_polygon, slit_annulus, slit_box};
    pub use crate::geom2::{Point, Polygon, Section, Topology};
    pub use crate::integrate::Station;
    pub use crate::props::{
        section_derived_properties, section_full_analysis, section_full_analysis_with,
        section_properties, DerivedProperties, FullAnalysis, SectionProperties,
    };
    pub use crate::torsion::{torsion_ensemble, TorsionReport};
}
