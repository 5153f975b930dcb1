//! Error types for the section field and its property engines.
//!
//! Three families share one enum:
//! - construction-time invariant violations (polygon, section, field);
//! - query-time domain errors (z range, topology, thickness, weight laws,
//!   degenerate torsion inputs);
//! - configuration errors for the numerical solvers.
//!
//! Non-fatal anomalies are not errors; they are `tracing::warn!` events.

use thiserror::Error;

/// Main error type for CSF operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CsfError {
    #[error("invalid polygon '{name}': {reason}")]
    InvalidPolygon { name: String, reason: String },

    #[error("polygon index {index} out of range for {len} polygons")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("duplicate polygon name '{0}' in section")]
    DuplicateName(String),

    #[error("endpoint sections do not match: {0}")]
    CardinalityMismatch(String),

    #[error("z = {z} outside field range [{lo}, {hi}]")]
    ZOutOfRange { z: f64, lo: f64, hi: f64 },

    #[error("polygon '{name}': conflicting topology tags '{tag0}' (z0) and '{tag1}' (z1)")]
    TopologyConflict {
        name: String,
        tag0: String,
        tag1: String,
    },

    #[error("polygon '{name}' at z = {z}: closed cell requires a wall thickness")]
    MissingThickness { name: String, z: f64 },

    #[error("container cycle through polygon '{0}'")]
    WeightCycle(String),

    #[error("weight law for polygon '{name}' at z = {z}: {reason}")]
    WeightLaw { name: String, z: f64, reason: String },

    #[error("degenerate section: {0}")]
    DegenerateSection(String),

    #[error("closed cell '{name}': {reason}")]
    CellReconstruction { name: String, reason: String },

    #[error("torsion grid for '{name}' needs {nodes} nodes (cap {cap})")]
    GridTooLarge {
        name: String,
        nodes: usize,
        cap: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid tag in name '{name}': {reason}")]
    InvalidTag { name: String, reason: String },
}

impl CsfError {
    pub(crate) fn polygon(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPolygon {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn cell(name: &str, reason: impl Into<String>) -> Self {
        Self::CellReconstruction {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for CSF operations.
pub type CsfResult<T> = Result<T, CsfError>;
