//! Weight laws: how a polygon's absolute weight varies along the member.
//!
//! A law maps the evaluation context (station, endpoint stations, endpoint
//! weights and polygons) to an absolute weight. The field turns absolute
//! weights into weights relative to the immediate container.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{CsfError, CsfResult};
use crate::geom2::util::lerp;
use crate::geom2::Polygon;

/// Inputs available to a weight law for one polygon at one station.
#[derive(Clone, Copy, Debug)]
pub struct WeightCtx<'a> {
    pub z: f64,
    pub z0: f64,
    pub z1: f64,
    pub w0: f64,
    pub w1: f64,
    pub polygon0: &'a Polygon,
    pub polygon1: &'a Polygon,
    /// Linear tolerance of the owning field; laws compare stations with it.
    pub eps: f64,
}

impl WeightCtx<'_> {
    /// Relative position `(z - z0) / (z1 - z0)`.
    #[inline]
    pub fn tau(&self) -> f64 {
        (self.z - self.z0) / (self.z1 - self.z0)
    }

    /// Build a `WeightLaw` error naming this context's polygon and station.
    pub fn error(&self, reason: impl Into<String>) -> CsfError {
        CsfError::WeightLaw {
            name: self.polygon0.name().to_string(),
            z: self.z,
            reason: reason.into(),
        }
    }
}

/// Absolute weight of a polygon as a function of `z`.
///
/// Laws must be deterministic; errors propagate to the `section(z)` caller.
pub trait WeightLaw: Send + Sync {
    fn weight(&self, ctx: &WeightCtx<'_>) -> CsfResult<f64>;

    /// Short label for logs and `Debug` output.
    fn label(&self) -> &str {
        "custom"
    }
}

/// Linear interpolation between the endpoint weights (the default law).
#[derive(Clone, Copy, Debug, Default)]
pub struct LinearLaw;

impl WeightLaw for LinearLaw {
    fn weight(&self, ctx: &WeightCtx<'_>) -> CsfResult<f64> {
        Ok(lerp(ctx.w0, ctx.w1, ctx.tau()))
    }

    fn label(&self) -> &str {
        "linear"
    }
}

/// Piecewise-linear table `(z, w)` in absolute `z`.
///
/// Stations outside the table range (beyond the field's linear tolerance)
/// are an error rather than an extrapolation.
#[derive(Clone, Debug)]
pub struct LookupLaw {
    table: Vec<(f64, f64)>,
}

impl LookupLaw {
    /// Table must be non-empty, finite and strictly increasing in `z`.
    pub fn new(table: Vec<(f64, f64)>) -> CsfResult<Self> {
        if table.is_empty() {
            return Err(CsfError::InvalidConfig("lookup law needs at least one row".into()));
        }
        if table.iter().any(|(z, w)| !(z.is_finite() && w.is_finite())) {
            return Err(CsfError::InvalidConfig("lookup law rows must be finite".into()));
        }
        if table.windows(2).any(|pair| pair[1].0 <= pair[0].0) {
            return Err(CsfError::InvalidConfig(
                "lookup law z values must be strictly increasing".into(),
            ));
        }
        Ok(Self { table })
    }

    pub fn table(&self) -> &[(f64, f64)] {
        &self.table
    }
}

impl WeightLaw for LookupLaw {
    fn weight(&self, ctx: &WeightCtx<'_>) -> CsfResult<f64> {
        let z = ctx.z;
        let (z_lo, w_lo) = self.table[0];
        let (z_hi, w_hi) = self.table[self.table.len() - 1];
        if z < z_lo - ctx.eps || z > z_hi + ctx.eps {
            return Err(ctx.error(format!("z outside lookup table [{z_lo}, {z_hi}]")));
        }
        if z <= z_lo {
            return Ok(w_lo);
        }
        if z >= z_hi {
            return Ok(w_hi);
        }
        // first row with z_k > z; k >= 1 because z > z_lo
        let k = self.table.partition_point(|(zk, _)| *zk <= z);
        let (za, wa) = self.table[k - 1];
        let (zb, wb) = self.table[k];
        Ok(lerp(wa, wb, (z - za) / (zb - za)))
    }

    fn label(&self) -> &str {
        "lookup"
    }
}

/// User closure as a weight law.
pub struct FnLaw<F>(pub F);

impl<F> FnLaw<F>
where
    F: Fn(&WeightCtx<'_>) -> CsfResult<f64> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> WeightLaw for FnLaw<F>
where
    F: Fn(&WeightCtx<'_>) -> CsfResult<f64> + Send + Sync,
{
    fn weight(&self, ctx: &WeightCtx<'_>) -> CsfResult<f64> {
        (self.0)(ctx)
    }

    fn label(&self) -> &str {
        "closure"
    }
}

/// Weight-law table keyed by 1-based polygon index.
#[derive(Default)]
pub struct WeightLaws {
    laws: BTreeMap<usize, Box<dyn WeightLaw>>,
}

impl WeightLaws {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `law` for the polygon at 1-based `index` (replaces an earlier entry).
    pub fn insert(&mut self, index: usize, law: impl WeightLaw + 'static) {
        self.laws.insert(index, Box::new(law));
    }

    /// Builder form of `insert`.
    pub fn with(mut self, index: usize, law: impl WeightLaw + 'static) -> Self {
        self.insert(index, law);
        self
    }

    /// Law for the 1-based `index`, if any.
    pub fn get(&self, index: usize) -> Option<&dyn WeightLaw> {
        self.laws.get(&index).map(|b| b.as_ref())
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.laws.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.laws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.laws.is_empty()
    }
}

impl fmt::Debug for WeightLaws {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.laws.iter().map(|(k, v)| (k, v.label())))
            .finish()
    }
}
