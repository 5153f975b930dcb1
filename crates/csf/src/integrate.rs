//! Longitudinal integration and sampled station tables.
//!
//! Gauss–Legendre rules of order 1..=5 over any sub-interval of the field.
//! A rule of order `n` is exact for polynomials of degree `2n − 1` in `z`;
//! with linear vertex interpolation the area is quadratic and the second
//! moments are quartic in `z`, so order 3 already integrates both exactly
//! for the default linear weight law.

use serde::{Deserialize, Serialize};

use crate::cfg::AnalysisCfg;
use crate::error::{CsfError, CsfResult};
use crate::field::ContinuousSectionField;
use crate::geom2::util::lerp;
use crate::geom2::Section;
use crate::props::{
    section_derived_properties, section_full_analysis_with, section_properties,
    DerivedProperties, FullAnalysis, SectionProperties,
};

/// Highest supported Gauss–Legendre order.
pub const MAX_GAUSS_ORDER: usize = 5;

/// Nodes and weights on `[-1, 1]`.
pub fn gauss_legendre(order: usize) -> CsfResult<&'static [(f64, f64)]> {
    const G1: [(f64, f64); 1] = [(0.0, 2.0)];
    const G2: [(f64, f64); 2] = [(-0.577_350_269_189_625_8, 1.0), (0.577_350_269_189_625_8, 1.0)];
    const G3: [(f64, f64); 3] = [
        (-0.774_596_669_241_483_4, 5.0 / 9.0),
        (0.0, 8.0 / 9.0),
        (0.774_596_669_241_483_4, 5.0 / 9.0),
    ];
    const G4: [(f64, f64); 4] = [
        (-0.861_136_311_594_052_6, 0.347_854_845_137_453_8),
        (-0.339_981_043_584_856_3, 0.652_145_154_862_546_1),
        (0.339_981_043_584_856_3, 0.652_145_154_862_546_1),
        (0.861_136_311_594_052_6, 0.347_854_845_137_453_8),
    ];
    const G5: [(f64, f64); 5] = [
        (-0.906_179_845_938_664_0, 0.236_926_885_056_189_1),
        (-0.538_469_310_105_683_1, 0.478_628_670_499_366_5),
        (0.0, 0.568_888_888_888_888_9),
        (0.538_469_310_105_683_1, 0.478_628_670_499_366_5),
        (0.906_179_845_938_664_0, 0.236_926_885_056_189_1),
    ];
    match order {
        1 => Ok(&G1),
        2 => Ok(&G2),
        3 => Ok(&G3),
        4 => Ok(&G4),
        5 => Ok(&G5),
        _ => Err(CsfError::InvalidConfig(format!(
            "Gauss-Legendre order must be in 1..={MAX_GAUSS_ORDER}, got {order}"
        ))),
    }
}

/// Section properties sampled at one station.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub z: f64,
    #[serde(flatten)]
    pub props: SectionProperties,
    #[serde(flatten)]
    pub derived: DerivedProperties,
}

impl ContinuousSectionField {
    /// `∫ f(section(z)) dz` from `za` to `zb` (signed: swapping bounds flips the sign).
    pub fn integrate<F>(&self, za: f64, zb: f64, order: usize, mut f: F) -> CsfResult<f64>
    where
        F: FnMut(&Section) -> CsfResult<f64>,
    {
        let rule = gauss_legendre(order)?;
        let mid = 0.5 * (za + zb);
        let half = 0.5 * (zb - za);
        let mut acc = 0.0;
        for &(x, w) in rule {
            let s = self.section(mid + half * x)?;
            acc += w * f(&s)?;
        }
        Ok(acc * half)
    }

    /// Member volume `∫ A dz` over the whole field (weighted area, so a
    /// stiffness-weighted field yields an equivalent volume).
    pub fn volume(&self) -> CsfResult<f64> {
        let (lo, hi) = (self.z0().min(self.z1()), self.z0().max(self.z1()));
        self.integrate(lo, hi, MAX_GAUSS_ORDER, |s| section_properties(s).map(|p| p.a))
    }

    fn station_zs(&self, n: usize) -> CsfResult<Vec<f64>> {
        if n < 2 {
            return Err(CsfError::InvalidConfig(format!(
                "a station table needs at least 2 stations, got {n}"
            )));
        }
        let last = (n - 1) as f64;
        Ok((0..n)
            .map(|k| lerp(self.z0(), self.z1(), k as f64 / last))
            .collect())
    }

    /// Properties at `n` equally spaced stations from `z0` to `z1` inclusive.
    pub fn station_table(&self, n: usize) -> CsfResult<Vec<Station>> {
        self.station_zs(n)?
            .into_iter()
            .map(|z| {
                let props = section_properties(&self.section(z)?)?;
                let derived = section_derived_properties(&props)?;
                Ok(Station { z, props, derived })
            })
            .collect()
    }

    /// Full analysis (including torsion) at `n` equally spaced stations.
    pub fn analysis_table(&self, n: usize, cfg: &AnalysisCfg) -> CsfResult<Vec<FullAnalysis>> {
        self.station_zs(n)?
            .into_iter()
            .map(|z| section_full_analysis_with(&self.section(z)?, cfg))
            .collect()
    }
}
