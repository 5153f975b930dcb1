//! Estimator E: Prandtl stress function on a masked grid, solved by SOR.
//!
//! Grid
//! - Cell-centred nodes over the polygon's bounding box, padded by
//!   `pad_cells` on each side plus one ghost ring that is never updated.
//! - Spacing `h = min(long/cells_long, short/cells_short_min)` so slender
//!   shapes still get `cells_short_min` cells across their thickness.
//! - Nodes inside the polygon (inclusive boundary) are unknowns; all others
//!   hold `ψ = 0`.
//!
//! Solve `∇²ψ = −2` with the 5-point stencil, then `J = 2·Σψ·h²`. Where a
//! stencil arm leaves the polygon it is shortened to the boundary crossing
//! (Shortley–Weller), so `ψ = 0` sits on the polygon edges rather than at the
//! next node and the estimate is second order in `h`.
//! The node count is checked against `max_nodes` before anything is
//! allocated; the sweep count is capped by `max_iter`.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cfg::{SorCfg, REL_LIN};
use crate::error::{CsfError, CsfResult};
use crate::geom2::util::edges;
use crate::geom2::{point_in_polygon, Point, Polygon, Section, Topology};

/// Shortest stencil arm as a fraction of `h`; nodes on the boundary get ψ ≈ 0.
const MIN_ARM: f64 = 1e-6;

/// Result for one polygon.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoissonTorsion {
    pub j: f64,
    /// Grid spacing.
    pub h: f64,
    /// Grid size including padding and ghost ring.
    pub nx: usize,
    pub ny: usize,
    pub interior_nodes: usize,
    pub iterations: usize,
    /// Largest nodal update of the last sweep.
    pub max_update: f64,
    pub converged: bool,
}

/// Weighted grid estimate over the solid polygons of a section.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectionPoisson {
    pub j: f64,
    /// Number of polygons solved.
    pub solved: usize,
    /// False when any polygon hit the iteration cap.
    pub converged: bool,
}

struct Grid {
    nx: usize,
    ny: usize,
    h: f64,
    origin: Point,
}

impl Grid {
    fn plan(poly: &Polygon, cfg: &SorCfg) -> CsfResult<Grid> {
        let b = poly.bounds();
        let (w, ht) = (b.width(), b.height());
        let long = w.max(ht);
        let short = w.min(ht);
        let h = (long / cfg.cells_long as f64).min(short / cfg.cells_short_min as f64);
        if !(h.is_finite() && h > 0.0) {
            return Err(CsfError::DegenerateSection(format!(
                "polygon '{}' has no extent for a torsion grid",
                poly.name()
            )));
        }
        // ceil with slack so an exact multiple of h does not gain a column
        let cells = |len: f64| (len / h - REL_LIN * (len / h).max(1.0)).ceil().max(1.0);
        let extra = 2.0 * (cfg.pad_cells as f64 + 1.0);
        let (cx, cy) = (cells(w), cells(ht));
        let nodes = (cx + extra) * (cy + extra);
        if nodes > cfg.max_nodes as f64 {
            return Err(CsfError::GridTooLarge {
                name: poly.name().to_string(),
                nodes: nodes as usize, // saturating
                cap: cfg.max_nodes,
            });
        }
        let nx = (cx + extra) as usize;
        let ny = (cy + extra) as usize;
        // centre the core cells on the bounding box
        let off = Point::new(0.5 * (cx * h - w), 0.5 * (cy * h - ht));
        let shift = (cfg.pad_cells as f64 + 1.0) * h;
        let origin = b.min - off - Point::new(shift, shift);
        Ok(Grid { nx, ny, h, origin })
    }

    #[inline]
    fn center(&self, i: usize, j: usize) -> Point {
        self.origin + Point::new((i as f64 + 0.5) * self.h, (j as f64 + 0.5) * self.h)
    }
}

/// Unknown node with its Shortley–Weller stencil for `∇²ψ = −2`, scaled by
/// `h²/2`: `diag·ψ = Σ coef·ψ_neighbour + h²`.
struct Node {
    k: usize,
    /// East, west, north, south; zero where the arm ends on the boundary.
    coef: [f64; 4],
    diag: f64,
}

impl Node {
    fn new(k: usize, grid: &Grid, inside: &[bool], poly: &Polygon) -> Node {
        let (i, j) = (k % grid.nx, k / grid.nx);
        let from = grid.center(i, j);
        let h = grid.h;
        let arm = |nb: usize, step: Point| {
            if inside[nb] {
                (1.0, true)
            } else {
                (boundary_fraction(from, step, poly.vertices()), false)
            }
        };
        let (a, ea) = arm(k + 1, Point::new(h, 0.0));
        let (b, eb) = arm(k - 1, Point::new(-h, 0.0));
        let (c, ec) = arm(k + grid.nx, Point::new(0.0, h));
        let (d, ed) = arm(k - grid.nx, Point::new(0.0, -h));
        let pick = |keep: bool, v: f64| if keep { v } else { 0.0 };
        Node {
            k,
            coef: [
                pick(ea, 1.0 / (a * (a + b))),
                pick(eb, 1.0 / (b * (a + b))),
                pick(ec, 1.0 / (c * (c + d))),
                pick(ed, 1.0 / (d * (c + d))),
            ],
            diag: 1.0 / (a * b) + 1.0 / (c * d),
        }
    }
}

/// Fraction `t ∈ [MIN_ARM, 1]` of `from → from + step` before the first
/// crossing of the closed loop `pts`; 1 when the segment never crosses it.
fn boundary_fraction(from: Point, step: Point, pts: &[Point]) -> f64 {
    let mut t_min: f64 = 1.0;
    for (a, b) in edges(pts) {
        let e = b - a;
        let denom = step.x * e.y - step.y * e.x;
        if denom == 0.0 {
            continue;
        }
        let d = a - from;
        let t = (d.x * e.y - d.y * e.x) / denom;
        let u = (d.x * step.y - d.y * step.x) / denom;
        if (0.0..t_min).contains(&t) && (0.0..=1.0).contains(&u) {
            t_min = t;
        }
    }
    t_min.max(MIN_ARM)
}

/// Optimal SOR factor for the model problem on an `n`-node square grid.
#[inline]
pub fn optimal_omega(n: usize) -> f64 {
    2.0 / (1.0 + (PI / n.max(2) as f64).sin())
}

/// Unweighted torsion constant of one polygon by the grid solver.
pub fn poisson_torsion(poly: &Polygon, cfg: &SorCfg) -> CsfResult<PoissonTorsion> {
    cfg.validate()?;
    let grid = Grid::plan(poly, cfg)?;
    let (nx, ny, h) = (grid.nx, grid.ny, grid.h);
    let eps = REL_LIN * poly.bounds().width().max(poly.bounds().height());

    let mut inside = vec![false; nx * ny];
    for j in 1..ny - 1 {
        for i in 1..nx - 1 {
            inside[j * nx + i] = point_in_polygon(grid.center(i, j), poly.vertices(), eps);
        }
    }
    let interior: Vec<Node> = (0..nx * ny)
        .filter(|&k| inside[k])
        .map(|k| Node::new(k, &grid, &inside, poly))
        .collect();
    if interior.is_empty() {
        return Err(CsfError::DegenerateSection(format!(
            "polygon '{}' covers no grid node at h = {h:e}",
            poly.name()
        )));
    }

    let omega = cfg.omega.unwrap_or_else(|| optimal_omega(nx.max(ny)));
    let rhs = h * h;
    let mut psi = vec![0.0_f64; nx * ny];
    let mut iterations = 0;
    let mut max_update = f64::INFINITY;
    let mut converged = false;
    while iterations < cfg.max_iter {
        iterations += 1;
        max_update = 0.0;
        let mut psi_max: f64 = 0.0;
        for node in &interior {
            let k = node.k;
            let [e, w, n, s] = node.coef;
            let gs = (e * psi[k + 1] + w * psi[k - 1] + n * psi[k + nx] + s * psi[k - nx] + rhs)
                / node.diag;
            let delta = omega * (gs - psi[k]);
            psi[k] += delta;
            max_update = max_update.max(delta.abs());
            psi_max = psi_max.max(psi[k].abs());
        }
        if max_update <= cfg.tol * psi_max.max(f64::MIN_POSITIVE) {
            converged = true;
            break;
        }
    }

    let j = 2.0 * h * h * interior.iter().map(|node| psi[node.k]).sum::<f64>();
    if converged {
        debug!(
            polygon = poly.name(),
            nx,
            ny,
            iterations,
            j,
            "SOR torsion solve converged"
        );
    } else {
        warn!(
            polygon = poly.name(),
            nx,
            ny,
            iterations,
            max_update,
            "SOR torsion solve hit the iteration cap; reporting the last iterate"
        );
    }
    Ok(PoissonTorsion {
        j,
        h,
        nx,
        ny,
        interior_nodes: interior.len(),
        iterations,
        max_update,
        converged,
    })
}

/// Weighted sum over `Plain` and `Closed` polygons with non-zero weight.
pub fn poisson_torsion_section(section: &Section, cfg: &SorCfg) -> CsfResult<SectionPoisson> {
    let mut out = SectionPoisson {
        j: 0.0,
        solved: 0,
        converged: true,
    };
    for p in section.polygons() {
        let solid = matches!(p.topology(), Topology::Plain | Topology::Closed { .. });
        if !solid || p.weight() == 0.0 {
            continue;
        }
        let r = poisson_torsion(p, cfg)?;
        out.j += p.weight() * r.j;
        out.solved += 1;
        out.converged &= r.converged;
    }
    Ok(out)
}
