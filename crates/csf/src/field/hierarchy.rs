//! Immediate-container resolution for nested polygons.
//!
//! A polygon's container is the smallest polygon that fully contains it with
//! no third polygon strictly in between. The table depends only on the
//! reference section, so the field computes it once at construction and
//! stores it as an index → index arena.

use std::collections::BTreeMap;

use crate::error::{CsfError, CsfResult};
use crate::geom2::{point_in_polygon, Polygon, Section};

/// `inner ⊆ outer`: bounding-box prefilter, then every vertex of `inner`
/// inside or on `outer` (tolerance `eps`).
pub fn polygon_contains(outer: &Polygon, inner: &Polygon, eps: f64) -> bool {
    if !outer.bounds().contains_bounds(&inner.bounds(), eps) {
        return false;
    }
    inner
        .vertices()
        .iter()
        .all(|&v| point_in_polygon(v, outer.vertices(), eps))
}

/// Immediate container of polygon `target` within `section`, if any.
pub fn immediate_container(section: &Section, target: usize, eps: f64) -> Option<usize> {
    let polys = section.polygons();
    let inner = polys.get(target)?;
    let candidates: Vec<usize> = (0..polys.len())
        .filter(|&j| j != target && polygon_contains(&polys[j], inner, eps))
        .collect();

    // Drop Q when a smaller candidate R sits between: target ⊂ R ⊂ Q.
    let survivors = candidates.iter().copied().filter(|&q| {
        !candidates.iter().any(|&r| {
            r != q
                && polys[r].area() < polys[q].area()
                && polygon_contains(&polys[q], &polys[r], eps)
        })
    });

    survivors.min_by(|&a, &b| {
        polys[a]
            .area()
            .partial_cmp(&polys[b].area())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    })
}

/// Container table for every polygon; rejects container cycles.
pub(crate) fn container_table(section: &Section, eps: f64) -> CsfResult<Vec<Option<usize>>> {
    let n = section.len();
    let table: Vec<Option<usize>> = (0..n)
        .map(|i| immediate_container(section, i, eps))
        .collect();
    for start in 0..n {
        let mut cur = start;
        let mut steps = 0usize;
        while let Some(next) = table[cur] {
            steps += 1;
            if steps > n {
                return Err(CsfError::WeightCycle(
                    section.polygons()[start].name().to_string(),
                ));
            }
            cur = next;
        }
    }
    Ok(table)
}

/// Container → direct children. Top-level polygons are listed under `None`.
pub fn children_map(table: &[Option<usize>]) -> BTreeMap<Option<usize>, Vec<usize>> {
    let mut map: BTreeMap<Option<usize>, Vec<usize>> = BTreeMap::new();
    for (i, parent) in table.iter().enumerate() {
        map.entry(*parent).or_default().push(i);
    }
    map
}
