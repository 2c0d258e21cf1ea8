//! Water-region predicate.
//!
//! The engine only needs to know whether the drone's footprint currently
//! overlaps water. Map data can come from configured polygons, a closure in
//! tests, or nothing at all.

use sortie_core::types::{ring_contains, Coordinate, Polygon};

use crate::index::SpatialIndex;

/// Answers whether a footprint overlaps any water body.
pub trait WaterSource {
    fn is_over_water(&self, footprint: &Polygon) -> bool;
}

/// A map without water. Tank never fills.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWater;

impl WaterSource for NoWater {
    fn is_over_water(&self, _footprint: &Polygon) -> bool {
        false
    }
}

impl<F> WaterSource for F
where
    F: Fn(&Polygon) -> bool,
{
    fn is_over_water(&self, footprint: &Polygon) -> bool {
        self(footprint)
    }
}

/// Static set of water polygons with a bounding-box index.
#[derive(Debug, Clone, Default)]
pub struct WaterBodies {
    bodies: Vec<Polygon>,
    index: SpatialIndex,
}

impl WaterBodies {
    pub fn new(bodies: Vec<Polygon>) -> Self {
        let index = SpatialIndex::build(bodies.iter().enumerate());
        Self { bodies, index }
    }

    /// Build from raw vertex rings. Degenerate rings are kept as empty
    /// polygons and never match.
    pub fn from_rings(rings: &[Vec<Coordinate>]) -> Self {
        Self::new(
            rings
                .iter()
                .map(|ring| Polygon::from_ring(ring.iter().copied()))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl WaterSource for WaterBodies {
    fn is_over_water(&self, footprint: &Polygon) -> bool {
        self.index
            .query_polygon(footprint)
            .into_iter()
            .any(|i| polygons_intersect(footprint, &self.bodies[i]))
    }
}

/// Exact overlap test for two simple polygons.
///
/// True if either contains a vertex of the other or any pair of edges
/// crosses. Touching boundaries count.
pub fn polygons_intersect(a: &Polygon, b: &Polygon) -> bool {
    let (Some(ba), Some(bb)) = (a.bbox(), b.bbox()) else {
        return false;
    };
    if !ba.intersects(&bb) {
        return false;
    }

    a.rings()
        .iter()
        .any(|ra| b.rings().iter().any(|rb| rings_intersect(ra, rb)))
}

fn rings_intersect(a: &[Coordinate], b: &[Coordinate]) -> bool {
    if a.iter().any(|p| ring_contains(b, p)) || b.iter().any(|p| ring_contains(a, p)) {
        return true;
    }
    edges(a).any(|(p1, p2)| edges(b).any(|(q1, q2)| segments_intersect(p1, p2, q1, q2)))
}

fn edges(ring: &[Coordinate]) -> impl Iterator<Item = (Coordinate, Coordinate)> + '_ {
    ring.iter()
        .zip(ring.iter().cycle().skip(1))
        .map(|(a, b)| (*a, *b))
}

fn orientation(a: Coordinate, b: Coordinate, c: Coordinate) -> f64 {
    (b.as_dvec2() - a.as_dvec2()).perp_dot(c.as_dvec2() - a.as_dvec2())
}

/// `p` lies within the bounding box of segment `a`-`b`.
fn on_segment(a: Coordinate, b: Coordinate, p: Coordinate) -> bool {
    p.lon >= a.lon.min(b.lon)
        && p.lon <= a.lon.max(b.lon)
        && p.lat >= a.lat.min(b.lat)
        && p.lat <= a.lat.max(b.lat)
}

fn segments_intersect(p1: Coordinate, p2: Coordinate, q1: Coordinate, q2: Coordinate) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}
