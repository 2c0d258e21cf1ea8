//! Polygon erosion (negative buffer) used to shrink fire perimeters.
//!
//! The boundary is offset inward with mitered corners. Each vertex moves
//! along its corner bisector so that both adjacent edges travel inward at
//! unit speed, and the offset runs from one event to the next. An edge that
//! shrinks to zero length merges its two vertices. A reflex corner that
//! reaches a non-adjacent edge pinches the ring in two, and each piece goes
//! on alone. The result is empty only once every piece has collapsed.

use glam::DVec2;

use sortie_core::constants::EXTINGUISHED_AREA_DEG2;
use sortie_core::types::{signed_ring_area, Coordinate, Polygon};

/// Corners sharper than this (1 + cos of the turn) are treated as needles
/// and dropped before offsetting.
const NEEDLE_EPSILON: f64 = 1e-9;

/// Edge lengths below this fraction of the ring extent count as collapsed.
const COLLAPSE_RELATIVE_EPSILON: f64 = 1e-9;

/// Slack on the edge parameter when a reflex corner lands on an edge end.
const SPLIT_EDGE_SLACK: f64 = 1e-7;

/// Shrink a polygon toward its interior by `factor` of the distance from
/// its bounding-box center to the bounding-box min corner.
///
/// Returns `Polygon::Empty` once the result is degenerate or smaller than
/// `EXTINGUISHED_AREA_DEG2`. A non-positive or non-finite factor leaves the
/// polygon unchanged.
pub fn shrink(polygon: &Polygon, factor: f64) -> Polygon {
    if !factor.is_finite() || factor <= 0.0 {
        return polygon.clone();
    }
    let Some(bbox) = polygon.bbox() else {
        return Polygon::Empty;
    };
    let eroded = erode(polygon, bbox.half_diagonal() * factor);
    if eroded.area_deg2() < EXTINGUISHED_AREA_DEG2 {
        return Polygon::Empty;
    }
    eroded
}

/// Offset the boundary inward by `distance` (degrees).
///
/// Each piece of the input erodes independently and may split further.
/// Returns `Polygon::Empty` when every piece collapses.
pub fn erode(polygon: &Polygon, distance: f64) -> Polygon {
    if !distance.is_finite() || distance <= 0.0 {
        return polygon.clone();
    }
    let Some(bbox) = polygon.bbox() else {
        return Polygon::Empty;
    };
    let extent = bbox.width().max(bbox.height());
    if !extent.is_finite() || extent <= 0.0 {
        return Polygon::Empty;
    }

    // Offsets run relative to the box corner to keep precision far from
    // the origin.
    let origin = bbox.min_corner().as_dvec2();
    let mut wavefront = Wavefront::new(extent);
    for ring in polygon.rings() {
        let mut local: Vec<DVec2> = ring.iter().map(|c| c.as_dvec2() - origin).collect();
        if signed_ring_area(&local) < 0.0 {
            local.reverse();
        }
        wavefront.push(local, distance);
    }

    Polygon::from_rings(
        wavefront
            .run()
            .into_iter()
            .map(|piece| piece.into_iter().map(move |p| Coordinate::from_dvec2(p + origin))),
    )
}

/// Something that changes the ring topology partway through an offset.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Event {
    /// Edge `edge` shrinks to zero length.
    EdgeCollapse { edge: usize },
    /// Reflex vertex `vertex` lands on the non-adjacent edge `edge`.
    Split { vertex: usize, edge: usize },
}

/// Rings still being offset, each with the distance it has left to travel.
struct Wavefront {
    pending: Vec<(Vec<DVec2>, f64)>,
    pieces: Vec<Vec<DVec2>>,
    extent: f64,
    collapse_eps: f64,
    /// Remaining events. Each one removes a vertex or splits a ring into two
    /// smaller ones, so this is never reached on sane input.
    budget: usize,
}

impl Wavefront {
    fn new(extent: f64) -> Self {
        Self {
            pending: Vec::new(),
            pieces: Vec::new(),
            extent,
            collapse_eps: extent * COLLAPSE_RELATIVE_EPSILON,
            budget: 0,
        }
    }

    fn push(&mut self, ring: Vec<DVec2>, distance: f64) {
        self.budget += 4 * ring.len() + 16;
        self.pending.push((ring, distance));
    }

    fn run(mut self) -> Vec<Vec<DVec2>> {
        while let Some((ring, remaining)) = self.pending.pop() {
            self.offset(ring, remaining);
        }
        self.pieces
    }

    fn offset(&mut self, mut ring: Vec<DVec2>, mut remaining: f64) {
        loop {
            drop_needles(&mut ring, self.collapse_eps);
            if ring.len() < 3 {
                return;
            }

            let velocities = miter_velocities(&ring);
            let event = if self.budget == 0 {
                None
            } else {
                self.budget -= 1;
                next_event(&ring, &velocities)
            };

            match event {
                Some((t, event)) if t < remaining => {
                    advance(&mut ring, &velocities, t);
                    remaining -= t;
                    match event {
                        Event::EdgeCollapse { edge } => merge_edge(&mut ring, edge),
                        Event::Split { vertex, edge } => {
                            let (first, second) = split_ring(&ring, vertex, edge);
                            self.pending.push((first, remaining));
                            ring = second;
                        }
                    }
                    merge_short_edges(&mut ring, self.collapse_eps);
                }
                _ => {
                    advance(&mut ring, &velocities, remaining);
                    if let Some(piece) = finish(ring, self.extent) {
                        self.pieces.push(piece);
                    }
                    return;
                }
            }
        }
    }
}

/// Inward unit normal of the edge `a -> b` for a counter-clockwise ring.
fn inward_normal(a: DVec2, b: DVec2) -> Option<DVec2> {
    (b - a).try_normalize().map(|d| d.perp())
}

/// Per-vertex velocity that moves both adjacent edges inward at unit speed.
fn miter_velocities(ring: &[DVec2]) -> Vec<DVec2> {
    let n = ring.len();
    (0..n)
        .map(|i| {
            let prev = ring[(i + n - 1) % n];
            let next = ring[(i + 1) % n];
            match (inward_normal(prev, ring[i]), inward_normal(ring[i], next)) {
                (Some(n_in), Some(n_out)) => (n_in + n_out) / (1.0 + n_in.dot(n_out)),
                (Some(n), None) | (None, Some(n)) => n,
                (None, None) => DVec2::ZERO,
            }
        })
        .collect()
}

fn is_reflex(ring: &[DVec2], i: usize) -> bool {
    let n = ring.len();
    let prev = ring[(i + n - 1) % n];
    let next = ring[(i + 1) % n];
    (ring[i] - prev).perp_dot(next - ring[i]) < 0.0
}

/// The earliest event and the offset distance at which it happens.
fn next_event(ring: &[DVec2], velocities: &[DVec2]) -> Option<(f64, Event)> {
    let collapse = earliest_collapse(ring, velocities)
        .map(|(edge, t)| (t, Event::EdgeCollapse { edge }));
    let split = earliest_split(ring, velocities)
        .map(|(vertex, edge, t)| (t, Event::Split { vertex, edge }));
    match (collapse, split) {
        (Some(c), Some(s)) => Some(if s.0 < c.0 { s } else { c }),
        (c, s) => c.or(s),
    }
}

/// Edge index and offset distance of the first edge to shrink to zero.
fn earliest_collapse(ring: &[DVec2], velocities: &[DVec2]) -> Option<(usize, f64)> {
    let n = ring.len();
    let mut earliest: Option<(usize, f64)> = None;
    for i in 0..n {
        let j = (i + 1) % n;
        let edge = ring[j] - ring[i];
        let len = edge.length();
        let t = if len == 0.0 {
            0.0
        } else {
            let rate = (velocities[j] - velocities[i]).dot(edge / len);
            if rate >= 0.0 {
                continue;
            }
            len / -rate
        };
        if earliest.map_or(true, |(_, best)| t < best) {
            earliest = Some((i, t));
        }
    }
    earliest
}

/// Reflex vertex, edge index and offset distance of the first reflex corner
/// to run into a non-adjacent edge.
fn earliest_split(ring: &[DVec2], velocities: &[DVec2]) -> Option<(usize, usize, f64)> {
    let n = ring.len();
    let mut earliest: Option<(usize, usize, f64)> = None;
    for r in (0..n).filter(|&r| is_reflex(ring, r)) {
        let (p, v) = (ring[r], velocities[r]);
        for j in 0..n {
            let k = (j + 1) % n;
            if j == r || k == r {
                continue;
            }
            let (a, b) = (ring[j], ring[k]);
            let Some(normal) = inward_normal(a, b) else {
                continue;
            };
            // The edge line moves inward at unit speed; the corner has to
            // start on its inner side and close the gap.
            let gap = normal.dot(p - a);
            let closing = 1.0 - normal.dot(v);
            if gap <= 0.0 || closing <= 0.0 {
                continue;
            }
            let t = gap / closing;
            if earliest.is_some_and(|(_, _, best)| t >= best) {
                continue;
            }

            let (a_t, b_t) = (a + velocities[j] * t, b + velocities[k] * t);
            let edge = b_t - a_t;
            let len_sq = edge.length_squared();
            if len_sq <= 0.0 || edge.dot(b - a) <= 0.0 {
                continue;
            }
            let along = (p + v * t - a_t).dot(edge) / len_sq;
            if (-SPLIT_EDGE_SLACK..=1.0 + SPLIT_EDGE_SLACK).contains(&along) {
                earliest = Some((r, j, t));
            }
        }
    }
    earliest
}

fn advance(ring: &mut [DVec2], velocities: &[DVec2], distance: f64) {
    for (p, v) in ring.iter_mut().zip(velocities) {
        *p += *v * distance;
    }
}

/// Cut the ring where vertex `r` touches edge `j -> j + 1`.
///
/// The first piece runs from `r` forward to `j`, the second from `j + 1`
/// forward to the vertex before `r`. Both start at the touch point.
fn split_ring(ring: &[DVec2], r: usize, j: usize) -> (Vec<DVec2>, Vec<DVec2>) {
    let n = ring.len();
    let walk = |from: usize, to: usize| {
        let mut piece = vec![ring[r]];
        let mut k = from;
        loop {
            piece.push(ring[k]);
            if k == to {
                return piece;
            }
            k = (k + 1) % n;
        }
    };
    (walk((r + 1) % n, j), walk((j + 1) % n, (r + n - 1) % n))
}

/// Replace the two endpoints of edge `i` with their midpoint.
fn merge_edge(ring: &mut Vec<DVec2>, i: usize) {
    let j = (i + 1) % ring.len();
    ring[i] = (ring[i] + ring[j]) * 0.5;
    ring.remove(j);
}

fn merge_short_edges(ring: &mut Vec<DVec2>, eps: f64) {
    let mut i = 0;
    while ring.len() >= 3 && i < ring.len() {
        let j = (i + 1) % ring.len();
        if ring[i].distance(ring[j]) <= eps {
            merge_edge(ring, i);
        } else {
            i += 1;
        }
    }
}

/// Remove zero-length edges and corners that fold back on themselves.
fn drop_needles(ring: &mut Vec<DVec2>, eps: f64) {
    loop {
        merge_short_edges(ring, eps);
        let n = ring.len();
        if n < 3 {
            return;
        }
        let needle = (0..n).find(|&i| {
            let prev = ring[(i + n - 1) % n];
            let next = ring[(i + 1) % n];
            match (inward_normal(prev, ring[i]), inward_normal(ring[i], next)) {
                (Some(a), Some(b)) => 1.0 + a.dot(b) < NEEDLE_EPSILON,
                _ => true,
            }
        });
        match needle {
            Some(i) => {
                ring.remove(i);
            }
            None => return,
        }
    }
}

/// Keep the offset ring unless it has folded to (near) zero area.
fn finish(ring: Vec<DVec2>, extent: f64) -> Option<Vec<DVec2>> {
    if ring.len() < 3 || ring.iter().any(|p| !p.is_finite()) {
        return None;
    }
    if signed_ring_area(&ring) <= extent * extent * COLLAPSE_RELATIVE_EPSILON {
        return None;
    }
    Some(ring)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn square(x: f64, y: f64, side: f64) -> Polygon {
        Polygon::from_ring(vec![
            Coordinate::new(x, y),
            Coordinate::new(x + side, y),
            Coordinate::new(x + side, y + side),
            Coordinate::new(x, y + side),
        ])
    }

    /// Two squares on the x axis joined by a horizontal neck.
    ///
    /// The left lobe is `left` wide and tall, the right lobe `right`. The
    /// neck is `neck_len` long and spans `neck_lo..neck_hi` vertically.
    fn dumbbell(left: f64, right: f64, neck_len: f64, neck_lo: f64, neck_hi: f64) -> Polygon {
        let x1 = left + neck_len;
        Polygon::from_ring(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(left, 0.0),
            Coordinate::new(left, neck_lo),
            Coordinate::new(x1, neck_lo),
            Coordinate::new(x1, 0.0),
            Coordinate::new(x1 + right, 0.0),
            Coordinate::new(x1 + right, right),
            Coordinate::new(x1, right),
            Coordinate::new(x1, neck_hi),
            Coordinate::new(left, neck_hi),
            Coordinate::new(left, left),
            Coordinate::new(0.0, left),
        ])
    }

    fn translate(polygon: &Polygon, dx: f64, dy: f64, scale: f64) -> Polygon {
        Polygon::from_rings(polygon.rings().iter().map(|ring| {
            ring.iter()
                .map(|c| Coordinate::new(dx + c.lon * scale, dy + c.lat * scale))
                .collect::<Vec<_>>()
        }))
    }

    /// Star-shaped ring around a center with per-vertex radii.
    fn star(center: Coordinate, radii: &[f64]) -> Polygon {
        let n = radii.len();
        Polygon::from_ring(radii.iter().enumerate().map(|(i, r)| {
            let theta = std::f64::consts::TAU * i as f64 / n as f64;
            Coordinate::new(center.lon + r * theta.cos(), center.lat + r * theta.sin())
        }))
    }

    #[test]
    fn test_erode_square_is_exact() {
        let eroded = erode(&square(0.0, 0.0, 1.0), 0.1);
        assert!((eroded.area_deg2() - 0.64).abs() < 1e-12);
        let bbox = eroded.bbox().unwrap();
        assert!((bbox.min_lon - 0.1).abs() < 1e-12);
        assert!((bbox.max_lat - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_erode_clockwise_input_shrinks_too() {
        let cw = Polygon::from_ring(square(0.0, 0.0, 1.0).rings()[0].iter().rev().copied());
        let eroded = erode(&cw, 0.1);
        assert!((eroded.area_deg2() - 0.64).abs() < 1e-12);
    }

    #[test]
    fn test_erode_past_inradius_is_empty() {
        assert!(erode(&square(0.0, 0.0, 1.0), 0.5).is_empty());
        assert!(erode(&square(0.0, 0.0, 1.0), 0.75).is_empty());
    }

    #[test]
    fn test_erode_rectangle_collapses_short_edges_first() {
        // 4 x 1 rectangle: the short edges vanish at d = 0.5, leaving a
        // zero-area sliver.
        let rect = Polygon::from_ring(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(4.0, 0.0),
            Coordinate::new(4.0, 1.0),
            Coordinate::new(0.0, 1.0),
        ]);
        let eroded = erode(&rect, 0.25);
        assert!((eroded.area_deg2() - 3.5 * 0.5).abs() < 1e-12);
        assert!(erode(&rect, 0.5).is_empty());
    }

    #[test]
    fn test_erode_concave_l_shape() {
        // L-shape made of three unit squares.
        let l = Polygon::from_ring(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(2.0, 0.0),
            Coordinate::new(2.0, 1.0),
            Coordinate::new(1.0, 1.0),
            Coordinate::new(1.0, 2.0),
            Coordinate::new(0.0, 2.0),
        ]);
        let eroded = erode(&l, 0.1);
        // Mitered offset of an L: (1.8 x 0.8) + (0.8 x 1.0).
        let expected = 1.8 * 0.8 + 0.8 * 1.0;
        assert!(
            (eroded.area_deg2() - expected).abs() < 1e-9,
            "area {} vs {expected}",
            eroded.area_deg2()
        );
    }

    #[test]
    fn test_erode_pinched_neck_leaves_both_lobes() {
        let shape = dumbbell(1.0, 1.0, 0.5, 0.45, 0.55);

        let before_pinch = erode(&shape, 0.02);
        assert_eq!(before_pinch.piece_count(), 1);

        let eroded = erode(&shape, 0.2);
        assert_eq!(eroded.piece_count(), 2);
        assert!(
            (eroded.area_deg2() - 0.72).abs() < 1e-9,
            "area {}",
            eroded.area_deg2()
        );

        let eroded = erode(&shape, 0.3);
        assert!(!eroded.is_empty());
        assert!(
            (eroded.area_deg2() - 0.32).abs() < 1e-9,
            "area {}",
            eroded.area_deg2()
        );
        let bbox = eroded.bbox().unwrap();
        assert!((bbox.min_lon - 0.3).abs() < 1e-9);
        assert!((bbox.max_lon - 2.2).abs() < 1e-9);
    }

    #[test]
    fn test_erode_unequal_lobes_drops_only_the_small_one() {
        let shape = dumbbell(1.0, 0.4, 0.3, 0.15, 0.25);
        let eroded = erode(&shape, 0.25);
        assert_eq!(eroded.piece_count(), 1);
        assert!((eroded.area_deg2() - 0.25).abs() < 1e-9);
        assert!(eroded.bbox().unwrap().max_lon < 1.0);
    }

    #[test]
    fn test_erode_multi_piece_input_erodes_each_piece() {
        let pieces = Polygon::from_rings(vec![
            square(0.0, 0.0, 1.0).rings()[0].clone(),
            square(3.0, 0.0, 0.5).rings()[0].clone(),
        ]);
        let eroded = erode(&pieces, 0.1);
        assert_eq!(eroded.piece_count(), 2);
        assert!((eroded.area_deg2() - (0.64 + 0.09)).abs() < 1e-9);
        assert_eq!(erode(&pieces, 0.3).piece_count(), 1);
    }

    #[test]
    fn test_shrink_fire_sized_dumbbell_keeps_burning() {
        // ~100 m lobes near Boston; the neck pinches well before the lobes
        // burn out.
        let fire = translate(&dumbbell(1.0, 1.0, 0.5, 0.45, 0.55), -71.0, 42.0, 0.001);
        let shrunk = shrink(&fire, 0.19);
        assert_eq!(shrunk.piece_count(), 2);
        assert!(shrunk.area_deg2() > 0.4 * 1e-6);
    }

    #[test]
    fn test_erode_triangle_stays_similar() {
        let tri = Polygon::from_ring(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(3.0, 0.0),
            Coordinate::new(0.0, 4.0),
        ]);
        // Inradius of a 3-4-5 triangle is 1.
        let eroded = erode(&tri, 0.5);
        assert_eq!(eroded.vertex_count(), 3);
        assert!((eroded.area_deg2() - 6.0 * 0.25).abs() < 1e-9);
        assert!(erode(&tri, 1.0).is_empty());
    }

    #[test]
    fn test_non_positive_distance_is_identity() {
        let sq = square(0.0, 0.0, 1.0);
        assert_eq!(erode(&sq, 0.0), sq);
        assert_eq!(erode(&sq, -1.0), sq);
        assert_eq!(erode(&sq, f64::NAN), sq);
    }

    #[test]
    fn test_shrink_uses_bbox_half_diagonal() {
        let sq = square(0.0, 0.0, 1.0);
        // d = 0.1 * sqrt(0.5)
        let d = 0.1 * 0.5_f64.sqrt();
        let expected = (1.0 - 2.0 * d) * (1.0 - 2.0 * d);
        assert!((shrink(&sq, 0.1).area_deg2() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_shrink_empty_stays_empty() {
        assert!(shrink(&Polygon::Empty, 0.5).is_empty());
    }

    #[test]
    fn test_shrink_zero_factor_is_identity() {
        let sq = square(-71.0, 42.0, 0.001);
        assert_eq!(shrink(&sq, 0.0), sq);
    }

    #[test]
    fn test_shrunk_circle_stays_inside_original() {
        let fire = star(Coordinate::new(-71.0, 42.0), &[0.001; 32]);
        let outer = fire.bbox().unwrap();
        let inner = shrink(&fire, 0.3).bbox().unwrap();
        assert!(inner.min_lon > outer.min_lon && inner.max_lon < outer.max_lon);
        assert!(inner.min_lat > outer.min_lat && inner.max_lat < outer.max_lat);
    }

    #[test]
    fn test_repeated_shrink_extinguishes_fire_sized_polygon() {
        // ~100 m square near Boston.
        let mut fire = square(-71.0, 42.0, 0.001);
        let mut calls = 0;
        while !fire.is_empty() {
            fire = shrink(&fire, 0.05);
            calls += 1;
            assert!(calls < 500, "shrinking did not converge");
        }
    }

    proptest! {
        #[test]
        fn prop_erode_narrow_neck_keeps_lobes(
            left in 0.5f64..1.5,
            right in 0.5f64..1.5,
            neck_len in 0.05f64..1.0,
            neck_width in 0.02f64..0.4,
            neck_pos in 0.0f64..1.0,
            depth in 0.02f64..0.45,
        ) {
            let lobe = left.min(right);
            prop_assume!(lobe - neck_width - 0.1 > 0.0);
            let neck_lo = 0.05 + neck_pos * (lobe - neck_width - 0.1);
            let shape = dumbbell(left, right, neck_len, neck_lo, neck_lo + neck_width);
            let d = depth * lobe;

            let before = shape.area_deg2();
            let eroded = erode(&shape, d);
            let after = eroded.area_deg2();
            let lobes = (left - 2.0 * d).powi(2) + (right - 2.0 * d).powi(2);

            prop_assert!(!eroded.is_empty());
            prop_assert!(after < before, "area grew from {} to {}", before, after);
            prop_assert!(after >= lobes - 1e-9, "lost a lobe: {} < {}", after, lobes);
            if d > neck_width / 2.0 + 1e-9 {
                prop_assert_eq!(eroded.piece_count(), 2);
            }
        }

        #[test]
        fn prop_shrink_reduces_area(
            radii in prop::collection::vec(0.0004f64..0.001, 5..12),
            factor in 0.001f64..0.999,
        ) {
            let fire = star(Coordinate::new(-71.0, 42.0), &radii);
            prop_assume!(!fire.is_empty());
            let before = fire.area_deg2();
            let after = shrink(&fire, factor).area_deg2();
            prop_assert!(after < before, "area grew from {} to {}", before, after);
        }
    }
}
