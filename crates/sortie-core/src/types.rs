//! Fundamental geographic types.
//!
//! All geometry is planar in (longitude, latitude) degree space. The mission
//! area is small and far from the poles, so no wrap-around handling is done.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::AREA_SCALE_EARTH_RADIUS_KM;

/// A WGS84 geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Both components are finite and within the WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }

    /// Planar vector (x = lon, y = lat).
    pub fn as_dvec2(self) -> DVec2 {
        DVec2::new(self.lon, self.lat)
    }

    pub fn from_dvec2(v: DVec2) -> Self {
        Self { lon: v.x, lat: v.y }
    }

    /// Planar distance in degrees.
    pub fn planar_distance_to(&self, other: &Coordinate) -> f64 {
        self.as_dvec2().distance(other.as_dvec2())
    }
}

/// Axis-aligned bounding box in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Smallest box containing every point. `None` for an empty iterator.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Coordinate>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bbox = Self::new(first.lon, first.lat, first.lon, first.lat);
        for p in iter {
            bbox.min_lon = bbox.min_lon.min(p.lon);
            bbox.min_lat = bbox.min_lat.min(p.lat);
            bbox.max_lon = bbox.max_lon.max(p.lon);
            bbox.max_lat = bbox.max_lat.max(p.lat);
        }
        Some(bbox)
    }

    /// Overlap test. Touching edges count as overlapping.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_lon <= other.max_lon
            && other.min_lon <= self.max_lon
            && self.min_lat <= other.max_lat
            && other.min_lat <= self.max_lat
    }

    pub fn contains(&self, point: &Coordinate) -> bool {
        (self.min_lon..=self.max_lon).contains(&point.lon)
            && (self.min_lat..=self.max_lat).contains(&point.lat)
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            0.5 * self.min_lon + 0.5 * self.max_lon,
            0.5 * self.min_lat + 0.5 * self.max_lat,
        )
    }

    pub fn min_corner(&self) -> Coordinate {
        Coordinate::new(self.min_lon, self.min_lat)
    }

    /// Distance from the center to the min corner (degrees).
    pub fn half_diagonal(&self) -> f64 {
        self.center().planar_distance_to(&self.min_corner())
    }

    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }
}

/// A simple polygon, a set of disjoint pieces, or the placeholder left
/// behind once it has been emptied.
///
/// Rings are stored open: the closing vertex is implied, never repeated.
/// Erosion can pinch one ring into several; those pieces never overlap.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Polygon {
    #[default]
    Empty,
    Ring { vertices: Vec<Coordinate> },
    Multi { rings: Vec<Vec<Coordinate>> },
}

impl Polygon {
    /// Build a polygon from a vertex ring, open or closed.
    ///
    /// Consecutive duplicates and the closing vertex are dropped. Fewer than
    /// three distinct vertices yields `Polygon::Empty`.
    pub fn from_ring(vertices: impl IntoIterator<Item = Coordinate>) -> Self {
        match clean_ring(vertices) {
            Some(vertices) => Polygon::Ring { vertices },
            None => Polygon::Empty,
        }
    }

    /// Build a polygon from disjoint rings. Degenerate rings are dropped; a
    /// single survivor becomes a plain `Ring`.
    pub fn from_rings<R>(rings: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = Coordinate>,
    {
        let mut rings: Vec<Vec<Coordinate>> = rings.into_iter().filter_map(clean_ring).collect();
        match rings.len() {
            0 => Polygon::Empty,
            1 => Polygon::Ring {
                vertices: rings.remove(0),
            },
            _ => Polygon::Multi { rings },
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Polygon::Empty)
    }

    /// Open rings, one per piece. Empty slice for the placeholder.
    pub fn rings(&self) -> &[Vec<Coordinate>] {
        match self {
            Polygon::Empty => &[],
            Polygon::Ring { vertices } => std::slice::from_ref(vertices),
            Polygon::Multi { rings } => rings,
        }
    }

    pub fn piece_count(&self) -> usize {
        self.rings().len()
    }

    pub fn vertex_count(&self) -> usize {
        self.rings().iter().map(Vec::len).sum()
    }

    /// Rings with the first vertex repeated at the end, for display layers.
    pub fn closed_rings(&self) -> Vec<Vec<Coordinate>> {
        self.rings()
            .iter()
            .map(|ring| {
                let mut closed = ring.clone();
                if let Some(first) = ring.first() {
                    closed.push(*first);
                }
                closed
            })
            .collect()
    }

    /// Box around every piece.
    pub fn bbox(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.rings().iter().flatten())
    }

    /// Shoelace area in degree², positive for counter-clockwise rings.
    pub fn signed_area_deg2(&self) -> f64 {
        self.rings()
            .iter()
            .map(|ring| signed_ring_area(&to_dvec2s(ring)))
            .sum()
    }

    /// Unsigned planar area in degree², summed over pieces.
    pub fn area_deg2(&self) -> f64 {
        self.rings()
            .iter()
            .map(|ring| signed_ring_area(&to_dvec2s(ring)).abs())
            .sum()
    }

    /// Planar area scaled by a constant Earth radius into km².
    pub fn area_km2(&self) -> f64 {
        self.area_deg2() * AREA_SCALE_EARTH_RADIUS_KM * AREA_SCALE_EARTH_RADIUS_KM
    }

    /// Point lies inside any piece.
    pub fn contains(&self, point: &Coordinate) -> bool {
        self.rings().iter().any(|ring| ring_contains(ring, point))
    }
}

fn clean_ring(vertices: impl IntoIterator<Item = Coordinate>) -> Option<Vec<Coordinate>> {
    let mut ring: Vec<Coordinate> = Vec::new();
    for v in vertices {
        if ring.last() != Some(&v) {
            ring.push(v);
        }
    }
    while ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    (ring.len() >= 3).then_some(ring)
}

fn to_dvec2s(ring: &[Coordinate]) -> Vec<DVec2> {
    ring.iter().map(|c| c.as_dvec2()).collect()
}

/// Even-odd point-in-ring test.
pub fn ring_contains(ring: &[Coordinate], point: &Coordinate) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (a, b) = (ring[i], ring[j]);
        if (a.lat > point.lat) != (b.lat > point.lat) {
            let cross_lon = a.lon + (point.lat - a.lat) / (b.lat - a.lat) * (b.lon - a.lon);
            if point.lon < cross_lon {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Shoelace area of an open ring, positive for counter-clockwise order.
///
/// Vertices are taken relative to the first one so that small rings far
/// from the origin keep their precision.
pub fn signed_ring_area(ring: &[DVec2]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let origin = ring[0];
    let mut twice = 0.0;
    for i in 1..ring.len() - 1 {
        twice += (ring[i] - origin).perp_dot(ring[i + 1] - origin);
    }
    0.5 * twice
}
