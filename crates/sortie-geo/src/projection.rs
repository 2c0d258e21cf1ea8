//! Local azimuthal-equidistant projection and circular footprints.
//!
//! Distances and azimuths from the projection center are preserved exactly
//! on the sphere, so a disc of radius `r` in the local plane maps back to a
//! geodesic circle of radius `r` on the ground.

use std::f64::consts::TAU;

use glam::DVec2;

use sortie_core::constants::{CIRCLE_SEGMENTS, EARTH_RADIUS_M};
use sortie_core::types::{Coordinate, Polygon};

/// Below this angular distance (radians) a point is treated as the center.
const CENTER_EPSILON: f64 = 1e-15;

/// Spherical azimuthal-equidistant projection anchored at a center point.
///
/// The center maps to local origin (0, 0).
/// x = East, y = North, both in meters.
#[derive(Debug, Clone)]
pub struct AzimuthalProjection {
    center: Coordinate,
    lon0: f64,
    sin_lat0: f64,
    cos_lat0: f64,
}

impl AzimuthalProjection {
    /// Create a new projection centered at the given coordinate (degrees).
    pub fn new(center: Coordinate) -> Self {
        let lat0 = center.lat.to_radians();
        Self {
            center,
            lon0: center.lon.to_radians(),
            sin_lat0: lat0.sin(),
            cos_lat0: lat0.cos(),
        }
    }

    pub fn center(&self) -> Coordinate {
        self.center
    }

    /// Convert a geographic coordinate to local meters.
    pub fn to_local(&self, coord: Coordinate) -> DVec2 {
        let lat = coord.lat.to_radians();
        let dlon = coord.lon.to_radians() - self.lon0;
        let (sin_lat, cos_lat) = lat.sin_cos();
        let cos_dlon = dlon.cos();

        let cos_c = (self.sin_lat0 * sin_lat + self.cos_lat0 * cos_lat * cos_dlon).clamp(-1.0, 1.0);
        let c = cos_c.acos();
        let k = if c < CENTER_EPSILON { 1.0 } else { c / c.sin() };

        DVec2::new(
            EARTH_RADIUS_M * k * cos_lat * dlon.sin(),
            EARTH_RADIUS_M * k * (self.cos_lat0 * sin_lat - self.sin_lat0 * cos_lat * cos_dlon),
        )
    }

    /// Convert local meters back to a geographic coordinate.
    pub fn to_geo(&self, local: DVec2) -> Coordinate {
        let rho = local.length();
        if rho / EARTH_RADIUS_M < CENTER_EPSILON {
            return self.center;
        }
        let c = rho / EARTH_RADIUS_M;
        let (sin_c, cos_c) = c.sin_cos();

        let lat = (cos_c * self.sin_lat0 + local.y * sin_c * self.cos_lat0 / rho)
            .clamp(-1.0, 1.0)
            .asin();
        let lon = self.lon0
            + (local.x * sin_c).atan2(rho * self.cos_lat0 * cos_c - local.y * self.sin_lat0 * sin_c);

        Coordinate::new(lon.to_degrees(), lat.to_degrees())
    }
}

/// Approximate a geodesic circle of `radius_m` around `center`.
///
/// Returns a counter-clockwise ring of `CIRCLE_SEGMENTS` vertices. A zero,
/// negative or non-finite radius, or a non-finite center, yields
/// `Polygon::Empty`, which never intersects anything.
pub fn project(center: Coordinate, radius_m: f64) -> Polygon {
    if !radius_m.is_finite() || radius_m <= 0.0 || !center.is_valid() {
        return Polygon::Empty;
    }

    let proj = AzimuthalProjection::new(center);
    Polygon::from_ring((0..CIRCLE_SEGMENTS).map(|i| {
        let theta = TAU * i as f64 / CIRCLE_SEGMENTS as f64;
        proj.to_geo(DVec2::new(radius_m * theta.cos(), radius_m * theta.sin()))
    }))
}
