//! Scoring constants and tuning parameters.

// --- Geodesy ---

/// Sphere radius used by the local azimuthal-equidistant projection (meters).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Earth radius (km) used to scale planar degree² areas into km².
/// The latitude-dependent longitude scale is ignored.
pub const AREA_SCALE_EARTH_RADIUS_KM: f64 = 6370.0;

/// Boundary segments used when buffering a point into a circle
/// (16 per quadrant).
pub const CIRCLE_SEGMENTS: usize = 64;

// --- Water ---

/// Rate at which water is picked up while over a water body (units/second).
pub const WATER_PICKUP_RATE: f64 = 10.0;

/// Rate at which water is deposited on fire while in contact (units/second).
pub const WATER_CONSUMPTION_RATE: f64 = 10.0;

/// Default tank capacity.
pub const DEFAULT_WATER_LIMIT: f64 = 100.0;

// --- Fire ---

/// Shrink factor applied per second of fire contact with a full supply.
pub const FIRE_REDUCTION_FACTOR: f64 = 0.05;

/// Polygons eroded below this planar area (degree²) count as extinguished.
/// Roughly one square meter at mid-latitudes.
pub const EXTINGUISHED_AREA_DEG2: f64 = 1e-10;

/// Default fire sensing radius (meters).
pub const DEFAULT_FIRE_SENSING_RADIUS_M: f64 = 5.0;

// --- Search and rescue ---

/// Default radius of the circular marker built around each survivor (meters).
pub const DEFAULT_SURVIVOR_RADIUS_M: f64 = 5.0;

/// Default survivor sensing radius (meters).
pub const DEFAULT_SURVIVOR_SENSING_RADIUS_M: f64 = 25.0;

// --- Mission ---

/// Default mission duration (10 minutes).
pub const DEFAULT_MISSION_DURATION_SECS: f64 = 600.0;

/// Score awarded for a fully extinguished (or fire-free) map.
pub const MAX_FIRE_SCORE: f64 = 100.0;

/// Number of most recent drone positions kept for the flight track.
pub const FLIGHT_TRACK_CAPACITY: usize = 512;
