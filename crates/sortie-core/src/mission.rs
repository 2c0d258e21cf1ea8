//! Static mission definition, consumed once at initialization.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::{EmptyFirePolicy, MapType};
use crate::error::MissionError;
use crate::types::{BoundingBox, Coordinate};

/// Everything needed to start a mission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionDefinition {
    #[serde(default)]
    pub name: String,
    pub map_type: MapType,
    /// Map window. Informational for display layers.
    #[serde(default)]
    pub bounds: BoundingBox,
    /// Fire perimeters as vertex rings (fire missions).
    #[serde(default)]
    pub fire_rings: Vec<Vec<Coordinate>>,
    /// Survivor locations (search-and-rescue missions).
    #[serde(default)]
    pub survivor_points: Vec<Coordinate>,
    #[serde(default = "default_water_limit")]
    pub water_limit: f64,
    /// Radius of the marker circle built around each survivor point.
    #[serde(default = "default_survivor_radius")]
    pub survivor_radius_m: f64,
    #[serde(default = "default_fire_sensing_radius")]
    pub fire_sensing_radius_m: f64,
    #[serde(default = "default_survivor_sensing_radius")]
    pub survivor_sensing_radius_m: f64,
    #[serde(default = "default_mission_duration")]
    pub mission_duration_secs: f64,
    #[serde(default)]
    pub empty_fire_policy: EmptyFirePolicy,
}

fn default_water_limit() -> f64 {
    DEFAULT_WATER_LIMIT
}

fn default_survivor_radius() -> f64 {
    DEFAULT_SURVIVOR_RADIUS_M
}

fn default_fire_sensing_radius() -> f64 {
    DEFAULT_FIRE_SENSING_RADIUS_M
}

fn default_survivor_sensing_radius() -> f64 {
    DEFAULT_SURVIVOR_SENSING_RADIUS_M
}

fn default_mission_duration() -> f64 {
    DEFAULT_MISSION_DURATION_SECS
}

impl MissionDefinition {
    /// A fire mission over the given rings with default parameters.
    pub fn fire(fire_rings: Vec<Vec<Coordinate>>) -> Self {
        Self {
            name: String::new(),
            map_type: MapType::FireSuppression,
            bounds: BoundingBox::default(),
            fire_rings,
            survivor_points: Vec::new(),
            water_limit: DEFAULT_WATER_LIMIT,
            survivor_radius_m: DEFAULT_SURVIVOR_RADIUS_M,
            fire_sensing_radius_m: DEFAULT_FIRE_SENSING_RADIUS_M,
            survivor_sensing_radius_m: DEFAULT_SURVIVOR_SENSING_RADIUS_M,
            mission_duration_secs: DEFAULT_MISSION_DURATION_SECS,
            empty_fire_policy: EmptyFirePolicy::default(),
        }
    }

    /// A search-and-rescue mission over the given survivor points.
    pub fn search_and_rescue(survivor_points: Vec<Coordinate>) -> Self {
        Self {
            map_type: MapType::SearchAndRescue,
            fire_rings: Vec::new(),
            survivor_points,
            ..Self::fire(Vec::new())
        }
    }

    /// Check scalar parameters and coordinates.
    ///
    /// Ring geometry is checked when the object store is built, since it
    /// depends on the computed areas.
    pub fn validate_parameters(&self) -> Result<(), MissionError> {
        let non_negative = [
            ("water_limit", self.water_limit),
            ("survivor_radius_m", self.survivor_radius_m),
            ("fire_sensing_radius_m", self.fire_sensing_radius_m),
            ("survivor_sensing_radius_m", self.survivor_sensing_radius_m),
            ("mission_duration_secs", self.mission_duration_secs),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(MissionError::InvalidParameter { name, value });
            }
        }

        let points = self
            .fire_rings
            .iter()
            .flatten()
            .chain(self.survivor_points.iter());
        for p in points {
            if !p.is_valid() {
                return Err(MissionError::InvalidCoordinate {
                    lon: p.lon,
                    lat: p.lat,
                });
            }
        }
        Ok(())
    }
}
