//! Mission statistics snapshot: the read-only view handed to reporting layers.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::MissionEvent;
use crate::types::Coordinate;

/// Complete mission statistics after the most recent sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissionStats {
    pub map_type: MapType,
    /// Whole seconds since takeoff. Zero before the mission starts.
    pub elapsed_secs: u64,
    /// Whole seconds left in the mission, saturating at zero.
    pub remaining_secs: u64,
    /// Water quantity (fire missions) or percent of survivors found (SAR).
    pub mission_stat: f64,
    /// Last reported drone position, if any.
    pub drone_position: Option<Coordinate>,
    pub status: DroneStatus,
    /// Percent of fire area removed (fire) or survivors found (SAR).
    pub score: f64,
    pub water_quantity: f64,
    pub water_contact: WaterContact,
    pub fire_contact: FireContact,
    pub survivors_found: u32,
    pub total_survivors: u32,
    /// Remaining fire area (km², constant-radius approximation).
    pub fire_area_km2: f64,
    pub starting_fire_area_km2: f64,
    pub objects: Vec<ObjectView>,
    /// Recent drone positions, oldest first.
    pub flight_track: Vec<Coordinate>,
    pub events: Vec<MissionEvent>,
}

/// One object of interest for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectView {
    pub index: usize,
    pub state: ObjectState,
    /// Closed perimeter rings, one per piece. Empty once a fire is
    /// extinguished.
    pub rings: Vec<Vec<Coordinate>>,
}
