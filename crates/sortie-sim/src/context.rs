//! Immutable mission parameters, built once from a `MissionDefinition`.

use tracing::{debug, warn};

use sortie_core::enums::{EmptyFirePolicy, MapType};
use sortie_core::error::MissionError;
use sortie_core::mission::MissionDefinition;
use sortie_core::types::Polygon;
use sortie_geo::project;

use crate::store::ObjectOfInterestStore;

/// Parameters every system reads and none writes.
#[derive(Debug, Clone, PartialEq)]
pub struct MissionContext {
    pub map_type: MapType,
    pub fire_sensing_radius_m: f64,
    pub survivor_sensing_radius_m: f64,
    pub water_limit: f64,
    /// Fire area at initialization (km²). Zero only for a pre-won map.
    pub starting_fire_area_km2: f64,
    pub total_survivors: u32,
    pub mission_duration_secs: f64,
}

impl MissionContext {
    /// Validate the definition and build the context plus the object store.
    pub fn build(
        definition: &MissionDefinition,
    ) -> Result<(MissionContext, ObjectOfInterestStore), MissionError> {
        definition.validate_parameters()?;

        let store = match definition.map_type {
            MapType::FireSuppression => build_fires(definition)?,
            MapType::SearchAndRescue => build_survivors(definition),
        };

        let context = MissionContext {
            map_type: definition.map_type,
            fire_sensing_radius_m: definition.fire_sensing_radius_m,
            survivor_sensing_radius_m: definition.survivor_sensing_radius_m,
            water_limit: definition.water_limit,
            starting_fire_area_km2: store.total_fire_area_km2(),
            total_survivors: store.survivor_entries().count() as u32,
            mission_duration_secs: definition.mission_duration_secs,
        };
        debug!(
            map_type = ?context.map_type,
            objects = store.len(),
            starting_fire_area_km2 = context.starting_fire_area_km2,
            "mission context built"
        );
        Ok((context, store))
    }
}

fn build_fires(definition: &MissionDefinition) -> Result<ObjectOfInterestStore, MissionError> {
    if !definition.survivor_points.is_empty() {
        debug!(
            count = definition.survivor_points.len(),
            "ignoring survivor points on a fire map"
        );
    }

    if definition.fire_rings.is_empty() {
        return match definition.empty_fire_policy {
            EmptyFirePolicy::Reject => Err(MissionError::NoFires),
            EmptyFirePolicy::PreWon => Ok(ObjectOfInterestStore::default()),
        };
    }

    let mut fires = Vec::with_capacity(definition.fire_rings.len());
    for (index, ring) in definition.fire_rings.iter().enumerate() {
        let polygon = Polygon::from_ring(ring.iter().copied());
        if polygon.is_empty() || polygon.area_deg2() == 0.0 {
            return Err(MissionError::DegenerateFireRing { index });
        }
        fires.push(polygon);
    }

    // Every ring has positive area, so the starting total does too.
    Ok(ObjectOfInterestStore::with_fires(fires))
}

fn build_survivors(definition: &MissionDefinition) -> ObjectOfInterestStore {
    if !definition.fire_rings.is_empty() {
        debug!(
            count = definition.fire_rings.len(),
            "ignoring fire rings on a search-and-rescue map"
        );
    }

    let markers: Vec<Polygon> = definition
        .survivor_points
        .iter()
        .map(|p| project(*p, definition.survivor_radius_m))
        .collect();
    if markers.iter().any(Polygon::is_empty) {
        warn!(
            radius_m = definition.survivor_radius_m,
            "survivor markers are empty and can never be found"
        );
    }
    ObjectOfInterestStore::with_survivors(markers)
}
