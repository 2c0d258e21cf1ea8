//! Snapshot system: builds `MissionStats` from the mission state.
//!
//! Read-only apart from the events, which the caller drains and hands in.

use sortie_core::enums::MapType;
use sortie_core::events::MissionEvent;
use sortie_core::state::{MissionStats, ObjectView};

use crate::context::MissionContext;
use crate::state::MissionState;
use crate::systems::search_rescue::percent_found;

/// Build a complete `MissionStats` from the current state.
pub fn build_snapshot(
    ctx: &MissionContext,
    state: &MissionState,
    events: Vec<MissionEvent>,
) -> MissionStats {
    let elapsed_secs = state.elapsed_secs();

    MissionStats {
        map_type: ctx.map_type,
        elapsed_secs,
        remaining_secs: remaining_secs(ctx.mission_duration_secs, elapsed_secs),
        mission_stat: mission_stat(ctx, state),
        drone_position: state.last_position,
        status: state.status,
        score: state.score,
        water_quantity: state.water_quantity,
        water_contact: state.water_contact,
        fire_contact: state.fire_contact,
        survivors_found: state.survivors_found,
        total_survivors: ctx.total_survivors,
        fire_area_km2: state.fire_area_km2,
        starting_fire_area_km2: ctx.starting_fire_area_km2,
        objects: build_objects(state),
        flight_track: state.flight_track.iter().copied().collect(),
        events,
    }
}

fn remaining_secs(duration_secs: f64, elapsed_secs: u64) -> u64 {
    (duration_secs - elapsed_secs as f64).floor().max(0.0) as u64
}

/// Water quantity for fire missions, percent found for search and rescue.
fn mission_stat(ctx: &MissionContext, state: &MissionState) -> f64 {
    match ctx.map_type {
        MapType::FireSuppression => state.water_quantity,
        MapType::SearchAndRescue => percent_found(state.survivors_found, ctx.total_survivors),
    }
}

fn build_objects(state: &MissionState) -> Vec<ObjectView> {
    state
        .store
        .iter()
        .map(|o| ObjectView {
            index: o.index,
            state: o.state,
            rings: o.polygon.closed_rings(),
        })
        .collect()
}
