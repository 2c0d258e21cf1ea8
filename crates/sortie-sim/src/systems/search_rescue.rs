//! Search and rescue: mark every survivor marker under the sensing footprint.

use tracing::info;

use sortie_core::events::MissionEvent;
use sortie_core::types::Polygon;
use sortie_geo::SpatialIndex;

use crate::context::MissionContext;
use crate::state::MissionState;

pub fn run(ctx: &MissionContext, state: &mut MissionState, footprint: &Polygon) {
    let index = SpatialIndex::build(state.store.survivor_entries());
    for candidate in index.query_polygon(footprint) {
        if state.store.mark_found(candidate) {
            state.survivors_found += 1;
            info!(
                index = candidate,
                found = state.survivors_found,
                total = ctx.total_survivors,
                "survivor found"
            );
            state.events.push(MissionEvent::SurvivorFound { index: candidate });
        }
    }
    state.score = f64::from(state.survivors_found);
}

/// Share of survivors found, in percent. Zero when there are none to find.
pub fn percent_found(found: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    f64::from(found) / f64::from(total) * 100.0
}
