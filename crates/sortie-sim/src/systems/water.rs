//! Water pickup while the drone's footprint is over a water body.

use tracing::debug;

use sortie_core::constants::WATER_PICKUP_RATE;
use sortie_core::enums::WaterContact;
use sortie_core::events::MissionEvent;
use sortie_core::types::Polygon;
use sortie_geo::WaterSource;

use crate::context::MissionContext;
use crate::state::MissionState;

/// Update the tank from one position sample.
///
/// The tank level is set from the length of the current collection run,
/// capped at the limit. A new run starts counting from zero.
pub fn run(
    ctx: &MissionContext,
    state: &mut MissionState,
    footprint: &Polygon,
    timestamp_ms: u64,
    water: &dyn WaterSource,
) {
    if !water.is_over_water(footprint) {
        if matches!(state.water_contact, WaterContact::Collecting { .. }) {
            debug!(timestamp_ms, water = state.water_quantity, "water collection stopped");
            state.water_contact = WaterContact::NotCollecting;
            state.events.push(MissionEvent::WaterCollectionStopped { timestamp_ms });
        }
        return;
    }

    let since_ms = match state.water_contact {
        WaterContact::Collecting { since_ms } if since_ms <= timestamp_ms => since_ms,
        WaterContact::Collecting { .. } => timestamp_ms,
        WaterContact::NotCollecting => {
            debug!(timestamp_ms, "water collection started");
            state.events.push(MissionEvent::WaterCollectionStarted { timestamp_ms });
            timestamp_ms
        }
    };
    state.water_contact = WaterContact::Collecting { since_ms };

    let was_full = state.water_quantity >= ctx.water_limit;
    let collected = (timestamp_ms - since_ms) as f64 / 1000.0 * WATER_PICKUP_RATE;
    state.water_quantity = collected.min(ctx.water_limit);

    if !was_full && state.water_quantity >= ctx.water_limit {
        debug!(timestamp_ms, "tank full");
        state.events.push(MissionEvent::TankFull);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortie_core::mission::MissionDefinition;
    use sortie_core::types::Coordinate;
    use sortie_geo::{project, NoWater};

    use crate::store::ObjectOfInterestStore;

    fn setup() -> (MissionContext, MissionState) {
        let ring = vec![
            Coordinate::new(-71.0, 42.0),
            Coordinate::new(-70.999, 42.0),
            Coordinate::new(-70.999, 42.001),
        ];
        let (ctx, _) = MissionContext::build(&MissionDefinition::fire(vec![ring])).unwrap();
        (ctx, MissionState::new(ObjectOfInterestStore::default(), 0.0, 0.0))
    }

    fn all_water(_: &Polygon) -> bool {
        true
    }

    fn footprint() -> Polygon {
        project(Coordinate::new(-70.5, 42.5), 5.0)
    }

    #[test]
    fn test_pickup_accumulates_over_run() {
        let (ctx, mut state) = setup();
        run(&ctx, &mut state, &footprint(), 1_000, &all_water);
        assert_eq!(state.water_contact, WaterContact::Collecting { since_ms: 1_000 });
        assert_eq!(state.water_quantity, 0.0);

        run(&ctx, &mut state, &footprint(), 3_500, &all_water);
        assert!((state.water_quantity - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_pickup_caps_at_limit() {
        let (ctx, mut state) = setup();
        run(&ctx, &mut state, &footprint(), 0, &all_water);
        run(&ctx, &mut state, &footprint(), 60_000, &all_water);
        assert_eq!(state.water_quantity, ctx.water_limit);
        run(&ctx, &mut state, &footprint(), 61_000, &all_water);
        let full_events = state
            .events
            .iter()
            .filter(|e| **e == MissionEvent::TankFull)
            .count();
        assert_eq!(full_events, 1);
    }

    #[test]
    fn test_leaving_water_stops_collection() {
        let (ctx, mut state) = setup();
        run(&ctx, &mut state, &footprint(), 0, &all_water);
        run(&ctx, &mut state, &footprint(), 2_000, &all_water);
        run(&ctx, &mut state, &footprint(), 3_000, &NoWater);

        assert_eq!(state.water_contact, WaterContact::NotCollecting);
        assert!((state.water_quantity - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_new_run_restarts_level() {
        let (ctx, mut state) = setup();
        state.water_quantity = 50.0;
        run(&ctx, &mut state, &footprint(), 10_000, &all_water);
        assert_eq!(state.water_quantity, 0.0);
        run(&ctx, &mut state, &footprint(), 11_000, &all_water);
        assert!((state.water_quantity - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_order_sample_reanchors() {
        let (ctx, mut state) = setup();
        run(&ctx, &mut state, &footprint(), 5_000, &all_water);
        run(&ctx, &mut state, &footprint(), 4_000, &all_water);
        assert_eq!(state.water_contact, WaterContact::Collecting { since_ms: 4_000 });
        assert_eq!(state.water_quantity, 0.0);
    }
}
