//! Fire suppression: deposit water on every fire under the drone.
//!
//! Contact is re-anchored on every sample, so credit only accrues for the
//! time between two consecutive samples that both touch a fire.

use std::collections::BTreeSet;

use tracing::{debug, info};

use sortie_core::constants::{FIRE_REDUCTION_FACTOR, MAX_FIRE_SCORE, WATER_CONSUMPTION_RATE};
use sortie_core::enums::FireContact;
use sortie_core::events::MissionEvent;
use sortie_core::types::Polygon;
use sortie_geo::SpatialIndex;

use crate::context::MissionContext;
use crate::state::MissionState;
use crate::store::ShrinkOutcome;

/// Apply one position sample to the fire state and refresh the score.
pub fn run(ctx: &MissionContext, state: &mut MissionState, footprint: &Polygon, timestamp_ms: u64) {
    // Rebuilt per sample; fine for the handful of fires on a mission map.
    let index = SpatialIndex::build(state.store.alive_fire_entries());
    let candidates = index.query_polygon(footprint);

    if !candidates.is_empty() && state.water_quantity > 0.0 {
        let since_ms = match state.fire_contact {
            FireContact::InContact { since_ms } => since_ms,
            FireContact::NoContact => {
                debug!(timestamp_ms, fires = candidates.len(), "fire contact started");
                state.events.push(MissionEvent::FireContactStarted { timestamp_ms });
                timestamp_ms
            }
        };
        if timestamp_ms > since_ms {
            let elapsed_secs = (timestamp_ms - since_ms) as f64 / 1000.0;
            deposit(state, &candidates, elapsed_secs);
        }
        state.fire_contact = FireContact::InContact {
            since_ms: timestamp_ms,
        };
    } else if matches!(state.fire_contact, FireContact::InContact { .. }) {
        debug!(timestamp_ms, "fire contact lost");
        state.fire_contact = FireContact::NoContact;
        state.events.push(MissionEvent::FireContactLost { timestamp_ms });
    }

    state.fire_area_km2 = state.store.total_fire_area_km2();
    state.score = fire_score(ctx.starting_fire_area_km2, state.fire_area_km2);
}

/// Spend water on each candidate fire in index order.
///
/// With enough water a fire shrinks by `FIRE_REDUCTION_FACTOR` per second of
/// contact. Otherwise whatever is left is spent and the shrink is scaled by
/// the fraction of demand it covered.
fn deposit(state: &mut MissionState, candidates: &BTreeSet<usize>, elapsed_secs: f64) {
    let demand = elapsed_secs * WATER_CONSUMPTION_RATE;
    let had_water = state.water_quantity > 0.0;

    for &index in candidates {
        let factor = if state.water_quantity > demand {
            state.water_quantity -= demand;
            FIRE_REDUCTION_FACTOR * elapsed_secs
        } else {
            let factor = state.water_quantity / demand * FIRE_REDUCTION_FACTOR;
            state.water_quantity = 0.0;
            factor
        };

        match state.store.shrink(index, factor) {
            ShrinkOutcome::Shrunk => {
                state.events.push(MissionEvent::FireShrunk { index, factor });
            }
            ShrinkOutcome::Extinguished => {
                info!(index, "fire extinguished");
                state.events.push(MissionEvent::FireExtinguished { index });
            }
            ShrinkOutcome::Unchanged => {}
        }
    }

    if had_water && state.water_quantity == 0.0 {
        debug!("tank empty");
        state.events.push(MissionEvent::TankEmpty);
    }
}

/// Percent of the starting fire area that has been put out.
pub fn fire_score(starting_area_km2: f64, current_area_km2: f64) -> f64 {
    if starting_area_km2 == 0.0 {
        return MAX_FIRE_SCORE;
    }
    MAX_FIRE_SCORE * (1.0 - current_area_km2 / starting_area_km2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortie_core::mission::MissionDefinition;
    use sortie_core::types::Coordinate;
    use sortie_geo::project;

    const FIRE_CENTER: Coordinate = Coordinate {
        lon: -70.9995,
        lat: 42.0005,
    };

    fn setup(water: f64) -> (MissionContext, MissionState) {
        let ring = vec![
            Coordinate::new(-71.0, 42.0),
            Coordinate::new(-70.999, 42.0),
            Coordinate::new(-70.999, 42.001),
            Coordinate::new(-71.0, 42.001),
        ];
        let (ctx, store) = MissionContext::build(&MissionDefinition::fire(vec![ring])).unwrap();
        let mut state = MissionState::new(store, ctx.starting_fire_area_km2, 0.0);
        state.water_quantity = water;
        (ctx, state)
    }

    fn over_fire() -> Polygon {
        project(FIRE_CENTER, 5.0)
    }

    #[test]
    fn test_first_contact_only_anchors() {
        let (ctx, mut state) = setup(100.0);
        run(&ctx, &mut state, &over_fire(), 1_000);
        assert_eq!(state.fire_contact, FireContact::InContact { since_ms: 1_000 });
        assert_eq!(state.water_quantity, 100.0);
        assert_eq!(state.fire_area_km2, ctx.starting_fire_area_km2);
        assert_eq!(state.score, 0.0);
    }

    #[test]
    fn test_full_supply_shrinks_by_elapsed() {
        let (ctx, mut state) = setup(100.0);
        run(&ctx, &mut state, &over_fire(), 0);
        run(&ctx, &mut state, &over_fire(), 1_000);

        assert!((state.water_quantity - 90.0).abs() < 1e-12);
        assert!(state.fire_area_km2 < ctx.starting_fire_area_km2);
        assert!(state.score > 0.0);
        assert!(state.events.contains(&MissionEvent::FireShrunk {
            index: 0,
            factor: FIRE_REDUCTION_FACTOR,
        }));
    }

    #[test]
    fn test_depletion_scales_factor_and_empties_tank() {
        let (ctx, mut state) = setup(0.1);
        run(&ctx, &mut state, &over_fire(), 0);
        run(&ctx, &mut state, &over_fire(), 10_000);

        assert_eq!(state.water_quantity, 0.0);
        let expected = 0.1 / 100.0 * FIRE_REDUCTION_FACTOR;
        let shrunk = state.events.iter().find_map(|e| match e {
            MissionEvent::FireShrunk { factor, .. } => Some(*factor),
            _ => None,
        });
        assert!((shrunk.unwrap() - expected).abs() < 1e-15);
        assert!(state.events.contains(&MissionEvent::TankEmpty));
    }

    #[test]
    fn test_dry_tank_means_no_contact() {
        let (ctx, mut state) = setup(0.0);
        run(&ctx, &mut state, &over_fire(), 0);
        run(&ctx, &mut state, &over_fire(), 5_000);
        assert_eq!(state.fire_contact, FireContact::NoContact);
        assert_eq!(state.fire_area_km2, ctx.starting_fire_area_km2);
    }

    #[test]
    fn test_leaving_resets_contact() {
        let (ctx, mut state) = setup(100.0);
        let away = project(Coordinate::new(-70.99, 42.01), 5.0);

        run(&ctx, &mut state, &over_fire(), 0);
        run(&ctx, &mut state, &away, 1_000);
        assert_eq!(state.fire_contact, FireContact::NoContact);
        assert!(state.events.contains(&MissionEvent::FireContactLost { timestamp_ms: 1_000 }));

        run(&ctx, &mut state, &over_fire(), 5_000);
        assert_eq!(state.fire_contact, FireContact::InContact { since_ms: 5_000 });
        assert_eq!(state.water_quantity, 100.0);
    }

    #[test]
    fn test_out_of_order_sample_reanchors() {
        let (ctx, mut state) = setup(100.0);
        run(&ctx, &mut state, &over_fire(), 5_000);
        run(&ctx, &mut state, &over_fire(), 4_000);
        assert_eq!(state.fire_contact, FireContact::InContact { since_ms: 4_000 });
        assert_eq!(state.water_quantity, 100.0);
    }

    #[test]
    fn test_fire_score_bounds() {
        assert_eq!(fire_score(0.0, 0.0), MAX_FIRE_SCORE);
        assert_eq!(fire_score(2.0, 2.0), 0.0);
        assert_eq!(fire_score(2.0, 0.5), 75.0);
        assert_eq!(fire_score(2.0, 0.0), MAX_FIRE_SCORE);
    }
}
