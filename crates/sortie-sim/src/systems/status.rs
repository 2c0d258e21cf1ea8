//! Flight status transitions driven by takeoff, landing and position samples.

use tracing::{debug, info};

use sortie_core::enums::DroneStatus;
use sortie_core::events::MissionEvent;
use sortie_core::types::Coordinate;

use crate::state::MissionState;

/// Advance the mission clock. Out-of-order samples never move it back.
pub fn advance_clock(state: &mut MissionState, timestamp_ms: u64) {
    state.clock_ms = Some(state.clock_ms.map_or(timestamp_ms, |c| c.max(timestamp_ms)));
}

/// The first takeoff starts the mission clock. Later ones are ignored.
pub fn handle_takeoff(state: &mut MissionState, is_taken_off: bool, timestamp_ms: u64) {
    if !is_taken_off || state.start_time_ms.is_some() {
        return;
    }
    state.start_time_ms = Some(timestamp_ms);
    state.status = DroneStatus::TakingOff;
    state.events.push(MissionEvent::MissionStarted { timestamp_ms });
    info!(timestamp_ms, "mission started");
}

pub fn handle_landing(state: &mut MissionState, is_landed: bool, timestamp_ms: u64) {
    if !is_landed {
        return;
    }
    state.status = DroneStatus::Grounded;
    state.events.push(MissionEvent::Landed { timestamp_ms });
    debug!(timestamp_ms, "drone landed");
}

/// Any position report means the drone is airborne.
pub fn record_position(state: &mut MissionState, position: Coordinate) {
    state.status = DroneStatus::InAir;
    state.last_position = Some(position);
    state.push_track(position);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ObjectOfInterestStore;

    fn state() -> MissionState {
        MissionState::new(ObjectOfInterestStore::default(), 0.0, 0.0)
    }

    #[test]
    fn test_first_takeoff_starts_clock() {
        let mut s = state();
        handle_takeoff(&mut s, true, 5_000);
        handle_takeoff(&mut s, true, 9_000);
        assert_eq!(s.start_time_ms, Some(5_000));
        assert_eq!(s.status, DroneStatus::TakingOff);
        assert_eq!(s.events, vec![MissionEvent::MissionStarted { timestamp_ms: 5_000 }]);
    }

    #[test]
    fn test_false_flags_are_noops() {
        let mut s = state();
        record_position(&mut s, Coordinate::new(-71.0, 42.0));
        handle_takeoff(&mut s, false, 1_000);
        handle_landing(&mut s, false, 2_000);
        assert_eq!(s.start_time_ms, None);
        assert_eq!(s.status, DroneStatus::InAir);
        assert!(s.events.is_empty());
    }

    #[test]
    fn test_landing_grounds_drone() {
        let mut s = state();
        handle_takeoff(&mut s, true, 0);
        record_position(&mut s, Coordinate::new(-71.0, 42.0));
        handle_landing(&mut s, true, 60_000);
        assert_eq!(s.status, DroneStatus::Grounded);
        assert_eq!(s.last_position, Some(Coordinate::new(-71.0, 42.0)));
    }

    #[test]
    fn test_clock_never_moves_back() {
        let mut s = state();
        advance_clock(&mut s, 3_000);
        advance_clock(&mut s, 1_000);
        assert_eq!(s.clock_ms, Some(3_000));
    }
}
