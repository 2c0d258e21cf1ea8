//! Mutable mission state, owned by the engine.

use std::collections::VecDeque;

use sortie_core::constants::FLIGHT_TRACK_CAPACITY;
use sortie_core::enums::{DroneStatus, FireContact, WaterContact};
use sortie_core::events::MissionEvent;
use sortie_core::types::Coordinate;

use crate::store::ObjectOfInterestStore;

#[derive(Debug, Clone)]
pub struct MissionState {
    pub store: ObjectOfInterestStore,
    /// Always within `[0, water_limit]`.
    pub water_quantity: f64,
    pub water_contact: WaterContact,
    pub fire_contact: FireContact,
    pub survivors_found: u32,
    /// Remaining fire area after the latest sample (km²).
    pub fire_area_km2: f64,
    pub score: f64,
    /// Timestamp of the first takeoff notification.
    pub start_time_ms: Option<u64>,
    /// Timestamp of the most recent sample of any kind.
    pub clock_ms: Option<u64>,
    pub status: DroneStatus,
    pub last_position: Option<Coordinate>,
    pub flight_track: VecDeque<Coordinate>,
    /// Drained into each snapshot.
    pub events: Vec<MissionEvent>,
}

impl MissionState {
    pub fn new(store: ObjectOfInterestStore, fire_area_km2: f64, score: f64) -> Self {
        Self {
            store,
            water_quantity: 0.0,
            water_contact: WaterContact::default(),
            fire_contact: FireContact::default(),
            survivors_found: 0,
            fire_area_km2,
            score,
            start_time_ms: None,
            clock_ms: None,
            status: DroneStatus::default(),
            last_position: None,
            flight_track: VecDeque::with_capacity(FLIGHT_TRACK_CAPACITY),
            events: Vec::new(),
        }
    }

    /// Append to the flight track, dropping the oldest point when full.
    pub fn push_track(&mut self, position: Coordinate) {
        if self.flight_track.len() == FLIGHT_TRACK_CAPACITY {
            self.flight_track.pop_front();
        }
        self.flight_track.push_back(position);
    }

    /// Whole seconds since takeoff, measured at the latest sample.
    pub fn elapsed_secs(&self) -> u64 {
        match (self.start_time_ms, self.clock_ms) {
            (Some(start), Some(now)) => now.saturating_sub(start) / 1000,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flight_track_is_bounded() {
        let mut state = MissionState::new(ObjectOfInterestStore::default(), 0.0, 0.0);
        for i in 0..FLIGHT_TRACK_CAPACITY + 10 {
            state.push_track(Coordinate::new(i as f64 * 1e-5, 0.0));
        }
        assert_eq!(state.flight_track.len(), FLIGHT_TRACK_CAPACITY);
        assert_eq!(state.flight_track.front(), Some(&Coordinate::new(10.0 * 1e-5, 0.0)));
    }

    #[test]
    fn test_elapsed_is_zero_before_takeoff() {
        let mut state = MissionState::new(ObjectOfInterestStore::default(), 0.0, 0.0);
        state.clock_ms = Some(50_000);
        assert_eq!(state.elapsed_secs(), 0);

        state.start_time_ms = Some(20_500);
        assert_eq!(state.elapsed_secs(), 29);

        // A sample older than takeoff never makes elapsed negative.
        state.clock_ms = Some(10_000);
        assert_eq!(state.elapsed_secs(), 0);
    }
}
