//! Scoring engine: the single writer of mission state.
//!
//! `ScoringEngine` owns the object store and the water/contact state
//! machines, applies telemetry samples one at a time, and produces
//! `MissionStats` snapshots. It does no I/O and holds no clock of its own:
//! all timing comes from sample timestamps, so replays are deterministic.

use tracing::warn;

use sortie_core::enums::MapType;
use sortie_core::error::MissionError;
use sortie_core::mission::MissionDefinition;
use sortie_core::state::MissionStats;
use sortie_core::telemetry::DroneSample;
use sortie_core::types::Coordinate;
use sortie_geo::{project, WaterSource};

use crate::context::MissionContext;
use crate::state::MissionState;
use crate::systems;
use crate::systems::fire_suppression::fire_score;

pub struct ScoringEngine {
    context: MissionContext,
    state: MissionState,
    water: Box<dyn WaterSource + Send>,
}

impl ScoringEngine {
    /// Validate the definition and build the initial mission state.
    pub fn new(
        definition: &MissionDefinition,
        water: impl WaterSource + Send + 'static,
    ) -> Result<Self, MissionError> {
        let (context, store) = MissionContext::build(definition)?;
        let score = match context.map_type {
            MapType::FireSuppression => fire_score(
                context.starting_fire_area_km2,
                context.starting_fire_area_km2,
            ),
            MapType::SearchAndRescue => 0.0,
        };
        let state = MissionState::new(store, context.starting_fire_area_km2, score);
        Ok(Self {
            context,
            state,
            water: Box::new(water),
        })
    }

    /// Apply one telemetry sample.
    pub fn update(&mut self, sample: DroneSample) {
        match sample {
            DroneSample::Takeoff {
                is_taken_off,
                timestamp_ms,
                ..
            } => {
                systems::status::advance_clock(&mut self.state, timestamp_ms);
                systems::status::handle_takeoff(&mut self.state, is_taken_off, timestamp_ms);
            }
            DroneSample::Landing {
                is_landed,
                timestamp_ms,
                ..
            } => {
                systems::status::advance_clock(&mut self.state, timestamp_ms);
                systems::status::handle_landing(&mut self.state, is_landed, timestamp_ms);
            }
            DroneSample::Position {
                msg_id,
                latitude,
                longitude,
                timestamp_ms,
            } => {
                let position = Coordinate::new(longitude, latitude);
                if !position.is_valid() {
                    warn!(
                        msg_id,
                        latitude,
                        longitude,
                        "ignoring position sample with invalid coordinate"
                    );
                    return;
                }
                systems::status::advance_clock(&mut self.state, timestamp_ms);
                systems::status::record_position(&mut self.state, position);
                self.apply_position(position, timestamp_ms);
            }
        }
    }

    /// Apply a batch of samples in order.
    pub fn update_all(&mut self, samples: impl IntoIterator<Item = DroneSample>) {
        for sample in samples {
            self.update(sample);
        }
    }

    fn apply_position(&mut self, position: Coordinate, timestamp_ms: u64) {
        match self.context.map_type {
            MapType::FireSuppression => {
                let footprint = project(position, self.context.fire_sensing_radius_m);
                systems::fire_suppression::run(
                    &self.context,
                    &mut self.state,
                    &footprint,
                    timestamp_ms,
                );
                systems::water::run(
                    &self.context,
                    &mut self.state,
                    &footprint,
                    timestamp_ms,
                    &*self.water,
                );
            }
            MapType::SearchAndRescue => {
                let footprint = project(position, self.context.survivor_sensing_radius_m);
                systems::search_rescue::run(&self.context, &mut self.state, &footprint);
            }
        }
    }

    /// Current statistics. Events collected since the previous snapshot are
    /// moved into this one.
    pub fn snapshot(&mut self) -> MissionStats {
        let events = std::mem::take(&mut self.state.events);
        systems::snapshot::build_snapshot(&self.context, &self.state, events)
    }

    pub fn context(&self) -> &MissionContext {
        &self.context
    }

    /// Read-only view of the mission state.
    pub fn state(&self) -> &MissionState {
        &self.state
    }
}
