//! Mission scoring engine for SORTIE.
//!
//! Owns the objects of interest, applies telemetry samples through the
//! fire, water, search-and-rescue and status systems, and produces
//! `MissionStats` snapshots for reporting layers.

pub mod context;
pub mod engine;
pub mod scenario;
pub mod state;
pub mod store;
pub mod systems;

pub use context::MissionContext;
pub use engine::ScoringEngine;
pub use sortie_core as core;
pub use state::MissionState;
pub use store::{ObjectOfInterest, ObjectOfInterestStore, ShrinkOutcome};
