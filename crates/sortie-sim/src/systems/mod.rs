//! Systems that apply one telemetry sample to the mission state.
//!
//! Systems are free functions over `&MissionContext` and `&mut MissionState`.
//! They hold no state of their own.

pub mod fire_suppression;
pub mod search_rescue;
pub mod snapshot;
pub mod status;
pub mod water;
