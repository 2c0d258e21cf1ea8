//! Core types and definitions for the SORTIE mission scorer.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geographic primitives, telemetry samples, mission definitions,
//! snapshots, events, and constants. No I/O happens here.

pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod mission;
pub mod state;
pub mod telemetry;
pub mod types;

pub use error::MissionError;
