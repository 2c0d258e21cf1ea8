//! Enumeration types used throughout the scorer.

use serde::{Deserialize, Serialize};

/// Mission flavor. Fixed for the mission's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapType {
    #[default]
    FireSuppression,
    SearchAndRescue,
}

/// Flight status as reported by the most recent telemetry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DroneStatus {
    #[default]
    Grounded,
    TakingOff,
    InAir,
}

/// How a fire mission without any fire rings is treated at initialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmptyFirePolicy {
    /// Reject the definition with a configuration error.
    #[default]
    Reject,
    /// Accept it as already won (score 100).
    PreWon,
}

/// Per-object mutable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectState {
    Fire { alive: bool },
    Survivor { found: bool },
}

/// Water pickup state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaterContact {
    #[default]
    NotCollecting,
    Collecting { since_ms: u64 },
}

/// Fire contact state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FireContact {
    #[default]
    NoContact,
    InContact { since_ms: u64 },
}
