//! Drone telemetry samples delivered by the external transport.
//!
//! Samples are applied in arrival order. Message ids are informational only;
//! no de-duplication happens on them.

use serde::{Deserialize, Serialize};

/// One telemetry message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DroneSample {
    /// Landing notification.
    Landing {
        msg_id: u64,
        is_landed: bool,
        timestamp_ms: u64,
    },
    /// Takeoff notification.
    Takeoff {
        msg_id: u64,
        is_taken_off: bool,
        timestamp_ms: u64,
    },
    /// Position report.
    Position {
        msg_id: u64,
        latitude: f64,
        longitude: f64,
        timestamp_ms: u64,
    },
}

impl DroneSample {
    pub fn msg_id(&self) -> u64 {
        match self {
            DroneSample::Landing { msg_id, .. }
            | DroneSample::Takeoff { msg_id, .. }
            | DroneSample::Position { msg_id, .. } => *msg_id,
        }
    }

    pub fn timestamp_ms(&self) -> u64 {
        match self {
            DroneSample::Landing { timestamp_ms, .. }
            | DroneSample::Takeoff { timestamp_ms, .. }
            | DroneSample::Position { timestamp_ms, .. } => *timestamp_ms,
        }
    }

    pub fn position(msg_id: u64, latitude: f64, longitude: f64, timestamp_ms: u64) -> Self {
        DroneSample::Position {
            msg_id,
            latitude,
            longitude,
            timestamp_ms,
        }
    }

    pub fn takeoff(msg_id: u64, timestamp_ms: u64) -> Self {
        DroneSample::Takeoff {
            msg_id,
            is_taken_off: true,
            timestamp_ms,
        }
    }

    pub fn landing(msg_id: u64, timestamp_ms: u64) -> Self {
        DroneSample::Landing {
            msg_id,
            is_landed: true,
            timestamp_ms,
        }
    }
}
