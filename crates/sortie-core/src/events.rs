//! Events emitted by the engine for display and logging layers.

use serde::{Deserialize, Serialize};

/// Something noteworthy that happened while applying a sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MissionEvent {
    /// First takeoff notification; the mission clock starts here.
    MissionStarted { timestamp_ms: u64 },
    /// Landing notification.
    Landed { timestamp_ms: u64 },
    /// Drone began depositing water on at least one fire.
    FireContactStarted { timestamp_ms: u64 },
    /// Drone left every fire, or ran dry, after being in contact.
    FireContactLost { timestamp_ms: u64 },
    /// A fire polygon was eroded.
    FireShrunk { index: usize, factor: f64 },
    /// A fire polygon collapsed to the placeholder.
    FireExtinguished { index: usize },
    /// A survivor marker was seen for the first time.
    SurvivorFound { index: usize },
    WaterCollectionStarted { timestamp_ms: u64 },
    WaterCollectionStopped { timestamp_ms: u64 },
    /// Tank reached its limit.
    TankFull,
    /// Last water was deposited.
    TankEmpty,
}
