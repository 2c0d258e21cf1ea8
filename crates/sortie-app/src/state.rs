//! State shared between the telemetry loop thread and its readers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use sortie_core::state::MissionStats;

/// Control messages for the telemetry loop.
#[derive(Debug)]
pub enum LoopCommand {
    /// Apply whatever is queued, publish final stats, and stop.
    Shutdown,
}

/// Handles readers use to observe the running loop.
///
/// - `latest_stats` is `None` until the loop publishes its first snapshot.
/// - `samples_applied` counts samples handed to the engine so far.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub latest_stats: Arc<Mutex<Option<MissionStats>>>,
    pub samples_applied: Arc<AtomicU64>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the most recently published stats.
    pub fn latest(&self) -> Option<MissionStats> {
        self.latest_stats.lock().ok().and_then(|lock| lock.clone())
    }

    pub fn applied(&self) -> u64 {
        self.samples_applied.load(Ordering::Acquire)
    }
}
