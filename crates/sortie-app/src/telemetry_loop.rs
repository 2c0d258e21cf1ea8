//! Telemetry loop thread: the single consumer that feeds the scoring engine.
//!
//! Producers hold a cloneable `TelemetrySender`, which routes each sample
//! kind into its own FIFO channel. Every poll interval the loop drains the
//! landing, takeoff and position queues in that order without blocking,
//! then publishes the latest `MissionStats` into shared state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, info};

use sortie_core::state::MissionStats;
use sortie_core::telemetry::DroneSample;
use sortie_sim::ScoringEngine;

use crate::error::AppError;
use crate::state::{AppState, LoopCommand};

/// Producer handle. Clone freely; one per telemetry source is typical.
#[derive(Debug, Clone)]
pub struct TelemetrySender {
    landing: Sender<DroneSample>,
    takeoff: Sender<DroneSample>,
    position: Sender<DroneSample>,
    sent: Arc<AtomicU64>,
}

impl TelemetrySender {
    /// Queue a sample on the channel for its kind.
    pub fn send(&self, sample: DroneSample) -> Result<(), AppError> {
        let channel = match sample {
            DroneSample::Landing { .. } => &self.landing,
            DroneSample::Takeoff { .. } => &self.takeoff,
            DroneSample::Position { .. } => &self.position,
        };
        channel.send(sample).map_err(|_| AppError::LoopStopped)?;
        self.sent.fetch_add(1, Ordering::Release);
        Ok(())
    }

    /// Samples accepted by any clone of this sender.
    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Acquire)
    }
}

struct TelemetryQueues {
    landing: Receiver<DroneSample>,
    takeoff: Receiver<DroneSample>,
    position: Receiver<DroneSample>,
}

/// What one poll applied.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Drained {
    landings: usize,
    takeoffs: usize,
    positions: usize,
    /// Every producer has disconnected.
    closed: bool,
}

impl Drained {
    fn applied(&self) -> usize {
        self.landings + self.takeoffs + self.positions
    }
}

impl TelemetryQueues {
    /// Apply everything queued: landings first, then takeoffs, then
    /// positions.
    fn drain_into(&self, engine: &mut ScoringEngine) -> Drained {
        let (landings, landing_closed) = drain(&self.landing, engine);
        let (takeoffs, takeoff_closed) = drain(&self.takeoff, engine);
        let (positions, position_closed) = drain(&self.position, engine);
        Drained {
            landings,
            takeoffs,
            positions,
            closed: landing_closed && takeoff_closed && position_closed,
        }
    }
}

/// A running telemetry loop.
pub struct TelemetryLoop {
    sender: TelemetrySender,
    control: Sender<LoopCommand>,
    state: AppState,
    poll_interval: Duration,
    handle: JoinHandle<MissionStats>,
}

/// Spawn the loop thread around an already validated engine.
pub fn spawn_telemetry_loop(
    engine: ScoringEngine,
    poll_interval: Duration,
    state: AppState,
) -> Result<TelemetryLoop, AppError> {
    let (landing_tx, landing_rx) = mpsc::channel();
    let (takeoff_tx, takeoff_rx) = mpsc::channel();
    let (position_tx, position_rx) = mpsc::channel();
    let (control_tx, control_rx) = mpsc::channel();

    let queues = TelemetryQueues {
        landing: landing_rx,
        takeoff: takeoff_rx,
        position: position_rx,
    };
    let loop_state = state.clone();
    let handle = std::thread::Builder::new()
        .name("sortie-telemetry".into())
        .spawn(move || run_telemetry_loop(engine, queues, control_rx, &loop_state, poll_interval))
        .map_err(AppError::LoopSpawn)?;

    Ok(TelemetryLoop {
        sender: TelemetrySender {
            landing: landing_tx,
            takeoff: takeoff_tx,
            position: position_tx,
            sent: Arc::new(AtomicU64::new(0)),
        },
        control: control_tx,
        state,
        poll_interval,
        handle,
    })
}

impl TelemetryLoop {
    pub fn sender(&self) -> TelemetrySender {
        self.sender.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Block until every sample sent so far has been applied.
    ///
    /// Samples of different kinds travel on separate channels, so a caller
    /// that needs them applied in send order flushes between kinds.
    pub fn flush(&self) -> Result<(), AppError> {
        while self.state.applied() < self.sender.sent() {
            if self.handle.is_finished() {
                return Err(AppError::LoopStopped);
            }
            std::thread::sleep(self.poll_interval);
        }
        Ok(())
    }

    /// Stop the loop after it applies everything already queued, and
    /// return the final stats.
    pub fn shutdown(self) -> Result<MissionStats, AppError> {
        // The loop may already be gone; joining reports that.
        let _ = self.control.send(LoopCommand::Shutdown);
        drop(self.sender);
        self.handle.join().map_err(|_| AppError::LoopStopped)
    }
}

/// The loop body. Runs until shutdown, control disconnect, or every
/// telemetry producer has gone away.
fn run_telemetry_loop(
    mut engine: ScoringEngine,
    queues: TelemetryQueues,
    control_rx: Receiver<LoopCommand>,
    state: &AppState,
    poll_interval: Duration,
) -> MissionStats {
    info!(map_type = ?engine.context().map_type, "telemetry loop started");
    let mut last = engine.snapshot();
    publish(state, &last);

    loop {
        let stop = match control_rx.try_recv() {
            Ok(LoopCommand::Shutdown) | Err(TryRecvError::Disconnected) => true,
            Err(TryRecvError::Empty) => false,
        };

        let drained = queues.drain_into(&mut engine);
        let applied = drained.applied();

        if applied > 0 {
            last = engine.snapshot();
            publish(state, &last);
            state
                .samples_applied
                .fetch_add(applied as u64, Ordering::Release);
            debug!(
                landings = drained.landings,
                takeoffs = drained.takeoffs,
                positions = drained.positions,
                "applied telemetry"
            );
        }

        if stop || drained.closed {
            info!(
                applied = state.applied(),
                score = last.score,
                "telemetry loop stopped"
            );
            return last;
        }

        std::thread::sleep(poll_interval);
    }
}

/// Apply every sample currently queued on `rx`. Returns the count and
/// whether the channel has been disconnected.
fn drain(rx: &Receiver<DroneSample>, engine: &mut ScoringEngine) -> (usize, bool) {
    let mut applied = 0;
    loop {
        match rx.try_recv() {
            Ok(sample) => {
                engine.update(sample);
                applied += 1;
            }
            Err(TryRecvError::Empty) => return (applied, false),
            Err(TryRecvError::Disconnected) => return (applied, true),
        }
    }
}

fn publish(state: &AppState, stats: &MissionStats) {
    if let Ok(mut lock) = state.latest_stats.lock() {
        *lock = Some(stats.clone());
    }
}
