//! Application-level errors.

use std::path::PathBuf;

use thiserror::Error;

use sortie_core::error::MissionError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("mission rejected: {0}")]
    Mission(#[from] MissionError),

    #[error("failed to spawn telemetry loop: {0}")]
    LoopSpawn(#[source] std::io::Error),

    #[error("telemetry loop is not running")]
    LoopStopped,
}
