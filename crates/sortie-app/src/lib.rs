//! Runtime shell for the SORTIE scorer.
//!
//! Loads configuration, sets up logging, and runs the telemetry polling
//! loop that feeds samples into the scoring engine.

pub mod config;
pub mod error;
pub mod logging;
pub mod state;
pub mod telemetry_loop;

pub use config::AppConfig;
pub use error::AppError;
pub use state::AppState;
