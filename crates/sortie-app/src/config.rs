//! Application configuration, loaded from a JSON file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use sortie_core::mission::MissionDefinition;
use sortie_core::types::Coordinate;
use sortie_geo::WaterBodies;
use sortie_sim::scenario::SurveyPlan;

use crate::error::AppError;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "SORTIE_CONFIG";

pub const DEFAULT_CONFIG_PATH: &str = "sortie.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// How often the telemetry loop drains its queues.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Tracing filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    pub mission: MissionDefinition,
    /// Water polygons as vertex rings.
    #[serde(default)]
    pub water_bodies: Vec<Vec<Coordinate>>,
    /// Synthetic flight replayed instead of reading telemetry from stdin.
    #[serde(default)]
    pub demo_flight: Option<SurveyPlan>,
}

fn default_poll_interval_ms() -> u64 {
    10
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl AppConfig {
    pub fn new(mission: MissionDefinition) -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            log_filter: default_log_filter(),
            mission,
            water_bodies: Vec::new(),
            demo_flight: None,
        }
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parse a config. A demo flight plan is validated up front so the
    /// replay never starts with one it cannot fly.
    pub fn from_json(text: &str) -> Result<Self, AppError> {
        let config: Self = serde_json::from_str(text)?;
        if let Some(plan) = &config.demo_flight {
            plan.validate()?;
        }
        Ok(config)
    }

    /// `$SORTIE_CONFIG`, or `sortie.json` in the working directory.
    pub fn path_from_env() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn water(&self) -> WaterBodies {
        WaterBodies::from_rings(&self.water_bodies)
    }
}
