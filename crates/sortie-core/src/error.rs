//! Mission initialization errors.

use thiserror::Error;

/// Reasons a mission definition or flight plan is rejected at initialization.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MissionError {
    #[error("fire suppression mission defines no fire rings")]
    NoFires,

    #[error("fire ring {index} is degenerate (fewer than 3 distinct vertices or zero area)")]
    DegenerateFireRing { index: usize },

    #[error("invalid coordinate (lon {lon}, lat {lat})")]
    InvalidCoordinate { lon: f64, lat: f64 },

    #[error("invalid mission parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("invalid survey plan: {reason}")]
    InvalidSurveyPlan { reason: &'static str },
}
