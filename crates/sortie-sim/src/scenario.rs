//! Synthetic flights for replays and tests.
//!
//! Each flight is a takeoff notification, a stream of position reports and
//! a landing notification. Sample spacing and GPS noise come from a seeded
//! ChaCha RNG, so the same plan always yields the same samples.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use sortie_core::error::MissionError;
use sortie_core::telemetry::DroneSample;
use sortie_core::types::{BoundingBox, Coordinate};

/// Largest accepted GPS noise per axis (degrees).
pub const MAX_NOISE_DEG: f64 = 1.0;

/// A back-and-forth survey pattern over a rectangle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyPlan {
    /// RNG seed for timing jitter and position noise.
    pub seed: u64,
    pub area: BoundingBox,
    /// Number of east-west passes, spread evenly from south to north.
    pub passes: u32,
    /// Position reports per pass.
    pub samples_per_pass: u32,
    pub start_ms: u64,
    /// Nominal spacing between position reports.
    pub interval_ms: u64,
    /// Maximum deviation from the nominal spacing.
    pub jitter_ms: u64,
    /// Maximum GPS noise per axis (degrees).
    pub noise_deg: f64,
}

impl Default for SurveyPlan {
    fn default() -> Self {
        Self {
            seed: 42,
            area: BoundingBox::new(-71.0, 42.0, -70.999, 42.001),
            passes: 6,
            samples_per_pass: 20,
            start_ms: 0,
            interval_ms: 500,
            jitter_ms: 200,
            noise_deg: 2e-6,
        }
    }
}

impl SurveyPlan {
    /// Reject plans whose area, noise or timing cannot produce a flight.
    pub fn validate(&self) -> Result<(), MissionError> {
        let corners = [
            self.area.min_corner(),
            Coordinate::new(self.area.max_lon, self.area.max_lat),
        ];
        if let Some(bad) = corners.iter().find(|c| !c.is_valid()) {
            return Err(MissionError::InvalidCoordinate {
                lon: bad.lon,
                lat: bad.lat,
            });
        }
        if self.area.min_lon > self.area.max_lon || self.area.min_lat > self.area.max_lat {
            return Err(MissionError::InvalidSurveyPlan {
                reason: "area min corner exceeds max corner",
            });
        }
        if !self.noise_deg.is_finite() || !(0.0..=MAX_NOISE_DEG).contains(&self.noise_deg) {
            return Err(MissionError::InvalidSurveyPlan {
                reason: "noise_deg must be finite and within 0..=1 degree",
            });
        }
        if self.interval_ms.checked_add(self.jitter_ms).is_none() {
            return Err(MissionError::InvalidSurveyPlan {
                reason: "interval_ms + jitter_ms overflows",
            });
        }
        Ok(())
    }
}

/// Generate the sample stream for a survey: takeoff, positions, landing.
///
/// Out-of-range timing and noise are clamped rather than rejected; call
/// `SurveyPlan::validate` first to surface them.
pub fn survey(plan: &SurveyPlan) -> Vec<DroneSample> {
    let mut rng = ChaCha8Rng::seed_from_u64(plan.seed);
    let mut samples = Vec::new();
    let mut msg_id = 0;
    let mut t = plan.start_ms;

    samples.push(DroneSample::takeoff(msg_id, t));

    let passes = plan.passes.max(1);
    let per_pass = plan.samples_per_pass.max(2);
    for pass in 0..passes {
        let lat = if passes == 1 {
            plan.area.center().lat
        } else {
            plan.area.min_lat + plan.area.height() * f64::from(pass) / f64::from(passes - 1)
        };
        for step in 0..per_pass {
            let mut frac = f64::from(step) / f64::from(per_pass - 1);
            if pass % 2 == 1 {
                frac = 1.0 - frac;
            }
            let lon = plan.area.min_lon + plan.area.width() * frac;

            t = t.saturating_add(next_interval(&mut rng, plan));
            msg_id += 1;
            let (lon, lat) = (lon + noise(&mut rng, plan), lat + noise(&mut rng, plan));
            samples.push(DroneSample::position(msg_id, lat, lon, t));
        }
    }

    t = t.saturating_add(next_interval(&mut rng, plan));
    samples.push(DroneSample::landing(msg_id + 1, t));
    samples
}

/// Position reports holding station over `point` from `from_ms` to `to_ms`.
pub fn hover(point: Coordinate, from_ms: u64, to_ms: u64, interval_ms: u64) -> Vec<DroneSample> {
    let step = interval_ms.max(1) as usize;
    (from_ms..=to_ms)
        .step_by(step)
        .enumerate()
        .map(|(i, t)| DroneSample::position(i as u64, point.lat, point.lon, t))
        .collect()
}

fn next_interval(rng: &mut ChaCha8Rng, plan: &SurveyPlan) -> u64 {
    if plan.jitter_ms == 0 {
        return plan.interval_ms;
    }
    let low = plan.interval_ms.saturating_sub(plan.jitter_ms);
    let high = plan.interval_ms.saturating_add(plan.jitter_ms);
    rng.gen_range(low..=high)
}

fn noise(rng: &mut ChaCha8Rng, plan: &SurveyPlan) -> f64 {
    if plan.noise_deg.is_nan() || plan.noise_deg <= 0.0 {
        return 0.0;
    }
    let span = plan.noise_deg.min(MAX_NOISE_DEG);
    rng.gen_range(-span..=span)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_survey_shape() {
        let plan = SurveyPlan::default();
        let samples = survey(&plan);
        let expected = 2 + (plan.passes * plan.samples_per_pass) as usize;
        assert_eq!(samples.len(), expected);
        assert!(matches!(samples.first(), Some(DroneSample::Takeoff { .. })));
        assert!(matches!(samples.last(), Some(DroneSample::Landing { .. })));
    }

    #[test]
    fn test_survey_timestamps_increase() {
        let samples = survey(&SurveyPlan::default());
        for pair in samples.windows(2) {
            assert!(pair[1].timestamp_ms() >= pair[0].timestamp_ms());
        }
    }

    #[test]
    fn test_same_seed_same_flight() {
        let plan = SurveyPlan::default();
        assert_eq!(survey(&plan), survey(&plan));

        let other = SurveyPlan {
            seed: 7,
            ..SurveyPlan::default()
        };
        assert_ne!(survey(&plan), survey(&other));
    }

    #[test]
    fn test_default_plan_is_valid() {
        assert_eq!(SurveyPlan::default().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_unusable_plans() {
        for noise_deg in [1e308, f64::NAN, f64::INFINITY, -0.5] {
            let plan = SurveyPlan {
                noise_deg,
                ..SurveyPlan::default()
            };
            assert!(
                matches!(plan.validate(), Err(MissionError::InvalidSurveyPlan { .. })),
                "noise {noise_deg}"
            );
        }

        let overflow = SurveyPlan {
            interval_ms: u64::MAX,
            jitter_ms: 1,
            ..SurveyPlan::default()
        };
        assert!(overflow.validate().is_err());

        let off_world = SurveyPlan {
            area: BoundingBox::new(-71.0, 42.0, -70.0, 95.0),
            ..SurveyPlan::default()
        };
        assert_eq!(
            off_world.validate(),
            Err(MissionError::InvalidCoordinate {
                lon: -70.0,
                lat: 95.0
            })
        );

        let inverted = SurveyPlan {
            area: BoundingBox::new(-70.0, 42.0, -71.0, 43.0),
            ..SurveyPlan::default()
        };
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn test_survey_clamps_extreme_plans_without_panicking() {
        let wild = SurveyPlan {
            noise_deg: 1e308,
            interval_ms: u64::MAX,
            jitter_ms: u64::MAX,
            ..SurveyPlan::default()
        };
        let samples = survey(&wild);
        assert_eq!(samples.len(), 2 + (wild.passes * wild.samples_per_pass) as usize);
        assert_eq!(samples.last().map(DroneSample::timestamp_ms), Some(u64::MAX));

        let nan = SurveyPlan {
            noise_deg: f64::NAN,
            ..SurveyPlan::default()
        };
        assert_eq!(survey(&nan).len(), samples.len());
    }

    #[test]
    fn test_hover_is_inclusive() {
        let samples = hover(Coordinate::new(-71.0, 42.0), 0, 1_000, 250);
        let times: Vec<u64> = samples.iter().map(DroneSample::timestamp_ms).collect();
        assert_eq!(times, vec![0, 250, 500, 750, 1_000]);
    }
}
