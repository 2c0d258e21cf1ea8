//! Replay a telemetry log through the scoring loop.
//!
//! Reads JSON-lines `DroneSample`s from stdin (or generates the configured
//! demo flight), feeds them through the telemetry loop, and prints the final
//! `MissionStats` as pretty JSON on stdout.

use std::io::{self, BufRead};
use std::mem::discriminant;
use std::process::ExitCode;

use tracing::{error, info, warn};

use sortie_app::telemetry_loop::{spawn_telemetry_loop, TelemetryLoop};
use sortie_app::{logging, AppConfig, AppError, AppState};
use sortie_core::telemetry::DroneSample;
use sortie_sim::{scenario, ScoringEngine};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "replay failed");
            eprintln!("sortie-replay: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), AppError> {
    let path = AppConfig::path_from_env();
    let config = AppConfig::load(&path)?;
    logging::init(&config.log_filter);
    info!(path = %path.display(), mission = %config.mission.name, "config loaded");

    let engine = ScoringEngine::new(&config.mission, config.water())?;
    let telemetry = spawn_telemetry_loop(engine, config.poll_interval(), AppState::new())?;

    match &config.demo_flight {
        Some(plan) => {
            info!(seed = plan.seed, "replaying demo flight");
            feed(&telemetry, scenario::survey(plan).into_iter().map(Ok))?;
        }
        None => {
            let stdin = io::stdin();
            let samples = stdin
                .lock()
                .lines()
                .enumerate()
                .filter_map(|(line_no, line)| parse_line(line_no + 1, line));
            feed(&telemetry, samples)?;
        }
    }

    info!(applied = telemetry.state().applied(), "input exhausted");
    let stats = telemetry.shutdown()?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

/// Send samples in order, flushing whenever the sample kind changes so the
/// loop applies them in input order.
fn feed(
    telemetry: &TelemetryLoop,
    samples: impl Iterator<Item = Result<DroneSample, AppError>>,
) -> Result<(), AppError> {
    let sender = telemetry.sender();
    let mut previous = None;
    for sample in samples {
        let sample = sample?;
        let kind = discriminant(&sample);
        if previous.is_some_and(|p| p != kind) {
            telemetry.flush()?;
        }
        previous = Some(kind);
        sender.send(sample)?;
    }
    telemetry.flush()
}

/// Blank lines are skipped. Malformed lines are logged and skipped.
fn parse_line(
    line_no: usize,
    line: io::Result<String>,
) -> Option<Result<DroneSample, AppError>> {
    let line = match line {
        Ok(line) => line,
        Err(source) => {
            return Some(Err(AppError::Io {
                path: "<stdin>".into(),
                source,
            }))
        }
    };
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str(trimmed) {
        Ok(sample) => Some(Ok(sample)),
        Err(err) => {
            warn!(line_no, %err, "skipping malformed telemetry line");
            None
        }
    }
}
