use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::InputError;
use crate::models::{FarmSetup, FireIntensity, ScenarioParams};

pub const MAX_TANKS: u32 = 10;
pub const MAX_PUMPS: u32 = 10;
pub const MAX_OUTAGE_HOURS: f64 = 24.0;

/// A farm file: optional `[setup]` and `[scenario]` tables, each field
/// defaulted when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmFile {
    pub setup: FarmSetup,
    pub scenario: ScenarioParams,
}

impl FarmFile {
    pub fn load(path: &Path) -> Result<Self, InputError> {
        let raw = std::fs::read_to_string(path).map_err(|source| InputError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: FarmFile = toml::from_str(&raw)?;
        debug!(path = %path.display(), "loaded farm file");
        Ok(FarmFile {
            setup: sanitize_setup(file.setup)?,
            scenario: sanitize_params(file.scenario)?,
        })
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// One row of a scenario batch.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledScenario {
    pub label: String,
    pub params: ScenarioParams,
}

pub fn load_scenarios(csv_path: &Path) -> Result<Vec<LabeledScenario>, InputError> {
    #[derive(Deserialize)]
    struct CsvRow {
        label: String,
        fire_intensity: Option<i64>,
        outage_hours: Option<f64>,
        diversion: Option<f64>,
        wind: Option<bool>,
        rain: Option<bool>,
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(csv_path)?;
    let defaults = ScenarioParams::default();
    let mut scenarios = Vec::new();

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        let fire_intensity = match row.fire_intensity {
            Some(level) => clamp_fire_intensity(level),
            None => defaults.fire_intensity,
        };
        let params = sanitize_params(ScenarioParams {
            fire_intensity,
            outage_hours: row.outage_hours.unwrap_or(defaults.outage_hours),
            diversion: row.diversion.unwrap_or(defaults.diversion),
            wind: row.wind.unwrap_or(defaults.wind),
            rain: row.rain.unwrap_or(defaults.rain),
        })?;

        scenarios.push(LabeledScenario {
            label: row.label,
            params,
        });
    }

    debug!(path = %csv_path.display(), count = scenarios.len(), "loaded scenario batch");
    Ok(scenarios)
}

/// Rejects non-finite numbers and clamps the rest into the ranges the input
/// form allows.
pub fn sanitize_setup(setup: FarmSetup) -> Result<FarmSetup, InputError> {
    let tank_size = non_negative("tank size", finite("tank size", setup.tank_size)?);
    let solar_kw = non_negative("solar kW", finite("solar kW", setup.solar_kw)?);
    Ok(FarmSetup {
        tanks: clamp_count("tanks", setup.tanks, MAX_TANKS),
        pumps: clamp_count("pumps", setup.pumps, MAX_PUMPS),
        tank_size,
        solar_kw,
        ..setup
    })
}

pub fn sanitize_params(params: ScenarioParams) -> Result<ScenarioParams, InputError> {
    let outage_hours = clamp_range(
        "outage hours",
        finite("outage hours", params.outage_hours)?,
        0.0,
        MAX_OUTAGE_HOURS,
    );
    let diversion = clamp_range("diversion", finite("diversion", params.diversion)?, 0.0, 1.0);
    Ok(ScenarioParams {
        outage_hours,
        diversion,
        ..params
    })
}

pub fn clamp_fire_intensity(level: i64) -> FireIntensity {
    let intensity = FireIntensity::from_level_clamped(level);
    if i64::from(intensity.level()) != level {
        warn!(level, clamped = intensity.level(), "fire intensity out of range");
    }
    intensity
}

fn finite(field: &'static str, value: f64) -> Result<f64, InputError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InputError::NonFinite { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> f64 {
    if value < 0.0 {
        warn!(field, value, "negative value clamped to 0");
        0.0
    } else {
        value
    }
}

fn clamp_count(field: &'static str, value: u32, max: u32) -> u32 {
    if value > max {
        warn!(field, value, max, "count clamped");
        max
    } else {
        value
    }
}

fn clamp_range(field: &'static str, value: f64, min: f64, max: f64) -> f64 {
    let clamped = value.clamp(min, max);
    if clamped != value {
        warn!(field, value, clamped, "value clamped into range");
    }
    clamped
}
