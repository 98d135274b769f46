use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InputError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Region {
    #[default]
    California,
    Oregon,
    Washington,
    Arizona,
    Texas,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Region::California => "California",
            Region::Oregon => "Oregon",
            Region::Washington => "Washington",
            Region::Arizona => "Arizona",
            Region::Texas => "Texas",
        };
        f.write_str(label)
    }
}

impl FromStr for Region {
    type Err = InputError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "california" => Ok(Region::California),
            "oregon" => Ok(Region::Oregon),
            "washington" => Ok(Region::Washington),
            "arizona" => Ok(Region::Arizona),
            "texas" => Ok(Region::Texas),
            _ => Err(InputError::UnknownLabel {
                field: "region",
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FarmType {
    Orchard,
    Livestock,
    #[default]
    Mixed,
}

impl fmt::Display for FarmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FarmType::Orchard => "Orchard",
            FarmType::Livestock => "Livestock",
            FarmType::Mixed => "Mixed",
        };
        f.write_str(label)
    }
}

impl FromStr for FarmType {
    type Err = InputError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "orchard" => Ok(FarmType::Orchard),
            "livestock" => Ok(FarmType::Livestock),
            "mixed" => Ok(FarmType::Mixed),
            _ => Err(InputError::UnknownLabel {
                field: "farm type",
                value: value.to_string(),
            }),
        }
    }
}

/// Water and power infrastructure of a farm.
///
/// `name`, `region` and `farm_type` are descriptive only; the evaluator reads
/// the four infrastructure fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmSetup {
    pub name: String,
    pub region: Region,
    pub farm_type: FarmType,
    pub tanks: u32,
    /// Gallons per tank.
    pub tank_size: f64,
    pub pumps: u32,
    pub solar_kw: f64,
}

impl Default for FarmSetup {
    fn default() -> Self {
        Self {
            name: String::new(),
            region: Region::default(),
            farm_type: FarmType::default(),
            tanks: 2,
            tank_size: 5000.0,
            pumps: 1,
            solar_kw: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum FireIntensity {
    Mild = 1,
    #[default]
    Severe = 2,
    Extreme = 3,
}

impl FireIntensity {
    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            FireIntensity::Mild => "Mild",
            FireIntensity::Severe => "Severe",
            FireIntensity::Extreme => "Extreme",
        }
    }

    /// Maps any level onto the 1..=3 scale.
    pub fn from_level_clamped(level: i64) -> Self {
        match level {
            i64::MIN..=1 => FireIntensity::Mild,
            2 => FireIntensity::Severe,
            _ => FireIntensity::Extreme,
        }
    }
}

impl TryFrom<u8> for FireIntensity {
    type Error = InputError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(FireIntensity::Mild),
            2 => Ok(FireIntensity::Severe),
            3 => Ok(FireIntensity::Extreme),
            other => Err(InputError::FireIntensity(i64::from(other))),
        }
    }
}

impl From<FireIntensity> for u8 {
    fn from(intensity: FireIntensity) -> Self {
        intensity.level()
    }
}

/// Conditions a farm is evaluated against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioParams {
    pub fire_intensity: FireIntensity,
    pub outage_hours: f64,
    /// Fraction of pump flow taken away from irrigation, 0..=1.
    pub diversion: f64,
    pub wind: bool,
    /// Collected but not consulted by the evaluator.
    pub rain: bool,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            fire_intensity: FireIntensity::default(),
            outage_hours: 4.0,
            diversion: 0.25,
            wind: false,
            rain: false,
        }
    }
}

/// An hour quantity as shown on the results panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hours {
    Finite(f64),
    /// No exhaustion under the current draw.
    Unbounded,
    /// Nothing was evaluated.
    Unknown,
}

impl Hours {
    pub const UNKNOWN_MARKER: &'static str = "unknown";

    pub(crate) fn from_value(value: f64) -> Self {
        if value.is_finite() {
            Hours::Finite(value)
        } else {
            Hours::Unbounded
        }
    }
}

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hours::Finite(value) => write!(f, "{} h", value),
            Hours::Unbounded | Hours::Unknown => f.write_str(Self::UNKNOWN_MARKER),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioSummary {
    pub first_failure: Hours,
    pub water_hours: Hours,
    pub power_hours: Hours,
    pub recs: Vec<String>,
    pub risk_note: String,
}

impl ScenarioSummary {
    pub fn unset() -> Self {
        Self {
            first_failure: Hours::Unknown,
            water_hours: Hours::Unknown,
            power_hours: Hours::Unknown,
            recs: Vec::new(),
            risk_note: String::new(),
        }
    }

    pub fn display(&self) -> SummaryDisplay {
        SummaryDisplay {
            first_failure: self.first_failure.to_string(),
            water_hours: self.water_hours.to_string(),
            power_hours: self.power_hours.to_string(),
            recs: self.recs.clone(),
            risk_note: self.risk_note.clone(),
        }
    }
}

/// String form of a summary, ready for a results panel or JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryDisplay {
    pub first_failure: String,
    pub water_hours: String,
    pub power_hours: String,
    pub recs: Vec<String>,
    pub risk_note: String,
}

/// Intermediate quantities behind a summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResourceMetrics {
    pub pump_draw_kw: f64,
    pub flow_rate_gpm: f64,
    pub total_gallons: f64,
}
