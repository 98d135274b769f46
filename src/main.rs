use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;

mod config;
mod error;
mod evaluator;
mod models;
mod report;
mod session;

use config::{FarmFile, LabeledScenario};
use models::{FarmSetup, FarmType, Region, ScenarioParams, ScenarioSummary};
use session::Session;

#[derive(Parser)]
#[command(name = "aquashield")]
#[command(
    about = "Wildfire-resilient farm simulator: water and power autonomy under fire scenarios",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one scenario against a farm setup
    Evaluate {
        #[command(flatten)]
        farm: FarmArgs,
        #[command(flatten)]
        scenario: ScenarioArgs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Evaluate every scenario in a CSV file against one farm setup
    Batch {
        #[command(flatten)]
        farm: FarmArgs,
        #[arg(long)]
        csv: PathBuf,
    },
    /// Write a markdown report
    Report {
        #[command(flatten)]
        farm: FarmArgs,
        #[command(flatten)]
        scenario: ScenarioArgs,
        /// Scenario batch to report on instead of a single scenario
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Print a farm file populated with default values
    Defaults,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Markdown,
}

/// Farm setup flags; each one overrides the farm file.
#[derive(Args)]
struct FarmArgs {
    /// TOML farm file with [setup] and [scenario] tables
    #[arg(long)]
    farm: Option<PathBuf>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    region: Option<Region>,
    #[arg(long)]
    farm_type: Option<FarmType>,
    #[arg(long)]
    tanks: Option<u32>,
    /// Gallons per tank
    #[arg(long)]
    tank_size: Option<f64>,
    #[arg(long)]
    pumps: Option<u32>,
    #[arg(long)]
    solar_kw: Option<f64>,
}

#[derive(Args)]
struct ScenarioArgs {
    /// 1 mild, 2 severe, 3 extreme
    #[arg(long)]
    fire_intensity: Option<i64>,
    #[arg(long)]
    outage_hours: Option<f64>,
    /// Fraction of pump flow diverted away from irrigation, 0 to 1
    #[arg(long)]
    diversion: Option<f64>,
    /// High wind; `--wind false` clears a value from the farm file
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    wind: Option<bool>,
    /// Rain event; `--rain false` clears a value from the farm file
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    rain: Option<bool>,
}

impl FarmArgs {
    fn load(&self) -> anyhow::Result<FarmFile> {
        let mut file = match &self.farm {
            Some(path) => FarmFile::load(path)?,
            None => FarmFile::default(),
        };

        let setup = &mut file.setup;
        if let Some(name) = &self.name {
            setup.name = name.clone();
        }
        if let Some(region) = self.region {
            setup.region = region;
        }
        if let Some(farm_type) = self.farm_type {
            setup.farm_type = farm_type;
        }
        if let Some(tanks) = self.tanks {
            setup.tanks = tanks;
        }
        if let Some(tank_size) = self.tank_size {
            setup.tank_size = tank_size;
        }
        if let Some(pumps) = self.pumps {
            setup.pumps = pumps;
        }
        if let Some(solar_kw) = self.solar_kw {
            setup.solar_kw = solar_kw;
        }
        file.setup = config::sanitize_setup(file.setup)?;
        Ok(file)
    }
}

impl ScenarioArgs {
    fn apply(&self, base: ScenarioParams) -> anyhow::Result<ScenarioParams> {
        let mut params = base;
        if let Some(level) = self.fire_intensity {
            params.fire_intensity = config::clamp_fire_intensity(level);
        }
        if let Some(outage_hours) = self.outage_hours {
            params.outage_hours = outage_hours;
        }
        if let Some(diversion) = self.diversion {
            params.diversion = diversion;
        }
        if let Some(wind) = self.wind {
            params.wind = wind;
        }
        if let Some(rain) = self.rain {
            params.rain = rain;
        }
        Ok(config::sanitize_params(params)?)
    }
}

/// Runs one scenario through a fresh session, as a single press of "run".
fn simulate(setup: &FarmSetup, params: &ScenarioParams) -> ScenarioSummary {
    let mut session = Session::new();
    session.update_setup(setup.clone());
    session.update_params(params.clone());
    session.run(None);
    session.summary()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate {
            farm,
            scenario,
            format,
        } => {
            let file = farm.load()?;
            let params = scenario.apply(file.scenario.clone())?;
            let setup = &file.setup;
            let summary = simulate(setup, &params);

            match format {
                OutputFormat::Text => {
                    println!("Farm layout: {}", report::layout_line(setup));
                    print!("{}", report::layout_grid());
                    println!("Scenario: {}", report::scenario_line(&params));
                    println!();
                    print!("{}", report::render_text(&summary));
                }
                OutputFormat::Json => {
                    println!("{}", report::render_json(setup, &params)?);
                }
                OutputFormat::Markdown => {
                    let scenarios = vec![LabeledScenario {
                        label: "Scenario".to_string(),
                        params,
                    }];
                    print!(
                        "{}",
                        report::build_report(setup, &scenarios, Utc::now().date_naive())
                    );
                }
            }
        }
        Commands::Batch { farm, csv } => {
            let file = farm.load()?;
            let scenarios = config::load_scenarios(&csv)
                .with_context(|| format!("failed to load scenarios from {}", csv.display()))?;

            if scenarios.is_empty() {
                println!("No scenarios found in {}.", csv.display());
                return Ok(());
            }

            println!("Farm layout: {}", report::layout_line(&file.setup));
            for scenario in scenarios.iter() {
                let summary = evaluator::evaluate(Some(&file.setup), Some(&scenario.params));
                println!(
                    "- {}: first failure {}, water {}, power {}{}",
                    scenario.label,
                    summary.first_failure,
                    summary.water_hours,
                    summary.power_hours,
                    if summary.risk_note.is_empty() {
                        String::new()
                    } else {
                        format!(" ({})", summary.risk_note)
                    }
                );
            }
        }
        Commands::Report {
            farm,
            scenario,
            csv,
            out,
        } => {
            let file = farm.load()?;
            let scenarios = match csv {
                Some(path) => config::load_scenarios(&path).with_context(|| {
                    format!("failed to load scenarios from {}", path.display())
                })?,
                None => vec![LabeledScenario {
                    label: "Scenario".to_string(),
                    params: scenario.apply(file.scenario.clone())?,
                }],
            };
            let report = report::build_report(&file.setup, &scenarios, Utc::now().date_naive());
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            info!(scenarios = scenarios.len(), "report written");
            println!("Report written to {}.", out.display());
        }
        Commands::Defaults => {
            print!("{}", FarmFile::default().to_toml()?);
        }
    }

    Ok(())
}
