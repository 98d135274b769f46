use std::fmt::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::LabeledScenario;
use crate::evaluator::{self, PUMP_DRAW_KW, PUMP_FLOW_GPM};
use crate::models::{FarmSetup, ResourceMetrics, ScenarioParams, ScenarioSummary, SummaryDisplay};

const GRID_SIZE: usize = 6;

pub fn assumptions() -> Vec<String> {
    vec![
        format!("Default pump draw: {} kW per pump", PUMP_DRAW_KW),
        format!("Default irrigation rate: {} gal/min per pump", PUMP_FLOW_GPM),
        "Solar usable during daytime only".to_string(),
    ]
}

pub fn layout_line(setup: &FarmSetup) -> String {
    format!(
        "{} tanks · {} pumps · {} kW solar",
        setup.tanks, setup.pumps, setup.solar_kw
    )
}

/// Numbered plot grid shown under the farm layout line.
pub fn layout_grid() -> String {
    let mut output = String::new();
    for row in 0..GRID_SIZE {
        let cells: Vec<String> = (0..GRID_SIZE)
            .map(|col| format!("{:>3}", row * GRID_SIZE + col + 1))
            .collect();
        let _ = writeln!(output, "{}", cells.join(" "));
    }
    output
}

pub fn scenario_line(params: &ScenarioParams) -> String {
    let mut line = format!(
        "fire {} · outage {}h · diversion {}%",
        params.fire_intensity.label(),
        params.outage_hours,
        (params.diversion * 100.0).round()
    );
    if params.wind {
        line.push_str(" · high wind");
    }
    if params.rain {
        line.push_str(" · rain");
    }
    line
}

pub fn render_text(summary: &ScenarioSummary) -> String {
    let display = summary.display();
    let mut output = String::new();

    let _ = writeln!(output, "Time to first failure: {}", display.first_failure);
    let _ = writeln!(output, "Water autonomy:        {}", display.water_hours);
    let _ = writeln!(output, "Power autonomy:        {}", display.power_hours);
    let _ = writeln!(output);
    let _ = writeln!(output, "Recommendations:");
    for rec in display.recs.iter() {
        let _ = writeln!(output, "- {}", rec);
    }
    if !display.risk_note.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "! {}", display.risk_note);
    }

    output
}

#[derive(Serialize)]
struct JsonResult<'a> {
    setup: &'a FarmSetup,
    params: &'a ScenarioParams,
    metrics: ResourceMetrics,
    summary: SummaryDisplay,
}

pub fn render_json(setup: &FarmSetup, params: &ScenarioParams) -> anyhow::Result<String> {
    let result = JsonResult {
        setup,
        params,
        metrics: evaluator::resource_metrics(setup, params),
        summary: evaluator::evaluate(Some(setup), Some(params)).display(),
    };
    Ok(serde_json::to_string_pretty(&result)?)
}

pub fn build_report(
    setup: &FarmSetup,
    scenarios: &[LabeledScenario],
    generated_on: NaiveDate,
) -> String {
    let mut output = String::new();
    let farm_label = if setup.name.trim().is_empty() {
        "unnamed farm"
    } else {
        setup.name.trim()
    };

    let _ = writeln!(output, "# Wildfire Resilience Report");
    let _ = writeln!(
        output,
        "Generated for {} ({}, {}) on {}",
        farm_label, setup.region, setup.farm_type, generated_on
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Farm Layout");
    let _ = writeln!(output, "{}", layout_line(setup));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Assumptions");
    for assumption in assumptions() {
        let _ = writeln!(output, "- {}", assumption);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Scenario Overview");

    if scenarios.is_empty() {
        let _ = writeln!(output, "No scenarios evaluated.");
        return output;
    }

    let _ = writeln!(output, "| Scenario | First failure | Water | Power | Risk |");
    let _ = writeln!(output, "|---|---|---|---|---|");
    let evaluated: Vec<(&LabeledScenario, ScenarioSummary)> = scenarios
        .iter()
        .map(|scenario| {
            (
                scenario,
                evaluator::evaluate(Some(setup), Some(&scenario.params)),
            )
        })
        .collect();

    for (scenario, summary) in evaluated.iter() {
        let _ = writeln!(
            output,
            "| {} | {} | {} | {} | {} |",
            scenario.label,
            summary.first_failure,
            summary.water_hours,
            summary.power_hours,
            if summary.risk_note.is_empty() { "-" } else { "outage" }
        );
    }

    for (scenario, summary) in evaluated.iter() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## {}", scenario.label);
        let _ = writeln!(output, "{}", scenario_line(&scenario.params));
        let _ = writeln!(output);
        for rec in summary.recs.iter() {
            let _ = writeln!(output, "- {}", rec);
        }
        if !summary.risk_note.is_empty() {
            let _ = writeln!(output);
            let _ = writeln!(output, "> {}", summary.risk_note);
        }
    }

    output
}
