use tracing::info;

use crate::evaluator;
use crate::models::{FarmSetup, ScenarioParams, ScenarioSummary};

/// Form state plus the last computed result.
///
/// Editing the setup or the scenario never recomputes; only [`Session::run`]
/// does.
#[derive(Debug, Default)]
pub struct Session {
    setup: Option<FarmSetup>,
    params: Option<ScenarioParams>,
    result: Option<ScenarioSummary>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_setup(&mut self, setup: FarmSetup) {
        self.setup = Some(setup);
    }

    pub fn update_params(&mut self, params: ScenarioParams) {
        self.params = Some(params);
    }

    /// Adopts `params` when given, then recomputes the summary.
    pub fn run(&mut self, params: Option<ScenarioParams>) -> &ScenarioSummary {
        if let Some(params) = params {
            self.params = Some(params);
        }
        let summary = evaluator::evaluate(self.setup.as_ref(), self.params.as_ref());
        info!(
            first_failure = %summary.first_failure,
            water = %summary.water_hours,
            power = %summary.power_hours,
            recs = summary.recs.len(),
            "simulation run"
        );
        self.result.insert(summary)
    }

    /// Latest result, or the unset summary before the first run.
    pub fn summary(&self) -> ScenarioSummary {
        self.result.clone().unwrap_or_else(ScenarioSummary::unset)
    }
}
