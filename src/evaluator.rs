use crate::models::{
    FarmSetup, FireIntensity, Hours, ResourceMetrics, ScenarioParams, ScenarioSummary,
};

pub const PUMP_DRAW_KW: f64 = 1.5;
pub const PUMP_FLOW_GPM: f64 = 20.0;
pub const USABLE_DAYLIGHT_HOURS: f64 = 6.0;
pub const MIN_AUTONOMY_HOURS: f64 = 4.0;

pub const REC_WATER: &str =
    "Increase tank capacity or reduce irrigation rate to achieve at least 4 hours of autonomy.";
pub const REC_POWER: &str =
    "Add solar or backup power to keep pumps running for a minimum of 4 hours.";
pub const REC_FIRE: &str =
    "Prepare fire breaks and non-combustible zones near tanks and pump houses.";
pub const REC_WIND: &str =
    "High winds detected: secure loose equipment and consider additional water staging.";
pub const REC_BALANCED: &str = "Configuration looks balanced for this scenario.";
pub const RISK_OUTAGE: &str = "Grid outage exceeds on-site power autonomy.";

pub fn resource_metrics(setup: &FarmSetup, params: &ScenarioParams) -> ResourceMetrics {
    let pumps = f64::from(setup.pumps);
    ResourceMetrics {
        pump_draw_kw: PUMP_DRAW_KW * pumps,
        flow_rate_gpm: PUMP_FLOW_GPM * pumps * (1.0 - params.diversion),
        total_gallons: f64::from(setup.tanks) * setup.tank_size,
    }
}

/// Derives autonomy metrics and recommendations for one scenario.
///
/// Returns the unset summary when either input is missing. Inputs are taken
/// as already range-checked.
pub fn evaluate(setup: Option<&FarmSetup>, params: Option<&ScenarioParams>) -> ScenarioSummary {
    let (setup, params) = match (setup, params) {
        (Some(setup), Some(params)) => (setup, params),
        _ => return ScenarioSummary::unset(),
    };

    let metrics = resource_metrics(setup, params);

    let water_hours = if metrics.flow_rate_gpm > 0.0 {
        let hours = metrics.total_gallons / (metrics.flow_rate_gpm * 60.0);
        ((hours * 10.0).round() / 10.0).max(0.0)
    } else {
        f64::INFINITY
    };

    // Zero pumps gives an infinite ratio.
    let power_hours = if setup.solar_kw > 0.0 {
        (setup.solar_kw / metrics.pump_draw_kw * USABLE_DAYLIGHT_HOURS).round()
    } else {
        0.0
    };

    // An explicit outage overrides the computed power autonomy.
    let power_limit = if params.outage_hours > 0.0 {
        params.outage_hours
    } else {
        binding(power_hours)
    };
    let first_failure = binding(water_hours).min(power_limit);

    let mut recs = Vec::new();
    if water_hours < MIN_AUTONOMY_HOURS {
        recs.push(REC_WATER.to_string());
    }
    if power_hours < MIN_AUTONOMY_HOURS {
        recs.push(REC_POWER.to_string());
    }
    if params.fire_intensity >= FireIntensity::Extreme {
        recs.push(REC_FIRE.to_string());
    }
    if params.wind {
        recs.push(REC_WIND.to_string());
    }
    if recs.is_empty() {
        recs.push(REC_BALANCED.to_string());
    }

    let risk_note = if params.outage_hours > power_hours {
        RISK_OUTAGE.to_string()
    } else {
        String::new()
    };

    ScenarioSummary {
        first_failure: Hours::from_value(first_failure),
        water_hours: Hours::from_value(water_hours),
        power_hours: Hours::from_value(power_hours),
        recs,
        risk_note,
    }
}

/// A zero or non-finite reading does not constrain time to first failure.
fn binding(hours: f64) -> f64 {
    if hours.is_finite() && hours != 0.0 {
        hours
    } else {
        f64::INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(tanks: u32, tank_size: f64, pumps: u32, solar_kw: f64) -> FarmSetup {
        FarmSetup {
            tanks,
            tank_size,
            pumps,
            solar_kw,
            ..FarmSetup::default()
        }
    }

    fn params(
        fire: FireIntensity,
        outage_hours: f64,
        diversion: f64,
        wind: bool,
    ) -> ScenarioParams {
        ScenarioParams {
            fire_intensity: fire,
            outage_hours,
            diversion,
            wind,
            rain: false,
        }
    }

    fn as_number(hours: Hours) -> f64 {
        match hours {
            Hours::Finite(value) => value,
            Hours::Unbounded => f64::INFINITY,
            Hours::Unknown => panic!("summary was not evaluated"),
        }
    }

    #[test]
    fn default_farm_matches_reference_example() {
        let setup = FarmSetup::default();
        let params = ScenarioParams::default();

        let metrics = resource_metrics(&setup, &params);
        assert_eq!(metrics.pump_draw_kw, 1.5);
        assert_eq!(metrics.flow_rate_gpm, 15.0);
        assert_eq!(metrics.total_gallons, 10000.0);

        let summary = evaluate(Some(&setup), Some(&params));
        assert_eq!(summary.water_hours, Hours::Finite(11.1));
        assert_eq!(summary.power_hours, Hours::Finite(20.0));
        assert_eq!(summary.first_failure, Hours::Finite(4.0));
        assert!(summary.risk_note.is_empty());
        assert_eq!(summary.recs, vec![REC_BALANCED.to_string()]);

        let display = summary.display();
        assert_eq!(display.water_hours, "11.1 h");
        assert_eq!(display.power_hours, "20 h");
        assert_eq!(display.first_failure, "4 h");
    }

    #[test]
    fn missing_input_yields_unset_summary() {
        let setup = FarmSetup::default();
        let params = ScenarioParams::default();
        assert_eq!(evaluate(None, Some(&params)), ScenarioSummary::unset());
        assert_eq!(evaluate(Some(&setup), None), ScenarioSummary::unset());
        assert_eq!(evaluate(None, None), ScenarioSummary::unset());
    }

    #[test]
    fn zero_flow_leaves_water_unbounded() {
        let no_pumps = setup(2, 5000.0, 0, 5.0);
        let summary = evaluate(
            Some(&no_pumps),
            Some(&params(FireIntensity::Severe, 6.0, 0.25, false)),
        );
        assert_eq!(summary.water_hours, Hours::Unbounded);
        assert_eq!(summary.first_failure, Hours::Finite(6.0));

        let full_diversion = params(FireIntensity::Severe, 0.0, 1.0, false);
        let summary = evaluate(Some(&FarmSetup::default()), Some(&full_diversion));
        assert_eq!(summary.water_hours, Hours::Unbounded);
        assert_eq!(summary.first_failure, Hours::Finite(20.0));
    }

    #[test]
    fn zero_pumps_with_solar_has_unbounded_power() {
        let no_pumps = setup(2, 5000.0, 0, 5.0);
        let summary = evaluate(
            Some(&no_pumps),
            Some(&params(FireIntensity::Mild, 0.0, 0.0, false)),
        );
        assert_eq!(summary.power_hours, Hours::Unbounded);
        assert_eq!(summary.first_failure, Hours::Unbounded);
        assert_eq!(summary.display().first_failure, "unknown");
        assert!(summary.risk_note.is_empty());
        assert_eq!(summary.recs, vec![REC_BALANCED.to_string()]);
    }

    #[test]
    fn no_solar_means_zero_power_and_outage_risk() {
        let no_solar = setup(2, 5000.0, 1, 0.0);
        for outage in [0.5, 4.0, 24.0] {
            let summary = evaluate(
                Some(&no_solar),
                Some(&params(FireIntensity::Severe, outage, 0.25, false)),
            );
            assert_eq!(summary.power_hours, Hours::Finite(0.0));
            assert_eq!(summary.risk_note, RISK_OUTAGE);
            assert!(summary.recs.contains(&REC_POWER.to_string()));
        }

        let summary = evaluate(
            Some(&no_solar),
            Some(&params(FireIntensity::Severe, 0.0, 0.25, false)),
        );
        assert!(summary.risk_note.is_empty());
        // Zero power autonomy does not bind; water does.
        assert_eq!(summary.first_failure, Hours::Finite(11.1));
    }

    #[test]
    fn risk_note_requires_strictly_longer_outage() {
        let setup = FarmSetup::default();
        let equal = evaluate(Some(&setup), Some(&params(FireIntensity::Severe, 20.0, 0.25, false)));
        assert!(equal.risk_note.is_empty());
        let longer = evaluate(
            Some(&setup),
            Some(&params(FireIntensity::Severe, 21.0, 0.25, false)),
        );
        assert_eq!(longer.risk_note, RISK_OUTAGE);
    }

    #[test]
    fn outage_overrides_power_even_when_longer() {
        let setup = setup(10, 5000.0, 1, 0.5);
        let summary = evaluate(Some(&setup), Some(&params(FireIntensity::Mild, 24.0, 0.0, false)));
        assert_eq!(summary.power_hours, Hours::Finite(2.0));
        assert_eq!(summary.water_hours, Hours::Finite(41.7));
        assert_eq!(summary.first_failure, Hours::Finite(24.0));
    }

    #[test]
    fn empty_tanks_do_not_bind_first_failure() {
        let dry = setup(0, 5000.0, 1, 5.0);
        let summary = evaluate(Some(&dry), Some(&params(FireIntensity::Severe, 0.0, 0.25, false)));
        assert_eq!(summary.water_hours, Hours::Finite(0.0));
        assert_eq!(summary.first_failure, Hours::Finite(20.0));
        assert_eq!(summary.recs, vec![REC_WATER.to_string()]);
    }

    #[test]
    fn all_recommendations_in_fixed_order() {
        let weak = setup(1, 500.0, 2, 1.0);
        let summary = evaluate(Some(&weak), Some(&params(FireIntensity::Extreme, 4.0, 0.0, true)));
        assert_eq!(
            summary.recs,
            vec![
                REC_WATER.to_string(),
                REC_POWER.to_string(),
                REC_FIRE.to_string(),
                REC_WIND.to_string(),
            ]
        );
        assert_eq!(summary.risk_note, RISK_OUTAGE);
    }

    #[test]
    fn severe_fire_alone_is_balanced() {
        let summary = evaluate(
            Some(&FarmSetup::default()),
            Some(&params(FireIntensity::Severe, 4.0, 0.25, false)),
        );
        assert!(!summary.recs.contains(&REC_FIRE.to_string()));
    }

    #[test]
    fn rain_flag_does_not_change_summary() {
        let setup = FarmSetup::default();
        let dry = ScenarioParams::default();
        let wet = ScenarioParams {
            rain: true,
            ..ScenarioParams::default()
        };
        assert_eq!(evaluate(Some(&setup), Some(&dry)), evaluate(Some(&setup), Some(&wet)));
    }

    #[test]
    fn evaluation_is_idempotent() {
        let setup = setup(3, 1200.0, 2, 3.0);
        let params = params(FireIntensity::Extreme, 9.0, 0.4, true);
        assert_eq!(
            evaluate(Some(&setup), Some(&params)),
            evaluate(Some(&setup), Some(&params))
        );
    }

    #[test]
    fn water_hours_never_drop_as_tanks_grow() {
        let params = ScenarioParams::default();
        let mut previous = 0.0;
        for size in (0..=20).map(|step| f64::from(step) * 750.0) {
            let summary = evaluate(Some(&setup(2, size, 1, 5.0)), Some(&params));
            let hours = as_number(summary.water_hours);
            assert!(hours >= previous, "size {} gave {} after {}", size, hours, previous);
            previous = hours;
        }
    }

    #[test]
    fn water_hours_never_drop_as_diversion_grows() {
        let setup = setup(2, 5000.0, 2, 5.0);
        let mut previous = 0.0;
        for step in 0..=20 {
            let diversion = f64::from(step) * 0.05;
            let summary = evaluate(
                Some(&setup),
                Some(&params(FireIntensity::Severe, 4.0, diversion, false)),
            );
            let hours = as_number(summary.water_hours);
            assert!(hours >= previous, "diversion {} gave {} after {}", diversion, hours, previous);
            previous = hours;
        }
    }
}
