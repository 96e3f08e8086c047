//! The demo objectives and the searches run over them.

use serde::Serialize;
use tracing::info;

use gw_optimizer::{search, ObjectiveDirection, SearchConfig, SearchReport, SearchSettings};
use gw_types::{GwResult, Objective, ParameterSpace};

/// One printed search outcome.
#[derive(Debug, Serialize)]
struct DemoRun<'a> {
    model: &'a str,
    duration_ms: u128,
    report: &'a SearchReport,
}

fn grid(dims: usize) -> GwResult<ParameterSpace> {
    ParameterSpace::builder()
        .repeat_stepped(dims, -3.0, 3.0, 0.5)
        .build()
}

/// `x^4 - 3x^2 + 2x` has grid local minima at `x = 1` and `x = -1.5`; the
/// latter is global.
fn quartic(x: f64) -> f64 {
    x.powi(4) - 3.0 * x.powi(2) + 2.0 * x
}

/// Eight independent quartics: one trial usually lands in a local minimum,
/// a hundred trials usually find the global maximum of the negated sum.
pub fn local_minima(settings: &SearchSettings) -> anyhow::Result<()> {
    let summed = |v: &[f64]| v.iter().map(|&x| quartic(x)).sum::<f64>();
    let minimize = SearchConfig::new(grid(8)?, summed)
        .with_settings(settings.clone().with_trials(1));
    run("local/minimize", &minimize, ObjectiveDirection::Minimize)?;

    let negated = |v: &[f64]| -v.iter().map(|&x| quartic(x)).sum::<f64>();
    let maximize = SearchConfig::new(grid(8)?, negated)
        .with_settings(settings.clone().with_trials(100));
    run("local/maximize", &maximize, ObjectiveDirection::Maximize)?;
    Ok(())
}

/// `(x^2 + 2) + (y^2 + 2) + (z^2 + 2)`, minimal at the origin.
pub fn paraboloid(settings: &SearchSettings) -> anyhow::Result<()> {
    let parabola = |x: f64| x * x + 2.0;
    let config = SearchConfig::new(grid(3)?, move |v: &[f64]| {
        parabola(v[0]) + parabola(v[1]) + parabola(v[2])
    })
    .with_settings(settings.clone().with_trials(10));
    run("paraboloid", &config, ObjectiveDirection::Minimize)
}

fn run<O: Objective>(
    model: &str,
    config: &SearchConfig<O>,
    direction: ObjectiveDirection,
) -> anyhow::Result<()> {
    info!(model, ?direction, "running search");
    let report = search(config, direction)?;
    println!("{}", demo_line(model, &report)?);
    Ok(())
}

fn demo_line(model: &str, report: &SearchReport) -> serde_json::Result<String> {
    serde_json::to_string(&DemoRun {
        model,
        duration_ms: report.elapsed.as_millis(),
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quartic_grid_minima() {
        assert_eq!(quartic(1.0), 0.0);
        assert_eq!(quartic(-1.5), -4.6875);
        assert!(quartic(-1.0) > quartic(-1.5));
        assert!(quartic(-2.0) > quartic(-1.5));
        assert!(quartic(0.5) > quartic(1.0));
        assert!(quartic(1.5) > quartic(1.0));
    }

    #[test]
    fn demo_grids_span_minus_three_to_three() {
        let space = grid(3).unwrap();
        assert_eq!(space.lengths(), &[13, 13, 13]);
        assert_eq!(space.dimension(0).first(), Some(&-3.0));
        assert_eq!(space.dimension(0).last(), Some(&3.0));
    }

    #[test]
    fn demo_line_reports_best_once() {
        let config = SearchConfig::new(grid(2).unwrap(), |v: &[f64]| v[0] * v[0] + v[1] * v[1])
            .with_settings(SearchSettings::default().with_trials(2).with_seed(1));
        let report = search(&config, ObjectiveDirection::Minimize).unwrap();
        let line = demo_line("bowl", &report).unwrap();

        let json: serde_json::Value = serde_json::from_str(&line).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 3);
        assert_eq!(json["model"], "bowl");
        assert_eq!(json["report"]["best"]["value"], 0.0);
        assert_eq!(line.matches("\"best\"").count(), 1);
    }

    #[test]
    fn demos_run_with_fixed_seed() {
        let settings = SearchSettings::default().with_seed(7);
        local_minima(&settings).unwrap();
        paraboloid(&settings).unwrap();
    }
}
