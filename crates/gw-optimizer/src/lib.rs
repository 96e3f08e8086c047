//! # gw-optimizer
//!
//! Derivative-free optimization over discretized parameter grids.
//!
//! Each trial is a coordinate-wise neighbor search from a random grid point;
//! many independent trials run concurrently and the best local optimum wins.
//! Provides the search configuration, the single-trial walker, the concurrent
//! ensemble runner, and best-of aggregation.

mod aggregate;
mod config;
mod ensemble;
mod walker;

use std::time::Instant;

use tracing::info;

use gw_types::{GwError, GwResult, Objective};

pub use aggregate::{select_best, SearchReport};
pub use config::{
    FailurePolicy, ObjectiveDirection, SearchConfig, SearchSettings, DEFAULT_MAX_ITERATIONS,
    DEFAULT_TRIAL_COUNT,
};
pub use ensemble::{run_ensemble, Ensemble};
pub use walker::{Termination, TrialResult, Walker};

/// Run a full search in `direction` and report the best trial.
pub fn search<O: Objective>(
    config: &SearchConfig<O>,
    direction: ObjectiveDirection,
) -> GwResult<SearchReport> {
    let started = Instant::now();
    let ensemble = run_ensemble(config, direction)?;
    let report = SearchReport::from_ensemble(&ensemble, direction, started.elapsed())
        .ok_or(GwError::NoCompletedTrials)?;

    info!(
        ?direction,
        best = report.value(),
        converged = report.trials_converged,
        evaluations = report.total_evaluations,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "search finished"
    );
    Ok(report)
}

/// Smallest objective value found and the parameters producing it.
pub fn minimize<O: Objective>(config: &SearchConfig<O>) -> GwResult<(f64, Vec<f64>)> {
    search(config, ObjectiveDirection::Minimize).map(SearchReport::into_pair)
}

/// Largest objective value found and the parameters producing it.
pub fn maximize<O: Objective>(config: &SearchConfig<O>) -> GwResult<(f64, Vec<f64>)> {
    search(config, ObjectiveDirection::Maximize).map(SearchReport::into_pair)
}
