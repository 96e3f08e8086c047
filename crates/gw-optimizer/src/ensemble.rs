//! Concurrent fan-out of independent trials.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{info, warn};

use gw_types::{GwError, GwResult, Objective};

use crate::config::{FailurePolicy, ObjectiveDirection, SearchConfig, SearchSettings};
use crate::walker::{TrialResult, Walker};

/// All trial results of one search call, in trial-number order.
#[derive(Debug, Clone, PartialEq)]
pub struct Ensemble {
    pub trials: Vec<TrialResult>,
    /// Trials dropped under [`FailurePolicy::DiscardTrial`].
    pub discarded: usize,
}

/// Run `trial_count` walkers concurrently and wait for all of them.
///
/// Each trial draws its start from a private generator seeded by the
/// per-search master generator, so a fixed `seed` reproduces the same
/// ensemble whatever the thread scheduling.
pub fn run_ensemble<O: Objective>(
    config: &SearchConfig<O>,
    direction: ObjectiveDirection,
) -> GwResult<Ensemble> {
    let settings = &config.settings;
    let seeds = trial_seeds(settings);
    info!(
        trials = seeds.len(),
        dims = config.space.dims(),
        max_iterations = settings.resolved_max_iterations(),
        ?direction,
        "starting ensemble"
    );

    let policy = settings.failure_policy;
    let work = || match policy {
        FailurePolicy::AbortSearch => seeds
            .par_iter()
            .enumerate()
            .map(|(trial, &seed)| run_trial(config, direction, trial, seed))
            .collect::<GwResult<Vec<_>>>()
            .map(|trials| Ensemble {
                trials,
                discarded: 0,
            }),
        FailurePolicy::DiscardTrial => {
            let outcomes: Vec<GwResult<TrialResult>> = seeds
                .par_iter()
                .enumerate()
                .map(|(trial, &seed)| run_trial(config, direction, trial, seed))
                .collect();
            keep_survivors(outcomes)
        }
    };

    let ensemble = match settings.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("gridwalk-{i}"))
            .build()
            .map_err(|e| GwError::ThreadPool(e.to_string()))?
            .install(work),
        None => work(),
    }?;

    info!(
        completed = ensemble.trials.len(),
        discarded = ensemble.discarded,
        "ensemble finished"
    );
    Ok(ensemble)
}

fn run_trial<O: Objective>(
    config: &SearchConfig<O>,
    direction: ObjectiveDirection,
    trial: usize,
    seed: u64,
) -> GwResult<TrialResult> {
    let mut rng = StdRng::seed_from_u64(seed);
    Walker::new(config, direction, trial).run(&mut rng)
}

fn trial_seeds(settings: &SearchSettings) -> Vec<u64> {
    let mut master = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    (0..settings.resolved_trial_count())
        .map(|_| master.random())
        .collect()
}

fn keep_survivors(outcomes: Vec<GwResult<TrialResult>>) -> GwResult<Ensemble> {
    let total = outcomes.len();
    let mut trials = Vec::with_capacity(total);
    let mut last_failure = None;

    for outcome in outcomes {
        match outcome {
            Ok(result) => trials.push(result),
            Err(GwError::Objective { trial, source }) => {
                warn!(trial, error = %source, "discarding failed trial");
                last_failure = Some(source);
            }
            Err(other) => return Err(other),
        }
    }

    match last_failure {
        Some(last) if trials.is_empty() => Err(GwError::AllTrialsFailed {
            trials: total,
            last,
        }),
        _ => Ok(Ensemble {
            discarded: total - trials.len(),
            trials,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gw_types::{stepped_axis, Fallible, ObjectiveError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn axis() -> Vec<f64> {
        stepped_axis(-3.0, 3.0, 0.5).unwrap()
    }

    fn quartic_sum(v: &[f64]) -> f64 {
        v.iter()
            .map(|&x| x.powi(4) - 3.0 * x.powi(2) + 2.0 * x)
            .sum()
    }

    #[test]
    fn runs_requested_number_of_trials_in_order() {
        let config = SearchConfig::from_dimensions(vec![axis(); 3], quartic_sum)
            .unwrap()
            .with_trials(17)
            .with_seed(1);
        let ensemble = run_ensemble(&config, ObjectiveDirection::Minimize).unwrap();
        assert_eq!(ensemble.trials.len(), 17);
        assert_eq!(ensemble.discarded, 0);
        for (i, trial) in ensemble.trials.iter().enumerate() {
            assert_eq!(trial.trial, i);
        }
    }

    #[test]
    fn zero_trial_count_uses_default() {
        let config = SearchConfig::from_dimensions(vec![axis()], quartic_sum)
            .unwrap()
            .with_trials(0)
            .with_seed(2);
        let ensemble = run_ensemble(&config, ObjectiveDirection::Minimize).unwrap();
        assert_eq!(ensemble.trials.len(), crate::config::DEFAULT_TRIAL_COUNT);
    }

    #[test]
    fn fixed_seed_is_reproducible_across_pool_sizes() {
        let base = SearchConfig::from_dimensions(vec![axis(); 4], quartic_sum)
            .unwrap()
            .with_trials(12)
            .with_seed(42);
        let global = run_ensemble(&base, ObjectiveDirection::Minimize).unwrap();

        let pinned = SearchConfig::from_dimensions(vec![axis(); 4], quartic_sum)
            .unwrap()
            .with_settings(base.settings.clone().with_threads(2));
        let dedicated = run_ensemble(&pinned, ObjectiveDirection::Minimize).unwrap();

        assert_eq!(global, dedicated);
    }

    #[test]
    fn objective_is_called_from_every_trial() {
        let calls = AtomicUsize::new(0);
        let config = SearchConfig::from_dimensions(vec![axis(); 2], |v: &[f64]| {
            calls.fetch_add(1, Ordering::Relaxed);
            quartic_sum(v)
        })
        .unwrap()
        .with_trials(8)
        .with_seed(3);
        let ensemble = run_ensemble(&config, ObjectiveDirection::Minimize).unwrap();
        let counted: usize = ensemble.trials.iter().map(|t| t.evaluations).sum();
        assert_eq!(calls.load(Ordering::Relaxed), counted);
    }

    #[test]
    fn abort_policy_fails_the_search() {
        let config = SearchConfig::from_dimensions(
            vec![axis()],
            Fallible(|_: &[f64]| Err::<f64, _>("model unavailable")),
        )
        .unwrap()
        .with_trials(4)
        .with_seed(4);
        let err = run_ensemble(&config, ObjectiveDirection::Maximize).unwrap_err();
        assert!(matches!(
            err,
            GwError::Objective { source, .. } if source == ObjectiveError::failed("model unavailable")
        ));
    }

    #[test]
    fn discard_policy_drops_failed_trials() {
        // Starts at or right of zero touch a positive value and fail; starts
        // left of zero walk left and never probe the failing region.
        let config = SearchConfig::from_dimensions(
            vec![axis()],
            Fallible(|v: &[f64]| if v[0] > 0.0 { Err("positive") } else { Ok(v[0]) }),
        )
        .unwrap()
        .with_settings(
            SearchSettings::default()
                .with_trials(40)
                .with_seed(5)
                .with_failure_policy(FailurePolicy::DiscardTrial),
        );
        let ensemble = run_ensemble(&config, ObjectiveDirection::Minimize).unwrap();
        assert_eq!(ensemble.trials.len() + ensemble.discarded, 40);
        assert!(ensemble.discarded > 0);
        assert!(!ensemble.trials.is_empty());
        for trial in &ensemble.trials {
            assert_eq!(trial.values, vec![-3.0]);
        }
    }

    #[test]
    fn discard_policy_reports_total_failure() {
        let config = SearchConfig::from_dimensions(
            vec![axis()],
            Fallible(|_: &[f64]| Err::<f64, _>("always")),
        )
        .unwrap()
        .with_settings(
            SearchSettings::default()
                .with_trials(3)
                .with_failure_policy(FailurePolicy::DiscardTrial),
        );
        assert_eq!(
            run_ensemble(&config, ObjectiveDirection::Minimize),
            Err(GwError::AllTrialsFailed {
                trials: 3,
                last: ObjectiveError::failed("always"),
            })
        );
    }
}
