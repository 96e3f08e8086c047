//! Best-of selection over an ensemble.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ObjectiveDirection;
use crate::ensemble::Ensemble;
use crate::walker::{Termination, TrialResult};

/// Pick the best trial by a strict comparator.
///
/// The running best is replaced only on strict improvement, so among exact
/// ties the first trial encountered wins. Returns `None` for an empty slice.
pub fn select_best(results: &[TrialResult], direction: ObjectiveDirection) -> Option<&TrialResult> {
    let mut best: Option<&TrialResult> = None;
    for result in results {
        let dominated = match best {
            None => true,
            Some(current_best) => direction.improves(result.value, current_best.value),
        };
        if dominated {
            best = Some(result);
        }
    }
    best
}

/// Best trial of a search together with ensemble diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    pub direction: ObjectiveDirection,
    pub best: TrialResult,
    pub trials_completed: usize,
    pub trials_discarded: usize,
    /// Completed trials that stopped on convergence rather than the cap.
    pub trials_converged: usize,
    pub total_evaluations: usize,
    pub elapsed: Duration,
}

impl SearchReport {
    /// Summarize an ensemble; `None` if it holds no completed trial.
    pub fn from_ensemble(
        ensemble: &Ensemble,
        direction: ObjectiveDirection,
        elapsed: Duration,
    ) -> Option<Self> {
        let best = select_best(&ensemble.trials, direction)?.clone();
        Some(Self {
            direction,
            best,
            trials_completed: ensemble.trials.len(),
            trials_discarded: ensemble.discarded,
            trials_converged: ensemble
                .trials
                .iter()
                .filter(|t| t.termination == Termination::Converged)
                .count(),
            total_evaluations: ensemble.trials.iter().map(|t| t.evaluations).sum(),
            elapsed,
        })
    }

    pub fn value(&self) -> f64 {
        self.best.value
    }

    pub fn values(&self) -> &[f64] {
        &self.best.values
    }

    /// The `(value, parameters)` pair handed back by `minimize`/`maximize`.
    pub fn into_pair(self) -> (f64, Vec<f64>) {
        (self.best.value, self.best.values)
    }
}
