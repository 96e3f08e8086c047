//! Single-trial neighbor search.
//!
//! A walker starts at a random grid point and repeatedly proposes, for every
//! dimension at once, a one-index move towards a strictly better neighbor.
//! All proposals of an iteration are judged against the same baseline value;
//! the composed move is adopted only if it strictly improves as a whole.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use gw_types::{GwError, GwResult, Objective, ObjectiveError, ParameterSpace};

use crate::config::{ObjectiveDirection, SearchConfig};

/// Why a trial stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// No composed move strictly improved on the current point.
    Converged,
    /// The iteration cap was hit while still improving.
    IterationCap,
}

/// Outcome of a single trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    pub trial: usize,
    pub value: f64,
    pub values: Vec<f64>,
    pub indices: Vec<usize>,
    /// Number of adopted moves.
    pub steps: usize,
    /// Objective calls made by this trial, including the start and final ones.
    pub evaluations: usize,
    pub termination: Termination,
}

/// Runs one local-search trial against a shared, read-only configuration.
pub struct Walker<'a, O> {
    space: &'a ParameterSpace,
    objective: &'a O,
    direction: ObjectiveDirection,
    max_iterations: usize,
    trial: usize,
}

impl<'a, O: Objective> Walker<'a, O> {
    pub fn new(config: &'a SearchConfig<O>, direction: ObjectiveDirection, trial: usize) -> Self {
        Self {
            space: &config.space,
            objective: &config.objective,
            direction,
            max_iterations: config.settings.resolved_max_iterations(),
            trial,
        }
    }

    /// Climb from a uniformly random grid point.
    pub fn run<R: Rng>(&self, rng: &mut R) -> GwResult<TrialResult> {
        let start = self
            .space
            .lengths()
            .iter()
            .map(|&len| rng.random_range(0..len))
            .collect();
        self.climb(start)
    }

    /// Climb from a caller-chosen index vector.
    pub fn climb_from(&self, start: &[usize]) -> GwResult<TrialResult> {
        self.space.check_indices(start)?;
        self.climb(start.to_vec())
    }

    fn climb(&self, start: Vec<usize>) -> GwResult<TrialResult> {
        let mut evaluator = Evaluator {
            space: self.space,
            objective: self.objective,
            count: 0,
        };
        self.climb_with(&mut evaluator, start)
            .map_err(|source| GwError::Objective {
                trial: self.trial,
                source,
            })
    }

    fn climb_with(
        &self,
        evaluator: &mut Evaluator<'_, O>,
        start: Vec<usize>,
    ) -> Result<TrialResult, ObjectiveError> {
        let mut indices = start;
        let mut current = evaluator.eval(&indices)?;
        let mut steps = 0;
        let mut termination = Termination::IterationCap;

        while steps < self.max_iterations {
            let candidate = self.propose(evaluator, &indices, current)?;
            if candidate == indices {
                termination = Termination::Converged;
                break;
            }

            let candidate_value = evaluator.eval(&candidate)?;
            debug!(
                trial = self.trial,
                iteration = steps,
                current,
                candidate_value,
                ?indices,
                ?candidate,
                "composed move"
            );
            if !self.direction.improves(candidate_value, current) {
                termination = Termination::Converged;
                break;
            }

            indices = candidate;
            current = candidate_value;
            steps += 1;
        }

        if termination == Termination::IterationCap {
            debug!(
                trial = self.trial,
                max_iterations = self.max_iterations,
                "reached iteration cap before converging"
            );
        }

        let value = evaluator.eval(&indices)?;
        Ok(TrialResult {
            trial: self.trial,
            value,
            values: self.space.values_at(&indices),
            indices,
            steps,
            evaluations: evaluator.count,
            termination,
        })
    }

    /// Per-dimension neighbor decisions against the shared `current` baseline.
    fn propose(
        &self,
        evaluator: &mut Evaluator<'_, O>,
        indices: &[usize],
        current: f64,
    ) -> Result<Vec<usize>, ObjectiveError> {
        let mut next = indices.to_vec();
        let mut probe = indices.to_vec();

        for (dim, &idx) in indices.iter().enumerate() {
            let len = self.space.len_of(dim);
            if len == 1 {
                continue;
            }

            let up = if idx + 1 < len {
                probe[dim] = idx + 1;
                Some(evaluator.eval(&probe)?)
            } else {
                None
            };
            let down = if idx > 0 {
                probe[dim] = idx - 1;
                Some(evaluator.eval(&probe)?)
            } else {
                None
            };
            probe[dim] = idx;

            // Upper neighbor wins when both improve.
            let chosen = match (up, down) {
                (Some(v), _) if self.direction.improves(v, current) => idx + 1,
                (_, Some(v)) if self.direction.improves(v, current) => idx - 1,
                _ => idx,
            };
            trace!(
                trial = self.trial,
                dim,
                idx,
                current,
                ?up,
                ?down,
                chosen,
                "neighbor decision"
            );
            next[dim] = chosen;
        }

        Ok(next)
    }
}

/// Counts objective calls and rejects NaN results.
struct Evaluator<'a, O> {
    space: &'a ParameterSpace,
    objective: &'a O,
    count: usize,
}

impl<O: Objective> Evaluator<'_, O> {
    fn eval(&mut self, indices: &[usize]) -> Result<f64, ObjectiveError> {
        let values = self.space.values_at(indices);
        self.count += 1;
        let value = self.objective.evaluate(&values)?;
        if value.is_nan() {
            return Err(ObjectiveError::NotANumber { values });
        }
        Ok(value)
    }
}
