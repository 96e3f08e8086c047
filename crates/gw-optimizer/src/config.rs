//! Search configuration and defaults.

use serde::{Deserialize, Serialize};

use gw_types::{GwResult, Objective, ParameterSpace};

/// Trials run when the configured count is zero.
pub const DEFAULT_TRIAL_COUNT: usize = 10;

/// Per-trial iteration cap when the configured cap is zero.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Whether we are maximizing or minimizing the objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObjectiveDirection {
    Maximize,
    #[default]
    Minimize,
}

impl ObjectiveDirection {
    /// Strict improvement of `candidate` over `incumbent`; ties never improve.
    pub fn improves(self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Self::Maximize => candidate > incumbent,
            Self::Minimize => candidate < incumbent,
        }
    }
}

/// What the ensemble does when a trial's objective evaluation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Fail the whole search with the first error observed.
    #[default]
    AbortSearch,
    /// Drop the failed trial and aggregate the survivors.
    DiscardTrial,
}

/// Tunable knobs of a search, independent of the space and objective.
///
/// Zero counts mean "use the default" and are resolved when a search starts,
/// so settings loaded from JSON may simply omit them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Number of independent random-restart trials.
    pub trial_count: usize,

    /// Maximum neighbor-search iterations per trial.
    pub max_iterations: usize,

    /// Seed for the per-search generator; `None` draws from OS entropy.
    pub seed: Option<u64>,

    /// Size of a dedicated worker pool; `None` uses the global rayon pool.
    pub threads: Option<usize>,

    pub failure_policy: FailurePolicy,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            trial_count: DEFAULT_TRIAL_COUNT,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            seed: None,
            threads: None,
            failure_policy: FailurePolicy::AbortSearch,
        }
    }
}

impl SearchSettings {
    pub fn with_trials(mut self, n: usize) -> Self {
        self.trial_count = n;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_threads(mut self, n: usize) -> Self {
        self.threads = Some(n);
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn resolved_trial_count(&self) -> usize {
        if self.trial_count == 0 {
            DEFAULT_TRIAL_COUNT
        } else {
            self.trial_count
        }
    }

    pub fn resolved_max_iterations(&self) -> usize {
        if self.max_iterations == 0 {
            DEFAULT_MAX_ITERATIONS
        } else {
            self.max_iterations
        }
    }
}

/// Everything one search call needs. Read-only for the duration of a search.
pub struct SearchConfig<O> {
    pub space: ParameterSpace,
    pub objective: O,
    pub settings: SearchSettings,
}

impl<O: Objective> SearchConfig<O> {
    pub fn new(space: ParameterSpace, objective: O) -> Self {
        Self {
            space,
            objective,
            settings: SearchSettings::default(),
        }
    }

    /// Validate raw dimension lists and build a config around them.
    pub fn from_dimensions(dimensions: Vec<Vec<f64>>, objective: O) -> GwResult<Self> {
        Ok(Self::new(ParameterSpace::new(dimensions)?, objective))
    }

    pub fn with_settings(mut self, settings: SearchSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_trials(mut self, n: usize) -> Self {
        self.settings.trial_count = n;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.settings.max_iterations = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.settings.seed = Some(seed);
        self
    }
}

impl<O> std::fmt::Debug for SearchConfig<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("space", &self.space)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
