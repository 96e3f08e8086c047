use thiserror::Error;

/// Main error type for gridwalk searches
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GwError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Objective failed in trial {trial}: {source}")]
    Objective {
        trial: usize,
        source: ObjectiveError,
    },

    #[error("All {trials} trials failed, last error: {last}")]
    AllTrialsFailed { trials: usize, last: ObjectiveError },

    #[error("Search produced no completed trials")]
    NoCompletedTrials,

    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

/// Problems with the parameter space or a requested starting point,
/// detected before any objective evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("parameter space has no dimensions")]
    NoDimensions,

    #[error("dimension {dim} has no grid values")]
    EmptyDimension { dim: usize },

    #[error("dimension {dim} holds non-finite value {value} at index {index}")]
    NonFiniteValue { dim: usize, index: usize, value: f64 },

    #[error("dimension {dim} repeats value {value}")]
    DuplicateValue { dim: usize, value: f64 },

    #[error("invalid step {step} for axis [{low}, {high}]")]
    InvalidStep { low: f64, high: f64, step: f64 },

    #[error("axis [{low}, {high}] with step {step} exceeds {max} grid points")]
    TooManyPoints {
        low: f64,
        high: f64,
        step: f64,
        max: usize,
    },

    #[error("start vector has {got} coordinates, space has {expected} dimensions")]
    StartLength { expected: usize, got: usize },

    #[error("start index {index} out of range for dimension {dim} of length {len}")]
    StartOutOfRange { dim: usize, index: usize, len: usize },
}

/// Failure raised while evaluating the caller's objective.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ObjectiveError {
    #[error("objective evaluation failed: {message}")]
    Failed { message: String },

    #[error("objective returned NaN at {values:?}")]
    NotANumber { values: Vec<f64> },
}

impl ObjectiveError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

/// Result type alias for gridwalk operations
pub type GwResult<T> = Result<T, GwError>;
