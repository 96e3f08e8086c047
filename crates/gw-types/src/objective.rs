//! The function being searched.

use crate::errors::ObjectiveError;

/// A scalar function of a grid point's value vector.
///
/// Implementations are invoked concurrently from every trial of an ensemble
/// and are assumed to be pure: the same values always yield the same result.
/// Any closure `Fn(&[f64]) -> f64` is an objective; wrap closures returning
/// `Result` in [`Fallible`].
pub trait Objective: Send + Sync {
    fn evaluate(&self, values: &[f64]) -> Result<f64, ObjectiveError>;
}

impl<F> Objective for F
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn evaluate(&self, values: &[f64]) -> Result<f64, ObjectiveError> {
        Ok(self(values))
    }
}

/// Adapts a closure that can fail into an [`Objective`].
#[derive(Debug, Clone, Copy)]
pub struct Fallible<F>(pub F);

impl<F, E> Objective for Fallible<F>
where
    F: Fn(&[f64]) -> Result<f64, E> + Send + Sync,
    E: std::fmt::Display,
{
    fn evaluate(&self, values: &[f64]) -> Result<f64, ObjectiveError> {
        (self.0)(values).map_err(|e| ObjectiveError::failed(e.to_string()))
    }
}
