//! Discretized parameter space definitions.

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, GwResult};

/// The full grid: an ordered list of dimensions, each an ordered list of
/// distinct candidate values.
///
/// The caller's ordering defines the index coordinate system used by the
/// search. A space is validated once at construction and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct ParameterSpace {
    dimensions: Vec<Vec<f64>>,
    lengths: Vec<usize>,
}

impl ParameterSpace {
    pub fn new(dimensions: Vec<Vec<f64>>) -> GwResult<Self> {
        if dimensions.is_empty() {
            return Err(ConfigError::NoDimensions.into());
        }

        for (dim, values) in dimensions.iter().enumerate() {
            if values.is_empty() {
                return Err(ConfigError::EmptyDimension { dim }.into());
            }
            if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite())
            {
                return Err(ConfigError::NonFiniteValue { dim, index, value }.into());
            }

            let mut sorted = values.clone();
            sorted.sort_by(f64::total_cmp);
            if let Some(pair) = sorted.windows(2).find(|pair| pair[0] == pair[1]) {
                return Err(ConfigError::DuplicateValue {
                    dim,
                    value: pair[0],
                }
                .into());
            }
        }

        let lengths = dimensions.iter().map(Vec::len).collect();
        Ok(Self {
            dimensions,
            lengths,
        })
    }

    pub fn builder() -> ParameterSpaceBuilder {
        ParameterSpaceBuilder::default()
    }

    /// Number of dimensions.
    pub fn dims(&self) -> usize {
        self.dimensions.len()
    }

    /// Number of grid values in dimension `dim`.
    pub fn len_of(&self, dim: usize) -> usize {
        self.lengths[dim]
    }

    /// Per-dimension lengths, computed once at construction.
    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    pub fn value(&self, dim: usize, index: usize) -> f64 {
        self.dimensions[dim][index]
    }

    pub fn dimension(&self, dim: usize) -> &[f64] {
        &self.dimensions[dim]
    }

    /// Look up the value vector for an index vector.
    ///
    /// Indices must satisfy `indices[i] < len_of(i)`; see [`Self::check_indices`].
    pub fn values_at(&self, indices: &[usize]) -> Vec<f64> {
        indices
            .iter()
            .zip(&self.dimensions)
            .map(|(&idx, values)| values[idx])
            .collect()
    }

    /// Validate a caller-supplied index vector against this space.
    pub fn check_indices(&self, indices: &[usize]) -> GwResult<()> {
        if indices.len() != self.dims() {
            return Err(ConfigError::StartLength {
                expected: self.dims(),
                got: indices.len(),
            }
            .into());
        }
        for (dim, (&index, &len)) in indices.iter().zip(&self.lengths).enumerate() {
            if index >= len {
                return Err(ConfigError::StartOutOfRange { dim, index, len }.into());
            }
        }
        Ok(())
    }

    /// Total number of grid points, `None` if it overflows `usize`.
    pub fn grid_size(&self) -> Option<usize> {
        self.lengths
            .iter()
            .try_fold(1usize, |total, &len| total.checked_mul(len))
    }
}

impl TryFrom<Vec<Vec<f64>>> for ParameterSpace {
    type Error = crate::errors::GwError;

    fn try_from(dimensions: Vec<Vec<f64>>) -> GwResult<Self> {
        Self::new(dimensions)
    }
}

impl From<ParameterSpace> for Vec<Vec<f64>> {
    fn from(space: ParameterSpace) -> Self {
        space.dimensions
    }
}

/// Upper bound on the number of values [`stepped_axis`] will generate.
pub const MAX_AXIS_POINTS: usize = 1 << 20;

/// Evenly stepped values from `low` up to and including `high` (when `high`
/// lies on the step grid).
pub fn stepped_axis(low: f64, high: f64, step: f64) -> GwResult<Vec<f64>> {
    if !(step.is_finite() && step > 0.0 && low.is_finite() && high.is_finite() && low <= high) {
        return Err(ConfigError::InvalidStep { low, high, step }.into());
    }

    // Tolerance keeps `high` when (high - low) / step lands a hair under an integer.
    let intervals = ((high - low) / step + 1e-9).floor();
    let count = if intervals.is_finite() && intervals < MAX_AXIS_POINTS as f64 {
        (intervals as usize).checked_add(1)
    } else {
        None
    };
    let Some(count) = count else {
        return Err(ConfigError::TooManyPoints {
            low,
            high,
            step,
            max: MAX_AXIS_POINTS,
        }
        .into());
    };
    Ok((0..count).map(|i| low + i as f64 * step).collect())
}

/// Incremental construction of a [`ParameterSpace`].
#[derive(Debug, Clone, Default)]
pub struct ParameterSpaceBuilder {
    dimensions: Vec<Vec<f64>>,
    pending: Option<crate::errors::GwError>,
}

impl ParameterSpaceBuilder {
    /// Append a dimension with explicit grid values.
    pub fn axis(mut self, values: impl Into<Vec<f64>>) -> Self {
        self.dimensions.push(values.into());
        self
    }

    /// Append a dimension stepped from `low` to `high`.
    pub fn stepped(mut self, low: f64, high: f64, step: f64) -> Self {
        match stepped_axis(low, high, step) {
            Ok(values) => self.dimensions.push(values),
            Err(e) => {
                self.pending.get_or_insert(e);
            }
        }
        self
    }

    /// Append `count` copies of the same stepped dimension.
    pub fn repeat_stepped(mut self, count: usize, low: f64, high: f64, step: f64) -> Self {
        for _ in 0..count {
            self = self.stepped(low, high, step);
        }
        self
    }

    pub fn build(self) -> GwResult<ParameterSpace> {
        if let Some(e) = self.pending {
            return Err(e);
        }
        ParameterSpace::new(self.dimensions)
    }
}
