//! Continuous search domains and objective functions.

use crate::error::{OptimizeError, Result};
use rand::Rng;

/// An objective to be maximized over a [`SearchSpace`].
///
/// Implementations must be pure: the runners may call `evaluate` from
/// several threads when parallel evaluation is enabled. Returning a
/// non-finite value is allowed; it is scored as negative infinity.
///
/// Any `Fn(&[f64]) -> f64 + Sync` closure is an objective.
pub trait Objective: Sync {
    /// Scores a candidate position. Higher is better.
    fn evaluate(&self, position: &[f64]) -> f64;
}

impl<F> Objective for F
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    fn evaluate(&self, position: &[f64]) -> f64 {
        self(position)
    }
}

/// Maps non-finite fitness values to negative infinity so they are never
/// chosen as a best.
#[inline]
pub fn sanitize_fitness(fitness: f64) -> f64 {
    if fitness.is_finite() {
        fitness
    } else {
        f64::NEG_INFINITY
    }
}

/// A box-bounded continuous domain: `min[i] <= x[i] <= max[i]`.
///
/// # Examples
///
/// ```
/// use swarm_planner::SearchSpace;
///
/// let space = SearchSpace::new(vec![-1.0, 0.0], vec![1.0, 10.0]).unwrap();
/// assert_eq!(space.dimensions(), 2);
/// assert_eq!(space.clamped(&[5.0, -3.0]), vec![1.0, 0.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchSpace {
    min: Vec<f64>,
    max: Vec<f64>,
}

impl SearchSpace {
    /// Creates a search space, validating the bounds.
    pub fn new(min: Vec<f64>, max: Vec<f64>) -> Result<Self> {
        if min.len() != max.len() {
            return Err(OptimizeError::bounds(
                0,
                format!("min has {} dimensions but max has {}", min.len(), max.len()),
            ));
        }
        if min.is_empty() {
            return Err(OptimizeError::bounds(0, "at least one dimension is required"));
        }
        for (d, (&lo, &hi)) in min.iter().zip(max.iter()).enumerate() {
            if !lo.is_finite() || !hi.is_finite() {
                return Err(OptimizeError::bounds(d, "bounds must be finite"));
            }
            if lo > hi {
                return Err(OptimizeError::bounds(d, format!("min {lo} exceeds max {hi}")));
            }
            if !(hi - lo).is_finite() {
                return Err(OptimizeError::bounds(d, "range overflows f64"));
            }
        }
        Ok(Self { min, max })
    }

    /// Creates a space with the same bounds in every dimension.
    pub fn uniform(dimensions: usize, min: f64, max: f64) -> Result<Self> {
        Self::new(vec![min; dimensions], vec![max; dimensions])
    }

    /// Number of dimensions.
    pub fn dimensions(&self) -> usize {
        self.min.len()
    }

    /// Lower bounds.
    pub fn min(&self) -> &[f64] {
        &self.min
    }

    /// Upper bounds.
    pub fn max(&self) -> &[f64] {
        &self.max
    }

    /// Width of dimension `d`.
    pub fn range(&self, d: usize) -> f64 {
        self.max[d] - self.min[d]
    }

    /// Draws a position uniformly from the box.
    pub fn random_position<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        self.min
            .iter()
            .zip(self.max.iter())
            .map(|(&lo, &hi)| rng.random_range(lo..=hi))
            .collect()
    }

    /// Draws a small initial velocity, within ±5% of each dimension's range.
    pub fn random_velocity<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        (0..self.dimensions())
            .map(|d| {
                let limit = 0.05 * self.range(d);
                rng.random_range(-limit..=limit)
            })
            .collect()
    }

    /// Clamps `position` into the box in place.
    pub fn clamp(&self, position: &mut [f64]) {
        for (d, x) in position.iter_mut().enumerate() {
            *x = x.clamp(self.min[d], self.max[d]);
        }
    }

    /// Returns a clamped copy of `position`.
    pub fn clamped(&self, position: &[f64]) -> Vec<f64> {
        let mut out = position.to_vec();
        self.clamp(&mut out);
        out
    }

    /// Whether `position` lies inside the box.
    pub fn contains(&self, position: &[f64]) -> bool {
        position.len() == self.dimensions()
            && position
                .iter()
                .enumerate()
                .all(|(d, &x)| x >= self.min[d] && x <= self.max[d])
    }
}
