//! PSO configuration.

use crate::convergence::ConvergenceCriterion;
use crate::error::{OptimizeError, Result};

/// Configuration for Particle Swarm Optimization.
///
/// # Examples
///
/// ```
/// use swarm_planner::pso::PsoConfig;
///
/// let config = PsoConfig::default()
///     .with_population_size(50)
///     .with_max_iterations(200)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PsoConfig {
    /// Number of particles.
    pub population_size: usize,

    /// Maximum number of iterations.
    pub max_iterations: usize,

    /// Fraction of the previous velocity carried into the next step.
    pub inertia_weight: f64,

    /// Pull toward the particle's own best position (c1).
    pub cognitive_weight: f64,

    /// Pull toward the swarm's best position (c2).
    pub social_weight: f64,

    /// Velocity limit per dimension, as a fraction of that dimension's range.
    pub max_velocity_fraction: f64,

    /// Early-stop rule. `None` always runs `max_iterations`.
    pub convergence: Option<ConvergenceCriterion>,

    /// Whether to evaluate fitness in parallel (requires the `parallel`
    /// feature). Results are identical to sequential evaluation.
    pub parallel: bool,

    /// Random seed for reproducibility. `None` uses OS entropy.
    pub seed: Option<u64>,

    /// Optional wall-clock budget in milliseconds.
    pub time_limit_ms: Option<u64>,
}

impl Default for PsoConfig {
    fn default() -> Self {
        Self {
            population_size: 30,
            max_iterations: 100,
            inertia_weight: 0.7,
            cognitive_weight: 1.5,
            social_weight: 1.5,
            max_velocity_fraction: 0.2,
            convergence: Some(ConvergenceCriterion::default()),
            parallel: false,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl PsoConfig {
    /// Sets the number of particles.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the maximum number of iterations.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the inertia weight `w`.
    pub fn with_inertia_weight(mut self, w: f64) -> Self {
        self.inertia_weight = w;
        self
    }

    /// Sets the cognitive (personal-best) weight `c1`.
    pub fn with_cognitive_weight(mut self, c1: f64) -> Self {
        self.cognitive_weight = c1;
        self
    }

    /// Sets the social (global-best) weight `c2`.
    pub fn with_social_weight(mut self, c2: f64) -> Self {
        self.social_weight = c2;
        self
    }

    /// Sets the velocity clamp as a fraction of each dimension's range.
    pub fn with_max_velocity_fraction(mut self, fraction: f64) -> Self {
        self.max_velocity_fraction = fraction;
        self
    }

    /// Sets the early-stop rule; `None` disables it.
    pub fn with_convergence(mut self, convergence: Option<ConvergenceCriterion>) -> Self {
        self.convergence = convergence;
        self
    }

    /// Enables parallel fitness evaluation (needs the `parallel` feature).
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the wall-clock budget in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Small swarm, short run. Used by the travel-planning adapters.
    ///
    /// - Population: 20, Iterations: 50
    pub fn fast() -> Self {
        Self {
            population_size: 20,
            max_iterations: 50,
            ..Self::default()
        }
    }

    /// The defaults: 30 particles, 100 iterations.
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Large swarm, long run, tighter convergence window.
    ///
    /// - Population: 60, Iterations: 300, Convergence window: 40
    pub fn quality() -> Self {
        Self {
            population_size: 60,
            max_iterations: 300,
            convergence: Some(ConvergenceCriterion::default().with_window(40)),
            ..Self::default()
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 1 {
            return Err(OptimizeError::config("population_size", "must be at least 1"));
        }
        if self.max_iterations < 1 {
            return Err(OptimizeError::config("max_iterations", "must be at least 1"));
        }
        for (name, value) in [
            ("inertia_weight", self.inertia_weight),
            ("cognitive_weight", self.cognitive_weight),
            ("social_weight", self.social_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(OptimizeError::config(
                    name,
                    format!("must be finite and non-negative, got {value}"),
                ));
            }
        }
        if !self.max_velocity_fraction.is_finite() || self.max_velocity_fraction <= 0.0 {
            return Err(OptimizeError::config(
                "max_velocity_fraction",
                format!("must be positive, got {}", self.max_velocity_fraction),
            ));
        }
        if let Some(ref criterion) = self.convergence {
            criterion.validate()?;
        }
        if self.time_limit_ms == Some(0) {
            return Err(OptimizeError::config("time_limit_ms", "must be positive or None"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PsoConfig::default();
        assert_eq!(config.population_size, 30);
        assert_eq!(config.max_iterations, 100);
        assert!((config.inertia_weight - 0.7).abs() < 1e-10);
        assert!((config.cognitive_weight - 1.5).abs() < 1e-10);
        assert!((config.social_weight - 1.5).abs() < 1e-10);
        assert!((config.max_velocity_fraction - 0.2).abs() < 1e-10);
        assert_eq!(config.convergence, Some(ConvergenceCriterion::default()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_population() {
        let err = PsoConfig::default().with_population_size(0).validate().unwrap_err();
        assert!(matches!(
            err,
            OptimizeError::Configuration { parameter: "population_size", .. }
        ));
    }

    #[test]
    fn test_validate_zero_iterations() {
        assert!(PsoConfig::default().with_max_iterations(0).validate().is_err());
    }

    #[test]
    fn test_validate_bad_weights() {
        assert!(PsoConfig::default().with_inertia_weight(f64::NAN).validate().is_err());
        assert!(PsoConfig::default().with_social_weight(-1.0).validate().is_err());
        assert!(PsoConfig::default().with_max_velocity_fraction(0.0).validate().is_err());
    }

    #[test]
    fn test_validate_zero_time_limit() {
        assert!(PsoConfig::default().with_time_limit_ms(0).validate().is_err());
        assert!(PsoConfig::default().with_time_limit_ms(1).validate().is_ok());
    }

    #[test]
    fn test_presets() {
        let fast = PsoConfig::fast();
        assert_eq!(fast.population_size, 20);
        assert_eq!(fast.max_iterations, 50);
        assert!(PsoConfig::balanced().validate().is_ok());
        assert_eq!(PsoConfig::quality().population_size, 60);
    }
}
