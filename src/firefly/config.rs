//! Firefly configuration.

use crate::convergence::ConvergenceCriterion;
use crate::error::{OptimizeError, Result};

/// Configuration for the Firefly Algorithm.
///
/// # Examples
///
/// ```
/// use swarm_planner::firefly::FireflyConfig;
///
/// let config = FireflyConfig::default()
///     .with_num_fireflies(40)
///     .with_gamma(0.5)
///     .with_seed(1);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FireflyConfig {
    /// Number of fireflies.
    pub num_fireflies: usize,

    /// Maximum number of iterations.
    pub max_iterations: usize,

    /// Random step scale. Each move adds `alpha * U(-0.5, 0.5)` per dimension.
    pub alpha: f64,

    /// Attractiveness at distance zero.
    pub beta0: f64,

    /// Light absorption: attractiveness is `beta0 * exp(-gamma * r^2)`.
    pub gamma: f64,

    /// Early-stop rule. `None` (the default) always runs `max_iterations`.
    pub convergence: Option<ConvergenceCriterion>,

    /// Random seed for reproducibility. `None` uses OS entropy.
    pub seed: Option<u64>,

    /// Optional wall-clock budget in milliseconds.
    pub time_limit_ms: Option<u64>,
}

impl Default for FireflyConfig {
    fn default() -> Self {
        Self {
            num_fireflies: 30,
            max_iterations: 100,
            alpha: 0.2,
            beta0: 1.0,
            gamma: 1.0,
            convergence: None,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl FireflyConfig {
    /// Sets the number of fireflies.
    pub fn with_num_fireflies(mut self, n: usize) -> Self {
        self.num_fireflies = n;
        self
    }

    /// Sets the maximum number of iterations.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the random step scale.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the attractiveness at distance zero.
    pub fn with_beta0(mut self, beta0: f64) -> Self {
        self.beta0 = beta0;
        self
    }

    /// Sets the light absorption coefficient.
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Sets the early-stop rule; `None` disables it.
    pub fn with_convergence(mut self, convergence: Option<ConvergenceCriterion>) -> Self {
        self.convergence = convergence;
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

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.num_fireflies < 1 {
            return Err(OptimizeError::config("num_fireflies", "must be at least 1"));
        }
        if self.max_iterations < 1 {
            return Err(OptimizeError::config("max_iterations", "must be at least 1"));
        }
        for (name, value) in [
            ("alpha", self.alpha),
            ("beta0", self.beta0),
            ("gamma", self.gamma),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(OptimizeError::config(
                    name,
                    format!("must be finite and non-negative, got {value}"),
                ));
            }
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
