//! ACO configuration.

use crate::convergence::ConvergenceCriterion;
use crate::error::{OptimizeError, Result};

/// Configuration for the ant colony.
///
/// # Examples
///
/// ```
/// use swarm_planner::aco::AcoConfig;
///
/// let config = AcoConfig::default()
///     .with_num_ants(25)
///     .with_max_iterations(50)
///     .with_evaporation_rate(0.2)
///     .with_seed(42);
/// assert_eq!(config.num_ants, 25);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoConfig {
    /// Number of ants constructing a tour each iteration.
    pub num_ants: usize,

    /// Maximum number of iterations.
    pub max_iterations: usize,

    /// Fraction of pheromone lost per iteration (ρ), in `[0, 1]`.
    pub evaporation_rate: f64,

    /// Deposit numerator (Q): each ant adds `Q / tour_length` per edge.
    pub pheromone_intensity: f64,

    /// Pheromone exponent (α).
    pub alpha: f64,

    /// Inverse-distance exponent (β).
    pub beta: f64,

    /// Added to distances before inversion so coincident points stay finite.
    pub epsilon: f64,

    /// Starting trail strength on every edge.
    pub initial_pheromone: f64,

    /// Early-stop rule on the best distance. `None` (the default) always
    /// runs `max_iterations`.
    pub convergence: Option<ConvergenceCriterion>,

    /// Random seed for reproducibility. `None` uses OS entropy.
    pub seed: Option<u64>,

    /// Optional wall-clock budget in milliseconds.
    pub time_limit_ms: Option<u64>,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            num_ants: 30,
            max_iterations: 100,
            evaporation_rate: 0.1,
            pheromone_intensity: 100.0,
            alpha: 1.0,
            beta: 2.0,
            epsilon: 0.001,
            initial_pheromone: 1.0,
            convergence: None,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl AcoConfig {
    /// Sets the number of ants per iteration.
    pub fn with_num_ants(mut self, n: usize) -> Self {
        self.num_ants = n;
        self
    }

    /// Sets the maximum number of iterations.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the pheromone evaporation rate `rho`.
    pub fn with_evaporation_rate(mut self, rate: f64) -> Self {
        self.evaporation_rate = rate;
        self
    }

    /// Sets the deposit constant `Q`.
    pub fn with_pheromone_intensity(mut self, q: f64) -> Self {
        self.pheromone_intensity = q;
        self
    }

    /// Sets the pheromone exponent.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the heuristic (inverse distance) exponent.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Sets the distance offset that keeps `1 / d` finite.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the starting trail level.
    pub fn with_initial_pheromone(mut self, tau0: f64) -> Self {
        self.initial_pheromone = tau0;
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

    /// Fewer ants and iterations, for interactive route planning.
    ///
    /// - Ants: 25, Iterations: 50
    pub fn fast() -> Self {
        Self {
            num_ants: 25,
            max_iterations: 50,
            ..Self::default()
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.num_ants < 1 {
            return Err(OptimizeError::config("num_ants", "must be at least 1"));
        }
        if self.max_iterations < 1 {
            return Err(OptimizeError::config("max_iterations", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.evaporation_rate) {
            return Err(OptimizeError::config(
                "evaporation_rate",
                format!("must be in [0, 1], got {}", self.evaporation_rate),
            ));
        }
        for (name, value) in [
            ("pheromone_intensity", self.pheromone_intensity),
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("initial_pheromone", self.initial_pheromone),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(OptimizeError::config(
                    name,
                    format!("must be finite and non-negative, got {value}"),
                ));
            }
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(OptimizeError::config(
                "epsilon",
                format!("must be positive, got {}", self.epsilon),
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
