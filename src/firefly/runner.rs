//! Firefly execution loop.
//!
//! Fireflies are swept in a fixed index order. Within one iteration a
//! firefly may move several times, once for each brighter neighbor it
//! meets, and later comparisons see the brightness values already updated
//! by earlier moves. That ordering dependence is part of the algorithm.

use super::config::FireflyConfig;
use crate::convergence::{finite_mean, ConvergenceMonitor, HistorySummary, IterationRecord};
use crate::error::Result;
use crate::random::rng_from_seed;
use crate::space::{sanitize_fitness, Objective, SearchSpace};
use crate::stop::{StopCondition, StopReason};
use log::{debug, info, trace};
use rand::Rng;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct Firefly {
    position: Vec<f64>,
    brightness: f64,
}

/// Result of a Firefly run. Same shape as [`PsoResult`](crate::pso::PsoResult).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FireflyResult {
    /// Brightest position found. Always inside the search bounds.
    pub best_solution: Vec<f64>,

    /// Objective value at `best_solution`.
    pub best_fitness: f64,

    /// Iterations actually executed.
    pub iterations: usize,

    /// Whether the run stopped on the convergence rule.
    pub converged: bool,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Whether the wall-clock budget ran out.
    pub timed_out: bool,

    /// One record per executed iteration.
    pub history: Vec<IterationRecord>,
}

impl FireflyResult {
    /// Display-oriented digest of the history.
    pub fn summary(&self) -> HistorySummary {
        HistorySummary::from_records(&self.history)
    }
}

/// Executes the Firefly Algorithm.
pub struct FireflyRunner;

impl FireflyRunner {
    /// Runs the algorithm with a generator seeded from `config.seed`.
    pub fn run<O: Objective>(
        objective: &O,
        space: &SearchSpace,
        config: &FireflyConfig,
    ) -> Result<FireflyResult> {
        Self::run_with_cancel(objective, space, config, None)
    }

    /// Runs the algorithm with an optional cancellation token.
    pub fn run_with_cancel<O: Objective>(
        objective: &O,
        space: &SearchSpace,
        config: &FireflyConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<FireflyResult> {
        config.validate()?;
        let mut rng = rng_from_seed(config.seed);
        Self::execute(objective, space, config, &mut rng, cancel)
    }

    /// Runs the algorithm drawing all randomness from `rng`.
    pub fn run_with_rng<O: Objective, R: Rng>(
        objective: &O,
        space: &SearchSpace,
        config: &FireflyConfig,
        rng: &mut R,
    ) -> Result<FireflyResult> {
        Self::execute(objective, space, config, rng, None)
    }

    fn execute<O: Objective, R: Rng>(
        objective: &O,
        space: &SearchSpace,
        config: &FireflyConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<FireflyResult> {
        config.validate()?;
        debug!(
            "firefly: {} fireflies, {} dimensions, up to {} iterations",
            config.num_fireflies,
            space.dimensions(),
            config.max_iterations
        );

        let stop = StopCondition::new(cancel, config.time_limit_ms);
        let mut monitor = config.convergence.map(ConvergenceMonitor::new);

        let mut fireflies: Vec<Firefly> = (0..config.num_fireflies)
            .map(|_| {
                let position = space.random_position(rng);
                let brightness = sanitize_fitness(objective.evaluate(&position));
                Firefly {
                    position,
                    brightness,
                }
            })
            .collect();

        let mut best_position = fireflies[0].position.clone();
        let mut best_fitness = f64::NEG_INFINITY;
        for fly in &fireflies {
            if fly.brightness > best_fitness {
                best_fitness = fly.brightness;
                best_position.clone_from(&fly.position);
            }
        }

        let mut history = Vec::with_capacity(config.max_iterations);
        let mut converged = false;
        let mut cancelled = false;
        let mut timed_out = false;

        for iteration in 0..config.max_iterations {
            match stop.check() {
                Some(StopReason::Cancelled) => {
                    info!("firefly: cancelled after {iteration} iterations");
                    cancelled = true;
                    break;
                }
                Some(StopReason::TimeLimit) => {
                    info!("firefly: time limit reached after {iteration} iterations");
                    timed_out = true;
                    break;
                }
                None => {}
            }

            sweep(
                &mut fireflies,
                objective,
                space,
                config,
                rng,
                &mut best_position,
                &mut best_fitness,
            );

            let avg_fitness = finite_mean(fireflies.iter().map(|f| f.brightness));
            history.push(IterationRecord {
                iteration,
                best_fitness,
                avg_fitness,
            });
            trace!("firefly: iteration {iteration} best {best_fitness} avg {avg_fitness}");

            if let Some(ref mut monitor) = monitor {
                if monitor.observe(best_fitness) {
                    info!("firefly: converged at iteration {iteration}");
                    converged = true;
                    break;
                }
            }
        }

        Ok(FireflyResult {
            best_solution: best_position,
            best_fitness,
            iterations: history.len(),
            converged,
            cancelled,
            timed_out,
            history,
        })
    }
}

/// One iteration: each firefly in index order moves toward every brighter
/// one, comparing against brightness values already updated in this sweep.
/// The global best is refreshed after each firefly.
fn sweep<O: Objective, R: Rng>(
    fireflies: &mut [Firefly],
    objective: &O,
    space: &SearchSpace,
    config: &FireflyConfig,
    rng: &mut R,
    best_position: &mut Vec<f64>,
    best_fitness: &mut f64,
) {
    let n = fireflies.len();
    for i in 0..n {
        for j in 0..n {
            if fireflies[j].brightness <= fireflies[i].brightness {
                continue;
            }
            let (mover, target) = pair_mut(fireflies, i, j);
            attract(mover, target, space, config, rng);
            mover.brightness = sanitize_fitness(objective.evaluate(&mover.position));
        }

        if fireflies[i].brightness > *best_fitness {
            *best_fitness = fireflies[i].brightness;
            best_position.clone_from(&fireflies[i].position);
        }
    }
}

/// Moves `mover` toward `target`, then clamps it into the bounds.
fn attract<R: Rng>(
    mover: &mut Firefly,
    target: &Firefly,
    space: &SearchSpace,
    config: &FireflyConfig,
    rng: &mut R,
) {
    let r2: f64 = mover
        .position
        .iter()
        .zip(target.position.iter())
        .map(|(a, b)| (a - b).powi(2))
        .sum();
    let beta = config.beta0 * (-config.gamma * r2).exp();

    for (x, &t) in mover.position.iter_mut().zip(target.position.iter()) {
        let noise: f64 = rng.random::<f64>() - 0.5;
        *x += beta * (t - *x) + config.alpha * noise;
    }
    space.clamp(&mut mover.position);
}

/// Mutable reference to `fireflies[i]` alongside a shared one to `fireflies[j]`.
fn pair_mut(fireflies: &mut [Firefly], i: usize, j: usize) -> (&mut Firefly, &Firefly) {
    debug_assert_ne!(i, j);
    if i < j {
        let (left, right) = fireflies.split_at_mut(j);
        (&mut left[i], &right[0])
    } else {
        let (left, right) = fireflies.split_at_mut(i);
        (&mut right[0], &left[j])
    }
}

// ============================================================================
// Tests
// ============================================================================
