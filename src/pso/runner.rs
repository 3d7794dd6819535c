//! PSO execution loop.
//!
//! # Algorithm
//!
//! 1. Scatter particles uniformly, with small random velocities
//! 2. Each iteration:
//!    a. Move every particle (in index order):
//!       `v = w*v + c1*r1*(pbest - x) + c2*r2*(gbest - x)`, clamp `v`,
//!       `x += v`, clamp `x` to the bounds
//!    b. Evaluate the whole swarm (optionally in parallel)
//!    c. Update personal and global bests in index order, strict `>` only
//! 3. Stop at `max_iterations`, on convergence, cancellation or time limit
//!
//! Steps (a) and (c) consume randomness and aggregate in a fixed order, so
//! parallel evaluation in (b) cannot change the outcome.

use super::config::PsoConfig;
use super::types::Particle;
use crate::convergence::{finite_mean, ConvergenceMonitor, HistorySummary, IterationRecord};
use crate::error::Result;
use crate::random::rng_from_seed;
use crate::space::{sanitize_fitness, Objective, SearchSpace};
use crate::stop::{StopCondition, StopReason};
use log::{debug, info, trace};
use rand::Rng;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Result of a PSO run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PsoResult {
    /// Best position found. Always inside the search bounds.
    pub best_solution: Vec<f64>,

    /// Objective value at `best_solution` (negative infinity if the
    /// objective never returned a finite value).
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

impl PsoResult {
    /// Display-oriented digest of the history.
    pub fn summary(&self) -> HistorySummary {
        HistorySummary::from_records(&self.history)
    }
}

/// Executes Particle Swarm Optimization.
///
/// # Examples
///
/// ```
/// use swarm_planner::pso::{PsoConfig, PsoRunner};
/// use swarm_planner::SearchSpace;
///
/// let space = SearchSpace::uniform(2, -10.0, 10.0).unwrap();
/// let objective = |x: &[f64]| -(x[0] * x[0] + x[1] * x[1]);
/// let config = PsoConfig::default().with_max_iterations(50).with_seed(42);
///
/// let result = PsoRunner::run(&objective, &space, &config).unwrap();
/// assert!(result.best_fitness > -0.5);
/// ```
pub struct PsoRunner;

impl PsoRunner {
    /// Runs PSO with a generator seeded from `config.seed`.
    pub fn run<O: Objective>(
        objective: &O,
        space: &SearchSpace,
        config: &PsoConfig,
    ) -> Result<PsoResult> {
        Self::run_with_cancel(objective, space, config, None)
    }

    /// Runs PSO with an optional cancellation token.
    ///
    /// If the flag becomes `true`, the run stops before the next iteration
    /// and returns the best solution found so far.
    pub fn run_with_cancel<O: Objective>(
        objective: &O,
        space: &SearchSpace,
        config: &PsoConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<PsoResult> {
        config.validate()?;
        let mut rng = rng_from_seed(config.seed);
        Self::execute(objective, space, config, &mut rng, cancel)
    }

    /// Runs PSO drawing all randomness from `rng`. `config.seed` is ignored.
    pub fn run_with_rng<O: Objective, R: Rng>(
        objective: &O,
        space: &SearchSpace,
        config: &PsoConfig,
        rng: &mut R,
    ) -> Result<PsoResult> {
        Self::execute(objective, space, config, rng, None)
    }

    fn execute<O: Objective, R: Rng>(
        objective: &O,
        space: &SearchSpace,
        config: &PsoConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<PsoResult> {
        config.validate()?;
        debug!(
            "pso: {} particles, {} dimensions, up to {} iterations",
            config.population_size,
            space.dimensions(),
            config.max_iterations
        );

        let stop = StopCondition::new(cancel, config.time_limit_ms);
        let mut monitor = config.convergence.map(ConvergenceMonitor::new);

        // Initialize
        let mut particles: Vec<Particle> = (0..config.population_size)
            .map(|_| {
                let position = space.random_position(rng);
                let velocity = space.random_velocity(rng);
                Particle::new(position, velocity)
            })
            .collect();
        evaluate_swarm(objective, &mut particles, config.parallel);

        let mut global_position = particles[0].position.clone();
        let mut global_fitness = f64::NEG_INFINITY;
        for particle in particles.iter_mut() {
            particle.update_personal_best();
            if particle.fitness > global_fitness {
                global_fitness = particle.fitness;
                global_position.clone_from(&particle.position);
            }
        }

        let mut history = Vec::with_capacity(config.max_iterations);
        let mut converged = false;
        let mut cancelled = false;
        let mut timed_out = false;

        for iteration in 0..config.max_iterations {
            match stop.check() {
                Some(StopReason::Cancelled) => {
                    info!("pso: cancelled after {iteration} iterations");
                    cancelled = true;
                    break;
                }
                Some(StopReason::TimeLimit) => {
                    info!("pso: time limit reached after {iteration} iterations");
                    timed_out = true;
                    break;
                }
                None => {}
            }

            for particle in particles.iter_mut() {
                move_particle(particle, &global_position, space, config, rng);
            }

            evaluate_swarm(objective, &mut particles, config.parallel);

            for particle in particles.iter_mut() {
                particle.update_personal_best();
                if particle.fitness > global_fitness {
                    global_fitness = particle.fitness;
                    global_position.clone_from(&particle.position);
                }
            }

            let avg_fitness = finite_mean(particles.iter().map(|p| p.fitness));
            history.push(IterationRecord {
                iteration,
                best_fitness: global_fitness,
                avg_fitness,
            });
            trace!("pso: iteration {iteration} best {global_fitness} avg {avg_fitness}");

            if let Some(ref mut monitor) = monitor {
                if monitor.observe(global_fitness) {
                    info!("pso: converged at iteration {iteration}");
                    converged = true;
                    break;
                }
            }
        }

        Ok(PsoResult {
            best_solution: global_position,
            best_fitness: global_fitness,
            iterations: history.len(),
            converged,
            cancelled,
            timed_out,
            history,
        })
    }
}

/// Applies one velocity and position update to `particle`.
fn move_particle<R: Rng>(
    particle: &mut Particle,
    global_best: &[f64],
    space: &SearchSpace,
    config: &PsoConfig,
    rng: &mut R,
) {
    for d in 0..space.dimensions() {
        let r1: f64 = rng.random();
        let r2: f64 = rng.random();

        let cognitive =
            config.cognitive_weight * r1 * (particle.best_position[d] - particle.position[d]);
        let social = config.social_weight * r2 * (global_best[d] - particle.position[d]);
        let velocity = config.inertia_weight * particle.velocity[d] + cognitive + social;

        let max_velocity = config.max_velocity_fraction * space.range(d);
        particle.velocity[d] = velocity.clamp(-max_velocity, max_velocity);
        particle.position[d] += particle.velocity[d];
    }
    space.clamp(&mut particle.position);
}

/// Evaluates every particle's current position.
fn evaluate_swarm<O: Objective>(objective: &O, particles: &mut [Particle], parallel: bool) {
    #[cfg(feature = "parallel")]
    if parallel {
        use rayon::prelude::*;
        particles.par_iter_mut().for_each(|p| {
            p.fitness = sanitize_fitness(objective.evaluate(&p.position));
        });
        return;
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    for p in particles.iter_mut() {
        p.fitness = sanitize_fitness(objective.evaluate(&p.position));
    }
}

// ============================================================================
// Tests
// ============================================================================
