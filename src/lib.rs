//! Swarm-intelligence optimizers with travel-planning adapters.
//!
//! Core optimizers, all maximizing over caller-supplied pure functions:
//!
//! - **Particle Swarm Optimization (PSO)**: continuous search where each
//!   particle blends inertia with pulls toward its own and the swarm's best.
//! - **Ant Colony Optimization (ACO)**: closed tours over 2D locations built
//!   from pheromone trails and inverse distance (minimizes tour length).
//! - **Firefly Algorithm**: continuous search where dimmer fireflies move
//!   toward brighter ones with distance-decaying attraction.
//!
//! Shared building blocks:
//!
//! - [`SearchSpace`]: box bounds, random sampling and clamping.
//! - [`convergence`]: history records and the variance-window early stop.
//! - [`OptimizeError`]: validation errors raised at call boundaries.
//!
//! Domain adapters in [`planning`] turn travel-planning problems into
//! optimizer inputs and decode the results: itinerary selection (PSO),
//! route ordering (ACO), budget split (PSO) and a greedy diversification
//! pass for ranked recommendations.
//!
//! # Determinism
//!
//! Every runner takes its randomness from a seed (`config.seed`) or from an
//! injected `rand::Rng`. A fixed seed yields identical results on every run,
//! with or without the `parallel` feature.
//!
//! # Example
//!
//! ```
//! use swarm_planner::pso::{PsoConfig, PsoRunner};
//! use swarm_planner::SearchSpace;
//!
//! let space = SearchSpace::uniform(2, -10.0, 10.0).unwrap();
//! let config = PsoConfig::default().with_max_iterations(50).with_seed(42);
//! let result = PsoRunner::run(&|x: &[f64]| -(x[0] * x[0] + x[1] * x[1]), &space, &config).unwrap();
//! assert!(result.best_fitness > -0.5);
//! ```

pub mod aco;
pub mod convergence;
pub mod error;
pub mod firefly;
pub mod planning;
pub mod pso;
pub mod random;
pub mod space;
mod stop;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{OptimizeError, Result};
pub use space::{sanitize_fitness, Objective, SearchSpace};
