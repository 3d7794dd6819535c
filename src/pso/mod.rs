//! Particle Swarm Optimization (PSO).
//!
//! Continuous-domain maximization. Each particle is pulled toward its own
//! best position (cognitive term) and the swarm's best position (social
//! term), with inertia carrying over part of its previous velocity.
//!
//! # References
//!
//! - Kennedy & Eberhart (1995), "Particle Swarm Optimization"
//! - Shi & Eberhart (1998), "A Modified Particle Swarm Optimizer" (inertia weight)

mod config;
mod runner;
mod types;

pub use config::PsoConfig;
pub use runner::{PsoResult, PsoRunner};
