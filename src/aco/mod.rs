//! Ant Colony Optimization (ACO) for closed tours over 2D locations.
//!
//! Implements the classic Ant System: every ant builds a complete tour
//! guided by pheromone trails and inverse distance, then all trails
//! evaporate and each ant reinforces the edges it used in proportion to
//! the inverse of its tour length.
//!
//! # References
//!
//! - Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a
//!   Colony of Cooperating Agents"
//! - Dorigo & Stützle (2004), *Ant Colony Optimization*

mod config;
mod matrix;
mod runner;
mod types;

pub use config::AcoConfig;
pub use matrix::{DistanceMatrix, PheromoneMatrix};
pub use runner::{AcoResult, AcoRunner};
pub use types::{Location, Point, TourRecord};
