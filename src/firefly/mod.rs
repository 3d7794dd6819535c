//! Firefly Algorithm.
//!
//! Continuous-domain maximization. Each firefly moves toward every brighter
//! firefly, with attraction decaying with squared distance, plus a small
//! random step.
//!
//! # References
//!
//! - Yang (2009), "Firefly Algorithms for Multimodal Optimization"

mod config;
mod runner;

pub use config::FireflyConfig;
pub use runner::{FireflyResult, FireflyRunner};
