//! Travel-planning adapters on top of the swarm optimizers.
//!
//! Each adapter turns a planning problem into something a core optimizer
//! can search, then decodes the winning vector back into a plan:
//!
//! - [`ItineraryOptimizer`]: which activities go on which day (PSO)
//! - [`RouteOptimizer`]: visiting order of a set of places (ACO)
//! - [`BudgetAllocator`]: percentage split of a budget over categories (PSO)
//! - [`diversify`]: greedy score/diversity reordering of ranked candidates
//!
//! Continuous adapters describe their encoding through [`SolutionCodec`].

mod budget;
mod diversify;
mod itinerary;
mod route;

pub use budget::{
    Allocation, AllocationCodec, BudgetAllocator, BudgetCategory, BudgetPenalties, BudgetResult,
};
pub use diversify::diversify;
pub use itinerary::{
    Activity, ItineraryCodec, ItineraryConstraints, ItineraryOptimizer, ItineraryPenalties,
    ItineraryResult,
};
pub use route::{RouteOptimizer, RouteResult};

use crate::error::Result;
use crate::space::SearchSpace;

/// Maps optimizer vectors to domain artifacts.
///
/// `decode` must be total: any vector of the right length, including ones
/// outside the search space, yields a valid artifact.
pub trait SolutionCodec {
    /// The decoded plan.
    type Artifact;

    /// Length of the vectors `decode` expects.
    fn dimensions(&self) -> usize;

    /// The box the optimizer should search.
    fn search_space(&self) -> Result<SearchSpace>;

    /// Decodes a position into a plan.
    fn decode(&self, position: &[f64]) -> Self::Artifact;
}
