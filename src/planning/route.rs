//! Visiting order of a set of places.

use crate::aco::{AcoConfig, AcoRunner, Location, TourRecord};
use crate::error::{OptimizeError, Result};
use crate::random::rng_from_seed;
use rand::Rng;

/// Outcome of [`RouteOptimizer::optimize`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteResult<L> {
    /// Places in visiting order, closed (returns to the first place).
    pub optimized_route: Vec<L>,
    /// Length of the closed route.
    pub total_distance: f64,
    /// Reduction relative to the colony's first iteration, in percent.
    pub improvement_percent: f64,
    /// Per-iteration best and average distances, for charts.
    pub visualization: Vec<TourRecord>,
}

impl<L> RouteResult<L> {
    /// Improvement formatted with two decimals, e.g. `"3.20%"`.
    pub fn improvement(&self) -> String {
        format!("{:.2}%", self.improvement_percent)
    }
}

/// Orders places into a short closed route with the ant colony.
#[derive(Debug, Clone)]
pub struct RouteOptimizer {
    pub aco: AcoConfig,
}

impl Default for RouteOptimizer {
    fn default() -> Self {
        Self {
            aco: AcoConfig::fast(),
        }
    }
}

impl RouteOptimizer {
    /// Sets the ACO configuration.
    pub fn with_aco(mut self, aco: AcoConfig) -> Self {
        self.aco = aco;
        self
    }

    /// Optimizes with a generator seeded from `self.aco.seed`.
    ///
    /// With `start = Some(i)`, the route begins and ends at `locations[i]`.
    pub fn optimize<L: Location + Clone>(
        &self,
        locations: &[L],
        start: Option<usize>,
    ) -> Result<RouteResult<L>> {
        let mut rng = rng_from_seed(self.aco.seed);
        self.optimize_with_rng(locations, start, &mut rng)
    }

    /// Optimizes drawing all randomness from `rng`.
    pub fn optimize_with_rng<L: Location + Clone, R: Rng>(
        &self,
        locations: &[L],
        start: Option<usize>,
        rng: &mut R,
    ) -> Result<RouteResult<L>> {
        if let Some(s) = start {
            if s >= locations.len() {
                return Err(OptimizeError::config(
                    "start",
                    format!("index {s} out of range for {} locations", locations.len()),
                ));
            }
        }

        // Put the start first, keeping the rest in their cyclic order.
        let mut ordered = locations.to_vec();
        ordered.rotate_left(start.unwrap_or(0));

        let result = AcoRunner::run_with_rng(&ordered, &self.aco, rng)?;

        let indices = if start.is_some() {
            rotate_closed_tour(&result.tour_indices, 0)
        } else {
            result.tour_indices.clone()
        };

        Ok(RouteResult {
            optimized_route: indices.iter().map(|&i| ordered[i].clone()).collect(),
            total_distance: result.best_distance,
            improvement_percent: result.improvement_percent,
            visualization: result.history,
        })
    }
}

/// Rotates a closed tour so it begins and ends at `first`.
///
/// Rotation does not change the tour length. Returns the input unchanged
/// if `first` is not on the tour.
fn rotate_closed_tour(tour: &[usize], first: usize) -> Vec<usize> {
    if tour.len() < 2 {
        return tour.to_vec();
    }
    let open = &tour[..tour.len() - 1];
    let Some(pos) = open.iter().position(|&i| i == first) else {
        return tour.to_vec();
    };
    let mut rotated: Vec<usize> = open[pos..].iter().chain(&open[..pos]).copied().collect();
    rotated.push(first);
    rotated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aco::Point;

    fn places() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 3.0),
            Point::new(0.0, 3.0),
            Point::new(2.0, 5.0),
        ]
    }

    #[test]
    fn test_rotate_closed_tour() {
        assert_eq!(rotate_closed_tour(&[2, 0, 1, 3, 2], 0), vec![0, 1, 3, 2, 0]);
        assert_eq!(rotate_closed_tour(&[0, 1, 0], 0), vec![0, 1, 0]);
        assert_eq!(rotate_closed_tour(&[1, 1], 5), vec![1, 1]);
    }

    #[test]
    fn test_route_with_start() {
        let optimizer = RouteOptimizer::default().with_aco(AcoConfig::fast().with_seed(42));
        let locations = places();
        let result = optimizer.optimize(&locations, Some(2)).unwrap();

        assert_eq!(result.optimized_route.len(), locations.len() + 1);
        assert_eq!(result.optimized_route[0], locations[2]);
        assert_eq!(result.optimized_route.last(), Some(&locations[2]));
        // Convex pentagon: perimeter 4 + 3 + 2.828.. + 2.828.. + 3
        let perimeter = 4.0 + 3.0 + 2.0 * 8f64.sqrt() + 3.0;
        assert!((result.total_distance - perimeter).abs() < 1e-9);
    }

    #[test]
    fn test_route_without_start() {
        let optimizer = RouteOptimizer::default().with_aco(AcoConfig::fast().with_seed(1));
        let result = optimizer.optimize(&places(), None).unwrap();
        assert_eq!(result.optimized_route.first(), result.optimized_route.last());
        assert_eq!(result.visualization.len(), 50);
        assert!(result.improvement().ends_with('%'));
    }

    #[test]
    fn test_route_start_out_of_range() {
        let err = RouteOptimizer::default()
            .optimize(&places(), Some(9))
            .unwrap_err();
        assert!(matches!(err, OptimizeError::Configuration { parameter: "start", .. }));
    }

    #[test]
    fn test_route_empty() {
        let err = RouteOptimizer::default()
            .optimize::<Point>(&[], None)
            .unwrap_err();
        assert!(matches!(err, OptimizeError::InsufficientData { .. }));
    }
}
