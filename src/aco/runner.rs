//! ACO execution loop.
//!
//! # Algorithm
//!
//! 1. Precompute the distance matrix; set every trail to `initial_pheromone`
//! 2. Each iteration:
//!    a. Every ant starts at a random location and repeatedly picks the next
//!       unvisited location with probability `∝ τ^α · (1/(d+ε))^β`, then
//!       returns to its start
//!    b. Evaporate all trails by `(1 - ρ)`
//!    c. Each ant deposits `Q / length` on both directions of its edges
//! 3. The shortest tour over all ants and iterations is kept

use super::config::AcoConfig;
use super::matrix::{DistanceMatrix, PheromoneMatrix};
use super::types::{Location, Point, TourRecord};
use crate::convergence::{ConvergenceMonitor, HistorySummary};
use crate::error::{OptimizeError, Result};
use crate::random::rng_from_seed;
use crate::stop::{StopCondition, StopReason};
use log::{debug, info, trace};
use rand::Rng;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Result of an ACO run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoResult<L> {
    /// The best tour as locations, closed (first == last).
    pub best_tour: Vec<L>,

    /// Length of the best tour.
    pub best_distance: f64,

    /// The best tour as indices into the input, closed (N + 1 entries).
    pub tour_indices: Vec<usize>,

    /// One record per executed iteration.
    pub history: Vec<TourRecord>,

    /// Reduction of the best distance relative to the first iteration, in
    /// percent.
    pub improvement_percent: f64,

    /// Iterations actually executed.
    pub iterations: usize,

    /// Whether the run stopped on the convergence rule.
    pub converged: bool,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Whether the wall-clock budget ran out.
    pub timed_out: bool,
}

impl<L> AcoResult<L> {
    /// Improvement formatted with two decimals, e.g. `"12.50%"`.
    pub fn improvement(&self) -> String {
        format!("{:.2}%", self.improvement_percent)
    }

    /// Display-oriented digest of the history.
    pub fn summary(&self) -> HistorySummary {
        HistorySummary::from_series(
            self.history
                .iter()
                .map(|r| (r.iteration, r.best_distance, r.avg_distance))
                .collect(),
        )
    }
}

/// Executes Ant Colony Optimization over a set of locations.
///
/// # Examples
///
/// ```
/// use swarm_planner::aco::{AcoConfig, AcoRunner, Point};
///
/// let square = [
///     Point::new(0.0, 0.0),
///     Point::new(1.0, 0.0),
///     Point::new(1.0, 1.0),
///     Point::new(0.0, 1.0),
/// ];
/// let config = AcoConfig::fast().with_seed(42);
/// let result = AcoRunner::run(&square, &config).unwrap();
///
/// assert_eq!(result.tour_indices.len(), 5);
/// assert!((result.best_distance - 4.0).abs() < 0.2);
/// ```
pub struct AcoRunner;

impl AcoRunner {
    /// Runs ACO with a generator seeded from `config.seed`.
    pub fn run<L: Location + Clone>(locations: &[L], config: &AcoConfig) -> Result<AcoResult<L>> {
        Self::run_with_cancel(locations, config, None)
    }

    /// Runs ACO with an optional cancellation token.
    pub fn run_with_cancel<L: Location + Clone>(
        locations: &[L],
        config: &AcoConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<AcoResult<L>> {
        config.validate()?;
        let mut rng = rng_from_seed(config.seed);
        Self::execute(locations, config, &mut rng, cancel)
    }

    /// Runs ACO drawing all randomness from `rng`. `config.seed` is ignored.
    pub fn run_with_rng<L: Location + Clone, R: Rng>(
        locations: &[L],
        config: &AcoConfig,
        rng: &mut R,
    ) -> Result<AcoResult<L>> {
        Self::execute(locations, config, rng, None)
    }

    fn execute<L: Location + Clone, R: Rng>(
        locations: &[L],
        config: &AcoConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<AcoResult<L>> {
        config.validate()?;
        if locations.is_empty() {
            return Err(OptimizeError::InsufficientData {
                what: "locations",
                required: 1,
                actual: 0,
            });
        }

        let points: Vec<Point> = locations.iter().map(Location::point).collect();
        if let Some(i) = points
            .iter()
            .position(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(OptimizeError::config(
                "locations",
                format!("location {i} has non-finite coordinates"),
            ));
        }

        let n = points.len();
        debug!(
            "aco: {} locations, {} ants, up to {} iterations",
            n, config.num_ants, config.max_iterations
        );

        let distances = DistanceMatrix::from_points(&points);
        let mut pheromone = PheromoneMatrix::new(n, config.initial_pheromone);
        let stop = StopCondition::new(cancel, config.time_limit_ms);
        let mut monitor = config.convergence.map(ConvergenceMonitor::new);

        let mut best_tour: Vec<usize> = Vec::new();
        let mut best_distance = f64::INFINITY;
        let mut history = Vec::with_capacity(config.max_iterations);
        let mut weights = vec![0.0; n];
        let mut converged = false;
        let mut cancelled = false;
        let mut timed_out = false;

        for iteration in 0..config.max_iterations {
            match stop.check() {
                Some(StopReason::Cancelled) => {
                    info!("aco: cancelled after {iteration} iterations");
                    cancelled = true;
                    break;
                }
                Some(StopReason::TimeLimit) => {
                    info!("aco: time limit reached after {iteration} iterations");
                    timed_out = true;
                    break;
                }
                None => {}
            }

            let mut tours: Vec<(Vec<usize>, f64)> = Vec::with_capacity(config.num_ants);
            for _ in 0..config.num_ants {
                let tour = construct_tour(&distances, &pheromone, config, &mut weights, rng);
                let length = distances.tour_length(&tour);
                if length < best_distance {
                    best_distance = length;
                    best_tour.clone_from(&tour);
                }
                tours.push((tour, length));
            }

            pheromone.evaporate(config.evaporation_rate);
            for (tour, length) in &tours {
                let amount = config.pheromone_intensity / length.max(config.epsilon);
                pheromone.deposit_tour(tour, amount);
            }

            let avg_distance =
                tours.iter().map(|(_, length)| length).sum::<f64>() / tours.len() as f64;
            history.push(TourRecord {
                iteration,
                best_distance,
                avg_distance,
            });
            trace!("aco: iteration {iteration} best {best_distance} avg {avg_distance}");

            if let Some(ref mut monitor) = monitor {
                if monitor.observe(best_distance) {
                    info!("aco: converged at iteration {iteration}");
                    converged = true;
                    break;
                }
            }
        }

        // Stopped before any ant walked: fall back to the input order.
        if best_tour.is_empty() {
            best_tour = (0..n).chain(std::iter::once(0)).collect();
            best_distance = distances.tour_length(&best_tour);
        }

        let improvement_percent = match history.first() {
            Some(first) if first.best_distance > 0.0 => {
                (first.best_distance - best_distance) / first.best_distance * 100.0
            }
            _ => 0.0,
        };

        Ok(AcoResult {
            best_tour: best_tour.iter().map(|&i| locations[i].clone()).collect(),
            best_distance,
            tour_indices: best_tour,
            iterations: history.len(),
            history,
            improvement_percent,
            converged,
            cancelled,
            timed_out,
        })
    }
}

/// Builds one closed tour: a random start, every location once, then back.
fn construct_tour<R: Rng>(
    distances: &DistanceMatrix,
    pheromone: &PheromoneMatrix,
    config: &AcoConfig,
    weights: &mut [f64],
    rng: &mut R,
) -> Vec<usize> {
    let n = distances.len();
    let mut tour = Vec::with_capacity(n + 1);
    let mut visited = vec![false; n];

    let start = rng.random_range(0..n);
    tour.push(start);
    visited[start] = true;

    let mut current = start;
    while tour.len() < n {
        let next = select_next(current, &visited, distances, pheromone, config, weights, rng);
        visited[next] = true;
        tour.push(next);
        current = next;
    }

    tour.push(start);
    tour
}

/// Roulette-wheel choice among unvisited locations.
///
/// If rounding keeps the cumulative sum below the drawn threshold, or the
/// weights are all zero or non-finite, the lowest unvisited index is chosen.
fn select_next<R: Rng>(
    current: usize,
    visited: &[bool],
    distances: &DistanceMatrix,
    pheromone: &PheromoneMatrix,
    config: &AcoConfig,
    weights: &mut [f64],
    rng: &mut R,
) -> usize {
    let mut total = 0.0;
    for (j, weight) in weights.iter_mut().enumerate() {
        if visited[j] {
            *weight = 0.0;
            continue;
        }
        let tau = pheromone.get(current, j).powf(config.alpha);
        let eta = (1.0 / (distances.get(current, j) + config.epsilon)).powf(config.beta);
        *weight = tau * eta;
        total += *weight;
    }

    let threshold = rng.random::<f64>() * total;
    let first_unvisited = visited.iter().position(|&v| !v).unwrap_or(current);

    if !(total.is_finite() && total > 0.0) {
        return first_unvisited;
    }

    let mut cumulative = 0.0;
    for (j, &weight) in weights.iter().enumerate() {
        if visited[j] {
            continue;
        }
        cumulative += weight;
        if cumulative >= threshold {
            return j;
        }
    }

    first_unvisited
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn unit_square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ]
    }

    fn assert_hamiltonian(tour: &[usize], n: usize) {
        assert_eq!(tour.len(), n + 1, "tour {tour:?} has wrong length");
        assert_eq!(tour.first(), tour.last(), "tour {tour:?} is not closed");
        let mut seen = vec![false; n];
        for &i in &tour[..n] {
            assert!(!seen[i], "index {i} repeated in {tour:?}");
            seen[i] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_unit_square_scenario() {
        let config = AcoConfig::default()
            .with_num_ants(25)
            .with_max_iterations(50)
            .with_seed(42);
        let result = AcoRunner::run(&unit_square(), &config).unwrap();

        assert!(
            (result.best_distance - 4.0).abs() <= 0.2,
            "expected perimeter 4.0, got {}",
            result.best_distance
        );
        assert_hamiltonian(&result.tour_indices, 4);
        assert_eq!(result.best_tour.len(), 5);
        assert_eq!(result.best_tour[0], unit_square()[result.tour_indices[0]]);
    }

    #[test]
    fn test_circle_finds_perimeter_order() {
        // Points on a circle: the optimal tour visits them in angular order.
        let n = 12;
        let points: Vec<Point> = (0..n)
            .map(|k| {
                // Scrambled input order, so index order is not the answer.
                let theta = std::f64::consts::TAU * ((k * 5) % n) as f64 / n as f64;
                Point::new(10.0 * theta.cos(), 10.0 * theta.sin())
            })
            .collect();
        let optimal = 2.0 * n as f64 * 10.0 * (std::f64::consts::PI / n as f64).sin();

        let config = AcoConfig::default().with_seed(7);
        let result = AcoRunner::run(&points, &config).unwrap();

        assert_hamiltonian(&result.tour_indices, n);
        assert!(
            result.best_distance <= optimal * 1.05,
            "expected near {optimal}, got {}",
            result.best_distance
        );
    }

    #[test]
    fn test_best_distance_never_increases() {
        let points: Vec<(f64, f64)> = (0..10)
            .map(|i| ((i * 37 % 11) as f64, (i * 53 % 7) as f64))
            .collect();
        let config = AcoConfig::default().with_max_iterations(30).with_seed(3);
        let result = AcoRunner::run(&points, &config).unwrap();

        for window in result.history.windows(2) {
            assert!(window[1].best_distance <= window[0].best_distance);
        }
        assert!(result.improvement_percent >= 0.0);
        assert!(result.improvement().ends_with('%'));
    }

    #[test]
    fn test_reproducible_with_seed() {
        let points: Vec<(f64, f64)> = (0..8).map(|i| ((i * 3 % 8) as f64, (i % 3) as f64)).collect();
        let config = AcoConfig::default().with_max_iterations(20).with_seed(11);

        let a = AcoRunner::run(&points, &config).unwrap();
        let b = AcoRunner::run(&points, &config).unwrap();
        assert_eq!(a.tour_indices, b.tour_indices);
        assert_eq!(a.history, b.history);

        let mut rng = create_rng(11);
        let c = AcoRunner::run_with_rng(&points, &config, &mut rng).unwrap();
        assert_eq!(a.tour_indices, c.tour_indices);
    }

    #[test]
    fn test_single_location() {
        let config = AcoConfig::default().with_max_iterations(5).with_seed(1);
        let result = AcoRunner::run(&[Point::new(3.0, 4.0)], &config).unwrap();
        assert_eq!(result.tour_indices, vec![0, 0]);
        assert_eq!(result.best_distance, 0.0);
        assert_eq!(result.history.len(), 5);
        assert_eq!(result.improvement_percent, 0.0);
    }

    #[test]
    fn test_two_locations() {
        let config = AcoConfig::default().with_max_iterations(3).with_seed(1);
        let result = AcoRunner::run(&[(0.0, 0.0), (3.0, 4.0)], &config).unwrap();
        assert_hamiltonian(&result.tour_indices, 2);
        assert!((result.best_distance - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_coincident_points() {
        let points = vec![Point::new(1.0, 1.0); 5];
        let config = AcoConfig::default().with_max_iterations(10).with_seed(1);
        let result = AcoRunner::run(&points, &config).unwrap();
        assert_hamiltonian(&result.tour_indices, 5);
        assert_eq!(result.best_distance, 0.0);
    }

    #[test]
    fn test_empty_locations_rejected() {
        let err = AcoRunner::run::<Point>(&[], &AcoConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            OptimizeError::InsufficientData { what: "locations", .. }
        ));
    }

    #[test]
    fn test_non_finite_location_rejected() {
        let points = [Point::new(0.0, 0.0), Point::new(f64::NAN, 1.0)];
        assert!(AcoRunner::run(&points, &AcoConfig::default()).is_err());
    }

    #[test]
    fn test_cancel_before_start_returns_input_order() {
        let _ = env_logger::builder().is_test(true).try_init();
        let config = AcoConfig::default().with_seed(1);
        let cancel = Arc::new(AtomicBool::new(true));
        let result = AcoRunner::run_with_cancel(&unit_square(), &config, Some(cancel)).unwrap();
        assert!(result.cancelled);
        assert_eq!(result.tour_indices, vec![0, 1, 2, 3, 0]);
        assert!((result.best_distance - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_select_next_fallback_on_zero_weights() {
        let points = unit_square();
        let distances = DistanceMatrix::from_points(&points);
        let pheromone = PheromoneMatrix::new(4, 0.0);
        let config = AcoConfig::default();
        let mut weights = vec![0.0; 4];
        let visited = [true, false, true, false];
        let mut rng = create_rng(0);

        let next = select_next(0, &visited, &distances, &pheromone, &config, &mut weights, &mut rng);
        assert_eq!(next, 1);
    }

    #[test]
    fn test_select_next_prefers_near() {
        // From 0, location 1 is 1 unit away and location 2 is 100 units away.
        let points = [Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(100.0, 0.0)];
        let distances = DistanceMatrix::from_points(&points);
        let pheromone = PheromoneMatrix::new(3, 1.0);
        let config = AcoConfig::default();
        let mut weights = vec![0.0; 3];
        let visited = [true, false, false];
        let mut rng = create_rng(5);

        let near = (0..1000)
            .filter(|_| {
                select_next(0, &visited, &distances, &pheromone, &config, &mut weights, &mut rng) == 1
            })
            .count();
        assert!(near > 990, "near location picked only {near} times");
    }
}
