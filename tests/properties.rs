//! Property tests over randomly generated problems.

use proptest::prelude::*;
use swarm_planner::aco::{AcoConfig, AcoRunner, Point};
use swarm_planner::firefly::{FireflyConfig, FireflyRunner};
use swarm_planner::planning::{BudgetAllocator, BudgetCategory, ItineraryCodec, SolutionCodec};
use swarm_planner::pso::{PsoConfig, PsoRunner};
use swarm_planner::SearchSpace;

/// Bounds with 1..=4 dimensions, each `[lo, lo + width]`.
fn bounds() -> impl Strategy<Value = SearchSpace> {
    prop::collection::vec((-50.0f64..50.0, 0.0f64..20.0), 1..=4).prop_map(|dims| {
        let min = dims.iter().map(|&(lo, _)| lo).collect();
        let max = dims.iter().map(|&(lo, w)| lo + w).collect();
        SearchSpace::new(min, max).unwrap()
    })
}

fn shifted_sphere(center: f64) -> impl Fn(&[f64]) -> f64 + Sync {
    move |x: &[f64]| -x.iter().map(|v| (v - center).powi(2)).sum::<f64>()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn pso_stays_in_bounds_and_never_regresses(
        space in bounds(),
        center in -60.0f64..60.0,
        seed in any::<u64>(),
    ) {
        let config = PsoConfig::default()
            .with_population_size(10)
            .with_max_iterations(25)
            .with_seed(seed);
        let result = PsoRunner::run(&shifted_sphere(center), &space, &config).unwrap();

        prop_assert!(space.contains(&result.best_solution));
        for pair in result.history.windows(2) {
            prop_assert!(pair[0].best_fitness <= pair[1].best_fitness);
        }
    }

    #[test]
    fn firefly_stays_in_bounds_and_never_regresses(
        space in bounds(),
        center in -60.0f64..60.0,
        seed in any::<u64>(),
    ) {
        let config = FireflyConfig::default()
            .with_num_fireflies(8)
            .with_max_iterations(15)
            .with_seed(seed);
        let result = FireflyRunner::run(&shifted_sphere(center), &space, &config).unwrap();

        prop_assert!(space.contains(&result.best_solution));
        for pair in result.history.windows(2) {
            prop_assert!(pair[0].best_fitness <= pair[1].best_fitness);
        }
    }

    #[test]
    fn pso_is_reproducible(space in bounds(), seed in any::<u64>()) {
        let config = PsoConfig::fast().with_max_iterations(15).with_seed(seed);
        let objective = shifted_sphere(1.0);
        let a = PsoRunner::run(&objective, &space, &config).unwrap();
        let b = PsoRunner::run(&objective, &space, &config).unwrap();

        prop_assert_eq!(a.best_solution, b.best_solution);
        prop_assert_eq!(a.history, b.history);
    }

    #[test]
    fn aco_tour_is_hamiltonian(
        coords in prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 2..12),
        seed in any::<u64>(),
    ) {
        let points: Vec<Point> = coords.iter().map(|&(x, y)| Point::new(x, y)).collect();
        let config = AcoConfig::fast().with_num_ants(8).with_max_iterations(10).with_seed(seed);
        let result = AcoRunner::run(&points, &config).unwrap();

        let n = points.len();
        let tour = &result.tour_indices;
        prop_assert_eq!(tour.len(), n + 1);
        prop_assert_eq!(tour[0], tour[n]);

        let mut seen = vec![false; n];
        for &i in &tour[..n] {
            prop_assert!(!seen[i], "index {} visited twice", i);
            seen[i] = true;
        }
        prop_assert!(result.best_distance.is_finite());
    }

    #[test]
    fn feasible_budget_sums_to_100(
        ranges in prop::collection::vec((0.0f64..1.0, 0.0f64..1.0, 0.1f64..5.0), 1..6),
        seed in any::<u64>(),
    ) {
        let even = 100.0 / ranges.len() as f64;
        let categories: Vec<BudgetCategory> = ranges
            .iter()
            .enumerate()
            .map(|(i, &(lo, hi, importance))| {
                BudgetCategory::new(format!("c{i}"), importance)
                    .with_range(lo * even, even + hi * (100.0 - even))
            })
            .collect();
        let allocator = BudgetAllocator::default()
            .with_pso(BudgetAllocator::default_pso().with_max_iterations(10).with_seed(seed));
        let result = allocator.optimize(50_000.0, &categories).unwrap();

        let total: f64 = result.allocation.iter().map(|a| a.percentage).sum();
        prop_assert!((total - 100.0).abs() <= 0.5, "total {}", total);
    }

    #[test]
    fn itinerary_decode_never_repeats(
        position in prop::collection::vec(-20.0f64..20.0, 0..15),
        activity_count in 1usize..8,
    ) {
        let codec = ItineraryCodec::new(activity_count, 3, 5);
        let plan = codec.decode(&position);

        prop_assert_eq!(plan.len(), 3);
        let mut seen = vec![false; activity_count];
        for &i in plan.iter().flatten() {
            prop_assert!(i < activity_count);
            prop_assert!(!seen[i]);
            seen[i] = true;
        }
    }
}
