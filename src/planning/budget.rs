//! Percentage split of a trip budget over spending categories.

use super::SolutionCodec;
use crate::error::{OptimizeError, Result};
use crate::pso::{PsoConfig, PsoRunner};
use crate::random::rng_from_seed;
use crate::space::SearchSpace;
use log::debug;
use rand::Rng;

/// A spending category with its allowed share of the budget.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BudgetCategory {
    pub name: String,
    /// Lowest acceptable share, in percent.
    pub min_percent: f64,
    /// Highest acceptable share, in percent.
    pub max_percent: f64,
    /// Weight of each percent spent here.
    pub importance: f64,
}

impl Default for BudgetCategory {
    fn default() -> Self {
        Self {
            name: String::new(),
            min_percent: 0.0,
            max_percent: 100.0,
            importance: 1.0,
        }
    }
}

impl BudgetCategory {
    pub fn new(name: impl Into<String>, importance: f64) -> Self {
        Self {
            name: name.into(),
            importance,
            ..Self::default()
        }
    }

    /// Sets the allowed percentage range.
    pub fn with_range(mut self, min_percent: f64, max_percent: f64) -> Self {
        self.min_percent = min_percent;
        self.max_percent = max_percent;
        self
    }

    fn validate(&self) -> Result<()> {
        let finite = self.min_percent.is_finite()
            && self.max_percent.is_finite()
            && self.importance.is_finite();
        if !finite {
            return Err(OptimizeError::config(
                "categories",
                format!("'{}' has a non-finite range or importance", self.name),
            ));
        }
        if self.min_percent < 0.0 || self.max_percent > 100.0 || self.min_percent > self.max_percent
        {
            return Err(OptimizeError::config(
                "categories",
                format!(
                    "'{}' needs 0 <= min_percent <= max_percent <= 100, got [{}, {}]",
                    self.name, self.min_percent, self.max_percent
                ),
            ));
        }
        Ok(())
    }
}

/// Penalty weights of the allocation objective.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BudgetPenalties {
    /// Cost per percent below a category's minimum or above its maximum.
    pub range_weight: f64,
    /// Cost per percent the total strays from 100.
    pub total_weight: f64,
}

impl Default for BudgetPenalties {
    fn default() -> Self {
        Self {
            range_weight: 10.0,
            total_weight: 100.0,
        }
    }
}

/// One scalar percentage per category, searched within the category range.
///
/// Decoding balances the percentages to a total of 100 without leaving any
/// category range. When the ranges cannot reach 100 the percentages are
/// returned unchanged.
#[derive(Debug, Clone)]
pub struct AllocationCodec<'a> {
    categories: &'a [BudgetCategory],
}

impl<'a> AllocationCodec<'a> {
    pub fn new(categories: &'a [BudgetCategory]) -> Self {
        Self { categories }
    }
}

impl SolutionCodec for AllocationCodec<'_> {
    /// Balanced percentages, in category order.
    type Artifact = Vec<f64>;

    fn dimensions(&self) -> usize {
        self.categories.len()
    }

    fn search_space(&self) -> Result<SearchSpace> {
        SearchSpace::new(
            self.categories.iter().map(|c| c.min_percent).collect(),
            self.categories.iter().map(|c| c.max_percent).collect(),
        )
    }

    fn decode(&self, position: &[f64]) -> Vec<f64> {
        let mut percents: Vec<f64> = self
            .categories
            .iter()
            .zip(position)
            .map(|(c, &p)| p.clamp(c.min_percent, c.max_percent))
            .collect();
        balance(&mut percents, self.categories);
        percents
    }
}

/// Spreads `100 - sum` over the categories in proportion to each one's
/// headroom in the needed direction. A single pass suffices: no share can
/// exceed its own headroom.
fn balance(percents: &mut [f64], categories: &[BudgetCategory]) {
    let residual = 100.0 - percents.iter().sum::<f64>();
    if residual == 0.0 || !residual.is_finite() {
        return;
    }

    let headroom: Vec<f64> = percents
        .iter()
        .zip(categories)
        .map(|(&p, c)| {
            if residual > 0.0 {
                c.max_percent - p
            } else {
                p - c.min_percent
            }
        })
        .collect();
    let total: f64 = headroom.iter().sum();
    if total < residual.abs() {
        return;
    }

    for (p, h) in percents.iter_mut().zip(&headroom) {
        *p += residual * h / total;
    }
}

/// Amount assigned to one category.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Allocation {
    pub category: String,
    pub percentage: f64,
    /// `percentage` of the total budget, rounded to a whole unit.
    pub amount: f64,
}

/// Outcome of [`BudgetAllocator::optimize`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BudgetResult {
    pub allocation: Vec<Allocation>,
    /// Sum of the rounded amounts.
    pub total_allocated: f64,
    /// Objective value of the returned (balanced) percentages.
    pub optimization_score: f64,
}

/// Splits a budget over categories with PSO.
///
/// The objective rewards `percent * importance` and penalizes shares outside
/// each category's range and totals other than 100.
///
/// # Examples
///
/// ```
/// use swarm_planner::planning::{BudgetAllocator, BudgetCategory};
///
/// let categories = vec![
///     BudgetCategory::new("lodging", 2.0).with_range(30.0, 60.0),
///     BudgetCategory::new("food", 1.0).with_range(20.0, 50.0),
///     BudgetCategory::new("transport", 1.0).with_range(10.0, 30.0),
/// ];
/// let pso = BudgetAllocator::default_pso().with_seed(5);
/// let allocator = BudgetAllocator::default().with_pso(pso);
/// let result = allocator.optimize(300_000.0, &categories).unwrap();
/// assert_eq!(result.allocation.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct BudgetAllocator {
    pub pso: PsoConfig,
    pub penalties: BudgetPenalties,
}

impl Default for BudgetAllocator {
    fn default() -> Self {
        Self {
            pso: Self::default_pso(),
            penalties: BudgetPenalties::default(),
        }
    }
}

impl BudgetAllocator {
    /// PSO settings used by default: 15 particles, 30 iterations.
    pub fn default_pso() -> PsoConfig {
        PsoConfig::default()
            .with_population_size(15)
            .with_max_iterations(30)
    }

    /// Sets the PSO configuration.
    pub fn with_pso(mut self, pso: PsoConfig) -> Self {
        self.pso = pso;
        self
    }

    /// Sets the penalty constants.
    pub fn with_penalties(mut self, penalties: BudgetPenalties) -> Self {
        self.penalties = penalties;
        self
    }

    /// Optimizes with a generator seeded from `self.pso.seed`.
    pub fn optimize(&self, total_budget: f64, categories: &[BudgetCategory]) -> Result<BudgetResult> {
        let mut rng = rng_from_seed(self.pso.seed);
        self.optimize_with_rng(total_budget, categories, &mut rng)
    }

    /// Optimizes drawing all randomness from `rng`.
    pub fn optimize_with_rng<R: Rng>(
        &self,
        total_budget: f64,
        categories: &[BudgetCategory],
        rng: &mut R,
    ) -> Result<BudgetResult> {
        if categories.is_empty() {
            return Err(OptimizeError::InsufficientData {
                what: "categories",
                required: 1,
                actual: 0,
            });
        }
        if !total_budget.is_finite() || total_budget < 0.0 {
            return Err(OptimizeError::config(
                "total_budget",
                format!("must be finite and non-negative, got {total_budget}"),
            ));
        }
        for category in categories {
            category.validate()?;
        }

        let codec = AllocationCodec::new(categories);
        let space = codec.search_space()?;
        debug!(
            "budget: {} categories, total {}",
            categories.len(),
            total_budget
        );

        let objective = |x: &[f64]| self.score(x, categories);
        let result = PsoRunner::run_with_rng(&objective, &space, &self.pso, rng)?;

        let percents = codec.decode(&result.best_solution);
        let optimization_score = self.score(&percents, categories);
        let allocation: Vec<Allocation> = percents
            .into_iter()
            .zip(categories)
            .map(|(percentage, c)| Allocation {
                category: c.name.clone(),
                percentage,
                amount: (total_budget * percentage / 100.0).round(),
            })
            .collect();
        let total_allocated = allocation.iter().map(|a| a.amount).sum();

        Ok(BudgetResult {
            allocation,
            total_allocated,
            optimization_score,
        })
    }

    /// Objective value of raw percentages, in category order.
    pub fn score(&self, percents: &[f64], categories: &[BudgetCategory]) -> f64 {
        let p = &self.penalties;
        let mut score = 0.0;
        let mut total = 0.0;

        for (&percent, c) in percents.iter().zip(categories) {
            score += percent * c.importance;
            total += percent;
            if percent < c.min_percent {
                score -= p.range_weight * (c.min_percent - percent);
            }
            if percent > c.max_percent {
                score -= p.range_weight * (percent - c.max_percent);
            }
        }
        score - p.total_weight * (100.0 - total).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum(values: &[f64]) -> f64 {
        values.iter().sum()
    }

    #[test]
    fn test_two_even_categories() {
        let categories = vec![
            BudgetCategory::new("lodging", 1.0).with_range(20.0, 80.0),
            BudgetCategory::new("food", 1.0).with_range(20.0, 80.0),
        ];
        let allocator =
            BudgetAllocator::default().with_pso(BudgetAllocator::default_pso().with_seed(42));
        let result = allocator.optimize(100_000.0, &categories).unwrap();

        for a in &result.allocation {
            assert!(
                (20_000.0..=80_000.0).contains(&a.amount),
                "{} got {}",
                a.category,
                a.amount
            );
        }
        assert!(
            (result.total_allocated - 100_000.0).abs() <= 1.0,
            "total {}",
            result.total_allocated
        );
    }

    #[test]
    fn test_percentages_sum_to_100() {
        let categories = vec![
            BudgetCategory::new("lodging", 3.0).with_range(25.0, 50.0),
            BudgetCategory::new("food", 2.0).with_range(15.0, 40.0),
            BudgetCategory::new("transport", 1.0).with_range(10.0, 30.0),
            BudgetCategory::new("shopping", 0.5).with_range(0.0, 20.0),
        ];
        let allocator =
            BudgetAllocator::default().with_pso(BudgetAllocator::default_pso().with_seed(8));
        let result = allocator.optimize(250_000.0, &categories).unwrap();

        let percents: Vec<f64> = result.allocation.iter().map(|a| a.percentage).collect();
        assert!((sum(&percents) - 100.0).abs() < 1e-6);
        for (a, c) in result.allocation.iter().zip(&categories) {
            assert!(a.percentage >= c.min_percent - 1e-9);
            assert!(a.percentage <= c.max_percent + 1e-9);
        }
    }

    #[test]
    fn test_score_describes_returned_allocation() {
        let categories = vec![
            BudgetCategory::new("lodging", 2.0).with_range(30.0, 60.0),
            BudgetCategory::new("food", 1.0).with_range(20.0, 50.0),
            BudgetCategory::new("transport", 1.0).with_range(10.0, 30.0),
        ];
        let allocator =
            BudgetAllocator::default().with_pso(BudgetAllocator::default_pso().with_seed(11));
        let result = allocator.optimize(120_000.0, &categories).unwrap();

        let percents: Vec<f64> = result.allocation.iter().map(|a| a.percentage).collect();
        assert_eq!(
            result.optimization_score,
            allocator.score(&percents, &categories)
        );
        // Balanced to 100, so no total penalty: just the weighted sum.
        let weighted: f64 = percents
            .iter()
            .zip(&categories)
            .map(|(p, c)| p * c.importance)
            .sum();
        assert!((result.optimization_score - weighted).abs() < 1e-6);
    }

    #[test]
    fn test_balance_up_and_down() {
        let categories = vec![
            BudgetCategory::new("a", 1.0).with_range(10.0, 60.0),
            BudgetCategory::new("b", 1.0).with_range(10.0, 60.0),
        ];

        let mut low = vec![30.0, 50.0];
        balance(&mut low, &categories);
        // Headroom 30 and 10 receive 15 and 5.
        assert!((low[0] - 45.0).abs() < 1e-9);
        assert!((low[1] - 55.0).abs() < 1e-9);

        let mut high = vec![60.0, 60.0];
        balance(&mut high, &categories);
        assert!((sum(&high) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_balance_infeasible_is_noop() {
        let categories = vec![
            BudgetCategory::new("a", 1.0).with_range(0.0, 30.0),
            BudgetCategory::new("b", 1.0).with_range(0.0, 30.0),
        ];
        let mut percents = vec![20.0, 25.0];
        balance(&mut percents, &categories);
        assert_eq!(percents, vec![20.0, 25.0]);
    }

    #[test]
    fn test_score_penalties() {
        let allocator = BudgetAllocator::default();
        let categories = vec![
            BudgetCategory::new("a", 2.0).with_range(20.0, 50.0),
            BudgetCategory::new("b", 1.0).with_range(20.0, 50.0),
        ];
        assert_eq!(allocator.score(&[50.0, 50.0], &categories), 150.0);
        // b is 10 under its range and the total is 40 short.
        assert_eq!(
            allocator.score(&[50.0, 10.0], &categories),
            100.0 + 10.0 - 100.0 - 4000.0
        );
    }

    #[test]
    fn test_importance_shifts_share() {
        let categories = vec![
            BudgetCategory::new("experiences", 5.0).with_range(10.0, 70.0),
            BudgetCategory::new("souvenirs", 1.0).with_range(10.0, 70.0),
        ];
        let allocator = BudgetAllocator::default().with_pso(
            BudgetAllocator::default_pso()
                .with_max_iterations(100)
                .with_seed(3),
        );
        let result = allocator.optimize(10_000.0, &categories).unwrap();
        assert!(result.allocation[0].percentage > result.allocation[1].percentage);
    }

    #[test]
    fn test_errors() {
        let allocator = BudgetAllocator::default();
        assert!(matches!(
            allocator.optimize(1000.0, &[]),
            Err(OptimizeError::InsufficientData { what: "categories", .. })
        ));

        let categories = vec![BudgetCategory::new("a", 1.0)];
        assert!(matches!(
            allocator.optimize(-1.0, &categories),
            Err(OptimizeError::Configuration { parameter: "total_budget", .. })
        ));
        assert!(allocator.optimize(f64::NAN, &categories).is_err());

        let inverted = vec![BudgetCategory::new("a", 1.0).with_range(60.0, 40.0)];
        assert!(allocator.optimize(1000.0, &inverted).is_err());
    }

    #[test]
    fn test_zero_budget() {
        let categories = vec![BudgetCategory::new("a", 1.0), BudgetCategory::new("b", 1.0)];
        let allocator =
            BudgetAllocator::default().with_pso(BudgetAllocator::default_pso().with_seed(1));
        let result = allocator.optimize(0.0, &categories).unwrap();
        assert_eq!(result.total_allocated, 0.0);
    }
}
