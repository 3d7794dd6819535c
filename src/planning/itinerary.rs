//! Activity selection across the days of a trip.

use super::SolutionCodec;
use crate::convergence::IterationRecord;
use crate::error::{OptimizeError, Result};
use crate::pso::{PsoConfig, PsoRunner};
use crate::random::rng_from_seed;
use crate::space::SearchSpace;
use log::debug;
use rand::Rng;

/// Something to do on the trip.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Activity {
    pub name: String,
    /// Expected enjoyment, typically 1 to 5.
    pub rating: f64,
    /// Cost in the trip's currency.
    pub price: f64,
    /// Tiredness added to the day.
    pub fatigue_impact: f64,
}

impl Default for Activity {
    fn default() -> Self {
        Self {
            name: String::new(),
            rating: 4.0,
            price: 0.0,
            fatigue_impact: 10.0,
        }
    }
}

impl Activity {
    /// An activity with default rating 4, free, fatigue 10.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the rating.
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    /// Sets the price.
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    /// Sets the fatigue added to the day.
    pub fn with_fatigue_impact(mut self, fatigue: f64) -> Self {
        self.fatigue_impact = fatigue;
        self
    }
}

/// Shape of the trip and the traveller's limits.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ItineraryConstraints {
    pub days: usize,
    /// Slots per day in the encoding.
    pub max_activities_per_day: usize,
    /// Total spend limit. `None` means unlimited.
    pub budget: Option<f64>,
    /// Subtract a share of total fatigue from the score.
    pub prioritize_low_fatigue: bool,
}

impl Default for ItineraryConstraints {
    fn default() -> Self {
        Self {
            days: 1,
            max_activities_per_day: 5,
            budget: None,
            prioritize_low_fatigue: false,
        }
    }
}

impl ItineraryConstraints {
    pub fn new(days: usize) -> Self {
        Self {
            days,
            ..Self::default()
        }
    }

    /// Sets the number of slots per day.
    pub fn with_max_activities_per_day(mut self, n: usize) -> Self {
        self.max_activities_per_day = n;
        self
    }

    /// Sets the total spend limit.
    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Sets whether total fatigue is subtracted from the score.
    pub fn with_prioritize_low_fatigue(mut self, on: bool) -> Self {
        self.prioritize_low_fatigue = on;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.days < 1 {
            return Err(OptimizeError::config("days", "must be at least 1"));
        }
        if self.max_activities_per_day < 1 {
            return Err(OptimizeError::config(
                "max_activities_per_day",
                "must be at least 1",
            ));
        }
        if let Some(budget) = self.budget {
            if !budget.is_finite() || budget < 0.0 {
                return Err(OptimizeError::config(
                    "budget",
                    format!("must be finite and non-negative, got {budget}"),
                ));
            }
        }
        Ok(())
    }
}

/// Penalty constants of the itinerary score.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItineraryPenalties {
    /// Activities per day before the crowding penalty applies.
    pub daily_activity_cap: usize,
    /// Penalty per activity above the cap.
    pub excess_activity_penalty: f64,
    /// Daily fatigue above which each extra point costs one score point.
    pub daily_fatigue_limit: f64,
    /// Budget overrun is divided by this before being subtracted.
    pub budget_overrun_divisor: f64,
    /// Share of total fatigue subtracted when low fatigue is preferred.
    pub fatigue_weight: f64,
}

impl Default for ItineraryPenalties {
    fn default() -> Self {
        Self {
            daily_activity_cap: 6,
            excess_activity_penalty: 10.0,
            daily_fatigue_limit: 60.0,
            budget_overrun_divisor: 1000.0,
            fatigue_weight: 0.1,
        }
    }
}

/// Encodes an itinerary as `days * slots_per_day` scalars.
///
/// Each scalar is floored and reduced modulo the activity count to pick an
/// activity. Decoding scans the vector in order and skips activities that
/// an earlier slot already claimed, so a day can end up with fewer
/// activities than slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItineraryCodec {
    activity_count: usize,
    days: usize,
    slots_per_day: usize,
}

impl ItineraryCodec {
    pub fn new(activity_count: usize, days: usize, slots_per_day: usize) -> Self {
        Self {
            activity_count,
            days,
            slots_per_day,
        }
    }

    /// Activity index selected by one scalar.
    fn activity_index(&self, value: f64) -> usize {
        let n = self.activity_count.max(1) as i64;
        (value.floor() as i64).rem_euclid(n) as usize
    }
}

impl SolutionCodec for ItineraryCodec {
    /// Activity indices per day.
    type Artifact = Vec<Vec<usize>>;

    fn dimensions(&self) -> usize {
        self.days * self.slots_per_day
    }

    fn search_space(&self) -> Result<SearchSpace> {
        if self.activity_count == 0 {
            return Err(OptimizeError::InsufficientData {
                what: "activities",
                required: 1,
                actual: 0,
            });
        }
        // Upper bound `n` (not `n - 1`) gives every index an equal share of
        // the range; `n` itself wraps to 0.
        SearchSpace::uniform(
            self.dimensions(),
            0.0,
            self.activity_count as f64,
        )
    }

    fn decode(&self, position: &[f64]) -> Vec<Vec<usize>> {
        let mut plan = vec![Vec::new(); self.days];
        let mut used = vec![false; self.activity_count];
        if self.activity_count == 0 {
            return plan;
        }

        for (day, activities) in plan.iter_mut().enumerate() {
            for slot in 0..self.slots_per_day {
                let Some(&value) = position.get(day * self.slots_per_day + slot) else {
                    break;
                };
                let index = self.activity_index(value);
                if used[index] {
                    continue;
                }
                used[index] = true;
                activities.push(index);
            }
        }
        plan
    }
}

/// Outcome of [`ItineraryOptimizer::optimize`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItineraryResult {
    /// Activities per day.
    pub itinerary: Vec<Vec<Activity>>,
    /// Score of the chosen itinerary.
    pub score: f64,
    /// PSO run history.
    pub optimization_history: Vec<IterationRecord>,
}

/// Picks and spreads activities over the days of a trip with PSO.
///
/// The score rewards total rating and subtracts penalties for crowded days,
/// tiring days, budget overruns and (optionally) total fatigue.
///
/// # Examples
///
/// ```
/// use swarm_planner::planning::{Activity, ItineraryConstraints, ItineraryOptimizer};
/// use swarm_planner::pso::PsoConfig;
///
/// let activities = vec![
///     Activity::new("Kinkaku-ji").with_rating(5.0),
///     Activity::new("Nishiki Market").with_rating(4.0),
/// ];
/// let optimizer = ItineraryOptimizer::default().with_pso(PsoConfig::fast().with_seed(1));
/// let plan = optimizer
///     .optimize(&activities, &ItineraryConstraints::new(1).with_max_activities_per_day(2))
///     .unwrap();
/// assert_eq!(plan.itinerary.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ItineraryOptimizer {
    pub pso: PsoConfig,
    pub penalties: ItineraryPenalties,
}

impl Default for ItineraryOptimizer {
    fn default() -> Self {
        Self {
            pso: PsoConfig::fast(),
            penalties: ItineraryPenalties::default(),
        }
    }
}

impl ItineraryOptimizer {
    /// Sets the PSO configuration.
    pub fn with_pso(mut self, pso: PsoConfig) -> Self {
        self.pso = pso;
        self
    }

    /// Sets the penalty constants.
    pub fn with_penalties(mut self, penalties: ItineraryPenalties) -> Self {
        self.penalties = penalties;
        self
    }

    /// Optimizes with a generator seeded from `self.pso.seed`.
    pub fn optimize(
        &self,
        activities: &[Activity],
        constraints: &ItineraryConstraints,
    ) -> Result<ItineraryResult> {
        let mut rng = rng_from_seed(self.pso.seed);
        self.optimize_with_rng(activities, constraints, &mut rng)
    }

    /// Optimizes drawing all randomness from `rng`.
    pub fn optimize_with_rng<R: Rng>(
        &self,
        activities: &[Activity],
        constraints: &ItineraryConstraints,
        rng: &mut R,
    ) -> Result<ItineraryResult> {
        constraints.validate()?;
        let codec = ItineraryCodec::new(
            activities.len(),
            constraints.days,
            constraints.max_activities_per_day,
        );
        let space = codec.search_space()?;
        debug!(
            "itinerary: {} activities over {} days x {} slots",
            activities.len(),
            constraints.days,
            constraints.max_activities_per_day
        );

        let objective =
            |x: &[f64]| self.score(&codec.decode(x), activities, constraints);
        let result = PsoRunner::run_with_rng(&objective, &space, &self.pso, rng)?;

        let itinerary = codec
            .decode(&result.best_solution)
            .into_iter()
            .map(|day| day.into_iter().map(|i| activities[i].clone()).collect())
            .collect();

        Ok(ItineraryResult {
            itinerary,
            score: result.best_fitness,
            optimization_history: result.history,
        })
    }

    /// Scores a decoded plan (activity indices per day).
    ///
    /// Indices outside `activities` are ignored.
    pub fn score(
        &self,
        plan: &[Vec<usize>],
        activities: &[Activity],
        constraints: &ItineraryConstraints,
    ) -> f64 {
        let p = &self.penalties;
        let mut enjoyment = 0.0;
        let mut cost = 0.0;
        let mut fatigue = 0.0;
        let mut penalty = 0.0;

        for day in plan {
            let mut daily_fatigue = 0.0;
            let mut count = 0;
            for activity in day.iter().filter_map(|&i| activities.get(i)) {
                count += 1;
                enjoyment += activity.rating;
                cost += activity.price;
                daily_fatigue += activity.fatigue_impact;
            }
            fatigue += daily_fatigue;

            if count > p.daily_activity_cap {
                penalty += (count - p.daily_activity_cap) as f64 * p.excess_activity_penalty;
            }
            if daily_fatigue > p.daily_fatigue_limit {
                penalty += daily_fatigue - p.daily_fatigue_limit;
            }
        }

        if let Some(budget) = constraints.budget {
            if cost > budget {
                penalty += (cost - budget) / p.budget_overrun_divisor;
            }
        }

        let mut score = enjoyment;
        if constraints.prioritize_low_fatigue {
            score -= p.fatigue_weight * fatigue;
        }
        score - penalty
    }
}
