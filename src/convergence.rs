//! Run history and early-stop detection.

/// Best and average fitness at the end of one iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IterationRecord {
    /// Zero-based iteration index.
    pub iteration: usize,
    /// Best fitness seen so far (never decreases).
    pub best_fitness: f64,
    /// Mean fitness of the population's finite scores this iteration.
    pub avg_fitness: f64,
}

/// When to consider a search converged.
///
/// A run stops once more than `window + 1` iterations have run and the
/// variance of the last `window` best-fitness values drops below
/// `variance_threshold`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConvergenceCriterion {
    /// Number of trailing iterations inspected.
    pub window: usize,
    /// Variance below which the run is considered converged.
    pub variance_threshold: f64,
}

impl Default for ConvergenceCriterion {
    fn default() -> Self {
        Self {
            window: 20,
            variance_threshold: 0.001,
        }
    }
}

impl ConvergenceCriterion {
    /// Sets the trailing window length.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Sets the variance threshold.
    pub fn with_variance_threshold(mut self, threshold: f64) -> Self {
        self.variance_threshold = threshold;
        self
    }

    pub(crate) fn validate(&self) -> crate::Result<()> {
        if self.window < 2 {
            return Err(crate::OptimizeError::config(
                "convergence.window",
                "must be at least 2",
            ));
        }
        if self.variance_threshold.is_nan() || self.variance_threshold < 0.0 {
            return Err(crate::OptimizeError::config(
                "convergence.variance_threshold",
                "must be non-negative",
            ));
        }
        Ok(())
    }
}

/// Watches a stream of best-fitness values for stagnation.
#[derive(Debug, Clone)]
pub struct ConvergenceMonitor {
    criterion: ConvergenceCriterion,
    recent: Vec<f64>,
    seen: usize,
}

impl ConvergenceMonitor {
    /// Creates a monitor for `criterion`.
    pub fn new(criterion: ConvergenceCriterion) -> Self {
        Self {
            criterion,
            recent: Vec::with_capacity(criterion.window),
            seen: 0,
        }
    }

    /// Records the best fitness of the latest iteration and reports whether
    /// the run has converged.
    ///
    /// The first `window + 1` observations never trigger a stop, so at least
    /// `window + 2` iterations always run.
    pub fn observe(&mut self, best_fitness: f64) -> bool {
        self.seen += 1;
        if self.recent.len() == self.criterion.window {
            self.recent.remove(0);
        }
        self.recent.push(best_fitness);

        self.seen > self.criterion.window + 1
            && self.recent.iter().all(|v| v.is_finite())
            && variance(&self.recent) < self.criterion.variance_threshold
    }

    /// Checks a complete history without incremental state.
    pub fn has_converged(criterion: &ConvergenceCriterion, best_values: &[f64]) -> bool {
        if best_values.len() <= criterion.window + 1 {
            return false;
        }
        let tail = &best_values[best_values.len() - criterion.window..];
        tail.iter().all(|v| v.is_finite()) && variance(tail) < criterion.variance_threshold
    }
}

/// Population variance. Zero for an empty slice.
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

/// Mean of the finite values, or negative infinity when there are none.
pub(crate) fn finite_mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        f64::NEG_INFINITY
    } else {
        sum / count as f64
    }
}

/// Display-oriented digest of a run history.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistorySummary {
    /// `(iteration, best, average)` per record.
    pub series: Vec<(usize, f64, f64)>,
    /// Mean absolute change of the best value between consecutive records.
    pub convergence_rate: f64,
    /// `(last - first) / |first| * 100`, or 0 when undefined.
    pub improvement_percent: f64,
}

impl HistorySummary {
    /// Summarizes a continuous-optimizer history.
    pub fn from_records(history: &[IterationRecord]) -> Self {
        let series: Vec<(usize, f64, f64)> = history
            .iter()
            .map(|r| (r.iteration, r.best_fitness, r.avg_fitness))
            .collect();
        Self::from_series(series)
    }

    /// Summarizes any `(iteration, best, average)` series.
    pub fn from_series(series: Vec<(usize, f64, f64)>) -> Self {
        let convergence_rate = if series.len() < 2 {
            0.0
        } else {
            let deltas: Vec<f64> = series
                .windows(2)
                .map(|w| (w[1].1 - w[0].1).abs())
                .filter(|d| d.is_finite())
                .collect();
            if deltas.is_empty() {
                0.0
            } else {
                deltas.iter().sum::<f64>() / deltas.len() as f64
            }
        };

        let improvement_percent = match (series.first(), series.last()) {
            (Some(first), Some(last)) if first.1.is_finite() && first.1 != 0.0 => {
                (last.1 - first.1) / first.1.abs() * 100.0
            }
            _ => 0.0,
        };

        Self {
            series,
            convergence_rate,
            improvement_percent,
        }
    }
}
