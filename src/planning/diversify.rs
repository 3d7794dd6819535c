//! Greedy score/diversity reordering of ranked candidates.

use crate::error::{OptimizeError, Result};
use crate::space::sanitize_fitness;

/// Reorders `candidates` so that high scores and variety alternate.
///
/// Picks greedily: each step takes the remaining candidate maximizing
/// `(1 - weight) * score + weight * mean(1 - similarity(candidate, picked))`
/// over the already-picked candidates. The first pick has no picked set and
/// is simply the top score. Ties keep the earlier candidate, so the result
/// is deterministic.
///
/// `similarity` should return values in `[0, 1]`. A `weight` of 0 sorts by
/// score; a `weight` of 1 ignores scores after the first pick.
///
/// # Examples
///
/// ```
/// use swarm_planner::planning::diversify;
///
/// // (name, score, area)
/// let spots = vec![("temple A", 0.9, 0), ("temple B", 0.85, 0), ("market", 0.6, 1)];
/// let ordered = diversify(spots, 0.5, |s| s.1, |a, b| if a.2 == b.2 { 1.0 } else { 0.0 }).unwrap();
/// assert_eq!(ordered[0].0, "temple A");
/// assert_eq!(ordered[1].0, "market");
/// ```
pub fn diversify<T, S, D>(candidates: Vec<T>, weight: f64, score: S, similarity: D) -> Result<Vec<T>>
where
    S: Fn(&T) -> f64,
    D: Fn(&T, &T) -> f64,
{
    if !(0.0..=1.0).contains(&weight) {
        return Err(OptimizeError::config(
            "weight",
            format!("must be within [0, 1], got {weight}"),
        ));
    }

    let scores: Vec<f64> = candidates.iter().map(|c| sanitize_fitness(score(c))).collect();
    let mut picked: Vec<usize> = Vec::with_capacity(candidates.len());
    let mut remaining: Vec<usize> = (0..candidates.len()).collect();

    while !remaining.is_empty() {
        let mut best_slot = 0;
        let mut best_value = f64::NEG_INFINITY;

        for (slot, &i) in remaining.iter().enumerate() {
            let value = if picked.is_empty() {
                scores[i]
            } else {
                let dissimilarity = picked
                    .iter()
                    .map(|&j| 1.0 - similarity(&candidates[i], &candidates[j]))
                    .sum::<f64>()
                    / picked.len() as f64;
                sanitize_fitness((1.0 - weight) * scores[i] + weight * dissimilarity)
            };
            if slot == 0 || value > best_value {
                best_slot = slot;
                best_value = value;
            }
        }

        picked.push(remaining.remove(best_slot));
    }

    let mut slots: Vec<Option<T>> = candidates.into_iter().map(Some).collect();
    Ok(picked.into_iter().filter_map(|i| slots[i].take()).collect())
}
