//! Dense symmetric matrices over location indices.

use super::types::Point;

/// Pairwise Euclidean distances. Symmetric with a zero diagonal.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Computes all pairwise distances once.
    pub fn from_points(points: &[Point]) -> Self {
        let n = points.len();
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = points[i].distance_to(&points[j]);
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }
        Self { n, data }
    }

    /// Number of locations.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// Sum of consecutive edge lengths. A closed tour must repeat its start.
    pub fn tour_length(&self, tour: &[usize]) -> f64 {
        tour.windows(2).map(|w| self.get(w[0], w[1])).sum()
    }
}

/// Pheromone trail strengths. Symmetric and never negative.
#[derive(Debug, Clone, PartialEq)]
pub struct PheromoneMatrix {
    n: usize,
    data: Vec<f64>,
}

impl PheromoneMatrix {
    /// A matrix with every entry set to `initial`.
    pub fn new(n: usize, initial: f64) -> Self {
        Self {
            n,
            data: vec![initial.max(0.0); n * n],
        }
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// Multiplies every entry by `1 - rate`.
    pub fn evaporate(&mut self, rate: f64) {
        let keep = (1.0 - rate).clamp(0.0, 1.0);
        for tau in self.data.iter_mut() {
            *tau *= keep;
        }
    }

    /// Adds `amount` to edge `(i, j)` in both directions.
    pub fn deposit(&mut self, i: usize, j: usize, amount: f64) {
        if !(amount.is_finite() && amount > 0.0) {
            return;
        }
        self.data[i * self.n + j] += amount;
        if i != j {
            self.data[j * self.n + i] += amount;
        }
    }

    /// Deposits `amount` on every edge of `tour`.
    pub fn deposit_tour(&mut self, tour: &[usize], amount: f64) {
        for w in tour.windows(2) {
            self.deposit(w[0], w[1], amount);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_distance_matrix_symmetric() {
        let m = DistanceMatrix::from_points(&square());
        assert_eq!(m.len(), 4);
        for i in 0..4 {
            assert_eq!(m.get(i, i), 0.0);
            for j in 0..4 {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
        assert!((m.get(0, 2) - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_tour_length() {
        let m = DistanceMatrix::from_points(&square());
        assert!((m.tour_length(&[0, 1, 2, 3, 0]) - 4.0).abs() < 1e-12);
        let crossed = 2.0 + 2.0 * 2f64.sqrt();
        assert!((m.tour_length(&[0, 2, 1, 3, 0]) - crossed).abs() < 1e-12);
    }

    #[test]
    fn test_pheromone_evaporate_and_deposit() {
        let mut p = PheromoneMatrix::new(3, 1.0);
        p.evaporate(0.1);
        assert!((p.get(0, 1) - 0.9).abs() < 1e-12);

        p.deposit_tour(&[0, 1, 2, 0], 0.5);
        assert!((p.get(0, 1) - 1.4).abs() < 1e-12);
        assert!((p.get(1, 0) - 1.4).abs() < 1e-12);
        assert!((p.get(2, 0) - 1.4).abs() < 1e-12);
        assert!((p.get(1, 1) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_pheromone_never_negative() {
        let mut p = PheromoneMatrix::new(2, 1.0);
        p.evaporate(1.5);
        p.deposit(0, 1, -3.0);
        p.deposit(0, 1, f64::INFINITY);
        assert!(p.get(0, 1) >= 0.0);
        assert_eq!(p.get(0, 1), 0.0);
    }
}
