//! Location types consumed by the ant colony.

/// A point in the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Anything with planar coordinates can be toured.
///
/// ```
/// use swarm_planner::aco::{Location, Point};
///
/// struct Shrine { name: &'static str, lat: f64, lon: f64 }
///
/// impl Location for Shrine {
///     fn point(&self) -> Point { Point::new(self.lon, self.lat) }
/// }
///
/// let s = Shrine { name: "Fushimi Inari", lat: 34.97, lon: 135.77 };
/// assert_eq!(s.point().y, 34.97);
/// # let _ = s.name;
/// ```
pub trait Location {
    /// Coordinates used for distance computation.
    fn point(&self) -> Point;
}

impl Location for Point {
    fn point(&self) -> Point {
        *self
    }
}

impl Location for (f64, f64) {
    fn point(&self) -> Point {
        Point::new(self.0, self.1)
    }
}

/// Best and average tour length at the end of one iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TourRecord {
    /// Zero-based iteration index.
    pub iteration: usize,
    /// Shortest tour seen so far (never increases).
    pub best_distance: f64,
    /// Mean tour length of this iteration's ants.
    pub avg_distance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
        assert_eq!(a.distance_to(&a), 0.0);
    }

    #[test]
    fn test_tuple_location() {
        assert_eq!((1.0, 2.0).point(), Point::new(1.0, 2.0));
    }
}
