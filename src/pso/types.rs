//! Particle state.

/// One member of the swarm.
#[derive(Debug, Clone)]
pub(super) struct Particle {
    pub position: Vec<f64>,
    pub velocity: Vec<f64>,
    pub fitness: f64,
    pub best_position: Vec<f64>,
    /// Never decreases over the particle's lifetime.
    pub best_fitness: f64,
}

impl Particle {
    pub fn new(position: Vec<f64>, velocity: Vec<f64>) -> Self {
        Self {
            best_position: position.clone(),
            position,
            velocity,
            fitness: f64::NEG_INFINITY,
            best_fitness: f64::NEG_INFINITY,
        }
    }

    /// Records the current position as personal best on strict improvement.
    pub fn update_personal_best(&mut self) -> bool {
        if self.fitness > self.best_fitness {
            self.best_fitness = self.fitness;
            self.best_position.clone_from(&self.position);
            true
        } else {
            false
        }
    }
}
