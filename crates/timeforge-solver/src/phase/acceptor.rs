//! Simulated annealing acceptor.

use rand::Rng;

/// Accepts worse candidates with probability `exp(-(cost - best) / T)`.
///
/// The delta is measured against the best cost seen so far, not against the
/// current timetable. The temperature decays geometrically after every step.
///
/// # Example
///
/// ```
/// use timeforge_solver::SimulatedAnnealingAcceptor;
///
/// let acceptor = SimulatedAnnealingAcceptor::new(100.0, 0.9);
/// assert!((acceptor.acceptance_probability(1100, 1000) - (-1.0f64).exp()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedAnnealingAcceptor {
    starting_temperature: f64,
    current_temperature: f64,
    /// Multiplier applied at the end of every step.
    cooling_rate: f64,
}

impl SimulatedAnnealingAcceptor {
    pub fn new(starting_temperature: f64, cooling_rate: f64) -> Self {
        Self {
            starting_temperature,
            current_temperature: starting_temperature,
            cooling_rate,
        }
    }

    pub fn temperature(&self) -> f64 {
        self.current_temperature
    }

    pub fn phase_started(&mut self) {
        self.current_temperature = self.starting_temperature;
    }

    pub fn step_ended(&mut self) {
        self.current_temperature *= self.cooling_rate;
    }

    /// Probability of accepting `cost` when the best known is `best_cost`.
    pub fn acceptance_probability(&self, cost: i64, best_cost: i64) -> f64 {
        if cost < best_cost {
            return 1.0;
        }
        if self.current_temperature <= 0.0 {
            return 0.0;
        }
        let delta = (cost - best_cost) as f64;
        (-delta / self.current_temperature).exp()
    }

    /// Improvements are always accepted; anything else is drawn against
    /// [`acceptance_probability`](Self::acceptance_probability).
    pub fn is_accepted<R: Rng + ?Sized>(&self, cost: i64, best_cost: i64, rng: &mut R) -> bool {
        if cost < best_cost {
            return true;
        }
        rng.random::<f64>() < self.acceptance_probability(cost, best_cost)
    }
}

impl Default for SimulatedAnnealingAcceptor {
    fn default() -> Self {
        Self::new(1000.0, 0.95)
    }
}
