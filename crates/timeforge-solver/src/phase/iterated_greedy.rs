//! Iterated Greedy phase.

use tracing::{debug, trace};

use crate::construction::{sort_by_duration, GreedyConstructor};
use crate::heuristic::{ruin, CostBiasedSelector, RuinSelector};
use crate::scope::{PhaseScope, SolverScope};

use super::{starting_timetable, Phase, SimulatedAnnealingAcceptor};

/// Destroy/rebuild local search over a single current timetable.
///
/// Each iteration removes the costliest events of a copy of the current
/// timetable, greedily re-places them with blacklist recording, and decides
/// acceptance with a [`SimulatedAnnealingAcceptor`]. Every `restart_interval`
/// iterations the current timetable is replaced by a fresh greedy build;
/// the best timetable is kept in the solver scope throughout.
#[derive(Debug, Clone)]
pub struct IteratedGreedyPhase {
    iterations: u32,
    destruction_percentage: f64,
    restart_interval: u32,
    restart_attempts: u32,
    constructor: GreedyConstructor,
    acceptor: SimulatedAnnealingAcceptor,
}

impl IteratedGreedyPhase {
    pub fn new(iterations: u32, destruction_percentage: f64) -> Self {
        Self {
            iterations,
            destruction_percentage,
            restart_interval: 50,
            restart_attempts: 50,
            constructor: GreedyConstructor::default(),
            acceptor: SimulatedAnnealingAcceptor::default(),
        }
    }

    pub fn with_restart(mut self, interval: u32, attempts: u32) -> Self {
        self.restart_interval = interval;
        self.restart_attempts = attempts;
        self
    }

    /// Constructor for the initial build when no earlier phase left a
    /// working timetable. Restarts use `restart_attempts` instead.
    pub fn with_constructor(mut self, constructor: GreedyConstructor) -> Self {
        self.constructor = constructor;
        self
    }

    pub fn with_acceptor(mut self, acceptor: SimulatedAnnealingAcceptor) -> Self {
        self.acceptor = acceptor;
        self
    }

    pub fn constructor(&self) -> GreedyConstructor {
        self.constructor
    }

    pub fn restart_attempts(&self) -> u32 {
        self.restart_attempts
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn destruction_percentage(&self) -> f64 {
        self.destruction_percentage
    }
}

impl Default for IteratedGreedyPhase {
    fn default() -> Self {
        Self::new(200, 0.4)
    }
}

/// Events destroyed per iteration: `floor(events × percentage)`, at least one
/// when the percentage is positive.
pub(crate) fn destruction_count(event_count: usize, percentage: f64) -> usize {
    if percentage <= 0.0 || event_count == 0 {
        return 0;
    }
    ((event_count as f64 * percentage).floor() as usize).clamp(1, event_count)
}

impl Phase for IteratedGreedyPhase {
    fn solve(&mut self, solver_scope: &mut SolverScope<'_>) {
        let mut phase_scope = PhaseScope::new(solver_scope, self.phase_type_name(), "Iterated Greedy");
        let instance = phase_scope.instance();
        let restarts = GreedyConstructor::new(self.restart_attempts);
        let to_destroy = destruction_count(instance.event_count(), self.destruction_percentage);

        let (mut current, mut current_evaluation) =
            starting_timetable(&mut phase_scope, self.constructor.max_attempts());
        self.acceptor.phase_started();

        for iteration in 1..=self.iterations {
            let mut candidate = current.clone();
            candidate.clear_blacklists();

            let rng = phase_scope.solver_scope_mut().rng();
            let selected = CostBiasedSelector.select(instance, &candidate, to_destroy, rng);
            let removed = ruin(instance, &mut candidate, &selected);

            let mut order = selected.to_vec();
            sort_by_duration(instance, &mut order);
            for &event in &order {
                restarts.allocate(instance, &mut candidate, event, true, rng);
            }

            let evaluation = phase_scope.evaluate(&candidate);
            let cost = evaluation.cost();
            let best_cost = phase_scope.best_cost().unwrap_or(i64::MAX);
            let accepted = self.acceptor.is_accepted(
                cost,
                best_cost,
                phase_scope.solver_scope_mut().rng(),
            );
            phase_scope.record_candidate(accepted);

            trace!(
                event = "step",
                step = iteration,
                destroyed = selected.len(),
                removed,
                cost,
                accepted,
            );

            if accepted {
                current = candidate;
                current_evaluation = evaluation;
                if cost < best_cost && phase_scope.update_best(&current, current_evaluation) {
                    debug!(
                        event = "new_best",
                        step = iteration,
                        score = %current_evaluation.score(),
                    );
                }
            }

            self.acceptor.step_ended();
            phase_scope.increment_step_count();

            if iteration % 10 == 0 {
                debug!(
                    event = "progress",
                    steps = iteration,
                    temperature = self.acceptor.temperature(),
                    current = %current_evaluation.score(),
                    score = %phase_scope.best_score().unwrap_or(current_evaluation.score()),
                );
            }

            if self.restart_interval > 0
                && iteration % self.restart_interval == 0
                && iteration < self.iterations
            {
                current = restarts.build(instance, phase_scope.solver_scope_mut().rng());
                current_evaluation = phase_scope.evaluate(&current);
                phase_scope.record_restart();
                debug!(
                    event = "restart",
                    step = iteration,
                    score = %current_evaluation.score(),
                );
            }
        }

        if let Some(best) = phase_scope.solver_scope().best_timetable().cloned() {
            current = best;
        }
        current.clear_blacklists();
        phase_scope.solver_scope_mut().set_working_timetable(current);
        phase_scope.finish();
    }

    fn phase_type_name(&self) -> &'static str {
        "IteratedGreedy"
    }
}
