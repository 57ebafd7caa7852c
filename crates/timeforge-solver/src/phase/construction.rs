//! Construction heuristic phase.

use tracing::debug;

use crate::construction::GreedyConstructor;
use crate::scope::{PhaseScope, SolverScope};

use super::Phase;

/// Replaces the working timetable with a fresh greedy build.
#[derive(Debug, Clone, Default)]
pub struct ConstructionPhase {
    constructor: GreedyConstructor,
}

impl ConstructionPhase {
    pub fn new(constructor: GreedyConstructor) -> Self {
        Self { constructor }
    }

    pub fn constructor(&self) -> &GreedyConstructor {
        &self.constructor
    }
}

impl Phase for ConstructionPhase {
    fn solve(&mut self, solver_scope: &mut SolverScope<'_>) {
        let mut phase_scope =
            PhaseScope::new(solver_scope, self.phase_type_name(), "Construction Heuristic");

        let instance = phase_scope.instance();
        let timetable = self
            .constructor
            .build(instance, phase_scope.solver_scope_mut().rng());
        let evaluation = phase_scope.evaluate(&timetable);
        phase_scope.increment_step_count();

        debug!(
            event = "construction_built",
            complete = timetable.is_complete(instance),
            hard = evaluation.hard_violations,
            soft = evaluation.soft_cost,
        );

        phase_scope.update_best(&timetable, evaluation);
        phase_scope.solver_scope_mut().set_working_timetable(timetable);
        phase_scope.finish();
    }

    fn phase_type_name(&self) -> &'static str {
        "ConstructionHeuristic"
    }
}
