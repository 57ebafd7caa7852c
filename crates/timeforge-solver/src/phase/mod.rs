//! Solver phases.
//!
//! - [`ConstructionPhase`]: builds the initial timetable
//! - [`IteratedGreedyPhase`]: cost-biased destroy/rebuild with annealing acceptance
//! - [`BeeColonyPhase`]: artificial bee colony over a population of timetables

mod acceptor;
mod bee_colony;
mod construction;
mod iterated_greedy;

#[cfg(test)]
mod tests;

use std::fmt::Debug;

use timeforge_core::Timetable;
use timeforge_scoring::Evaluation;

use crate::construction::GreedyConstructor;
use crate::scope::{PhaseScope, SolverScope};

pub use acceptor::SimulatedAnnealingAcceptor;
pub use bee_colony::BeeColonyPhase;
pub use construction::ConstructionPhase;
pub use iterated_greedy::IteratedGreedyPhase;

/// A phase of the solving process.
///
/// Phases run in sequence. Each reads the working timetable left by the
/// previous phase, and records improvements through the solver scope.
pub trait Phase: Send + Debug {
    /// Executes this phase.
    fn solve(&mut self, solver_scope: &mut SolverScope<'_>);

    /// Returns the name of this phase type.
    fn phase_type_name(&self) -> &'static str;
}

impl Phase for Box<dyn Phase> {
    fn solve(&mut self, solver_scope: &mut SolverScope<'_>) {
        (**self).solve(solver_scope)
    }

    fn phase_type_name(&self) -> &'static str {
        (**self).phase_type_name()
    }
}

/// Takes the working timetable, building one if no phase has run yet.
///
/// Blacklists left by an earlier phase are cleared, since they only hold for
/// the repair episode that recorded them. The returned timetable is also
/// offered as a new best.
pub(crate) fn starting_timetable(
    phase_scope: &mut PhaseScope<'_, '_>,
    max_attempts: u32,
) -> (Timetable, Evaluation) {
    let solver_scope = phase_scope.solver_scope_mut();
    let timetable = match solver_scope.take_working_timetable() {
        Some(mut timetable) => {
            timetable.clear_blacklists();
            timetable
        }
        None => {
            let instance = solver_scope.instance();
            GreedyConstructor::new(max_attempts).build(instance, solver_scope.rng())
        }
    };
    let evaluation = solver_scope.evaluate(&timetable);
    solver_scope.update_best(&timetable, evaluation);
    (timetable, evaluation)
}
