//! Scope hierarchy for solver execution.
//!
//! - [`SolverScope`]: instance, working and best timetable, master generator
//! - [`PhaseScope`]: per-phase counters and lifecycle logging

mod phase;
mod solver;

pub use phase::PhaseScope;
pub use solver::SolverScope;
