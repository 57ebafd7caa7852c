//! Timeforge - High-School Timetabling in Rust
//!
//! Build an [`Instance`], pick phases in a [`SolverConfig`] (or load one from
//! `solver.toml`), and call [`run_solver`].
//!
//! # Example
//!
//! ```rust
//! use timeforge::prelude::*;
//!
//! let instance = Instance::builder()
//!     .slot("Mo_1", 0, 1)
//!     .slot("Tu_1", 1, 1)
//!     .teacher("T1", "Ada")
//!     .class("C1", "1A")
//!     .event("E1", "Math", "T1", "C1", 2)
//!     .build()
//!     .unwrap();
//!
//! let config = SolverConfig::new().with_random_seed(1);
//! let result = run_solver(&instance, &config).unwrap();
//! assert!(result.is_feasible());
//! assert_eq!(result.evaluation.score(), TimetableScore::ZERO);
//! ```

// Problem model and state
pub use timeforge_core::{
    Allocation, AllocationRecord, ClassGroup, ClassId, ConstraintKind, ConstraintRecord,
    ConstraintRule, Course, CourseId, Day, Event, EventId, InconsistencyError, Instance,
    InstanceBuilder, InstanceError, SlotId, SlotRef, Teacher, TeacherId, TimeSlot, TimeforgeError,
    Timetable, TimetableScore, DAYS_PER_WEEK, HARD_WEIGHT,
};

// Scoring
pub use timeforge_scoring::{
    ConstraintAnalysis, ConstraintMatch, Evaluation, Evaluator, ScoreExplanation,
};

// Configuration
pub use timeforge_config::{
    BeeColonyConfig, ConfigError, ConstructionHeuristicConfig, IteratedGreedyConfig, PhaseConfig,
    SimulatedAnnealingConfig, SolverConfig,
};

// Search
pub use timeforge_solver::{
    BeeColonyPhase, ConstructionPhase, GreedyConstructor, IteratedGreedyPhase, Phase,
    RepairPolicy, SimulatedAnnealingAcceptor, SolveResult, Solver, SolverStatistics,
};

#[cfg(feature = "console")]
pub use timeforge_console as console;

mod solver;
pub use solver::{run_solver, solve, CONFIG_FILE};

pub mod prelude {
    pub use super::{run_solver, solve};
    pub use super::{ConstraintRecord, Instance, InstanceBuilder, Timetable, TimetableScore};
    pub use super::{Evaluation, Evaluator};
    pub use super::{PhaseConfig, SolveResult, Solver, SolverConfig};
}
