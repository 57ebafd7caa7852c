//! Timeforge Solver Engine
//!
//! This crate provides the search components:
//! - Randomized greedy construction and bounded repair
//! - Ruin selectors for destroy/rebuild search
//! - Iterated Greedy with simulated annealing acceptance
//! - Artificial Bee Colony, optionally parallel over rayon
//! - Solver scopes, statistics and configuration wiring

pub mod builder;
pub mod construction;
pub mod heuristic;
pub mod phase;
pub mod scope;
pub mod solver;
pub mod statistics;

pub use builder::{AcceptorBuilder, PhaseBuilder};
pub use construction::{GreedyConstructor, PlacementOutcome, RepairPolicy};
pub use heuristic::{ruin, CostBiasedSelector, RandomSelector, RuinSelection, RuinSelector};
pub use phase::{
    BeeColonyPhase, ConstructionPhase, IteratedGreedyPhase, Phase, SimulatedAnnealingAcceptor,
};
pub use scope::{PhaseScope, SolverScope};
pub use solver::{SolveResult, Solver};
pub use statistics::{PhaseStatistics, ScoreImprovement, SolverStatistics, StatisticsCollector};
