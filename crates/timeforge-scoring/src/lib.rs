//! Constraint evaluation for Timeforge.
//!
//! This crate provides:
//! - [`Evaluator`]: full recomputation of hard violations and soft cost
//! - [`ScoreExplanation`]: per-constraint breakdown with individual matches
//!
//! Evaluation is never incremental; every call replays the timetable's
//! allocation list against the instance's lookup tables.

pub mod analysis;
pub mod evaluator;


pub use analysis::{ConstraintAnalysis, ConstraintMatch, ScoreExplanation};
pub use evaluator::{Evaluation, Evaluator};
