//! Score type for representing timetable quality
//!
//! Search components work on a single scalar cost where every hard violation
//! outweighs [`HARD_WEIGHT`] units of soft cost. [`TimetableScore`] keeps both
//! levels visible for reporting while ordering by that scalar.

mod timetable_score;

#[cfg(test)]
mod tests;

pub use timetable_score::{ScoreParseError, TimetableScore, HARD_WEIGHT};
