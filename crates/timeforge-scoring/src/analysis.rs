//! Score analysis types for explaining an evaluation.
//!
//! A [`ScoreExplanation`] lists one [`ConstraintAnalysis`] per constraint
//! kind, always in evaluation order, each carrying the individual matches
//! that produced its penalty.

use std::fmt;

use timeforge_core::{ConstraintKind, TimetableScore};

/// A single constraint breach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintMatch {
    /// Penalty contributed: 1 for hard kinds, the record weight for soft kinds.
    pub penalty: i64,
    /// Human-readable description naming the entities involved.
    pub description: String,
}

/// Per-constraint breakdown in a score explanation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintAnalysis {
    pub kind: ConstraintKind,
    pub is_hard: bool,
    /// Sum of match penalties.
    pub penalty: i64,
    pub matches: Vec<ConstraintMatch>,
}

impl ConstraintAnalysis {
    pub fn new(kind: ConstraintKind) -> Self {
        Self {
            kind,
            is_hard: kind.is_hard(),
            penalty: 0,
            matches: Vec::new(),
        }
    }

    /// Returns the number of matches.
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// Returns the constraint name.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub(crate) fn add(&mut self, penalty: i64, description: String) {
        self.penalty += penalty;
        self.matches.push(ConstraintMatch {
            penalty,
            description,
        });
    }
}

/// Complete score explanation with per-constraint breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreExplanation {
    /// The total score.
    pub score: TimetableScore,
    /// One entry per constraint kind, in evaluation order.
    pub constraint_analyses: Vec<ConstraintAnalysis>,
}

impl ScoreExplanation {
    /// Returns the total match count across all constraints.
    pub fn total_match_count(&self) -> usize {
        self.constraint_analyses.iter().map(|a| a.match_count()).sum()
    }

    /// Returns constraints with at least one match.
    pub fn violated_constraints(&self) -> Vec<&ConstraintAnalysis> {
        self.constraint_analyses
            .iter()
            .filter(|a| !a.matches.is_empty())
            .collect()
    }

    /// Looks up the analysis of one constraint kind.
    pub fn analysis(&self, kind: ConstraintKind) -> Option<&ConstraintAnalysis> {
        self.constraint_analyses.iter().find(|a| a.kind == kind)
    }

    /// Returns all matches across all constraints.
    pub fn all_matches(&self) -> Vec<&ConstraintMatch> {
        self.constraint_analyses
            .iter()
            .flat_map(|a| &a.matches)
            .collect()
    }
}

impl fmt::Display for ScoreExplanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Score: {}", self.score)?;
        for analysis in &self.constraint_analyses {
            let level = if analysis.is_hard { "hard" } else { "soft" };
            writeln!(
                f,
                "  {:<34} {:>4} matches  -{}{}",
                analysis.name(),
                analysis.match_count(),
                analysis.penalty,
                level
            )?;
        }
        Ok(())
    }
}
