//! TimetableScore - hard violations and soft cost of a timetable

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Neg, Sub};

use thiserror::Error;

/// Scalar weight of one hard violation relative to one unit of soft cost.
pub const HARD_WEIGHT: i64 = 1000;

/// Error returned when a score string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid score `{input}`: {reason}")]
pub struct ScoreParseError {
    pub input: String,
    pub reason: &'static str,
}

/// A score with separate hard and soft levels, stored as penalties.
///
/// Both levels are zero or negative for any evaluated timetable: `-2hard`
/// means two hard violations. Scores are ordered by their scalar cost
/// (`hard × 1000 + soft`), so a higher score is a better timetable.
///
/// # Examples
///
/// ```
/// use timeforge_core::TimetableScore;
///
/// let infeasible = TimetableScore::of(-1, 0);
/// let feasible = TimetableScore::of(0, -200);
///
/// assert!(feasible > infeasible);
/// assert_eq!(infeasible.cost(), 1000);
/// assert_eq!(feasible.to_string(), "0hard/-200soft");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimetableScore {
    hard: i64,
    soft: i64,
}

impl TimetableScore {
    /// The zero score.
    pub const ZERO: TimetableScore = TimetableScore { hard: 0, soft: 0 };

    /// Creates a new score from hard and soft levels.
    #[inline]
    pub const fn of(hard: i64, soft: i64) -> Self {
        TimetableScore { hard, soft }
    }

    /// Creates a score from violation counts (both non-negative).
    #[inline]
    pub const fn of_penalties(hard_violations: i64, soft_cost: i64) -> Self {
        TimetableScore {
            hard: -hard_violations,
            soft: -soft_cost,
        }
    }

    #[inline]
    pub const fn hard(&self) -> i64 {
        self.hard
    }

    #[inline]
    pub const fn soft(&self) -> i64 {
        self.soft
    }

    /// Returns true when no hard level is broken.
    #[inline]
    pub const fn is_feasible(&self) -> bool {
        self.hard >= 0
    }

    /// Returns the scalar cost minimized by search: `violations × 1000 + soft cost`.
    #[inline]
    pub const fn cost(&self) -> i64 {
        -(self.hard * HARD_WEIGHT + self.soft)
    }

    /// Parses a score in the `"-1hard/-20soft"` format.
    pub fn parse(s: &str) -> Result<Self, ScoreParseError> {
        let err = |reason| ScoreParseError {
            input: s.to_string(),
            reason,
        };
        let (hard, soft) = s.trim().split_once('/').ok_or_else(|| err("missing '/'"))?;
        let hard = hard
            .strip_suffix("hard")
            .ok_or_else(|| err("missing 'hard' suffix"))?
            .parse::<i64>()
            .map_err(|_| err("hard level is not an integer"))?;
        let soft = soft
            .strip_suffix("soft")
            .ok_or_else(|| err("missing 'soft' suffix"))?
            .parse::<i64>()
            .map_err(|_| err("soft level is not an integer"))?;
        Ok(TimetableScore::of(hard, soft))
    }
}

impl Ord for TimetableScore {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost()
            .cmp(&self.cost())
            .then_with(|| self.hard.cmp(&other.hard))
    }
}

impl PartialOrd for TimetableScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add for TimetableScore {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        TimetableScore::of(self.hard + rhs.hard, self.soft + rhs.soft)
    }
}

impl Sub for TimetableScore {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        TimetableScore::of(self.hard - rhs.hard, self.soft - rhs.soft)
    }
}

impl Neg for TimetableScore {
    type Output = Self;

    fn neg(self) -> Self {
        TimetableScore::of(-self.hard, -self.soft)
    }
}

impl fmt::Debug for TimetableScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimetableScore({}, {})", self.hard, self.soft)
    }
}

impl fmt::Display for TimetableScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}hard/{}soft", self.hard, self.soft)
    }
}
