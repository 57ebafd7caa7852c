//! Constraint records as supplied by the instance loader.
//!
//! Records reference entities by natural id. [`InstanceBuilder`](super::InstanceBuilder)
//! resolves them into the per-teacher and per-course lookup tables that the
//! evaluator and constructor read.

/// The constraint families the core understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstraintKind {
    AssignTime,
    AvoidClashes,
    AvoidUnavailableTimes,
    SpreadEvents,
    DistributeSplitEvents,
    ClusterBusyTimes,
    LimitIdleTimes,
}

impl ConstraintKind {
    /// Every kind, in evaluation order.
    pub const ALL: [ConstraintKind; 7] = [
        ConstraintKind::AssignTime,
        ConstraintKind::AvoidClashes,
        ConstraintKind::AvoidUnavailableTimes,
        ConstraintKind::SpreadEvents,
        ConstraintKind::DistributeSplitEvents,
        ConstraintKind::ClusterBusyTimes,
        ConstraintKind::LimitIdleTimes,
    ];

    /// Returns the constraint name used in reports.
    pub const fn name(self) -> &'static str {
        match self {
            ConstraintKind::AssignTime => "AssignTimeConstraint",
            ConstraintKind::AvoidClashes => "AvoidClashesConstraint",
            ConstraintKind::AvoidUnavailableTimes => "AvoidUnavailableTimesConstraint",
            ConstraintKind::SpreadEvents => "SpreadEventsConstraint",
            ConstraintKind::DistributeSplitEvents => "DistributeSplitEventsConstraint",
            ConstraintKind::ClusterBusyTimes => "ClusterBusyTimesConstraint",
            ConstraintKind::LimitIdleTimes => "LimitIdleTimesConstraint",
        }
    }

    /// Hard kinds count violations; soft kinds accumulate weights.
    pub const fn is_hard(self) -> bool {
        matches!(
            self,
            ConstraintKind::AssignTime
                | ConstraintKind::AvoidClashes
                | ConstraintKind::AvoidUnavailableTimes
                | ConstraintKind::SpreadEvents
        )
    }
}

/// A typed constraint record.
///
/// # Example
///
/// ```
/// use timeforge_core::{ConstraintKind, ConstraintRecord};
///
/// let record = ConstraintRecord::cluster_busy_times("MaxDays", ["T1"], 3).with_weight(5);
/// assert_eq!(record.kind(), ConstraintKind::ClusterBusyTimes);
/// assert_eq!(record.weight, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstraintRecord {
    pub name: String,
    pub required: bool,
    pub weight: i64,
    pub rule: ConstraintRule,
}

/// Parameters specific to each constraint family.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum ConstraintRule {
    /// Number of double-period lessons per event of the listed courses.
    SplitDistribution {
        courses: Vec<String>,
        min_doubles: u32,
        max_doubles: u32,
    },
    /// Maximum number of working days for the listed teachers.
    ClusterBusyTimes { teachers: Vec<String>, max_days: u32 },
    /// Slots the listed teachers cannot teach in.
    AvoidUnavailableTimes {
        teachers: Vec<String>,
        slots: Vec<String>,
    },
    /// Penalize idle gaps in a teacher's day. Empty list means every teacher.
    LimitIdleTimes { teachers: Vec<String> },
}

fn owned<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

impl ConstraintRecord {
    fn new(name: impl Into<String>, rule: ConstraintRule) -> Self {
        Self {
            name: name.into(),
            required: false,
            weight: 1,
            rule,
        }
    }

    pub fn split_distribution<I, S>(
        name: impl Into<String>,
        courses: I,
        min_doubles: u32,
        max_doubles: u32,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            ConstraintRule::SplitDistribution {
                courses: owned(courses),
                min_doubles,
                max_doubles,
            },
        )
    }

    pub fn cluster_busy_times<I, S>(name: impl Into<String>, teachers: I, max_days: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            ConstraintRule::ClusterBusyTimes {
                teachers: owned(teachers),
                max_days,
            },
        )
    }

    pub fn avoid_unavailable_times<I, S, J, T>(name: impl Into<String>, teachers: I, slots: J) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        J: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::new(
            name,
            ConstraintRule::AvoidUnavailableTimes {
                teachers: owned(teachers),
                slots: owned(slots),
            },
        )
    }

    /// Idle-time limit for `teachers`, or for every teacher when empty.
    ///
    /// Teachers not covered by any such record are never penalized for
    /// idle time. An instance without this record has no idle penalty.
    pub fn limit_idle_times<I, S>(name: impl Into<String>, teachers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            ConstraintRule::LimitIdleTimes {
                teachers: owned(teachers),
            },
        )
    }

    /// Sets the penalty applied per violation.
    pub fn with_weight(mut self, weight: i64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn kind(&self) -> ConstraintKind {
        match self.rule {
            ConstraintRule::SplitDistribution { .. } => ConstraintKind::DistributeSplitEvents,
            ConstraintRule::ClusterBusyTimes { .. } => ConstraintKind::ClusterBusyTimes,
            ConstraintRule::AvoidUnavailableTimes { .. } => ConstraintKind::AvoidUnavailableTimes,
            ConstraintRule::LimitIdleTimes { .. } => ConstraintKind::LimitIdleTimes,
        }
    }
}
