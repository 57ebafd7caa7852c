//! Error types for Timeforge

use thiserror::Error;

/// Main error type for Timeforge operations
#[derive(Debug, Error)]
pub enum TimeforgeError {
    /// Error in solver configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The problem instance is malformed
    #[error("Instance error: {0}")]
    Instance(#[from] InstanceError),

    /// The timetable indexes disagree with its allocation list
    #[error("Inconsistent timetable: {0}")]
    Inconsistent(#[from] InconsistencyError),

    /// An identifier does not exist in the instance
    #[error("Unknown identifier: {0}")]
    UnknownIdentifier(String),
}

/// Structural problems found while building an [`Instance`](crate::Instance).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstanceError {
    #[error("duplicate {kind} id `{id}`")]
    DuplicateId { kind: &'static str, id: String },

    #[error("{owner} references unknown {kind} `{id}`")]
    UnknownReference {
        owner: String,
        kind: &'static str,
        id: String,
    },

    #[error("time slot `{slot}` has day {day}, expected 0..=4")]
    DayOutOfRange { slot: String, day: u8 },

    #[error("time slot `{slot}` has max duration {duration}, expected 1 or 2")]
    InvalidMaxDuration { slot: String, duration: u8 },

    #[error("time slot `{slot}` is paired with `{paired}` on a different day")]
    PairAcrossDays { slot: String, paired: String },

    #[error("event `{event}` has zero duration")]
    ZeroDuration { event: String },
}

/// A derived index of a [`Timetable`](crate::Timetable) that disagrees with
/// its allocation list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InconsistencyError {
    #[error("event `{event}`: allocated duration index is {indexed}, allocations sum to {actual}")]
    AllocatedDuration {
        event: String,
        indexed: u32,
        actual: u32,
    },

    #[error("event `{event}`: allocated {allocated} + unallocated {unallocated} != total {total}")]
    DurationAccounting {
        event: String,
        allocated: u32,
        unallocated: u32,
        total: u32,
    },

    #[error("slot `{slot}`: {resource} occupancy does not match allocations")]
    Occupancy { slot: String, resource: &'static str },

    #[error("{resource} `{id}`: day set does not match allocations")]
    DaySet { resource: &'static str, id: String },

    #[error("event `{event}`: {index} index does not match allocations")]
    EventIndex { event: String, index: &'static str },
}

/// Result type alias for Timeforge operations
pub type Result<T> = std::result::Result<T, TimeforgeError>;
