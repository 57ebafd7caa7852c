//! Timeforge Core - data model for high-school timetabling
//!
//! This crate provides the fundamental types shared by every other crate:
//! - Typed identifiers and the read-only problem [`Instance`]
//! - Constraint records resolved into lookup tables at build time
//! - The mutable [`Timetable`] state with its derived indexes
//! - [`TimetableScore`] for comparing solutions

pub mod error;
pub mod instance;
pub mod score;
pub mod timetable;

pub use error::{InconsistencyError, InstanceError, TimeforgeError};
pub use instance::{
    ClassGroup, ClassId, ConstraintKind, ConstraintRecord, ConstraintRule, Course, CourseId, Day,
    Event, EventId, Instance, InstanceBuilder, SlotId, SplitRange, Teacher, TeacherId, TimeSlot,
    WeightedLimit, DAYS_PER_WEEK,
};
pub use score::{ScoreParseError, TimetableScore, HARD_WEIGHT};
pub use timetable::{Allocation, AllocationRecord, SlotRef, Timetable};
