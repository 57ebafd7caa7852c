//! The read-only problem instance.
//!
//! An [`Instance`] is produced once by [`InstanceBuilder::build`] and then
//! shared immutably by every search component. All constraint lookup tables
//! (forbidden times, working-day caps, split ranges, idle-time weights) are
//! resolved at build time and stored as fields.

mod builder;
mod constraint;
mod ids;

#[cfg(test)]
mod tests;

use std::collections::{HashMap, HashSet};

pub use builder::{EventSpec, InstanceBuilder, ResourceSpec, TimeSlotSpec};
pub use constraint::{ConstraintKind, ConstraintRecord, ConstraintRule};
pub use ids::{ClassId, CourseId, Day, EventId, SlotId, TeacherId, DAYS_PER_WEEK};

/// One atomic teaching period of the week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlot {
    /// Natural identifier.
    pub id: String,
    /// Day of the week, `0..=4`.
    pub day: Day,
    /// Position within the day; consecutive periods differ by one.
    pub order: u32,
    /// The adjacent slot completing a two-period block started here.
    pub paired: Option<SlotId>,
    /// Longest block that may start at this slot (1 or 2).
    pub max_duration: u8,
}

impl TimeSlot {
    /// Returns the second slot of a double period started here, if legal.
    #[inline]
    pub fn double_partner(&self) -> Option<SlotId> {
        if self.max_duration >= 2 {
            self.paired
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Teacher {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassGroup {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: String,
}

/// A weekly teaching assignment to be placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: String,
    pub course: CourseId,
    pub teacher: TeacherId,
    pub class: ClassId,
    /// Periods per week.
    pub duration: u32,
}

/// A resolved upper bound with the weight of the record that set it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedLimit {
    pub max: u32,
    pub weight: i64,
}

/// A resolved double-lesson range for a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitRange {
    pub min: u32,
    pub max: u32,
    pub weight: i64,
}

impl SplitRange {
    /// Distance of `doubles` from the range, zero when inside it.
    pub fn deviation(&self, doubles: u32) -> u32 {
        if doubles < self.min {
            self.min - doubles
        } else if doubles > self.max {
            doubles - self.max
        } else {
            0
        }
    }

    pub fn contains(&self, doubles: u32) -> bool {
        self.deviation(doubles) == 0
    }
}

/// Immutable, fully-resolved timetabling problem.
#[derive(Debug, Clone)]
pub struct Instance {
    pub(crate) slots: Vec<TimeSlot>,
    pub(crate) teachers: Vec<Teacher>,
    pub(crate) classes: Vec<ClassGroup>,
    pub(crate) courses: Vec<Course>,
    pub(crate) events: Vec<Event>,
    pub(crate) constraints: Vec<ConstraintRecord>,

    pub(crate) slot_index: HashMap<String, SlotId>,
    pub(crate) teacher_index: HashMap<String, TeacherId>,
    pub(crate) class_index: HashMap<String, ClassId>,
    pub(crate) course_index: HashMap<String, CourseId>,
    pub(crate) event_index: HashMap<String, EventId>,

    pub(crate) forbidden: Vec<HashSet<SlotId>>,
    pub(crate) max_days: Vec<Option<WeightedLimit>>,
    pub(crate) split_ranges: Vec<Option<SplitRange>>,
    pub(crate) idle_weights: Vec<Option<i64>>,
}

impl Instance {
    pub fn builder() -> InstanceBuilder {
        InstanceBuilder::new()
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn teachers(&self) -> &[Teacher] {
        &self.teachers
    }

    pub fn classes(&self) -> &[ClassGroup] {
        &self.classes
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn constraints(&self) -> &[ConstraintRecord] {
        &self.constraints
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn slot(&self, id: SlotId) -> Option<&TimeSlot> {
        self.slots.get(id.0)
    }

    pub fn event(&self, id: EventId) -> Option<&Event> {
        self.events.get(id.0)
    }

    pub fn teacher(&self, id: TeacherId) -> Option<&Teacher> {
        self.teachers.get(id.0)
    }

    pub fn class(&self, id: ClassId) -> Option<&ClassGroup> {
        self.classes.get(id.0)
    }

    pub fn course(&self, id: CourseId) -> Option<&Course> {
        self.courses.get(id.0)
    }

    /// Iterates over all slot ids in instance order.
    pub fn slot_ids(&self) -> impl Iterator<Item = SlotId> + '_ {
        (0..self.slots.len()).map(SlotId)
    }

    /// Iterates over all event ids in instance order.
    pub fn event_ids(&self) -> impl Iterator<Item = EventId> + '_ {
        (0..self.events.len()).map(EventId)
    }

    pub fn slot_by_name(&self, id: &str) -> Option<SlotId> {
        self.slot_index.get(id).copied()
    }

    pub fn teacher_by_name(&self, id: &str) -> Option<TeacherId> {
        self.teacher_index.get(id).copied()
    }

    pub fn class_by_name(&self, id: &str) -> Option<ClassId> {
        self.class_index.get(id).copied()
    }

    pub fn course_by_name(&self, id: &str) -> Option<CourseId> {
        self.course_index.get(id).copied()
    }

    pub fn event_by_name(&self, id: &str) -> Option<EventId> {
        self.event_index.get(id).copied()
    }

    /// Returns true if `teacher` may not teach at `slot`.
    #[inline]
    pub fn is_forbidden(&self, teacher: TeacherId, slot: SlotId) -> bool {
        self.forbidden
            .get(teacher.0)
            .is_some_and(|set| set.contains(&slot))
    }

    /// Returns the forbidden slot set of a teacher.
    pub fn forbidden_slots(&self, teacher: TeacherId) -> Option<&HashSet<SlotId>> {
        self.forbidden.get(teacher.0)
    }

    /// Working-day cap configured for a teacher.
    pub fn max_days(&self, teacher: TeacherId) -> Option<WeightedLimit> {
        self.max_days.get(teacher.0).copied().flatten()
    }

    /// Double-lesson range configured for a course.
    pub fn split_range(&self, course: CourseId) -> Option<SplitRange> {
        self.split_ranges.get(course.0).copied().flatten()
    }

    /// Weight of the idle-time constraint covering a teacher, if any.
    pub fn idle_weight(&self, teacher: TeacherId) -> Option<i64> {
        self.idle_weights.get(teacher.0).copied().flatten()
    }

    /// Slots covered by a block of `duration` starting at `slot`.
    ///
    /// Returns `None` when a double cannot start at `slot`.
    pub fn covered_slots(&self, slot: SlotId, duration: u8) -> Option<[Option<SlotId>; 2]> {
        let info = self.slot(slot)?;
        match duration {
            1 => Some([Some(slot), None]),
            2 => info.double_partner().map(|next| [Some(slot), Some(next)]),
            _ => None,
        }
    }
}
