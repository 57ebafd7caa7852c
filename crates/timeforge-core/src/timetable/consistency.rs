//! Audit of derived indexes against the allocation list.

use super::Timetable;
use crate::error::InconsistencyError;
use crate::instance::Instance;

impl Timetable {
    /// Replays the allocation list into a fresh timetable and compares every
    /// derived index with the one maintained incrementally.
    ///
    /// Also checks that an event carrying an unallocated marker accounts for
    /// its full duration.
    pub fn check_consistency(&self, instance: &Instance) -> Result<(), InconsistencyError> {
        let mut replayed = Timetable::new(instance);
        for a in &self.allocations {
            match a.slot.slot() {
                Some(slot) => {
                    // Stored durations are 1 or 2.
                    replayed.place(instance, a.event, slot, a.duration as u8);
                }
                None => replayed.record_unallocated(a.event, a.duration),
            }
        }

        for (event, info) in instance.event_ids().zip(instance.events()) {
            let name = || info.id.clone();
            let actual: u32 = self.event_allocations[event.0]
                .iter()
                .filter(|a| a.is_placed())
                .map(|a| a.duration)
                .sum();
            if self.allocated[event.0] != actual || replayed.allocated[event.0] != actual {
                return Err(InconsistencyError::AllocatedDuration {
                    event: name(),
                    indexed: self.allocated[event.0],
                    actual,
                });
            }
            if self.event_allocations[event.0] != replayed.event_allocations[event.0] {
                return Err(InconsistencyError::EventIndex {
                    event: name(),
                    index: "event allocations",
                });
            }
            if self.event_day_counts[event.0] != replayed.event_day_counts[event.0] {
                return Err(InconsistencyError::EventIndex {
                    event: name(),
                    index: "day counts",
                });
            }
            if self.double_lessons[event.0] != replayed.double_lessons[event.0] {
                return Err(InconsistencyError::EventIndex {
                    event: name(),
                    index: "double lessons",
                });
            }
            let unallocated = self.unallocated_duration(event);
            if unallocated > 0 && actual + unallocated != info.duration {
                return Err(InconsistencyError::DurationAccounting {
                    event: name(),
                    allocated: actual,
                    unallocated,
                    total: info.duration,
                });
            }
        }

        for (slot, info) in instance.slot_ids().zip(instance.slots()) {
            if self.teacher_occupation[slot.0] != replayed.teacher_occupation[slot.0] {
                return Err(InconsistencyError::Occupancy {
                    slot: info.id.clone(),
                    resource: "teacher",
                });
            }
            if self.class_occupation[slot.0] != replayed.class_occupation[slot.0] {
                return Err(InconsistencyError::Occupancy {
                    slot: info.id.clone(),
                    resource: "class",
                });
            }
        }

        for (i, teacher) in instance.teachers().iter().enumerate() {
            if self.teacher_days[i] != replayed.teacher_days[i] {
                return Err(InconsistencyError::DaySet {
                    resource: "teacher",
                    id: teacher.id.clone(),
                });
            }
        }
        for (i, class) in instance.classes().iter().enumerate() {
            if self.class_days[i] != replayed.class_days[i] {
                return Err(InconsistencyError::DaySet {
                    resource: "class",
                    id: class.id.clone(),
                });
            }
        }
        Ok(())
    }
}
