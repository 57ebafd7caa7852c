//! The mutable timetable state.
//!
//! A [`Timetable`] owns the authoritative allocation list together with every
//! index derived from it. All writes go through [`Timetable::place`],
//! [`Timetable::record_unallocated`] and [`Timetable::remove_event`], which
//! keep the indexes in step with the list. Cloning yields a fully independent
//! copy.

mod allocation;
mod consistency;

#[cfg(test)]
mod tests;

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::Hash;

use tracing::warn;

use crate::instance::{ClassId, Day, EventId, Instance, SlotId, TeacherId};

pub use allocation::{Allocation, AllocationRecord, SlotRef};

/// Candidate solution with incrementally maintained indexes.
///
/// Occupancy is stored as a multiplicity per resource and slot so that
/// removing one of two clashing allocations leaves the other recorded.
#[derive(Debug, Clone)]
pub struct Timetable {
    allocations: Vec<Allocation>,
    event_allocations: Vec<Vec<Allocation>>,
    teacher_days: Vec<BTreeSet<Day>>,
    class_days: Vec<BTreeSet<Day>>,
    event_day_counts: Vec<BTreeMap<Day, u32>>,
    double_lessons: Vec<u32>,
    allocated: Vec<u32>,
    teacher_occupation: Vec<HashMap<TeacherId, u32>>,
    class_occupation: Vec<HashMap<ClassId, u32>>,
    blacklist: Vec<HashSet<SlotId>>,
}

impl Timetable {
    /// Creates an empty timetable sized for `instance`.
    pub fn new(instance: &Instance) -> Self {
        let events = instance.event_count();
        let slots = instance.slot_count();
        Self {
            allocations: Vec::new(),
            event_allocations: vec![Vec::new(); events],
            teacher_days: vec![BTreeSet::new(); instance.teachers().len()],
            class_days: vec![BTreeSet::new(); instance.classes().len()],
            event_day_counts: vec![BTreeMap::new(); events],
            double_lessons: vec![0; events],
            allocated: vec![0; events],
            teacher_occupation: vec![HashMap::new(); slots],
            class_occupation: vec![HashMap::new(); slots],
            blacklist: vec![HashSet::new(); events],
        }
    }

    /// Places a block of `duration` periods of `event` starting at `slot`.
    ///
    /// Resource availability is not checked here; callers decide whether a
    /// clash is acceptable. Returns `false` and leaves the timetable untouched
    /// when the event or slot is unknown or the slot cannot host the block.
    pub fn place(&mut self, instance: &Instance, event: EventId, slot: SlotId, duration: u8) -> bool {
        let Some(info) = instance.event(event) else {
            warn!(%event, "place: unknown event");
            return false;
        };
        let Some(covered) = instance.covered_slots(slot, duration) else {
            warn!(%event, %slot, duration, "place: slot cannot host block");
            return false;
        };
        let day = instance.slots[slot.0].day;

        for s in covered.into_iter().flatten() {
            *self.teacher_occupation[s.0].entry(info.teacher).or_insert(0) += 1;
            *self.class_occupation[s.0].entry(info.class).or_insert(0) += 1;
        }
        self.teacher_days[info.teacher.0].insert(day);
        self.class_days[info.class.0].insert(day);
        *self.event_day_counts[event.0].entry(day).or_insert(0) += 1;
        if duration == 2 {
            self.double_lessons[event.0] += 1;
        }
        self.allocated[event.0] += u32::from(duration);

        let allocation = Allocation {
            event,
            slot: SlotRef::Slot(slot),
            duration: u32::from(duration),
        };
        self.allocations.push(allocation);
        self.event_allocations[event.0].push(allocation);
        true
    }

    /// Records that `duration` periods of `event` could not be placed.
    ///
    /// Any previous marker of the event is replaced. A zero shortfall only
    /// clears the marker.
    pub fn record_unallocated(&mut self, event: EventId, duration: u32) {
        if event.0 >= self.allocated.len() {
            warn!(%event, "record_unallocated: unknown event");
            return;
        }
        self.clear_unallocated(event);
        if duration == 0 {
            return;
        }
        let marker = Allocation {
            event,
            slot: SlotRef::Unallocated,
            duration,
        };
        self.allocations.push(marker);
        self.event_allocations[event.0].push(marker);
    }

    fn clear_unallocated(&mut self, event: EventId) {
        self.allocations
            .retain(|a| !(a.event == event && a.slot.is_unallocated()));
        self.event_allocations[event.0].retain(|a| !a.slot.is_unallocated());
    }

    /// Removes every allocation of `event`, including its unallocated marker.
    ///
    /// Teacher and class day sets are re-derived for the affected days from
    /// the remaining allocations. Returns the number of allocations removed.
    pub fn remove_event(&mut self, instance: &Instance, event: EventId) -> usize {
        let Some(info) = instance.event(event) else {
            warn!(%event, "remove_event: unknown event");
            return 0;
        };

        let removed = std::mem::take(&mut self.event_allocations[event.0]);
        if removed.is_empty() {
            return 0;
        }
        self.allocations.retain(|a| a.event != event);

        let mut touched_days = BTreeSet::new();
        for allocation in &removed {
            let Some(slot) = allocation.slot.slot() else {
                continue;
            };
            for s in covered(instance, slot, allocation.duration) {
                release(&mut self.teacher_occupation[s.0], info.teacher);
                release(&mut self.class_occupation[s.0], info.class);
            }
            touched_days.insert(instance.slots[slot.0].day);
        }
        self.event_day_counts[event.0].clear();
        self.double_lessons[event.0] = 0;
        self.allocated[event.0] = 0;

        for day in touched_days {
            if !self.resource_busy_on(instance, day, |e| instance.events[e.0].teacher == info.teacher) {
                self.teacher_days[info.teacher.0].remove(&day);
            }
            if !self.resource_busy_on(instance, day, |e| instance.events[e.0].class == info.class) {
                self.class_days[info.class.0].remove(&day);
            }
        }
        removed.len()
    }

    fn resource_busy_on(&self, instance: &Instance, day: Day, owns: impl Fn(EventId) -> bool) -> bool {
        self.allocations.iter().any(|a| {
            a.slot
                .slot()
                .is_some_and(|slot| instance.slots[slot.0].day == day && owns(a.event))
        })
    }

    // ==================== Accessors ====================

    /// The authoritative allocation list, in insertion order.
    pub fn allocations(&self) -> &[Allocation] {
        &self.allocations
    }

    /// Allocations of one event, placed blocks and marker alike.
    pub fn allocations_of(&self, event: EventId) -> &[Allocation] {
        self.event_allocations
            .get(event.0)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Events that currently own at least one allocation.
    pub fn allocated_events(&self) -> impl Iterator<Item = EventId> + '_ {
        self.event_allocations
            .iter()
            .enumerate()
            .filter(|(_, list)| !list.is_empty())
            .map(|(i, _)| EventId(i))
    }

    /// Sum of placed durations of an event.
    pub fn allocated_duration(&self, event: EventId) -> u32 {
        self.allocated.get(event.0).copied().unwrap_or(0)
    }

    /// Shortfall carried by the event's unallocated marker, zero if none.
    pub fn unallocated_duration(&self, event: EventId) -> u32 {
        self.allocations_of(event)
            .iter()
            .filter(|a| a.slot.is_unallocated())
            .map(|a| a.duration)
            .sum()
    }

    pub fn double_lessons(&self, event: EventId) -> u32 {
        self.double_lessons.get(event.0).copied().unwrap_or(0)
    }

    /// Number of blocks of `event` starting on `day`.
    pub fn day_count(&self, event: EventId, day: Day) -> u32 {
        self.event_day_counts
            .get(event.0)
            .and_then(|counts| counts.get(&day))
            .copied()
            .unwrap_or(0)
    }

    /// Per-day block counts of an event; only days in use are present.
    pub fn day_counts(&self, event: EventId) -> Option<&BTreeMap<Day, u32>> {
        self.event_day_counts.get(event.0)
    }

    pub fn teacher_days(&self, teacher: TeacherId) -> Option<&BTreeSet<Day>> {
        self.teacher_days.get(teacher.0)
    }

    pub fn class_days(&self, class: ClassId) -> Option<&BTreeSet<Day>> {
        self.class_days.get(class.0)
    }

    /// Teachers with at least one allocation covering `slot`.
    pub fn teachers_at(&self, slot: SlotId) -> impl Iterator<Item = TeacherId> + '_ {
        self.teacher_occupation
            .get(slot.0)
            .into_iter()
            .flat_map(|m| m.keys().copied())
    }

    /// Classes with at least one allocation covering `slot`.
    pub fn classes_at(&self, slot: SlotId) -> impl Iterator<Item = ClassId> + '_ {
        self.class_occupation
            .get(slot.0)
            .into_iter()
            .flat_map(|m| m.keys().copied())
    }

    #[inline]
    pub fn is_teacher_free(&self, slot: SlotId, teacher: TeacherId) -> bool {
        self.teacher_occupation
            .get(slot.0)
            .map_or(true, |m| !m.contains_key(&teacher))
    }

    #[inline]
    pub fn is_class_free(&self, slot: SlotId, class: ClassId) -> bool {
        self.class_occupation
            .get(slot.0)
            .map_or(true, |m| !m.contains_key(&class))
    }

    /// Returns true if every event has its full duration placed.
    pub fn is_complete(&self, instance: &Instance) -> bool {
        instance
            .events()
            .iter()
            .zip(&self.allocated)
            .all(|(event, &allocated)| allocated >= event.duration)
    }

    // ==================== Blacklist ====================

    /// Slots recorded as unusable for an event during construction.
    pub fn blacklist(&self, event: EventId) -> Option<&HashSet<SlotId>> {
        self.blacklist.get(event.0)
    }

    pub fn extend_blacklist(&mut self, event: EventId, slots: impl IntoIterator<Item = SlotId>) {
        if let Some(set) = self.blacklist.get_mut(event.0) {
            set.extend(slots);
        }
    }

    pub fn clear_blacklists(&mut self) {
        self.blacklist.iter_mut().for_each(HashSet::clear);
    }

    // ==================== Conversion ====================

    /// Rebuilds a timetable from serialized allocations.
    ///
    /// Records naming unknown events or slots, or blocks a slot cannot host,
    /// are skipped with a warning.
    pub fn from_allocations<'a>(
        instance: &Instance,
        records: impl IntoIterator<Item = &'a AllocationRecord>,
    ) -> Self {
        let mut timetable = Self::new(instance);
        for record in records {
            let Some(event) = instance.event_by_name(&record.event) else {
                warn!(event = %record.event, "from_allocations: unknown event");
                continue;
            };
            match record.slot.as_deref() {
                None => timetable.record_unallocated(event, record.duration),
                Some(name) => {
                    let Some(slot) = instance.slot_by_name(name) else {
                        warn!(slot = name, "from_allocations: unknown slot");
                        continue;
                    };
                    match u8::try_from(record.duration) {
                        Ok(duration) => {
                            timetable.place(instance, event, slot, duration);
                        }
                        Err(_) => {
                            warn!(%record, "from_allocations: duration out of range");
                        }
                    }
                }
            }
        }
        timetable
    }

    /// Exports the allocation list keyed by natural ids.
    pub fn to_allocations(&self, instance: &Instance) -> Vec<AllocationRecord> {
        self.allocations
            .iter()
            .map(|a| AllocationRecord {
                event: instance.events[a.event.0].id.clone(),
                slot: a.slot.slot().map(|s| instance.slots[s.0].id.clone()),
                duration: a.duration,
            })
            .collect()
    }
}

/// Slots covered by a stored block.
fn covered(instance: &Instance, slot: SlotId, duration: u32) -> impl Iterator<Item = SlotId> {
    u8::try_from(duration)
        .ok()
        .and_then(|d| instance.covered_slots(slot, d))
        .into_iter()
        .flatten()
        .flatten()
}

fn release<K: Hash + Eq>(counts: &mut HashMap<K, u32>, key: K) {
    if let Entry::Occupied(mut entry) = counts.entry(key) {
        *entry.get_mut() -= 1;
        if *entry.get() == 0 {
            entry.remove();
        }
    }
}
