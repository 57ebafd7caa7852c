//! Randomized greedy construction.
//!
//! [`GreedyConstructor::build`] produces a whole timetable with a bounded
//! number of attempts. [`GreedyConstructor::allocate`] is the shared placement
//! primitive that fills the outstanding duration of one event against the
//! occupancy already present in a timetable.

mod repair;

#[cfg(test)]
mod tests;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace, warn};

use timeforge_core::{Event, EventId, Instance, SlotId, Timetable};

pub use repair::RepairPolicy;

/// Result of one call to [`GreedyConstructor::allocate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlacementOutcome {
    /// Periods placed by this call.
    pub placed: u32,
    /// Periods still missing afterwards.
    pub shortfall: u32,
}

impl PlacementOutcome {
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.shortfall == 0
    }
}

/// Why a slot cannot start a block of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rejection {
    NoPartner,
    Blacklisted,
    Forbidden,
    DayUsed,
    TeacherBusy,
    ClassBusy,
}

impl Rejection {
    /// Rejections caused by the current occupancy rather than by the slot itself.
    fn is_availability(self) -> bool {
        matches!(
            self,
            Rejection::DayUsed | Rejection::TeacherBusy | Rejection::ClassBusy
        )
    }
}

/// Randomized greedy constructor with a bounded attempt budget.
///
/// # Example
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use timeforge_core::Instance;
/// use timeforge_solver::GreedyConstructor;
///
/// let instance = Instance::builder()
///     .slot("Mo_1", 0, 1)
///     .slot("Tu_1", 1, 1)
///     .teacher("T1", "Ada")
///     .class("C1", "1A")
///     .event("E1", "Math", "T1", "C1", 2)
///     .build()
///     .unwrap();
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let timetable = GreedyConstructor::new(10).build(&instance, &mut rng);
/// assert!(timetable.is_complete(&instance));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GreedyConstructor {
    max_attempts: u32,
}

impl GreedyConstructor {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Builds a timetable from scratch.
    ///
    /// Events are shuffled and then stably sorted by descending duration, so
    /// ties are broken differently on every attempt. Returns the first
    /// complete timetable, or the last attempt with its shortfalls recorded.
    pub fn build<R: Rng + ?Sized>(&self, instance: &Instance, rng: &mut R) -> Timetable {
        let mut order: Vec<EventId> = instance.event_ids().collect();
        let mut timetable = Timetable::new(instance);

        for attempt in 1..=self.max_attempts {
            order.shuffle(rng);
            sort_by_duration(instance, &mut order);

            timetable = Timetable::new(instance);
            let mut complete = true;
            for &event in &order {
                complete &= self.allocate(instance, &mut timetable, event, false, rng).is_complete();
            }

            if complete {
                trace!(attempt, "greedy build complete");
                return timetable;
            }
        }

        debug!(
            attempts = self.max_attempts,
            "greedy build exhausted its attempts, returning incomplete timetable"
        );
        timetable
    }

    /// Places the outstanding duration of `event` without touching other events.
    ///
    /// Doubles are placed first while at least two periods are missing, then
    /// singles. The event's previous unallocated marker is dropped and a new
    /// one is recorded for any shortfall. With `record_blacklist`, slots that
    /// the final scan rejected for teacher, class or day availability are
    /// added to the event's blacklist.
    pub fn allocate<R: Rng + ?Sized>(
        &self,
        instance: &Instance,
        timetable: &mut Timetable,
        event: EventId,
        record_blacklist: bool,
        rng: &mut R,
    ) -> PlacementOutcome {
        let Some(info) = instance.event(event) else {
            warn!(%event, "allocate: unknown event");
            return PlacementOutcome::default();
        };

        timetable.record_unallocated(event, 0);
        let mut needed = info.duration.saturating_sub(timetable.allocated_duration(event));
        let mut placed = 0;
        let mut candidates: Vec<SlotId> = instance.slot_ids().collect();

        while needed >= 2 {
            candidates.shuffle(rng);
            let found = candidates
                .iter()
                .copied()
                .find(|&slot| check(instance, timetable, event, info, slot, 2).is_ok());
            let Some(slot) = found else {
                break;
            };
            timetable.place(instance, event, slot, 2);
            needed -= 2;
            placed += 2;
        }

        let mut rejected = Vec::new();
        while needed >= 1 {
            candidates.shuffle(rng);
            rejected.clear();
            let mut found = None;
            for &slot in &candidates {
                match check(instance, timetable, event, info, slot, 1) {
                    Ok(()) => {
                        found = Some(slot);
                        break;
                    }
                    Err(reason) if reason.is_availability() => rejected.push(slot),
                    Err(_) => {}
                }
            }
            let Some(slot) = found else {
                break;
            };
            timetable.place(instance, event, slot, 1);
            needed -= 1;
            placed += 1;
        }

        if needed > 0 {
            timetable.record_unallocated(event, needed);
            if record_blacklist {
                timetable.extend_blacklist(event, rejected);
            }
            trace!(event = %info.id, shortfall = needed, "event left incomplete");
        }

        PlacementOutcome {
            placed,
            shortfall: needed,
        }
    }
}

impl Default for GreedyConstructor {
    fn default() -> Self {
        Self::new(100)
    }
}

/// Stable sort by descending event duration.
pub(crate) fn sort_by_duration(instance: &Instance, events: &mut [EventId]) {
    events.sort_by_key(|&e| {
        std::cmp::Reverse(instance.event(e).map_or(0, |info| info.duration))
    });
}

/// Checks whether `slot` can start a block of `duration` for `event`.
///
/// Both covered slots of a double must be free for the teacher and class
/// and outside the teacher's forbidden times.
pub(crate) fn check(
    instance: &Instance,
    timetable: &Timetable,
    event: EventId,
    info: &Event,
    slot: SlotId,
    duration: u8,
) -> Result<(), Rejection> {
    let covered = instance
        .covered_slots(slot, duration)
        .ok_or(Rejection::NoPartner)?;
    if timetable.blacklist(event).is_some_and(|b| b.contains(&slot)) {
        return Err(Rejection::Blacklisted);
    }
    let covered = covered.into_iter().flatten();
    if covered.clone().any(|s| instance.is_forbidden(info.teacher, s)) {
        return Err(Rejection::Forbidden);
    }
    let day = instance.slots()[slot.index()].day;
    if timetable.day_count(event, day) > 0 {
        return Err(Rejection::DayUsed);
    }
    for s in covered {
        if !timetable.is_teacher_free(s, info.teacher) {
            return Err(Rejection::TeacherBusy);
        }
        if !timetable.is_class_free(s, info.class) {
            return Err(Rejection::ClassBusy);
        }
    }
    Ok(())
}
