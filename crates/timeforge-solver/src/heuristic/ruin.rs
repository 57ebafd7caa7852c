//! Ruin selection for destroy/rebuild search.
//!
//! A [`RuinSelector`] picks the events whose allocations are removed before a
//! rebuild. Iterated Greedy uses the cost-biased policy; Bee Colony uses
//! uniform random selection.

use std::cmp::Reverse;
use std::fmt::Debug;

use rand::seq::SliceRandom;
use rand::Rng;
use smallvec::SmallVec;

use timeforge_core::{EventId, Instance, Timetable};

/// Events chosen for one destroy step.
pub type RuinSelection = SmallVec<[EventId; 8]>;

/// Chooses which events to ruin.
pub trait RuinSelector: Send + Sync + Debug {
    /// Picks up to `count` events of `timetable`.
    fn select<R: Rng + ?Sized>(
        &self,
        instance: &Instance,
        timetable: &Timetable,
        count: usize,
        rng: &mut R,
    ) -> RuinSelection;
}

/// Picks the most problematic events first.
///
/// Every event owning at least one allocation is scored: 1000 if its
/// duration is not fully placed, 50 per day holding more than one of its
/// lessons, and 10 per double lesson outside its course's configured range.
#[derive(Debug, Clone, Copy, Default)]
pub struct CostBiasedSelector;

impl CostBiasedSelector {
    pub const INCOMPLETE_PENALTY: i64 = 1000;
    pub const CROWDED_DAY_PENALTY: i64 = 50;
    pub const SPLIT_DEVIATION_PENALTY: i64 = 10;

    /// Destroy priority of one event.
    pub fn event_cost(instance: &Instance, timetable: &Timetable, event: EventId) -> i64 {
        let Some(info) = instance.event(event) else {
            return 0;
        };
        let mut cost = 0;
        if timetable.allocated_duration(event) < info.duration {
            cost += Self::INCOMPLETE_PENALTY;
        }
        if let Some(counts) = timetable.day_counts(event) {
            let crowded = counts.values().filter(|&&count| count > 1).count() as i64;
            cost += crowded * Self::CROWDED_DAY_PENALTY;
        }
        if let Some(range) = instance.split_range(info.course) {
            let deviation = range.deviation(timetable.double_lessons(event));
            cost += i64::from(deviation) * Self::SPLIT_DEVIATION_PENALTY;
        }
        cost
    }
}

impl RuinSelector for CostBiasedSelector {
    fn select<R: Rng + ?Sized>(
        &self,
        instance: &Instance,
        timetable: &Timetable,
        count: usize,
        _rng: &mut R,
    ) -> RuinSelection {
        let mut scored: Vec<(EventId, i64)> = timetable
            .allocated_events()
            .map(|event| (event, Self::event_cost(instance, timetable, event)))
            .collect();
        scored.sort_by_key(|&(_, cost)| Reverse(cost));
        scored.into_iter().take(count).map(|(event, _)| event).collect()
    }
}

/// Picks events uniformly at random from the whole instance.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSelector;

impl RuinSelector for RandomSelector {
    fn select<R: Rng + ?Sized>(
        &self,
        instance: &Instance,
        _timetable: &Timetable,
        count: usize,
        rng: &mut R,
    ) -> RuinSelection {
        let mut events: RuinSelection = instance.event_ids().collect();
        events.shuffle(rng);
        events.truncate(count);
        events
    }
}

/// Removes every allocation of `events`. Returns the number of allocations removed.
pub fn ruin(instance: &Instance, timetable: &mut Timetable, events: &[EventId]) -> usize {
    events
        .iter()
        .map(|&event| timetable.remove_event(instance, event))
        .sum()
}
