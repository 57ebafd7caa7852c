//! Bounded retry-with-undo repair.

use rand::Rng;
use tracing::trace;

use timeforge_core::{EventId, Instance, Timetable};

use super::{GreedyConstructor, PlacementOutcome};

/// Repairs a ruined event with up to `max_tries` placement attempts.
///
/// After a short attempt the event's partial placement is removed and the
/// attempt repeated with a fresh shuffle. The last attempt is kept even if
/// it is still short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairPolicy {
    max_tries: u32,
}

impl RepairPolicy {
    pub fn new(max_tries: u32) -> Self {
        Self {
            max_tries: max_tries.max(1),
        }
    }

    pub fn max_tries(&self) -> u32 {
        self.max_tries
    }

    /// Repairs `event`, which must have no allocations left.
    pub fn repair<R: Rng + ?Sized>(
        &self,
        constructor: &GreedyConstructor,
        instance: &Instance,
        timetable: &mut Timetable,
        event: EventId,
        rng: &mut R,
    ) -> PlacementOutcome {
        let mut outcome = PlacementOutcome::default();
        for attempt in 1..=self.max_tries {
            outcome = constructor.allocate(instance, timetable, event, false, rng);
            if outcome.is_complete() {
                break;
            }
            if attempt < self.max_tries {
                trace!(%event, attempt, shortfall = outcome.shortfall, "undoing partial repair");
                timetable.remove_event(instance, event);
            }
        }
        outcome
    }
}

impl Default for RepairPolicy {
    fn default() -> Self {
        Self::new(5)
    }
}
