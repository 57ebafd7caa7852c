//! Full-recompute evaluator.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use timeforge_core::{
    Allocation, ConstraintKind, Day, Instance, SlotId, TeacherId, Timetable, TimetableScore,
    HARD_WEIGHT,
};

use crate::analysis::{ConstraintAnalysis, ScoreExplanation};

/// Result of evaluating a timetable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Evaluation {
    pub hard_violations: u32,
    pub soft_violations: u32,
    pub soft_cost: i64,
}

impl Evaluation {
    /// Scalar objective minimized by search.
    #[inline]
    pub fn cost(&self) -> i64 {
        i64::from(self.hard_violations) * HARD_WEIGHT + self.soft_cost
    }

    pub fn score(&self) -> TimetableScore {
        TimetableScore::of_penalties(i64::from(self.hard_violations), self.soft_cost)
    }

    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.hard_violations == 0
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hard={} soft={} (cost {})",
            self.hard_violations,
            self.soft_violations,
            self.cost()
        )
    }
}

/// Receives every constraint match found during a pass.
trait MatchSink {
    fn record(&mut self, kind: ConstraintKind, penalty: i64, describe: impl FnOnce() -> String);
}

impl MatchSink for Evaluation {
    #[inline]
    fn record(&mut self, kind: ConstraintKind, penalty: i64, _describe: impl FnOnce() -> String) {
        if kind.is_hard() {
            self.hard_violations += 1;
        } else {
            self.soft_violations += 1;
            self.soft_cost += penalty;
        }
    }
}

impl MatchSink for Vec<ConstraintAnalysis> {
    fn record(&mut self, kind: ConstraintKind, penalty: i64, describe: impl FnOnce() -> String) {
        if let Some(analysis) = self.iter_mut().find(|a| a.kind == kind) {
            analysis.add(penalty, describe());
        }
    }
}

/// Computes hard violations and soft cost of a timetable.
///
/// Hard kinds add one per match; soft kinds add the weight of the record
/// that configured them. A double allocation is checked on both of its
/// covered slots.
///
/// # Example
///
/// ```
/// use timeforge_core::{Instance, Timetable};
/// use timeforge_scoring::Evaluator;
///
/// let instance = Instance::builder()
///     .slot("Mo_1", 0, 1)
///     .teacher("T1", "Ada")
///     .class("C1", "1A")
///     .event("E1", "Math", "T1", "C1", 1)
///     .build()
///     .unwrap();
///
/// let timetable = Timetable::new(&instance);
/// let evaluation = Evaluator::new(&instance).evaluate(&timetable);
/// assert_eq!(evaluation.hard_violations, 1);
/// assert_eq!(evaluation.cost(), 1000);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    instance: &'a Instance,
}

impl<'a> Evaluator<'a> {
    pub fn new(instance: &'a Instance) -> Self {
        Self { instance }
    }

    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    /// Evaluates `timetable` without mutating it.
    pub fn evaluate(&self, timetable: &Timetable) -> Evaluation {
        let mut evaluation = Evaluation::default();
        self.visit(timetable, &mut evaluation);
        evaluation
    }

    /// Shorthand for `evaluate(timetable).cost()`.
    pub fn cost(&self, timetable: &Timetable) -> i64 {
        self.evaluate(timetable).cost()
    }

    /// Evaluates `timetable` and keeps every match, grouped by constraint.
    pub fn explain(&self, timetable: &Timetable) -> ScoreExplanation {
        let mut analyses: Vec<ConstraintAnalysis> = ConstraintKind::ALL
            .iter()
            .map(|&kind| ConstraintAnalysis::new(kind))
            .collect();
        self.visit(timetable, &mut analyses);

        let hard: i64 = analyses.iter().filter(|a| a.is_hard).map(|a| a.penalty).sum();
        let soft: i64 = analyses.iter().filter(|a| !a.is_hard).map(|a| a.penalty).sum();
        ScoreExplanation {
            score: TimetableScore::of_penalties(hard, soft),
            constraint_analyses: analyses,
        }
    }

    fn visit(&self, timetable: &Timetable, sink: &mut impl MatchSink) {
        self.assign_time(timetable, sink);
        self.avoid_clashes(timetable, sink);
        self.avoid_unavailable_times(timetable, sink);
        self.spread_events(timetable, sink);
        self.distribute_split_events(timetable, sink);
        self.cluster_busy_times(timetable, sink);
        self.limit_idle_times(timetable, sink);
    }

    // ==================== Hard ====================

    fn assign_time(&self, timetable: &Timetable, sink: &mut impl MatchSink) {
        for (id, event) in self.instance.event_ids().zip(self.instance.events()) {
            let allocated = timetable.allocated_duration(id);
            if allocated != event.duration {
                sink.record(ConstraintKind::AssignTime, 1, || {
                    format!("event {} placed {}/{}", event.id, allocated, event.duration)
                });
            }
        }
    }

    /// Replays placements into fresh per-slot sets; each re-insertion is a clash.
    fn avoid_clashes(&self, timetable: &Timetable, sink: &mut impl MatchSink) {
        let slots = self.instance.slot_count();
        let mut teachers: Vec<HashSet<TeacherId>> = vec![HashSet::new(); slots];
        let mut classes = vec![HashSet::new(); slots];

        for allocation in timetable.allocations() {
            let event = &self.instance.events()[allocation.event.index()];
            for slot in self.covered(allocation) {
                if !teachers[slot.index()].insert(event.teacher) {
                    sink.record(ConstraintKind::AvoidClashes, 1, || {
                        format!(
                            "teacher {} double-booked at {}",
                            self.teacher_name(event.teacher),
                            self.slot_name(slot)
                        )
                    });
                }
                if !classes[slot.index()].insert(event.class) {
                    sink.record(ConstraintKind::AvoidClashes, 1, || {
                        let class = &self.instance.classes()[event.class.index()];
                        format!("class {} double-booked at {}", class.id, self.slot_name(slot))
                    });
                }
            }
        }
    }

    fn avoid_unavailable_times(&self, timetable: &Timetable, sink: &mut impl MatchSink) {
        for allocation in timetable.allocations() {
            let event = &self.instance.events()[allocation.event.index()];
            let forbidden = self
                .covered(allocation)
                .find(|&slot| self.instance.is_forbidden(event.teacher, slot));
            if let Some(slot) = forbidden {
                sink.record(ConstraintKind::AvoidUnavailableTimes, 1, || {
                    format!(
                        "event {} places teacher {} at unavailable {}",
                        event.id,
                        self.teacher_name(event.teacher),
                        self.slot_name(slot)
                    )
                });
            }
        }
    }

    fn spread_events(&self, timetable: &Timetable, sink: &mut impl MatchSink) {
        for (id, event) in self.instance.event_ids().zip(self.instance.events()) {
            let Some(counts) = timetable.day_counts(id) else {
                continue;
            };
            for (&day, &count) in counts {
                if count > 1 {
                    sink.record(ConstraintKind::SpreadEvents, 1, || {
                        format!("event {} has {} lessons on day {}", event.id, count, day)
                    });
                }
            }
        }
    }

    // ==================== Soft ====================

    fn distribute_split_events(&self, timetable: &Timetable, sink: &mut impl MatchSink) {
        for (id, event) in self.instance.event_ids().zip(self.instance.events()) {
            let Some(range) = self.instance.split_range(event.course) else {
                continue;
            };
            let doubles = timetable.double_lessons(id);
            if !range.contains(doubles) {
                sink.record(ConstraintKind::DistributeSplitEvents, range.weight, || {
                    format!(
                        "event {} has {} double lessons, expected {}..={}",
                        event.id, doubles, range.min, range.max
                    )
                });
            }
        }
    }

    fn cluster_busy_times(&self, timetable: &Timetable, sink: &mut impl MatchSink) {
        for (index, teacher) in self.instance.teachers().iter().enumerate() {
            let id = TeacherId(index);
            let Some(limit) = self.instance.max_days(id) else {
                continue;
            };
            let days = timetable.teacher_days(id).map_or(0, |d| d.len()) as u32;
            if days > limit.max {
                sink.record(ConstraintKind::ClusterBusyTimes, limit.weight, || {
                    format!("teacher {} works {} days, max {}", teacher.id, days, limit.max)
                });
            }
        }
    }

    /// One match per teacher-day with a gap between consecutive periods.
    ///
    /// Only teachers with an idle weight are checked, so teachers outside
    /// every `LimitIdleTimes` record are skipped.
    fn limit_idle_times(&self, timetable: &Timetable, sink: &mut impl MatchSink) {
        let mut orders: Vec<BTreeMap<Day, Vec<u32>>> =
            vec![BTreeMap::new(); self.instance.teachers().len()];
        for allocation in timetable.allocations() {
            let teacher = self.instance.events()[allocation.event.index()].teacher;
            if self.instance.idle_weight(teacher).is_none() {
                continue;
            }
            for slot in self.covered(allocation) {
                let info = &self.instance.slots()[slot.index()];
                orders[teacher.index()]
                    .entry(info.day)
                    .or_default()
                    .push(info.order);
            }
        }

        for (index, days) in orders.iter_mut().enumerate() {
            let teacher = TeacherId(index);
            let Some(weight) = self.instance.idle_weight(teacher) else {
                continue;
            };
            for (&day, periods) in days.iter_mut() {
                periods.sort_unstable();
                if periods.windows(2).any(|w| w[1] - w[0] > 1) {
                    sink.record(ConstraintKind::LimitIdleTimes, weight, || {
                        format!("teacher {} has idle time on day {}", self.teacher_name(teacher), day)
                    });
                }
            }
        }
    }

    // ==================== Helpers ====================

    /// Slots covered by a placed allocation; empty for the unallocated marker.
    fn covered(&self, allocation: &Allocation) -> impl Iterator<Item = SlotId> {
        allocation
            .slot
            .slot()
            .zip(u8::try_from(allocation.duration).ok())
            .and_then(|(slot, duration)| self.instance.covered_slots(slot, duration))
            .into_iter()
            .flatten()
            .flatten()
    }

    fn slot_name(&self, slot: SlotId) -> &str {
        &self.instance.slots()[slot.index()].id
    }

    fn teacher_name(&self, teacher: TeacherId) -> &str {
        &self.instance.teachers()[teacher.index()].id
    }
}
