//! Tests for greedy construction and repair.

use rand::rngs::StdRng;
use rand::SeedableRng;
use timeforge_core::{Instance, Timetable};
use timeforge_scoring::Evaluator;
use timeforge_test::scenarios::{no_double_slots, shared_forbidden_slot, two_day_event};
use timeforge_test::small_school;

use super::*;

fn occupancy(instance: &Instance, timetable: &Timetable) -> (usize, usize) {
    instance.slot_ids().fold((0, 0), |(t, c), slot| {
        (
            t + timetable.teachers_at(slot).count(),
            c + timetable.classes_at(slot).count(),
        )
    })
}

// ==================== Full build ====================

#[test]
fn test_build_without_double_slots_records_shortfall() {
    let instance = no_double_slots();
    let mut rng = StdRng::seed_from_u64(1);
    let timetable = GreedyConstructor::default().build(&instance, &mut rng);

    let e1 = instance.event_by_name("E1").unwrap();
    assert_eq!(timetable.allocated_duration(e1), 1);
    assert_eq!(timetable.unallocated_duration(e1), 1);
    assert_eq!(timetable.double_lessons(e1), 0);

    let evaluation = Evaluator::new(&instance).evaluate(&timetable);
    assert_eq!(evaluation.hard_violations, 1);
    assert!(timetable.check_consistency(&instance).is_ok());
}

#[test]
fn test_build_small_school_is_feasible() {
    let instance = small_school();
    let mut rng = StdRng::seed_from_u64(42);
    let timetable = GreedyConstructor::default().build(&instance, &mut rng);

    assert!(timetable.is_complete(&instance));
    assert!(timetable.check_consistency(&instance).is_ok());
    assert_eq!(Evaluator::new(&instance).evaluate(&timetable).hard_violations, 0);
}

#[test]
fn test_build_is_reproducible_with_seed() {
    let instance = small_school();
    let constructor = GreedyConstructor::new(5);
    let a = constructor.build(&instance, &mut StdRng::seed_from_u64(9));
    let b = constructor.build(&instance, &mut StdRng::seed_from_u64(9));
    assert_eq!(a.to_allocations(&instance), b.to_allocations(&instance));
}

#[test]
fn test_build_prefers_doubles() {
    let instance = small_school();
    let mut rng = StdRng::seed_from_u64(3);
    let mut timetable = Timetable::new(&instance);
    let e5 = instance.event_by_name("E5").unwrap();

    // On an empty timetable a two-period event becomes one double lesson.
    GreedyConstructor::default().allocate(&instance, &mut timetable, e5, false, &mut rng);
    assert_eq!(timetable.double_lessons(e5), 1);
    assert_eq!(timetable.allocations_of(e5).len(), 1);
}

// ==================== Placement primitive ====================

#[test]
fn test_allocate_respects_forbidden_times_and_occupancy() {
    let instance = shared_forbidden_slot();
    let e1 = instance.event_by_name("E1").unwrap();
    let e2 = instance.event_by_name("E2").unwrap();
    let mo1 = instance.slot_by_name("Mo_1").unwrap();
    let constructor = GreedyConstructor::default();
    let mut rng = StdRng::seed_from_u64(5);
    let mut timetable = Timetable::new(&instance);

    let first = constructor.allocate(&instance, &mut timetable, e1, true, &mut rng);
    assert_eq!(first, PlacementOutcome { placed: 1, shortfall: 0 });
    assert_eq!(timetable.allocations_of(e1)[0].slot.slot(), Some(mo1));

    let second = constructor.allocate(&instance, &mut timetable, e2, true, &mut rng);
    assert_eq!(second, PlacementOutcome { placed: 0, shortfall: 1 });
    assert_eq!(timetable.unallocated_duration(e2), 1);

    // Only the slot lost to occupancy is blacklisted, not the forbidden ones.
    let blacklist = timetable.blacklist(e2).unwrap();
    assert_eq!(blacklist.len(), 1);
    assert!(blacklist.contains(&mo1));
    assert!(timetable.check_consistency(&instance).is_ok());
}

#[test]
fn test_allocate_without_blacklist_recording() {
    let instance = shared_forbidden_slot();
    let e1 = instance.event_by_name("E1").unwrap();
    let e2 = instance.event_by_name("E2").unwrap();
    let constructor = GreedyConstructor::default();
    let mut rng = StdRng::seed_from_u64(5);
    let mut timetable = Timetable::new(&instance);

    constructor.allocate(&instance, &mut timetable, e1, false, &mut rng);
    constructor.allocate(&instance, &mut timetable, e2, false, &mut rng);
    assert!(timetable.blacklist(e2).unwrap().is_empty());
}

#[test]
fn test_allocate_leaves_other_events_alone() {
    let instance = small_school();
    let mut rng = StdRng::seed_from_u64(11);
    let constructor = GreedyConstructor::default();
    let mut timetable = constructor.build(&instance, &mut rng);

    let e3 = instance.event_by_name("E3").unwrap();
    let others: Vec<_> = timetable
        .allocations()
        .iter()
        .filter(|a| a.event != e3)
        .copied()
        .collect();

    timetable.remove_event(&instance, e3);
    constructor.allocate(&instance, &mut timetable, e3, true, &mut rng);

    let after: Vec<_> = timetable
        .allocations()
        .iter()
        .filter(|a| a.event != e3)
        .copied()
        .collect();
    assert_eq!(others, after);
    assert!(timetable.check_consistency(&instance).is_ok());
}

#[test]
fn test_allocate_unknown_event_is_noop() {
    let instance = two_day_event();
    let mut timetable = Timetable::new(&instance);
    let outcome = GreedyConstructor::default().allocate(
        &instance,
        &mut timetable,
        timeforge_core::EventId(42),
        true,
        &mut StdRng::seed_from_u64(0),
    );
    assert_eq!(outcome, PlacementOutcome::default());
    assert!(timetable.allocations().is_empty());
}

#[test]
fn test_destroy_and_rebuild_restores_event() {
    let instance = two_day_event();
    let e1 = instance.event_by_name("E1").unwrap();
    let constructor = GreedyConstructor::default();
    let mut rng = StdRng::seed_from_u64(8);
    let mut timetable = constructor.build(&instance, &mut rng);

    assert_eq!(timetable.allocations_of(e1).len(), 2);
    let days: Vec<_> = timetable
        .allocations_of(e1)
        .iter()
        .filter_map(|a| a.slot.slot())
        .map(|s| instance.slot(s).unwrap().day)
        .collect();
    assert_ne!(days[0], days[1]);
    let before = occupancy(&instance, &timetable);

    timetable.remove_event(&instance, e1);
    assert!(timetable.check_consistency(&instance).is_ok());
    assert_eq!(occupancy(&instance, &timetable), (0, 0));

    let outcome = constructor.allocate(&instance, &mut timetable, e1, true, &mut rng);
    assert!(outcome.is_complete());
    assert_eq!(timetable.allocated_duration(e1), 2);
    assert_eq!(occupancy(&instance, &timetable), before);
    assert!(timetable.check_consistency(&instance).is_ok());
}

// ==================== Repair policy ====================

#[test]
fn test_repair_keeps_last_partial_attempt() {
    let instance = shared_forbidden_slot();
    let e1 = instance.event_by_name("E1").unwrap();
    let e2 = instance.event_by_name("E2").unwrap();
    let constructor = GreedyConstructor::default();
    let mut rng = StdRng::seed_from_u64(2);
    let mut timetable = Timetable::new(&instance);
    constructor.allocate(&instance, &mut timetable, e1, false, &mut rng);

    let outcome = RepairPolicy::default().repair(&constructor, &instance, &mut timetable, e2, &mut rng);
    assert_eq!(outcome.shortfall, 1);
    assert_eq!(timetable.unallocated_duration(e2), 1);
    assert_eq!(timetable.allocations_of(e2).len(), 1);
    assert!(timetable.check_consistency(&instance).is_ok());
}

#[test]
fn test_repair_completes_when_room_exists() {
    let instance = two_day_event();
    let e1 = instance.event_by_name("E1").unwrap();
    let mut timetable = Timetable::new(&instance);
    let outcome = RepairPolicy::new(3).repair(
        &GreedyConstructor::default(),
        &instance,
        &mut timetable,
        e1,
        &mut StdRng::seed_from_u64(4),
    );
    assert!(outcome.is_complete());
    assert_eq!(timetable.allocated_duration(e1), 2);
}
