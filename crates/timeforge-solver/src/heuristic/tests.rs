//! Tests for ruin selection.

use rand::rngs::StdRng;
use rand::SeedableRng;
use timeforge_core::Timetable;
use timeforge_test::scenarios::soft_penalties;
use timeforge_test::small_school;

use super::*;
use crate::GreedyConstructor;

#[test]
fn test_cost_biased_prefers_incomplete_and_crowded_events() {
    let instance = soft_penalties();
    let e1 = instance.event_by_name("E1").unwrap();
    let e2 = instance.event_by_name("E2").unwrap();
    let mo1 = instance.slot_by_name("Mo_1").unwrap();
    let mo3 = instance.slot_by_name("Mo_3").unwrap();
    let tu1 = instance.slot_by_name("Tu_1").unwrap();

    let mut timetable = Timetable::new(&instance);
    // E1 complete with no double (split deviation 1), E2 crowded onto Tuesday twice.
    timetable.place(&instance, e1, mo1, 1);
    timetable.place(&instance, e1, mo3, 1);
    timetable.place(&instance, e2, tu1, 1);

    assert_eq!(CostBiasedSelector::event_cost(&instance, &timetable, e1), 50 + 10);
    assert_eq!(CostBiasedSelector::event_cost(&instance, &timetable, e2), 0);

    let mut rng = StdRng::seed_from_u64(0);
    let picked = CostBiasedSelector.select(&instance, &timetable, 1, &mut rng);
    assert_eq!(picked.as_slice(), &[e1]);
}

#[test]
fn test_cost_biased_scores_unallocated_events() {
    let instance = soft_penalties();
    let e1 = instance.event_by_name("E1").unwrap();
    let e2 = instance.event_by_name("E2").unwrap();
    let tu1 = instance.slot_by_name("Tu_1").unwrap();

    let mut timetable = Timetable::new(&instance);
    timetable.place(&instance, e2, tu1, 1);
    timetable.record_unallocated(e1, 2);

    let picked = CostBiasedSelector.select(&instance, &timetable, 5, &mut StdRng::seed_from_u64(0));
    assert_eq!(picked.as_slice(), &[e1, e2]);
    assert!(CostBiasedSelector::event_cost(&instance, &timetable, e1) >= 1000);
}

#[test]
fn test_random_selector_picks_distinct_events() {
    let instance = small_school();
    let timetable = Timetable::new(&instance);
    let mut rng = StdRng::seed_from_u64(17);

    let picked = RandomSelector.select(&instance, &timetable, 3, &mut rng);
    assert_eq!(picked.len(), 3);
    let mut sorted = picked.to_vec();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), 3);

    let all = RandomSelector.select(&instance, &timetable, 100, &mut rng);
    assert_eq!(all.len(), instance.event_count());
}

#[test]
fn test_ruin_removes_allocations_and_keeps_indexes() {
    let instance = small_school();
    let mut rng = StdRng::seed_from_u64(21);
    let mut timetable = GreedyConstructor::default().build(&instance, &mut rng);

    let picked = RandomSelector.select(&instance, &timetable, 4, &mut rng);
    let expected: usize = picked
        .iter()
        .map(|&e| timetable.allocations_of(e).len())
        .sum();

    assert_eq!(ruin(&instance, &mut timetable, &picked), expected);
    for &event in &picked {
        assert_eq!(timetable.allocated_duration(event), 0);
    }
    assert!(timetable.check_consistency(&instance).is_ok());
}
