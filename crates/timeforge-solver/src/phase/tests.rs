//! Tests for solver phases.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use timeforge_core::{Instance, Timetable};
use timeforge_test::scenarios::no_double_slots;
use timeforge_test::small_school;

use super::bee_colony::{destruction_count as ceil_count, roulette, selection_probabilities};
use super::iterated_greedy::destruction_count as floor_count;
use super::*;
use crate::construction::GreedyConstructor;
use crate::scope::SolverScope;
use crate::statistics::StatisticsCollector;

fn construct(scope: &mut SolverScope<'_>) -> i64 {
    ConstructionPhase::default().solve(scope);
    scope.best_cost().unwrap()
}

/// One slot and one single-period event, left unallocated with its only
/// slot blacklisted.
fn blacklisted_single_slot() -> (Instance, Timetable) {
    let instance = Instance::builder()
        .slot("Mo_1", 0, 1)
        .teacher("T1", "Ada")
        .class("C1", "1A")
        .event("E1", "Math", "T1", "C1", 1)
        .build()
        .unwrap();
    let e1 = instance.event_by_name("E1").unwrap();
    let mo1 = instance.slot_by_name("Mo_1").unwrap();

    let mut timetable = Timetable::new(&instance);
    timetable.record_unallocated(e1, 1);
    timetable.extend_blacklist(e1, [mo1]);
    (instance, timetable)
}

fn assert_no_blacklists(instance: &Instance, timetable: &Timetable) {
    assert!(instance
        .event_ids()
        .all(|e| timetable.blacklist(e).is_some_and(|b| b.is_empty())));
}

fn assert_non_increasing(collector: &StatisticsCollector) {
    let costs: Vec<i64> = collector.snapshot().cost_history().collect();
    assert!(!costs.is_empty());
    assert!(costs.windows(2).all(|w| w[1] <= w[0]), "history {costs:?}");
}

// ==================== Acceptor ====================

#[test]
fn test_acceptor_always_takes_improvements() {
    let acceptor = SimulatedAnnealingAcceptor::new(0.0, 0.5);
    let mut rng = StdRng::seed_from_u64(0);
    assert!(acceptor.is_accepted(9, 10, &mut rng));
    assert!(!acceptor.is_accepted(11, 10, &mut rng));
}

#[test]
fn test_acceptor_equal_cost_is_certain() {
    let acceptor = SimulatedAnnealingAcceptor::default();
    assert_eq!(acceptor.acceptance_probability(500, 500), 1.0);
    let mut rng = StdRng::seed_from_u64(4);
    assert!((0..20).all(|_| acceptor.is_accepted(500, 500, &mut rng)));
}

#[test]
fn test_acceptor_cools_and_resets() {
    let mut acceptor = SimulatedAnnealingAcceptor::new(1000.0, 0.5);
    let hot = acceptor.acceptance_probability(2000, 1000);
    acceptor.step_ended();
    acceptor.step_ended();
    assert_eq!(acceptor.temperature(), 250.0);
    assert!(acceptor.acceptance_probability(2000, 1000) < hot);

    acceptor.phase_started();
    assert_eq!(acceptor.temperature(), 1000.0);
}

// ==================== Helpers ====================

#[test]
fn test_destruction_counts() {
    assert_eq!(floor_count(10, 0.0), 0);
    assert_eq!(floor_count(10, 0.05), 1);
    assert_eq!(floor_count(10, 0.4), 4);
    assert_eq!(floor_count(10, 1.0), 10);

    assert_eq!(ceil_count(10, 0.0), 0);
    assert_eq!(ceil_count(10, 0.15), 2);
    assert_eq!(ceil_count(8, 0.15), 2);
    assert_eq!(ceil_count(3, 1.0), 3);
}

#[test]
fn test_selection_probabilities_favor_cheap_sources() {
    let probabilities = selection_probabilities([0, 1, 3].into_iter());
    let total: f64 = probabilities.iter().sum();
    assert!((total - 1.0).abs() < 1e-12);
    assert!(probabilities[0] > probabilities[1]);
    assert!(probabilities[1] > probabilities[2]);
    // fitness 1, 1/2, 1/4
    assert!((probabilities[0] - 4.0 / 7.0).abs() < 1e-12);
}

#[test]
fn test_roulette_falls_back_to_last_index() {
    let mut rng = StdRng::seed_from_u64(8);
    assert_eq!(roulette(&[0.0, 0.0, 0.0], &mut rng), 2);
    assert_eq!(roulette(&[1.0], &mut rng), 0);
    assert!((0..50).all(|_| roulette(&[0.0, 1.0, 0.0], &mut rng) == 1));
}

// ==================== Construction ====================

#[test]
fn test_construction_phase_sets_working_and_best() {
    let instance = no_double_slots();
    let mut scope = SolverScope::with_seed(&instance, 1);

    ConstructionPhase::new(GreedyConstructor::new(5)).solve(&mut scope);

    let working = scope.working_timetable().unwrap();
    assert_eq!(working.allocated_duration(instance.event_by_name("E1").unwrap()), 1);
    assert_eq!(scope.best_evaluation().unwrap().hard_violations, 1);
}

// ==================== Iterated Greedy ====================

#[test]
fn test_iterated_greedy_best_never_increases() {
    let instance = small_school();
    let collector = Arc::new(StatisticsCollector::new());
    let mut scope = SolverScope::with_seed(&instance, 11).with_statistics(collector.clone());
    let initial = construct(&mut scope);

    let mut phase = IteratedGreedyPhase::new(60, 0.3).with_restart(20, 10);
    phase.solve(&mut scope);

    assert!(scope.best_cost().unwrap() <= initial);
    assert_non_increasing(&collector);

    let stats = collector.snapshot();
    let ig = &stats.phase_statistics[1];
    assert_eq!(ig.phase_type, "IteratedGreedy");
    assert_eq!(ig.step_count, 60);
    assert_eq!(ig.candidates_evaluated, 60);
    assert_eq!(ig.restarts, 2);

    let working = scope.working_timetable().unwrap();
    assert!(working.check_consistency(&instance).is_ok());
    assert_eq!(scope.evaluate(working).cost(), scope.best_cost().unwrap());
}

#[test]
fn test_iterated_greedy_without_destruction_keeps_initial_cost() {
    let instance = small_school();
    let mut scope = SolverScope::with_seed(&instance, 5);
    let initial = construct(&mut scope);

    IteratedGreedyPhase::new(40, 0.0)
        .with_restart(100, 10)
        .solve(&mut scope);

    assert_eq!(scope.best_cost(), Some(initial));
}

#[test]
fn test_iterated_greedy_builds_when_run_first() {
    let instance = no_double_slots();
    let mut scope = SolverScope::with_seed(&instance, 2);

    IteratedGreedyPhase::new(5, 1.0).solve(&mut scope);

    assert_eq!(scope.best_cost(), Some(1000));
    assert!(scope.working_timetable().is_some());
}

#[test]
fn test_iterated_greedy_initial_build_uses_full_budget() {
    let phase = IteratedGreedyPhase::default();
    assert_eq!(phase.constructor(), GreedyConstructor::default());
    assert_eq!(phase.constructor().max_attempts(), 100);
    assert_eq!(phase.restart_attempts(), 50);

    let phase = phase.with_constructor(GreedyConstructor::new(7));
    assert_eq!(phase.constructor().max_attempts(), 7);
    assert_eq!(phase.restart_attempts(), 50);
}

#[test]
fn test_iterated_greedy_hands_over_without_blacklists() {
    let (instance, timetable) = blacklisted_single_slot();
    let mut scope = SolverScope::with_seed(&instance, 3);
    scope.set_working_timetable(timetable);

    IteratedGreedyPhase::new(0, 0.4).solve(&mut scope);

    assert_no_blacklists(&instance, scope.working_timetable().unwrap());
    assert_no_blacklists(&instance, scope.best_timetable().unwrap());
}

// ==================== Bee Colony ====================

#[test]
fn test_bee_colony_ignores_blacklists_of_earlier_phases() {
    let (instance, timetable) = blacklisted_single_slot();
    let mut scope = SolverScope::with_seed(&instance, 17);
    scope.set_working_timetable(timetable);

    BeeColonyPhase::new(1, 1000, 5, 1.0).solve(&mut scope);

    // The blacklisted slot is free, so the first employed bee completes E1.
    assert_eq!(scope.best_cost(), Some(0));
    let working = scope.working_timetable().unwrap();
    assert!(working.is_complete(&instance));
    assert_no_blacklists(&instance, working);
}


#[test]
fn test_bee_colony_single_source_never_worsens() {
    let instance = small_school();
    let collector = Arc::new(StatisticsCollector::new());
    let mut scope = SolverScope::with_seed(&instance, 23).with_statistics(collector.clone());
    let initial = construct(&mut scope);

    BeeColonyPhase::new(1, 1000, 15, 0.2).solve(&mut scope);

    assert!(scope.best_cost().unwrap() <= initial);
    assert_non_increasing(&collector);

    let stats = collector.snapshot();
    let bees = &stats.phase_statistics[1];
    assert_eq!(bees.step_count, 15);
    // One employed and one onlooker candidate per cycle.
    assert_eq!(bees.candidates_evaluated, 30);
    assert_eq!(bees.scouts, 0);
}

#[test]
fn test_bee_colony_scouts_abandon_stale_sources() {
    let instance = no_double_slots();
    let collector = Arc::new(StatisticsCollector::new());
    let mut scope = SolverScope::with_seed(&instance, 6).with_statistics(collector.clone());

    // The only event can never be completed, so no neighbor is strictly better.
    BeeColonyPhase::new(2, 2, 3, 1.0)
        .with_constructor(GreedyConstructor::new(3))
        .solve(&mut scope);

    let stats = collector.snapshot();
    assert!(stats.phase_statistics[0].scouts >= 2);
    assert_eq!(stats.total_candidates_accepted, 0);
    assert_eq!(scope.best_cost(), Some(1000));
}

#[test]
fn test_parallel_bee_colony_is_reproducible() {
    let instance = small_school();
    let run = |seed| {
        let mut scope = SolverScope::with_seed(&instance, seed);
        BeeColonyPhase::new(4, 5, 6, 0.25)
            .with_parallel(true)
            .solve(&mut scope);
        let best = scope.best_timetable().unwrap().to_allocations(&instance);
        (scope.best_cost().unwrap(), best)
    };

    let (cost_a, best_a) = run(31);
    let (cost_b, best_b) = run(31);
    assert_eq!(cost_a, cost_b);
    assert_eq!(best_a, best_b);
}
