//! Artificial Bee Colony phase.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, trace};

use timeforge_core::{Instance, Timetable};
use timeforge_scoring::{Evaluation, Evaluator};

use crate::construction::{sort_by_duration, GreedyConstructor, RepairPolicy};
use crate::heuristic::{ruin, RandomSelector, RuinSelector};
use crate::scope::{PhaseScope, SolverScope};

use super::{starting_timetable, Phase};

/// Population search over independent timetables ("food sources").
///
/// Each cycle runs three phases:
/// - employed: every source is perturbed once and greedily replaced
/// - onlooker: `population_size` sources are drawn by fitness roulette and
///   perturbed the same way
/// - scout: sources without improvement for `limit` trials are rebuilt
///
/// With `parallel` set, the employed phase runs on the rayon pool with one
/// generator per source, seeded from the master generator.
#[derive(Debug, Clone)]
pub struct BeeColonyPhase {
    population_size: usize,
    limit: u32,
    max_cycles: u32,
    destruction_rate: f64,
    repair: RepairPolicy,
    constructor: GreedyConstructor,
    parallel: bool,
}

impl BeeColonyPhase {
    pub fn new(population_size: usize, limit: u32, max_cycles: u32, destruction_rate: f64) -> Self {
        Self {
            population_size: population_size.max(1),
            limit,
            max_cycles,
            destruction_rate,
            repair: RepairPolicy::default(),
            constructor: GreedyConstructor::default(),
            parallel: false,
        }
    }

    pub fn with_repair(mut self, repair: RepairPolicy) -> Self {
        self.repair = repair;
        self
    }

    /// Constructor used for the initial population and for scouts.
    pub fn with_constructor(mut self, constructor: GreedyConstructor) -> Self {
        self.constructor = constructor;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn population_size(&self) -> usize {
        self.population_size
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }
}

impl Default for BeeColonyPhase {
    fn default() -> Self {
        Self::new(15, 50, 200, 0.15)
    }
}

/// Events destroyed per neighbor: `ceil(events × rate)`.
pub(crate) fn destruction_count(event_count: usize, rate: f64) -> usize {
    if rate <= 0.0 {
        return 0;
    }
    ((event_count as f64 * rate).ceil() as usize).min(event_count)
}

/// Draws an index from a probability vector; falls back to the last index
/// when rounding leaves the cumulative sum below the draw.
pub(crate) fn roulette<R: Rng + ?Sized>(probabilities: &[f64], rng: &mut R) -> usize {
    let draw: f64 = rng.random();
    let mut cumulative = 0.0;
    for (index, probability) in probabilities.iter().enumerate() {
        cumulative += probability;
        if draw <= cumulative {
            return index;
        }
    }
    probabilities.len().saturating_sub(1)
}

/// `1 / (1 + cost)` normalized over the population.
pub(crate) fn selection_probabilities(costs: impl Iterator<Item = i64>) -> Vec<f64> {
    let fitness: Vec<f64> = costs.map(|cost| 1.0 / (1.0 + cost as f64)).collect();
    let total: f64 = fitness.iter().sum();
    fitness.into_iter().map(|f| f / total).collect()
}

#[derive(Debug, Clone)]
struct FoodSource {
    timetable: Timetable,
    evaluation: Evaluation,
    trials: u32,
}

impl FoodSource {
    /// Replaces the source if `neighbor` is strictly cheaper, else counts a trial.
    fn offer(&mut self, neighbor: Timetable, evaluation: Evaluation) -> bool {
        if evaluation.cost() < self.evaluation.cost() {
            self.timetable = neighbor;
            self.evaluation = evaluation;
            self.trials = 0;
            true
        } else {
            self.trials += 1;
            false
        }
    }
}

/// Random destroy followed by bounded repair.
#[derive(Debug, Clone, Copy)]
struct Neighborhood<'i> {
    instance: &'i Instance,
    evaluator: Evaluator<'i>,
    constructor: GreedyConstructor,
    repair: RepairPolicy,
    to_destroy: usize,
}

impl Neighborhood<'_> {
    fn perturb<R: Rng + ?Sized>(&self, source: &Timetable, rng: &mut R) -> (Timetable, Evaluation) {
        let mut neighbor = source.clone();
        neighbor.clear_blacklists();
        let mut selected = RandomSelector
            .select(self.instance, &neighbor, self.to_destroy, rng)
            .to_vec();
        ruin(self.instance, &mut neighbor, &selected);

        sort_by_duration(self.instance, &mut selected);
        for &event in &selected {
            self.repair
                .repair(&self.constructor, self.instance, &mut neighbor, event, rng);
        }

        let evaluation = self.evaluator.evaluate(&neighbor);
        (neighbor, evaluation)
    }
}

impl Phase for BeeColonyPhase {
    fn solve(&mut self, solver_scope: &mut SolverScope<'_>) {
        let mut phase_scope = PhaseScope::new(solver_scope, self.phase_type_name(), "Bee Colony");
        let instance = phase_scope.instance();
        let neighborhood = Neighborhood {
            instance,
            evaluator: phase_scope.solver_scope().evaluator(),
            constructor: self.constructor,
            repair: self.repair,
            to_destroy: destruction_count(instance.event_count(), self.destruction_rate),
        };

        // Source 0 continues from the working timetable when there is one.
        let (first, first_evaluation) =
            starting_timetable(&mut phase_scope, self.constructor.max_attempts());
        let mut sources = Vec::with_capacity(self.population_size);
        sources.push(FoodSource {
            timetable: first,
            evaluation: first_evaluation,
            trials: 0,
        });
        while sources.len() < self.population_size {
            let timetable = self
                .constructor
                .build(instance, phase_scope.solver_scope_mut().rng());
            let evaluation = phase_scope.evaluate(&timetable);
            phase_scope.update_best(&timetable, evaluation);
            sources.push(FoodSource {
                timetable,
                evaluation,
                trials: 0,
            });
        }

        for cycle in 0..self.max_cycles {
            // Employed bees.
            let improved: Vec<bool> = if self.parallel {
                let seeds: Vec<u64> = {
                    let rng = phase_scope.solver_scope_mut().rng();
                    (0..sources.len()).map(|_| rng.random()).collect()
                };
                let improved: Vec<bool> = sources
                    .par_iter_mut()
                    .zip(seeds)
                    .map(|(source, seed)| {
                        let mut rng = ChaCha8Rng::seed_from_u64(seed);
                        let (neighbor, evaluation) =
                            neighborhood.perturb(&source.timetable, &mut rng);
                        source.offer(neighbor, evaluation)
                    })
                    .collect();
                phase_scope
                    .solver_scope()
                    .record_evaluations(improved.len() as u64);
                improved
            } else {
                sources
                    .iter_mut()
                    .map(|source| {
                        let (neighbor, evaluation) = neighborhood
                            .perturb(&source.timetable, phase_scope.solver_scope_mut().rng());
                        phase_scope.solver_scope().record_evaluations(1);
                        source.offer(neighbor, evaluation)
                    })
                    .collect()
            };
            for (source, accepted) in sources.iter().zip(&improved) {
                phase_scope.record_candidate(*accepted);
                if *accepted && phase_scope.update_best(&source.timetable, source.evaluation) {
                    debug!(
                        event = "new_best",
                        step = cycle,
                        bees = "employed",
                        score = %source.evaluation.score(),
                    );
                }
            }

            // Onlooker bees.
            let probabilities = selection_probabilities(sources.iter().map(|s| s.evaluation.cost()));
            for _ in 0..sources.len() {
                let rng = phase_scope.solver_scope_mut().rng();
                let index = roulette(&probabilities, rng);
                let (neighbor, evaluation) = neighborhood.perturb(&sources[index].timetable, rng);
                phase_scope.solver_scope().record_evaluations(1);

                let accepted = sources[index].offer(neighbor, evaluation);
                phase_scope.record_candidate(accepted);
                trace!(event = "step", step = cycle, source = index, cost = evaluation.cost(), accepted);

                if accepted && phase_scope.update_best(&sources[index].timetable, evaluation) {
                    debug!(
                        event = "new_best",
                        step = cycle,
                        bees = "onlooker",
                        score = %evaluation.score(),
                    );
                }
            }

            // Scout bees.
            for (index, source) in sources.iter_mut().enumerate() {
                if source.trials < self.limit {
                    continue;
                }
                source.timetable = self
                    .constructor
                    .build(instance, phase_scope.solver_scope_mut().rng());
                source.evaluation = phase_scope.evaluate(&source.timetable);
                source.trials = 0;
                phase_scope.record_scout();
                debug!(
                    event = "scout",
                    step = cycle,
                    source = index,
                    score = %source.evaluation.score(),
                );
                phase_scope.update_best(&source.timetable, source.evaluation);
            }

            phase_scope.increment_step_count();
            if cycle % 10 == 0 {
                if let Some(best) = phase_scope.best_score() {
                    debug!(event = "progress", steps = cycle, score = %best);
                }
            }
        }

        if let Some(best) = phase_scope.solver_scope().best_timetable().cloned() {
            phase_scope.solver_scope_mut().set_working_timetable(best);
        }
        phase_scope.finish();
    }

    fn phase_type_name(&self) -> &'static str {
        "BeeColony"
    }
}
