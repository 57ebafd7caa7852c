//! Solver-level scope.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use timeforge_core::{Instance, Timetable};
use timeforge_scoring::{Evaluation, Evaluator};

use crate::statistics::StatisticsCollector;

/// Top-level scope for the entire solving process.
///
/// Holds the working timetable handed from phase to phase and a deep copy
/// of the best timetable seen so far.
pub struct SolverScope<'i> {
    instance: &'i Instance,
    evaluator: Evaluator<'i>,
    working: Option<Timetable>,
    best: Option<(Timetable, Evaluation)>,
    rng: StdRng,
    start_time: Option<Instant>,
    total_step_count: u64,
    phase_count: usize,
    statistics: Option<Arc<StatisticsCollector>>,
}

impl<'i> SolverScope<'i> {
    /// Creates a scope with an entropy-seeded generator.
    pub fn new(instance: &'i Instance) -> Self {
        Self::with_rng(instance, StdRng::from_os_rng())
    }

    /// Creates a scope whose runs are reproducible for a given seed.
    pub fn with_seed(instance: &'i Instance, seed: u64) -> Self {
        Self::with_rng(instance, StdRng::seed_from_u64(seed))
    }

    fn with_rng(instance: &'i Instance, rng: StdRng) -> Self {
        Self {
            instance,
            evaluator: Evaluator::new(instance),
            working: None,
            best: None,
            rng,
            start_time: None,
            total_step_count: 0,
            phase_count: 0,
            statistics: None,
        }
    }

    pub fn with_statistics(mut self, collector: Arc<StatisticsCollector>) -> Self {
        self.statistics = Some(collector);
        self
    }

    pub fn statistics(&self) -> Option<&Arc<StatisticsCollector>> {
        self.statistics.as_ref()
    }

    pub fn record_candidate(&self, accepted: bool) {
        if let Some(stats) = &self.statistics {
            stats.record_candidate(accepted);
        }
    }

    pub fn record_restart(&self) {
        if let Some(stats) = &self.statistics {
            stats.record_restart();
        }
    }

    pub fn record_scout(&self) {
        if let Some(stats) = &self.statistics {
            stats.record_scout();
        }
    }

    pub fn start_solving(&mut self) {
        self.start_time = Some(Instant::now());
        self.total_step_count = 0;
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.start_time.map(|t| t.elapsed())
    }

    pub fn instance(&self) -> &'i Instance {
        self.instance
    }

    pub fn evaluator(&self) -> Evaluator<'i> {
        self.evaluator
    }

    /// Evaluates a timetable and counts the evaluation.
    pub fn evaluate(&self, timetable: &Timetable) -> Evaluation {
        if let Some(stats) = &self.statistics {
            stats.record_evaluation();
        }
        self.evaluator.evaluate(timetable)
    }

    /// Counts evaluations performed outside [`SolverScope::evaluate`].
    pub fn record_evaluations(&self, count: u64) {
        if let Some(stats) = &self.statistics {
            stats.record_evaluations(count);
        }
    }

    pub fn working_timetable(&self) -> Option<&Timetable> {
        self.working.as_ref()
    }

    pub fn set_working_timetable(&mut self, timetable: Timetable) {
        self.working = Some(timetable);
    }

    pub fn take_working_timetable(&mut self) -> Option<Timetable> {
        self.working.take()
    }

    pub fn best_timetable(&self) -> Option<&Timetable> {
        self.best.as_ref().map(|(timetable, _)| timetable)
    }

    pub fn best_evaluation(&self) -> Option<Evaluation> {
        self.best.as_ref().map(|(_, evaluation)| *evaluation)
    }

    pub fn best_cost(&self) -> Option<i64> {
        self.best_evaluation().map(|e| e.cost())
    }

    /// Stores a copy of `timetable` as the new best if it beats the current one.
    ///
    /// Returns true when the best was replaced.
    pub fn update_best(&mut self, timetable: &Timetable, evaluation: Evaluation) -> bool {
        let is_better = match &self.best {
            None => true,
            Some((_, best)) => evaluation.score() > best.score(),
        };

        if is_better {
            self.best = Some((timetable.clone(), evaluation));
            if let Some(stats) = &self.statistics {
                stats.record_improvement(evaluation.score());
            }
        }
        is_better
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn increment_step_count(&mut self) -> u64 {
        self.total_step_count += 1;
        if let Some(stats) = &self.statistics {
            stats.record_step();
        }
        self.total_step_count
    }

    pub fn total_step_count(&self) -> u64 {
        self.total_step_count
    }

    /// Registers a starting phase and returns its index.
    pub fn start_phase(&mut self, phase_type: &str) -> usize {
        let index = match &self.statistics {
            Some(stats) => stats.start_phase(phase_type),
            None => self.phase_count,
        };
        self.phase_count = index + 1;
        index
    }

    /// Consumes the scope, returning the best timetable, or the working one
    /// if no phase recorded a best.
    pub fn take_best_or_working(self) -> Option<(Timetable, Evaluation)> {
        let Self {
            evaluator,
            working,
            best,
            ..
        } = self;
        best.or_else(|| {
            working.map(|timetable| {
                let evaluation = evaluator.evaluate(&timetable);
                (timetable, evaluation)
            })
        })
    }
}
