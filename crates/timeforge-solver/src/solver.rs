//! Solver implementation.

use std::fmt::Debug;
use std::sync::Arc;

use tracing::info;

use timeforge_config::{ConfigError, SolverConfig};
use timeforge_core::{Instance, Timetable};
use timeforge_scoring::{Evaluation, Evaluator};

use crate::builder::PhaseBuilder;
use crate::phase::{ConstructionPhase, Phase};
use crate::scope::SolverScope;
use crate::statistics::{SolverStatistics, StatisticsCollector};

/// Outcome of a solver run.
#[derive(Debug, Clone)]
pub struct SolveResult {
    /// Best timetable found; possibly incomplete, check `evaluation`.
    pub timetable: Timetable,
    pub evaluation: Evaluation,
    pub statistics: SolverStatistics,
}

impl SolveResult {
    pub fn is_feasible(&self) -> bool {
        self.evaluation.is_feasible()
    }

    pub fn cost(&self) -> i64 {
        self.evaluation.cost()
    }
}

/// Runs phases in order over one instance.
///
/// # Example
///
/// ```
/// use timeforge_core::Instance;
/// use timeforge_solver::{ConstructionPhase, IteratedGreedyPhase, Solver};
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
/// let mut solver = Solver::new(vec![
///     Box::new(ConstructionPhase::default()),
///     Box::new(IteratedGreedyPhase::new(10, 0.5)),
/// ])
/// .with_random_seed(42);
///
/// let result = solver.solve(&instance);
/// assert!(result.is_feasible());
/// assert_eq!(result.statistics.phase_count(), 2);
/// ```
pub struct Solver {
    phases: Vec<Box<dyn Phase>>,
    random_seed: Option<u64>,
}

impl Debug for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solver")
            .field("phases", &self.phases)
            .field("random_seed", &self.random_seed)
            .finish()
    }
}

impl Solver {
    pub fn new(phases: Vec<Box<dyn Phase>>) -> Self {
        Self {
            phases,
            random_seed: None,
        }
    }

    /// Builds a solver from configuration, after validating it.
    pub fn from_config(config: &SolverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            phases: PhaseBuilder::build_all(&config.effective_phases()),
            random_seed: config.random_seed,
        })
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_phase(mut self, phase: impl Phase + 'static) -> Self {
        self.phases.push(Box::new(phase));
        self
    }

    pub fn phases(&self) -> &[Box<dyn Phase>] {
        &self.phases
    }

    pub fn random_seed(&self) -> Option<u64> {
        self.random_seed
    }

    /// Runs every phase and returns the best timetable seen.
    pub fn solve(&mut self, instance: &Instance) -> SolveResult {
        let collector = Arc::new(StatisticsCollector::new());
        let scope = match self.random_seed {
            Some(seed) => SolverScope::with_seed(instance, seed),
            None => SolverScope::new(instance),
        };
        let mut solver_scope = scope.with_statistics(collector.clone());
        solver_scope.start_solving();

        info!(
            event = "solve_start",
            event_count = instance.event_count(),
            slot_count = instance.slot_count(),
            phases = self.phases.len(),
            seed = ?self.random_seed,
        );

        for phase in &mut self.phases {
            phase.solve(&mut solver_scope);
        }
        if solver_scope.best_timetable().is_none() && solver_scope.working_timetable().is_none() {
            ConstructionPhase::default().solve(&mut solver_scope);
        }

        let (timetable, evaluation) = solver_scope.take_best_or_working().unwrap_or_else(|| {
            let timetable = Timetable::new(instance);
            let evaluation = Evaluator::new(instance).evaluate(&timetable);
            (timetable, evaluation)
        });

        let statistics = Arc::try_unwrap(collector)
            .map(StatisticsCollector::into_statistics)
            .unwrap_or_else(|shared| shared.snapshot());

        info!(
            event = "solve_end",
            score = %evaluation.score(),
            steps = statistics.total_step_count,
            candidates_evaluated = statistics.total_candidates_evaluated,
            duration_ms = statistics.total_duration.as_millis() as u64,
        );

        SolveResult {
            timetable,
            evaluation,
            statistics,
        }
    }
}

impl Default for Solver {
    /// Construction followed by Iterated Greedy.
    fn default() -> Self {
        Self::new(PhaseBuilder::build_all(&SolverConfig::default_phases()))
    }
}

#[cfg(test)]
#[path = "solver_tests.rs"]
mod tests;
