//! Phase-level scope.

use std::time::{Duration, Instant};

use tracing::info;

use timeforge_core::{Instance, Timetable, TimetableScore};
use timeforge_scoring::Evaluation;

use super::SolverScope;
use crate::statistics::PhaseStatistics;

/// Scope for a single phase of solving.
///
/// Creating one logs `phase_start`; [`PhaseScope::finish`] logs `phase_end`
/// and hands the counters to the statistics collector.
pub struct PhaseScope<'s, 'i> {
    solver_scope: &'s mut SolverScope<'i>,
    statistics: PhaseStatistics,
    phase_name: &'static str,
    start_time: Instant,
}

impl<'s, 'i> PhaseScope<'s, 'i> {
    /// Opens a phase. `phase_type` names the phase in statistics,
    /// `phase_name` in log events.
    pub fn new(
        solver_scope: &'s mut SolverScope<'i>,
        phase_type: &'static str,
        phase_name: &'static str,
    ) -> Self {
        let phase_index = solver_scope.start_phase(phase_type);
        let mut statistics = PhaseStatistics::new(phase_index, phase_type);
        statistics.starting_score = solver_scope.best_evaluation().map(|e| e.score());

        info!(event = "phase_start", phase = phase_name, phase_index);

        Self {
            solver_scope,
            statistics,
            phase_name,
            start_time: Instant::now(),
        }
    }

    pub fn phase_index(&self) -> usize {
        self.statistics.phase_index
    }

    pub fn starting_score(&self) -> Option<TimetableScore> {
        self.statistics.starting_score
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn step_count(&self) -> u64 {
        self.statistics.step_count
    }

    pub fn increment_step_count(&mut self) -> u64 {
        self.statistics.step_count += 1;
        self.solver_scope.increment_step_count();
        self.statistics.step_count
    }

    pub fn record_candidate(&mut self, accepted: bool) {
        self.statistics.candidates_evaluated += 1;
        if accepted {
            self.statistics.candidates_accepted += 1;
        }
        self.solver_scope.record_candidate(accepted);
    }

    pub fn record_restart(&mut self) {
        self.statistics.restarts += 1;
        self.solver_scope.record_restart();
    }

    pub fn record_scout(&mut self) {
        self.statistics.scouts += 1;
        self.solver_scope.record_scout();
    }

    pub fn solver_scope(&self) -> &SolverScope<'i> {
        self.solver_scope
    }

    pub fn solver_scope_mut(&mut self) -> &mut SolverScope<'i> {
        self.solver_scope
    }

    pub fn instance(&self) -> &'i Instance {
        self.solver_scope.instance()
    }

    pub fn evaluate(&self, timetable: &Timetable) -> Evaluation {
        self.solver_scope.evaluate(timetable)
    }

    pub fn best_cost(&self) -> Option<i64> {
        self.solver_scope.best_cost()
    }

    pub fn best_score(&self) -> Option<TimetableScore> {
        self.solver_scope.best_evaluation().map(|e| e.score())
    }

    pub fn update_best(&mut self, timetable: &Timetable, evaluation: Evaluation) -> bool {
        self.solver_scope.update_best(timetable, evaluation)
    }

    /// Closes the phase and returns its statistics.
    pub fn finish(mut self) -> PhaseStatistics {
        let duration = self.start_time.elapsed();
        let steps = self.statistics.step_count;
        let speed = if duration.as_secs_f64() > 0.0 {
            (steps as f64 / duration.as_secs_f64()) as u64
        } else {
            0
        };
        self.statistics.duration = duration;
        self.statistics.ending_score = self.solver_scope.best_evaluation().map(|e| e.score());

        let score = self
            .statistics
            .ending_score
            .map(|s| s.to_string())
            .unwrap_or_else(|| "none".to_string());
        info!(
            event = "phase_end",
            phase = self.phase_name,
            phase_index = self.statistics.phase_index,
            duration_ms = duration.as_millis() as u64,
            steps,
            speed,
            score,
        );

        if let Some(stats) = self.solver_scope.statistics() {
            stats.end_phase(self.statistics.clone());
        }
        self.statistics
    }
}
