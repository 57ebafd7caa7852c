//! Solver statistics collection and reporting.
//!
//! Tracks candidate counts, restarts, scouts, timing and the best-score
//! history of a run.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use timeforge_core::TimetableScore;

/// Statistics for a single solver phase.
#[derive(Debug, Clone)]
pub struct PhaseStatistics {
    /// Index of this phase (0-based).
    pub phase_index: usize,
    /// Type name of the phase (e.g., "IteratedGreedy", "BeeColony").
    pub phase_type: String,
    pub duration: Duration,
    /// Iterations or cycles completed.
    pub step_count: u64,
    /// Rebuilt or perturbed timetables that were evaluated.
    pub candidates_evaluated: u64,
    /// Candidates that replaced the current timetable or food source.
    pub candidates_accepted: u64,
    pub restarts: u64,
    pub scouts: u64,
    /// Best score when the phase started, if one existed.
    pub starting_score: Option<TimetableScore>,
    pub ending_score: Option<TimetableScore>,
}

impl PhaseStatistics {
    /// Creates empty phase statistics.
    pub fn new(phase_index: usize, phase_type: impl Into<String>) -> Self {
        Self {
            phase_index,
            phase_type: phase_type.into(),
            duration: Duration::ZERO,
            step_count: 0,
            candidates_evaluated: 0,
            candidates_accepted: 0,
            restarts: 0,
            scouts: 0,
            starting_score: None,
            ending_score: None,
        }
    }

    /// Returns the acceptance rate (accepted / evaluated).
    pub fn acceptance_rate(&self) -> f64 {
        if self.candidates_evaluated == 0 {
            0.0
        } else {
            self.candidates_accepted as f64 / self.candidates_evaluated as f64
        }
    }

    pub fn candidates_rejected(&self) -> u64 {
        self.candidates_evaluated - self.candidates_accepted
    }

    /// Returns the average time per step.
    pub fn avg_time_per_step(&self) -> Duration {
        if self.step_count == 0 {
            Duration::ZERO
        } else {
            self.duration / self.step_count as u32
        }
    }
}

/// Record of a best-score improvement.
#[derive(Debug, Clone)]
pub struct ScoreImprovement {
    /// Time since solving started when improvement occurred.
    pub time_offset: Duration,
    /// Step number when improvement occurred.
    pub step_count: u64,
    pub score: TimetableScore,
}

/// Complete statistics for a solver run.
#[derive(Debug, Clone, Default)]
pub struct SolverStatistics {
    pub total_duration: Duration,
    pub total_step_count: u64,
    pub total_candidates_evaluated: u64,
    pub total_candidates_accepted: u64,
    pub total_restarts: u64,
    pub total_scouts: u64,
    /// Number of full evaluations performed.
    pub evaluation_count: u64,
    pub phase_statistics: Vec<PhaseStatistics>,
    /// Every time the best score improved, in order. Costs never increase.
    pub score_history: Vec<ScoreImprovement>,
}

impl SolverStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the overall acceptance rate.
    pub fn acceptance_rate(&self) -> f64 {
        if self.total_candidates_evaluated == 0 {
            0.0
        } else {
            self.total_candidates_accepted as f64 / self.total_candidates_evaluated as f64
        }
    }

    pub fn phase_count(&self) -> usize {
        self.phase_statistics.len()
    }

    /// Returns the best score achieved (last in history, or None).
    pub fn best_score(&self) -> Option<&TimetableScore> {
        self.score_history.last().map(|s| &s.score)
    }

    pub fn improvement_count(&self) -> usize {
        self.score_history.len()
    }

    /// Best cost after each improvement.
    pub fn cost_history(&self) -> impl Iterator<Item = i64> + '_ {
        self.score_history.iter().map(|s| s.score.cost())
    }
}

/// Thread-safe collector for solver statistics.
///
/// Record events during solving, then call [`into_statistics`] to get the
/// final [`SolverStatistics`].
///
/// [`into_statistics`]: StatisticsCollector::into_statistics
#[derive(Debug)]
pub struct StatisticsCollector {
    start_time: Instant,
    candidates_evaluated: AtomicU64,
    candidates_accepted: AtomicU64,
    restarts: AtomicU64,
    scouts: AtomicU64,
    step_count: AtomicU64,
    evaluations: AtomicU64,
    phases: Mutex<Vec<PhaseStatistics>>,
    score_history: Mutex<Vec<ScoreImprovement>>,
}

impl StatisticsCollector {
    /// Creates a new collector. The start time is recorded when this is called.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            candidates_evaluated: AtomicU64::new(0),
            candidates_accepted: AtomicU64::new(0),
            restarts: AtomicU64::new(0),
            scouts: AtomicU64::new(0),
            step_count: AtomicU64::new(0),
            evaluations: AtomicU64::new(0),
            phases: Mutex::new(Vec::new()),
            score_history: Mutex::new(Vec::new()),
        }
    }

    /// Records an evaluated candidate and whether it was accepted.
    pub fn record_candidate(&self, accepted: bool) {
        self.candidates_evaluated.fetch_add(1, Ordering::Relaxed);
        if accepted {
            self.candidates_accepted.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_restart(&self) {
        self.restarts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_scout(&self) {
        self.scouts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_step(&self) {
        self.step_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_evaluation(&self) {
        self.record_evaluations(1);
    }

    /// Records evaluations performed off the solver thread.
    pub fn record_evaluations(&self, count: u64) {
        self.evaluations.fetch_add(count, Ordering::Relaxed);
    }

    /// Records a new best score.
    pub fn record_improvement(&self, score: TimetableScore) {
        let improvement = ScoreImprovement {
            time_offset: self.start_time.elapsed(),
            step_count: self.step_count.load(Ordering::Relaxed),
            score,
        };
        self.score_history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(improvement);
    }

    /// Starts a new phase and returns its index.
    pub fn start_phase(&self, phase_type: impl Into<String>) -> usize {
        let mut phases = self.phases.lock().unwrap_or_else(PoisonError::into_inner);
        let index = phases.len();
        phases.push(PhaseStatistics::new(index, phase_type));
        index
    }

    /// Replaces the statistics of a started phase.
    pub fn end_phase(&self, statistics: PhaseStatistics) {
        let mut phases = self.phases.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(phase) = phases.get_mut(statistics.phase_index) {
            *phase = statistics;
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn current_step_count(&self) -> u64 {
        self.step_count.load(Ordering::Relaxed)
    }

    pub fn current_candidates_evaluated(&self) -> u64 {
        self.candidates_evaluated.load(Ordering::Relaxed)
    }

    pub fn current_candidates_accepted(&self) -> u64 {
        self.candidates_accepted.load(Ordering::Relaxed)
    }

    pub fn current_evaluations(&self) -> u64 {
        self.evaluations.load(Ordering::Relaxed)
    }

    /// Converts this collector into final statistics.
    pub fn into_statistics(self) -> SolverStatistics {
        SolverStatistics {
            total_duration: self.start_time.elapsed(),
            total_step_count: self.step_count.into_inner(),
            total_candidates_evaluated: self.candidates_evaluated.into_inner(),
            total_candidates_accepted: self.candidates_accepted.into_inner(),
            total_restarts: self.restarts.into_inner(),
            total_scouts: self.scouts.into_inner(),
            evaluation_count: self.evaluations.into_inner(),
            phase_statistics: self
                .phases
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner),
            score_history: self
                .score_history
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner),
        }
    }

    /// Takes a snapshot of current statistics without consuming the collector.
    pub fn snapshot(&self) -> SolverStatistics {
        SolverStatistics {
            total_duration: self.start_time.elapsed(),
            total_step_count: self.step_count.load(Ordering::Relaxed),
            total_candidates_evaluated: self.candidates_evaluated.load(Ordering::Relaxed),
            total_candidates_accepted: self.candidates_accepted.load(Ordering::Relaxed),
            total_restarts: self.restarts.load(Ordering::Relaxed),
            total_scouts: self.scouts.load(Ordering::Relaxed),
            evaluation_count: self.evaluations.load(Ordering::Relaxed),
            phase_statistics: self
                .phases
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
            score_history: self
                .score_history
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        }
    }
}

impl Default for StatisticsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_statistics_new() {
        let stats = PhaseStatistics::new(0, "ConstructionHeuristic");
        assert_eq!(stats.phase_index, 0);
        assert_eq!(stats.phase_type, "ConstructionHeuristic");
        assert_eq!(stats.step_count, 0);
        assert_eq!(stats.acceptance_rate(), 0.0);
    }

    #[test]
    fn test_phase_statistics_acceptance_rate() {
        let mut stats = PhaseStatistics::new(1, "IteratedGreedy");
        stats.candidates_evaluated = 100;
        stats.candidates_accepted = 25;
        assert!((stats.acceptance_rate() - 0.25).abs() < f64::EPSILON);
        assert_eq!(stats.candidates_rejected(), 75);
    }

    #[test]
    fn test_collector_record_candidate() {
        let collector = StatisticsCollector::new();

        collector.record_candidate(true);
        collector.record_candidate(false);
        collector.record_candidate(true);

        assert_eq!(collector.current_candidates_evaluated(), 3);
        assert_eq!(collector.current_candidates_accepted(), 2);
    }

    #[test]
    fn test_collector_record_improvement() {
        let collector = StatisticsCollector::new();

        collector.record_improvement(TimetableScore::of(-2, -5));
        collector.record_improvement(TimetableScore::of(0, -30));
        collector.record_improvement(TimetableScore::of(0, -4));

        let stats = collector.into_statistics();
        assert_eq!(stats.improvement_count(), 3);
        assert_eq!(*stats.best_score().unwrap(), TimetableScore::of(0, -4));
        assert_eq!(stats.cost_history().collect::<Vec<_>>(), vec![2005, 30, 4]);
    }

    #[test]
    fn test_collector_phases() {
        let collector = StatisticsCollector::new();

        let first = collector.start_phase("ConstructionHeuristic");
        let second = collector.start_phase("BeeColony");
        assert_eq!((first, second), (0, 1));

        let mut ended = PhaseStatistics::new(second, "BeeColony");
        ended.step_count = 12;
        ended.scouts = 2;
        collector.end_phase(ended);
        collector.record_restart();
        collector.record_scout();

        let stats = collector.snapshot();
        assert_eq!(stats.phase_count(), 2);
        assert_eq!(stats.phase_statistics[1].step_count, 12);
        assert_eq!(stats.phase_statistics[1].scouts, 2);
        assert_eq!(stats.phase_statistics[0].step_count, 0);
        assert_eq!(stats.total_restarts, 1);
        assert_eq!(stats.total_scouts, 1);
    }
}
