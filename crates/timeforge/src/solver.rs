//! Solver entry points that hide the phase wiring.

use tracing::{info, warn};

use timeforge_config::{ConfigError, SolverConfig};
use timeforge_core::Instance;
use timeforge_solver::{SolveResult, Solver};

/// Configuration file read by [`solve`] from the working directory.
pub const CONFIG_FILE: &str = "solver.toml";

/// Runs the configured phases on `instance`.
///
/// Fails only when the configuration is invalid; an infeasible instance
/// yields a result with hard violations instead.
pub fn run_solver(instance: &Instance, config: &SolverConfig) -> Result<SolveResult, ConfigError> {
    #[cfg(feature = "console")]
    timeforge_console::init();

    let mut solver = Solver::from_config(config)?;
    let result = solver.solve(instance);

    info!(
        event = "timetable_ready",
        allocations = result.timetable.allocations().len(),
        feasible = result.is_feasible(),
    );
    Ok(result)
}

/// Runs the solver with `solver.toml` when present, else with the default
/// construction and Iterated Greedy pipeline.
pub fn solve(instance: &Instance) -> Result<SolveResult, ConfigError> {
    let config = match SolverConfig::load(CONFIG_FILE) {
        Ok(config) => config,
        Err(ConfigError::Io(_)) => SolverConfig::default(),
        Err(err) => {
            warn!(file = CONFIG_FILE, error = %err, "ignoring unreadable solver configuration");
            SolverConfig::default()
        }
    };
    run_solver(instance, &config)
}
