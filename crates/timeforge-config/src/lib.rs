//! Configuration system for Timeforge.
//!
//! Load solver configuration from TOML or YAML files to choose the search
//! phases and their numeric parameters without code changes.
//!
//! # Examples
//!
//! ```
//! use timeforge_config::{PhaseConfig, SolverConfig};
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     random_seed = 7
//!
//!     [[phases]]
//!     type = "construction_heuristic"
//!
//!     [[phases]]
//!     type = "bee_colony"
//!     population_size = 10
//!     max_cycles = 50
//! "#).unwrap();
//!
//! assert_eq!(config.random_seed, Some(7));
//! assert!(matches!(config.phases[1], PhaseConfig::BeeColony(ref b) if b.limit == 50));
//! ```
//!
//! Use the default pipeline when the file is missing:
//!
//! ```
//! use timeforge_config::SolverConfig;
//!
//! let config = SolverConfig::load("solver.toml").unwrap_or_default();
//! assert_eq!(config.effective_phases().len(), 2);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main solver configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolverConfig {
    /// Random seed for reproducible results. Entropy-seeded when absent.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Phases, run in order. Empty means [`SolverConfig::default_phases`].
    #[serde(default)]
    pub phases: Vec<PhaseConfig>,
}

impl SolverConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, choosing YAML for `.yaml`/`.yml`
    /// extensions and TOML otherwise.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Adds a phase configuration.
    pub fn with_phase(mut self, phase: PhaseConfig) -> Self {
        self.phases.push(phase);
        self
    }

    /// Greedy construction followed by Iterated Greedy.
    pub fn default_phases() -> Vec<PhaseConfig> {
        vec![
            PhaseConfig::ConstructionHeuristic(ConstructionHeuristicConfig::default()),
            PhaseConfig::IteratedGreedy(IteratedGreedyConfig::default()),
        ]
    }

    /// The phases to run: the configured ones, or the defaults if none.
    pub fn effective_phases(&self) -> Vec<PhaseConfig> {
        if self.phases.is_empty() {
            Self::default_phases()
        } else {
            self.phases.clone()
        }
    }

    /// Checks every numeric parameter.
    ///
    /// Counts must be positive and rates must lie in `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, phase) in self.phases.iter().enumerate() {
            phase
                .validate()
                .map_err(|reason| ConfigError::Invalid(format!("phase {index}: {reason}")))?;
        }
        Ok(())
    }
}

/// Phase configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PhaseConfig {
    /// Randomized greedy construction.
    ConstructionHeuristic(ConstructionHeuristicConfig),

    /// Destroy/rebuild local search with annealing acceptance.
    IteratedGreedy(IteratedGreedyConfig),

    /// Artificial bee colony.
    BeeColony(BeeColonyConfig),
}

impl PhaseConfig {
    fn validate(&self) -> Result<(), String> {
        match self {
            PhaseConfig::ConstructionHeuristic(c) => positive("max_attempts", c.max_attempts),
            PhaseConfig::IteratedGreedy(c) => {
                positive("iterations", c.iterations)?;
                rate("destruction_percentage", c.destruction_percentage)?;
                positive("restart_interval", c.restart_interval)?;
                positive("restart_attempts", c.restart_attempts)?;
                if let Some(acceptor) = &c.acceptor {
                    acceptor.validate()?;
                }
                Ok(())
            }
            PhaseConfig::BeeColony(c) => {
                positive("population_size", c.population_size)?;
                positive("limit", c.limit)?;
                positive("max_cycles", c.max_cycles)?;
                rate("destruction_rate", c.destruction_rate)?;
                positive("repair_attempts", c.repair_attempts)?;
                positive("construction_attempts", c.construction_attempts)
            }
        }
    }
}

fn positive(name: &str, value: u32) -> Result<(), String> {
    if value == 0 {
        Err(format!("{name} must be positive"))
    } else {
        Ok(())
    }
}

fn rate(name: &str, value: f64) -> Result<(), String> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(format!("{name} must be within [0, 1], got {value}"))
    }
}

/// Construction heuristic configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ConstructionHeuristicConfig {
    /// Full builds tried before returning the last incomplete one.
    pub max_attempts: u32,
}

impl Default for ConstructionHeuristicConfig {
    fn default() -> Self {
        Self { max_attempts: 100 }
    }
}

/// Iterated Greedy configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct IteratedGreedyConfig {
    pub iterations: u32,

    /// Share of events destroyed per iteration.
    pub destruction_percentage: f64,

    /// Iterations between restarts from a fresh greedy build.
    pub restart_interval: u32,

    /// Attempt budget of each restart build.
    pub restart_attempts: u32,

    pub acceptor: Option<SimulatedAnnealingConfig>,
}

impl Default for IteratedGreedyConfig {
    fn default() -> Self {
        Self {
            iterations: 200,
            destruction_percentage: 0.4,
            restart_interval: 50,
            restart_attempts: 50,
            acceptor: None,
        }
    }
}

/// Simulated annealing configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SimulatedAnnealingConfig {
    pub starting_temperature: f64,

    /// Multiplier applied to the temperature after every iteration.
    pub cooling_rate: f64,
}

impl Default for SimulatedAnnealingConfig {
    fn default() -> Self {
        Self {
            starting_temperature: 1000.0,
            cooling_rate: 0.95,
        }
    }
}

impl SimulatedAnnealingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.starting_temperature <= 0.0 {
            return Err("starting_temperature must be positive".to_string());
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate <= 1.0) {
            return Err(format!(
                "cooling_rate must be within (0, 1], got {}",
                self.cooling_rate
            ));
        }
        Ok(())
    }
}

/// Bee colony configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct BeeColonyConfig {
    /// Number of food sources.
    pub population_size: u32,

    /// Trials without improvement before a source is abandoned.
    pub limit: u32,

    pub max_cycles: u32,

    /// Share of events destroyed per neighbor.
    pub destruction_rate: f64,

    /// Tries per destroyed event before a partial repair is accepted.
    pub repair_attempts: u32,

    /// Attempt budget of initial and scout builds.
    pub construction_attempts: u32,

    /// Run the employed phase on the rayon thread pool.
    pub parallel: bool,
}

impl Default for BeeColonyConfig {
    fn default() -> Self {
        Self {
            population_size: 15,
            limit: 50,
            max_cycles: 200,
            destruction_rate: 0.15,
            repair_attempts: 5,
            construction_attempts: 100,
            parallel: false,
        }
    }
}
