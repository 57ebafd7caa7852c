//! Builder module for constructing solver components from configuration
//!
//! This module provides the wiring between configuration types and
//! the phase implementations.

use timeforge_config::{
    BeeColonyConfig, ConstructionHeuristicConfig, IteratedGreedyConfig, PhaseConfig,
    SimulatedAnnealingConfig,
};

use crate::construction::{GreedyConstructor, RepairPolicy};
use crate::phase::{
    BeeColonyPhase, ConstructionPhase, IteratedGreedyPhase, Phase, SimulatedAnnealingAcceptor,
};

/// Builder for constructing acceptors from configuration.
pub struct AcceptorBuilder;

impl AcceptorBuilder {
    pub fn build(config: &SimulatedAnnealingConfig) -> SimulatedAnnealingAcceptor {
        SimulatedAnnealingAcceptor::new(config.starting_temperature, config.cooling_rate)
    }
}

/// Builder for constructing phases from configuration.
pub struct PhaseBuilder;

impl PhaseBuilder {
    pub fn build(config: &PhaseConfig) -> Box<dyn Phase> {
        match config {
            PhaseConfig::ConstructionHeuristic(c) => Box::new(Self::construction(c)),
            PhaseConfig::IteratedGreedy(c) => Box::new(Self::iterated_greedy(c)),
            PhaseConfig::BeeColony(c) => Box::new(Self::bee_colony(c)),
        }
    }

    pub fn build_all(configs: &[PhaseConfig]) -> Vec<Box<dyn Phase>> {
        configs.iter().map(Self::build).collect()
    }

    pub fn construction(config: &ConstructionHeuristicConfig) -> ConstructionPhase {
        ConstructionPhase::new(GreedyConstructor::new(config.max_attempts))
    }

    pub fn iterated_greedy(config: &IteratedGreedyConfig) -> IteratedGreedyPhase {
        let acceptor = config
            .acceptor
            .as_ref()
            .map(AcceptorBuilder::build)
            .unwrap_or_default();
        IteratedGreedyPhase::new(config.iterations, config.destruction_percentage)
            .with_restart(config.restart_interval, config.restart_attempts)
            .with_acceptor(acceptor)
    }

    pub fn bee_colony(config: &BeeColonyConfig) -> BeeColonyPhase {
        BeeColonyPhase::new(
            config.population_size as usize,
            config.limit,
            config.max_cycles,
            config.destruction_rate,
        )
        .with_repair(RepairPolicy::new(config.repair_attempts))
        .with_constructor(GreedyConstructor::new(config.construction_attempts))
        .with_parallel(config.parallel)
    }
}
