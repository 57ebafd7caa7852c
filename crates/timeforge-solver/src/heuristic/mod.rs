//! Destroy-step heuristics.

mod ruin;

#[cfg(test)]
mod tests;

pub use ruin::{ruin, CostBiasedSelector, RandomSelector, RuinSelection, RuinSelector};
