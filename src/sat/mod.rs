pub mod bcp;
pub mod dpll;
pub mod heuristic;

use std::time::Duration;

use anyhow::{Result, bail};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Base of the Jeroslow-Wang weight; a clause of length L scores `weight^-L`.
    pub weight: f64,
    pub timeout: Option<Duration>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            weight: heuristic::DEFAULT_WEIGHT,
            timeout: None,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.weight.is_finite() && self.weight > 1.0) {
            bail!("weight must be a finite number > 1, got {}", self.weight);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverStats {
    pub decisions: usize,
    pub propagations: usize,
    pub conflicts: usize,
    pub max_depth: usize,
}
