//! Run parameters: cohort sizes, cycle budget, seeding and execution mode

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};

/// How individuals within one complete cycle are simulated
///
/// Both modes give identical results because every individual owns its
/// own random stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Execution {
    #[default]
    Sequential,
    Parallel,
}

/// Configuration for a cohort simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Maximum number of complete cycles per individual
    pub num_complete_cycles: u32,

    /// Starting size of the PGT-A arm
    pub screened_cohort_size: usize,

    /// Starting size of the no-PGT arm
    pub unscreened_cohort_size: usize,

    /// Base seed for every individual's random stream
    pub seed: u64,

    pub execution: Execution,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            num_complete_cycles: 3,
            screened_cohort_size: 5000,
            unscreened_cohort_size: 5000,
            seed: 42,
            execution: Execution::Sequential,
        }
    }
}

impl RunConfig {
    pub fn new(num_complete_cycles: u32, screened_cohort_size: usize, unscreened_cohort_size: usize) -> Self {
        Self {
            num_complete_cycles,
            screened_cohort_size,
            unscreened_cohort_size,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_complete_cycles == 0 {
            return Err(SimulationError::invalid(
                "num_complete_cycles",
                self.num_complete_cycles,
                "at least one complete cycle is required",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_run_matches_dashboard() {
        let run = RunConfig::default();
        assert_eq!(run.num_complete_cycles, 3);
        assert_eq!(run.screened_cohort_size, 5000);
        assert_eq!(run.unscreened_cohort_size, 5000);
        assert!(run.validate().is_ok());
    }

    #[test]
    fn test_zero_cycles_rejected() {
        let run = RunConfig::new(0, 10, 10);
        match run.validate() {
            Err(SimulationError::InvalidConfiguration { field, .. }) => {
                assert_eq!(field, "num_complete_cycles")
            }
            other => panic!("expected invalid configuration, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_cohorts_allowed() {
        assert!(RunConfig::new(1, 0, 0).validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let run = RunConfig::new(2, 5, 6)
            .with_seed(7)
            .with_execution(Execution::Parallel);
        assert_eq!(run.seed, 7);
        assert_eq!(run.execution, Execution::Parallel);
    }
}
