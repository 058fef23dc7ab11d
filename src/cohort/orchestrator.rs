//! Multi-cycle cohort orchestration
//!
//! Drives both arms through up to `num_complete_cycles` complete cycles,
//! removing individuals from the active set after their first live birth.

use log::{debug, info};
use rayon::prelude::*;

use super::individual::{initial_cohort, Individual};
use super::trajectory::{SimulationResult, TrajectoryRow};
use crate::config::{Execution, RunConfig, SimulationParams};
use crate::cycle::{Arm, CycleSimulator};
use crate::error::Result;

/// Runs screened and unscreened cohorts through repeated complete cycles
#[derive(Debug, Clone)]
pub struct CohortOrchestrator {
    simulator: CycleSimulator,
    run: RunConfig,
}

impl CohortOrchestrator {
    /// Create an orchestrator; invalid configuration is rejected before any simulation
    pub fn new(params: SimulationParams, run: RunConfig) -> Result<Self> {
        run.validate()?;
        Ok(Self {
            simulator: CycleSimulator::new(params)?,
            run,
        })
    }

    /// Simulate every cycle and collect the trajectory rows
    pub fn run(&self) -> SimulationResult {
        let mut result = SimulationResult::new(*self.simulator.params(), self.run);
        let mut active = initial_cohort(
            self.run.screened_cohort_size,
            self.run.unscreened_cohort_size,
            self.run.seed,
        );

        debug!(
            "Starting simulation: {} screened, {} unscreened, {} cycles, seed {}",
            self.run.screened_cohort_size,
            self.run.unscreened_cohort_size,
            self.run.num_complete_cycles,
            self.run.seed
        );

        for cycle in 1..=self.run.num_complete_cycles {
            if active.is_empty() {
                debug!("No active individuals left before cycle {}", cycle);
                break;
            }

            let rows = self.simulate_cycle(cycle, &mut active);
            result.extend_rows(rows);

            active.retain(|individual| !individual.live_birth);

            info!(
                "Cycle {}: {} screened and {} unscreened still without a live birth",
                cycle,
                count_arm(&active, Arm::Screened),
                count_arm(&active, Arm::Unscreened)
            );
        }

        result
    }

    /// One complete cycle for every active individual, rows in id order
    fn simulate_cycle(&self, cycle: u32, active: &mut [Individual]) -> Vec<TrajectoryRow> {
        let simulate = |individual: &mut Individual| {
            let outcome = individual.attempt_cycle(&self.simulator);
            TrajectoryRow::from_outcome(individual.id, cycle, &outcome)
        };

        match self.run.execution {
            Execution::Sequential => active.iter_mut().map(simulate).collect(),
            Execution::Parallel => active.par_iter_mut().map(simulate).collect(),
        }
    }
}

fn count_arm(active: &[Individual], arm: Arm) -> usize {
    active.iter().filter(|i| i.arm == arm).count()
}
