//! Scenario runner: simulation followed by both life tables
//!
//! Validates configuration once, then runs the full pipeline for one
//! parameter set or for a sweep of parameter sets.

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cohort::{CohortOrchestrator, SimulationResult};
use crate::config::{RunConfig, ScenarioConfig, SimulationParams};
use crate::cycle::Arm;
use crate::error::Result;
use crate::lifetable::{build_life_table, LifeTable, LifeTableIndex};

/// Full pipeline output for one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutput {
    pub simulation: SimulationResult,

    /// Life table indexed by cumulative embryo transfers
    pub by_transfer: LifeTable,

    /// Life table indexed by cumulative complete cycles
    pub by_cycle: LifeTable,
}

/// Headline comparison of the two arms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmComparison {
    /// Cumulative live-birth rate after all complete cycles, per arm
    pub screened_clbr: f64,
    pub unscreened_clbr: f64,

    /// Mean transfers per live birth, `None` without live births
    pub screened_transfers_per_live_birth: Option<f64>,
    pub unscreened_transfers_per_live_birth: Option<f64>,
}

impl ArmComparison {
    /// Screened minus unscreened cumulative live-birth rate
    pub fn clbr_difference(&self) -> f64 {
        self.screened_clbr - self.unscreened_clbr
    }
}

impl ScenarioOutput {
    pub fn table(&self, index: LifeTableIndex) -> &LifeTable {
        match index {
            LifeTableIndex::Transfers => &self.by_transfer,
            LifeTableIndex::CompleteCycles => &self.by_cycle,
        }
    }

    pub fn comparison(&self) -> ArmComparison {
        ArmComparison {
            screened_clbr: self.by_cycle.final_cumulative_rate(Arm::Screened),
            unscreened_clbr: self.by_cycle.final_cumulative_rate(Arm::Unscreened),
            screened_transfers_per_live_birth: self.transfers_per_live_birth(Arm::Screened),
            unscreened_transfers_per_live_birth: self.transfers_per_live_birth(Arm::Unscreened),
        }
    }

    fn transfers_per_live_birth(&self, arm: Arm) -> Option<f64> {
        let births = self.simulation.live_births(arm);
        if births == 0 {
            return None;
        }
        let transfers: u64 = self
            .simulation
            .rows_for(arm)
            .map(|r| r.embryos_transferred as u64)
            .sum();
        Some(transfers as f64 / births as f64)
    }
}

/// Validated scenario, ready to run any number of times
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    orchestrator: CohortOrchestrator,
}

impl ScenarioRunner {
    /// Validate the whole configuration before anything is simulated
    pub fn new(config: ScenarioConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            orchestrator: CohortOrchestrator::new(config.params, config.run)?,
        })
    }

    /// Simulate, then aggregate once the trajectory is complete
    pub fn run(&self) -> ScenarioOutput {
        let simulation = self.orchestrator.run();
        info!("Simulated {} trajectory rows", simulation.rows.len());

        let by_transfer = build_life_table(&simulation, LifeTableIndex::Transfers);
        let by_cycle = build_life_table(&simulation, LifeTableIndex::CompleteCycles);

        ScenarioOutput {
            simulation,
            by_transfer,
            by_cycle,
        }
    }
}

/// Run the same cohort settings over several parameter sets in parallel
///
/// Any invalid parameter set aborts the sweep before simulation starts.
pub fn run_sweep(param_sets: &[SimulationParams], run: RunConfig) -> Result<Vec<ScenarioOutput>> {
    let runners = param_sets
        .iter()
        .map(|&params| ScenarioRunner::new(ScenarioConfig::new(params, run)))
        .collect::<Result<Vec<_>>>()?;

    Ok(runners.par_iter().map(|runner| runner.run()).collect())
}
