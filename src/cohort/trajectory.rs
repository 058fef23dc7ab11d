//! Trajectory output: one row per individual per complete cycle attempted

use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::config::{RunConfig, SimulationParams};
use crate::cycle::{Arm, CycleOutcome};
use crate::error::Result;

/// Outcome of one complete cycle for one individual
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrajectoryRow {
    pub individual_id: u64,
    pub arm: Arm,

    /// Complete cycle number (1-indexed)
    pub complete_cycle: u32,

    pub embryos_created: u32,
    pub embryos_screened_out: u32,
    pub embryos_transferred: u32,
    pub live_birth: bool,
}

impl TrajectoryRow {
    pub fn from_outcome(individual_id: u64, complete_cycle: u32, outcome: &CycleOutcome) -> Self {
        Self {
            individual_id,
            arm: outcome.arm,
            complete_cycle,
            embryos_created: outcome.embryos_created(),
            embryos_screened_out: outcome.screened_out(),
            embryos_transferred: outcome.embryos_transferred,
            live_birth: outcome.live_birth,
        }
    }
}

/// Raw output of a cohort simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub params: SimulationParams,
    pub run: RunConfig,

    /// Rows ordered by cycle, then by individual id
    pub rows: Vec<TrajectoryRow>,
}

impl SimulationResult {
    pub fn new(params: SimulationParams, run: RunConfig) -> Self {
        Self {
            params,
            run,
            rows: Vec::new(),
        }
    }

    /// Append a cycle's rows
    pub fn extend_rows(&mut self, rows: Vec<TrajectoryRow>) {
        self.rows.extend(rows);
    }

    /// Starting size of an arm, independent of how many rows it produced
    pub fn cohort_size(&self, arm: Arm) -> usize {
        match arm {
            Arm::Screened => self.run.screened_cohort_size,
            Arm::Unscreened => self.run.unscreened_cohort_size,
        }
    }

    pub fn rows_for(&self, arm: Arm) -> impl Iterator<Item = &TrajectoryRow> {
        self.rows.iter().filter(move |r| r.arm == arm)
    }

    /// Individuals of `arm` simulated in complete cycle `cycle`
    pub fn active_in_cycle(&self, arm: Arm, cycle: u32) -> usize {
        self.rows_for(arm).filter(|r| r.complete_cycle == cycle).count()
    }

    pub fn live_births(&self, arm: Arm) -> usize {
        self.rows_for(arm).filter(|r| r.live_birth).count()
    }

    /// Write all rows as CSV
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in &self.rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}
