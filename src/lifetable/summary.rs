//! Collapse per-cycle trajectory rows into one summary per individual

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::cohort::TrajectoryRow;
use crate::cycle::Arm;

/// Dimension a life table is indexed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeTableIndex {
    /// Cumulative embryo transfers across all cycles
    Transfers,
    /// Cumulative complete cycles attempted
    CompleteCycles,
}

impl LifeTableIndex {
    /// Column name for the index in exported tables
    pub fn column_name(self) -> &'static str {
        match self {
            LifeTableIndex::Transfers => "et_n",
            LifeTableIndex::CompleteCycles => "complete_n",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            LifeTableIndex::Transfers => "embryo transfer",
            LifeTableIndex::CompleteCycles => "complete cycle",
        }
    }
}

impl fmt::Display for LifeTableIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// An individual's whole history reduced to a terminal index and outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndividualSummary {
    pub individual_id: u64,
    pub arm: Arm,

    /// Transfers summed over cycles, or the last cycle reached
    pub terminal_index: u32,

    /// Whether any cycle ended in a live birth
    pub live_birth: bool,
}

/// Summarize every individual appearing in `rows`, ordered by id
pub fn summarize<'a, I>(rows: I, index: LifeTableIndex) -> Vec<IndividualSummary>
where
    I: IntoIterator<Item = &'a TrajectoryRow>,
{
    let mut by_id: BTreeMap<u64, IndividualSummary> = BTreeMap::new();

    for row in rows {
        let summary = by_id.entry(row.individual_id).or_insert(IndividualSummary {
            individual_id: row.individual_id,
            arm: row.arm,
            terminal_index: 0,
            live_birth: false,
        });

        match index {
            LifeTableIndex::Transfers => summary.terminal_index += row.embryos_transferred,
            LifeTableIndex::CompleteCycles => {
                summary.terminal_index = summary.terminal_index.max(row.complete_cycle)
            }
        }
        summary.live_birth |= row.live_birth;
    }

    by_id.into_values().collect()
}
