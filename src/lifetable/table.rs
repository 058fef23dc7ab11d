//! Right-censored cumulative incidence tables of live births

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;

use super::summary::{summarize, IndividualSummary, LifeTableIndex};
use crate::cohort::SimulationResult;
use crate::cycle::Arm;
use crate::error::Result;

/// Tolerance for floating-point invariant checks
const RATE_EPSILON: f64 = 1e-12;

/// One index value of a life table for one arm
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LifeTableRow {
    /// Cumulative transfer or complete-cycle count
    pub x: u32,
    pub arm: Arm,

    /// Individuals at risk entering `x`, including those exiting at `x`
    pub n: usize,

    /// Live births occurring exactly at `x`
    pub events: usize,

    /// `events / n`; `None` when nobody is at risk
    pub conditional_rate: Option<f64>,

    /// Live births at or before `x` over the arm's starting cohort
    pub cumulative_rate: f64,
}

impl LifeTableRow {
    /// Rows with nobody at risk carry no comparable rate
    pub fn is_degenerate(&self) -> bool {
        self.conditional_rate.is_none()
    }
}

/// Life table for both arms along one index dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeTable {
    pub index: LifeTableIndex,

    /// Screened arm rows, then unscreened, each by ascending `x`
    pub rows: Vec<LifeTableRow>,
}

/// Exits and live births sharing one terminal index
#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    exits: usize,
    events: usize,
}

/// Build the life table for `index` from a finished simulation
pub fn build_life_table(result: &SimulationResult, index: LifeTableIndex) -> LifeTable {
    let rows = Arm::ALL
        .iter()
        .flat_map(|&arm| {
            let summaries = summarize(result.rows_for(arm), index);
            arm_rows(arm, &summaries, result.cohort_size(arm))
        })
        .collect();

    LifeTable { index, rows }
}

/// Life-table rows for one arm with starting cohort size `cohort_size`
///
/// Individuals are bucketed by terminal index first, so ties at the same
/// `x` leave the risk set together.
pub fn arm_rows(arm: Arm, summaries: &[IndividualSummary], cohort_size: usize) -> Vec<LifeTableRow> {
    let mut buckets: BTreeMap<u32, Bucket> = BTreeMap::new();
    for summary in summaries.iter().filter(|s| s.arm == arm) {
        let bucket = buckets.entry(summary.terminal_index).or_default();
        bucket.exits += 1;
        if summary.live_birth {
            bucket.events += 1;
        }
    }

    let mut rows = Vec::with_capacity(buckets.len());
    let mut exited_before = 0usize;
    let mut cumulative_events = 0usize;

    for (x, bucket) in buckets {
        let n = cohort_size.saturating_sub(exited_before);
        exited_before += bucket.exits;
        cumulative_events += bucket.events;

        // x = 0 never had a transfer or cycle: it only shrinks the risk set
        if x == 0 {
            continue;
        }

        let conditional_rate = if n == 0 {
            warn!("No individuals at risk at x = {} in arm {}", x, arm);
            None
        } else {
            Some(bucket.events as f64 / n as f64)
        };

        rows.push(LifeTableRow {
            x,
            arm,
            n,
            events: bucket.events,
            conditional_rate,
            cumulative_rate: if cohort_size == 0 {
                f64::NAN
            } else {
                cumulative_events as f64 / cohort_size as f64
            },
        });
    }

    rows
}

impl LifeTable {
    pub fn rows_for(&self, arm: Arm) -> impl Iterator<Item = &LifeTableRow> {
        self.rows.iter().filter(move |r| r.arm == arm)
    }

    pub fn row_at(&self, arm: Arm, x: u32) -> Option<&LifeTableRow> {
        self.rows_for(arm).find(|r| r.x == x)
    }

    /// Cumulative live-birth rate at the last index reached, 0 if the arm has no rows
    pub fn final_cumulative_rate(&self, arm: Arm) -> f64 {
        self.rows_for(arm).last().map(|r| r.cumulative_rate).unwrap_or(0.0)
    }

    /// Step-function lookup of the cumulative rate at `x`
    pub fn cumulative_rate_at(&self, arm: Arm, x: u32) -> f64 {
        self.rows_for(arm)
            .take_while(|r| r.x <= x)
            .last()
            .map(|r| r.cumulative_rate)
            .unwrap_or(0.0)
    }

    /// Describe every broken life-table invariant; empty when the table is sound
    pub fn check_invariants(&self) -> Vec<String> {
        let mut violations = Vec::new();

        for arm in Arm::ALL {
            let mut prior: Option<&LifeTableRow> = None;
            for row in self.rows_for(arm) {
                if row.events > row.n {
                    violations.push(format!("{} x={}: events {} exceed at-risk {}", arm, row.x, row.events, row.n));
                }
                if !(-RATE_EPSILON..=1.0 + RATE_EPSILON).contains(&row.cumulative_rate) {
                    violations.push(format!("{} x={}: cumulative rate {} outside [0, 1]", arm, row.x, row.cumulative_rate));
                }
                if let Some(prev) = prior {
                    if row.x <= prev.x {
                        violations.push(format!("{} x={}: index not ascending after {}", arm, row.x, prev.x));
                    }
                    if row.n > prev.n {
                        violations.push(format!("{} x={}: at-risk {} grew from {}", arm, row.x, row.n, prev.n));
                    }
                    if row.cumulative_rate + RATE_EPSILON < prev.cumulative_rate {
                        violations.push(format!(
                            "{} x={}: cumulative rate fell from {} to {}",
                            arm, row.x, prev.cumulative_rate, row.cumulative_rate
                        ));
                    }
                }
                prior = Some(row);
            }
        }

        violations
    }

    /// Write the table as CSV, naming the index column after the dimension
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
        csv_writer.write_record([
            self.index.column_name(),
            "arm",
            "n",
            "events",
            "conditional_rate",
            "cumulative_rate",
        ])?;
        for row in &self.rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}
