//! PGT-A Simulator - Monte Carlo estimation of cumulative live-birth rates
//!
//! This library provides:
//! - Complete-cycle simulation with optional PGT-A screening
//! - Multi-cycle cohort simulation for screened and unscreened arms
//! - Life tables indexed by embryo transfers or complete cycles
//! - A scenario runner for single runs and parameter sweeps

pub mod config;
pub mod error;
pub mod cycle;
pub mod cohort;
pub mod lifetable;
pub mod scenario;

// Re-export commonly used types
pub use config::{Execution, RunConfig, ScenarioConfig, SimulationParams};
pub use error::SimulationError;
pub use cycle::{Arm, CycleOutcome, CycleSimulator};
pub use cohort::{CohortOrchestrator, SimulationResult, TrajectoryRow};
pub use lifetable::{build_life_table, LifeTable, LifeTableIndex, LifeTableRow};
pub use scenario::{run_sweep, ArmComparison, ScenarioOutput, ScenarioRunner};
