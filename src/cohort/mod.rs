//! Cohort simulation across repeated complete cycles

mod individual;
mod orchestrator;
mod trajectory;

pub use individual::{initial_cohort, Individual};
pub use orchestrator::CohortOrchestrator;
pub use trajectory::{SimulationResult, TrajectoryRow};
