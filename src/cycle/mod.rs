//! Single complete-cycle simulation

mod embryo;
mod simulator;

pub use embryo::{Arm, CycleOutcome, Embryo};
pub use simulator::CycleSimulator;
