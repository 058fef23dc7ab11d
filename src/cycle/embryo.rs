//! Embryo and complete-cycle outcome types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Treatment arm an individual belongs to for their whole history
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arm {
    /// Embryos are tested with PGT-A before transfer
    Screened,
    /// Embryos are transferred without testing
    Unscreened,
}

impl Arm {
    /// Both arms in reporting order
    pub const ALL: [Arm; 2] = [Arm::Screened, Arm::Unscreened];

    pub fn is_screened(self) -> bool {
        matches!(self, Arm::Screened)
    }

    /// Short label used in printed tables
    pub fn label(self) -> &'static str {
        match self {
            Arm::Screened => "PGT",
            Arm::Unscreened => "No PGT",
        }
    }
}

impl fmt::Display for Arm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One embryo from a complete cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embryo {
    /// True chromosomal status
    pub aneuploid: bool,

    /// PGT-A result, `None` when the embryo was not tested
    pub screen_positive: Option<bool>,
}

impl Embryo {
    /// A positive screen excludes the embryo whatever its true status
    pub fn is_transferable(&self) -> bool {
        !self.screen_positive.unwrap_or(false)
    }
}

/// Outcome of one complete cycle for one individual
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleOutcome {
    pub arm: Arm,

    /// Embryo cohort in generation order
    pub embryos: Vec<Embryo>,

    /// Embryos left after screening
    pub transfer_pool: u32,

    /// Transfers attempted before a live birth or pool exhaustion
    pub embryos_transferred: u32,

    pub live_birth: bool,
}

impl CycleOutcome {
    pub fn embryos_created(&self) -> u32 {
        self.embryos.len() as u32
    }

    pub fn aneuploid_count(&self) -> u32 {
        self.embryos.iter().filter(|e| e.aneuploid).count() as u32
    }

    /// Embryos excluded by a positive screen
    pub fn screened_out(&self) -> u32 {
        self.embryos_created() - self.transfer_pool
    }

    /// Euploid embryos excluded by a false positive
    pub fn false_positives(&self) -> u32 {
        self.embryos
            .iter()
            .filter(|e| !e.aneuploid && e.screen_positive == Some(true))
            .count() as u32
    }
}
