//! Physiological and screening-test parameters for a simulation

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};

/// Per-cycle biology and PGT-A test characteristics
///
/// All rates are probabilities in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Frozen embryos available from one complete cycle
    pub n_embryos: u32,

    /// Probability that an embryo is aneuploid
    pub aneuploidy_rate: f64,

    /// Live birth probability for one transfer of a euploid embryo
    pub live_birth_rate: f64,

    /// Probability PGT-A flags an aneuploid embryo (sensitivity)
    pub true_positive_rate: f64,

    /// Probability PGT-A flags a euploid embryo (1 - specificity)
    pub false_positive_rate: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            n_embryos: 5,
            aneuploidy_rate: 0.4,
            live_birth_rate: 0.4,
            true_positive_rate: 0.5,
            false_positive_rate: 0.5,
        }
    }
}

impl SimulationParams {
    pub fn new(
        n_embryos: u32,
        aneuploidy_rate: f64,
        live_birth_rate: f64,
        true_positive_rate: f64,
        false_positive_rate: f64,
    ) -> Self {
        Self {
            n_embryos,
            aneuploidy_rate,
            live_birth_rate,
            true_positive_rate,
            false_positive_rate,
        }
    }

    /// Reject any rate that is not a finite probability
    pub fn validate(&self) -> Result<()> {
        check_probability("aneuploidy_rate", self.aneuploidy_rate)?;
        check_probability("live_birth_rate", self.live_birth_rate)?;
        check_probability("true_positive_rate", self.true_positive_rate)?;
        check_probability("false_positive_rate", self.false_positive_rate)?;
        Ok(())
    }

    /// Probability the screen flags an embryo with the given true status
    pub fn screen_positive_rate(&self, aneuploid: bool) -> f64 {
        if aneuploid {
            self.true_positive_rate
        } else {
            self.false_positive_rate
        }
    }
}

fn check_probability(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(SimulationError::invalid(field, value, "must be a finite number"));
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(SimulationError::invalid(field, value, "must lie in [0, 1]"));
    }
    Ok(())
}
