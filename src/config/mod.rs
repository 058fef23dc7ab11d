//! Simulation configuration: biology/test parameters and run settings

mod params;
mod run;

pub use params::SimulationParams;
pub use run::{Execution, RunConfig};

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::Result;

/// Complete scenario definition, as read from a JSON file
///
/// Missing fields fall back to their defaults, so `{}` is a valid file.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub params: SimulationParams,
    pub run: RunConfig,
}

impl ScenarioConfig {
    pub fn new(params: SimulationParams, run: RunConfig) -> Self {
        Self { params, run }
    }

    /// Load a scenario from a JSON file and validate it
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_json_reader(BufReader::new(file))
    }

    /// Load a scenario from any reader and validate it
    pub fn from_json_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let config: ScenarioConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.params.validate()?;
        self.run.validate()
    }
}
