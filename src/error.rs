//! Error types for configuration, simulation and export

/// Errors raised by the simulator library.
///
/// Degenerate life-table rows (nobody at risk) are not errors: they carry a
/// `None` conditional rate instead.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("invalid configuration: {field} = {value} ({reason})")]
    InvalidConfiguration {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl SimulationError {
    pub(crate) fn invalid(field: &'static str, value: impl ToString, reason: impl Into<String>) -> Self {
        SimulationError::InvalidConfiguration {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
