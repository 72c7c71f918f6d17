//! Simulation errors.

use thiserror::Error;

/// Error returned by the Monte-Carlo driver.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// No histogram factory was supplied.
    #[error("create new stat function not specified")]
    MissingFactory,

    /// A configuration value is out of range.
    #[error("invalid simulation config: {0}")]
    InvalidConfig(String),

    /// The merged histogram disagrees with the expected distribution.
    #[error(
        "statistics contain incorrect data: there are {observed} hits of \"{win_amount:.1}\" \
         but expected {expected} +/-{tolerance_pct}% hits"
    )]
    Assertion {
        win_amount: f64,
        observed: u64,
        expected: f64,
        tolerance_pct: f64,
    },

    /// Writing the report failed.
    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),
}
