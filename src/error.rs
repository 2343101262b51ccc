//! Error types for Trueno-Compare
//!
//! Errors only exist at the ingestion and configuration boundary. Selection,
//! ranking and grouping operations never fail: invalid references are ignored.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Trueno-Compare error types
#[derive(Error, Debug)]
pub enum Error {
    /// Experiment is not present in the catalog
    #[error("Unknown experiment: {0}")]
    UnknownExperiment(String),

    /// Run attached to a repetition slot the experiment does not declare
    #[error(
        "Repetition {repetition_number} out of range for experiment {experiment_id} \
         (declares {repetitions} repetitions)"
    )]
    RepetitionOutOfRange {
        /// Experiment the run was attached to
        experiment_id: String,
        /// Offending 1-based repetition number
        repetition_number: u32,
        /// Number of repetitions the experiment declares
        repetitions: u32,
    },

    /// Invalid input from a collaborator
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid comparison configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
