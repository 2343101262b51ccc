//! Experiment Record - a named unit that may be run several times

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Experiment Record represents one execution group.
///
/// An experiment declares how many repetitions it runs. Repetitions are
/// numbered `1..=repetitions` and exist even before any run completes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExperimentRecord {
    experiment_id: String,
    name: String,
    repetitions: u32,
    created_at: DateTime<Utc>,
    metadata: Option<serde_json::Value>,
}

impl ExperimentRecord {
    /// Create a new experiment record.
    ///
    /// # Arguments
    ///
    /// * `experiment_id` - Unique identifier for the experiment
    /// * `repetitions` - Number of repetitions the experiment declares
    #[must_use]
    pub fn new(experiment_id: impl Into<String>, repetitions: u32) -> Self {
        let experiment_id = experiment_id.into();
        Self {
            name: experiment_id.clone(),
            experiment_id,
            repetitions,
            created_at: Utc::now(),
            metadata: None,
        }
    }

    /// Create a builder for constructing an experiment record with optional fields.
    #[must_use]
    pub fn builder(experiment_id: impl Into<String>, repetitions: u32) -> ExperimentRecordBuilder {
        ExperimentRecordBuilder::new(experiment_id, repetitions)
    }

    /// Get the experiment ID.
    #[must_use]
    pub fn experiment_id(&self) -> &str {
        &self.experiment_id
    }

    /// Get the display name. Defaults to the experiment ID.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the declared repetition count.
    #[must_use]
    pub const fn repetitions(&self) -> u32 {
        self.repetitions
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Get the experiment metadata, if any.
    #[must_use]
    pub const fn metadata(&self) -> Option<&serde_json::Value> {
        self.metadata.as_ref()
    }
}

/// Builder for `ExperimentRecord`.
#[derive(Debug)]
pub struct ExperimentRecordBuilder {
    experiment_id: String,
    name: Option<String>,
    repetitions: u32,
    created_at: DateTime<Utc>,
    metadata: Option<serde_json::Value>,
}

impl ExperimentRecordBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(experiment_id: impl Into<String>, repetitions: u32) -> Self {
        Self {
            experiment_id: experiment_id.into(),
            name: None,
            repetitions,
            created_at: Utc::now(),
            metadata: None,
        }
    }

    /// Set a human-readable name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the experiment metadata.
    #[must_use]
    pub fn metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Set a custom creation timestamp (useful for deserialization/testing).
    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Build the `ExperimentRecord`.
    #[must_use]
    pub fn build(self) -> ExperimentRecord {
        ExperimentRecord {
            name: self.name.unwrap_or_else(|| self.experiment_id.clone()),
            experiment_id: self.experiment_id,
            repetitions: self.repetitions,
            created_at: self.created_at,
            metadata: self.metadata,
        }
    }
}
