//! Repetition - one numbered execution slot of an experiment

use serde::{Deserialize, Serialize};

use super::{AnnotationRecord, RunRecord};

/// A numbered execution slot within an experiment.
///
/// Repetition numbers are 1-based. The slot carries a run once the
/// repetition has completed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Repetition {
    experiment_id: String,
    repetition_number: u32,
    run: Option<RunRecord>,
}

impl Repetition {
    /// Create an empty slot (no completed run yet).
    #[must_use]
    pub fn pending(experiment_id: impl Into<String>, repetition_number: u32) -> Self {
        Self {
            experiment_id: experiment_id.into(),
            repetition_number,
            run: None,
        }
    }

    /// Create a slot filled by a completed run.
    #[must_use]
    pub fn completed(experiment_id: impl Into<String>, run: RunRecord) -> Self {
        Self {
            experiment_id: experiment_id.into(),
            repetition_number: run.repetition_number(),
            run: Some(run),
        }
    }

    /// Get the owning experiment ID.
    #[must_use]
    pub fn experiment_id(&self) -> &str {
        &self.experiment_id
    }

    /// Get the 1-based repetition number.
    #[must_use]
    pub const fn repetition_number(&self) -> u32 {
        self.repetition_number
    }

    /// Get the completed run, if any.
    #[must_use]
    pub const fn run(&self) -> Option<&RunRecord> {
        self.run.as_ref()
    }

    /// Look up an annotation on the run. `None` when there is no run or the
    /// run carries no annotation of that name.
    #[must_use]
    pub fn annotation(&self, name: &str) -> Option<&AnnotationRecord> {
        self.run.as_ref().and_then(|run| run.annotation(name))
    }

    pub(crate) fn attach(&mut self, run: RunRecord) {
        self.run = Some(run);
    }
}
