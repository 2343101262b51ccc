//! Run Record - completed result of one repetition

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::AnnotationRecord;

/// Run Record represents the completed execution of one repetition.
///
/// Runs are produced externally and attached to their repetition slot by the
/// catalog. The comparison engine only reads them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunRecord {
    run_id: String,
    repetition_number: u32,
    output: Option<serde_json::Value>,
    error: Option<String>,
    trace_id: Option<String>,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    annotations: Vec<AnnotationRecord>,
}

impl RunRecord {
    /// Create a new run record with no output and no annotations.
    ///
    /// # Arguments
    ///
    /// * `run_id` - Unique identifier for the run
    /// * `repetition_number` - 1-based repetition slot the run fills
    #[must_use]
    pub fn new(run_id: impl Into<String>, repetition_number: u32) -> Self {
        Self {
            run_id: run_id.into(),
            repetition_number,
            output: None,
            error: None,
            trace_id: None,
            started_at: None,
            ended_at: None,
            annotations: Vec::new(),
        }
    }

    /// Create a builder for constructing a run record with optional fields.
    #[must_use]
    pub fn builder(run_id: impl Into<String>, repetition_number: u32) -> RunRecordBuilder {
        RunRecordBuilder::new(run_id, repetition_number)
    }

    /// Get the run ID.
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Get the repetition number this run fills.
    #[must_use]
    pub const fn repetition_number(&self) -> u32 {
        self.repetition_number
    }

    /// Get the task output, if the run produced one.
    #[must_use]
    pub const fn output(&self) -> Option<&serde_json::Value> {
        self.output.as_ref()
    }

    /// Get the error message, if the run failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Get the trace ID for opening the run's trace.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Get the start timestamp.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Get the end timestamp.
    #[must_use]
    pub const fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Wall-clock duration of the run, when both timestamps are known.
    #[must_use]
    pub fn latency(&self) -> Option<Duration> {
        match (self.started_at, self.ended_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// Get all annotations on the run.
    #[must_use]
    pub fn annotations(&self) -> &[AnnotationRecord] {
        &self.annotations
    }

    /// Look up an annotation by name.
    ///
    /// Linear search; returns the first match or `None` when the run was not
    /// evaluated by that annotator.
    #[must_use]
    pub fn annotation(&self, name: &str) -> Option<&AnnotationRecord> {
        self.annotations
            .iter()
            .find(|annotation| annotation.name() == name)
    }
}

/// Builder for `RunRecord`.
#[derive(Debug)]
pub struct RunRecordBuilder {
    run: RunRecord,
}

impl RunRecordBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(run_id: impl Into<String>, repetition_number: u32) -> Self {
        Self {
            run: RunRecord::new(run_id, repetition_number),
        }
    }

    /// Set the task output.
    #[must_use]
    pub fn output(mut self, output: serde_json::Value) -> Self {
        self.run.output = Some(output);
        self
    }

    /// Mark the run as failed with the given message.
    #[must_use]
    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.run.error = Some(error.into());
        self
    }

    /// Set the trace ID.
    #[must_use]
    pub fn trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.run.trace_id = Some(trace_id.into());
        self
    }

    /// Set start and end timestamps.
    #[must_use]
    pub const fn timing(mut self, started_at: DateTime<Utc>, ended_at: DateTime<Utc>) -> Self {
        self.run.started_at = Some(started_at);
        self.run.ended_at = Some(ended_at);
        self
    }

    /// Attach an annotation.
    #[must_use]
    pub fn annotation(mut self, annotation: AnnotationRecord) -> Self {
        self.run.annotations.push(annotation);
        self
    }

    /// Build the `RunRecord`.
    #[must_use]
    pub fn build(self) -> RunRecord {
        self.run
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_record_new() {
        let run = RunRecord::new("run-1", 2);
        assert_eq!(run.run_id(), "run-1");
        assert_eq!(run.repetition_number(), 2);
        assert!(run.annotations().is_empty());
        assert!(run.latency().is_none());
    }

    #[test]
    fn test_annotation_lookup() {
        let run = RunRecord::builder("run-1", 1)
            .annotation(AnnotationRecord::scored("accuracy", 0.9))
            .annotation(AnnotationRecord::labeled("tone", "friendly"))
            .build();

        assert_eq!(run.annotation("tone").and_then(AnnotationRecord::label), Some("friendly"));
        assert!(run.annotation("missing").is_none());
    }

    #[test]
    fn test_annotation_lookup_first_match_wins() {
        let run = RunRecord::builder("run-1", 1)
            .annotation(AnnotationRecord::scored("accuracy", 0.1))
            .annotation(AnnotationRecord::scored("accuracy", 0.9))
            .build();

        let score = run.annotation("accuracy").and_then(AnnotationRecord::score);
        assert_eq!(score, Some(0.1));
    }

    #[test]
    fn test_latency() {
        let start = Utc::now();
        let end = start + Duration::milliseconds(1500);
        let run = RunRecord::builder("run-1", 1).timing(start, end).build();
        assert_eq!(run.latency(), Some(Duration::milliseconds(1500)));
    }
}
