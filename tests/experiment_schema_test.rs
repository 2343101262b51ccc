//! Experiment Schema Tests
//!
//! Records, repetitions and the catalog as the data-fetching layer builds them.

use chrono::{Duration, TimeZone, Utc};
use trueno_compare::experiment::{
    AnnotationRecord, ExperimentCatalog, ExperimentRecord, ReferenceOutput, Repetition,
    RepetitionCatalog, RunRecord,
};
use trueno_compare::Error;

// =============================================================================
// ExperimentRecord Tests
// =============================================================================

#[test]
fn test_experiment_record_creation() {
    let record = ExperimentRecord::new("exp-001", 3);

    assert_eq!(record.experiment_id(), "exp-001");
    assert_eq!(record.name(), "exp-001");
    assert_eq!(record.repetitions(), 3);
    assert!(record.created_at().timestamp() > 0);
    assert!(record.metadata().is_none());
}

#[test]
fn test_experiment_record_serialization() {
    let created_at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    let record = ExperimentRecord::builder("exp-002", 2)
        .name("Prompt v2")
        .metadata(serde_json::json!({"model": "gpt-4o"}))
        .created_at(created_at)
        .build();

    let json = serde_json::to_string(&record).expect("serialization failed");
    let deserialized: ExperimentRecord =
        serde_json::from_str(&json).expect("deserialization failed");

    assert_eq!(record, deserialized);
}

// =============================================================================
// RunRecord Tests
// =============================================================================

#[test]
fn test_run_record_full() {
    let start = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    let run = RunRecord::builder("run-001", 2)
        .output(serde_json::json!({"answer": "Paris"}))
        .trace_id("trace-abc")
        .timing(start, start + Duration::seconds(3))
        .annotation(AnnotationRecord::scored("correctness", 1.0).with_label("correct"))
        .build();

    assert_eq!(run.repetition_number(), 2);
    assert_eq!(run.trace_id(), Some("trace-abc"));
    assert_eq!(run.latency(), Some(Duration::seconds(3)));
    assert!(run.error().is_none());
    assert_eq!(run.output(), Some(&serde_json::json!({"answer": "Paris"})));
    assert_eq!(run.annotations().len(), 1);
}

#[test]
fn test_run_record_failed() {
    let run = RunRecord::builder("run-002", 1).error("timeout after 30s").build();
    assert_eq!(run.error(), Some("timeout after 30s"));
    assert!(run.output().is_none());
}

#[test]
fn test_annotation_deserializes_nulls() {
    let annotation: AnnotationRecord =
        serde_json::from_str(r#"{"name": "accuracy", "score": null, "label": null}"#).unwrap();
    assert_eq!(annotation.name(), "accuracy");
    assert!(annotation.score().is_none());
    assert!(annotation.label().is_none());
}

// =============================================================================
// Catalog Tests
// =============================================================================

#[test]
fn test_catalog_pending_and_completed_slots() {
    let mut catalog = ExperimentCatalog::new();
    catalog.add_experiment(ExperimentRecord::new("exp-1", 2));
    catalog
        .add_run("exp-1", RunRecord::new("run-1", 1))
        .unwrap();

    assert_eq!(catalog.repetition_count("exp-1"), Some(2));
    let repetitions = catalog.repetitions("exp-1");
    assert_eq!(repetitions[0], Repetition::completed("exp-1", RunRecord::new("run-1", 1)));
    assert_eq!(repetitions[1], Repetition::pending("exp-1", 2));
}

#[test]
fn test_catalog_rejects_misplaced_run() {
    let mut catalog = ExperimentCatalog::new();
    catalog.add_experiment(ExperimentRecord::new("exp-1", 1));

    let error = catalog.add_run("exp-1", RunRecord::new("run-9", 9)).unwrap_err();
    assert!(matches!(
        error,
        Error::RepetitionOutOfRange { repetition_number: 9, repetitions: 1, .. }
    ));
}

#[test]
fn test_catalog_re_adding_experiment_resets_slots() {
    let mut catalog = ExperimentCatalog::new();
    catalog.add_experiment(ExperimentRecord::new("exp-1", 1));
    catalog.add_run("exp-1", RunRecord::new("run-1", 1)).unwrap();

    catalog.add_experiment(ExperimentRecord::new("exp-1", 3));
    assert_eq!(catalog.repetitions("exp-1").len(), 3);
    assert_eq!(catalog.run_count(), 0);
}

#[test]
fn test_reference_output_roundtrip() {
    let reference: ReferenceOutput = serde_json::json!({"answer": "Paris"}).into();
    assert_eq!(reference.value()["answer"], "Paris");
}
