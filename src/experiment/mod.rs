//! Experiment Comparison Schema
//!
//! Data structures the comparison engine reads. They are produced by the
//! data-fetching layer and never mutated by selection or ranking.
//!
//! ## Schema Overview
//!
//! ```text
//! ExperimentRecord (1) ──< Repetition (N, dense 1..=repetitions)
//!                              │
//!                              └── RunRecord (0..1) ──< AnnotationRecord (N)
//!
//! ReferenceOutput (0..1, independent of experiments)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use trueno_compare::experiment::{
//!     AnnotationRecord, ExperimentCatalog, ExperimentRecord, RepetitionCatalog, RunRecord,
//! };
//!
//! let mut catalog = ExperimentCatalog::new();
//! catalog.add_experiment(ExperimentRecord::new("exp-1", 2));
//!
//! let run = RunRecord::builder("run-1", 1)
//!     .annotation(AnnotationRecord::scored("accuracy", 0.8))
//!     .build();
//! catalog.add_run("exp-1", run)?;
//!
//! // Repetition 2 has no run yet but still exists.
//! assert_eq!(catalog.repetitions("exp-1").len(), 2);
//! # Ok::<(), trueno_compare::Error>(())
//! ```

mod annotation_record;
mod catalog;
mod experiment_record;
mod reference_output;
mod repetition;
mod run_record;

pub use annotation_record::AnnotationRecord;
pub use catalog::{ExperimentCatalog, RepetitionCatalog};
pub use experiment_record::{ExperimentRecord, ExperimentRecordBuilder};
pub use reference_output::ReferenceOutput;
pub use repetition::Repetition;
pub use run_record::{RunRecord, RunRecordBuilder};
