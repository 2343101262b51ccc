//! # Trueno-Compare: Experiment Comparison Engine
//!
//! Compares a baseline experiment against alternative experiments, where each
//! experiment may be run several times ("repetitions"), and ranks those
//! repetitions by an evaluation annotation.
//!
//! The engine is a synchronous, single-owner state machine:
//!
//! ```text
//! ExperimentCatalog ──> SelectionState ──> compose (rank + group) ──> flags
//!    (read-only)          (mutable)            (pure)                (pure)
//! ```
//!
//! Data fetching, rendering and persistence belong to the host.
//!
//! ## Example Usage
//!
//! ```rust
//! use trueno_compare::experiment::{AnnotationRecord, ExperimentCatalog, ExperimentRecord, RunRecord};
//! use trueno_compare::ranking::SortDirection;
//! use trueno_compare::session::ComparisonSession;
//!
//! let mut catalog = ExperimentCatalog::new();
//! for (id, score) in [("exp-1", 0.8), ("exp-2", 0.6)] {
//!     catalog.add_experiment(ExperimentRecord::new(id, 1));
//!     let run = RunRecord::builder(format!("{id}-run"), 1)
//!         .annotation(AnnotationRecord::scored("accuracy", score))
//!         .build();
//!     catalog.add_run(id, run)?;
//! }
//!
//! let mut session = ComparisonSession::builder("exp-1")
//!     .comparison_ids(["exp-2"])
//!     .sort_annotation("accuracy")
//!     .sort_direction(SortDirection::Descending)
//!     .build(catalog)?;
//!
//! let order: Vec<String> = session
//!     .composed_groups()
//!     .iter()
//!     .map(|group| group.experiment_id().to_string())
//!     .collect();
//! assert_eq!(order, ["exp-1", "exp-2"]);
//!
//! session.set_all_selection(false);
//! assert!(session.no_runs_selected());
//! # Ok::<(), trueno_compare::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod compose;
pub mod config;
pub mod error;
pub mod experiment;
pub mod flags;
pub mod ranking;
pub mod selection;
pub mod session;

pub use error::{Error, Result};
pub use session::{ComparisonSession, ComparisonSessionBuilder};
