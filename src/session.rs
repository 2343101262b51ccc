//! Comparison session
//!
//! Owns everything one comparison needs: the catalog, the selection state,
//! the reference output and the current sort choice. Selection and sort
//! changes go through the session so it can bump [`ComparisonSession::version`],
//! which hosts use as the invalidation key for anything they memoize.
//!
//! Derived views ([`composed_groups`](ComparisonSession::composed_groups),
//! [`no_runs_selected`](ComparisonSession::no_runs_selected)) are recomputed
//! on every call and are identical for identical state.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::compose::{compose, ExperimentGroup, GroupingMode};
use crate::config::ComparisonConfig;
use crate::experiment::{ExperimentCatalog, ReferenceOutput, RepetitionCatalog};
use crate::flags;
use crate::ranking::SortDirection;
use crate::selection::{SelectionEntry, SelectionState};
use crate::{Error, Result};

/// Host callback for opening a run's trace.
///
/// The session forwards calls verbatim; it never interprets the arguments.
pub trait TraceDialog {
    /// Open the trace `trace_id` of project `project_id` under `title`.
    fn open(&self, trace_id: &str, project_id: &str, title: &str);
}

impl<F> TraceDialog for F
where
    F: Fn(&str, &str, &str),
{
    fn open(&self, trace_id: &str, project_id: &str, title: &str) {
        self(trace_id, project_id, title);
    }
}

/// A single comparison of a baseline experiment against zero or more others.
pub struct ComparisonSession {
    catalog: ExperimentCatalog,
    baseline_id: String,
    comparison_ids: Vec<String>,
    selection: SelectionState,
    reference_output: Option<ReferenceOutput>,
    grouping: GroupingMode,
    sort_annotation: Option<String>,
    sort_direction: SortDirection,
    trace_dialog: Option<Box<dyn TraceDialog>>,
    version: u64,
}

impl fmt::Debug for ComparisonSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComparisonSession")
            .field("baseline_id", &self.baseline_id)
            .field("comparison_ids", &self.comparison_ids)
            .field("selection", &self.selection)
            .field("reference_output", &self.reference_output)
            .field("grouping", &self.grouping)
            .field("sort_annotation", &self.sort_annotation)
            .field("sort_direction", &self.sort_direction)
            .field("trace_dialog", &self.trace_dialog.is_some())
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl ComparisonSession {
    /// Create a new session builder.
    #[must_use]
    pub fn builder(baseline_id: impl Into<String>) -> ComparisonSessionBuilder {
        ComparisonSessionBuilder::new(baseline_id)
    }

    /// Get the baseline experiment ID.
    #[must_use]
    pub fn baseline_id(&self) -> &str {
        &self.baseline_id
    }

    /// Get the comparison experiment IDs (baseline excluded).
    #[must_use]
    pub fn comparison_ids(&self) -> &[String] {
        &self.comparison_ids
    }

    /// `[baseline, ...comparisons]`.
    #[must_use]
    pub fn experiment_ids(&self) -> Vec<&str> {
        std::iter::once(self.baseline_id.as_str())
            .chain(self.comparison_ids.iter().map(String::as_str))
            .collect()
    }

    /// Get the catalog the session reads from.
    #[must_use]
    pub const fn catalog(&self) -> &ExperimentCatalog {
        &self.catalog
    }

    /// Get the selection state.
    #[must_use]
    pub const fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Get the reference output, if any.
    #[must_use]
    pub const fn reference_output(&self) -> Option<&ReferenceOutput> {
        self.reference_output.as_ref()
    }

    /// Replace the reference output.
    pub fn set_reference_output(&mut self, reference_output: Option<ReferenceOutput>) {
        self.reference_output = reference_output;
        self.touch();
    }

    /// Get the grouping mode.
    #[must_use]
    pub const fn grouping_mode(&self) -> GroupingMode {
        self.grouping
    }

    /// Mutation counter. Moves whenever selection, sort or reference state changes.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Flip the reference output selection.
    pub fn toggle_reference(&mut self) {
        self.selection.toggle_reference();
        self.touch();
    }

    /// Set every repetition of one experiment.
    ///
    /// The version only moves when a flag actually changes.
    pub fn set_experiment_selection(&mut self, experiment_id: &str, checked: bool) {
        if self.selection.set_experiment_selection(experiment_id, checked) {
            self.touch();
        }
    }

    /// Set exactly one repetition.
    pub fn set_repetition_selection(
        &mut self,
        experiment_id: &str,
        repetition_number: u32,
        checked: bool,
    ) {
        if self
            .selection
            .set_repetition_selection(experiment_id, repetition_number, checked)
        {
            self.touch();
        }
    }

    /// Set every repetition and the reference output.
    pub fn set_all_selection(&mut self, checked: bool) {
        if self.selection.set_all_selection(checked) {
            self.touch();
        }
    }

    /// True iff every repetition of the experiment is selected.
    #[must_use]
    pub fn all_selected_for(&self, experiment_id: &str) -> bool {
        self.selection.all_selected_for(experiment_id)
    }

    /// True iff at least one repetition of the experiment is selected.
    #[must_use]
    pub fn some_selected_for(&self, experiment_id: &str) -> bool {
        self.selection.some_selected_for(experiment_id)
    }

    // ------------------------------------------------------------------
    // Sorting
    // ------------------------------------------------------------------

    /// Annotation currently driving the ranking.
    #[must_use]
    pub fn sort_annotation(&self) -> Option<&str> {
        self.sort_annotation.as_deref()
    }

    /// Choose the ranking annotation.
    pub fn set_sort_annotation(&mut self, annotation_name: impl Into<String>) {
        self.sort_annotation = Some(annotation_name.into());
        debug!(annotation = ?self.sort_annotation, "session: sort annotation set");
        self.touch();
    }

    /// Drop the ranking annotation and restore catalog order.
    pub fn clear_sort_annotation(&mut self) {
        if self.sort_annotation.take().is_some() {
            debug!("session: sort annotation cleared");
            self.touch();
        }
    }

    /// Current ranking direction.
    #[must_use]
    pub const fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    /// Set the ranking direction.
    pub fn set_sort_direction(&mut self, direction: SortDirection) {
        self.sort_direction = direction;
        self.touch();
    }

    /// Flip the ranking direction.
    pub fn toggle_sort_direction(&mut self) {
        self.sort_direction = self.sort_direction.toggled();
        debug!(direction = %self.sort_direction, "session: sort direction toggled");
        self.touch();
    }

    // ------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------

    /// Display groups for the current sort choice and grouping mode.
    #[must_use]
    pub fn composed_groups(&self) -> Vec<ExperimentGroup<'_>> {
        compose(
            self.grouping,
            &self.experiment_ids(),
            &self.catalog,
            self.sort_annotation(),
            self.sort_direction,
        )
    }

    /// [`composed_groups`](Self::composed_groups) restricted to selected
    /// repetitions. Groups left empty are dropped.
    #[must_use]
    pub fn selected_groups(&self) -> Vec<ExperimentGroup<'_>> {
        let mut groups = self.composed_groups();
        for group in &mut groups {
            group.retain(|repetition| {
                self.selection
                    .is_selected(repetition.experiment_id(), repetition.repetition_number())
            });
        }
        groups.retain(|group| !group.repetitions().is_empty());
        groups
    }

    /// True iff neither a repetition nor a present reference output is selected.
    #[must_use]
    pub fn no_runs_selected(&self) -> bool {
        flags::no_runs_selected(&self.selection, self.reference_output.as_ref())
    }

    /// Forward a trace request to the host. No-op without a handler.
    pub fn open_trace_dialog(&self, trace_id: &str, project_id: &str, title: &str) {
        if let Some(dialog) = &self.trace_dialog {
            dialog.open(trace_id, project_id, title);
        }
    }

    /// Serializable view of the whole session state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        SessionSnapshot {
            version: self.version,
            baseline_id: &self.baseline_id,
            entries: self.selection.entries(),
            reference_selected: self.selection.reference_selected(),
            has_reference_output: self.reference_output.is_some(),
            grouping: self.grouping,
            sort_annotation: self.sort_annotation(),
            sort_direction: self.sort_direction,
            groups: self.composed_groups(),
            no_runs_selected: self.no_runs_selected(),
        }
    }

    fn touch(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}

/// Point-in-time view of a session for JSON consumers.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot<'a> {
    /// Session version the snapshot was taken at.
    pub version: u64,
    /// Baseline experiment ID.
    pub baseline_id: &'a str,
    /// Selection entries.
    pub entries: &'a [SelectionEntry],
    /// Reference output selection flag.
    pub reference_selected: bool,
    /// Whether a reference output is present.
    pub has_reference_output: bool,
    /// Grouping mode.
    pub grouping: GroupingMode,
    /// Ranking annotation.
    pub sort_annotation: Option<&'a str>,
    /// Ranking direction.
    pub sort_direction: SortDirection,
    /// Composed display groups.
    pub groups: Vec<ExperimentGroup<'a>>,
    /// Derived "nothing selected" flag.
    pub no_runs_selected: bool,
}

/// Builder for `ComparisonSession`.
pub struct ComparisonSessionBuilder {
    config: ComparisonConfig,
    reference_output: Option<ReferenceOutput>,
    trace_dialog: Option<Box<dyn TraceDialog>>,
}

impl fmt::Debug for ComparisonSessionBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComparisonSessionBuilder")
            .field("config", &self.config)
            .field("reference_output", &self.reference_output)
            .field("trace_dialog", &self.trace_dialog.is_some())
            .finish()
    }
}

impl ComparisonSessionBuilder {
    /// Create a new builder with the required baseline.
    #[must_use]
    pub fn new(baseline_id: impl Into<String>) -> Self {
        Self {
            config: ComparisonConfig::new(baseline_id),
            reference_output: None,
            trace_dialog: None,
        }
    }

    /// Replace every configurable field with `config`.
    #[must_use]
    pub fn config(mut self, config: ComparisonConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the comparison experiments.
    #[must_use]
    pub fn comparison_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.comparison_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Force grouping by experiment (`true`) or flattening (`false`).
    #[must_use]
    pub const fn include_repetitions(mut self, include_repetitions: bool) -> Self {
        self.config.include_repetitions = Some(include_repetitions);
        self
    }

    /// Only this baseline repetition starts selected.
    #[must_use]
    pub const fn default_repetition_number(mut self, repetition_number: u32) -> Self {
        self.config.default_repetition_number = Some(repetition_number);
        self
    }

    /// Initial ranking annotation.
    #[must_use]
    pub fn sort_annotation(mut self, annotation_name: impl Into<String>) -> Self {
        self.config.sort_annotation = Some(annotation_name.into());
        self
    }

    /// Initial ranking direction.
    #[must_use]
    pub const fn sort_direction(mut self, direction: SortDirection) -> Self {
        self.config.sort_direction = direction;
        self
    }

    /// Reference output compared alongside the experiments.
    #[must_use]
    pub fn reference_output(mut self, reference_output: ReferenceOutput) -> Self {
        self.reference_output = Some(reference_output);
        self
    }

    /// Host callback for opening traces.
    #[must_use]
    pub fn trace_dialog(mut self, dialog: impl TraceDialog + 'static) -> Self {
        self.trace_dialog = Some(Box::new(dialog));
        self
    }

    /// Build the session and initialize its selection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid and
    /// [`Error::UnknownExperiment`] if the baseline or a comparison experiment
    /// is missing from `catalog`.
    pub fn build(self, catalog: ExperimentCatalog) -> Result<ComparisonSession> {
        let config = self.config;
        config.validate()?;

        let ids: Vec<&str> = std::iter::once(config.baseline_id.as_str())
            .chain(config.comparison_ids.iter().map(String::as_str))
            .collect();
        if let Some(missing) = ids.iter().find(|id| catalog.repetition_count(id).is_none()) {
            return Err(Error::UnknownExperiment((*missing).to_string()));
        }

        let selection = SelectionState::new(
            &config.baseline_id,
            &config.comparison_ids,
            &catalog,
            config.default_repetition_number,
        );
        let grouping = config.include_repetitions.map_or_else(
            || GroupingMode::infer(&catalog, &ids),
            GroupingMode::from_include_repetitions,
        );

        debug!(
            baseline_id = %config.baseline_id,
            comparisons = config.comparison_ids.len(),
            entries = selection.entries().len(),
            ?grouping,
            "session: initialized"
        );

        Ok(ComparisonSession {
            catalog,
            baseline_id: config.baseline_id,
            comparison_ids: config.comparison_ids,
            selection,
            reference_output: self.reference_output,
            grouping,
            sort_annotation: config.sort_annotation,
            sort_direction: config.sort_direction,
            trace_dialog: self.trace_dialog,
            version: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::{AnnotationRecord, ExperimentRecord, RunRecord};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn catalog() -> ExperimentCatalog {
        let mut catalog = ExperimentCatalog::new();
        for (id, scores) in [("exp-1", [0.2, 0.7]), ("exp-2", [0.9, 0.1])] {
            catalog.add_experiment(ExperimentRecord::new(id, 2));
            for (score, number) in scores.into_iter().zip(1..) {
                let run = RunRecord::builder(format!("{id}-run-{number}"), number)
                    .trace_id(format!("trace-{id}-{number}"))
                    .annotation(AnnotationRecord::scored("accuracy", score))
                    .build();
                catalog.add_run(id, run).unwrap();
            }
        }
        catalog
    }

    #[test]
    fn test_build_unknown_baseline() {
        let result = ComparisonSession::builder("ghost").build(catalog());
        assert!(matches!(result, Err(Error::UnknownExperiment(id)) if id == "ghost"));
    }

    #[test]
    fn test_build_unknown_comparison() {
        let result = ComparisonSession::builder("exp-1")
            .comparison_ids(["exp-2", "exp-9"])
            .build(catalog());
        assert!(matches!(result, Err(Error::UnknownExperiment(id)) if id == "exp-9"));
    }

    #[test]
    fn test_build_infers_grouping() {
        let session = ComparisonSession::builder("exp-1")
            .comparison_ids(["exp-2"])
            .build(catalog())
            .unwrap();
        assert_eq!(session.grouping_mode(), GroupingMode::PerExperiment);
    }

    #[test]
    fn test_version_bumps_on_mutation() {
        let mut session = ComparisonSession::builder("exp-1").build(catalog()).unwrap();
        assert_eq!(session.version(), 0);

        session.toggle_reference();
        session.set_sort_annotation("accuracy");
        session.toggle_sort_direction();
        assert_eq!(session.version(), 3);
    }

    #[test]
    fn test_version_unchanged_when_selection_ignored() {
        let mut session = ComparisonSession::builder("exp-1")
            .comparison_ids(["exp-2"])
            .build(catalog())
            .unwrap();

        session.set_experiment_selection("ghost", false);
        session.set_repetition_selection("exp-1", 0, false);
        session.set_repetition_selection("exp-1", 3, false);
        session.set_repetition_selection("exp-2", 1, true);
        session.set_all_selection(true);
        session.clear_sort_annotation();
        assert_eq!(session.version(), 0);

        session.set_repetition_selection("exp-2", 1, false);
        assert_eq!(session.version(), 1);
    }

    #[test]
    fn test_build_rejects_duplicate_comparisons() {
        let result = ComparisonSession::builder("exp-1")
            .comparison_ids(["exp-2", "exp-2"])
            .include_repetitions(true)
            .build(catalog());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_sort_annotation_roundtrip() {
        let mut session = ComparisonSession::builder("exp-1").build(catalog()).unwrap();
        session.set_sort_annotation("accuracy");
        assert_eq!(session.sort_annotation(), Some("accuracy"));
        session.clear_sort_annotation();
        assert_eq!(session.sort_annotation(), None);
    }

    #[test]
    fn test_selected_groups_drop_unselected() {
        let mut session = ComparisonSession::builder("exp-1")
            .comparison_ids(["exp-2"])
            .build(catalog())
            .unwrap();
        session.set_experiment_selection("exp-2", false);
        session.set_repetition_selection("exp-1", 1, false);

        let groups = session.selected_groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].experiment_id(), "exp-1");
        assert_eq!(groups[0].repetitions()[0].repetition_number(), 2);
    }

    #[test]
    fn test_trace_dialog_forwarded() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        let session = ComparisonSession::builder("exp-1")
            .trace_dialog(move |trace: &str, project: &str, title: &str| {
                sink.borrow_mut()
                    .push(format!("{trace}|{project}|{title}"));
            })
            .build(catalog())
            .unwrap();

        session.open_trace_dialog("trace-1", "project-a", "Experiment Run Trace");
        assert_eq!(calls.borrow().as_slice(), ["trace-1|project-a|Experiment Run Trace"]);
    }

    #[test]
    fn test_trace_dialog_absent_is_noop() {
        let session = ComparisonSession::builder("exp-1").build(catalog()).unwrap();
        session.open_trace_dialog("trace-1", "project-a", "title");
    }

    #[test]
    fn test_snapshot_serializes() {
        let session = ComparisonSession::builder("exp-1")
            .comparison_ids(["exp-2"])
            .sort_annotation("accuracy")
            .sort_direction(SortDirection::Descending)
            .build(catalog())
            .unwrap();

        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(json["sort_direction"], "desc");
        assert_eq!(json["grouping"], "per_experiment");
        assert_eq!(json["entries"].as_array().unwrap().len(), 4);
        assert_eq!(json["groups"][0]["experiment_id"], "exp-1");
        assert_eq!(json["groups"][0]["repetitions"][0]["repetition_number"], 2);
        assert_eq!(json["no_runs_selected"], false);
    }
}
