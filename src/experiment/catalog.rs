//! Experiment Catalog - read-only view over experiments and their repetitions
//!
//! The catalog is populated by the data-fetching layer and then only read by
//! the selection, ranking and grouping components.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use super::{ExperimentRecord, Repetition, RunRecord};
use crate::{Error, Result};

/// Read access to experiments and their repetitions.
///
/// Selection initialization and grouping only need these two lookups, so a
/// host that keeps its own storage can implement this trait directly.
pub trait RepetitionCatalog {
    /// Declared repetition count, or `None` for an unknown experiment.
    fn repetition_count(&self, experiment_id: &str) -> Option<u32>;

    /// Repetitions of an experiment in declared order. Empty for an unknown
    /// experiment.
    fn repetitions(&self, experiment_id: &str) -> &[Repetition];
}

/// In-memory catalog of experiments and their dense repetition slots.
///
/// ## Design
///
/// Each experiment owns a vector of `repetitions` slots allocated when the
/// experiment is added, so slot `n` lives at index `n - 1`. Runs are attached
/// to their slot as they arrive; slots without a run stay pending.
#[derive(Debug, Default, Clone)]
pub struct ExperimentCatalog {
    experiments: HashMap<String, ExperimentRecord>,
    repetitions: HashMap<String, Vec<Repetition>>,
}

impl ExperimentCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the catalog holds no experiments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
    }

    /// Get the number of experiments in the catalog.
    #[must_use]
    pub fn experiment_count(&self) -> usize {
        self.experiments.len()
    }

    /// Get the number of completed runs across all experiments.
    #[must_use]
    pub fn run_count(&self) -> usize {
        self.repetitions
            .values()
            .flatten()
            .filter(|repetition| repetition.run().is_some())
            .count()
    }

    /// Add an experiment, allocating one pending slot per declared repetition.
    ///
    /// Re-adding an experiment replaces it and discards its attached runs.
    pub fn add_experiment(&mut self, experiment: ExperimentRecord) {
        let experiment_id = experiment.experiment_id().to_string();
        let slots = (1..=experiment.repetitions())
            .map(|number| Repetition::pending(experiment_id.clone(), number))
            .collect();

        debug!(
            experiment_id = %experiment_id,
            repetitions = experiment.repetitions(),
            "catalog: experiment added"
        );
        self.repetitions.insert(experiment_id.clone(), slots);
        self.experiments.insert(experiment_id, experiment);
    }

    /// Get an experiment by ID.
    #[must_use]
    pub fn get_experiment(&self, experiment_id: &str) -> Option<&ExperimentRecord> {
        self.experiments.get(experiment_id)
    }

    /// Attach a completed run to its repetition slot.
    ///
    /// A later run for the same slot replaces the earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownExperiment`] if the experiment was never added,
    /// and [`Error::RepetitionOutOfRange`] if the run's repetition number is 0
    /// or exceeds the declared repetition count.
    pub fn add_run(&mut self, experiment_id: &str, run: RunRecord) -> Result<()> {
        let slots = self
            .repetitions
            .get_mut(experiment_id)
            .ok_or_else(|| Error::UnknownExperiment(experiment_id.to_string()))?;

        let repetition_number = run.repetition_number();
        let declared = u32::try_from(slots.len()).unwrap_or(u32::MAX);
        let index = usize::try_from(repetition_number)
            .ok()
            .and_then(|number| number.checked_sub(1))
            .filter(|&index| index < slots.len())
            .ok_or_else(|| Error::RepetitionOutOfRange {
                experiment_id: experiment_id.to_string(),
                repetition_number,
                repetitions: declared,
            })?;

        slots[index].attach(run);
        Ok(())
    }

    /// Get a single repetition slot.
    #[must_use]
    pub fn get_repetition(&self, experiment_id: &str, repetition_number: u32) -> Option<&Repetition> {
        let index = usize::try_from(repetition_number).ok()?.checked_sub(1)?;
        self.repetitions.get(experiment_id)?.get(index)
    }

    /// Names of every annotation present on any run, sorted and de-duplicated.
    ///
    /// These are the choices a consumer offers for ranking.
    #[must_use]
    pub fn annotation_names(&self) -> Vec<String> {
        let names: BTreeSet<&str> = self
            .repetitions
            .values()
            .flatten()
            .filter_map(Repetition::run)
            .flat_map(RunRecord::annotations)
            .map(|annotation| annotation.name())
            .collect();
        names.into_iter().map(str::to_string).collect()
    }
}

impl RepetitionCatalog for ExperimentCatalog {
    fn repetition_count(&self, experiment_id: &str) -> Option<u32> {
        self.experiments
            .get(experiment_id)
            .map(ExperimentRecord::repetitions)
    }

    fn repetitions(&self, experiment_id: &str) -> &[Repetition] {
        self.repetitions
            .get(experiment_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
