//! Selection state for a comparison session
//!
//! Tracks one `selected` flag per (experiment, repetition) pair plus a single
//! flag for the reference output. The set of entries is fixed when the state
//! is created; mutations only flip flags.
//!
//! Mutations never fail. Unknown experiment IDs and out-of-range repetition
//! numbers leave the state unchanged.

use std::ops::Range;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::experiment::RepetitionCatalog;

/// Selected flag for one repetition of one experiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionEntry {
    experiment_id: String,
    repetition_number: u32,
    selected: bool,
}

impl SelectionEntry {
    /// Get the experiment ID.
    #[must_use]
    pub fn experiment_id(&self) -> &str {
        &self.experiment_id
    }

    /// Get the 1-based repetition number.
    #[must_use]
    pub const fn repetition_number(&self) -> u32 {
        self.repetition_number
    }

    /// Whether the repetition is currently shown.
    #[must_use]
    pub const fn is_selected(&self) -> bool {
        self.selected
    }
}

/// Selection state manager.
///
/// Entries are stored contiguously per experiment in `[baseline,
/// ...comparisons]` order, so every per-experiment operation works on a
/// single index range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    entries: Vec<SelectionEntry>,
    ranges: FxHashMap<String, Range<usize>>,
    reference_selected: bool,
}

impl SelectionState {
    /// Initialize the selection for a baseline and its comparisons.
    ///
    /// One entry is created for every repetition `1..=N` of every experiment,
    /// selected by default. When `default_repetition_number` is `Some(k)`, only
    /// baseline repetition `k` starts selected; comparison experiments are
    /// unaffected. The reference output starts selected.
    ///
    /// Experiments unknown to the catalog get no entries. Comparison IDs that
    /// repeat an earlier ID (including the baseline) are skipped.
    #[must_use]
    pub fn new<C, S>(
        baseline_id: &str,
        comparison_ids: &[S],
        catalog: &C,
        default_repetition_number: Option<u32>,
    ) -> Self
    where
        C: RepetitionCatalog + ?Sized,
        S: AsRef<str>,
    {
        let mut entries = Vec::new();
        let mut ranges = FxHashMap::default();
        let mut seen = FxHashSet::default();

        let ids = std::iter::once(baseline_id).chain(comparison_ids.iter().map(AsRef::<str>::as_ref));
        for experiment_id in ids {
            if !seen.insert(experiment_id) {
                warn!(experiment_id, "selection: duplicate experiment id skipped");
                continue;
            }
            let Some(count) = catalog.repetition_count(experiment_id) else {
                debug!(experiment_id, "selection: experiment not in catalog");
                continue;
            };

            let is_baseline = experiment_id == baseline_id;
            let start = entries.len();
            entries.extend((1..=count).map(|repetition_number| SelectionEntry {
                experiment_id: experiment_id.to_string(),
                repetition_number,
                selected: match default_repetition_number {
                    Some(default) if is_baseline => repetition_number == default,
                    _ => true,
                },
            }));
            ranges.insert(experiment_id.to_string(), start..entries.len());
        }

        debug!(
            baseline_id,
            experiments = ranges.len(),
            entries = entries.len(),
            ?default_repetition_number,
            "selection: initialized"
        );

        Self {
            entries,
            ranges,
            reference_selected: true,
        }
    }

    /// All entries in initialization order.
    #[must_use]
    pub fn entries(&self) -> &[SelectionEntry] {
        &self.entries
    }

    /// Whether the reference output is selected.
    #[must_use]
    pub const fn reference_selected(&self) -> bool {
        self.reference_selected
    }

    /// Entries belonging to one experiment. Empty for an unknown experiment.
    #[must_use]
    pub fn entries_for(&self, experiment_id: &str) -> &[SelectionEntry] {
        self.ranges
            .get(experiment_id)
            .map_or(&self.entries[..0], |range| &self.entries[range.clone()])
    }

    /// Whether a given repetition is selected. `false` for unknown pairs.
    #[must_use]
    pub fn is_selected(&self, experiment_id: &str, repetition_number: u32) -> bool {
        self.position(experiment_id, repetition_number)
            .is_some_and(|index| self.entries[index].selected)
    }

    /// Number of selected repetitions across all experiments.
    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.selected).count()
    }

    /// `(experiment_id, repetition_number)` of every selected repetition.
    pub fn selected_repetitions(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.entries
            .iter()
            .filter(|entry| entry.selected)
            .map(|entry| (entry.experiment_id.as_str(), entry.repetition_number))
    }

    /// Flip the reference output selection.
    pub fn toggle_reference(&mut self) {
        self.reference_selected = !self.reference_selected;
        debug!(selected = self.reference_selected, "selection: reference toggled");
    }

    /// Set every repetition of one experiment.
    ///
    /// Returns `true` if any flag changed.
    pub fn set_experiment_selection(&mut self, experiment_id: &str, checked: bool) -> bool {
        let Some(range) = self.ranges.get(experiment_id).cloned() else {
            debug!(experiment_id, "selection: unknown experiment ignored");
            return false;
        };
        let mut changed = false;
        for entry in &mut self.entries[range] {
            changed |= entry.selected != checked;
            entry.selected = checked;
        }
        debug!(experiment_id, checked, changed, "selection: experiment set");
        changed
    }

    /// Set exactly one repetition.
    ///
    /// Returns `true` if the flag changed.
    pub fn set_repetition_selection(
        &mut self,
        experiment_id: &str,
        repetition_number: u32,
        checked: bool,
    ) -> bool {
        let Some(index) = self.position(experiment_id, repetition_number) else {
            debug!(
                experiment_id,
                repetition_number, "selection: unknown repetition ignored"
            );
            return false;
        };
        let entry = &mut self.entries[index];
        let changed = entry.selected != checked;
        entry.selected = checked;
        debug!(experiment_id, repetition_number, checked, changed, "selection: repetition set");
        changed
    }

    /// Set every repetition of every experiment and the reference output.
    ///
    /// Returns `true` if any flag changed.
    pub fn set_all_selection(&mut self, checked: bool) -> bool {
        let mut changed = self.reference_selected != checked;
        for entry in &mut self.entries {
            changed |= entry.selected != checked;
            entry.selected = checked;
        }
        self.reference_selected = checked;
        debug!(checked, changed, "selection: all set");
        changed
    }

    /// True iff every entry of the experiment is selected.
    ///
    /// Vacuously true for an experiment with no entries.
    #[must_use]
    pub fn all_selected_for(&self, experiment_id: &str) -> bool {
        self.entries_for(experiment_id)
            .iter()
            .all(SelectionEntry::is_selected)
    }

    /// True iff at least one entry of the experiment is selected.
    #[must_use]
    pub fn some_selected_for(&self, experiment_id: &str) -> bool {
        self.entries_for(experiment_id)
            .iter()
            .any(SelectionEntry::is_selected)
    }

    /// True iff no repetition of any experiment is selected.
    #[must_use]
    pub fn none_selected(&self) -> bool {
        !self.entries.iter().any(SelectionEntry::is_selected)
    }

    fn position(&self, experiment_id: &str, repetition_number: u32) -> Option<usize> {
        let range = self.ranges.get(experiment_id)?;
        let offset = usize::try_from(repetition_number).ok()?.checked_sub(1)?;
        let index = range.start.checked_add(offset)?;
        (index < range.end).then_some(index)
    }
}
