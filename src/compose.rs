//! Grouped view composition
//!
//! Turns the catalog plus the current sort choice into the display-ready
//! `[{experiment_id, repetitions}]` list. Both grouping modes produce the same
//! shape so renderers never branch on the mode.

use serde::Serialize;
use tracing::trace;

use crate::experiment::{Repetition, RepetitionCatalog};
use crate::ranking::{rank, SortDirection};

/// How repetitions are grouped for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingMode {
    /// One record per experiment; repetitions ranked within their experiment.
    PerExperiment,
    /// Every repetition ranked together; one single-repetition record each.
    Flattened,
}

impl GroupingMode {
    /// Map the `include_repetitions` flag onto a mode.
    #[must_use]
    pub const fn from_include_repetitions(include_repetitions: bool) -> Self {
        if include_repetitions {
            Self::PerExperiment
        } else {
            Self::Flattened
        }
    }

    /// Inverse of [`GroupingMode::from_include_repetitions`].
    #[must_use]
    pub const fn include_repetitions(self) -> bool {
        match self {
            Self::PerExperiment => true,
            Self::Flattened => false,
        }
    }

    /// Per-experiment mode iff any listed experiment declares more than one
    /// repetition.
    #[must_use]
    pub fn infer<C, S>(catalog: &C, experiment_ids: &[S]) -> Self
    where
        C: RepetitionCatalog + ?Sized,
        S: AsRef<str>,
    {
        let has_repetitions = experiment_ids
            .iter()
            .filter_map(|id| catalog.repetition_count(id.as_ref()))
            .any(|count| count > 1);
        Self::from_include_repetitions(has_repetitions)
    }
}

/// One display record: an experiment and its (ranked) repetitions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentGroup<'a> {
    experiment_id: String,
    repetitions: Vec<&'a Repetition>,
}

impl<'a> ExperimentGroup<'a> {
    /// Get the experiment ID.
    #[must_use]
    pub fn experiment_id(&self) -> &str {
        &self.experiment_id
    }

    /// Get the repetitions in display order.
    #[must_use]
    pub fn repetitions(&self) -> &[&'a Repetition] {
        &self.repetitions
    }

    pub(crate) fn retain(&mut self, keep: impl FnMut(&&'a Repetition) -> bool) {
        self.repetitions.retain(keep);
    }
}

/// Compose display groups.
///
/// * [`GroupingMode::PerExperiment`]: one record per ID in `experiment_ids`,
///   in that order, each ranked over its own repetitions. Unknown experiments
///   yield a record with no repetitions.
/// * [`GroupingMode::Flattened`]: the repetitions of all experiments are
///   concatenated, ranked as one list, and each emitted as its own record.
#[must_use]
pub fn compose<'a, C, S>(
    mode: GroupingMode,
    experiment_ids: &[S],
    catalog: &'a C,
    annotation_name: Option<&str>,
    direction: SortDirection,
) -> Vec<ExperimentGroup<'a>>
where
    C: RepetitionCatalog + ?Sized,
    S: AsRef<str>,
{
    let groups: Vec<ExperimentGroup<'a>> = match mode {
        GroupingMode::PerExperiment => experiment_ids
            .iter()
            .map(move |id| {
                let id = id.as_ref();
                ExperimentGroup {
                    experiment_id: id.to_string(),
                    repetitions: rank(
                        catalog.repetitions(id).iter().collect(),
                        annotation_name,
                        direction,
                    ),
                }
            })
            .collect(),
        GroupingMode::Flattened => {
            let all: Vec<&'a Repetition> = experiment_ids
                .iter()
                .flat_map(move |id| catalog.repetitions(id.as_ref()))
                .collect();
            rank(all, annotation_name, direction)
                .into_iter()
                .map(|repetition| ExperimentGroup {
                    experiment_id: repetition.experiment_id().to_string(),
                    repetitions: vec![repetition],
                })
                .collect()
        }
    };

    trace!(?mode, ?annotation_name, %direction, groups = groups.len(), "compose: groups built");
    groups
}
