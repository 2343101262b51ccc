//! Derived flags over selection state
//!
//! Pure folds with no storage of their own; recompute on every access.

use crate::experiment::ReferenceOutput;
use crate::selection::SelectionState;

/// True iff nothing would be shown.
///
/// Requires both: no repetition selected, and the reference output either
/// absent or deselected. A single selected repetition, or a present and
/// selected reference output, makes this `false`.
#[must_use]
pub fn no_runs_selected(selection: &SelectionState, reference_output: Option<&ReferenceOutput>) -> bool {
    let reference_shown = reference_output.is_some() && selection.reference_selected();
    selection.none_selected() && !reference_shown
}
