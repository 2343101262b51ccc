//! Annotation ranking for repetitions
//!
//! Repetitions are ordered by a single annotation using a fixed three-key
//! comparator:
//!
//! 1. annotation score, in the requested direction
//! 2. annotation label, in the requested direction
//! 3. repetition number, always ascending
//!
//! Missing values (no run, no annotation of that name, null or `NaN` score,
//! null label) sort after every present value regardless of direction.
//! The sort is stable, so repetitions equal on all three keys keep their
//! input order.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::experiment::{AnnotationRecord, Repetition};
use crate::Error;

/// Sort direction for annotation ranking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    /// Smallest score first
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    /// Largest score first
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    /// The opposite direction.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Orient an ascending ordering in this direction.
    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }

    /// Short wire name (`"asc"` / `"desc"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(Error::InvalidInput(format!(
                "unknown sort direction: {other:?} (expected \"asc\" or \"desc\")"
            ))),
        }
    }
}

/// Find an annotation by name on a repetition's run.
///
/// Returns `None` when the repetition has no run or the run carries no
/// annotation with that name. Callers treat `None` as "no value", not a fault.
#[must_use]
pub fn find_annotation<'a>(repetition: &'a Repetition, name: &str) -> Option<&'a AnnotationRecord> {
    repetition.annotation(name)
}

/// Compare two optional keys, present values first.
///
/// Only the present/present case honours `direction`.
fn compare_present<T>(
    a: Option<T>,
    b: Option<T>,
    direction: SortDirection,
    cmp: impl FnOnce(&T, &T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => direction.apply(cmp(&a, &b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Three-key comparator used by [`rank`].
#[must_use]
pub fn compare_repetitions(
    a: &Repetition,
    b: &Repetition,
    annotation_name: &str,
    direction: SortDirection,
) -> Ordering {
    let a_annotation = find_annotation(a, annotation_name);
    let b_annotation = find_annotation(b, annotation_name);

    compare_present(
        a_annotation.and_then(AnnotationRecord::score),
        b_annotation.and_then(AnnotationRecord::score),
        direction,
        |a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal),
    )
    .then_with(|| {
        compare_present(
            a_annotation.and_then(AnnotationRecord::label),
            b_annotation.and_then(AnnotationRecord::label),
            direction,
            |a, b| a.cmp(b),
        )
    })
    .then_with(|| a.repetition_number().cmp(&b.repetition_number()))
}

/// Rank repetitions by an annotation.
///
/// With `annotation_name == None` the input order is returned unchanged.
///
/// # Examples
///
/// ```rust
/// use trueno_compare::experiment::{AnnotationRecord, Repetition, RunRecord};
/// use trueno_compare::ranking::{rank, SortDirection};
///
/// let scored = |n: u32, score: f64| {
///     let run = RunRecord::builder(format!("run-{n}"), n)
///         .annotation(AnnotationRecord::scored("accuracy", score))
///         .build();
///     Repetition::completed("exp-1", run)
/// };
/// let repetitions = vec![scored(1, 0.2), scored(2, 0.9), scored(3, 0.5)];
///
/// let ranked = rank(repetitions.iter().collect(), Some("accuracy"), SortDirection::Descending);
/// let order: Vec<u32> = ranked.iter().map(|r| r.repetition_number()).collect();
/// assert_eq!(order, vec![2, 3, 1]);
/// ```
#[must_use]
pub fn rank<'a>(
    mut repetitions: Vec<&'a Repetition>,
    annotation_name: Option<&str>,
    direction: SortDirection,
) -> Vec<&'a Repetition> {
    if let Some(name) = annotation_name {
        // `sort_by` is stable
        repetitions.sort_by(|a, b| compare_repetitions(a, b, name, direction));
    }
    repetitions
}
