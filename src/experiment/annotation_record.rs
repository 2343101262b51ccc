//! Annotation Record - named evaluation attached to a run

use serde::{Deserialize, Serialize};

/// Annotation Record is a named (score, label) evaluation of a run.
///
/// Either half may be absent: a label-only evaluator (e.g. "pass"/"fail")
/// has no score, and a numeric metric has no label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnnotationRecord {
    name: String,
    score: Option<f64>,
    label: Option<String>,
}

impl AnnotationRecord {
    /// Create an annotation with neither score nor label.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            score: None,
            label: None,
        }
    }

    /// Create a score-only annotation.
    #[must_use]
    pub fn scored(name: impl Into<String>, score: f64) -> Self {
        Self::new(name).with_score(score)
    }

    /// Create a label-only annotation.
    #[must_use]
    pub fn labeled(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name).with_label(label)
    }

    /// Set the score.
    #[must_use]
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Set the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the annotation name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the score. `NaN` scores are reported as absent.
    #[must_use]
    pub fn score(&self) -> Option<f64> {
        self.score.filter(|score| !score.is_nan())
    }

    /// Get the label.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}
