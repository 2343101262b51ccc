//! Comparison session configuration
//!
//! A serializable description of what to compare and how to start, loaded
//! from JSON by the host and fed to [`ComparisonSessionBuilder::config`].
//!
//! ```rust
//! use trueno_compare::config::ComparisonConfig;
//! use trueno_compare::ranking::SortDirection;
//!
//! let config = ComparisonConfig::from_json_str(r#"{
//!     "baseline_id": "exp-1",
//!     "comparison_ids": ["exp-2"],
//!     "sort_annotation": "accuracy",
//!     "sort_direction": "desc"
//! }"#)?;
//!
//! assert_eq!(config.sort_direction, SortDirection::Descending);
//! assert!(config.include_repetitions.is_none());
//! # Ok::<(), trueno_compare::Error>(())
//! ```
//!
//! [`ComparisonSessionBuilder::config`]: crate::session::ComparisonSessionBuilder::config

use std::path::Path;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::ranking::SortDirection;
use crate::{Error, Result};

/// Comparison session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComparisonConfig {
    /// Experiment every other experiment is compared against.
    pub baseline_id: String,
    /// Experiments compared against the baseline, in display order.
    #[serde(default)]
    pub comparison_ids: Vec<String>,
    /// Group by experiment (`true`) or flatten (`false`). Inferred from the
    /// catalog when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_repetitions: Option<bool>,
    /// Only this baseline repetition starts selected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_repetition_number: Option<u32>,
    /// Annotation driving the initial ranking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_annotation: Option<String>,
    /// Initial ranking direction.
    #[serde(default)]
    pub sort_direction: SortDirection,
}

impl ComparisonConfig {
    /// Minimal configuration for a baseline with no comparisons.
    #[must_use]
    pub fn new(baseline_id: impl Into<String>) -> Self {
        Self {
            baseline_id: baseline_id.into(),
            comparison_ids: Vec::new(),
            include_repetitions: None,
            default_repetition_number: None,
            sort_annotation: None,
            sort_direction: SortDirection::default(),
        }
    }

    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] for malformed JSON and [`Error::Config`] when
    /// validation fails.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, otherwise as
    /// [`ComparisonConfig::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check the configuration for values no session can honour.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an empty baseline ID, a repetition number
    /// of zero, or a comparison list that contains the baseline or repeats an
    /// ID.
    pub fn validate(&self) -> Result<()> {
        if self.baseline_id.trim().is_empty() {
            return Err(Error::Config("baseline_id must not be empty".to_string()));
        }
        if self.default_repetition_number == Some(0) {
            return Err(Error::Config(
                "default_repetition_number is 1-based; 0 is not a repetition".to_string(),
            ));
        }
        if self.comparison_ids.contains(&self.baseline_id) {
            return Err(Error::Config(format!(
                "comparison_ids must not contain the baseline ({})",
                self.baseline_id
            )));
        }
        let mut seen = FxHashSet::default();
        if let Some(duplicate) = self.comparison_ids.iter().find(|id| !seen.insert(id.as_str())) {
            return Err(Error::Config(format!(
                "comparison_ids lists {duplicate} more than once"
            )));
        }
        Ok(())
    }
}
