//! Reference Output - ground truth compared alongside experiments

use serde::{Deserialize, Serialize};

/// Externally supplied ground-truth payload.
///
/// Independent of any experiment and of repetitions; the session only tracks
/// whether it participates in the comparison.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReferenceOutput {
    value: serde_json::Value,
}

impl ReferenceOutput {
    /// Wrap a reference payload.
    #[must_use]
    pub const fn new(value: serde_json::Value) -> Self {
        Self { value }
    }

    /// Get the payload.
    #[must_use]
    pub const fn value(&self) -> &serde_json::Value {
        &self.value
    }
}

impl From<serde_json::Value> for ReferenceOutput {
    fn from(value: serde_json::Value) -> Self {
        Self::new(value)
    }
}
