//! Validation configuration.

use serde::{Deserialize, Serialize};

/// What to do when a referenced task's component cannot be resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedPolicy {
    /// Log, record a warning, and skip the output-name check.
    #[default]
    Warn,
    /// Report an error. For hosts that resolve components eagerly.
    Error,
}

/// Knobs for a single validation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidationOptions {
    /// Skip the required-input-has-a-value check. Nested components get
    /// their inputs from the parent's wiring, not from literals.
    pub skip_input_value_validation: bool,
    pub unresolved_references: UnresolvedPolicy,
}

impl ValidationOptions {
    /// Options used for nested components during recursive validation.
    pub fn nested(&self) -> Self {
        Self {
            skip_input_value_validation: true,
            ..*self
        }
    }

    pub fn strict() -> Self {
        Self {
            unresolved_references: UnresolvedPolicy::Error,
            ..Self::default()
        }
    }
}
