//! Validation results.

use std::fmt;

use crate::error::{Severity, ValidationError};

/// Complete result of validating one component level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    /// Non-fatal findings: dangling inputs/outputs and skipped checks.
    pub warnings: Vec<ValidationError>,
}

impl ValidationOutcome {
    /// Errors and warnings together, tagged with their severity.
    pub fn issues(&self) -> impl Iterator<Item = (Severity, &ValidationError)> {
        self.errors
            .iter()
            .map(|e| (Severity::Error, e))
            .chain(self.warnings.iter().map(|w| (Severity::Warning, w)))
    }

    pub fn has_error(&self, predicate: impl Fn(&ValidationError) -> bool) -> bool {
        self.errors.iter().any(predicate)
    }
}

impl fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid {
            writeln!(f, "=== Validation: valid ({} warnings) ===", self.warnings.len())?;
        } else {
            writeln!(
                f,
                "=== Validation: invalid ({} errors, {} warnings) ===",
                self.errors.len(),
                self.warnings.len()
            )?;
        }
        for (severity, issue) in self.issues() {
            writeln!(f, "[{severity}] {issue}")?;
        }
        Ok(())
    }
}

/// Accumulator threaded through the individual checks.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationError>,
}

impl Diagnostics {
    pub(crate) fn error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub(crate) fn warning(&mut self, warning: ValidationError) {
        self.warnings.push(warning);
    }

    pub(crate) fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub(crate) fn finish(self) -> ValidationOutcome {
        ValidationOutcome {
            is_valid: self.errors.is_empty(),
            errors: self.errors,
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_validity_tracks_errors_only() {
        let mut diags = Diagnostics::default();
        diags.warning(ValidationError::UnconnectedInput("x".into()));
        let outcome = diags.finish();
        assert!(outcome.is_valid);
        assert_eq!(outcome.issues().count(), 1);
    }

    #[test]
    fn display_lists_every_issue() {
        let mut diags = Diagnostics::default();
        diags.error(ValidationError::NoTasks);
        diags.warning(ValidationError::UnconnectedOutput("y".into()));
        let text = diags.finish().to_string();
        assert!(text.contains("invalid (1 errors, 1 warnings)"));
        assert!(text.contains("[ERROR] graph implementation has no tasks"));
        assert!(text.contains("[WARN] output 'y' is not connected"));
    }
}
