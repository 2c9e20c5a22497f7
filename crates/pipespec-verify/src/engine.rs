//! Validation entry points.

use pipespec_core::component::ComponentSpec;
use pipespec_core::reference::{ComponentResolver, InlineResolver};

use crate::options::ValidationOptions;
use crate::recursive::RecursiveReport;
use crate::references::GraphChecks;
use crate::report::{Diagnostics, ValidationOutcome};
use crate::structural::{check_input_values, check_interface_names, check_preconditions};

/// Validation engine bound to a component resolver.
pub struct Validator<'r> {
    resolver: &'r dyn ComponentResolver,
    options: ValidationOptions,
}

impl<'r> Validator<'r> {
    pub fn new(resolver: &'r dyn ComponentResolver) -> Self {
        Self {
            resolver,
            options: ValidationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    pub(crate) fn resolver(&self) -> &'r dyn ComponentResolver {
        self.resolver
    }

    /// Validate one component level.
    pub fn validate(&self, spec: &ComponentSpec) -> ValidationOutcome {
        self.validate_with(spec, &self.options)
    }

    pub(crate) fn validate_with(
        &self,
        spec: &ComponentSpec,
        options: &ValidationOptions,
    ) -> ValidationOutcome {
        let mut diags = Diagnostics::default();
        if !check_preconditions(spec, &mut diags) {
            return diags.finish();
        }

        check_interface_names(spec, &mut diags);
        check_input_values(spec, options, &mut diags);

        if let Some(graph) = spec.graph() {
            GraphChecks {
                spec,
                graph,
                resolver: self.resolver,
                options,
            }
            .run(&mut diags);
        }

        diags.finish()
    }
}

/// Validate one component level, resolving nested components inline only.
pub fn validate(spec: &ComponentSpec, options: &ValidationOptions) -> ValidationOutcome {
    Validator::new(&InlineResolver)
        .with_options(*options)
        .validate(spec)
}

/// Validate `spec` and every nested graph component reachable from it.
pub fn validate_recursive(spec: &ComponentSpec) -> RecursiveReport {
    Validator::new(&InlineResolver).validate_recursive(spec)
}
