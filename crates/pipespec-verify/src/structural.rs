//! Checks on a component's own declaration: name, implementation, and
//! the input/output namespaces.

use std::collections::HashSet;

use pipespec_core::component::ComponentSpec;

use crate::error::ValidationError;
use crate::options::ValidationOptions;
use crate::report::Diagnostics;

/// Fatal pre-checks. Returns `false` when validation must stop here.
pub(crate) fn check_preconditions(spec: &ComponentSpec, diags: &mut Diagnostics) -> bool {
    if spec.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
        diags.error(ValidationError::MissingName);
    }
    if spec.implementation.is_none() {
        diags.error(ValidationError::MissingImplementation);
    }
    !diags.has_errors()
}

/// Empty and duplicate names among inputs and outputs.
pub(crate) fn check_interface_names(spec: &ComponentSpec, diags: &mut Diagnostics) {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for (index, input) in spec.inputs.iter().enumerate() {
        if input.name.trim().is_empty() {
            diags.error(ValidationError::EmptyInputName { index });
        } else if !seen.insert(input.name.as_str()) && reported.insert(input.name.as_str()) {
            diags.error(ValidationError::DuplicateInput(input.name.clone()));
        }
    }

    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for (index, output) in spec.outputs.iter().enumerate() {
        if output.name.trim().is_empty() {
            diags.error(ValidationError::EmptyOutputName { index });
        } else if !seen.insert(output.name.as_str()) && reported.insert(output.name.as_str()) {
            diags.error(ValidationError::DuplicateOutput(output.name.clone()));
        }
    }
}

/// Required inputs need a value or a default unless the caller opted out.
pub(crate) fn check_input_values(
    spec: &ComponentSpec,
    options: &ValidationOptions,
    diags: &mut Diagnostics,
) {
    if options.skip_input_value_validation {
        return;
    }
    for input in &spec.inputs {
        if input.is_required() && input.value.is_none() {
            diags.error(ValidationError::MissingInputValue(input.name.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipespec_core::builder::ComponentBuilder;
    use pipespec_core::component::InputSpec;

    #[test]
    fn missing_name_and_implementation_both_reported() {
        let spec = ComponentBuilder::unnamed().build();
        let mut diags = Diagnostics::default();
        assert!(!check_preconditions(&spec, &mut diags));
        let outcome = diags.finish();
        assert_eq!(
            outcome.errors,
            vec![
                ValidationError::MissingName,
                ValidationError::MissingImplementation
            ]
        );
    }

    #[test]
    fn duplicates_reported_once() {
        let spec = ComponentBuilder::new("c")
            .input_named("x")
            .input_named("x")
            .input_named("x")
            .input_named("")
            .output_named("y")
            .output_named("y")
            .build();
        let mut diags = Diagnostics::default();
        check_interface_names(&spec, &mut diags);
        let outcome = diags.finish();
        assert_eq!(
            outcome.errors,
            vec![
                ValidationError::DuplicateInput("x".into()),
                ValidationError::EmptyInputName { index: 3 },
                ValidationError::DuplicateOutput("y".into()),
            ]
        );
    }

    #[test]
    fn input_values_skippable() {
        let spec = ComponentBuilder::new("c")
            .input(InputSpec::new("needs"))
            .input(InputSpec::new("given").with_value("1"))
            .input(InputSpec::new("opt").optional())
            .build();

        let mut diags = Diagnostics::default();
        check_input_values(&spec, &ValidationOptions::default(), &mut diags);
        assert_eq!(
            diags.finish().errors,
            vec![ValidationError::MissingInputValue("needs".into())]
        );

        let mut diags = Diagnostics::default();
        check_input_values(&spec, &ValidationOptions::default().nested(), &mut diags);
        assert!(diags.finish().is_valid);
    }
}
