//! Checks on a graph implementation: task references, argument wiring,
//! output bindings, dangling interface, and cycles.

use pipespec_core::component::ComponentSpec;
use pipespec_core::graph::argument::ArgumentType;
use pipespec_core::graph::GraphSpec;
use pipespec_core::reference::ComponentResolver;
use tracing::warn;

use crate::cycle::find_circular_tasks;
use crate::error::ValidationError;
use crate::options::{UnresolvedPolicy, ValidationOptions};
use crate::report::Diagnostics;

/// Graph-level checks for the component `spec` implemented by `graph`.
pub(crate) struct GraphChecks<'a> {
    pub spec: &'a ComponentSpec,
    pub graph: &'a GraphSpec,
    pub resolver: &'a dyn ComponentResolver,
    pub options: &'a ValidationOptions,
}

impl GraphChecks<'_> {
    pub(crate) fn run(&self, diags: &mut Diagnostics) {
        if self.graph.tasks.is_empty() {
            diags.error(ValidationError::NoTasks);
        }
        self.check_tasks(diags);
        self.check_output_values(diags);
        self.check_connectivity(diags);
        for task in find_circular_tasks(self.graph) {
            diags.error(ValidationError::CircularDependency(task));
        }
    }

    fn check_tasks(&self, diags: &mut Diagnostics) {
        for (task_id, task) in &self.graph.tasks {
            if task.component_ref.is_empty() {
                diags.error(ValidationError::MissingComponentRef(task_id.clone()));
            }

            for (arg_name, arg) in &task.arguments {
                match arg {
                    ArgumentType::GraphInput(input) => {
                        if !self.spec.has_input(&input.input_name) {
                            diags.error(ValidationError::UnknownGraphInput {
                                task: task_id.clone(),
                                argument: arg_name.clone(),
                                input: input.input_name.clone(),
                            });
                        }
                    }
                    ArgumentType::TaskOutput(out) => match self.graph.task(&out.task_id) {
                        None => diags.error(ValidationError::UnknownTask {
                            task: task_id.clone(),
                            argument: arg_name.clone(),
                            target: out.task_id.clone(),
                        }),
                        Some(target) => match self.resolver.resolve(&target.component_ref) {
                            Some(component) => {
                                if !component.has_output(&out.output_name) {
                                    diags.error(ValidationError::UnknownTaskOutput {
                                        task: task_id.clone(),
                                        argument: arg_name.clone(),
                                        target: out.task_id.clone(),
                                        output: out.output_name.clone(),
                                    });
                                }
                            }
                            None => self.unresolved(
                                format!("task '{task_id}' argument '{arg_name}'"),
                                &out.task_id,
                                diags,
                            ),
                        },
                    },
                    ArgumentType::Literal(_) | ArgumentType::Secret(_) => {}
                }
            }

            if let Some(component) = self.resolver.resolve(&task.component_ref) {
                for input in component.inputs.iter().filter(|i| i.is_required()) {
                    if !task.arguments.contains_key(&input.name) {
                        diags.error(ValidationError::MissingRequiredArgument {
                            task: task_id.clone(),
                            input: input.name.clone(),
                        });
                    }
                }
            }
        }
    }

    fn check_output_values(&self, diags: &mut Diagnostics) {
        for (output, binding) in &self.graph.output_values {
            if !self.spec.has_output(output) {
                diags.error(ValidationError::UndeclaredOutputValue {
                    output: output.clone(),
                });
            }
            match self.graph.task(&binding.task_id) {
                None => diags.error(ValidationError::OutputValueUnknownTask {
                    output: output.clone(),
                    task: binding.task_id.clone(),
                }),
                Some(task) => match self.resolver.resolve(&task.component_ref) {
                    Some(component) => {
                        if !component.has_output(&binding.output_name) {
                            diags.error(ValidationError::OutputValueUnknownOutput {
                                output: output.clone(),
                                task: binding.task_id.clone(),
                                task_output: binding.output_name.clone(),
                            });
                        }
                    }
                    None => self.unresolved(
                        format!("output value '{output}'"),
                        &binding.task_id,
                        diags,
                    ),
                },
            }
        }
    }

    /// Declared inputs and outputs that nothing inside the graph touches.
    fn check_connectivity(&self, diags: &mut Diagnostics) {
        let referenced = self.graph.referenced_inputs();
        for input in &self.spec.inputs {
            if !referenced.contains(input.name.as_str()) {
                diags.warning(ValidationError::UnconnectedInput(input.name.clone()));
            }
        }
        for output in &self.spec.outputs {
            if !self.graph.output_values.contains_key(&output.name) {
                diags.warning(ValidationError::UnconnectedOutput(output.name.clone()));
            }
        }
    }

    fn unresolved(&self, referrer: String, target: &str, diags: &mut Diagnostics) {
        let issue = ValidationError::UnresolvedComponent {
            referrer,
            target: target.to_string(),
        };
        match self.options.unresolved_references {
            UnresolvedPolicy::Warn => {
                warn!(%issue, "skipping output check for unresolved component");
                diags.warning(issue);
            }
            UnresolvedPolicy::Error => diags.error(issue),
        }
    }
}
