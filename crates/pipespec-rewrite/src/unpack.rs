//! Inlining of a nested graph task into its parent.
//!
//! Unpacking runs as a fixed sequence of phases. Each takes the parent spec
//! built so far and returns its successor:
//!
//! 1. materialize nested inputs the wrapper feeds with a literal (or not at all)
//! 2. materialize nested outputs nobody outside the wrapper reads
//! 3. copy the inner tasks under collision-free ids, splicing wrapper arguments
//! 4. bind the materialized outputs
//! 5. verify the spliced upstream references
//! 6. redirect parent output bindings that read the wrapper
//! 7. redirect sibling arguments that read the wrapper
//!
//! The wrapper task itself is dropped at the end.

use std::collections::{BTreeMap, BTreeSet};

use pipespec_core::annotations::{centroid, Annotations, Position};
use pipespec_core::component::{ComponentSpec, InputSpec, OutputSpec};
use pipespec_core::graph::argument::{ArgumentType, TaskOutputArgument};
use pipespec_core::graph::task::TaskSpec;
use pipespec_core::graph::{GraphSpec, TaskId};
use pipespec_core::naming::unique_name;
use tracing::{debug, warn};

use crate::env::RewriteEnv;
use crate::error::RewriteError;

/// Replace task `task_id` of `parent` with the contents of its nested graph.
///
/// Returns `parent` unchanged when the task's component cannot be resolved
/// or is not itself a graph.
pub fn unpack(
    task_id: &str,
    parent: &ComponentSpec,
    env: &RewriteEnv<'_>,
) -> Result<ComponentSpec, RewriteError> {
    let graph = parent
        .graph()
        .ok_or_else(|| RewriteError::not_a_graph(parent.name.as_deref()))?;
    let wrapper = graph
        .task(task_id)
        .ok_or_else(|| RewriteError::TaskNotFound(task_id.to_string()))?;

    let Some(nested) = env.resolver.resolve(&wrapper.component_ref) else {
        debug!(task = %task_id, "component not resolvable; nothing to unpack");
        return Ok(parent.clone());
    };
    let Some(inner) = nested.graph() else {
        debug!(task = %task_id, "component is not a graph; nothing to unpack");
        return Ok(parent.clone());
    };

    let mut splice = Splice::new(task_id, wrapper, &nested, inner);
    let spec = splice.materialize_inputs(parent.clone());
    let spec = splice.materialize_outputs(spec);
    let spec = splice.copy_tasks(spec);
    let spec = splice.bind_outputs(spec);
    let spec = splice.check_upstream(spec);
    let spec = splice.reconnect_output_values(spec);
    let spec = splice.reconnect_consumers(spec);
    let spec = splice.remove_wrapper(spec);

    debug!(
        task = %task_id,
        tasks = splice.task_renames.len(),
        inputs = splice.input_renames.len(),
        outputs = splice.output_renames.len(),
        "unpacked task"
    );
    Ok(spec)
}

/// State shared by the phases of one unpack.
struct Splice<'a> {
    wrapper_id: &'a str,
    wrapper: &'a TaskSpec,
    nested: &'a ComponentSpec,
    inner: &'a GraphSpec,
    /// Nested centroid and wrapper position, when both are known.
    anchor: Option<(Position, Position)>,

    /// Nested input -> parent input created for it.
    input_renames: BTreeMap<String, String>,
    /// Nested output -> parent output created for it.
    output_renames: BTreeMap<String, String>,
    /// Inner task id -> id in the parent.
    task_renames: BTreeMap<TaskId, TaskId>,
}

impl<'a> Splice<'a> {
    fn new(
        wrapper_id: &'a str,
        wrapper: &'a TaskSpec,
        nested: &'a ComponentSpec,
        inner: &'a GraphSpec,
    ) -> Self {
        let nested_centre = centroid(inner.tasks.values().filter_map(TaskSpec::position));
        let anchor = nested_centre.zip(wrapper.position());
        Self {
            wrapper_id,
            wrapper,
            nested,
            inner,
            anchor,
            input_renames: BTreeMap::new(),
            output_renames: BTreeMap::new(),
            task_renames: BTreeMap::new(),
        }
    }

    /// Move a nested position into parent coordinates.
    fn place(&self, annotations: &mut Annotations) {
        if let (Some(p), Some((from, to))) = (Position::read(annotations), self.anchor) {
            p.rebase(from, to).write(annotations);
        }
    }

    fn renamed_task(&self, id: &str) -> TaskId {
        self.task_renames
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    fn redirect(&self, binding: &TaskOutputArgument) -> TaskOutputArgument {
        TaskOutputArgument::new(self.renamed_task(&binding.task_id), &binding.output_name)
    }

    fn materialize_inputs(&mut self, mut spec: ComponentSpec) -> ComponentSpec {
        let nested = self.nested;
        for input in &nested.inputs {
            let default = match self.wrapper.arguments.get(&input.name) {
                Some(ArgumentType::Literal(value)) => Some(value.clone()),
                None => input.default.clone(),
                Some(_) => continue,
            };
            let name = unique_name(&input.name, |n| spec.has_input(n));
            let mut materialized = InputSpec {
                name: name.clone(),
                default,
                value: None,
                ..input.clone()
            };
            self.place(&mut materialized.annotations);
            spec.inputs.push(materialized);
            self.input_renames.insert(input.name.clone(), name);
        }
        spec
    }

    fn materialize_outputs(&mut self, mut spec: ComponentSpec) -> ComponentSpec {
        let consumed: BTreeSet<String> = spec
            .graph()
            .map(|graph| {
                graph
                    .consumers_of(self.wrapper_id)
                    .into_iter()
                    .map(|(_, out)| out.output_name.clone())
                    .collect()
            })
            .unwrap_or_default();

        let nested = self.nested;
        for output in &nested.outputs {
            if consumed.contains(&output.name) {
                continue;
            }
            if !self.inner.output_values.contains_key(&output.name) {
                debug!(output = %output.name, "nested output is unbound; not materialized");
                continue;
            }
            let name = unique_name(&output.name, |n| spec.has_output(n));
            let mut materialized = OutputSpec {
                name: name.clone(),
                ..output.clone()
            };
            self.place(&mut materialized.annotations);
            spec.outputs.push(materialized);
            self.output_renames.insert(output.name.clone(), name);
        }
        spec
    }

    fn copy_tasks(&mut self, mut spec: ComponentSpec) -> ComponentSpec {
        let inner = self.inner;
        let Some(graph) = spec.graph_mut() else {
            return spec;
        };

        let mut introduced: BTreeSet<String> = BTreeSet::new();
        for id in inner.tasks.keys() {
            let new_id = unique_name(id, |n| graph.contains_task(n) || introduced.contains(n));
            introduced.insert(new_id.clone());
            self.task_renames.insert(id.clone(), new_id);
        }

        for (id, task) in &inner.tasks {
            let mut copy = task.clone();
            for argument in copy.arguments.values_mut() {
                *argument = self.splice_argument(argument);
            }
            self.place(&mut copy.annotations);
            graph.tasks.insert(self.renamed_task(id), copy);
        }
        spec
    }

    /// Translate an inner argument into parent terms.
    fn splice_argument(&self, argument: &ArgumentType) -> ArgumentType {
        match argument {
            ArgumentType::TaskOutput(out) => ArgumentType::TaskOutput(self.redirect(out)),
            ArgumentType::GraphInput(input) => {
                if let Some(name) = self.input_renames.get(&input.input_name) {
                    ArgumentType::graph_input(name)
                } else if let Some(outer) = self.wrapper.arguments.get(&input.input_name) {
                    outer.clone()
                } else {
                    argument.clone()
                }
            }
            ArgumentType::Literal(_) | ArgumentType::Secret(_) => argument.clone(),
        }
    }

    fn bind_outputs(&self, mut spec: ComponentSpec) -> ComponentSpec {
        let Some(graph) = spec.graph_mut() else {
            return spec;
        };
        for (nested_name, parent_name) in &self.output_renames {
            if let Some(binding) = self.inner.output_values.get(nested_name) {
                graph
                    .output_values
                    .insert(parent_name.clone(), self.redirect(binding));
            }
        }
        spec
    }

    /// Every copied task must read from inputs and tasks that exist.
    fn check_upstream(&self, spec: ComponentSpec) -> ComponentSpec {
        let Some(graph) = spec.graph() else {
            return spec;
        };
        for id in self.task_renames.values() {
            let Some(task) = graph.task(id) else {
                continue;
            };
            for (name, argument) in &task.arguments {
                match argument {
                    ArgumentType::GraphInput(input) if !spec.has_input(&input.input_name) => {
                        warn!(
                            task = %id,
                            argument = %name,
                            input = %input.input_name,
                            "spliced argument reads an undeclared input"
                        );
                    }
                    ArgumentType::TaskOutput(out) if !graph.contains_task(&out.task_id) => {
                        warn!(
                            task = %id,
                            argument = %name,
                            target = %out.task_id,
                            "spliced argument reads a missing task"
                        );
                    }
                    _ => {}
                }
            }
        }
        spec
    }

    fn reconnect_output_values(&self, mut spec: ComponentSpec) -> ComponentSpec {
        let Some(graph) = spec.graph_mut() else {
            return spec;
        };
        graph.output_values.retain(|output, binding| {
            if binding.task_id != self.wrapper_id {
                return true;
            }
            match self.inner.output_values.get(&binding.output_name) {
                Some(source) => {
                    *binding = self.redirect(source);
                    true
                }
                None => {
                    warn!(
                        output = %output,
                        wrapper_output = %binding.output_name,
                        "output reads an unbound wrapper output; binding removed"
                    );
                    false
                }
            }
        });
        spec
    }

    fn reconnect_consumers(&self, mut spec: ComponentSpec) -> ComponentSpec {
        let Some(graph) = spec.graph_mut() else {
            return spec;
        };
        for (task_id, task) in graph.tasks.iter_mut() {
            if task_id == self.wrapper_id {
                continue;
            }
            task.arguments.retain(|name, argument| {
                let wrapper_output = match argument {
                    ArgumentType::TaskOutput(out) if out.task_id == self.wrapper_id => {
                        out.output_name.clone()
                    }
                    _ => return true,
                };
                match self.inner.output_values.get(&wrapper_output) {
                    Some(source) => {
                        *argument = ArgumentType::TaskOutput(self.redirect(source));
                        true
                    }
                    None => {
                        warn!(
                            task = %task_id,
                            argument = %name,
                            wrapper_output = %wrapper_output,
                            "argument reads an unbound wrapper output; argument removed"
                        );
                        false
                    }
                }
            });
        }
        spec
    }

    fn remove_wrapper(&self, mut spec: ComponentSpec) -> ComponentSpec {
        if let Some(graph) = spec.graph_mut() {
            graph.tasks.remove(self.wrapper_id);
        }
        spec
    }
}
