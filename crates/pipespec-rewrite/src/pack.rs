//! Extraction of a selection into a nested graph component.
//!
//! The selected tasks move into a fresh graph. Every reference crossing the
//! edge of the selection becomes part of the new component's interface:
//! values flowing in become nested inputs (one per distinct source), values
//! flowing out become nested outputs (one per produced output, however many
//! consumers it has). The caller gets back the wrapper task instantiating
//! the new component plus the rewiring its external consumers need;
//! [`apply_pack`](crate::apply::apply_pack) performs that rewiring.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use pipespec_codec::reference_for;
use pipespec_core::annotations::{centroid, Annotations, Position, AUTHOR_ANNOTATION};
use pipespec_core::author::resolve_author;
use pipespec_core::component::{ComponentSpec, Implementation, InputSpec, MetadataSpec, OutputSpec};
use pipespec_core::graph::argument::{ArgumentType, TaskOutputArgument};
use pipespec_core::graph::task::TaskSpec;
use pipespec_core::graph::{ArgumentSite, GraphSpec, TaskId};
use pipespec_core::naming::unique_name;
use pipespec_core::reference::ComponentResolver;
use pipespec_core::types::TypeSpec;
use tracing::{debug, warn};

use crate::boundary::{classify_argument, external_consumers, ArgumentClass, SourceKey};
use crate::env::RewriteEnv;
use crate::error::RewriteError;
use crate::layout::{BoundingBox, LayoutConfig};
use crate::selection::Selection;

/// Name given to an extracted component when the caller supplies none.
pub const DEFAULT_SUBGRAPH_NAME: &str = "Subgraph";

#[derive(Debug, Clone, Default)]
pub struct PackOptions {
    /// Desired wrapper task id and component name. Suffixed on collision.
    pub name: Option<String>,
    pub layout: LayoutConfig,
}

impl PackOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// Where an external consumer of an extracted output lives in the parent.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConnectionTarget {
    /// Argument `argument` of the sibling task `task_id`.
    TaskArgument { task_id: TaskId, argument: String },
    /// The parent's output binding for `output`.
    GraphOutput { output: String },
}

impl From<ArgumentSite> for ConnectionTarget {
    fn from(site: ArgumentSite) -> Self {
        match site {
            ArgumentSite::TaskArgument { task_id, argument } => {
                ConnectionTarget::TaskArgument { task_id, argument }
            }
            ArgumentSite::OutputValue { output } => ConnectionTarget::GraphOutput { output },
        }
    }
}

/// How one external consumer must be rewired after a pack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionMapping {
    /// The output the consumer read before the pack.
    pub source: TaskOutputArgument,
    /// The wrapper output that now carries it.
    pub nested_output: String,
    pub target: ConnectionTarget,
}

/// Result of [`pack`].
#[derive(Debug, Clone)]
pub struct PackOutcome {
    /// Id the wrapper task should get in the parent graph.
    pub wrapper_id: TaskId,
    /// Task instantiating the extracted component.
    pub wrapper_task: TaskSpec,
    pub connection_mappings: Vec<ConnectionMapping>,
    /// Selected parent inputs whose literal value became a wrapper argument.
    pub lifted_inputs: BTreeSet<String>,
}

impl PackOutcome {
    /// The extracted component.
    pub fn nested_spec(&self) -> Option<&Arc<ComponentSpec>> {
        self.wrapper_task.component_ref.spec.as_ref()
    }
}

/// Extract `selection` out of `parent` into a new nested graph component.
///
/// `parent` is not modified. An empty selection yields a wrapper around an
/// empty graph with no interface and no mappings.
pub fn pack(
    selection: &Selection,
    parent: &ComponentSpec,
    options: &PackOptions,
    env: &RewriteEnv<'_>,
) -> Result<PackOutcome, RewriteError> {
    let graph = parent
        .graph()
        .ok_or_else(|| RewriteError::not_a_graph(parent.name.as_deref()))?;
    selection.check(parent, graph)?;

    let base = options
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_SUBGRAPH_NAME);
    let wrapper_id = unique_name(base, |id| graph.contains_task(id));

    let mut extraction = Extraction::new(parent, graph, selection, &options.layout, env.resolver);
    extraction.include_selected_inputs();
    extraction.wire_task_arguments();
    extraction.export_selected_outputs();
    extraction.export_consumed_outputs();
    let anchor = extraction.normalize_positions();

    let Extraction {
        inputs,
        outputs,
        tasks,
        output_values,
        wrapper_args,
        mappings,
        lifted,
        ..
    } = extraction;

    let mut metadata = Annotations::new();
    metadata.insert(AUTHOR_ANNOTATION.to_string(), resolve_author(env.author));
    let nested = ComponentSpec {
        name: Some(wrapper_id.clone()),
        inputs,
        outputs,
        implementation: Some(Implementation::Graph(GraphSpec {
            tasks,
            output_values,
        })),
        metadata: Some(MetadataSpec {
            annotations: metadata,
        }),
        ..ComponentSpec::default()
    };

    let mut wrapper_task = TaskSpec::new(reference_for(Arc::new(nested), env.codec)?);
    wrapper_task.arguments = wrapper_args;
    if let Some(position) = anchor {
        wrapper_task = wrapper_task.at(position);
    }

    debug!(
        wrapper = %wrapper_id,
        tasks = selection.tasks.len(),
        inputs = wrapper_task.arguments.len(),
        mappings = mappings.len(),
        "packed selection"
    );

    Ok(PackOutcome {
        wrapper_id,
        wrapper_task,
        connection_mappings: mappings,
        lifted_inputs: lifted,
    })
}

/// Accumulates the nested component while walking the selection.
struct Extraction<'a> {
    parent: &'a ComponentSpec,
    graph: &'a GraphSpec,
    selection: &'a Selection,
    layout: &'a LayoutConfig,
    resolver: &'a dyn ComponentResolver,

    inputs: Vec<InputSpec>,
    outputs: Vec<OutputSpec>,
    tasks: BTreeMap<TaskId, TaskSpec>,
    output_values: BTreeMap<String, TaskOutputArgument>,
    wrapper_args: BTreeMap<String, ArgumentType>,
    mappings: Vec<ConnectionMapping>,
    lifted: BTreeSet<String>,

    /// Selected parent input -> nested input.
    included: BTreeMap<String, String>,
    /// External source -> nested input fed by it.
    boundary: BTreeMap<SourceKey, String>,
    /// Task output inside the selection -> nested output exposing it.
    exported: BTreeMap<TaskOutputArgument, String>,
}

impl<'a> Extraction<'a> {
    fn new(
        parent: &'a ComponentSpec,
        graph: &'a GraphSpec,
        selection: &'a Selection,
        layout: &'a LayoutConfig,
        resolver: &'a dyn ComponentResolver,
    ) -> Self {
        Self {
            parent,
            graph,
            selection,
            layout,
            resolver,
            inputs: Vec::new(),
            outputs: Vec::new(),
            tasks: BTreeMap::new(),
            output_values: BTreeMap::new(),
            wrapper_args: BTreeMap::new(),
            mappings: Vec::new(),
            lifted: BTreeSet::new(),
            included: BTreeMap::new(),
            boundary: BTreeMap::new(),
            exported: BTreeMap::new(),
        }
    }

    fn input_name(&self, base: &str) -> String {
        unique_name(base, |n| self.inputs.iter().any(|i| i.name == n))
    }

    fn output_name(&self, base: &str) -> String {
        unique_name(base, |n| self.outputs.iter().any(|o| o.name == n))
    }

    /// Selected input nodes move inside. The wrapper forwards the parent
    /// input, or its literal value when it has one.
    fn include_selected_inputs(&mut self) {
        let parent = self.parent;
        let selection = self.selection;
        for name in &selection.inputs {
            let Some(input) = parent.input(name) else {
                continue;
            };
            let nested_name = self.input_name(name);
            self.inputs.push(InputSpec {
                name: nested_name.clone(),
                value: None,
                ..input.clone()
            });

            let argument = match &input.value {
                Some(value) => {
                    self.lifted.insert(name.clone());
                    ArgumentType::literal(value)
                }
                None => ArgumentType::graph_input(name),
            };
            self.wrapper_args.insert(nested_name.clone(), argument);
            self.included.insert(name.clone(), nested_name);
        }
    }

    /// Copy the selected tasks, pointing every argument that crosses the
    /// selection edge at a nested input.
    fn wire_task_arguments(&mut self) {
        let graph = self.graph;
        let selection = self.selection;
        for id in &selection.tasks {
            let Some(task) = graph.task(id) else {
                continue;
            };
            let mut task = task.clone();
            let anchor = task.position();
            let mut slot = 0;
            for argument in task.arguments.values_mut() {
                let nested_input =
                    match classify_argument(argument, &selection.tasks, &selection.inputs) {
                        ArgumentClass::Internal | ArgumentClass::Terminal => continue,
                        ArgumentClass::IncludedInput(name) => match self.included.get(name) {
                            Some(nested) => nested.clone(),
                            None => continue,
                        },
                        ArgumentClass::Boundary(key) => self.boundary_input(key, anchor, &mut slot),
                    };
                *argument = ArgumentType::graph_input(nested_input);
            }
            self.tasks.insert(id.clone(), task);
        }
    }

    /// The nested input fed by `key`, created on first use.
    fn boundary_input(&mut self, key: SourceKey, anchor: Option<Position>, slot: &mut usize) -> String {
        if let Some(name) = self.boundary.get(&key) {
            return name.clone();
        }

        let name = self.input_name(key.base_name());
        let mut input = InputSpec::new(&name);
        input.type_spec = self.source_type(&key);
        if let Some(anchor) = anchor {
            input = input.at(self.layout.input_slot(anchor, *slot));
            *slot += 1;
        }
        self.inputs.push(input);
        self.wrapper_args.insert(name.clone(), key.argument());
        self.boundary.insert(key, name.clone());
        name
    }

    /// Selected output nodes whose binding comes from inside the selection
    /// move inside under their own name.
    fn export_selected_outputs(&mut self) {
        let parent = self.parent;
        let graph = self.graph;
        let selection = self.selection;
        for name in &selection.outputs {
            let Some(binding) = graph.output_values.get(name) else {
                warn!(output = %name, "selected output is not bound; leaving it in the parent");
                continue;
            };
            if !selection.tasks.contains(&binding.task_id) {
                warn!(
                    output = %name,
                    task = %binding.task_id,
                    "selected output is bound outside the selection; leaving it in the parent"
                );
                continue;
            }
            let Some(declared) = parent.output(name) else {
                continue;
            };

            let nested_name = self.output_name(name);
            self.outputs.push(OutputSpec {
                name: nested_name.clone(),
                ..declared.clone()
            });
            self.output_values.insert(nested_name.clone(), binding.clone());
            self.exported
                .entry(binding.clone())
                .or_insert_with(|| nested_name.clone());
            self.mappings.push(ConnectionMapping {
                source: binding.clone(),
                nested_output: nested_name,
                target: ConnectionTarget::GraphOutput {
                    output: name.clone(),
                },
            });
        }
    }

    /// Expose every selected task output read from outside the selection,
    /// once per output, with one mapping per consumer.
    fn export_consumed_outputs(&mut self) {
        let graph = self.graph;
        let selection = self.selection;
        let mut slots: BTreeMap<&str, usize> = BTreeMap::new();

        for consumer in external_consumers(graph, &selection.tasks, &selection.outputs) {
            let nested_output = match self.exported.get(&consumer.source) {
                Some(name) => name.clone(),
                None => {
                    let source = &consumer.source;
                    let name = self.output_name(&source.output_name);
                    let mut output = OutputSpec::new(&name);
                    output.type_spec = self.task_output_type(source);
                    if let Some((task_id, task)) = graph.tasks.get_key_value(&source.task_id) {
                        if let Some(anchor) = task.position() {
                            let slot = slots.entry(task_id.as_str()).or_default();
                            output = output.at(self.layout.output_slot(anchor, *slot));
                            *slot += 1;
                        }
                    }
                    self.outputs.push(output);
                    self.output_values.insert(name.clone(), source.clone());
                    self.exported.insert(source.clone(), name.clone());
                    name
                }
            };
            self.mappings.push(ConnectionMapping {
                source: consumer.source,
                nested_output,
                target: consumer.site.into(),
            });
        }
    }

    /// Shift every nested element so the bounding box starts at the
    /// configured padding. Returns the centroid of the selected elements in
    /// parent coordinates, where the wrapper goes.
    fn normalize_positions(&mut self) -> Option<Position> {
        let graph = self.graph;
        let parent = self.parent;
        let selection = self.selection;
        let anchor = centroid(
            selection
                .tasks
                .iter()
                .filter_map(|id| graph.task(id)?.position())
                .chain(selection.inputs.iter().filter_map(|n| parent.input(n)?.position()))
                .chain(selection.outputs.iter().filter_map(|n| parent.output(n)?.position())),
        );

        let bbox = BoundingBox::from_points(
            self.tasks
                .values()
                .filter_map(TaskSpec::position)
                .chain(self.inputs.iter().filter_map(InputSpec::position))
                .chain(self.outputs.iter().filter_map(OutputSpec::position)),
        );
        if let Some(bbox) = bbox {
            let padding = self.layout.padding;
            let annotations = self
                .tasks
                .values_mut()
                .map(|t| &mut t.annotations)
                .chain(self.inputs.iter_mut().map(|i| &mut i.annotations))
                .chain(self.outputs.iter_mut().map(|o| &mut o.annotations));
            for annotations in annotations {
                if let Some(p) = Position::read(annotations) {
                    bbox.normalize(p, padding).write(annotations);
                }
            }
        }
        anchor
    }

    fn source_type(&self, key: &SourceKey) -> Option<TypeSpec> {
        match key {
            SourceKey::TaskOutput {
                task_id,
                output_name,
            } => self.task_output_type(&TaskOutputArgument::new(task_id, output_name)),
            SourceKey::GraphInput { input_name } => self.parent.input(input_name)?.type_spec.clone(),
        }
    }

    /// Declared type of a task output, when the task's component resolves.
    fn task_output_type(&self, source: &TaskOutputArgument) -> Option<TypeSpec> {
        let task = self.graph.task(&source.task_id)?;
        let component = self.resolver.resolve(&task.component_ref)?;
        let output = component.output(&source.output_name)?;
        output.type_spec.clone()
    }
}
