//! Programmatic construction of component specs.
//!
//! # Example
//!
//! ```rust
//! use pipespec_core::builder::{ComponentBuilder, TaskBuilder};
//!
//! let producer = ComponentBuilder::new("produce")
//!     .output_named("out")
//!     .container("alpine")
//!     .build();
//! let consumer = ComponentBuilder::new("consume")
//!     .input_named("in")
//!     .container("alpine")
//!     .build();
//!
//! let pipeline = ComponentBuilder::new("pipeline")
//!     .task("a", TaskBuilder::inline(producer).build())
//!     .task("b", TaskBuilder::inline(consumer).from_task("in", "a", "out").build())
//!     .build();
//!
//! assert_eq!(pipeline.graph().map(|g| g.task_count()), Some(2));
//! ```

use std::sync::Arc;

use crate::annotations::{Annotations, Position};
use crate::component::{
    ComponentSpec, ContainerSpec, Implementation, InputSpec, MetadataSpec, OutputSpec,
};
use crate::graph::argument::{ArgumentType, TaskOutputArgument};
use crate::graph::task::TaskSpec;
use crate::graph::GraphSpec;
use crate::reference::ComponentReference;

/// Builder for [`ComponentSpec`].
#[derive(Debug, Default)]
pub struct ComponentBuilder {
    spec: ComponentSpec,
    graph: Option<GraphSpec>,
    metadata: Annotations,
}

impl ComponentBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            spec: ComponentSpec {
                name: Some(name.into()),
                ..ComponentSpec::default()
            },
            graph: None,
            metadata: Annotations::new(),
        }
    }

    /// Builder for a component without a name.
    pub fn unnamed() -> Self {
        Self::default()
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.spec.description = Some(text.into());
        self
    }

    pub fn input(mut self, input: InputSpec) -> Self {
        self.spec.inputs.push(input);
        self
    }

    pub fn input_named(self, name: &str) -> Self {
        self.input(InputSpec::new(name))
    }

    pub fn output(mut self, output: OutputSpec) -> Self {
        self.spec.outputs.push(output);
        self
    }

    pub fn output_named(self, name: &str) -> Self {
        self.output(OutputSpec::new(name))
    }

    /// Use a container implementation. Discards any tasks added so far.
    pub fn container(mut self, image: impl Into<String>) -> Self {
        self.graph = None;
        self.spec.implementation = Some(Implementation::Container(ContainerSpec::new(image)));
        self
    }

    /// Use a graph implementation, even if it ends up with no tasks.
    pub fn graph(mut self) -> Self {
        self.graph.get_or_insert_with(GraphSpec::default);
        self
    }

    pub fn task(mut self, id: impl Into<String>, task: TaskSpec) -> Self {
        self.graph
            .get_or_insert_with(GraphSpec::default)
            .tasks
            .insert(id.into(), task);
        self
    }

    pub fn output_value(mut self, output: &str, task_id: &str, task_output: &str) -> Self {
        self.graph
            .get_or_insert_with(GraphSpec::default)
            .output_values
            .insert(output.to_string(), TaskOutputArgument::new(task_id, task_output));
        self
    }

    pub fn annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> ComponentSpec {
        let mut spec = self.spec;
        if let Some(graph) = self.graph {
            spec.implementation = Some(Implementation::Graph(graph));
        }
        if !self.metadata.is_empty() {
            spec.metadata = Some(MetadataSpec {
                annotations: self.metadata,
            });
        }
        spec
    }
}

/// Builder for [`TaskSpec`].
#[derive(Debug, Default)]
pub struct TaskBuilder {
    task: TaskSpec,
}

impl TaskBuilder {
    pub fn new(component_ref: ComponentReference) -> Self {
        Self {
            task: TaskSpec::new(component_ref),
        }
    }

    /// Task instantiating an inline component.
    pub fn inline(spec: ComponentSpec) -> Self {
        Self::new(ComponentReference::inline(spec))
    }

    /// Task sharing an already-allocated component.
    pub fn shared(spec: Arc<ComponentSpec>) -> Self {
        Self::new(ComponentReference::shared(spec))
    }

    pub fn argument(mut self, name: &str, argument: ArgumentType) -> Self {
        self.task.arguments.insert(name.to_string(), argument);
        self
    }

    pub fn literal(self, name: &str, value: &str) -> Self {
        self.argument(name, ArgumentType::literal(value))
    }

    pub fn from_input(self, name: &str, input: &str) -> Self {
        self.argument(name, ArgumentType::graph_input(input))
    }

    pub fn from_task(self, name: &str, task_id: &str, output: &str) -> Self {
        self.argument(name, ArgumentType::task_output(task_id, output))
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        Position::new(x, y).write(&mut self.task.annotations);
        self
    }

    pub fn build(self) -> TaskSpec {
        self.task
    }
}
