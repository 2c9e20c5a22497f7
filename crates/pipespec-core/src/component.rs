//! Component specifications: the reusable unit of a pipeline.

use serde::{Deserialize, Serialize};

use crate::annotations::{Annotations, Position};
use crate::graph::GraphSpec;
use crate::types::TypeSpec;

/// A declared input of a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputSpec {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_spec: Option<TypeSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
    /// Literal value bound to this input at the graph level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

impl InputSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_spec: None,
            description: None,
            default: None,
            optional: false,
            value: None,
            annotations: Annotations::new(),
        }
    }

    pub fn with_type(mut self, type_spec: impl Into<TypeSpec>) -> Self {
        self.type_spec = Some(type_spec.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        position.write(&mut self.annotations);
        self
    }

    /// An input is required when it is neither optional nor defaulted.
    pub fn is_required(&self) -> bool {
        !self.optional && self.default.is_none()
    }

    pub fn position(&self) -> Option<Position> {
        Position::read(&self.annotations)
    }
}

/// A declared output of a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputSpec {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_spec: Option<TypeSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

impl OutputSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_spec: None,
            description: None,
            annotations: Annotations::new(),
        }
    }

    pub fn with_type(mut self, type_spec: impl Into<TypeSpec>) -> Self {
        self.type_spec = Some(type_spec.into());
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        position.write(&mut self.annotations);
        self
    }

    pub fn position(&self) -> Option<Position> {
        Position::read(&self.annotations)
    }
}

/// An atomic container implementation. Opaque to the rewriting engines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSpec {
    pub image: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub env: Annotations,
}

impl ContainerSpec {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            ..Self::default()
        }
    }
}

/// How a component is implemented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Implementation {
    Container(ContainerSpec),
    Graph(GraphSpec),
}

/// Free-form metadata attached to a component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataSpec {
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

/// Declaration of a reusable unit with typed inputs and outputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<InputSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<OutputSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation: Option<Implementation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataSpec>,
}

impl ComponentSpec {
    /// The graph implementation, if this component is a nested graph.
    pub fn graph(&self) -> Option<&GraphSpec> {
        match &self.implementation {
            Some(Implementation::Graph(graph)) => Some(graph),
            _ => None,
        }
    }

    /// Mutable access to the graph implementation of a freshly built value.
    pub fn graph_mut(&mut self) -> Option<&mut GraphSpec> {
        match &mut self.implementation {
            Some(Implementation::Graph(graph)) => Some(graph),
            _ => None,
        }
    }

    pub fn is_graph(&self) -> bool {
        self.graph().is_some()
    }

    pub fn input(&self, name: &str) -> Option<&InputSpec> {
        self.inputs.iter().find(|i| i.name == name)
    }

    pub fn output(&self, name: &str) -> Option<&OutputSpec> {
        self.outputs.iter().find(|o| o.name == name)
    }

    pub fn has_input(&self, name: &str) -> bool {
        self.input(name).is_some()
    }

    pub fn has_output(&self, name: &str) -> bool {
        self.output(name).is_some()
    }

    /// Metadata annotation lookup.
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.annotations.get(key))
            .map(String::as_str)
    }

    /// Return a copy with `implementation` replaced by `graph`.
    pub fn with_graph(&self, graph: GraphSpec) -> ComponentSpec {
        ComponentSpec {
            implementation: Some(Implementation::Graph(graph)),
            ..self.clone()
        }
    }
}
