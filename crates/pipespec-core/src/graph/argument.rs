//! Task arguments: how a task input receives its value.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference to an input of the enclosing component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphInputArgument {
    pub input_name: String,
}

/// Reference to an output of a sibling task in the same graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskOutputArgument {
    pub task_id: String,
    pub output_name: String,
}

impl TaskOutputArgument {
    pub fn new(task_id: impl Into<String>, output_name: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            output_name: output_name.into(),
        }
    }
}

/// A secret resolved by the runtime. Never followed by the core.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretArgument {
    pub name: String,
}

/// The value bound to one task input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArgumentType {
    Literal(String),
    GraphInput(GraphInputArgument),
    TaskOutput(TaskOutputArgument),
    Secret(SecretArgument),
}

impl ArgumentType {
    pub fn literal(value: impl Into<String>) -> Self {
        ArgumentType::Literal(value.into())
    }

    pub fn graph_input(input_name: impl Into<String>) -> Self {
        ArgumentType::GraphInput(GraphInputArgument {
            input_name: input_name.into(),
        })
    }

    pub fn task_output(task_id: impl Into<String>, output_name: impl Into<String>) -> Self {
        ArgumentType::TaskOutput(TaskOutputArgument::new(task_id, output_name))
    }

    pub fn secret(name: impl Into<String>) -> Self {
        ArgumentType::Secret(SecretArgument { name: name.into() })
    }

    pub fn as_task_output(&self) -> Option<&TaskOutputArgument> {
        match self {
            ArgumentType::TaskOutput(arg) => Some(arg),
            _ => None,
        }
    }

    pub fn as_graph_input(&self) -> Option<&GraphInputArgument> {
        match self {
            ArgumentType::GraphInput(arg) => Some(arg),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            ArgumentType::Literal(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for ArgumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentType::Literal(value) => write!(f, "{value:?}"),
            ArgumentType::GraphInput(arg) => write!(f, "graph input '{}'", arg.input_name),
            ArgumentType::TaskOutput(arg) => {
                write!(f, "output '{}' of task '{}'", arg.output_name, arg.task_id)
            }
            ArgumentType::Secret(arg) => write!(f, "secret '{}'", arg.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_shape() {
        let arg = ArgumentType::task_output("train", "model");
        let json = serde_json::to_string(&arg).unwrap();
        assert_eq!(json, r#"{"taskOutput":{"taskId":"train","outputName":"model"}}"#);

        let lit: ArgumentType = serde_json::from_str(r#"{"literal":"42"}"#).unwrap();
        assert_eq!(lit.as_literal(), Some("42"));
    }

    #[test]
    fn accessors_are_exclusive() {
        let arg = ArgumentType::graph_input("x");
        assert!(arg.as_graph_input().is_some());
        assert!(arg.as_task_output().is_none());
        assert!(arg.as_literal().is_none());
    }
}
