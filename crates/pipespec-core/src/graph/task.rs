//! Task specifications: instantiations of a component inside a graph.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::annotations::{Annotations, Position};
use crate::graph::argument::ArgumentType;
use crate::reference::ComponentReference;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryStrategy {
    pub max_retries: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachingStrategy {
    /// ISO-8601 duration, e.g. `P30D`.
    pub max_cache_staleness: String,
}

/// Runtime hints. Carried through every rewrite untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_strategy: Option<RetryStrategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caching_strategy: Option<CachingStrategy>,
}

/// One task in a graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSpec {
    pub component_ref: ComponentReference,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub arguments: BTreeMap<String, ArgumentType>,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_options: Option<ExecutionOptions>,
}

impl TaskSpec {
    pub fn new(component_ref: ComponentReference) -> Self {
        Self {
            component_ref,
            ..Self::default()
        }
    }

    pub fn with_argument(mut self, name: impl Into<String>, argument: ArgumentType) -> Self {
        self.arguments.insert(name.into(), argument);
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        position.write(&mut self.annotations);
        self
    }

    pub fn position(&self) -> Option<Position> {
        Position::read(&self.annotations)
    }

    /// Copy of this task placed at `position`.
    pub fn moved_to(&self, position: Position) -> TaskSpec {
        TaskSpec {
            annotations: position.applied_to(&self.annotations),
            ..self.clone()
        }
    }

    /// Ids of the sibling tasks this task reads outputs from, in argument order.
    pub fn upstream_task_ids(&self) -> impl Iterator<Item = &str> {
        self.arguments
            .values()
            .filter_map(|arg| arg.as_task_output())
            .map(|arg| arg.task_id.as_str())
    }

    /// Human-readable label: the component name when known.
    pub fn display_name(&self) -> Option<&str> {
        self.component_ref.display_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_ids_follow_task_outputs_only() {
        let task = TaskSpec::default()
            .with_argument("a", ArgumentType::task_output("t1", "out"))
            .with_argument("b", ArgumentType::graph_input("x"))
            .with_argument("c", ArgumentType::literal("3"))
            .with_argument("d", ArgumentType::task_output("t2", "out"));
        let ids: Vec<&str> = task.upstream_task_ids().collect();
        assert_eq!(ids, vec!["t1", "t2"]);
    }

    #[test]
    fn moved_to_keeps_other_annotations() {
        let mut task = TaskSpec::default();
        task.annotations.insert("note".into(), "keep".into());
        let moved = task.moved_to(Position::new(1.0, 2.0));
        assert_eq!(moved.position(), Some(Position::new(1.0, 2.0)));
        assert_eq!(moved.annotations.get("note").map(String::as_str), Some("keep"));
        assert_eq!(task.position(), None);
    }
}
