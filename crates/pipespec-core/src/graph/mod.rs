//! Graph implementations: the tasks of one nesting level and their output bindings.
//!
//! A graph is a DAG whose edges are implied by [`ArgumentType::TaskOutput`]
//! arguments: a task that reads `(t, out)` depends on task `t`. The graph's
//! `output_values` bind each declared output of the enclosing component to
//! one task output.

pub mod argument;
pub mod task;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use self::argument::{ArgumentType, TaskOutputArgument};
use self::task::TaskSpec;

/// Identifier of a task, unique within one graph.
pub type TaskId = String;

/// Where a reference lives inside a graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArgumentSite {
    /// Argument `argument` of task `task_id`.
    TaskArgument { task_id: TaskId, argument: String },
    /// The graph-level binding of output `output`.
    OutputValue { output: String },
}

/// The task set and output bindings of one graph level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSpec {
    #[serde(default)]
    pub tasks: BTreeMap<TaskId, TaskSpec>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub output_values: BTreeMap<String, TaskOutputArgument>,
}

impl GraphSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn task(&self, id: &str) -> Option<&TaskSpec> {
        self.tasks.get(id)
    }

    pub fn contains_task(&self, id: &str) -> bool {
        self.tasks.contains_key(id)
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// All task-output references in this graph, from task arguments and
    /// output bindings alike, in deterministic order.
    pub fn task_output_references(&self) -> Vec<(ArgumentSite, &TaskOutputArgument)> {
        let mut refs = Vec::new();
        for (task_id, task) in &self.tasks {
            for (arg_name, arg) in &task.arguments {
                if let ArgumentType::TaskOutput(out) = arg {
                    refs.push((
                        ArgumentSite::TaskArgument {
                            task_id: task_id.clone(),
                            argument: arg_name.clone(),
                        },
                        out,
                    ));
                }
            }
        }
        for (output, out) in &self.output_values {
            refs.push((
                ArgumentSite::OutputValue {
                    output: output.clone(),
                },
                out,
            ));
        }
        refs
    }

    /// Every site reading an output of task `task_id`.
    pub fn consumers_of(&self, task_id: &str) -> Vec<(ArgumentSite, &TaskOutputArgument)> {
        self.task_output_references()
            .into_iter()
            .filter(|(_, out)| out.task_id == task_id)
            .collect()
    }

    /// Names of graph inputs referenced by any task argument.
    pub fn referenced_inputs(&self) -> BTreeSet<&str> {
        self.tasks
            .values()
            .flat_map(|t| t.arguments.values())
            .filter_map(|arg| arg.as_graph_input())
            .map(|arg| arg.input_name.as_str())
            .collect()
    }

    /// Upstream dependencies of each task, restricted to tasks that exist.
    pub fn dependency_map(&self) -> BTreeMap<&str, Vec<&str>> {
        self.tasks
            .iter()
            .map(|(id, task)| {
                let deps = task
                    .upstream_task_ids()
                    .filter(|dep| self.tasks.contains_key(*dep))
                    .collect();
                (id.as_str(), deps)
            })
            .collect()
    }
}
