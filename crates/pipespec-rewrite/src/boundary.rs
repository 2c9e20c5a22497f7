//! Classification of references that cross the edge of a task set.
//!
//! Pack uses this to find what flows into and out of a selection; unpack
//! uses the same classification with the wrapper task as the set.

use std::collections::BTreeSet;

use pipespec_core::graph::argument::{ArgumentType, TaskOutputArgument};
use pipespec_core::graph::{ArgumentSite, GraphSpec};

/// Identity of a value source outside a task set.
///
/// Two arguments reading the same source share one key, which is what lets
/// pack synthesize a single boundary input for both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceKey {
    TaskOutput { task_id: String, output_name: String },
    GraphInput { input_name: String },
}

impl SourceKey {
    /// The argument that reads this source from the outside.
    pub fn argument(&self) -> ArgumentType {
        match self {
            SourceKey::TaskOutput {
                task_id,
                output_name,
            } => ArgumentType::task_output(task_id, output_name),
            SourceKey::GraphInput { input_name } => ArgumentType::graph_input(input_name),
        }
    }

    /// Preferred name for an input fed by this source.
    pub fn base_name(&self) -> &str {
        match self {
            SourceKey::TaskOutput { output_name, .. } => output_name,
            SourceKey::GraphInput { input_name } => input_name,
        }
    }
}

/// How one argument of a task inside a set relates to the set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentClass<'a> {
    /// Reads an output of a task inside the set.
    Internal,
    /// Reads a graph input that was selected along with the tasks.
    IncludedInput(&'a str),
    /// Reads a source outside the set.
    Boundary(SourceKey),
    /// Literal or secret; carries no connection.
    Terminal,
}

/// Classify `arg` against the tasks and graph inputs of a set.
pub fn classify_argument<'a>(
    arg: &'a ArgumentType,
    tasks: &BTreeSet<String>,
    inputs: &BTreeSet<String>,
) -> ArgumentClass<'a> {
    match arg {
        ArgumentType::TaskOutput(out) if tasks.contains(&out.task_id) => ArgumentClass::Internal,
        ArgumentType::TaskOutput(out) => ArgumentClass::Boundary(SourceKey::TaskOutput {
            task_id: out.task_id.clone(),
            output_name: out.output_name.clone(),
        }),
        ArgumentType::GraphInput(input) if inputs.contains(&input.input_name) => {
            ArgumentClass::IncludedInput(&input.input_name)
        }
        ArgumentType::GraphInput(input) => ArgumentClass::Boundary(SourceKey::GraphInput {
            input_name: input.input_name.clone(),
        }),
        ArgumentType::Literal(_) | ArgumentType::Secret(_) => ArgumentClass::Terminal,
    }
}

/// A site outside a task set reading an output of a task inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalConsumer {
    pub site: ArgumentSite,
    pub source: TaskOutputArgument,
}

/// Every site outside `inside` that reads an output of a task in `inside`.
///
/// Output bindings named in `excluded_outputs` are left out; pack handles
/// those separately as selected output nodes.
pub fn external_consumers(
    graph: &GraphSpec,
    inside: &BTreeSet<String>,
    excluded_outputs: &BTreeSet<String>,
) -> Vec<ExternalConsumer> {
    graph
        .task_output_references()
        .into_iter()
        .filter(|(_, source)| inside.contains(&source.task_id))
        .filter(|(site, _)| match site {
            ArgumentSite::TaskArgument { task_id, .. } => !inside.contains(task_id),
            ArgumentSite::OutputValue { output } => !excluded_outputs.contains(output),
        })
        .map(|(site, source)| ExternalConsumer {
            site,
            source: source.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipespec_core::builder::{ComponentBuilder, TaskBuilder};
    use pipespec_core::reference::ComponentReference;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn classification() {
        let tasks = set(&["a"]);
        let inputs = set(&["x"]);

        let internal = ArgumentType::task_output("a", "out");
        assert_eq!(classify_argument(&internal, &tasks, &inputs), ArgumentClass::Internal);

        let included = ArgumentType::graph_input("x");
        assert_eq!(
            classify_argument(&included, &tasks, &inputs),
            ArgumentClass::IncludedInput("x")
        );

        let outside = ArgumentType::task_output("b", "out");
        let ArgumentClass::Boundary(key) = classify_argument(&outside, &tasks, &inputs) else {
            panic!("expected boundary");
        };
        assert_eq!(key.argument(), outside);
        assert_eq!(key.base_name(), "out");

        let literal = ArgumentType::literal("1");
        assert_eq!(classify_argument(&literal, &tasks, &inputs), ArgumentClass::Terminal);
    }

    #[test]
    fn external_consumers_skip_inside_and_excluded() {
        let r = || ComponentReference::by_url("u");
        let spec = ComponentBuilder::new("p")
            .task("a", TaskBuilder::new(r()).build())
            .task("b", TaskBuilder::new(r()).from_task("in", "a", "out").build())
            .task("c", TaskBuilder::new(r()).from_task("in", "a", "out").build())
            .output_value("kept", "a", "out")
            .output_value("selected", "a", "out")
            .build();
        let graph = spec.graph().unwrap();

        let consumers = external_consumers(graph, &set(&["a", "b"]), &set(&["selected"]));
        let sites: Vec<_> = consumers.iter().map(|c| c.site.clone()).collect();
        assert_eq!(
            sites,
            vec![
                ArgumentSite::TaskArgument {
                    task_id: "c".into(),
                    argument: "in".into()
                },
                ArgumentSite::OutputValue {
                    output: "kept".into()
                },
            ]
        );
        assert!(consumers.iter().all(|c| c.source == TaskOutputArgument::new("a", "out")));
    }
}
