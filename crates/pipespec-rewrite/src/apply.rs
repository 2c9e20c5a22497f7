//! Applying a pack result to the parent graph.

use std::collections::{BTreeMap, BTreeSet};

use pipespec_core::component::{ComponentSpec, InputSpec};
use pipespec_core::graph::argument::{ArgumentType, TaskOutputArgument};
use pipespec_core::graph::task::TaskSpec;
use pipespec_core::graph::{GraphSpec, TaskId};
use pipespec_core::naming::unique_name;
use tracing::{debug, warn};

use crate::error::RewriteError;
use crate::pack::{ConnectionTarget, PackOutcome};
use crate::selection::Selection;

/// Replace the packed selection in `parent` with the wrapper task.
///
/// Removes the selected tasks, inserts the wrapper, rewires every external
/// consumer listed in `outcome`, and drops selected inputs whose value was
/// lifted into the wrapper and that nothing else reads anymore.
pub fn apply_pack(
    parent: &ComponentSpec,
    selection: &Selection,
    outcome: &PackOutcome,
) -> Result<ComponentSpec, RewriteError> {
    let graph = parent
        .graph()
        .ok_or_else(|| RewriteError::not_a_graph(parent.name.as_deref()))?;

    let mut tasks: BTreeMap<TaskId, TaskSpec> = graph
        .tasks
        .iter()
        .filter(|(id, _)| !selection.tasks.contains(*id))
        .map(|(id, task)| (id.clone(), task.clone()))
        .collect();
    let mut output_values = graph.output_values.clone();

    let wrapper_id = unique_name(&outcome.wrapper_id, |id| tasks.contains_key(id));
    for mapping in &outcome.connection_mappings {
        let rewired = TaskOutputArgument::new(&wrapper_id, &mapping.nested_output);
        match &mapping.target {
            ConnectionTarget::TaskArgument { task_id, argument } => match tasks.get_mut(task_id) {
                Some(task) => {
                    task.arguments
                        .insert(argument.clone(), ArgumentType::TaskOutput(rewired));
                }
                None => warn!(task = %task_id, "mapped consumer is no longer in the graph"),
            },
            ConnectionTarget::GraphOutput { output } => {
                output_values.insert(output.clone(), rewired);
            }
        }
    }
    for task in reentrant_consumers(outcome) {
        warn!(
            task,
            wrapper = %wrapper_id,
            "task both feeds and consumes the packed subgraph; the parent now has a cycle"
        );
    }
    tasks.insert(wrapper_id.clone(), outcome.wrapper_task.clone());

    let graph = GraphSpec {
        tasks,
        output_values,
    };
    let consumed = graph.referenced_inputs();
    let inputs: Vec<InputSpec> = parent
        .inputs
        .iter()
        .filter(|input| {
            !outcome.lifted_inputs.contains(&input.name) || consumed.contains(input.name.as_str())
        })
        .cloned()
        .collect();

    debug!(
        wrapper = %wrapper_id,
        removed = selection.tasks.len(),
        rewired = outcome.connection_mappings.len(),
        "applied pack to parent"
    );

    Ok(ComponentSpec {
        inputs,
        ..parent.with_graph(graph)
    })
}

/// Outside tasks that read from the packed selection while also feeding it.
///
/// Non-empty only for a selection that is not convex, such as `{a, c}` in
/// `a -> b -> c`.
pub(crate) fn reentrant_consumers(outcome: &PackOutcome) -> BTreeSet<&str> {
    let feeding: BTreeSet<&str> = outcome.wrapper_task.upstream_task_ids().collect();
    outcome
        .connection_mappings
        .iter()
        .filter_map(|mapping| match &mapping.target {
            ConnectionTarget::TaskArgument { task_id, .. } => Some(task_id.as_str()),
            ConnectionTarget::GraphOutput { .. } => None,
        })
        .filter(|task_id| feeding.contains(task_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipespec_core::builder::{ComponentBuilder, TaskBuilder};

    use crate::env::RewriteEnv;
    use crate::pack::{pack, PackOptions};

    fn op(name: &str) -> ComponentSpec {
        ComponentBuilder::new(name)
            .input_named("in")
            .output_named("out")
            .container("alpine")
            .build()
    }

    #[test]
    fn consumers_read_from_wrapper() {
        let parent = ComponentBuilder::new("p")
            .input(InputSpec::new("seed").with_value("1"))
            .output_named("final")
            .task("a", TaskBuilder::inline(op("a")).from_input("in", "seed").build())
            .task("b", TaskBuilder::inline(op("b")).from_task("in", "a", "out").build())
            .task("c", TaskBuilder::inline(op("c")).from_task("in", "b", "out").build())
            .output_value("final", "b", "out")
            .build();
        let selection = Selection::new().with_task("a").with_task("b").with_input("seed");
        let outcome = pack(&selection, &parent, &PackOptions::default(), &RewriteEnv::default())
            .unwrap();
        let packed = apply_pack(&parent, &selection, &outcome).unwrap();

        let graph = packed.graph().unwrap();
        let ids: Vec<_> = graph.tasks.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["Subgraph", "c"]);
        assert_eq!(
            graph.tasks["c"].arguments["in"],
            ArgumentType::task_output("Subgraph", "out")
        );
        assert_eq!(
            graph.output_values["final"],
            TaskOutputArgument::new("Subgraph", "out")
        );
        // The literal now lives on the wrapper, so the parent input is gone.
        assert!(packed.inputs.is_empty());
        assert_eq!(graph.tasks["Subgraph"].arguments["seed"], ArgumentType::literal("1"));
    }

    #[test]
    fn lifted_input_kept_while_still_read() {
        let parent = ComponentBuilder::new("p")
            .input(InputSpec::new("seed").with_value("1"))
            .task("a", TaskBuilder::inline(op("a")).from_input("in", "seed").build())
            .task("b", TaskBuilder::inline(op("b")).from_input("in", "seed").build())
            .build();
        let selection = Selection::new().with_task("a").with_input("seed");
        let outcome = pack(&selection, &parent, &PackOptions::default(), &RewriteEnv::default())
            .unwrap();
        let packed = apply_pack(&parent, &selection, &outcome).unwrap();
        assert!(packed.has_input("seed"));
    }

    #[test]
    fn non_convex_selection_is_reported() {
        let parent = ComponentBuilder::new("p")
            .task("a", TaskBuilder::inline(op("a")).build())
            .task("x", TaskBuilder::inline(op("x")).from_task("in", "a", "out").build())
            .task("b", TaskBuilder::inline(op("b")).from_task("in", "x", "out").build())
            .build();
        let selection = Selection::new().with_task("a").with_task("b");
        let outcome = pack(&selection, &parent, &PackOptions::default(), &RewriteEnv::default())
            .unwrap();
        assert_eq!(reentrant_consumers(&outcome).into_iter().collect::<Vec<_>>(), vec!["x"]);

        // The pack still applies; the cycle is left for validation to report.
        let packed = apply_pack(&parent, &selection, &outcome).unwrap();
        let graph = packed.graph().unwrap();
        assert_eq!(
            graph.tasks["x"].arguments["in"],
            ArgumentType::task_output("Subgraph", "out")
        );
        assert!(graph.tasks["Subgraph"].upstream_task_ids().any(|id| id == "x"));
    }

    #[test]
    fn convex_selection_has_no_reentrant_consumers() {
        let parent = ComponentBuilder::new("p")
            .task("a", TaskBuilder::inline(op("a")).build())
            .task("b", TaskBuilder::inline(op("b")).from_task("in", "a", "out").build())
            .task("c", TaskBuilder::inline(op("c")).from_task("in", "b", "out").build())
            .build();
        let selection = Selection::new().with_task("a").with_task("b");
        let outcome = pack(&selection, &parent, &PackOptions::default(), &RewriteEnv::default())
            .unwrap();
        assert!(reentrant_consumers(&outcome).is_empty());
    }
}
