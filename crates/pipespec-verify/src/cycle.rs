//! Cycle detection over the task-output dependency graph of one level.

use std::collections::HashSet;

use pipespec_core::graph::GraphSpec;

/// Tasks found on a dependency cycle, in discovery order.
///
/// Iterative depth-first search over an explicit frame stack of
/// `(task, next dependency index)`. A task is flagged the moment it is
/// reached while already on the active path. References to tasks that do
/// not exist are ignored here; they are reported elsewhere.
pub fn find_circular_tasks(graph: &GraphSpec) -> Vec<String> {
    let deps = graph.dependency_map();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut on_stack: HashSet<&str> = HashSet::new();
    let mut flagged: Vec<String> = Vec::new();
    let mut frames: Vec<(&str, usize)> = Vec::new();

    for root in deps.keys() {
        enter(*root, &mut visited, &mut on_stack, &mut flagged, &mut frames);

        while let Some(&(task, next)) = frames.last() {
            match deps.get(task).and_then(|upstream| upstream.get(next)) {
                Some(&dep) => {
                    if let Some(frame) = frames.last_mut() {
                        frame.1 += 1;
                    }
                    enter(dep, &mut visited, &mut on_stack, &mut flagged, &mut frames);
                }
                None => {
                    on_stack.remove(task);
                    frames.pop();
                }
            }
        }
    }

    flagged
}

fn enter<'a>(
    task: &'a str,
    visited: &mut HashSet<&'a str>,
    on_stack: &mut HashSet<&'a str>,
    flagged: &mut Vec<String>,
    frames: &mut Vec<(&'a str, usize)>,
) {
    if on_stack.contains(task) {
        if !flagged.iter().any(|f| f == task) {
            flagged.push(task.to_string());
        }
        return;
    }
    if visited.insert(task) {
        on_stack.insert(task);
        frames.push((task, 0));
    }
}
