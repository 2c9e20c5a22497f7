//! Packing every task of a graph and unpacking the wrapper again restores
//! the original tasks and wiring.

use std::collections::BTreeSet;

use pipespec_core::builder::{ComponentBuilder, TaskBuilder};
use pipespec_core::component::{ComponentSpec, InputSpec};
use pipespec_core::graph::argument::ArgumentType;
use pipespec_core::Position;
use pipespec_rewrite::{apply_pack, pack, unpack, PackOptions, RewriteEnv, Selection};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Wire {
    Literal(u8),
    Seed,
    Upstream(usize),
}

fn wire() -> impl Strategy<Value = Wire> {
    prop_oneof![
        any::<u8>().prop_map(Wire::Literal),
        Just(Wire::Seed),
        (0..8usize).prop_map(Wire::Upstream),
    ]
}

fn op() -> ComponentSpec {
    ComponentBuilder::new("op")
        .output_named("out")
        .container("alpine")
        .build()
}

/// Task `t{i}` gets one argument per wire; `Upstream(j)` reads `t{j % n}`.
fn build(wiring: &[Vec<Wire>], bind_result: bool) -> ComponentSpec {
    let n = wiring.len();
    let mut builder = ComponentBuilder::new("pipeline")
        .input(InputSpec::new("seed").with_value("s"))
        .output_named("result");
    for (i, wires) in wiring.iter().enumerate() {
        let mut task = TaskBuilder::inline(op()).at(i as f64 * 200.0, (i % 3) as f64 * 120.0);
        for (k, wire) in wires.iter().enumerate() {
            let name = format!("arg{k}");
            task = match wire {
                Wire::Literal(v) => task.literal(&name, &v.to_string()),
                Wire::Seed => task.from_input(&name, "seed"),
                Wire::Upstream(j) => task.from_task(&name, &format!("t{}", j % n), "out"),
            };
        }
        builder = builder.task(format!("t{i}"), task.build());
    }
    if bind_result {
        builder = builder.output_value("result", &format!("t{}", n - 1), "out");
    }
    builder.build()
}

/// Every (consumer, argument, value) triple plus the output bindings.
fn topology(spec: &ComponentSpec) -> BTreeSet<String> {
    let graph = spec.graph().unwrap();
    let mut edges = BTreeSet::new();
    for (id, task) in &graph.tasks {
        for (name, arg) in &task.arguments {
            edges.insert(format!("{id}.{name} <- {arg}"));
        }
    }
    for (output, binding) in &graph.output_values {
        edges.insert(format!("output {output} <- {}.{}", binding.task_id, binding.output_name));
    }
    edges
}

fn round_trip(parent: &ComponentSpec) -> ComponentSpec {
    let env = RewriteEnv::default();
    let selection = Selection::all_tasks(parent.graph().unwrap());
    let outcome = pack(&selection, parent, &PackOptions::default(), &env).unwrap();
    let packed = apply_pack(parent, &selection, &outcome).unwrap();
    assert_eq!(packed.graph().unwrap().task_count(), 1);
    unpack(&outcome.wrapper_id, &packed, &env).unwrap()
}

proptest! {
    #[test]
    fn pack_then_unpack_restores_topology(
        wiring in prop::collection::vec(prop::collection::vec(wire(), 0..3), 1..8),
        bind_result in any::<bool>(),
    ) {
        let parent = build(&wiring, bind_result);
        let restored = round_trip(&parent);

        let before: Vec<_> = parent.graph().unwrap().tasks.keys().cloned().collect();
        let after: Vec<_> = restored.graph().unwrap().tasks.keys().cloned().collect();
        prop_assert_eq!(before, after);
        prop_assert_eq!(topology(&parent), topology(&restored));
        prop_assert_eq!(&parent.inputs, &restored.inputs);
        prop_assert_eq!(&parent.outputs, &restored.outputs);
    }
}

#[test]
fn positions_survive_round_trip() {
    let parent = build(&[vec![Wire::Seed], vec![Wire::Upstream(0)]], true);
    let restored = round_trip(&parent);
    let graph = restored.graph().unwrap();
    assert_eq!(graph.tasks["t0"].position(), Some(Position::new(0.0, 0.0)));
    assert_eq!(graph.tasks["t1"].position(), Some(Position::new(200.0, 120.0)));
    assert_eq!(
        graph.tasks["t1"].arguments["arg0"],
        ArgumentType::task_output("t0", "out")
    );
}
