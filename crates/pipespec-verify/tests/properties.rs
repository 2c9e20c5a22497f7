use pipespec_codec::ComponentCatalog;
use pipespec_core::builder::{ComponentBuilder, TaskBuilder};
use pipespec_core::component::{ComponentSpec, InputSpec, OutputSpec};
use pipespec_core::reference::ComponentReference;
use pipespec_verify::{
    validate, validate_recursive, ValidationError, ValidationOptions, Validator,
};
use proptest::prelude::*;

fn op(name: &str) -> ComponentSpec {
    ComponentBuilder::new(name)
        .input(InputSpec::new("in").optional())
        .output_named("out")
        .container("alpine")
        .build()
}

#[test]
fn invalid_output_binding_reports_two_errors() {
    let spec = ComponentBuilder::new("pipeline")
        .task("task1", TaskBuilder::inline(op("t")).build())
        .output_value("invalidOutput", "task1", "output1")
        .build();

    let outcome = validate(&spec, &ValidationOptions::default());
    assert!(!outcome.is_valid);
    assert_eq!(outcome.errors.len(), 2, "{outcome}");
    let messages: Vec<String> = outcome.errors.iter().map(ToString::to_string).collect();
    assert!(messages.iter().any(|m| m.contains("references non-existent output")));
    assert!(messages.iter().any(|m| m.contains("not defined in component outputs")));
}

#[test]
fn two_task_cycle_is_detected() {
    let spec = ComponentBuilder::new("pipeline")
        .task("task1", TaskBuilder::inline(op("a")).from_task("in", "task2", "out").build())
        .task("task2", TaskBuilder::inline(op("b")).from_task("in", "task1", "out").build())
        .build();

    let outcome = validate(&spec, &ValidationOptions::default());
    assert!(!outcome.is_valid);
    assert!(outcome.has_error(|e| matches!(
        e,
        ValidationError::CircularDependency(task) if task == "task1" || task == "task2"
    )));
}

#[test]
fn catalog_resolution_enables_output_checks() {
    let mut catalog = ComponentCatalog::new();
    let digest = catalog.register(op("remote")).unwrap();
    let spec = ComponentBuilder::new("pipeline")
        .task("a", TaskBuilder::new(ComponentReference::by_digest(digest)).build())
        .task("b", TaskBuilder::inline(op("b")).from_task("in", "a", "missing").build())
        .build();

    // Inline-only resolution cannot see the component and only warns.
    let lenient = validate(&spec, &ValidationOptions::default());
    assert!(lenient.is_valid);
    assert_eq!(lenient.warnings.len(), 1);

    let outcome = Validator::new(&catalog).validate(&spec);
    assert!(!outcome.is_valid);
    assert!(outcome.has_error(|e| matches!(
        e,
        ValidationError::UnknownTaskOutput { output, .. } if output == "missing"
    )));
}

#[test]
fn recursive_report_renders_paths() {
    let inner = ComponentBuilder::new("inner")
        .task("broken", TaskBuilder::inline(op("x")).from_task("in", "nowhere", "out").build())
        .build();
    let root = ComponentBuilder::new("root")
        .task("stage", TaskBuilder::inline(inner).build())
        .build();

    let report = validate_recursive(&root);
    assert!(!report.is_valid());
    let rendered = report.to_string();
    assert!(rendered.contains("[ERROR] stage: "), "{rendered}");
    assert!(rendered.contains("non-existent task 'nowhere'"));
}

#[test]
fn deep_reverse_ordered_chain_validates() {
    let depth = 20_000;
    let mut builder = ComponentBuilder::new("pipeline");
    for i in 0..depth {
        let mut task = TaskBuilder::inline(op("op"));
        if i + 1 < depth {
            task = task.from_task("in", &format!("t{}", i + 1), "out");
        }
        builder = builder.task(format!("t{i}"), task.build());
    }

    let outcome = validate(&builder.build(), &ValidationOptions::default());
    assert!(outcome.is_valid, "{outcome}");
    assert!(outcome.errors.is_empty());
}

#[test]
fn self_referencing_component_terminates() {
    let url = "https://components.example/loop.json";
    let looping = ComponentBuilder::new("loop")
        .task("again", TaskBuilder::new(ComponentReference::by_url(url)).build())
        .build();
    let mut catalog = ComponentCatalog::new();
    catalog.register_url(url, looping.clone()).unwrap();

    let report = Validator::new(&catalog).validate_recursive(&looping);
    assert!(report.is_valid(), "{report}");
    assert_eq!(report.errors().count(), 0);
}

#[test]
fn dangling_output_binding_is_not_a_task_reference_error() {
    let spec = ComponentBuilder::new("pipeline")
        .output(OutputSpec::new("result"))
        .task("t0", TaskBuilder::inline(op("op")).build())
        .output_value("result", "gone", "out")
        .build();

    let outcome = validate(&spec, &ValidationOptions::default());
    assert!(outcome.has_error(|e| matches!(
        e,
        ValidationError::OutputValueUnknownTask { task, .. } if task == "gone"
    )));
    assert!(!outcome.has_error(|e| matches!(e, ValidationError::UnknownTask { .. })));
    assert!(!outcome.errors.iter().any(|e| e.to_string().contains("non-existent task")));
}

/// Task `t{i}` reads `t{target}`; targets past the end name missing tasks.
/// The `result` output is optionally bound to `t{bound}`.
fn build(targets: &[Option<usize>], task_count: usize, bound: Option<usize>) -> ComponentSpec {
    let mut builder = ComponentBuilder::new("pipeline");
    if let Some(bound) = bound {
        builder = builder
            .output(OutputSpec::new("result"))
            .output_value("result", &format!("t{bound}"), "out");
    }
    for i in 0..task_count {
        let mut task = TaskBuilder::inline(op("op"));
        if let Some(target) = targets.get(i).copied().flatten() {
            task = task.from_task("in", &format!("t{target}"), "out");
        }
        builder = builder.task(format!("t{i}"), task.build());
    }
    builder.build()
}

proptest! {
    #[test]
    fn non_existent_task_reported_iff_dangling(
        task_count in 1..6usize,
        targets in prop::collection::vec(prop::option::of(0..8usize), 0..6),
        bound in prop::option::of(0..8usize),
    ) {
        let spec = build(&targets, task_count, bound);
        let dangling = targets
            .iter()
            .take(task_count)
            .flatten()
            .any(|target| *target >= task_count);

        let outcome = validate(&spec, &ValidationOptions::default());
        let reported = outcome.has_error(|e| matches!(e, ValidationError::UnknownTask { .. }));
        prop_assert_eq!(reported, dangling);
    }
}
