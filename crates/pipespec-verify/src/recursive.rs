//! Recursive validation of nested graph components.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use pipespec_core::component::ComponentSpec;
use tracing::debug;

use crate::engine::Validator;
use crate::error::{Severity, ValidationError};
use crate::options::ValidationOptions;

/// An issue found somewhere in a nested component tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentValidationIssue {
    /// Task ids from the root down to the subgraph task that owns the issue.
    /// Empty for issues in the root component itself.
    pub path: Vec<String>,
    /// Name of the component in which the issue was found.
    pub component: Option<String>,
    pub severity: Severity,
    pub error: ValidationError,
}

impl ComponentValidationIssue {
    /// The path joined for display, `"<root>"` at the top level.
    pub fn location(&self) -> String {
        if self.path.is_empty() {
            "<root>".to_string()
        } else {
            self.path.join(" > ")
        }
    }
}

impl fmt::Display for ComponentValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.location(), self.error)
    }
}

/// All issues found by a recursive validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecursiveReport {
    pub issues: Vec<ComponentValidationIssue>,
}

impl RecursiveReport {
    pub fn is_valid(&self) -> bool {
        !self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ComponentValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    /// Errors owned by the component at exactly `path`.
    pub fn errors_at<'a>(
        &'a self,
        path: &'a [&str],
    ) -> impl Iterator<Item = &'a ComponentValidationIssue> + 'a {
        self.errors()
            .filter(move |i| i.path.iter().map(String::as_str).eq(path.iter().copied()))
    }
}

impl fmt::Display for RecursiveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for issue in &self.issues {
            writeln!(f, "{issue}")?;
        }
        Ok(())
    }
}

/// Traversal state of one recursive run.
#[derive(Default)]
struct Walk {
    visited: HashSet<*const ComponentSpec>,
    /// Keeps resolved specs alive so their addresses stay unique for the run.
    retained: Vec<Arc<ComponentSpec>>,
    path: Vec<String>,
    report: RecursiveReport,
}

impl Validator<'_> {
    /// Validate `spec` with full input-value checking, then every reachable
    /// nested graph component with input-value checking relaxed.
    ///
    /// Each distinct component allocation is validated once, so components
    /// shared between several tasks (or referencing themselves) terminate.
    pub fn validate_recursive(&self, spec: &ComponentSpec) -> RecursiveReport {
        let root_options = ValidationOptions {
            skip_input_value_validation: false,
            ..*self.options()
        };
        let mut walk = Walk::default();
        self.visit(spec, &root_options, &mut walk);
        walk.report
    }

    fn visit(&self, spec: &ComponentSpec, options: &ValidationOptions, walk: &mut Walk) {
        if !walk.visited.insert(spec as *const ComponentSpec) {
            debug!(path = %walk.path.join(" > "), "component already validated");
            return;
        }

        let outcome = self.validate_with(spec, options);
        for (severity, error) in outcome.issues() {
            walk.report.issues.push(ComponentValidationIssue {
                path: walk.path.clone(),
                component: spec.name.clone(),
                severity,
                error: error.clone(),
            });
        }

        let Some(graph) = spec.graph() else {
            return;
        };
        let nested_options = options.nested();
        for (task_id, task) in &graph.tasks {
            let Some(child) = self.resolver().resolve(&task.component_ref) else {
                continue;
            };
            if !child.is_graph() {
                continue;
            }
            walk.path.push(task_id.clone());
            self.visit(&child, &nested_options, walk);
            walk.path.pop();
            walk.retained.push(child);
        }
    }
}
