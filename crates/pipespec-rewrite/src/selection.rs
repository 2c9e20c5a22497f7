//! The set of graph elements a pack operates on.

use std::collections::BTreeSet;

use pipespec_core::component::ComponentSpec;
use pipespec_core::graph::GraphSpec;

use crate::error::{ElementKind, RewriteError};

/// One element picked in the editor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SelectionItem {
    /// A task, by id.
    Task(String),
    /// A declared input node of the parent component, by name.
    Input(String),
    /// A declared output node of the parent component, by name.
    Output(String),
}

/// A selection partitioned by element kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub tasks: BTreeSet<String>,
    pub inputs: BTreeSet<String>,
    pub outputs: BTreeSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select every task of `graph`, and nothing else.
    pub fn all_tasks(graph: &GraphSpec) -> Self {
        Self {
            tasks: graph.tasks.keys().cloned().collect(),
            ..Self::default()
        }
    }

    pub fn with_task(mut self, id: impl Into<String>) -> Self {
        self.tasks.insert(id.into());
        self
    }

    pub fn with_input(mut self, name: impl Into<String>) -> Self {
        self.inputs.insert(name.into());
        self
    }

    pub fn with_output(mut self, name: impl Into<String>) -> Self {
        self.outputs.insert(name.into());
        self
    }

    pub fn insert(&mut self, item: SelectionItem) {
        match item {
            SelectionItem::Task(id) => self.tasks.insert(id),
            SelectionItem::Input(name) => self.inputs.insert(name),
            SelectionItem::Output(name) => self.outputs.insert(name),
        };
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty() && self.inputs.is_empty() && self.outputs.is_empty()
    }

    /// Fail on the first item that does not belong to `spec`'s graph `graph`.
    pub fn check(&self, spec: &ComponentSpec, graph: &GraphSpec) -> Result<(), RewriteError> {
        let unknown = |kind, name: &String| RewriteError::UnknownSelection {
            kind,
            name: name.clone(),
        };
        if let Some(id) = self.tasks.iter().find(|id| !graph.contains_task(id)) {
            return Err(unknown(ElementKind::Task, id));
        }
        if let Some(name) = self.inputs.iter().find(|n| !spec.has_input(n)) {
            return Err(unknown(ElementKind::Input, name));
        }
        if let Some(name) = self.outputs.iter().find(|n| !spec.has_output(n)) {
            return Err(unknown(ElementKind::Output, name));
        }
        Ok(())
    }
}

impl FromIterator<SelectionItem> for Selection {
    fn from_iter<I: IntoIterator<Item = SelectionItem>>(iter: I) -> Self {
        let mut selection = Selection::new();
        for item in iter {
            selection.insert(item);
        }
        selection
    }
}
