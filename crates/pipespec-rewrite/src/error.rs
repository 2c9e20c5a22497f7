//! Rewrite errors. All of them are precondition failures: caller bugs that
//! are reported before any work is done and are never worth retrying.

use pipespec_core::codec::CodecError;
use thiserror::Error;

/// Kind of element named in a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Task,
    Input,
    Output,
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementKind::Task => write!(f, "task"),
            ElementKind::Input => write!(f, "input"),
            ElementKind::Output => write!(f, "output"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("component '{0}' is not implemented as a graph")]
    NotAGraph(String),

    #[error("task '{0}' not found in graph")]
    TaskNotFound(String),

    #[error("selected {kind} '{name}' does not belong to the graph")]
    UnknownSelection { kind: ElementKind, name: String },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("layout config parse error: {0}")]
    Layout(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RewriteError {
    pub(crate) fn not_a_graph(name: Option<&str>) -> Self {
        RewriteError::NotAGraph(name.unwrap_or("<unnamed>").to_string())
    }
}
