//! Issues reported by the validation engine.

use std::fmt;

use thiserror::Error;

/// Severity of a reported issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARN"),
        }
    }
}

/// One structural or referential problem in a spec.
///
/// These are collected, never returned as `Err`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("component name is missing or empty")]
    MissingName,

    #[error("component has no implementation")]
    MissingImplementation,

    #[error("input #{index} has an empty name")]
    EmptyInputName { index: usize },

    #[error("duplicate input name '{0}'")]
    DuplicateInput(String),

    #[error("output #{index} has an empty name")]
    EmptyOutputName { index: usize },

    #[error("duplicate output name '{0}'")]
    DuplicateOutput(String),

    #[error("required input '{0}' has no value or default")]
    MissingInputValue(String),

    #[error("graph implementation has no tasks")]
    NoTasks,

    #[error("task '{0}' has no component reference")]
    MissingComponentRef(String),

    #[error("task '{task}' argument '{argument}' references non-existent graph input '{input}'")]
    UnknownGraphInput {
        task: String,
        argument: String,
        input: String,
    },

    #[error("task '{task}' argument '{argument}' references non-existent task '{target}'")]
    UnknownTask {
        task: String,
        argument: String,
        target: String,
    },

    #[error(
        "task '{task}' argument '{argument}' references non-existent output '{output}' of task '{target}'"
    )]
    UnknownTaskOutput {
        task: String,
        argument: String,
        target: String,
        output: String,
    },

    #[error("{referrer} reads from task '{target}' whose component is not resolved")]
    UnresolvedComponent { referrer: String, target: String },

    #[error("task '{task}' is missing required argument '{input}'")]
    MissingRequiredArgument { task: String, input: String },

    #[error("output value '{output}' is not defined in component outputs")]
    UndeclaredOutputValue { output: String },

    #[error("output value '{output}' is bound to missing task '{task}'")]
    OutputValueUnknownTask { output: String, task: String },

    #[error("output value '{output}' references non-existent output '{task_output}' of task '{task}'")]
    OutputValueUnknownOutput {
        output: String,
        task: String,
        task_output: String,
    },

    #[error("input '{0}' is not connected to any task")]
    UnconnectedInput(String),

    #[error("output '{0}' is not connected to any task")]
    UnconnectedOutput(String),

    #[error("circular dependency detected at task '{0}'")]
    CircularDependency(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let err = ValidationError::UnknownTask {
            task: "b".into(),
            argument: "in".into(),
            target: "ghost".into(),
        };
        assert!(err.to_string().contains("non-existent task 'ghost'"));

        let err = ValidationError::CircularDependency("loop".into());
        assert!(err.to_string().contains("circular dependency"));
    }

    #[test]
    fn severity_display() {
        assert_eq!(Severity::Error.to_string(), "ERROR");
        assert_eq!(Severity::Warning.to_string(), "WARN");
    }
}
