//! Validation engine for pipeline component specs.
//!
//! Validation is a pure function over a spec value: a pipeline of
//! independent checks that accumulates every problem it finds into a
//! [`ValidationOutcome`] instead of stopping at the first. Only the fatal
//! pre-checks (missing name, missing implementation) short-circuit.
//!
//! [`validate_recursive`] descends into every nested graph component that
//! can be resolved and tags each issue with the path of task ids leading to
//! it, guarding against shared or self-referencing components with a set of
//! visited spec identities.

pub mod cycle;
pub mod engine;
pub mod error;
pub mod options;
pub mod recursive;
mod references;
pub mod report;
mod structural;

pub use cycle::find_circular_tasks;
pub use engine::{validate, validate_recursive, Validator};
pub use error::{Severity, ValidationError};
pub use options::{UnresolvedPolicy, ValidationOptions};
pub use recursive::{ComponentValidationIssue, RecursiveReport};
pub use report::ValidationOutcome;
