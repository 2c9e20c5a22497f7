//! Canonical serialization for pipeline component specs.
//!
//! Provides the default implementations of the collaborator seams declared
//! in `pipespec-core`:
//!
//! - [`JsonCodec`]: deterministic JSON text, the input to content digests
//! - [`hydrate_reference`]: fill in the name, digest, spec, and text of a
//!   component reference from whatever part of it is already known
//! - [`ComponentCatalog`]: an in-memory resolver keyed by digest and URL

mod catalog;
mod hydrate;
mod json;

pub use catalog::ComponentCatalog;
pub use hydrate::{hydrate_reference, reference_for, HydrationError};
pub use json::JsonCodec;
