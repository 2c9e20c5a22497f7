//! Core data model for pipeline component specifications.
//!
//! A pipeline is described by a [`ComponentSpec`]: a reusable unit with typed
//! inputs and outputs whose implementation is either an opaque container or
//! a nested [`GraphSpec`] of tasks wired together through arguments. Graph
//! implementations may nest arbitrarily deep, since every [`TaskSpec`] refers
//! to another component through a [`ComponentReference`].
//!
//! All values here are immutable in spirit: the rewriting and validation
//! engines built on top of this crate take specs by reference and return new
//! values, sharing unchanged nested components through [`std::sync::Arc`].

pub mod annotations;
pub mod author;
pub mod builder;
pub mod codec;
pub mod component;
pub mod graph;
pub mod hash;
pub mod naming;
pub mod reference;
pub mod types;

pub use annotations::{centroid, Annotations, Position, AUTHOR_ANNOTATION, POSITION_ANNOTATION};
pub use author::{resolve_author, AuthorError, AuthorSource, FixedAuthor, UnknownAuthor, UNKNOWN_AUTHOR};
pub use builder::{ComponentBuilder, TaskBuilder};
pub use codec::{CodecError, ComponentCodec};
pub use component::{
    ComponentSpec, ContainerSpec, Implementation, InputSpec, MetadataSpec, OutputSpec,
};
pub use graph::argument::{ArgumentType, GraphInputArgument, SecretArgument, TaskOutputArgument};
pub use graph::task::{CachingStrategy, ExecutionOptions, RetryStrategy, TaskSpec};
pub use graph::{ArgumentSite, GraphSpec, TaskId};
pub use hash::digest_text;
pub use naming::unique_name;
pub use reference::{ComponentReference, ComponentResolver, InlineResolver};
pub use types::TypeSpec;
