//! Collaborators a rewrite needs from its host.

use std::fmt;

use pipespec_codec::JsonCodec;
use pipespec_core::author::{AuthorSource, UnknownAuthor};
use pipespec_core::codec::ComponentCodec;
use pipespec_core::reference::{ComponentResolver, InlineResolver};

static JSON: JsonCodec = JsonCodec::new();

/// Codec, resolver, and author lookup used by pack and unpack.
#[derive(Clone, Copy)]
pub struct RewriteEnv<'a> {
    /// Serializes the extracted component for its digest and text.
    pub codec: &'a dyn ComponentCodec,
    /// Resolves task components, for type inference and unpacking.
    pub resolver: &'a dyn ComponentResolver,
    /// Author recorded on extracted components.
    pub author: &'a dyn AuthorSource,
}

impl Default for RewriteEnv<'static> {
    /// Canonical JSON, inline-only resolution, unknown author.
    fn default() -> Self {
        Self {
            codec: &JSON,
            resolver: &InlineResolver,
            author: &UnknownAuthor,
        }
    }
}

impl<'a> RewriteEnv<'a> {
    pub fn with_resolver(self, resolver: &'a dyn ComponentResolver) -> Self {
        Self { resolver, ..self }
    }

    pub fn with_author(self, author: &'a dyn AuthorSource) -> Self {
        Self { author, ..self }
    }

    pub fn with_codec(self, codec: &'a dyn ComponentCodec) -> Self {
        Self { codec, ..self }
    }
}

impl fmt::Debug for RewriteEnv<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RewriteEnv").finish_non_exhaustive()
    }
}
