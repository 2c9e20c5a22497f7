//! Serialization seam between the engines and the host's text format.

use crate::component::ComponentSpec;

/// Errors from a [`ComponentCodec`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

/// Canonical round-trip codec for component specs.
///
/// `serialize` must be deterministic: the same spec always yields the same
/// text, since digests are computed over it.
pub trait ComponentCodec {
    fn serialize(&self, spec: &ComponentSpec) -> Result<String, CodecError>;

    fn deserialize(&self, text: &str) -> Result<ComponentSpec, CodecError>;
}
