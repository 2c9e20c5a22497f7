//! Deterministic JSON codec.
//!
//! Field order is fixed by the model's type definitions and every map in the
//! model is ordered, so serializing the same spec twice yields identical
//! bytes. The compact form is canonical; the pretty form is for humans and
//! is never digested.

use pipespec_core::codec::{CodecError, ComponentCodec};
use pipespec_core::component::ComponentSpec;
use pipespec_core::hash::digest_text;

/// JSON implementation of [`ComponentCodec`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    /// Canonical compact codec.
    pub const fn new() -> Self {
        Self { pretty: false }
    }

    /// Indented output for display.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    /// Canonical text and its digest in one step.
    pub fn canonical_digest(&self, spec: &ComponentSpec) -> Result<(String, String), CodecError> {
        let text = JsonCodec::new().serialize(spec)?;
        let digest = digest_text(&text);
        Ok((text, digest))
    }
}

impl ComponentCodec for JsonCodec {
    fn serialize(&self, spec: &ComponentSpec) -> Result<String, CodecError> {
        let result = if self.pretty {
            serde_json::to_string_pretty(spec)
        } else {
            serde_json::to_string(spec)
        };
        result.map_err(|e| CodecError::Serialization(e.to_string()))
    }

    fn deserialize(&self, text: &str) -> Result<ComponentSpec, CodecError> {
        serde_json::from_str(text).map_err(|e| CodecError::Deserialization(e.to_string()))
    }
}
