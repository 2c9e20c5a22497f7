//! Reference hydration.
//!
//! A reference is hydrated once it carries name, digest, spec, and text.
//! Hydration derives the missing parts from the ones present: the spec from
//! the text (or the resolver), the text from the spec, the digest from the
//! text, the name from the spec.

use std::sync::Arc;

use pipespec_core::codec::{CodecError, ComponentCodec};
use pipespec_core::component::ComponentSpec;
use pipespec_core::hash::digest_text;
use pipespec_core::reference::{ComponentReference, ComponentResolver};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum HydrationError {
    #[error("component reference cannot be resolved to a spec")]
    Unresolvable,

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Build a fully hydrated reference to `spec`.
pub fn reference_for(
    spec: Arc<ComponentSpec>,
    codec: &dyn ComponentCodec,
) -> Result<ComponentReference, CodecError> {
    let text = codec.serialize(&spec)?;
    Ok(ComponentReference {
        name: spec.name.clone(),
        digest: Some(digest_text(&text)),
        url: None,
        spec: Some(spec),
        text: Some(text),
    })
}

/// Fill in whatever `reference` is missing.
///
/// An already-hydrated reference is returned unchanged. A reference whose
/// spec cannot be obtained from its text or from `resolver` is an error.
pub fn hydrate_reference(
    reference: &ComponentReference,
    codec: &dyn ComponentCodec,
    resolver: &dyn ComponentResolver,
) -> Result<ComponentReference, HydrationError> {
    if reference.is_hydrated() {
        return Ok(reference.clone());
    }

    let spec = match (&reference.spec, &reference.text) {
        (Some(spec), _) => Arc::clone(spec),
        (None, Some(text)) => Arc::new(codec.deserialize(text)?),
        (None, None) => resolver
            .resolve(reference)
            .ok_or(HydrationError::Unresolvable)?,
    };

    let text = match &reference.text {
        Some(text) => text.clone(),
        None => codec.serialize(&spec)?,
    };

    let digest = digest_text(&text);
    if let Some(declared) = &reference.digest {
        if *declared != digest {
            warn!(declared = %declared, computed = %digest, "component digest mismatch");
        }
    }

    Ok(ComponentReference {
        name: reference.name.clone().or_else(|| spec.name.clone()),
        digest: Some(digest),
        url: reference.url.clone(),
        spec: Some(spec),
        text: Some(text),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JsonCodec;
    use pipespec_core::builder::ComponentBuilder;
    use pipespec_core::reference::InlineResolver;

    fn leaf() -> ComponentSpec {
        ComponentBuilder::new("leaf").container("alpine").build()
    }

    #[test]
    fn reference_for_is_hydrated() {
        let r = reference_for(Arc::new(leaf()), &JsonCodec::new()).unwrap();
        assert!(r.is_hydrated());
        assert_eq!(r.name.as_deref(), Some("leaf"));
    }

    #[test]
    fn hydrate_from_text() {
        let codec = JsonCodec::new();
        let text = codec.serialize(&leaf()).unwrap();
        let partial = ComponentReference {
            text: Some(text.clone()),
            ..ComponentReference::default()
        };
        let full = hydrate_reference(&partial, &codec, &InlineResolver).unwrap();
        assert!(full.is_hydrated());
        assert_eq!(full.digest.as_deref(), Some(digest_text(&text).as_str()));
        assert_eq!(full.spec.as_deref(), Some(&leaf()));
    }

    #[test]
    fn hydrate_from_inline_spec_shares_it() {
        let partial = ComponentReference::inline(leaf());
        let full = hydrate_reference(&partial, &JsonCodec::new(), &InlineResolver).unwrap();
        assert!(Arc::ptr_eq(
            full.spec.as_ref().unwrap(),
            partial.spec.as_ref().unwrap()
        ));
    }

    #[test]
    fn url_only_reference_is_unresolvable_inline() {
        let err = hydrate_reference(
            &ComponentReference::by_url("https://example.com/c.yaml"),
            &JsonCodec::new(),
            &InlineResolver,
        )
        .unwrap_err();
        assert!(matches!(err, HydrationError::Unresolvable));
    }
}
