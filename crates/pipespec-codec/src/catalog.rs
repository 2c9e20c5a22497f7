//! In-memory component catalog.

use std::collections::HashMap;
use std::sync::Arc;

use pipespec_core::codec::{CodecError, ComponentCodec};
use pipespec_core::component::ComponentSpec;
use pipespec_core::reference::{ComponentReference, ComponentResolver};
use tracing::debug;

use crate::json::JsonCodec;

/// Resolver over components registered by digest and URL.
///
/// Resolution order: inline spec, digest, URL, then parsing the reference's
/// own text.
#[derive(Debug, Default)]
pub struct ComponentCatalog {
    codec: JsonCodec,
    by_digest: HashMap<String, Arc<ComponentSpec>>,
    by_url: HashMap<String, Arc<ComponentSpec>>,
}

impl ComponentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a spec under its canonical digest, returning the digest.
    pub fn register(&mut self, spec: ComponentSpec) -> Result<String, CodecError> {
        let (_, digest) = self.codec.canonical_digest(&spec)?;
        self.by_digest.insert(digest.clone(), Arc::new(spec));
        Ok(digest)
    }

    /// Register a spec under its digest and a URL it is published at.
    pub fn register_url(
        &mut self,
        url: impl Into<String>,
        spec: ComponentSpec,
    ) -> Result<String, CodecError> {
        let (_, digest) = self.codec.canonical_digest(&spec)?;
        let spec = Arc::new(spec);
        self.by_digest.insert(digest.clone(), Arc::clone(&spec));
        self.by_url.insert(url.into(), spec);
        Ok(digest)
    }

    pub fn len(&self) -> usize {
        self.by_digest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_digest.is_empty()
    }
}

impl ComponentResolver for ComponentCatalog {
    fn resolve(&self, reference: &ComponentReference) -> Option<Arc<ComponentSpec>> {
        if let Some(spec) = &reference.spec {
            return Some(Arc::clone(spec));
        }
        if let Some(spec) = reference.digest.as_ref().and_then(|d| self.by_digest.get(d)) {
            return Some(Arc::clone(spec));
        }
        if let Some(spec) = reference.url.as_ref().and_then(|u| self.by_url.get(u)) {
            return Some(Arc::clone(spec));
        }
        let text = reference.text.as_ref()?;
        match self.codec.deserialize(text) {
            Ok(spec) => Some(Arc::new(spec)),
            Err(err) => {
                debug!(error = %err, "component text did not parse");
                None
            }
        }
    }
}
