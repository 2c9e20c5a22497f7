//! Component references and their resolution.
//!
//! A reference records whatever is currently known about the component a
//! task instantiates: a content digest, a URL, the canonical text, the parsed
//! spec. Resolution is best-effort and owned by the host; the engines treat
//! an unresolved reference as "insufficient information", never as failure.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::component::ComponentSpec;

/// How a task refers to its component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<Arc<ComponentSpec>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ComponentReference {
    /// Reference carrying an inline, already-parsed spec.
    pub fn inline(spec: ComponentSpec) -> Self {
        Self::shared(Arc::new(spec))
    }

    /// Reference sharing an existing spec.
    pub fn shared(spec: Arc<ComponentSpec>) -> Self {
        Self {
            name: spec.name.clone(),
            spec: Some(spec),
            ..Self::default()
        }
    }

    pub fn by_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn by_digest(digest: impl Into<String>) -> Self {
        Self {
            digest: Some(digest.into()),
            ..Self::default()
        }
    }

    /// True when name, digest, spec, and text are all known.
    pub fn is_hydrated(&self) -> bool {
        self.name.is_some() && self.digest.is_some() && self.spec.is_some() && self.text.is_some()
    }

    /// True when the reference carries nothing that could identify a component.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.digest.is_none()
            && self.url.is_none()
            && self.spec.is_none()
            && self.text.is_none()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or_else(|| self.spec.as_ref().and_then(|s| s.name.as_deref()))
    }
}

/// Host-provided hydration of component references.
pub trait ComponentResolver {
    /// Resolve `reference` to a parsed spec, or `None` when that is not
    /// currently possible.
    fn resolve(&self, reference: &ComponentReference) -> Option<Arc<ComponentSpec>>;
}

/// Resolver that only looks at the spec embedded in the reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineResolver;

impl ComponentResolver for InlineResolver {
    fn resolve(&self, reference: &ComponentReference) -> Option<Arc<ComponentSpec>> {
        reference.spec.clone()
    }
}
