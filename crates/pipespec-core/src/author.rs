//! Authorship lookup for newly created components.

use tracing::warn;

/// Identity recorded when the real author cannot be determined.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

#[derive(Debug, thiserror::Error)]
pub enum AuthorError {
    #[error("author lookup unavailable: {0}")]
    Unavailable(String),
}

/// Host-provided lookup of the current user.
pub trait AuthorSource {
    fn current_author(&self) -> Result<String, AuthorError>;
}

/// Always answers with the same identity.
#[derive(Debug, Clone)]
pub struct FixedAuthor(pub String);

impl FixedAuthor {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// A source reporting the sentinel identity.
    pub fn unknown() -> Self {
        Self(UNKNOWN_AUTHOR.to_string())
    }
}

impl AuthorSource for FixedAuthor {
    fn current_author(&self) -> Result<String, AuthorError> {
        Ok(self.0.clone())
    }
}

/// Source used when the host offers no identity at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnknownAuthor;

impl AuthorSource for UnknownAuthor {
    fn current_author(&self) -> Result<String, AuthorError> {
        Ok(UNKNOWN_AUTHOR.to_string())
    }
}

/// Best-effort author lookup; failures and blank answers become [`UNKNOWN_AUTHOR`].
pub fn resolve_author(source: &dyn AuthorSource) -> String {
    match source.current_author() {
        Ok(name) if !name.trim().is_empty() => name,
        Ok(_) => UNKNOWN_AUTHOR.to_string(),
        Err(err) => {
            warn!(error = %err, "falling back to unknown author");
            UNKNOWN_AUTHOR.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl AuthorSource for Broken {
        fn current_author(&self) -> Result<String, AuthorError> {
            Err(AuthorError::Unavailable("no session".into()))
        }
    }

    #[test]
    fn fixed_author() {
        assert_eq!(resolve_author(&FixedAuthor::new("ada")), "ada");
        assert_eq!(resolve_author(&UnknownAuthor), UNKNOWN_AUTHOR);
    }

    #[test]
    fn failure_degrades_to_unknown() {
        assert_eq!(resolve_author(&Broken), UNKNOWN_AUTHOR);
        assert_eq!(resolve_author(&FixedAuthor::new("  ")), UNKNOWN_AUTHOR);
    }
}
