//! Opaque type tags attached to component inputs and outputs.
//!
//! The core never interprets a type beyond equality and display. A type is
//! either a plain name (`"String"`, `"Integer"`) or a structured expression
//! such as `{"GCSPath": {"data_type": "CSV"}}`, kept verbatim.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Type tag of an input or output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSpec {
    /// A simple named type.
    Named(String),
    /// A nested type expression.
    Structured(serde_json::Map<String, serde_json::Value>),
}

impl TypeSpec {
    /// Create a named type.
    pub fn named(name: impl Into<String>) -> Self {
        TypeSpec::Named(name.into())
    }

    /// The plain name, if this is a named type.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            TypeSpec::Named(name) => Some(name),
            TypeSpec::Structured(_) => None,
        }
    }
}

impl From<&str> for TypeSpec {
    fn from(name: &str) -> Self {
        TypeSpec::Named(name.to_string())
    }
}

impl From<String> for TypeSpec {
    fn from(name: String) -> Self {
        TypeSpec::Named(name)
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpec::Named(name) => write!(f, "{name}"),
            TypeSpec::Structured(map) => {
                let text = serde_json::to_string(map).map_err(|_| fmt::Error)?;
                write!(f, "{text}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_round_trips_as_string() {
        let ty = TypeSpec::named("String");
        let json = serde_json::to_string(&ty).unwrap();
        assert_eq!(json, "\"String\"");
        let back: TypeSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ty);
    }

    #[test]
    fn structured_type_kept_verbatim() {
        let ty: TypeSpec = serde_json::from_str(r#"{"GCSPath":{"data_type":"CSV"}}"#).unwrap();
        assert!(ty.as_name().is_none());
        assert_eq!(ty.to_string(), r#"{"GCSPath":{"data_type":"CSV"}}"#);
    }
}
