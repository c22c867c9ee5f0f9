//! Field keys
//!
//! A [`FieldKey`] names one validated field of an element. It is a dotted
//! path such as `"address.city"`, but the engine never walks it: keys are
//! compared and hashed, nothing else.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier for a bindable field on an element
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldKey(String);

impl FieldKey {
    /// Create a key from a path string
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The underlying path string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FieldKey {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for FieldKey {
    fn from(path: String) -> Self {
        Self(path)
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
