//! Object references shared across the seeding CRDs
//!
//! A plain name/namespace pair; empty fields mean "unset". Status fields use
//! this for back-references populated by out-of-band allocation steps.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Reference to another namespaced resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReference {
    /// Name of the referenced resource
    #[serde(default)]
    pub name: String,

    /// Namespace of the referenced resource
    #[serde(default)]
    pub namespace: String,
}

impl ObjectReference {
    /// Create a reference to `namespace/name`.
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// True when no resource is referenced.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}
