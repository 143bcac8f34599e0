//! Permission types
//!
//! A permission is an opaque capability. The engine only ever asks a granted
//! permission whether it covers a requested one, so matching rules live here
//! and not in the role graph.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Default separator between layers of a [`LayerPermission`]
pub const DEFAULT_SEPARATOR: &str = ":";

/// Layer that matches any single requested layer
const WILDCARD_LAYER: &str = "*";

/// A capability that a role may grant
pub trait Permission: Debug + Send + Sync {
    /// Permission identifier
    fn id(&self) -> &str;

    /// Whether this (granted) permission covers the `requested` one
    ///
    /// The default is identifier equality.
    fn matches(&self, requested: &dyn Permission) -> bool {
        self.id() == requested.id()
    }
}

/// Permission matched by exact identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StdPermission {
    /// Permission identifier (e.g., "delete")
    pub id: String,
}

impl StdPermission {
    /// Create a new permission
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Permission for StdPermission {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Layered permission (e.g., `"document:read:draft"`)
///
/// A granted layered permission covers every requested permission whose
/// leading layers equal its own, so `"document"` covers `"document:read"`
/// but `"document:read"` does not cover `"document"`. A granted layer of `*`
/// covers any single requested layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerPermission {
    /// Permission identifier
    pub id: String,

    /// Layer separator
    #[serde(default = "default_separator")]
    pub separator: String,
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

impl LayerPermission {
    /// Create a new layered permission using the default `:` separator
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_separator(id, DEFAULT_SEPARATOR)
    }

    /// Create a new layered permission with a custom separator
    pub fn with_separator(id: impl Into<String>, separator: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            separator: separator.into(),
        }
    }

    /// Layers of this permission
    pub fn layers(&self) -> impl Iterator<Item = &str> {
        self.id.split(self.separator.as_str())
    }
}

impl Permission for LayerPermission {
    fn id(&self) -> &str {
        &self.id
    }

    fn matches(&self, requested: &dyn Permission) -> bool {
        if self.id == requested.id() {
            return true;
        }
        if self.separator.is_empty() {
            return false;
        }

        let mut requested_layers = requested.id().split(self.separator.as_str());
        self.layers().all(|granted| match requested_layers.next() {
            Some(layer) => granted == WILDCARD_LAYER || granted == layer,
            None => false,
        })
    }
}
