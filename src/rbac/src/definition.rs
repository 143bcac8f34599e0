//! Declarative role definitions
//!
//! [`RoleDefinition`] describes a [`StdRole`] and its parents in a form that
//! can be deserialized from whatever configuration the embedding service
//! uses. [`RbacBuilder`] turns a batch of definitions into an [`Rbac`] in two
//! phases: all roles are added first, then all parent edges, so definitions
//! may reference parents declared later in the batch.

use crate::config::RbacConfig;
use crate::error::Result;
use crate::permission::{LayerPermission, StdPermission};
use crate::rbac::Rbac;
use crate::role::StdRole;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;
use tracing::debug;

/// Role definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition<K> {
    /// Role identifier
    pub id: K,

    /// Directly granted permission identifiers
    #[serde(default)]
    pub permissions: Vec<String>,

    /// Direct parent role identifiers
    #[serde(default)]
    pub parents: Vec<K>,

    /// Grant permissions as [`LayerPermission`]s instead of exact matches
    #[serde(default)]
    pub layered: bool,
}

impl<K> RoleDefinition<K> {
    /// Create a definition without permissions or parents
    pub fn new(id: K) -> Self {
        Self {
            id,
            permissions: Vec::new(),
            parents: Vec::new(),
            layered: false,
        }
    }

    /// Add a directly granted permission
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.push(permission.into());
        self
    }

    /// Add a parent role
    pub fn with_parent(mut self, parent: K) -> Self {
        self.parents.push(parent);
        self
    }

    /// Grant layered permissions
    pub fn layered(mut self) -> Self {
        self.layered = true;
        self
    }

    /// Build the role this definition describes (without its parents)
    pub fn to_role(&self) -> StdRole<K>
    where
        K: Clone,
    {
        let role = StdRole::new(self.id.clone());
        for permission in &self.permissions {
            if self.layered {
                role.assign(LayerPermission::new(permission.as_str()));
            } else {
                role.assign(StdPermission::new(permission.as_str()));
            }
        }
        role
    }
}

/// Builds an [`Rbac`] from role definitions
#[derive(Debug, Clone)]
pub struct RbacBuilder<K> {
    config: RbacConfig,
    definitions: Vec<RoleDefinition<K>>,
}

impl<K> RbacBuilder<K>
where
    K: Eq + Hash + Clone + Debug + Send + Sync,
{
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: RbacConfig::default(),
            definitions: Vec::new(),
        }
    }

    /// Use `config` for the built engine
    pub fn with_config(mut self, config: RbacConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a role definition
    pub fn role(mut self, definition: RoleDefinition<K>) -> Self {
        self.definitions.push(definition);
        self
    }

    /// Add several role definitions
    pub fn roles(mut self, definitions: impl IntoIterator<Item = RoleDefinition<K>>) -> Self {
        self.definitions.extend(definitions);
        self
    }

    /// Build the engine
    ///
    /// # Errors
    ///
    /// - [`RbacError::RoleExists`](crate::RbacError::RoleExists) if two
    ///   definitions share an identifier
    /// - [`RbacError::RoleNotFound`](crate::RbacError::RoleNotFound) if a
    ///   definition names a parent that is not defined
    pub fn build(self) -> Result<Rbac<StdRole<K>>> {
        let rbac = Rbac::with_config(self.config);

        for definition in &self.definitions {
            rbac.add(definition.to_role())?;
        }

        for definition in self.definitions {
            if !definition.parents.is_empty() {
                rbac.set_parents(&definition.id, definition.parents)?;
            }
        }

        debug!("Built role graph with {} roles", rbac.len());
        Ok(rbac)
    }
}

impl<K> Default for RbacBuilder<K>
where
    K: Eq + Hash + Clone + Debug + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}
