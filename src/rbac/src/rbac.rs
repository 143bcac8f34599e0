//! Shared role graph handle
//!
//! [`Rbac`] is the value an embedding service constructs once and shares
//! (usually behind an `Arc`) with every caller. One reader/writer lock guards
//! the role store and parent graph together:
//!
//! - `add`, `remove`, `set_parents`, `set_parent`, `remove_parent` take the
//!   write lock for their whole duration
//! - `get`, `get_parents`, `is_granted` and the other queries take the read
//!   lock
//!
//! Every operation acquires the lock exactly once. Resolution and assertion
//! hooks work on the already locked [`RoleGraph`].

use crate::config::RbacConfig;
use crate::error::Result;
use crate::graph::{Assertion, RoleGraph};
use crate::permission::Permission;
use crate::role::{Role, StdRole};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

/// Role-based access control engine
pub struct Rbac<R: Role = StdRole<String>> {
    graph: RwLock<RoleGraph<R>>,
}

impl<R: Role> Rbac<R> {
    /// Create an empty engine
    pub fn new() -> Self {
        Self::with_config(RbacConfig::default())
    }

    /// Create an empty engine with the given configuration
    pub fn with_config(config: RbacConfig) -> Self {
        info!(
            "Rbac initialized with max_hierarchy_depth={:?}",
            config.max_hierarchy_depth
        );
        Self {
            graph: RwLock::new(RoleGraph::with_config(&config)),
        }
    }

    /// Add a role
    ///
    /// # Errors
    ///
    /// [`RbacError::RoleExists`](crate::RbacError::RoleExists) if the
    /// identifier is taken.
    pub fn add(&self, role: R) -> Result<()> {
        self.add_arc(Arc::new(role))
    }

    /// Add a role the caller keeps a handle to
    ///
    /// Keeping the `Arc` lets the caller change the role's permissions later.
    pub fn add_arc(&self, role: Arc<R>) -> Result<()> {
        self.graph.write().add(role)
    }

    /// Remove a role and scrub every parent edge referencing it
    pub fn remove(&self, id: &R::Id) -> Result<()> {
        self.graph.write().remove(id)
    }

    /// Get a role and a copy of its parent set
    pub fn get(&self, id: &R::Id) -> Result<(Arc<R>, HashSet<R::Id>)> {
        self.graph.read().get(id)
    }

    /// Union `parents` into the parent set of `id` (all or nothing)
    pub fn set_parents<I>(&self, id: &R::Id, parents: I) -> Result<()>
    where
        I: IntoIterator<Item = R::Id>,
    {
        self.graph.write().set_parents(id, parents)
    }

    /// Add the parent edge `id -> parent`
    pub fn set_parent(&self, id: &R::Id, parent: R::Id) -> Result<()> {
        self.graph.write().set_parent(id, parent)
    }

    /// Remove the parent edge `id -> parent` if present
    pub fn remove_parent(&self, id: &R::Id, parent: &R::Id) -> Result<()> {
        self.graph.write().remove_parent(id, parent)
    }

    /// Get a copy of the parent set of `id`
    pub fn get_parents(&self, id: &R::Id) -> Result<HashSet<R::Id>> {
        self.graph.read().get_parents(id)
    }

    /// Test whether role `id` is granted `permission`
    ///
    /// Never fails: unknown roles, vetoing assertions and missing grants all
    /// yield `false`.
    pub fn is_granted(
        &self,
        id: &R::Id,
        permission: &dyn Permission,
        assertion: Option<&Assertion<'_, R>>,
    ) -> bool {
        self.graph.read().is_granted(id, permission, assertion)
    }

    /// Like [`is_granted`](Self::is_granted) with a closure as assertion
    pub fn is_granted_with<F>(&self, id: &R::Id, permission: &dyn Permission, assertion: F) -> bool
    where
        F: Fn(&RoleGraph<R>, &R::Id, &dyn Permission) -> bool,
    {
        self.is_granted(id, permission, Some(&assertion))
    }

    /// Whether a role with this identifier exists
    pub fn contains(&self, id: &R::Id) -> bool {
        self.graph.read().contains(id)
    }

    /// Number of roles
    pub fn len(&self) -> usize {
        self.graph.read().len()
    }

    /// Whether the engine holds no roles
    pub fn is_empty(&self) -> bool {
        self.graph.read().is_empty()
    }

    /// Identifiers of all roles, in no particular order
    pub fn role_ids(&self) -> Vec<R::Id> {
        self.graph.read().role_ids()
    }

    /// Run `f` against one consistent view of the graph
    ///
    /// The read lock is held while `f` runs. `f` must not call back into this
    /// `Rbac` at all: the lock is task-fair, so even a nested read blocks
    /// behind a queued writer and deadlocks. Query the `&RoleGraph` instead.
    pub fn read<T>(&self, f: impl FnOnce(&RoleGraph<R>) -> T) -> T {
        f(&*self.graph.read())
    }
}

impl<R: Role> Default for Rbac<R> {
    fn default() -> Self {
        Self::new()
    }
}
