//! Role definitions

use crate::permission::Permission;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::hash::Hash;
use std::sync::Arc;

/// A named bundle of directly granted permissions
///
/// The role graph only needs to know a role's identifier and whether it
/// directly grants a permission. Inheritance is the graph's concern.
pub trait Role: Send + Sync {
    /// Role identifier type, fixed for a given engine
    type Id: Eq + Hash + Clone + Debug + Send + Sync;

    /// Role identifier (immutable once created)
    fn id(&self) -> &Self::Id;

    /// Whether this role directly grants `permission`
    fn permit(&self, permission: &dyn Permission) -> bool;
}

/// Standard role
///
/// Permissions are keyed by their identifier and guarded by the role's own
/// lock, so they can be assigned or revoked after the role was handed to an
/// [`Rbac`](crate::Rbac).
pub struct StdRole<K> {
    id: K,
    permissions: RwLock<HashMap<String, Arc<dyn Permission>>>,
}

impl<K> StdRole<K> {
    /// Create a new role without permissions
    pub fn new(id: K) -> Self {
        Self {
            id,
            permissions: RwLock::new(HashMap::new()),
        }
    }

    /// Add a permission to the role (builder style)
    pub fn with_permission(self, permission: impl Permission + 'static) -> Self {
        self.assign(permission);
        self
    }

    /// Grant `permission` directly to this role
    ///
    /// A permission with the same identifier is replaced.
    pub fn assign(&self, permission: impl Permission + 'static) {
        self.assign_arc(Arc::new(permission));
    }

    /// Grant an already shared permission
    pub fn assign_arc(&self, permission: Arc<dyn Permission>) {
        self.permissions
            .write()
            .insert(permission.id().to_string(), permission);
    }

    /// Revoke the permission with the same identifier as `permission`
    ///
    /// Returns `true` if a permission was removed.
    pub fn revoke(&self, permission: &dyn Permission) -> bool {
        self.permissions.write().remove(permission.id()).is_some()
    }

    /// Snapshot of the directly granted permissions
    pub fn permissions(&self) -> Vec<Arc<dyn Permission>> {
        self.permissions.read().values().cloned().collect()
    }
}

impl<K> Role for StdRole<K>
where
    K: Eq + Hash + Clone + Debug + Send + Sync,
{
    type Id = K;

    fn id(&self) -> &K {
        &self.id
    }

    fn permit(&self, permission: &dyn Permission) -> bool {
        self.permissions
            .read()
            .values()
            .any(|granted| granted.matches(permission))
    }
}

impl<K: Debug> Debug for StdRole<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let permissions = self.permissions.read();
        f.debug_struct("StdRole")
            .field("id", &self.id)
            .field("permissions", &permissions.keys().collect::<Vec<_>>())
            .finish()
    }
}
