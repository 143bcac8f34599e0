//! Helpers built on top of [`Rbac`]
//!
//! An identity usually holds several roles. These functions answer questions
//! about a set of roles, or about the whole graph, under a single read lock.

use crate::graph::Assertion;
use crate::permission::Permission;
use crate::rbac::Rbac;
use crate::role::Role;
use std::collections::HashSet;
use std::sync::Arc;

/// Whether any of `roles` is granted `permission`
///
/// An empty role list is never granted.
pub fn any_granted<R: Role>(
    rbac: &Rbac<R>,
    roles: &[R::Id],
    permission: &dyn Permission,
    assertion: Option<&Assertion<'_, R>>,
) -> bool {
    rbac.read(|graph| {
        roles
            .iter()
            .any(|id| graph.is_granted(id, permission, assertion))
    })
}

/// Whether every one of `roles` is granted `permission`
///
/// An empty role list is never granted.
pub fn all_granted<R: Role>(
    rbac: &Rbac<R>,
    roles: &[R::Id],
    permission: &dyn Permission,
    assertion: Option<&Assertion<'_, R>>,
) -> bool {
    if roles.is_empty() {
        return false;
    }
    rbac.read(|graph| {
        roles
            .iter()
            .all(|id| graph.is_granted(id, permission, assertion))
    })
}

/// Visit every role together with its parent set
///
/// Stops at, and returns, the first error produced by `handler`.
pub fn walk<R, E, F>(rbac: &Rbac<R>, mut handler: F) -> Result<(), E>
where
    R: Role,
    F: FnMut(&Arc<R>, &HashSet<R::Id>) -> Result<(), E>,
{
    let empty = HashSet::new();
    rbac.read(|graph| {
        graph
            .iter()
            .try_for_each(|(role, parents)| handler(role, parents.unwrap_or(&empty)))
    })
}

/// Inheritance cycles currently present in the graph
///
/// Resolution tolerates cycles, but they usually indicate a
/// misconfigured hierarchy.
pub fn inheritance_cycles<R: Role>(rbac: &Rbac<R>) -> Vec<Vec<R::Id>> {
    rbac.read(|graph| graph.cycles())
}
