//! Role store and parent graph
//!
//! [`RoleGraph`] owns both maps that make up the inheritance graph:
//!
//! - the role store (role id -> role)
//! - the parent graph (role id -> set of direct parent ids)
//!
//! It performs no locking of its own. [`Rbac`](crate::Rbac) wraps it in a
//! single reader/writer lock, and assertion hooks receive it by shared
//! reference so they can inspect the graph without touching that lock.
//!
//! # Resolution
//!
//! Permission resolution is a depth-first reachability search from the
//! queried role along parent edges, stopping at the first role that directly
//! grants the permission. The search keeps its own stack and a visited set,
//! so deep chains do not exhaust the thread stack, cyclic graphs terminate
//! and shared ancestors are expanded once.

use crate::config::RbacConfig;
use crate::error::{RbacError, Result};
use crate::permission::Permission;
use crate::role::Role;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// Caller-supplied veto evaluated once per top-level authorization query
///
/// Receives the graph (already read-locked when called through
/// [`Rbac`](crate::Rbac)), the queried role id and the requested permission.
/// Returning `false` denies the query outright; returning `true` leaves the
/// decision to structural resolution.
///
/// Query the graph passed in, never a captured [`Rbac`](crate::Rbac): the
/// read lock is already held and is task-fair, so any call back into the
/// same `Rbac` (reads included) deadlocks once a writer is queued.
pub type Assertion<'a, R> = dyn Fn(&RoleGraph<R>, &<R as Role>::Id, &dyn Permission) -> bool + 'a;

/// DFS colouring used by cycle detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    /// On the current DFS path
    Visiting,
    /// Fully explored
    Done,
}

/// Role store and parent graph, unsynchronised
pub struct RoleGraph<R: Role> {
    /// Role store
    roles: HashMap<R::Id, Arc<R>>,

    /// Parent graph: role id -> direct parent ids
    parents: HashMap<R::Id, HashSet<R::Id>>,

    /// Parent hop limit for resolution
    max_hierarchy_depth: Option<usize>,
}

impl<R: Role> RoleGraph<R> {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::with_config(&RbacConfig::default())
    }

    /// Create an empty graph with the given configuration
    pub fn with_config(config: &RbacConfig) -> Self {
        Self {
            roles: HashMap::new(),
            parents: HashMap::new(),
            max_hierarchy_depth: config.max_hierarchy_depth,
        }
    }

    /// Add a role
    ///
    /// # Errors
    ///
    /// Returns [`RbacError::RoleExists`] if the identifier is already present;
    /// the existing role is left untouched.
    pub fn add(&mut self, role: Arc<R>) -> Result<()> {
        let id = role.id();
        if self.roles.contains_key(id) {
            debug!("Rejected duplicate role: {:?}", id);
            return Err(RbacError::exists(id));
        }

        info!("Adding role: {:?}", id);
        self.roles.insert(id.clone(), role);
        Ok(())
    }

    /// Remove a role and every parent edge that references it
    ///
    /// Both the role's own parent set and its appearances in other roles'
    /// parent sets are scrubbed.
    ///
    /// # Errors
    ///
    /// Returns [`RbacError::RoleNotFound`] if the role does not exist.
    pub fn remove(&mut self, id: &R::Id) -> Result<()> {
        if self.roles.remove(id).is_none() {
            return Err(RbacError::not_found(id));
        }

        self.parents.remove(id);
        for parents in self.parents.values_mut() {
            parents.remove(id);
        }

        info!("Removed role: {:?}", id);
        Ok(())
    }

    /// Get a role together with a copy of its parent set
    ///
    /// # Errors
    ///
    /// Returns [`RbacError::RoleNotFound`] if the role does not exist.
    pub fn get(&self, id: &R::Id) -> Result<(Arc<R>, HashSet<R::Id>)> {
        let role = self.roles.get(id).ok_or_else(|| RbacError::not_found(id))?;
        Ok((Arc::clone(role), self.parents_of(id)))
    }

    /// Union `parents` into the parent set of `id`
    ///
    /// Existing parents not listed are kept. Nothing is changed unless the
    /// role and every listed parent exist.
    ///
    /// # Errors
    ///
    /// Returns [`RbacError::RoleNotFound`] if the role or any parent is missing.
    pub fn set_parents<I>(&mut self, id: &R::Id, parents: I) -> Result<()>
    where
        I: IntoIterator<Item = R::Id>,
    {
        self.ensure_exists(id)?;
        let parents: Vec<R::Id> = parents.into_iter().collect();
        for parent in &parents {
            self.ensure_exists(parent)?;
        }

        info!("Setting parents of {:?}: {:?}", id, parents);
        self.parents.entry(id.clone()).or_default().extend(parents);
        Ok(())
    }

    /// Add a single parent edge; adding an existing edge is a no-op
    ///
    /// # Errors
    ///
    /// Returns [`RbacError::RoleNotFound`] if either role is missing.
    pub fn set_parent(&mut self, id: &R::Id, parent: R::Id) -> Result<()> {
        self.ensure_exists(id)?;
        self.ensure_exists(&parent)?;

        info!("Setting parent of {:?}: {:?}", id, parent);
        self.parents.entry(id.clone()).or_default().insert(parent);
        Ok(())
    }

    /// Remove a single parent edge; removing a missing edge succeeds silently
    ///
    /// # Errors
    ///
    /// Returns [`RbacError::RoleNotFound`] if either role is missing.
    pub fn remove_parent(&mut self, id: &R::Id, parent: &R::Id) -> Result<()> {
        self.ensure_exists(id)?;
        self.ensure_exists(parent)?;

        if let Some(parents) = self.parents.get_mut(id) {
            if parents.remove(parent) {
                info!("Removed parent of {:?}: {:?}", id, parent);
            }
        }
        Ok(())
    }

    /// Get a copy of the parent set of `id`
    ///
    /// A role that never had a parent yields an empty set.
    ///
    /// # Errors
    ///
    /// Returns [`RbacError::RoleNotFound`] if the role does not exist.
    pub fn get_parents(&self, id: &R::Id) -> Result<HashSet<R::Id>> {
        self.ensure_exists(id)?;
        Ok(self.parents_of(id))
    }

    /// Whether a role with this identifier exists
    pub fn contains(&self, id: &R::Id) -> bool {
        self.roles.contains_key(id)
    }

    /// Number of roles
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Whether the graph holds no roles
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Identifiers of all roles, in no particular order
    pub fn role_ids(&self) -> Vec<R::Id> {
        self.roles.keys().cloned().collect()
    }

    /// Iterate over every role and its (possibly empty) parent set
    pub fn iter(&self) -> impl Iterator<Item = (&Arc<R>, Option<&HashSet<R::Id>>)> + '_ {
        self.roles
            .iter()
            .map(move |(id, role)| (role, self.parents.get(id)))
    }

    /// Test whether role `id` is granted `permission`
    ///
    /// The assertion, if any, runs first and can only veto. Unknown roles
    /// are denied rather than reported as errors.
    pub fn is_granted(
        &self,
        id: &R::Id,
        permission: &dyn Permission,
        assertion: Option<&Assertion<'_, R>>,
    ) -> bool {
        if let Some(assert) = assertion {
            if !assert(self, id, permission) {
                debug!("Assertion denied {:?} for role {:?}", permission.id(), id);
                return false;
            }
        }

        let granted = self.is_granted_structural(id, permission);
        debug!(
            "Decision for role {:?} on {:?}: {}",
            id,
            permission.id(),
            if granted { "granted" } else { "denied" }
        );
        granted
    }

    /// Structural resolution only, without any assertion
    pub fn is_granted_structural(&self, id: &R::Id, permission: &dyn Permission) -> bool {
        self.resolve(id, permission)
    }

    /// Depth-first search for a role that directly grants `permission`
    ///
    /// Runs on an explicit stack, so chain length is bounded by memory rather
    /// than by the thread stack. `visited` maps each expanded role to the
    /// shallowest depth it was expanded at. A role is expanded again only when
    /// a depth limit is set and it is now reached on a shorter path.
    fn resolve<'g>(&'g self, id: &'g R::Id, permission: &dyn Permission) -> bool {
        let mut visited: HashMap<&'g R::Id, usize> = HashMap::new();
        let mut stack = vec![(id, 0usize)];

        while let Some((id, depth)) = stack.pop() {
            let Some(role) = self.roles.get(id) else {
                continue;
            };

            if let Some(&seen) = visited.get(id) {
                if self.max_hierarchy_depth.is_none() || seen <= depth {
                    debug!("Role {:?} already examined", id);
                    continue;
                }
            }
            visited.insert(id, depth);

            if role.permit(permission) {
                return true;
            }

            let mut parents = self.known_parents(id).peekable();
            if parents.peek().is_none() {
                continue;
            }

            if let Some(limit) = self.max_hierarchy_depth {
                if depth >= limit {
                    debug!(
                        "Hierarchy depth limit {} reached at role {:?}; parents not followed",
                        limit, id
                    );
                    continue;
                }
            }

            stack.extend(parents.map(|parent| (parent, depth + 1)));
        }

        false
    }

    /// Find inheritance cycles
    ///
    /// Returns each cycle found as a path whose first and last element are
    /// the same role, e.g. `[a, b, a]`. An acyclic graph yields no cycles.
    ///
    /// Uses a depth-first search with a per-node state: a node found on the
    /// current path closes a cycle.
    pub fn cycles(&self) -> Vec<Vec<R::Id>> {
        let mut state: HashMap<&R::Id, VisitState> = HashMap::new();
        let mut cycles = Vec::new();

        for start in self.roles.keys() {
            if !state.contains_key(start) {
                self.dfs_cycle_detect(start, &mut state, &mut cycles);
            }
        }

        cycles
    }

    /// One DFS tree of [`cycles`](Self::cycles)
    ///
    /// `path` holds the roles on the current branch and `frames` the
    /// remaining parents of each of them.
    fn dfs_cycle_detect<'g>(
        &'g self,
        start: &'g R::Id,
        state: &mut HashMap<&'g R::Id, VisitState>,
        cycles: &mut Vec<Vec<R::Id>>,
    ) {
        state.insert(start, VisitState::Visiting);
        let mut path = vec![start];
        let mut frames = vec![self.known_parents(start)];

        while let Some(frame) = frames.last_mut() {
            let Some(parent) = frame.next() else {
                frames.pop();
                if let Some(done) = path.pop() {
                    state.insert(done, VisitState::Done);
                }
                continue;
            };

            match state.get(parent).copied() {
                Some(VisitState::Visiting) => {
                    if let Some(at) = path.iter().position(|n| *n == parent) {
                        let cycle = path[at..]
                            .iter()
                            .copied()
                            .chain(std::iter::once(parent))
                            .cloned()
                            .collect();
                        cycles.push(cycle);
                    }
                }
                Some(VisitState::Done) => {}
                None => {
                    state.insert(parent, VisitState::Visiting);
                    path.push(parent);
                    frames.push(self.known_parents(parent));
                }
            }
        }
    }

    /// Direct parents of `id` that are present in the role store
    fn known_parents<'g>(&'g self, id: &R::Id) -> impl Iterator<Item = &'g R::Id> + 'g {
        self.parents
            .get(id)
            .into_iter()
            .flatten()
            .filter(move |parent| self.roles.contains_key(*parent))
    }

    fn ensure_exists(&self, id: &R::Id) -> Result<()> {
        if self.roles.contains_key(id) {
            Ok(())
        } else {
            debug!("Role not found: {:?}", id);
            Err(RbacError::not_found(id))
        }
    }

    fn parents_of(&self, id: &R::Id) -> HashSet<R::Id> {
        self.parents.get(id).cloned().unwrap_or_default()
    }
}

impl<R: Role> Default for RoleGraph<R> {
    fn default() -> Self {
        Self::new()
    }
}
