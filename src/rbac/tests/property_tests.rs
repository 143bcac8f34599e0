//! Property-based tests for permission resolution
//!
//! Random graphs (cycles included) are checked against a breadth-first
//! reachability model.

use proptest::prelude::*;
use rolegraph_rbac::{inheritance_cycles, Rbac, RbacError, StdPermission, StdRole};
use std::collections::{HashSet, VecDeque};

const ROLE_COUNT: u8 = 12;
const PERMISSIONS: [&str; 4] = ["read", "write", "delete", "admin"];

/// Roles reachable from `start` (itself included) along parent edges
fn reachable(start: u8, edges: &[(u8, u8)]) -> HashSet<u8> {
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
        for &(_, parent) in edges.iter().filter(|(child, _)| *child == node) {
            if seen.insert(parent) {
                queue.push_back(parent);
            }
        }
    }
    seen
}

fn build(grants: &[Vec<usize>], edges: &[(u8, u8)]) -> Rbac<StdRole<u8>> {
    let rbac = Rbac::new();
    for (id, perms) in grants.iter().enumerate() {
        let role = StdRole::new(id as u8);
        for &p in perms {
            role.assign(StdPermission::new(PERMISSIONS[p]));
        }
        rbac.add(role).unwrap();
    }
    for &(child, parent) in edges {
        rbac.set_parent(&child, parent).unwrap();
    }
    rbac
}

fn grants_strategy() -> impl Strategy<Value = Vec<Vec<usize>>> {
    prop::collection::vec(
        prop::collection::vec(0..PERMISSIONS.len(), 0..2),
        ROLE_COUNT as usize,
    )
}

fn edges_strategy() -> impl Strategy<Value = Vec<(u8, u8)>> {
    prop::collection::vec((0..ROLE_COUNT, 0..ROLE_COUNT), 0..30)
}

proptest! {
    #[test]
    fn test_matches_reachability(
        grants in grants_strategy(),
        edges in edges_strategy(),
        role in 0..ROLE_COUNT,
        perm in 0..PERMISSIONS.len()
    ) {
        let rbac = build(&grants, &edges);

        let expected = reachable(role, &edges)
            .into_iter()
            .any(|r| grants[r as usize].contains(&perm));
        let actual = rbac.is_granted(&role, &StdPermission::new(PERMISSIONS[perm]), None);

        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn test_vetoing_assertion_always_denies(
        grants in grants_strategy(),
        edges in edges_strategy(),
        role in 0..ROLE_COUNT,
        perm in 0..PERMISSIONS.len()
    ) {
        let rbac = build(&grants, &edges);
        let granted = rbac.is_granted_with(&role, &StdPermission::new(PERMISSIONS[perm]), |_, _, _| false);
        prop_assert!(!granted);
    }

    #[test]
    fn test_remove_scrubs_every_edge(
        edges in edges_strategy(),
        victim in 0..ROLE_COUNT
    ) {
        let grants = vec![Vec::new(); ROLE_COUNT as usize];
        let rbac = build(&grants, &edges);

        rbac.remove(&victim).unwrap();

        prop_assert!(matches!(rbac.get_parents(&victim), Err(RbacError::RoleNotFound(_))));
        for id in rbac.role_ids() {
            prop_assert!(!rbac.get_parents(&id).unwrap().contains(&victim));
        }
    }

    #[test]
    fn test_acyclic_graphs_report_no_cycles(
        edges in edges_strategy()
    ) {
        // only keep edges pointing to a lower id, which cannot form a cycle
        let edges: Vec<(u8, u8)> = edges.into_iter().filter(|(c, p)| p < c).collect();
        let grants = vec![Vec::new(); ROLE_COUNT as usize];
        let rbac = build(&grants, &edges);

        prop_assert!(inheritance_cycles(&rbac).is_empty());
    }
}
