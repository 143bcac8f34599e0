//! # Rolegraph RBAC
//!
//! In-memory role-based access control: a directed graph of roles connected
//! by "inherits permissions from" edges, queried through a single
//! authorization predicate.
//!
//! ## Features
//!
//! - **Multiple inheritance** - a role may have any number of parents
//! - **Fail-closed checks** - unknown roles are denied, never reported as success
//! - **Cycle tolerant** - resolution keeps a visited set, cycles can be listed
//! - **Assertion hooks** - caller-supplied veto with read access to the graph
//! - **One lock** - role store and parent graph share a single `RwLock`
//!
//! The embedding service decides which roles an identity holds and asks
//! whether one of those roles may exercise a permission.
//!
//! ## Example
//!
//! ```rust
//! use rolegraph_rbac::{Rbac, StdPermission, StdRole};
//!
//! # fn main() -> Result<(), rolegraph_rbac::RbacError> {
//! let rbac: Rbac = Rbac::new();
//!
//! rbac.add(StdRole::new("admin".to_string()).with_permission(StdPermission::new("delete")))?;
//! rbac.add(StdRole::new("editor".to_string()).with_permission(StdPermission::new("edit")))?;
//! rbac.set_parent(&"editor".to_string(), "admin".to_string())?;
//!
//! let editor = "editor".to_string();
//! assert!(rbac.is_granted(&editor, &StdPermission::new("edit"), None));
//! assert!(rbac.is_granted(&editor, &StdPermission::new("delete"), None));
//! assert!(!rbac.is_granted(&"admin".to_string(), &StdPermission::new("edit"), None));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod definition;
pub mod error;
pub mod graph;
pub mod helpers;
pub mod permission;
pub mod rbac;
pub mod role;

// Re-export commonly used types
pub use config::RbacConfig;
pub use definition::{RbacBuilder, RoleDefinition};
pub use error::{RbacError, Result};
pub use graph::{Assertion, RoleGraph};
pub use helpers::{all_granted, any_granted, inheritance_cycles, walk};
pub use permission::{LayerPermission, Permission, StdPermission};
pub use rbac::Rbac;
pub use role::{Role, StdRole};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
