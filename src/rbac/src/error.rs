//! Error types for the role graph

use std::fmt::Debug;
use thiserror::Error;

/// Role graph errors
///
/// Both kinds are caller-input errors: retrying with the same input yields
/// the same error, and no state was changed when one is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RbacError {
    /// Operation referenced a role identifier absent from the store
    #[error("Role does not exist: {0}")]
    RoleNotFound(String),

    /// Add targeted an identifier that is already present
    #[error("Role already exists: {0}")]
    RoleExists(String),
}

impl RbacError {
    pub(crate) fn not_found<K: Debug>(id: &K) -> Self {
        Self::RoleNotFound(format!("{:?}", id))
    }

    pub(crate) fn exists<K: Debug>(id: &K) -> Self {
        Self::RoleExists(format!("{:?}", id))
    }
}

/// Result type for role graph operations
pub type Result<T> = std::result::Result<T, RbacError>;
