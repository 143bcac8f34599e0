//! Engine configuration

use serde::{Deserialize, Serialize};

/// Environment variable bounding the resolver's hierarchy depth
pub const MAX_HIERARCHY_DEPTH_ENV: &str = "RBAC_MAX_HIERARCHY_DEPTH";

/// Role graph configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RbacConfig {
    /// Maximum number of parent hops followed when resolving a permission
    ///
    /// `None` follows the whole inheritance graph. Paths longer than the limit
    /// are treated as not granting.
    #[serde(default)]
    pub max_hierarchy_depth: Option<usize>,
}

impl RbacConfig {
    /// Configuration that follows the whole inheritance graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit how many parent hops the resolver follows
    pub fn with_max_hierarchy_depth(mut self, depth: usize) -> Self {
        self.max_hierarchy_depth = Some(depth);
        self
    }

    /// Load configuration from the environment
    ///
    /// - `RBAC_MAX_HIERARCHY_DEPTH` - parent hop limit (default: unlimited)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let max_hierarchy_depth = std::env::var(MAX_HIERARCHY_DEPTH_ENV)
            .ok()
            .and_then(|s| s.trim().parse().ok());

        Self { max_hierarchy_depth }
    }
}
