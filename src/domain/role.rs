//! Role domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Named role carrying a set of permission strings and an authority
/// level used for manager/target comparisons.
///
/// `user_count` is derived from the user records; stored values are
/// treated as a cache and recomputed by the role service on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: i32,
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    /// Authority rank (higher outranks lower)
    pub level: i32,
    #[serde(default)]
    pub permissions: Vec<String>,
    /// System roles cannot be deleted
    #[serde(default)]
    pub is_system_role: bool,
    #[serde(default)]
    pub user_count: i32,
    pub created_at: DateTime<Utc>,
}

impl Role {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}
