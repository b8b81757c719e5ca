//! User domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
    Suspended,
}

impl Default for UserStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
            Self::Suspended => write!(f, "suspended"),
        }
    }
}

impl From<&str> for UserStatus {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "inactive" => Self::Inactive,
            "suspended" => Self::Suspended,
            _ => Self::Active,
        }
    }
}

/// Staff member of one or more drop zones.
///
/// `roles` and `drop_zones` hold names, not ids; the role and
/// drop-zone records are matched by name wherever authorization or
/// counter queries need them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub drop_zones: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}
