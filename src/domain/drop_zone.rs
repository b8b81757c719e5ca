//! Drop zone domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Drop zone operational status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropZoneStatus {
    Active,
    Inactive,
    Pending,
}

impl Default for DropZoneStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl std::fmt::Display for DropZoneStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
            Self::Pending => write!(f, "pending"),
        }
    }
}

impl From<&str> for DropZoneStatus {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "active" => Self::Active,
            "inactive" => Self::Inactive,
            _ => Self::Pending,
        }
    }
}

/// Skydiving operational site.
///
/// `code` is a short uppercase identifier (3-4 characters) shown on
/// manifests and calendars. `active_users` / `upcoming_events` are
/// derived counters recomputed from the user and event records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropZone {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub address: String,
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub status: DropZoneStatus,
    #[serde(default)]
    pub active_users: i32,
    #[serde(default)]
    pub upcoming_events: i32,
    pub created_at: DateTime<Utc>,
}

impl DropZone {
    pub fn is_active(&self) -> bool {
        self.status == DropZoneStatus::Active
    }
}
