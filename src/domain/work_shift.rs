//! Work shift domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Work shift lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl Default for ShiftStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl std::fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Confirmed => write!(f, "confirmed"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl From<&str> for ShiftStatus {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "confirmed" => Self::Confirmed,
            "completed" => Self::Completed,
            "cancelled" => Self::Cancelled,
            _ => Self::Pending,
        }
    }
}

/// Staffing slot on the work calendar. A shift names the role it
/// requires; assignment to a concrete user is optional until a worker
/// picks it up or an administrator assigns one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkShift {
    pub id: i32,
    pub title: String,
    pub required_role: String,
    pub assigned_user_id: Option<i32>,
    pub drop_zone_id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: ShiftStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkShift {
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.start_time >= now
    }
}
