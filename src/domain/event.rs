//! Event domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Calendar event at a drop zone (boogie, competition, training camp).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: i32,
    pub title: String,
    pub event_type: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub drop_zone_id: i32,
    #[serde(default)]
    pub description: String,
    /// Role names that must be staffed for the event
    #[serde(default)]
    pub required_roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.start_time >= now
    }
}
