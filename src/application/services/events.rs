//! Event calendar business logic service

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::require;
use crate::domain::{DomainError, DomainResult, Event};
use crate::infrastructure::Storage;

/// Fields for creating an event
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub event_type: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub drop_zone_id: i32,
    pub description: String,
    pub required_roles: Vec<String>,
}

/// Partial update; `None` fields keep their current value
#[derive(Debug, Clone, Default)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub event_type: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<Option<DateTime<Utc>>>,
    pub drop_zone_id: Option<i32>,
    pub description: Option<String>,
    pub required_roles: Option<Vec<String>>,
}

/// Service for the event calendar
pub struct EventService {
    storage: Arc<dyn Storage>,
}

impl EventService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn list(&self) -> DomainResult<Vec<Event>> {
        self.storage.list_events().await
    }

    pub async fn get(&self, id: i32) -> DomainResult<Event> {
        self.storage
            .get_event(id)
            .await?
            .ok_or(DomainError::not_found("event", id))
    }

    pub async fn create(&self, data: NewEvent) -> DomainResult<Event> {
        require("title", &data.title)?;
        require("event type", &data.event_type)?;
        self.ensure_drop_zone(data.drop_zone_id).await?;
        validate_window(data.start_time, data.end_time)?;

        let now = Utc::now();
        let event = Event {
            id: 0,
            title: data.title,
            event_type: data.event_type,
            start_time: data.start_time,
            end_time: data.end_time,
            drop_zone_id: data.drop_zone_id,
            description: data.description,
            required_roles: data.required_roles,
            created_at: now,
            updated_at: now,
        };

        let created = self.storage.insert_event(event).await?;
        info!(event_id = created.id, title = %created.title, "Event created");
        Ok(created)
    }

    pub async fn update(&self, id: i32, patch: EventUpdate) -> DomainResult<Event> {
        let mut event = self.get(id).await?;

        if let Some(title) = patch.title {
            event.title = title;
        }
        if let Some(event_type) = patch.event_type {
            event.event_type = event_type;
        }
        if let Some(start_time) = patch.start_time {
            event.start_time = start_time;
        }
        if let Some(end_time) = patch.end_time {
            event.end_time = end_time;
        }
        if let Some(drop_zone_id) = patch.drop_zone_id {
            self.ensure_drop_zone(drop_zone_id).await?;
            event.drop_zone_id = drop_zone_id;
        }
        if let Some(description) = patch.description {
            event.description = description;
        }
        if let Some(required_roles) = patch.required_roles {
            event.required_roles = required_roles;
        }

        require("title", &event.title)?;
        require("event type", &event.event_type)?;
        validate_window(event.start_time, event.end_time)?;

        self.storage.update_event(event).await
    }

    pub async fn delete(&self, id: i32) -> DomainResult<()> {
        self.storage.delete_event(id).await?;
        info!(event_id = id, "Event deleted");
        Ok(())
    }

    pub async fn by_drop_zone(&self, drop_zone_id: i32) -> DomainResult<Vec<Event>> {
        self.storage.events_by_drop_zone(drop_zone_id).await
    }

    pub async fn in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Event>> {
        if end < start {
            return Err(DomainError::validation("range end precedes start"));
        }
        self.storage.events_in_range(start, end).await
    }

    pub async fn upcoming(&self, limit: usize) -> DomainResult<Vec<Event>> {
        self.storage.upcoming_events(limit).await
    }

    async fn ensure_drop_zone(&self, id: i32) -> DomainResult<()> {
        self.storage
            .get_drop_zone(id)
            .await?
            .map(|_| ())
            .ok_or(DomainError::not_found("drop zone", id))
    }
}

fn validate_window(
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
) -> DomainResult<()> {
    if let Some(end) = end {
        if end < start {
            return Err(DomainError::validation("end time precedes start time"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crate::infrastructure::{InMemoryStorage, LatencyProfile};

    fn service() -> EventService {
        let storage = Arc::new(InMemoryStorage::seeded(LatencyProfile::none()).unwrap());
        EventService::new(storage)
    }

    fn new_event(drop_zone_id: i32) -> NewEvent {
        NewEvent {
            title: "Night Jumps".into(),
            event_type: "boogie".into(),
            start_time: Utc::now() + Duration::days(7),
            end_time: Some(Utc::now() + Duration::days(7) + Duration::hours(6)),
            drop_zone_id,
            description: String::new(),
            required_roles: vec!["Manifest".into()],
        }
    }

    #[tokio::test]
    async fn create_requires_existing_drop_zone() {
        let svc = service();
        assert!(matches!(
            svc.create(new_event(999)).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn create_rejects_inverted_window() {
        let svc = service();
        let mut data = new_event(1);
        data.end_time = Some(data.start_time - Duration::hours(1));
        assert!(matches!(
            svc.create(data).await.unwrap_err(),
            DomainError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn upcoming_is_sorted_and_limited() {
        let svc = service();
        for days in [30, 10, 20] {
            let mut data = new_event(1);
            data.start_time = Utc::now() + Duration::days(days);
            data.end_time = None;
            svc.create(data).await.unwrap();
        }

        let upcoming = svc.upcoming(2).await.unwrap();
        assert_eq!(upcoming.len(), 2);
        assert!(upcoming[0].start_time <= upcoming[1].start_time);
    }

    #[tokio::test]
    async fn in_range_rejects_inverted_range() {
        let svc = service();
        let now = Utc::now();
        assert!(matches!(
            svc.in_range(now, now - Duration::days(1)).await.unwrap_err(),
            DomainError::Validation(_)
        ));
    }
}
