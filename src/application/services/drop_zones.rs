//! Drop zone business logic service

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::require;
use crate::domain::{DomainError, DomainResult, DropZone, DropZoneStatus};
use crate::infrastructure::Storage;

/// Fields for creating a drop zone
#[derive(Debug, Clone)]
pub struct NewDropZone {
    pub name: String,
    pub code: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub timezone: String,
    pub status: Option<DropZoneStatus>,
}

/// Partial update; `None` fields keep their current value
#[derive(Debug, Clone, Default)]
pub struct DropZoneUpdate {
    pub name: Option<String>,
    pub code: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub timezone: Option<String>,
    pub status: Option<DropZoneStatus>,
}

/// Service for drop zone management.
///
/// `active_users` and `upcoming_events` are derived: reads recompute
/// them from the user and event records instead of trusting the
/// stored values.
pub struct DropZoneService {
    storage: Arc<dyn Storage>,
}

impl DropZoneService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn list(&self) -> DomainResult<Vec<DropZone>> {
        let mut zones = self.storage.list_drop_zones().await?;
        for zone in &mut zones {
            self.fill_counters(zone).await?;
        }
        Ok(zones)
    }

    pub async fn get(&self, id: i32) -> DomainResult<DropZone> {
        let mut zone = self
            .storage
            .get_drop_zone(id)
            .await?
            .ok_or(DomainError::not_found("drop zone", id))?;
        self.fill_counters(&mut zone).await?;
        Ok(zone)
    }

    pub async fn active(&self) -> DomainResult<Vec<DropZone>> {
        let mut zones = self.storage.active_drop_zones().await?;
        for zone in &mut zones {
            self.fill_counters(zone).await?;
        }
        Ok(zones)
    }

    pub async fn create(&self, data: NewDropZone) -> DomainResult<DropZone> {
        validate_fields(&data.name, &data.code, &data.address, &data.city)?;

        let zone = DropZone {
            id: 0,
            name: data.name,
            code: data.code.to_uppercase(),
            address: data.address,
            city: data.city,
            country: data.country,
            timezone: data.timezone,
            status: data.status.unwrap_or_default(),
            active_users: 0,
            upcoming_events: 0,
            created_at: Utc::now(),
        };

        let created = self.storage.insert_drop_zone(zone).await?;
        info!(drop_zone_id = created.id, code = %created.code, "Drop zone created");
        Ok(created)
    }

    pub async fn update(&self, id: i32, patch: DropZoneUpdate) -> DomainResult<DropZone> {
        let mut zone = self.get(id).await?;

        if let Some(name) = patch.name {
            zone.name = name;
        }
        if let Some(code) = patch.code {
            zone.code = code.to_uppercase();
        }
        if let Some(address) = patch.address {
            zone.address = address;
        }
        if let Some(city) = patch.city {
            zone.city = city;
        }
        if let Some(country) = patch.country {
            zone.country = country;
        }
        if let Some(timezone) = patch.timezone {
            zone.timezone = timezone;
        }
        if let Some(status) = patch.status {
            zone.status = status;
        }

        validate_fields(&zone.name, &zone.code, &zone.address, &zone.city)?;
        self.storage.update_drop_zone(zone).await
    }

    /// Delete a drop zone. Refused while the zone still has active
    /// users or upcoming events (checked against the live records,
    /// not the cached counters).
    pub async fn delete(&self, id: i32) -> DomainResult<()> {
        let zone = self.get(id).await?;
        if zone.active_users > 0 || zone.upcoming_events > 0 {
            return Err(DomainError::Conflict(format!(
                "drop zone {} has {} active user(s) and {} upcoming event(s)",
                zone.name, zone.active_users, zone.upcoming_events
            )));
        }
        self.storage.delete_drop_zone(id).await?;
        info!(drop_zone_id = id, name = %zone.name, "Drop zone deleted");
        Ok(())
    }

    async fn fill_counters(&self, zone: &mut DropZone) -> DomainResult<()> {
        let users = self.storage.users_by_drop_zone(&zone.name).await?;
        zone.active_users = users.iter().filter(|u| u.is_active()).count() as i32;

        let now = Utc::now();
        let events = self.storage.events_by_drop_zone(zone.id).await?;
        zone.upcoming_events = events.iter().filter(|e| e.is_upcoming(now)).count() as i32;
        Ok(())
    }
}

fn validate_fields(name: &str, code: &str, address: &str, city: &str) -> DomainResult<()> {
    require("name", name)?;
    require("code", code)?;
    require("address", address)?;
    require("city", city)?;
    let code_len = code.chars().count();
    if !(3..=4).contains(&code_len) {
        return Err(DomainError::validation(
            "drop zone code must be 3-4 characters",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{InMemoryStorage, LatencyProfile};

    fn service() -> DropZoneService {
        let storage = Arc::new(InMemoryStorage::seeded(LatencyProfile::none()).unwrap());
        DropZoneService::new(storage)
    }

    fn new_zone(code: &str) -> NewDropZone {
        NewDropZone {
            name: "Test Field".into(),
            code: code.to_string(),
            address: "1 Runway".into(),
            city: "Testville".into(),
            country: "United States".into(),
            timezone: "America/Chicago".into(),
            status: None,
        }
    }

    #[tokio::test]
    async fn code_length_is_bounded() {
        let svc = service();

        assert!(matches!(
            svc.create(new_zone("AB")).await.unwrap_err(),
            DomainError::Validation(_)
        ));
        assert!(matches!(
            svc.create(new_zone("ABCDE")).await.unwrap_err(),
            DomainError::Validation(_)
        ));
        assert!(svc.create(new_zone("ABC")).await.is_ok());
    }

    #[tokio::test]
    async fn code_is_stored_uppercase() {
        let svc = service();
        let zone = svc.create(new_zone("abcd")).await.unwrap();
        assert_eq!(zone.code, "ABCD");
    }

    #[tokio::test]
    async fn new_zones_default_to_pending() {
        let svc = service();
        let zone = svc.create(new_zone("TST")).await.unwrap();
        assert_eq!(zone.status, DropZoneStatus::Pending);
    }

    #[tokio::test]
    async fn counters_are_recomputed_on_read() {
        let svc = service();
        // Skydive North: seeded with 4 active users (Jake is suspended)
        let zone = svc.get(1).await.unwrap();
        assert_eq!(zone.active_users, 4);
    }

    #[tokio::test]
    async fn zones_with_users_or_events_resist_deletion() {
        let svc = service();
        assert!(matches!(
            svc.delete(1).await.unwrap_err(),
            DomainError::Conflict(_)
        ));
    }

    #[tokio::test]
    async fn empty_zone_deletes_cleanly() {
        let svc = service();
        let zone = svc.create(new_zone("TST")).await.unwrap();
        svc.delete(zone.id).await.unwrap();
        assert!(matches!(
            svc.get(zone.id).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }
}
