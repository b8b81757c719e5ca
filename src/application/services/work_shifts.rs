//! Work calendar business logic service

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::require;
use crate::domain::{DomainError, DomainResult, ShiftStatus, WorkShift};
use crate::infrastructure::Storage;

/// Fields for creating a work shift
#[derive(Debug, Clone)]
pub struct NewWorkShift {
    pub title: String,
    pub required_role: String,
    pub assigned_user_id: Option<i32>,
    pub drop_zone_id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: Option<ShiftStatus>,
}

/// Partial update; `None` fields keep their current value
#[derive(Debug, Clone, Default)]
pub struct WorkShiftUpdate {
    pub title: Option<String>,
    pub required_role: Option<String>,
    pub assigned_user_id: Option<Option<i32>>,
    pub drop_zone_id: Option<i32>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<Option<DateTime<Utc>>>,
    pub status: Option<ShiftStatus>,
}

/// Service for the work calendar
pub struct WorkShiftService {
    storage: Arc<dyn Storage>,
}

impl WorkShiftService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn list(&self) -> DomainResult<Vec<WorkShift>> {
        self.storage.list_work_shifts().await
    }

    pub async fn get(&self, id: i32) -> DomainResult<WorkShift> {
        self.storage
            .get_work_shift(id)
            .await?
            .ok_or(DomainError::not_found("work shift", id))
    }

    pub async fn create(&self, data: NewWorkShift) -> DomainResult<WorkShift> {
        require("title", &data.title)?;
        require("required role", &data.required_role)?;
        self.ensure_drop_zone(data.drop_zone_id).await?;
        if let Some(user_id) = data.assigned_user_id {
            self.ensure_user(user_id).await?;
        }

        let now = Utc::now();
        let shift = WorkShift {
            id: 0,
            title: data.title,
            required_role: data.required_role,
            assigned_user_id: data.assigned_user_id,
            drop_zone_id: data.drop_zone_id,
            start_time: data.start_time,
            end_time: data.end_time,
            status: data.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        let created = self.storage.insert_work_shift(shift).await?;
        info!(shift_id = created.id, title = %created.title, "Work shift created");
        Ok(created)
    }

    pub async fn update(&self, id: i32, patch: WorkShiftUpdate) -> DomainResult<WorkShift> {
        let mut shift = self.get(id).await?;

        if let Some(title) = patch.title {
            shift.title = title;
        }
        if let Some(required_role) = patch.required_role {
            shift.required_role = required_role;
        }
        if let Some(assigned_user_id) = patch.assigned_user_id {
            if let Some(user_id) = assigned_user_id {
                self.ensure_user(user_id).await?;
            }
            shift.assigned_user_id = assigned_user_id;
        }
        if let Some(drop_zone_id) = patch.drop_zone_id {
            self.ensure_drop_zone(drop_zone_id).await?;
            shift.drop_zone_id = drop_zone_id;
        }
        if let Some(start_time) = patch.start_time {
            shift.start_time = start_time;
        }
        if let Some(end_time) = patch.end_time {
            shift.end_time = end_time;
        }
        if let Some(status) = patch.status {
            shift.status = status;
        }

        require("title", &shift.title)?;
        require("required role", &shift.required_role)?;

        self.storage.update_work_shift(shift).await
    }

    pub async fn delete(&self, id: i32) -> DomainResult<()> {
        self.storage.delete_work_shift(id).await?;
        info!(shift_id = id, "Work shift deleted");
        Ok(())
    }

    pub async fn by_drop_zone(&self, drop_zone_id: i32) -> DomainResult<Vec<WorkShift>> {
        self.storage.shifts_by_drop_zone(drop_zone_id).await
    }

    pub async fn by_user(&self, user_id: i32) -> DomainResult<Vec<WorkShift>> {
        self.storage.shifts_by_user(user_id).await
    }

    pub async fn by_status(&self, status: ShiftStatus) -> DomainResult<Vec<WorkShift>> {
        self.storage.shifts_by_status(status).await
    }

    pub async fn upcoming(&self, limit: usize) -> DomainResult<Vec<WorkShift>> {
        self.storage.upcoming_shifts(limit).await
    }

    async fn ensure_drop_zone(&self, id: i32) -> DomainResult<()> {
        self.storage
            .get_drop_zone(id)
            .await?
            .map(|_| ())
            .ok_or(DomainError::not_found("drop zone", id))
    }

    async fn ensure_user(&self, id: i32) -> DomainResult<()> {
        self.storage
            .get_user(id)
            .await?
            .map(|_| ())
            .ok_or(DomainError::not_found("user", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crate::infrastructure::{InMemoryStorage, LatencyProfile};

    fn service() -> WorkShiftService {
        let storage = Arc::new(InMemoryStorage::seeded(LatencyProfile::none()).unwrap());
        WorkShiftService::new(storage)
    }

    fn new_shift() -> NewWorkShift {
        NewWorkShift {
            title: "Gear Check Desk".into(),
            required_role: "Worker".into(),
            assigned_user_id: None,
            drop_zone_id: 1,
            start_time: Utc::now() + Duration::days(3),
            end_time: None,
            status: None,
        }
    }

    #[tokio::test]
    async fn create_defaults_to_pending() {
        let svc = service();
        let shift = svc.create(new_shift()).await.unwrap();
        assert_eq!(shift.status, ShiftStatus::Pending);
        assert!(shift.assigned_user_id.is_none());
    }

    #[tokio::test]
    async fn assigned_user_must_exist() {
        let svc = service();
        let mut data = new_shift();
        data.assigned_user_id = Some(999);
        assert!(matches!(
            svc.create(data).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn update_can_unassign_user() {
        let svc = service();
        let mut data = new_shift();
        data.assigned_user_id = Some(3);
        let shift = svc.create(data).await.unwrap();

        let patch = WorkShiftUpdate {
            assigned_user_id: Some(None),
            status: Some(ShiftStatus::Cancelled),
            ..WorkShiftUpdate::default()
        };
        let updated = svc.update(shift.id, patch).await.unwrap();
        assert!(updated.assigned_user_id.is_none());
        assert_eq!(updated.status, ShiftStatus::Cancelled);
    }

    #[tokio::test]
    async fn status_filter_matches() {
        let svc = service();
        let confirmed = svc.by_status(ShiftStatus::Confirmed).await.unwrap();
        assert!(confirmed.iter().all(|s| s.status == ShiftStatus::Confirmed));
        assert!(!confirmed.is_empty());
    }
}
