//! Storage trait definitions

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    Calculation, DomainResult, DropZone, Event, Role, ShiftStatus, User, WorkShift,
};

/// Storage trait for all entity collections.
///
/// Reads return clones of the stored records. Inserts assign the next
/// integer id and the creation timestamps; updates refuse unknown ids;
/// deletes are unconditional — business rules (system-role guards,
/// counter checks) belong to the application services.
#[async_trait]
pub trait Storage: Send + Sync {
    // User operations
    async fn list_users(&self) -> DomainResult<Vec<User>>;
    async fn get_user(&self, id: i32) -> DomainResult<Option<User>>;
    async fn insert_user(&self, user: User) -> DomainResult<User>;
    async fn update_user(&self, user: User) -> DomainResult<User>;
    async fn delete_user(&self, id: i32) -> DomainResult<()>;
    async fn users_by_drop_zone(&self, drop_zone: &str) -> DomainResult<Vec<User>>;
    async fn users_by_role(&self, role: &str) -> DomainResult<Vec<User>>;

    // Role operations
    async fn list_roles(&self) -> DomainResult<Vec<Role>>;
    async fn get_role(&self, id: i32) -> DomainResult<Option<Role>>;
    async fn insert_role(&self, role: Role) -> DomainResult<Role>;
    async fn update_role(&self, role: Role) -> DomainResult<Role>;
    async fn delete_role(&self, id: i32) -> DomainResult<()>;

    // Drop zone operations
    async fn list_drop_zones(&self) -> DomainResult<Vec<DropZone>>;
    async fn get_drop_zone(&self, id: i32) -> DomainResult<Option<DropZone>>;
    async fn insert_drop_zone(&self, drop_zone: DropZone) -> DomainResult<DropZone>;
    async fn update_drop_zone(&self, drop_zone: DropZone) -> DomainResult<DropZone>;
    async fn delete_drop_zone(&self, id: i32) -> DomainResult<()>;
    async fn active_drop_zones(&self) -> DomainResult<Vec<DropZone>>;

    // Event operations
    async fn list_events(&self) -> DomainResult<Vec<Event>>;
    async fn get_event(&self, id: i32) -> DomainResult<Option<Event>>;
    async fn insert_event(&self, event: Event) -> DomainResult<Event>;
    async fn update_event(&self, event: Event) -> DomainResult<Event>;
    async fn delete_event(&self, id: i32) -> DomainResult<()>;
    async fn events_by_drop_zone(&self, drop_zone_id: i32) -> DomainResult<Vec<Event>>;
    async fn events_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Event>>;
    async fn upcoming_events(&self, limit: usize) -> DomainResult<Vec<Event>>;

    // Work shift operations
    async fn list_work_shifts(&self) -> DomainResult<Vec<WorkShift>>;
    async fn get_work_shift(&self, id: i32) -> DomainResult<Option<WorkShift>>;
    async fn insert_work_shift(&self, shift: WorkShift) -> DomainResult<WorkShift>;
    async fn update_work_shift(&self, shift: WorkShift) -> DomainResult<WorkShift>;
    async fn delete_work_shift(&self, id: i32) -> DomainResult<()>;
    async fn shifts_by_drop_zone(&self, drop_zone_id: i32) -> DomainResult<Vec<WorkShift>>;
    async fn shifts_by_user(&self, user_id: i32) -> DomainResult<Vec<WorkShift>>;
    async fn shifts_by_status(&self, status: ShiftStatus) -> DomainResult<Vec<WorkShift>>;
    async fn upcoming_shifts(&self, limit: usize) -> DomainResult<Vec<WorkShift>>;

    // Calculation log (append-only, capped, most-recent-first)
    async fn list_calculations(&self) -> DomainResult<Vec<Calculation>>;
    async fn insert_calculation(&self, calculation: Calculation) -> DomainResult<Calculation>;
    async fn recent_calculations(&self, limit: usize) -> DomainResult<Vec<Calculation>>;
    async fn clear_calculations(&self) -> DomainResult<()>;
}
