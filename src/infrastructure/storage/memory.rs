//! In-memory storage implementation
//!
//! Backs the whole service with dashmap collections seeded from the
//! embedded JSON fixtures. Every call simulates network latency so
//! consumers exercise the same timing behavior a remote backend would
//! give them.

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rand::Rng;
use tokio::sync::RwLock;

use super::Storage;
use crate::domain::{
    Calculation, DomainError, DomainResult, DropZone, Event, Role, ShiftStatus, User, WorkShift,
};

const USERS_FIXTURE: &str = include_str!("fixtures/users.json");
const ROLES_FIXTURE: &str = include_str!("fixtures/roles.json");
const DROP_ZONES_FIXTURE: &str = include_str!("fixtures/drop_zones.json");
const EVENTS_FIXTURE: &str = include_str!("fixtures/events.json");
const WORK_SHIFTS_FIXTURE: &str = include_str!("fixtures/work_shifts.json");
const CALCULATIONS_FIXTURE: &str = include_str!("fixtures/calculations.json");

/// Most-recent calculations kept in the log
const CALCULATION_CAP: usize = 50;

/// Simulated latency band applied to every storage call.
#[derive(Debug, Clone)]
pub struct LatencyProfile {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl LatencyProfile {
    /// No artificial delay (tests)
    pub fn none() -> Self {
        Self { min_ms: 0, max_ms: 0 }
    }

    /// The 200-400ms band the mock backend historically used
    pub fn mock_backend() -> Self {
        Self {
            min_ms: 200,
            max_ms: 400,
        }
    }

    async fn simulate(&self) {
        if self.max_ms == 0 {
            return;
        }
        let ms = if self.min_ms >= self.max_ms {
            self.max_ms
        } else {
            rand::thread_rng().gen_range(self.min_ms..=self.max_ms)
        };
        tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
    }
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self::mock_backend()
    }
}

/// In-memory storage for the single-process deployment
pub struct InMemoryStorage {
    users: DashMap<i32, User>,
    roles: DashMap<i32, Role>,
    drop_zones: DashMap<i32, DropZone>,
    events: DashMap<i32, Event>,
    work_shifts: DashMap<i32, WorkShift>,
    calculations: RwLock<Vec<Calculation>>,
    user_counter: AtomicI32,
    role_counter: AtomicI32,
    drop_zone_counter: AtomicI32,
    event_counter: AtomicI32,
    work_shift_counter: AtomicI32,
    calculation_counter: AtomicI32,
    latency: LatencyProfile,
}

impl InMemoryStorage {
    pub fn new(latency: LatencyProfile) -> Self {
        Self {
            users: DashMap::new(),
            roles: DashMap::new(),
            drop_zones: DashMap::new(),
            events: DashMap::new(),
            work_shifts: DashMap::new(),
            calculations: RwLock::new(Vec::new()),
            user_counter: AtomicI32::new(1),
            role_counter: AtomicI32::new(1),
            drop_zone_counter: AtomicI32::new(1),
            event_counter: AtomicI32::new(1),
            work_shift_counter: AtomicI32::new(1),
            calculation_counter: AtomicI32::new(1),
            latency,
        }
    }

    /// Build a storage pre-populated from the embedded JSON fixtures.
    pub fn seeded(latency: LatencyProfile) -> DomainResult<Self> {
        let storage = Self::new(latency);

        let users: Vec<User> = parse_fixture(USERS_FIXTURE, "users")?;
        let roles: Vec<Role> = parse_fixture(ROLES_FIXTURE, "roles")?;
        let drop_zones: Vec<DropZone> = parse_fixture(DROP_ZONES_FIXTURE, "drop_zones")?;
        let events: Vec<Event> = parse_fixture(EVENTS_FIXTURE, "events")?;
        let shifts: Vec<WorkShift> = parse_fixture(WORK_SHIFTS_FIXTURE, "work_shifts")?;
        let calculations: Vec<Calculation> = parse_fixture(CALCULATIONS_FIXTURE, "calculations")?;

        prime_counter(&storage.user_counter, users.iter().map(|u| u.id));
        prime_counter(&storage.role_counter, roles.iter().map(|r| r.id));
        prime_counter(&storage.drop_zone_counter, drop_zones.iter().map(|d| d.id));
        prime_counter(&storage.event_counter, events.iter().map(|e| e.id));
        prime_counter(&storage.work_shift_counter, shifts.iter().map(|s| s.id));
        prime_counter(
            &storage.calculation_counter,
            calculations.iter().map(|c| c.id),
        );

        for user in users {
            storage.users.insert(user.id, user);
        }
        for role in roles {
            storage.roles.insert(role.id, role);
        }
        for drop_zone in drop_zones {
            storage.drop_zones.insert(drop_zone.id, drop_zone);
        }
        for event in events {
            storage.events.insert(event.id, event);
        }
        for shift in shifts {
            storage.work_shifts.insert(shift.id, shift);
        }
        if let Ok(mut log) = storage.calculations.try_write() {
            *log = calculations;
        }

        Ok(storage)
    }
}

fn parse_fixture<T: serde::de::DeserializeOwned>(
    json: &'static str,
    name: &'static str,
) -> DomainResult<Vec<T>> {
    serde_json::from_str(json)
        .map_err(|e| DomainError::Storage(format!("invalid {} fixture: {}", name, e)))
}

fn prime_counter(counter: &AtomicI32, ids: impl Iterator<Item = i32>) {
    let next = ids.max().unwrap_or(0) + 1;
    counter.store(next, Ordering::SeqCst);
}

fn sorted_by_id<T>(mut items: Vec<T>, id: impl Fn(&T) -> i32) -> Vec<T> {
    items.sort_by_key(id);
    items
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn list_users(&self) -> DomainResult<Vec<User>> {
        self.latency.simulate().await;
        Ok(sorted_by_id(
            self.users.iter().map(|e| e.value().clone()).collect(),
            |u| u.id,
        ))
    }

    async fn get_user(&self, id: i32) -> DomainResult<Option<User>> {
        self.latency.simulate().await;
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn insert_user(&self, mut user: User) -> DomainResult<User> {
        self.latency.simulate().await;
        user.id = self.user_counter.fetch_add(1, Ordering::SeqCst);
        user.created_at = Utc::now();
        user.updated_at = user.created_at;
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, mut user: User) -> DomainResult<User> {
        self.latency.simulate().await;
        let existing = self
            .users
            .get(&user.id)
            .map(|u| u.clone())
            .ok_or(DomainError::not_found("user", user.id))?;
        user.created_at = existing.created_at;
        user.updated_at = Utc::now();
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete_user(&self, id: i32) -> DomainResult<()> {
        self.latency.simulate().await;
        self.users
            .remove(&id)
            .ok_or(DomainError::not_found("user", id))?;
        Ok(())
    }

    async fn users_by_drop_zone(&self, drop_zone: &str) -> DomainResult<Vec<User>> {
        self.latency.simulate().await;
        Ok(sorted_by_id(
            self.users
                .iter()
                .filter(|u| u.drop_zones.iter().any(|dz| dz == drop_zone))
                .map(|u| u.value().clone())
                .collect(),
            |u| u.id,
        ))
    }

    async fn users_by_role(&self, role: &str) -> DomainResult<Vec<User>> {
        self.latency.simulate().await;
        Ok(sorted_by_id(
            self.users
                .iter()
                .filter(|u| u.roles.iter().any(|r| r == role))
                .map(|u| u.value().clone())
                .collect(),
            |u| u.id,
        ))
    }

    async fn list_roles(&self) -> DomainResult<Vec<Role>> {
        self.latency.simulate().await;
        Ok(sorted_by_id(
            self.roles.iter().map(|e| e.value().clone()).collect(),
            |r| r.id,
        ))
    }

    async fn get_role(&self, id: i32) -> DomainResult<Option<Role>> {
        self.latency.simulate().await;
        Ok(self.roles.get(&id).map(|r| r.clone()))
    }

    async fn insert_role(&self, mut role: Role) -> DomainResult<Role> {
        self.latency.simulate().await;
        role.id = self.role_counter.fetch_add(1, Ordering::SeqCst);
        role.created_at = Utc::now();
        self.roles.insert(role.id, role.clone());
        Ok(role)
    }

    async fn update_role(&self, mut role: Role) -> DomainResult<Role> {
        self.latency.simulate().await;
        let existing = self
            .roles
            .get(&role.id)
            .map(|r| r.clone())
            .ok_or(DomainError::not_found("role", role.id))?;
        role.created_at = existing.created_at;
        self.roles.insert(role.id, role.clone());
        Ok(role)
    }

    async fn delete_role(&self, id: i32) -> DomainResult<()> {
        self.latency.simulate().await;
        self.roles
            .remove(&id)
            .ok_or(DomainError::not_found("role", id))?;
        Ok(())
    }

    async fn list_drop_zones(&self) -> DomainResult<Vec<DropZone>> {
        self.latency.simulate().await;
        Ok(sorted_by_id(
            self.drop_zones.iter().map(|e| e.value().clone()).collect(),
            |d| d.id,
        ))
    }

    async fn get_drop_zone(&self, id: i32) -> DomainResult<Option<DropZone>> {
        self.latency.simulate().await;
        Ok(self.drop_zones.get(&id).map(|d| d.clone()))
    }

    async fn insert_drop_zone(&self, mut drop_zone: DropZone) -> DomainResult<DropZone> {
        self.latency.simulate().await;
        drop_zone.id = self.drop_zone_counter.fetch_add(1, Ordering::SeqCst);
        drop_zone.created_at = Utc::now();
        self.drop_zones.insert(drop_zone.id, drop_zone.clone());
        Ok(drop_zone)
    }

    async fn update_drop_zone(&self, mut drop_zone: DropZone) -> DomainResult<DropZone> {
        self.latency.simulate().await;
        let existing = self
            .drop_zones
            .get(&drop_zone.id)
            .map(|d| d.clone())
            .ok_or(DomainError::not_found("drop zone", drop_zone.id))?;
        drop_zone.created_at = existing.created_at;
        self.drop_zones.insert(drop_zone.id, drop_zone.clone());
        Ok(drop_zone)
    }

    async fn delete_drop_zone(&self, id: i32) -> DomainResult<()> {
        self.latency.simulate().await;
        self.drop_zones
            .remove(&id)
            .ok_or(DomainError::not_found("drop zone", id))?;
        Ok(())
    }

    async fn active_drop_zones(&self) -> DomainResult<Vec<DropZone>> {
        self.latency.simulate().await;
        Ok(sorted_by_id(
            self.drop_zones
                .iter()
                .filter(|d| d.is_active())
                .map(|d| d.value().clone())
                .collect(),
            |d| d.id,
        ))
    }

    async fn list_events(&self) -> DomainResult<Vec<Event>> {
        self.latency.simulate().await;
        Ok(sorted_by_id(
            self.events.iter().map(|e| e.value().clone()).collect(),
            |e| e.id,
        ))
    }

    async fn get_event(&self, id: i32) -> DomainResult<Option<Event>> {
        self.latency.simulate().await;
        Ok(self.events.get(&id).map(|e| e.clone()))
    }

    async fn insert_event(&self, mut event: Event) -> DomainResult<Event> {
        self.latency.simulate().await;
        event.id = self.event_counter.fetch_add(1, Ordering::SeqCst);
        event.created_at = Utc::now();
        event.updated_at = event.created_at;
        self.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn update_event(&self, mut event: Event) -> DomainResult<Event> {
        self.latency.simulate().await;
        let existing = self
            .events
            .get(&event.id)
            .map(|e| e.clone())
            .ok_or(DomainError::not_found("event", event.id))?;
        event.created_at = existing.created_at;
        event.updated_at = Utc::now();
        self.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn delete_event(&self, id: i32) -> DomainResult<()> {
        self.latency.simulate().await;
        self.events
            .remove(&id)
            .ok_or(DomainError::not_found("event", id))?;
        Ok(())
    }

    async fn events_by_drop_zone(&self, drop_zone_id: i32) -> DomainResult<Vec<Event>> {
        self.latency.simulate().await;
        Ok(sorted_by_id(
            self.events
                .iter()
                .filter(|e| e.drop_zone_id == drop_zone_id)
                .map(|e| e.value().clone())
                .collect(),
            |e| e.id,
        ))
    }

    async fn events_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Event>> {
        self.latency.simulate().await;
        let mut events: Vec<Event> = self
            .events
            .iter()
            .filter(|e| e.start_time >= start && e.start_time <= end)
            .map(|e| e.value().clone())
            .collect();
        events.sort_by_key(|e| e.start_time);
        Ok(events)
    }

    async fn upcoming_events(&self, limit: usize) -> DomainResult<Vec<Event>> {
        self.latency.simulate().await;
        let now = Utc::now();
        let mut events: Vec<Event> = self
            .events
            .iter()
            .filter(|e| e.is_upcoming(now))
            .map(|e| e.value().clone())
            .collect();
        events.sort_by_key(|e| e.start_time);
        events.truncate(limit);
        Ok(events)
    }

    async fn list_work_shifts(&self) -> DomainResult<Vec<WorkShift>> {
        self.latency.simulate().await;
        Ok(sorted_by_id(
            self.work_shifts.iter().map(|e| e.value().clone()).collect(),
            |s| s.id,
        ))
    }

    async fn get_work_shift(&self, id: i32) -> DomainResult<Option<WorkShift>> {
        self.latency.simulate().await;
        Ok(self.work_shifts.get(&id).map(|s| s.clone()))
    }

    async fn insert_work_shift(&self, mut shift: WorkShift) -> DomainResult<WorkShift> {
        self.latency.simulate().await;
        shift.id = self.work_shift_counter.fetch_add(1, Ordering::SeqCst);
        shift.created_at = Utc::now();
        shift.updated_at = shift.created_at;
        self.work_shifts.insert(shift.id, shift.clone());
        Ok(shift)
    }

    async fn update_work_shift(&self, mut shift: WorkShift) -> DomainResult<WorkShift> {
        self.latency.simulate().await;
        let existing = self
            .work_shifts
            .get(&shift.id)
            .map(|s| s.clone())
            .ok_or(DomainError::not_found("work shift", shift.id))?;
        shift.created_at = existing.created_at;
        shift.updated_at = Utc::now();
        self.work_shifts.insert(shift.id, shift.clone());
        Ok(shift)
    }

    async fn delete_work_shift(&self, id: i32) -> DomainResult<()> {
        self.latency.simulate().await;
        self.work_shifts
            .remove(&id)
            .ok_or(DomainError::not_found("work shift", id))?;
        Ok(())
    }

    async fn shifts_by_drop_zone(&self, drop_zone_id: i32) -> DomainResult<Vec<WorkShift>> {
        self.latency.simulate().await;
        Ok(sorted_by_id(
            self.work_shifts
                .iter()
                .filter(|s| s.drop_zone_id == drop_zone_id)
                .map(|s| s.value().clone())
                .collect(),
            |s| s.id,
        ))
    }

    async fn shifts_by_user(&self, user_id: i32) -> DomainResult<Vec<WorkShift>> {
        self.latency.simulate().await;
        Ok(sorted_by_id(
            self.work_shifts
                .iter()
                .filter(|s| s.assigned_user_id == Some(user_id))
                .map(|s| s.value().clone())
                .collect(),
            |s| s.id,
        ))
    }

    async fn shifts_by_status(&self, status: ShiftStatus) -> DomainResult<Vec<WorkShift>> {
        self.latency.simulate().await;
        Ok(sorted_by_id(
            self.work_shifts
                .iter()
                .filter(|s| s.status == status)
                .map(|s| s.value().clone())
                .collect(),
            |s| s.id,
        ))
    }

    async fn upcoming_shifts(&self, limit: usize) -> DomainResult<Vec<WorkShift>> {
        self.latency.simulate().await;
        let now = Utc::now();
        let mut shifts: Vec<WorkShift> = self
            .work_shifts
            .iter()
            .filter(|s| s.is_upcoming(now))
            .map(|s| s.value().clone())
            .collect();
        shifts.sort_by_key(|s| s.start_time);
        shifts.truncate(limit);
        Ok(shifts)
    }

    async fn list_calculations(&self) -> DomainResult<Vec<Calculation>> {
        self.latency.simulate().await;
        Ok(self.calculations.read().await.clone())
    }

    async fn insert_calculation(&self, mut calculation: Calculation) -> DomainResult<Calculation> {
        self.latency.simulate().await;
        calculation.id = self.calculation_counter.fetch_add(1, Ordering::SeqCst);
        calculation.timestamp = Utc::now();
        let mut log = self.calculations.write().await;
        log.insert(0, calculation.clone());
        log.truncate(CALCULATION_CAP);
        Ok(calculation)
    }

    async fn recent_calculations(&self, limit: usize) -> DomainResult<Vec<Calculation>> {
        self.latency.simulate().await;
        let log = self.calculations.read().await;
        Ok(log.iter().take(limit).cloned().collect())
    }

    async fn clear_calculations(&self) -> DomainResult<()> {
        self.latency.simulate().await;
        self.calculations.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserStatus;

    fn blank_user(first_name: &str) -> User {
        User {
            id: 0,
            first_name: first_name.to_string(),
            last_name: "Test".into(),
            email: format!("{}@skyops.test", first_name.to_lowercase()),
            phone: String::new(),
            status: UserStatus::Active,
            roles: vec!["Worker".into()],
            drop_zones: vec!["Skydive North".into()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn blank_calculation(result: f64) -> Calculation {
        Calculation {
            id: 0,
            first_operand: result,
            operator: "+".into(),
            second_operand: 0.0,
            result,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids_from_one() {
        let storage = InMemoryStorage::new(LatencyProfile::none());

        let a = storage.insert_user(blank_user("Ann")).await.unwrap();
        let b = storage.insert_user(blank_user("Ben")).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let storage = InMemoryStorage::new(LatencyProfile::none());

        let a = storage.insert_user(blank_user("Ann")).await.unwrap();
        storage.delete_user(a.id).await.unwrap();
        let b = storage.insert_user(blank_user("Ben")).await.unwrap();
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn update_unknown_user_is_not_found() {
        let storage = InMemoryStorage::new(LatencyProfile::none());

        let mut user = blank_user("Ann");
        user.id = 42;
        let err = storage.update_user(user).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn seeded_counters_continue_after_fixture_ids() {
        let storage = InMemoryStorage::seeded(LatencyProfile::none()).unwrap();

        let existing = storage.list_users().await.unwrap();
        let max_id = existing.iter().map(|u| u.id).max().unwrap();
        let created = storage.insert_user(blank_user("New")).await.unwrap();
        assert_eq!(created.id, max_id + 1);
    }

    #[tokio::test]
    async fn seeded_fixtures_are_consistent() {
        let storage = InMemoryStorage::seeded(LatencyProfile::none()).unwrap();

        let roles = storage.list_roles().await.unwrap();
        let users = storage.list_users().await.unwrap();
        let drop_zones = storage.list_drop_zones().await.unwrap();

        assert!(!roles.is_empty());
        assert!(!drop_zones.is_empty());
        // Every role and drop zone a seeded user references exists
        for user in &users {
            for role_name in &user.roles {
                assert!(
                    roles.iter().any(|r| &r.name == role_name),
                    "user {} references unknown role {}",
                    user.id,
                    role_name
                );
            }
            for dz_name in &user.drop_zones {
                assert!(
                    drop_zones.iter().any(|d| &d.name == dz_name),
                    "user {} references unknown drop zone {}",
                    user.id,
                    dz_name
                );
            }
        }
    }

    #[tokio::test]
    async fn events_in_range_is_inclusive_and_sorted() {
        let storage = InMemoryStorage::new(LatencyProfile::none());
        let base = Utc::now();

        for offset in [3i64, 1, 2] {
            let event = Event {
                id: 0,
                title: format!("Event {}", offset),
                event_type: "boogie".into(),
                start_time: base + chrono::Duration::days(offset),
                end_time: None,
                drop_zone_id: 1,
                description: String::new(),
                required_roles: vec![],
                created_at: base,
                updated_at: base,
            };
            storage.insert_event(event).await.unwrap();
        }

        let hits = storage
            .events_in_range(base + chrono::Duration::days(1), base + chrono::Duration::days(2))
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits[0].start_time <= hits[1].start_time);
    }

    #[tokio::test]
    async fn calculation_log_caps_at_fifty_most_recent_first() {
        let storage = InMemoryStorage::new(LatencyProfile::none());

        for i in 0..60 {
            storage
                .insert_calculation(blank_calculation(f64::from(i)))
                .await
                .unwrap();
        }

        let log = storage.list_calculations().await.unwrap();
        assert_eq!(log.len(), CALCULATION_CAP);
        // Newest first
        assert_eq!(log[0].result, 59.0);
        assert_eq!(log.last().unwrap().result, 10.0);

        let recent = storage.recent_calculations(10).await.unwrap();
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].result, 59.0);
    }
}
