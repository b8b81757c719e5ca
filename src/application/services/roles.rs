//! Role business logic service

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::require;
use crate::domain::{DomainError, DomainResult, Role, User};
use crate::infrastructure::Storage;

/// Fields for creating a custom role
#[derive(Debug, Clone)]
pub struct NewRole {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub level: Option<i32>,
    pub permissions: Vec<String>,
}

/// Partial update; `None` fields keep their current value
#[derive(Debug, Clone, Default)]
pub struct RoleUpdate {
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub level: Option<i32>,
    pub permissions: Option<Vec<String>>,
}

/// Service for role management.
///
/// `user_count` is never trusted from storage: every read recomputes
/// it from the user records, so it cannot drift when users are
/// created, edited, or deleted through any path.
pub struct RoleService {
    storage: Arc<dyn Storage>,
}

impl RoleService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn list(&self) -> DomainResult<Vec<Role>> {
        let users = self.storage.list_users().await?;
        let mut roles = self.storage.list_roles().await?;
        for role in &mut roles {
            role.user_count = count_holders(&users, &role.name);
        }
        Ok(roles)
    }

    pub async fn get(&self, id: i32) -> DomainResult<Role> {
        let mut role = self
            .storage
            .get_role(id)
            .await?
            .ok_or(DomainError::not_found("role", id))?;
        let users = self.storage.list_users().await?;
        role.user_count = count_holders(&users, &role.name);
        Ok(role)
    }

    pub async fn create(&self, data: NewRole) -> DomainResult<Role> {
        require("name", &data.name)?;
        require("display name", &data.display_name)?;
        if data.permissions.is_empty() {
            return Err(DomainError::validation(
                "at least one permission is required",
            ));
        }
        let existing = self.storage.list_roles().await?;
        if existing.iter().any(|r| r.name == data.name) {
            return Err(DomainError::Conflict(format!("role {}", data.name)));
        }

        let role = Role {
            id: 0,
            name: data.name,
            display_name: data.display_name,
            description: data.description,
            level: data.level.unwrap_or(1),
            permissions: data.permissions,
            is_system_role: false,
            user_count: 0,
            created_at: Utc::now(),
        };

        let created = self.storage.insert_role(role).await?;
        info!(role_id = created.id, name = %created.name, "Role created");
        Ok(created)
    }

    pub async fn update(&self, id: i32, patch: RoleUpdate) -> DomainResult<Role> {
        let mut role = self.get(id).await?;

        if let Some(display_name) = patch.display_name {
            role.display_name = display_name;
        }
        if let Some(description) = patch.description {
            role.description = description;
        }
        if let Some(level) = patch.level {
            role.level = level;
        }
        if let Some(permissions) = patch.permissions {
            if permissions.is_empty() {
                return Err(DomainError::validation(
                    "at least one permission is required",
                ));
            }
            role.permissions = permissions;
        }

        require("display name", &role.display_name)?;
        self.storage.update_role(role).await
    }

    /// Delete a role. System roles and roles still held by users are
    /// protected.
    pub async fn delete(&self, id: i32) -> DomainResult<()> {
        let role = self.get(id).await?;
        if role.is_system_role {
            return Err(DomainError::Forbidden(format!(
                "system role {} cannot be deleted",
                role.name
            )));
        }
        let holders = self.storage.users_by_role(&role.name).await?;
        if !holders.is_empty() {
            return Err(DomainError::Conflict(format!(
                "role {} is assigned to {} user(s)",
                role.name,
                holders.len()
            )));
        }
        self.storage.delete_role(id).await?;
        info!(role_id = id, name = %role.name, "Role deleted");
        Ok(())
    }
}

fn count_holders(users: &[User], role_name: &str) -> i32 {
    users
        .iter()
        .filter(|u| u.roles.iter().any(|r| r == role_name))
        .count() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{InMemoryStorage, LatencyProfile};

    fn service() -> RoleService {
        let storage = Arc::new(InMemoryStorage::seeded(LatencyProfile::none()).unwrap());
        RoleService::new(storage)
    }

    fn new_role(name: &str) -> NewRole {
        NewRole {
            name: name.to_string(),
            display_name: name.to_string(),
            description: String::new(),
            level: Some(3),
            permissions: vec!["view_my_page".into()],
        }
    }

    #[tokio::test]
    async fn create_requires_a_permission() {
        let svc = service();
        let mut data = new_role("Packer");
        data.permissions.clear();

        assert!(matches!(
            svc.create(data).await.unwrap_err(),
            DomainError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn created_roles_are_never_system_roles() {
        let svc = service();
        let role = svc.create(new_role("Packer")).await.unwrap();
        assert!(!role.is_system_role);
        assert_eq!(role.user_count, 0);
    }

    #[tokio::test]
    async fn duplicate_role_name_conflicts() {
        let svc = service();
        assert!(matches!(
            svc.create(new_role("Worker")).await.unwrap_err(),
            DomainError::Conflict(_)
        ));
    }

    #[tokio::test]
    async fn system_roles_cannot_be_deleted() {
        let svc = service();
        let roles = svc.list().await.unwrap();
        let system = roles.iter().find(|r| r.is_system_role).unwrap();

        assert!(matches!(
            svc.delete(system.id).await.unwrap_err(),
            DomainError::Forbidden(_)
        ));
    }

    #[tokio::test]
    async fn held_roles_cannot_be_deleted() {
        let storage = Arc::new(InMemoryStorage::seeded(LatencyProfile::none()).unwrap());
        let svc = RoleService::new(storage.clone());

        let role = svc.create(new_role("Packer")).await.unwrap();
        // Hand the role to a seeded user directly through storage
        let mut user = storage.get_user(1).await.unwrap().unwrap();
        user.roles.push("Packer".into());
        storage.update_user(user).await.unwrap();

        assert!(matches!(
            svc.delete(role.id).await.unwrap_err(),
            DomainError::Conflict(_)
        ));
    }

    #[tokio::test]
    async fn unheld_custom_role_deletes_cleanly() {
        let svc = service();
        let role = svc.create(new_role("Packer")).await.unwrap();
        svc.delete(role.id).await.unwrap();
        assert!(matches!(
            svc.get(role.id).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn user_count_reflects_actual_holders() {
        let svc = service();
        let roles = svc.list().await.unwrap();
        let worker = roles.iter().find(|r| r.name == "Worker").unwrap();
        // Seeded fixture has two Worker users (Elena, Jake)
        assert_eq!(worker.user_count, 2);
    }
}
