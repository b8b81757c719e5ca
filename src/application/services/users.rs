//! User business logic service

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::require;
use crate::domain::{DomainError, DomainResult, User, UserStatus};
use crate::infrastructure::Storage;

/// Fields for creating a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub status: UserStatus,
    pub roles: Vec<String>,
    pub drop_zones: Vec<String>,
}

/// Partial update; `None` fields keep their current value
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<UserStatus>,
    pub roles: Option<Vec<String>>,
    pub drop_zones: Option<Vec<String>>,
}

/// Service for user management
pub struct UserService {
    storage: Arc<dyn Storage>,
}

impl UserService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn list(&self) -> DomainResult<Vec<User>> {
        self.storage.list_users().await
    }

    pub async fn get(&self, id: i32) -> DomainResult<User> {
        self.storage
            .get_user(id)
            .await?
            .ok_or(DomainError::not_found("user", id))
    }

    pub async fn create(&self, data: NewUser) -> DomainResult<User> {
        validate_user_fields(&data.first_name, &data.last_name, &data.email)?;
        validate_assignments(&data.roles, &data.drop_zones)?;

        let now = Utc::now();
        let user = User {
            id: 0,
            first_name: data.first_name,
            last_name: data.last_name,
            email: data.email,
            phone: data.phone,
            status: data.status,
            roles: data.roles,
            drop_zones: data.drop_zones,
            created_at: now,
            updated_at: now,
        };

        let created = self.storage.insert_user(user).await?;
        info!(user_id = created.id, email = %created.email, "User created");
        Ok(created)
    }

    pub async fn update(&self, id: i32, patch: UserUpdate) -> DomainResult<User> {
        let mut user = self.get(id).await?;

        if let Some(first_name) = patch.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            user.last_name = last_name;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(phone) = patch.phone {
            user.phone = phone;
        }
        if let Some(status) = patch.status {
            user.status = status;
        }
        if let Some(roles) = patch.roles {
            user.roles = roles;
        }
        if let Some(drop_zones) = patch.drop_zones {
            user.drop_zones = drop_zones;
        }

        validate_user_fields(&user.first_name, &user.last_name, &user.email)?;
        validate_assignments(&user.roles, &user.drop_zones)?;

        self.storage.update_user(user).await
    }

    pub async fn delete(&self, id: i32) -> DomainResult<()> {
        self.storage.delete_user(id).await?;
        info!(user_id = id, "User deleted");
        Ok(())
    }

    pub async fn by_drop_zone(&self, drop_zone: &str) -> DomainResult<Vec<User>> {
        self.storage.users_by_drop_zone(drop_zone).await
    }

    pub async fn by_role(&self, role: &str) -> DomainResult<Vec<User>> {
        self.storage.users_by_role(role).await
    }

    /// Add a role to the user; a role already held is a no-op.
    pub async fn assign_role(&self, user_id: i32, role_name: &str) -> DomainResult<User> {
        let roles = self.storage.list_roles().await?;
        if !roles.iter().any(|r| r.name == role_name) {
            return Err(DomainError::validation(format!(
                "unknown role: {}",
                role_name
            )));
        }

        let mut user = self.get(user_id).await?;
        if user.roles.iter().any(|r| r == role_name) {
            return Ok(user);
        }
        user.roles.push(role_name.to_string());
        let updated = self.storage.update_user(user).await?;
        info!(user_id, role = role_name, "Role assigned");
        Ok(updated)
    }

    /// Remove a role from the user. Refused when it would leave the
    /// user with no roles at all.
    pub async fn remove_role(&self, user_id: i32, role_name: &str) -> DomainResult<User> {
        let mut user = self.get(user_id).await?;
        let before = user.roles.len();
        user.roles.retain(|r| r != role_name);
        if user.roles.len() == before {
            return Ok(user);
        }
        if user.roles.is_empty() {
            return Err(DomainError::validation(
                "user must keep at least one role".to_string(),
            ));
        }
        let updated = self.storage.update_user(user).await?;
        info!(user_id, role = role_name, "Role removed");
        Ok(updated)
    }
}

fn validate_user_fields(first_name: &str, last_name: &str, email: &str) -> DomainResult<()> {
    require("first name", first_name)?;
    require("last name", last_name)?;
    require("email", email)?;
    Ok(())
}

fn validate_assignments(roles: &[String], drop_zones: &[String]) -> DomainResult<()> {
    if roles.is_empty() {
        return Err(DomainError::validation("at least one role is required"));
    }
    if drop_zones.is_empty() {
        return Err(DomainError::validation(
            "at least one drop zone is required",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{InMemoryStorage, LatencyProfile};

    fn service() -> UserService {
        let storage = Arc::new(InMemoryStorage::seeded(LatencyProfile::none()).unwrap());
        UserService::new(storage)
    }

    fn new_user() -> NewUser {
        NewUser {
            first_name: "Dana".into(),
            last_name: "Frost".into(),
            email: "dana.frost@skyops.example".into(),
            phone: String::new(),
            status: UserStatus::Active,
            roles: vec!["Worker".into()],
            drop_zones: vec!["Skydive North".into()],
        }
    }

    #[tokio::test]
    async fn create_requires_identity_fields() {
        let svc = service();
        let mut data = new_user();
        data.email = "   ".into();

        let err = svc.create(data).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn create_requires_role_and_drop_zone() {
        let svc = service();

        let mut no_roles = new_user();
        no_roles.roles.clear();
        assert!(matches!(
            svc.create(no_roles).await.unwrap_err(),
            DomainError::Validation(_)
        ));

        let mut no_zones = new_user();
        no_zones.drop_zones.clear();
        assert!(matches!(
            svc.create(no_zones).await.unwrap_err(),
            DomainError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn assign_role_is_idempotent_and_checked() {
        let svc = service();
        let user = svc.create(new_user()).await.unwrap();

        let updated = svc.assign_role(user.id, "Manifest").await.unwrap();
        assert!(updated.roles.contains(&"Manifest".to_string()));

        let again = svc.assign_role(user.id, "Manifest").await.unwrap();
        assert_eq!(again.roles.iter().filter(|r| *r == "Manifest").count(), 1);

        let err = svc.assign_role(user.id, "Astronaut").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn remove_role_keeps_last_role() {
        let svc = service();
        let user = svc.create(new_user()).await.unwrap();

        let err = svc.remove_role(user.id, "Worker").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn update_merges_partial_fields() {
        let svc = service();
        let user = svc.create(new_user()).await.unwrap();

        let patch = UserUpdate {
            phone: Some("+1-555-0000".into()),
            status: Some(UserStatus::Inactive),
            ..UserUpdate::default()
        };
        let updated = svc.update(user.id, patch).await.unwrap();
        assert_eq!(updated.phone, "+1-555-0000");
        assert_eq!(updated.status, UserStatus::Inactive);
        assert_eq!(updated.first_name, "Dana");
    }

    #[tokio::test]
    async fn get_unknown_user_is_not_found() {
        let svc = service();
        assert!(matches!(
            svc.get(9999).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }
}
