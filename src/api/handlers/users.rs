//! User REST API handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::{ApiResponse, EmptyData, ValidatedJson};
use crate::api::handlers::{domain_error, AppState, HandlerError};
use crate::application::{NewUser, UserUpdate};
use crate::domain::{User, UserStatus};
use crate::permissions;

/// Staff member
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    /// Unique user ID
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    /// Convenience concatenation of first and last name
    pub full_name: String,
    pub email: String,
    pub phone: String,
    /// Account status: `active`, `inactive`, `suspended`
    pub status: String,
    /// Role names held by the user
    pub roles: Vec<String>,
    /// Drop zone names the user works at
    pub drop_zones: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            full_name: u.full_name(),
            id: u.id,
            first_name: u.first_name,
            last_name: u.last_name,
            email: u.email,
            phone: u.phone,
            status: u.status.to_string(),
            roles: u.roles,
            drop_zones: u.drop_zones,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Request to create a user
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    /// `active` (default), `inactive` or `suspended`
    pub status: Option<String>,
    /// Role names; at least one is required
    #[validate(length(min = 1, message = "at least one role is required"))]
    pub roles: Vec<String>,
    /// Drop zone names; at least one is required
    #[validate(length(min = 1, message = "at least one drop zone is required"))]
    pub drop_zones: Vec<String>,
}

/// Request to update a user (partial update)
///
/// Send only the fields to change.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<String>,
    pub roles: Option<Vec<String>>,
    pub drop_zones: Option<Vec<String>>,
}

/// Optional filters for the user list
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct ListUsersQuery {
    /// Only users assigned to this drop zone (by name)
    pub drop_zone: Option<String>,
    /// Only users holding this role (by name)
    pub role: Option<String>,
}

/// Effective authorization of a user
#[derive(Debug, Serialize, ToSchema)]
pub struct UserPermissionsResponse {
    pub user_id: i32,
    /// Role names the computation was based on
    pub roles: Vec<String>,
    /// Highest role level across the user's roles
    pub level: i32,
    /// Deduplicated union of permissions from all roles
    pub permissions: Vec<String>,
}

/// Result of a manager/target authority comparison
#[derive(Debug, Serialize, ToSchema)]
pub struct CanManageResponse {
    pub manager_id: i32,
    pub target_id: i32,
    pub manager_level: i32,
    pub target_level: i32,
    /// `true` when the manager outranks the target or holds the wildcard
    pub can_manage: bool,
}

/// List users, optionally filtered by drop zone and role
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "List of users", body = ApiResponse<Vec<UserResponse>>)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, HandlerError> {
    let mut users = match query.drop_zone {
        Some(ref dz) => state.users.by_drop_zone(dz).await,
        None => state.users.list().await,
    }
    .map_err(domain_error)?;

    if let Some(role) = query.role {
        users.retain(|u| u.roles.iter().any(|r| *r == role));
    }

    Ok(Json(ApiResponse::success(
        users.into_iter().map(Into::into).collect(),
    )))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<UserResponse>>, HandlerError> {
    let user = state.users.get(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(user.into())))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "Created user", body = ApiResponse<UserResponse>),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, HandlerError> {
    let data = NewUser {
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
        phone: req.phone.unwrap_or_default(),
        status: req
            .status
            .as_deref()
            .map(UserStatus::from)
            .unwrap_or_default(),
        roles: req.roles,
        drop_zones: req.drop_zones,
    };
    let user = state.users.create(data).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(user.into())))
}

/// Update a user
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, HandlerError> {
    let patch = UserUpdate {
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
        phone: req.phone,
        status: req.status.as_deref().map(UserStatus::from),
        roles: req.roles,
        drop_zones: req.drop_zones,
    };
    let user = state.users.update(id, patch).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(user.into())))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = ApiResponse<EmptyData>),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<EmptyData>>, HandlerError> {
    state.users.delete(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

/// Assign a role to a user
///
/// Assigning a role the user already holds is a no-op.
#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/roles/{role}",
    tag = "Users",
    params(
        ("id" = i32, Path, description = "User ID"),
        ("role" = String, Path, description = "Role name")
    ),
    responses(
        (status = 200, description = "Updated user", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found"),
        (status = 422, description = "Unknown role")
    )
)]
pub async fn assign_role(
    State(state): State<AppState>,
    Path((id, role)): Path<(i32, String)>,
) -> Result<Json<ApiResponse<UserResponse>>, HandlerError> {
    let user = state
        .users
        .assign_role(id, &role)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(user.into())))
}

/// Remove a role from a user
///
/// Refused when it would leave the user with no roles.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}/roles/{role}",
    tag = "Users",
    params(
        ("id" = i32, Path, description = "User ID"),
        ("role" = String, Path, description = "Role name")
    ),
    responses(
        (status = 200, description = "Updated user", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found"),
        (status = 422, description = "User must keep at least one role")
    )
)]
pub async fn remove_role(
    State(state): State<AppState>,
    Path((id, role)): Path<(i32, String)>,
) -> Result<Json<ApiResponse<UserResponse>>, HandlerError> {
    let user = state
        .users
        .remove_role(id, &role)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(user.into())))
}

/// Effective permissions of a user
///
/// Computes the deduplicated union of permissions across the user's
/// roles together with the highest role level.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/permissions",
    tag = "Users",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Effective permissions", body = ApiResponse<UserPermissionsResponse>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_permissions(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<UserPermissionsResponse>>, HandlerError> {
    let user = state.users.get(id).await.map_err(domain_error)?;
    let all_roles = state.roles.list().await.map_err(domain_error)?;
    let response = UserPermissionsResponse {
        user_id: user.id,
        level: permissions::user_role_level(&user, &all_roles),
        permissions: permissions::user_permissions(&user, &all_roles),
        roles: user.roles,
    };
    Ok(Json(ApiResponse::success(response)))
}

/// Check whether one user may manage another
///
/// A manager may manage a target with a strictly lower role level;
/// wildcard holders may manage anyone.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/can-manage/{target_id}",
    tag = "Users",
    params(
        ("id" = i32, Path, description = "Manager user ID"),
        ("target_id" = i32, Path, description = "Target user ID")
    ),
    responses(
        (status = 200, description = "Authority comparison", body = ApiResponse<CanManageResponse>),
        (status = 404, description = "User not found")
    )
)]
pub async fn can_manage(
    State(state): State<AppState>,
    Path((id, target_id)): Path<(i32, i32)>,
) -> Result<Json<ApiResponse<CanManageResponse>>, HandlerError> {
    let manager = state.users.get(id).await.map_err(domain_error)?;
    let target = state.users.get(target_id).await.map_err(domain_error)?;
    let all_roles = state.roles.list().await.map_err(domain_error)?;

    let response = CanManageResponse {
        manager_id: manager.id,
        target_id: target.id,
        manager_level: permissions::user_role_level(&manager, &all_roles),
        target_level: permissions::user_role_level(&target, &all_roles),
        can_manage: permissions::can_manage_user(&manager, &target, &all_roles),
    };
    Ok(Json(ApiResponse::success(response)))
}
