//! Role REST API handlers

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::{ApiResponse, EmptyData, ValidatedJson};
use crate::api::handlers::{domain_error, AppState, HandlerError};
use crate::application::{NewRole, RoleUpdate};
use crate::domain::Role;

/// Named role with its permission set
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoleResponse {
    /// Unique role ID
    pub id: i32,
    /// Internal role name, unique
    pub name: String,
    /// Human-readable name shown in lists
    pub display_name: String,
    pub description: String,
    /// Authority rank (higher outranks lower)
    pub level: i32,
    /// Permission strings granted by this role
    pub permissions: Vec<String>,
    /// System roles cannot be deleted
    pub is_system_role: bool,
    /// Number of users currently holding the role (recomputed on read)
    pub user_count: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Role> for RoleResponse {
    fn from(r: Role) -> Self {
        Self {
            id: r.id,
            name: r.name,
            display_name: r.display_name,
            description: r.description,
            level: r.level,
            permissions: r.permissions,
            is_system_role: r.is_system_role,
            user_count: r.user_count,
            created_at: r.created_at,
        }
    }
}

/// Request to create a custom role
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRoleRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub display_name: String,
    pub description: Option<String>,
    /// Authority rank; defaults to 1
    pub level: Option<i32>,
    /// At least one permission is required
    #[validate(length(min = 1, message = "at least one permission is required"))]
    pub permissions: Vec<String>,
}

/// Request to update a role (partial update)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRoleRequest {
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub level: Option<i32>,
    pub permissions: Option<Vec<String>>,
}

/// List all roles
#[utoipa::path(
    get,
    path = "/api/v1/roles",
    tag = "Roles",
    responses(
        (status = 200, description = "List of roles", body = ApiResponse<Vec<RoleResponse>>)
    )
)]
pub async fn list_roles(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RoleResponse>>>, HandlerError> {
    let roles = state.roles.list().await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        roles.into_iter().map(Into::into).collect(),
    )))
}

/// Get a role by ID
#[utoipa::path(
    get,
    path = "/api/v1/roles/{id}",
    tag = "Roles",
    params(("id" = i32, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Role details", body = ApiResponse<RoleResponse>),
        (status = 404, description = "Role not found")
    )
)]
pub async fn get_role(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<RoleResponse>>, HandlerError> {
    let role = state.roles.get(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(role.into())))
}

/// Create a custom role
///
/// Created roles are never system roles.
#[utoipa::path(
    post,
    path = "/api/v1/roles",
    tag = "Roles",
    request_body = CreateRoleRequest,
    responses(
        (status = 200, description = "Created role", body = ApiResponse<RoleResponse>),
        (status = 409, description = "Role name already exists"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_role(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateRoleRequest>,
) -> Result<Json<ApiResponse<RoleResponse>>, HandlerError> {
    let data = NewRole {
        name: req.name,
        display_name: req.display_name,
        description: req.description.unwrap_or_default(),
        level: req.level,
        permissions: req.permissions,
    };
    let role = state.roles.create(data).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(role.into())))
}

/// Update a role
#[utoipa::path(
    put,
    path = "/api/v1/roles/{id}",
    tag = "Roles",
    params(("id" = i32, Path, description = "Role ID")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Updated role", body = ApiResponse<RoleResponse>),
        (status = 404, description = "Role not found"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn update_role(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<UpdateRoleRequest>,
) -> Result<Json<ApiResponse<RoleResponse>>, HandlerError> {
    let patch = RoleUpdate {
        display_name: req.display_name,
        description: req.description,
        level: req.level,
        permissions: req.permissions,
    };
    let role = state.roles.update(id, patch).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(role.into())))
}

/// Delete a role
///
/// System roles answer 403; roles still held by users answer 409.
#[utoipa::path(
    delete,
    path = "/api/v1/roles/{id}",
    tag = "Roles",
    params(("id" = i32, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Role deleted", body = ApiResponse<EmptyData>),
        (status = 403, description = "System role"),
        (status = 404, description = "Role not found"),
        (status = 409, description = "Role still held by users")
    )
)]
pub async fn delete_role(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<EmptyData>>, HandlerError> {
    state.roles.delete(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
