//! Drop zone REST API handlers

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
use crate::application::{DropZoneUpdate, NewDropZone};
use crate::domain::{DropZone, DropZoneStatus};

/// Skydiving operational site
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DropZoneResponse {
    /// Unique drop zone ID
    pub id: i32,
    pub name: String,
    /// Short uppercase identifier (3-4 characters)
    pub code: String,
    pub address: String,
    pub city: String,
    pub country: String,
    /// IANA timezone name, e.g. `America/Chicago`
    pub timezone: String,
    /// `active`, `inactive` or `pending`
    pub status: String,
    /// Active users assigned to the zone (recomputed on read)
    pub active_users: i32,
    /// Upcoming events at the zone (recomputed on read)
    pub upcoming_events: i32,
    pub created_at: DateTime<Utc>,
}

impl From<DropZone> for DropZoneResponse {
    fn from(z: DropZone) -> Self {
        Self {
            id: z.id,
            name: z.name,
            code: z.code,
            address: z.address,
            city: z.city,
            country: z.country,
            timezone: z.timezone,
            status: z.status.to_string(),
            active_users: z.active_users,
            upcoming_events: z.upcoming_events,
            created_at: z.created_at,
        }
    }
}

/// Request to create a drop zone
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDropZoneRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    /// 3-4 characters; stored uppercased
    #[validate(length(min = 3, max = 4, message = "must be 3-4 characters"))]
    pub code: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub address: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub city: String,
    pub country: Option<String>,
    pub timezone: Option<String>,
    /// `active`, `inactive` or `pending` (default)
    pub status: Option<String>,
}

/// Request to update a drop zone (partial update)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateDropZoneRequest {
    pub name: Option<String>,
    #[validate(length(min = 3, max = 4, message = "must be 3-4 characters"))]
    pub code: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub timezone: Option<String>,
    pub status: Option<String>,
}

/// List all drop zones
#[utoipa::path(
    get,
    path = "/api/v1/drop-zones",
    tag = "Drop Zones",
    responses(
        (status = 200, description = "List of drop zones", body = ApiResponse<Vec<DropZoneResponse>>)
    )
)]
pub async fn list_drop_zones(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<DropZoneResponse>>>, HandlerError> {
    let zones = state.drop_zones.list().await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        zones.into_iter().map(Into::into).collect(),
    )))
}

/// List active drop zones only
#[utoipa::path(
    get,
    path = "/api/v1/drop-zones/active",
    tag = "Drop Zones",
    responses(
        (status = 200, description = "Active drop zones", body = ApiResponse<Vec<DropZoneResponse>>)
    )
)]
pub async fn list_active_drop_zones(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<DropZoneResponse>>>, HandlerError> {
    let zones = state.drop_zones.active().await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        zones.into_iter().map(Into::into).collect(),
    )))
}

/// Get a drop zone by ID
#[utoipa::path(
    get,
    path = "/api/v1/drop-zones/{id}",
    tag = "Drop Zones",
    params(("id" = i32, Path, description = "Drop zone ID")),
    responses(
        (status = 200, description = "Drop zone details", body = ApiResponse<DropZoneResponse>),
        (status = 404, description = "Drop zone not found")
    )
)]
pub async fn get_drop_zone(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<DropZoneResponse>>, HandlerError> {
    let zone = state.drop_zones.get(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(zone.into())))
}

/// Create a drop zone
#[utoipa::path(
    post,
    path = "/api/v1/drop-zones",
    tag = "Drop Zones",
    request_body = CreateDropZoneRequest,
    responses(
        (status = 200, description = "Created drop zone", body = ApiResponse<DropZoneResponse>),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_drop_zone(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateDropZoneRequest>,
) -> Result<Json<ApiResponse<DropZoneResponse>>, HandlerError> {
    let data = NewDropZone {
        name: req.name,
        code: req.code,
        address: req.address,
        city: req.city,
        country: req.country.unwrap_or_default(),
        timezone: req.timezone.unwrap_or_default(),
        status: req.status.as_deref().map(DropZoneStatus::from),
    };
    let zone = state.drop_zones.create(data).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(zone.into())))
}

/// Update a drop zone
#[utoipa::path(
    put,
    path = "/api/v1/drop-zones/{id}",
    tag = "Drop Zones",
    params(("id" = i32, Path, description = "Drop zone ID")),
    request_body = UpdateDropZoneRequest,
    responses(
        (status = 200, description = "Updated drop zone", body = ApiResponse<DropZoneResponse>),
        (status = 404, description = "Drop zone not found"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn update_drop_zone(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<UpdateDropZoneRequest>,
) -> Result<Json<ApiResponse<DropZoneResponse>>, HandlerError> {
    let patch = DropZoneUpdate {
        name: req.name,
        code: req.code,
        address: req.address,
        city: req.city,
        country: req.country,
        timezone: req.timezone,
        status: req.status.as_deref().map(DropZoneStatus::from),
    };
    let zone = state
        .drop_zones
        .update(id, patch)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(zone.into())))
}

/// Delete a drop zone
///
/// Refused with 409 while the zone still has active users or
/// upcoming events.
#[utoipa::path(
    delete,
    path = "/api/v1/drop-zones/{id}",
    tag = "Drop Zones",
    params(("id" = i32, Path, description = "Drop zone ID")),
    responses(
        (status = 200, description = "Drop zone deleted", body = ApiResponse<EmptyData>),
        (status = 404, description = "Drop zone not found"),
        (status = 409, description = "Zone still has active users or upcoming events")
    )
)]
pub async fn delete_drop_zone(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<EmptyData>>, HandlerError> {
    state.drop_zones.delete(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
