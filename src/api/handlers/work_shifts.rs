//! Work calendar REST API handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::{ApiResponse, EmptyData, LimitQuery, ValidatedJson};
use crate::api::handlers::{domain_error, AppState, HandlerError};
use crate::application::{NewWorkShift, WorkShiftUpdate};
use crate::domain::{ShiftStatus, WorkShift};

/// Default number of shifts returned by the upcoming listing
const DEFAULT_UPCOMING_LIMIT: usize = 10;

/// Staffing slot on the work calendar
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WorkShiftResponse {
    /// Unique shift ID
    pub id: i32,
    pub title: String,
    /// Role name the shift requires
    pub required_role: String,
    /// Assigned user, if any
    pub assigned_user_id: Option<i32>,
    pub drop_zone_id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// `pending`, `confirmed`, `completed` or `cancelled`
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<WorkShift> for WorkShiftResponse {
    fn from(s: WorkShift) -> Self {
        Self {
            id: s.id,
            title: s.title,
            required_role: s.required_role,
            assigned_user_id: s.assigned_user_id,
            drop_zone_id: s.drop_zone_id,
            start_time: s.start_time,
            end_time: s.end_time,
            status: s.status.to_string(),
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

/// Request to create a work shift
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateWorkShiftRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub required_role: String,
    /// Assign a user immediately; may stay open
    pub assigned_user_id: Option<i32>,
    pub drop_zone_id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// `pending` (default), `confirmed`, `completed` or `cancelled`
    pub status: Option<String>,
}

/// Request to update a work shift (partial update)
///
/// `assigned_user_id` and `end_time` accept an explicit `null` to
/// unassign the user or remove the end time.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateWorkShiftRequest {
    pub title: Option<String>,
    pub required_role: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::api::dto::common::double_option::deserialize"
    )]
    pub assigned_user_id: Option<Option<i32>>,
    pub drop_zone_id: Option<i32>,
    pub start_time: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "crate::api::dto::common::double_option::deserialize"
    )]
    pub end_time: Option<Option<DateTime<Utc>>>,
    pub status: Option<String>,
}

/// Optional filters for the shift list
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct ListShiftsQuery {
    /// Only shifts at this drop zone
    pub drop_zone_id: Option<i32>,
    /// Only shifts assigned to this user
    pub user_id: Option<i32>,
    /// Only shifts in this status
    pub status: Option<String>,
}

/// List work shifts, optionally filtered
///
/// Filters are applied in order: drop zone, user, status.
#[utoipa::path(
    get,
    path = "/api/v1/work-shifts",
    tag = "Work Shifts",
    params(ListShiftsQuery),
    responses(
        (status = 200, description = "List of shifts", body = ApiResponse<Vec<WorkShiftResponse>>)
    )
)]
pub async fn list_work_shifts(
    State(state): State<AppState>,
    Query(query): Query<ListShiftsQuery>,
) -> Result<Json<ApiResponse<Vec<WorkShiftResponse>>>, HandlerError> {
    let mut shifts = match (query.drop_zone_id, query.user_id) {
        (Some(dz), _) => state.work_shifts.by_drop_zone(dz).await,
        (None, Some(user)) => state.work_shifts.by_user(user).await,
        (None, None) => state.work_shifts.list().await,
    }
    .map_err(domain_error)?;

    if let Some(user_id) = query.user_id {
        shifts.retain(|s| s.assigned_user_id == Some(user_id));
    }
    if let Some(status) = query.status.as_deref().map(ShiftStatus::from) {
        shifts.retain(|s| s.status == status);
    }

    Ok(Json(ApiResponse::success(
        shifts.into_iter().map(Into::into).collect(),
    )))
}

/// Upcoming shifts, soonest first
#[utoipa::path(
    get,
    path = "/api/v1/work-shifts/upcoming",
    tag = "Work Shifts",
    params(LimitQuery),
    responses(
        (status = 200, description = "Upcoming shifts", body = ApiResponse<Vec<WorkShiftResponse>>)
    )
)]
pub async fn upcoming_work_shifts(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<ApiResponse<Vec<WorkShiftResponse>>>, HandlerError> {
    let limit = query.limit.unwrap_or(DEFAULT_UPCOMING_LIMIT);
    let shifts = state
        .work_shifts
        .upcoming(limit)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        shifts.into_iter().map(Into::into).collect(),
    )))
}

/// Get a work shift by ID
#[utoipa::path(
    get,
    path = "/api/v1/work-shifts/{id}",
    tag = "Work Shifts",
    params(("id" = i32, Path, description = "Shift ID")),
    responses(
        (status = 200, description = "Shift details", body = ApiResponse<WorkShiftResponse>),
        (status = 404, description = "Shift not found")
    )
)]
pub async fn get_work_shift(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<WorkShiftResponse>>, HandlerError> {
    let shift = state.work_shifts.get(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(shift.into())))
}

/// Create a work shift
#[utoipa::path(
    post,
    path = "/api/v1/work-shifts",
    tag = "Work Shifts",
    request_body = CreateWorkShiftRequest,
    responses(
        (status = 200, description = "Created shift", body = ApiResponse<WorkShiftResponse>),
        (status = 404, description = "Drop zone or user not found"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_work_shift(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateWorkShiftRequest>,
) -> Result<Json<ApiResponse<WorkShiftResponse>>, HandlerError> {
    let data = NewWorkShift {
        title: req.title,
        required_role: req.required_role,
        assigned_user_id: req.assigned_user_id,
        drop_zone_id: req.drop_zone_id,
        start_time: req.start_time,
        end_time: req.end_time,
        status: req.status.as_deref().map(ShiftStatus::from),
    };
    let shift = state
        .work_shifts
        .create(data)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(shift.into())))
}

/// Update a work shift
#[utoipa::path(
    put,
    path = "/api/v1/work-shifts/{id}",
    tag = "Work Shifts",
    params(("id" = i32, Path, description = "Shift ID")),
    request_body = UpdateWorkShiftRequest,
    responses(
        (status = 200, description = "Updated shift", body = ApiResponse<WorkShiftResponse>),
        (status = 404, description = "Shift, drop zone or user not found"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn update_work_shift(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<UpdateWorkShiftRequest>,
) -> Result<Json<ApiResponse<WorkShiftResponse>>, HandlerError> {
    let patch = WorkShiftUpdate {
        title: req.title,
        required_role: req.required_role,
        assigned_user_id: req.assigned_user_id,
        drop_zone_id: req.drop_zone_id,
        start_time: req.start_time,
        end_time: req.end_time,
        status: req.status.as_deref().map(ShiftStatus::from),
    };
    let shift = state
        .work_shifts
        .update(id, patch)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(shift.into())))
}

/// Delete a work shift
#[utoipa::path(
    delete,
    path = "/api/v1/work-shifts/{id}",
    tag = "Work Shifts",
    params(("id" = i32, Path, description = "Shift ID")),
    responses(
        (status = 200, description = "Shift deleted", body = ApiResponse<EmptyData>),
        (status = 404, description = "Shift not found")
    )
)]
pub async fn delete_work_shift(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<EmptyData>>, HandlerError> {
    state.work_shifts.delete(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
