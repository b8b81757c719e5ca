//! Event calendar REST API handlers

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
use crate::application::{EventUpdate, NewEvent};
use crate::domain::Event;

/// Default number of events returned by the upcoming listing
const DEFAULT_UPCOMING_LIMIT: usize = 10;

/// Calendar event at a drop zone
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventResponse {
    /// Unique event ID
    pub id: i32,
    pub title: String,
    /// Free-form category, e.g. `boogie`, `competition`, `training`
    pub event_type: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub drop_zone_id: i32,
    pub description: String,
    /// Role names that must be staffed for the event
    pub required_roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Event> for EventResponse {
    fn from(e: Event) -> Self {
        Self {
            id: e.id,
            title: e.title,
            event_type: e.event_type,
            start_time: e.start_time,
            end_time: e.end_time,
            drop_zone_id: e.drop_zone_id,
            description: e.description,
            required_roles: e.required_roles,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

/// Request to create an event
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub event_type: String,
    pub start_time: DateTime<Utc>,
    /// Must not precede `start_time`
    pub end_time: Option<DateTime<Utc>>,
    pub drop_zone_id: i32,
    pub description: Option<String>,
    pub required_roles: Option<Vec<String>>,
}

/// Request to update an event (partial update)
///
/// `end_time` accepts an explicit `null` to remove the end time.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub event_type: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "crate::api::dto::common::double_option::deserialize"
    )]
    pub end_time: Option<Option<DateTime<Utc>>>,
    pub drop_zone_id: Option<i32>,
    pub description: Option<String>,
    pub required_roles: Option<Vec<String>>,
}

/// Optional filter for the event list
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct ListEventsQuery {
    /// Only events at this drop zone
    pub drop_zone_id: Option<i32>,
}

/// Inclusive date range
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct RangeQuery {
    /// Range start (ISO 8601)
    pub start: DateTime<Utc>,
    /// Range end (ISO 8601), inclusive
    pub end: DateTime<Utc>,
}

/// List events, optionally filtered by drop zone
#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "Events",
    params(ListEventsQuery),
    responses(
        (status = 200, description = "List of events", body = ApiResponse<Vec<EventResponse>>)
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<ApiResponse<Vec<EventResponse>>>, HandlerError> {
    let events = match query.drop_zone_id {
        Some(id) => state.events.by_drop_zone(id).await,
        None => state.events.list().await,
    }
    .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        events.into_iter().map(Into::into).collect(),
    )))
}

/// Upcoming events, soonest first
#[utoipa::path(
    get,
    path = "/api/v1/events/upcoming",
    tag = "Events",
    params(LimitQuery),
    responses(
        (status = 200, description = "Upcoming events", body = ApiResponse<Vec<EventResponse>>)
    )
)]
pub async fn upcoming_events(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<ApiResponse<Vec<EventResponse>>>, HandlerError> {
    let limit = query.limit.unwrap_or(DEFAULT_UPCOMING_LIMIT);
    let events = state.events.upcoming(limit).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        events.into_iter().map(Into::into).collect(),
    )))
}

/// Events within an inclusive date range
#[utoipa::path(
    get,
    path = "/api/v1/events/range",
    tag = "Events",
    params(RangeQuery),
    responses(
        (status = 200, description = "Events in range, sorted by start time", body = ApiResponse<Vec<EventResponse>>),
        (status = 422, description = "Range end precedes start")
    )
)]
pub async fn events_in_range(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<ApiResponse<Vec<EventResponse>>>, HandlerError> {
    let events = state
        .events
        .in_range(query.start, query.end)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        events.into_iter().map(Into::into).collect(),
    )))
}

/// Get an event by ID
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}",
    tag = "Events",
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event details", body = ApiResponse<EventResponse>),
        (status = 404, description = "Event not found")
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<EventResponse>>, HandlerError> {
    let event = state.events.get(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(event.into())))
}

/// Create an event
#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "Events",
    request_body = CreateEventRequest,
    responses(
        (status = 200, description = "Created event", body = ApiResponse<EventResponse>),
        (status = 404, description = "Drop zone not found"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateEventRequest>,
) -> Result<Json<ApiResponse<EventResponse>>, HandlerError> {
    let data = NewEvent {
        title: req.title,
        event_type: req.event_type,
        start_time: req.start_time,
        end_time: req.end_time,
        drop_zone_id: req.drop_zone_id,
        description: req.description.unwrap_or_default(),
        required_roles: req.required_roles.unwrap_or_default(),
    };
    let event = state.events.create(data).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(event.into())))
}

/// Update an event
#[utoipa::path(
    put,
    path = "/api/v1/events/{id}",
    tag = "Events",
    params(("id" = i32, Path, description = "Event ID")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Updated event", body = ApiResponse<EventResponse>),
        (status = 404, description = "Event not found"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<UpdateEventRequest>,
) -> Result<Json<ApiResponse<EventResponse>>, HandlerError> {
    let patch = EventUpdate {
        title: req.title,
        event_type: req.event_type,
        start_time: req.start_time,
        end_time: req.end_time,
        drop_zone_id: req.drop_zone_id,
        description: req.description,
        required_roles: req.required_roles,
    };
    let event = state.events.update(id, patch).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(event.into())))
}

/// Delete an event
#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}",
    tag = "Events",
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event deleted", body = ApiResponse<EmptyData>),
        (status = 404, description = "Event not found")
    )
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<EmptyData>>, HandlerError> {
    state.events.delete(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
