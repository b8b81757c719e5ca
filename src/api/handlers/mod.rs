//! REST API handlers

pub mod calculations;
pub mod drop_zones;
pub mod events;
pub mod health;
pub mod roles;
pub mod users;
pub mod work_shifts;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::Json;

use crate::api::dto::ApiResponse;
use crate::application::{
    CalculationService, DropZoneService, EventService, RoleService, UserService, WorkShiftService,
};
use crate::domain::DomainError;
use crate::infrastructure::Storage;

/// Shared state for every REST handler
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub roles: Arc<RoleService>,
    pub drop_zones: Arc<DropZoneService>,
    pub events: Arc<EventService>,
    pub work_shifts: Arc<WorkShiftService>,
    pub calculations: Arc<CalculationService>,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            users: Arc::new(UserService::new(storage.clone())),
            roles: Arc::new(RoleService::new(storage.clone())),
            drop_zones: Arc::new(DropZoneService::new(storage.clone())),
            events: Arc::new(EventService::new(storage.clone())),
            work_shifts: Arc::new(WorkShiftService::new(storage.clone())),
            calculations: Arc::new(CalculationService::new(storage)),
        }
    }
}

/// Error half of every handler result
pub type HandlerError = (StatusCode, Json<ApiResponse<()>>);

/// Map domain errors onto HTTP status codes.
pub fn domain_error(e: DomainError) -> HandlerError {
    let status = match &e {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ApiResponse::error(e.to_string())))
}
