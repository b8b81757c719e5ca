//! API router with Swagger UI

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::dto::{ApiResponse, EmptyData, LimitQuery};
use crate::api::handlers::{
    calculations, drop_zones, events, health, roles, users, work_shifts, AppState,
};
use crate::infrastructure::Storage;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        users::assign_role,
        users::remove_role,
        users::get_user_permissions,
        users::can_manage,
        // Roles
        roles::list_roles,
        roles::get_role,
        roles::create_role,
        roles::update_role,
        roles::delete_role,
        // Drop Zones
        drop_zones::list_drop_zones,
        drop_zones::list_active_drop_zones,
        drop_zones::get_drop_zone,
        drop_zones::create_drop_zone,
        drop_zones::update_drop_zone,
        drop_zones::delete_drop_zone,
        // Events
        events::list_events,
        events::upcoming_events,
        events::events_in_range,
        events::get_event,
        events::create_event,
        events::update_event,
        events::delete_event,
        // Work Shifts
        work_shifts::list_work_shifts,
        work_shifts::upcoming_work_shifts,
        work_shifts::get_work_shift,
        work_shifts::create_work_shift,
        work_shifts::update_work_shift,
        work_shifts::delete_work_shift,
        // Calculations
        calculations::list_calculations,
        calculations::record_calculation,
        calculations::clear_calculations,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            EmptyData,
            LimitQuery,
            health::HealthResponse,
            // Users
            users::UserResponse,
            users::CreateUserRequest,
            users::UpdateUserRequest,
            users::UserPermissionsResponse,
            users::CanManageResponse,
            // Roles
            roles::RoleResponse,
            roles::CreateRoleRequest,
            roles::UpdateRoleRequest,
            // Drop Zones
            drop_zones::DropZoneResponse,
            drop_zones::CreateDropZoneRequest,
            drop_zones::UpdateDropZoneRequest,
            // Events
            events::EventResponse,
            events::CreateEventRequest,
            events::UpdateEventRequest,
            // Work Shifts
            work_shifts::WorkShiftResponse,
            work_shifts::CreateWorkShiftRequest,
            work_shifts::UpdateWorkShiftRequest,
            // Calculations
            calculations::CalculationResponse,
            calculations::RecordCalculationRequest,
        )
    ),
    tags(
        (name = "Health", description = "Service health check for uptime and readiness monitoring."),
        (name = "Users", description = "Staff management: CRUD, role assignment, effective permissions and manager/target authority checks. Every user holds at least one role and works at least one drop zone."),
        (name = "Roles", description = "Role management. Built-in system roles (Super Admin level 10 down to Worker level 2) cannot be deleted; custom roles can, once no user holds them. `user_count` is recomputed from the user records on every read."),
        (name = "Drop Zones", description = "Skydiving site management. `code` is a 3-4 character uppercase identifier. `active_users` and `upcoming_events` are derived counters recomputed on read; zones with nonzero counters cannot be deleted."),
        (name = "Events", description = "Event calendar: boogies, competitions, training camps. Supports upcoming and inclusive date-range listings, both sorted by start time."),
        (name = "Work Shifts", description = "Work calendar staffing slots. A shift names the role it requires; user assignment is optional. Statuses: `pending`, `confirmed`, `completed`, `cancelled`."),
        (name = "Calculations", description = "Capped log of calculator operations (most recent 50 kept, newest first). Results are computed server-side with 8-decimal display rounding."),
    ),
    info(
        title = "SkyOps Operations API",
        version = "1.0.0",
        description = "REST API for skydiving operations management: staff, roles and permissions, drop zones, event and work calendars, plus the calculator history log.

## Response format

Every response is wrapped in a standard envelope:
```json
{\"success\": true, \"data\": {...}}
```

On failure:
```json
{\"success\": false, \"data\": null, \"error\": \"description\"}
```

## Error mapping

`404` unknown entity, `409` conflicting state (duplicate role name, guarded deletion), `403` protected system role, `422` validation failure, `400` malformed JSON.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(storage: Arc<dyn Storage>) -> Router {
    health::mark_started();

    let state = AppState::new(storage);

    let user_routes = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/{id}/roles/{role}",
            post(users::assign_role).delete(users::remove_role),
        )
        .route("/{id}/permissions", get(users::get_user_permissions))
        .route("/{id}/can-manage/{target_id}", get(users::can_manage));

    let role_routes = Router::new()
        .route("/", get(roles::list_roles).post(roles::create_role))
        .route(
            "/{id}",
            get(roles::get_role)
                .put(roles::update_role)
                .delete(roles::delete_role),
        );

    let drop_zone_routes = Router::new()
        .route(
            "/",
            get(drop_zones::list_drop_zones).post(drop_zones::create_drop_zone),
        )
        .route("/active", get(drop_zones::list_active_drop_zones))
        .route(
            "/{id}",
            get(drop_zones::get_drop_zone)
                .put(drop_zones::update_drop_zone)
                .delete(drop_zones::delete_drop_zone),
        );

    let event_routes = Router::new()
        .route("/", get(events::list_events).post(events::create_event))
        .route("/upcoming", get(events::upcoming_events))
        .route("/range", get(events::events_in_range))
        .route(
            "/{id}",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        );

    let work_shift_routes = Router::new()
        .route(
            "/",
            get(work_shifts::list_work_shifts).post(work_shifts::create_work_shift),
        )
        .route("/upcoming", get(work_shifts::upcoming_work_shifts))
        .route(
            "/{id}",
            get(work_shifts::get_work_shift)
                .put(work_shifts::update_work_shift)
                .delete(work_shifts::delete_work_shift),
        );

    let calculation_routes = Router::new().route(
        "/",
        get(calculations::list_calculations)
            .post(calculations::record_calculation)
            .delete(calculations::clear_calculations),
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .route("/health", get(health::health_check))
        .nest("/api/v1/users", user_routes)
        .nest("/api/v1/roles", role_routes)
        .nest("/api/v1/drop-zones", drop_zone_routes)
        .nest("/api/v1/events", event_routes)
        .nest("/api/v1/work-shifts", work_shift_routes)
        .nest("/api/v1/calculations", calculation_routes)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::infrastructure::{InMemoryStorage, LatencyProfile};

    fn app() -> Router {
        let storage = Arc::new(InMemoryStorage::seeded(LatencyProfile::none()).unwrap());
        create_api_router(storage)
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap();
        (status, value)
    }

    #[tokio::test]
    async fn health_answers_ok() {
        let (status, body) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn users_list_is_wrapped_in_envelope() {
        let (status, body) = get_json("/api/v1/users").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(body["data"].as_array().is_some());
    }

    #[tokio::test]
    async fn unknown_user_answers_404() {
        let (status, body) = get_json("/api/v1/users/9999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn system_role_delete_answers_403() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/v1/roles/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn drop_zone_with_users_resists_deletion() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/v1/drop-zones/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn invalid_create_body_answers_422() {
        let body = serde_json::json!({
            "first_name": "",
            "last_name": "Frost",
            "email": "not-an-email",
            "roles": [],
            "drop_zones": []
        });
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/users")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn calculation_is_evaluated_server_side() {
        let body = serde_json::json!({
            "first_operand": 0.1,
            "operator": "+",
            "second_operand": 0.2
        });
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/calculations")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["data"]["result"], 0.3);
    }

    #[tokio::test]
    async fn divide_by_zero_is_rejected() {
        let body = serde_json::json!({
            "first_operand": 8,
            "operator": "/",
            "second_operand": 0
        });
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/calculations")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn upcoming_events_respect_limit() {
        let (status, body) = get_json("/api/v1/events/upcoming?limit=1").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"].as_array().unwrap().len() <= 1);
    }
}
