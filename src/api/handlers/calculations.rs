//! Calculation history REST API handlers
//!
//! The server evaluates submitted operations itself, so the log only
//! ever contains results consistent with the calculator's arithmetic
//! (8-decimal rounding, divide-by-zero rejection).

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::{ApiResponse, EmptyData, LimitQuery, ValidatedJson};
use crate::api::handlers::{domain_error, AppState, HandlerError};
use crate::application::calculator::{CalculationEntry, Operator};
use crate::application::services::calculations::DEFAULT_HISTORY_LIMIT;
use crate::domain::{Calculation, DomainError};

/// A logged calculation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CalculationResponse {
    /// Unique calculation ID
    pub id: i32,
    pub first_operand: f64,
    /// Operator symbol: `+`, `-`, `×`, `÷`
    pub operator: String,
    pub second_operand: f64,
    pub result: f64,
    pub timestamp: DateTime<Utc>,
}

impl From<Calculation> for CalculationResponse {
    fn from(c: Calculation) -> Self {
        Self {
            id: c.id,
            first_operand: c.first_operand,
            operator: c.operator,
            second_operand: c.second_operand,
            result: c.result,
            timestamp: c.timestamp,
        }
    }
}

/// Request to record a calculation
///
/// The result is computed server-side.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecordCalculationRequest {
    pub first_operand: f64,
    /// Operator symbol; `*` and `/` are accepted as aliases
    #[validate(length(min = 1, message = "must not be empty"))]
    pub operator: String,
    pub second_operand: f64,
}

/// Most recent calculations, newest first
#[utoipa::path(
    get,
    path = "/api/v1/calculations",
    tag = "Calculations",
    params(LimitQuery),
    responses(
        (status = 200, description = "Recent calculations", body = ApiResponse<Vec<CalculationResponse>>)
    )
)]
pub async fn list_calculations(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<ApiResponse<Vec<CalculationResponse>>>, HandlerError> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let calculations = state
        .calculations
        .recent(limit)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        calculations.into_iter().map(Into::into).collect(),
    )))
}

/// Evaluate and record a calculation
#[utoipa::path(
    post,
    path = "/api/v1/calculations",
    tag = "Calculations",
    request_body = RecordCalculationRequest,
    responses(
        (status = 200, description = "Recorded calculation", body = ApiResponse<CalculationResponse>),
        (status = 422, description = "Unknown operator or impossible operation")
    )
)]
pub async fn record_calculation(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RecordCalculationRequest>,
) -> Result<Json<ApiResponse<CalculationResponse>>, HandlerError> {
    let operator = req
        .operator
        .chars()
        .next()
        .and_then(Operator::from_char)
        .ok_or_else(|| {
            domain_error(DomainError::validation(format!(
                "unknown operator: {}",
                req.operator
            )))
        })?;

    let result = operator
        .apply(req.first_operand, req.second_operand)
        .map_err(|e| domain_error(DomainError::validation(e.to_string())))?;

    let entry = CalculationEntry {
        first_operand: req.first_operand,
        operator,
        second_operand: req.second_operand,
        result,
    };
    let saved = state
        .calculations
        .record(&entry)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(saved.into())))
}

/// Clear the calculation history
#[utoipa::path(
    delete,
    path = "/api/v1/calculations",
    tag = "Calculations",
    responses(
        (status = 200, description = "History cleared", body = ApiResponse<EmptyData>)
    )
)]
pub async fn clear_calculations(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<EmptyData>>, HandlerError> {
    state.calculations.clear().await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
