//! # REST API for Monthly Views
//!
//! Totals and item breakdowns for one month, and recording of the actual
//! value or paid flag of a definition in that month.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, put},
    Router,
};
use log::info;
use serde::Deserialize;
use shared::{MonthlyOverrideResponse, RecordMonthValueRequest, SetPaidRequest};

use crate::domain::commands::{RecordMonthValueCommand, SetMonthPaidCommand};
use crate::io::rest::error_responses::{parse_month, require_plan_type};
use crate::io::rest::extractors::{ApiJson, ApiPath, ApiQuery};
use crate::io::rest::mappers::{OverrideMapper, SummaryMapper};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PlanTypeQuery {
    pub plan_type: Option<String>,
}

/// Create a router for month related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:month", get(get_month_view))
        .route("/:month/totals", get(get_month_totals))
        .route("/:month/items/:planning_id", put(record_month_value))
        .route("/:month/items/:planning_id/paid", put(set_month_paid))
}

pub async fn get_month_totals(
    State(state): State<AppState>,
    ApiPath(month): ApiPath<String>,
    ApiQuery(query): ApiQuery<PlanTypeQuery>,
) -> impl IntoResponse {
    info!("GET /api/months/{}/totals - query: {:?}", month, query);

    let (month, plan_type) = match (parse_month(&month), require_plan_type(query.plan_type.as_deref())) {
        (Ok(month), Ok(plan_type)) => (month, plan_type),
        (Err(e), _) | (_, Err(e)) => return e.into_response(),
    };

    match state.planning_service.monthly_totals(month, plan_type).await {
        Ok(totals) => (StatusCode::OK, Json(SummaryMapper::to_totals_response(totals))).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_month_view(
    State(state): State<AppState>,
    ApiPath(month): ApiPath<String>,
    ApiQuery(query): ApiQuery<PlanTypeQuery>,
) -> impl IntoResponse {
    info!("GET /api/months/{} - query: {:?}", month, query);

    let (month, plan_type) = match (parse_month(&month), require_plan_type(query.plan_type.as_deref())) {
        (Ok(month), Ok(plan_type)) => (month, plan_type),
        (Err(e), _) | (_, Err(e)) => return e.into_response(),
    };

    match state.planning_service.month_view(month, plan_type).await {
        Ok(summary) => (StatusCode::OK, Json(SummaryMapper::to_month_view_response(summary))).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn record_month_value(
    State(state): State<AppState>,
    ApiPath((month, planning_id)): ApiPath<(String, String)>,
    ApiJson(request): ApiJson<RecordMonthValueRequest>,
) -> impl IntoResponse {
    info!("PUT /api/months/{}/items/{} - request: {:?}", month, planning_id, request);

    let month = match parse_month(&month) {
        Ok(month) => month,
        Err(e) => return e.into_response(),
    };
    let command = RecordMonthValueCommand {
        planning_id,
        month,
        value: request.value,
        expected_version: request.expected_version,
    };

    match state.planning_service.record_month_value(command).await {
        Ok(result) => {
            let response = MonthlyOverrideResponse {
                monthly_override: OverrideMapper::to_dto(result.monthly_override),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Paid toggle addressed by (definition, month); records the default value
/// first when the month has no override yet.
pub async fn set_month_paid(
    State(state): State<AppState>,
    ApiPath((month, planning_id)): ApiPath<(String, String)>,
    ApiJson(request): ApiJson<SetPaidRequest>,
) -> impl IntoResponse {
    info!("PUT /api/months/{}/items/{}/paid - request: {:?}", month, planning_id, request);

    let month = match parse_month(&month) {
        Ok(month) => month,
        Err(e) => return e.into_response(),
    };
    let command = SetMonthPaidCommand {
        planning_id,
        month,
        is_paid: request.is_paid,
    };

    match state.planning_service.set_month_paid(command).await {
        Ok(result) => {
            let response = MonthlyOverrideResponse {
                monthly_override: OverrideMapper::to_dto(result.monthly_override),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => e.into_response(),
    }
}
