//! # REST API for Year Overviews

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::info;

use crate::io::rest::error_responses::require_plan_type;
use crate::io::rest::extractors::{ApiPath, ApiQuery};
use crate::io::rest::mappers::SummaryMapper;
use crate::io::rest::month_apis::PlanTypeQuery;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/:year", get(get_year_overview))
}

/// Twelve monthly totals plus the year sums
pub async fn get_year_overview(
    State(state): State<AppState>,
    ApiPath(year): ApiPath<i32>,
    ApiQuery(query): ApiQuery<PlanTypeQuery>,
) -> impl IntoResponse {
    info!("GET /api/years/{} - query: {:?}", year, query);

    let plan_type = match require_plan_type(query.plan_type.as_deref()) {
        Ok(plan_type) => plan_type,
        Err(e) => return e.into_response(),
    };

    match state.planning_service.year_overview(year, plan_type).await {
        Ok(overview) => {
            (StatusCode::OK, Json(SummaryMapper::to_year_overview_response(overview))).into_response()
        }
        Err(e) => e.into_response(),
    }
}
