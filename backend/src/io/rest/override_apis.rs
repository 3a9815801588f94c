//! # REST API for Monthly Overrides
//!
//! `PUT /api/overrides/:id/paid` toggles the paid flag of an existing override.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::put,
    Router,
};
use log::info;
use shared::{MonthlyOverrideResponse, SetPaidRequest};

use crate::domain::commands::SetPaidCommand;
use crate::io::rest::extractors::{ApiJson, ApiPath};
use crate::io::rest::mappers::OverrideMapper;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/:id/paid", put(set_paid))
}

pub async fn set_paid(
    State(state): State<AppState>,
    ApiPath(override_id): ApiPath<String>,
    ApiJson(request): ApiJson<SetPaidRequest>,
) -> impl IntoResponse {
    info!("PUT /api/overrides/{}/paid - request: {:?}", override_id, request);

    let command = SetPaidCommand {
        override_id,
        is_paid: request.is_paid,
        expected_version: request.expected_version,
    };

    match state.planning_service.set_paid(command).await {
        Ok(result) => {
            let response = MonthlyOverrideResponse {
                monthly_override: OverrideMapper::to_dto(result.monthly_override),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => e.into_response(),
    }
}
