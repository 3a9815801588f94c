//! # REST API for Planning Definitions
//!
//! - `GET /api/planning?plan_type=PJ` list definitions
//! - `POST /api/planning` create a definition
//! - `GET|PUT|DELETE /api/planning/:id`

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::info;
use serde::Deserialize;
use shared::{
    CreatePlanningRequest, DeletePlanningResponse, PlanningListResponse, PlanningResponse,
    UpdatePlanningRequest,
};

use crate::io::rest::error_responses::parse_plan_type;
use crate::io::rest::extractors::{ApiJson, ApiPath, ApiQuery};
use crate::io::rest::mappers::PlanningMapper;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListPlanningQuery {
    pub plan_type: Option<String>,
}

/// Create a router for planning definition APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_definitions).post(create_definition))
        .route(
            "/:id",
            get(get_definition).put(update_definition).delete(delete_definition),
        )
}

pub async fn list_definitions(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListPlanningQuery>,
) -> impl IntoResponse {
    info!("GET /api/planning - query: {:?}", query);

    let plan_type = match query.plan_type.as_deref().map(parse_plan_type).transpose() {
        Ok(plan_type) => plan_type,
        Err(e) => return e.into_response(),
    };

    match state.planning_service.list_definitions(plan_type).await {
        Ok(definitions) => {
            let response = PlanningListResponse {
                definitions: PlanningMapper::to_dto_list(definitions),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn create_definition(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreatePlanningRequest>,
) -> impl IntoResponse {
    info!("POST /api/planning - request: {:?}", request);

    let command = match PlanningMapper::to_create_command(request) {
        Ok(command) => command,
        Err(e) => return e.into_response(),
    };

    match state.planning_service.create_definition(command).await {
        Ok(result) => {
            let response = PlanningResponse {
                success_message: format!("Planning '{}' created", result.definition.category_name),
                definition: PlanningMapper::to_dto(result.definition),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn get_definition(
    State(state): State<AppState>,
    ApiPath(planning_id): ApiPath<String>,
) -> impl IntoResponse {
    info!("GET /api/planning/{}", planning_id);

    match state.planning_service.get_definition(&planning_id).await {
        Ok(definition) => {
            let response = PlanningResponse {
                success_message: String::new(),
                definition: PlanningMapper::to_dto(definition),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn update_definition(
    State(state): State<AppState>,
    ApiPath(planning_id): ApiPath<String>,
    ApiJson(request): ApiJson<UpdatePlanningRequest>,
) -> impl IntoResponse {
    info!("PUT /api/planning/{} - request: {:?}", planning_id, request);

    let command = match PlanningMapper::to_update_command(planning_id, request) {
        Ok(command) => command,
        Err(e) => return e.into_response(),
    };

    match state.planning_service.update_definition(command).await {
        Ok(result) => {
            let response = PlanningResponse {
                success_message: format!("Planning '{}' updated", result.definition.category_name),
                definition: PlanningMapper::to_dto(result.definition),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn delete_definition(
    State(state): State<AppState>,
    ApiPath(planning_id): ApiPath<String>,
) -> impl IntoResponse {
    info!("DELETE /api/planning/{}", planning_id);

    match state.planning_service.delete_definition(&planning_id).await {
        Ok(result) => {
            let response = DeletePlanningResponse {
                success_message: format!("Planning '{}' deleted", result.deleted.category_name),
                deleted_id: result.deleted.id,
                removed_overrides: result.removed_overrides,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => e.into_response(),
    }
}
