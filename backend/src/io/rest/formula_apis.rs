//! # REST API for Formula Previews
//!
//! `POST /api/formula/evaluate` evaluates a formula without storing anything,
//! so a form can show the resulting default value while it is typed.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use log::info;
use shared::{EvaluateFormulaRequest, EvaluateFormulaResponse};

use crate::io::rest::extractors::ApiJson;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/evaluate", post(evaluate_formula))
}

pub async fn evaluate_formula(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<EvaluateFormulaRequest>,
) -> impl IntoResponse {
    info!("POST /api/formula/evaluate - request: {:?}", request);

    match state.planning_service.preview_formula(&request.formula) {
        Ok(value) => {
            let response = EvaluateFormulaResponse {
                formula: request.formula,
                value,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::rest::test_support::{read_json, send, setup_test_state};
    use axum::http::Method;
    use serde_json::json;
    use shared::ErrorResponse;

    #[tokio::test]
    async fn test_evaluate_valid_formula() {
        let (_env, state) = setup_test_state().await;
        let app = router().with_state(state);

        let response = send(&app, Method::POST, "/evaluate", Some(json!({ "formula": "(3000-6%)-500" }))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let result: EvaluateFormulaResponse = read_json(response).await;
        assert_eq!(result.value, 2320.0);
    }

    #[tokio::test]
    async fn test_evaluate_invalid_formula() {
        let (_env, state) = setup_test_state().await;
        let app = router().with_state(state);

        let response = send(&app, Method::POST, "/evaluate", Some(json!({ "formula": "abc" }))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ErrorResponse = read_json(response).await;
        assert_eq!(error.kind, "formula_syntax");
    }
}
