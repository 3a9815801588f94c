//! # REST API Interface Layer
//!
//! Axum handlers for the planner. Each `*_apis` module exposes a `router()`
//! that is nested under `/api` by [`crate::create_router`].
//!
//! Handlers only translate: path and query parsing, DTO mapping, and turning
//! [`PlanningError`](crate::domain::PlanningError) into a status code with an
//! `ErrorResponse` body (400 invalid input, 404 unknown id, 409 stale
//! version, 500 storage). Request bodies, paths and queries go through the
//! [`extractors`] wrappers so malformed requests get the same body.

pub mod error_responses;
pub mod extractors;
pub mod formula_apis;
pub mod mappers;
pub mod month_apis;
pub mod override_apis;
pub mod planning_apis;
pub mod year_apis;

#[cfg(test)]
pub(crate) mod test_support {
    use axum::{
        body::Body,
        http::{Method, Request},
        response::Response,
        Router,
    };
    use serde::de::DeserializeOwned;
    use shared::PlanType;
    use tower::util::ServiceExt; // for `oneshot`

    use crate::config::OverrideRetention;
    use crate::domain::commands::CreateDefinitionCommand;
    use crate::domain::models::PlanningDefinition;
    use crate::domain::PlanningService;
    use crate::storage::csv::test_utils::TestEnvironment;
    use crate::AppState;

    /// The environment must outlive the state, it owns the data directory
    pub async fn setup_test_state() -> (TestEnvironment, AppState) {
        let env = TestEnvironment::new().await.expect("Failed to create test environment");
        let planning_service = PlanningService::new(&env.connection, OverrideRetention::Retain);
        (env, AppState { planning_service })
    }

    pub async fn create_definition(
        state: &AppState,
        plan_type: PlanType,
        category_name: &str,
        formula: Option<&str>,
        base_value: f64,
    ) -> PlanningDefinition {
        state
            .planning_service
            .create_definition(CreateDefinitionCommand {
                plan_type,
                category_name: category_name.to_string(),
                formula: formula.map(str::to_string),
                base_value,
                end_month: None,
            })
            .await
            .expect("Failed to create definition")
            .definition
    }

    pub async fn send(app: &Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(json) => Body::from(json.to_string()),
                None => Body::empty(),
            })
            .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    pub async fn read_json<T: DeserializeOwned>(response: Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }
}
