//! Translation of planning errors into HTTP responses.
//!
//! Every failure is answered with an [`ErrorResponse`] body:
//!
//! ```json
//! { "error": "Planning definition not found: planning::...", "kind": "definition_not_found" }
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use log::{error, warn};
use shared::{ErrorResponse, PlanType};

use crate::domain::errors::PlanningError;
use crate::domain::models::MonthKey;

pub fn status_for(e: &PlanningError) -> StatusCode {
    match e {
        PlanningError::Validation(_) | PlanningError::Formula(_) => StatusCode::BAD_REQUEST,
        PlanningError::DefinitionNotFound(_) | PlanningError::OverrideNotFound(_) => StatusCode::NOT_FOUND,
        PlanningError::OverrideConflict { .. } => StatusCode::CONFLICT,
        PlanningError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for PlanningError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        if status.is_server_error() {
            error!("Request failed: {:#}", self);
        } else {
            warn!("Request rejected ({}): {}", status, self);
        }

        let body = ErrorResponse {
            error: self.to_string(),
            kind: self.kind().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Parse a `YYYY-MM` path segment.
pub fn parse_month(raw: &str) -> Result<MonthKey, PlanningError> {
    raw.parse::<MonthKey>()
        .map_err(|e| PlanningError::Validation(format!("Invalid month '{}': {}", raw, e)))
}

/// Month and year views are always scoped to one plan type.
pub fn require_plan_type(raw: Option<&str>) -> Result<PlanType, PlanningError> {
    match raw {
        Some(code) => parse_plan_type(code),
        None => Err(PlanningError::Validation(
            "Query parameter 'plan_type' is required (PF or PJ)".to_string(),
        )),
    }
}

pub fn parse_plan_type(raw: &str) -> Result<PlanType, PlanningError> {
    PlanType::from_code(raw)
        .ok_or_else(|| PlanningError::Validation(format!("Unknown plan type '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::formula::FormulaError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&PlanningError::Validation("bad".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&PlanningError::Formula(FormulaError::UnexpectedEnd)), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&PlanningError::DefinitionNotFound("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_for(&PlanningError::OverrideNotFound("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(&PlanningError::OverrideConflict { id: "x".into(), expected: 1, actual: 2 }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&PlanningError::Storage(anyhow::anyhow!("io"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_plan_type_query_parsing() {
        assert_eq!(require_plan_type(Some("pj")).unwrap(), PlanType::Business);
        assert!(require_plan_type(None).is_err());
        assert!(parse_plan_type("XX").is_err());
    }
}
