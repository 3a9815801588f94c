//! Request extractors whose rejections use the same `ErrorResponse` body as
//! every other failure.
//!
//! axum's own `Json`, `Path` and `Query` answer a bad request with plain text.
//! These wrappers run the same extraction and turn the rejection into a
//! `validation` error.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts,
    },
    response::{IntoResponse, Response},
};

use crate::domain::errors::PlanningError;

/// A malformed request, answered as a 400 `validation` error
#[derive(Debug)]
pub struct ApiRejection(PlanningError);

impl ApiRejection {
    fn invalid(part: &str, detail: String) -> Self {
        Self(PlanningError::Validation(format!("Invalid request {}: {}", part, detail)))
    }
}

impl From<JsonRejection> for ApiRejection {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid("body", rejection.body_text())
    }
}

impl From<PathRejection> for ApiRejection {
    fn from(rejection: PathRejection) -> Self {
        Self::invalid("path", rejection.body_text())
    }
}

impl From<QueryRejection> for ApiRejection {
    fn from(rejection: QueryRejection) -> Self {
        Self::invalid("query", rejection.body_text())
    }
}

impl IntoResponse for ApiRejection {
    fn into_response(self) -> Response {
        self.0.into_response()
    }
}

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiRejection))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiRejection))]
pub struct ApiPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiRejection))]
pub struct ApiQuery<T>(pub T);
