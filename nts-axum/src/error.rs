//! Classification of query failures into externally visible responses.
//!
//! The mapping is total and happens exactly once, here: validation and
//! dispatch surface a [`QueryFailure`], and every variant lands on one row
//! of the status table. No stack detail ever reaches the caller; the 500
//! path logs the full failure first and answers with a plain diagnostic.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use nts_core::models::QueryFailure;
use serde::{Deserialize, Serialize};
use tracing::{Level, event};

/// JSON error body returned for client-side failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[schemars(inline)]
pub struct ErrorDescription {
    /// Short failure class.
    pub error: String,
    /// Human-readable detail.
    pub description: String,
}

/// A classified, ready-to-serialize failure response.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request shape or parameter combination; answered with 400.
    BadRequest(ErrorDescription),
    /// No records matched the query; answered with 404. A normal outcome on the
    /// error channel, not a failure.
    NotFound(ErrorDescription),
    /// Well-formed but semantically invalid parameter value; answered with 422.
    UnprocessableEntity(ErrorDescription),
    /// Anything else; answered with 500. The detail was already logged and
    /// the caller sees only a plain diagnostic.
    Internal(String),
}

impl ApiError {
    /// The standard empty-result response.
    pub fn not_found() -> Self {
        Self::NotFound(ErrorDescription {
            error: "Not Found".to_owned(),
            description: "No records were found for such query.".to_owned(),
        })
    }
}

impl From<QueryFailure> for ApiError {
    fn from(failure: QueryFailure) -> Self {
        match failure {
            QueryFailure::Usage(description) => Self::BadRequest(ErrorDescription {
                error: "Bad parameters use".to_owned(),
                description,
            }),
            QueryFailure::InvalidParameter(description) => {
                Self::UnprocessableEntity(ErrorDescription {
                    error: "Invalid parameter value".to_owned(),
                    description,
                })
            }
            QueryFailure::Unexpected(cause) => {
                event!(Level::ERROR, err = %cause, "query dispatch failed");
                Self::Internal(format!("Something went wrong with the query. Error: {cause}"))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(body) => (StatusCode::BAD_REQUEST, Json(body)).into_response(),
            Self::NotFound(body) => (StatusCode::NOT_FOUND, Json(body)).into_response(),
            Self::UnprocessableEntity(body) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
            Self::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
            }
        }
    }
}

impl aide::operation::OperationOutput for ApiError {
    type Inner = ErrorDescription;
}
