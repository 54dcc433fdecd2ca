// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use std::fmt;
use utoipa::ToSchema;

use crate::models::payload::PayloadError;

/// The three inserts of an attempt, in write order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStage {
    Attempt,
    Category,
    Answer,
}

impl WriteStage {
    /// Error code reported to the client when this stage fails.
    pub fn code(self) -> &'static str {
        match self {
            WriteStage::Attempt => "insert_attempt_failed",
            WriteStage::Category => "insert_category_failed",
            WriteStage::Answer => "insert_answer_failed",
        }
    }
}

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 401: no resolvable caller identity
    AuthRequired,

    // 400: a required top-level field is absent or empty
    InvalidPayload(String),

    // 500: one insert of the attempt transaction failed; everything was rolled back
    Storage { stage: WriteStage, detail: String },

    // 500: the schema has not been provisioned
    MissingTable(String),

    // 500 Internal Server Error
    InternalServerError(String),
}

impl AppError {
    pub fn storage(stage: WriteStage, err: impl fmt::Display) -> Self {
        AppError::Storage {
            stage,
            detail: err.to_string(),
        }
    }
}

/// Body shape shared by every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Converts the error into the JSON body and status code clients rely on.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::AuthRequired => (StatusCode::UNAUTHORIZED, json!({ "error": "auth_required" })),
            AppError::InvalidPayload(reason) => {
                tracing::warn!("Rejected submission: {}", reason);
                (StatusCode::BAD_REQUEST, json!({ "error": "invalid_payload" }))
            }
            AppError::Storage { stage, detail } => {
                tracing::error!("Attempt write failed at {:?}: {}", stage, detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": stage.code(), "detail": detail }),
                )
            }
            AppError::MissingTable(table) => {
                tracing::error!("Schema not provisioned, missing table {}", table);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "missing_table", "table": table }),
                )
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal_error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Converts `sqlx::Error` into `AppError::InternalServerError`.
/// Allows using `?` operator on database queries outside the attempt transaction.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl From<PayloadError> for AppError {
    fn from(err: PayloadError) -> Self {
        AppError::InvalidPayload(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_codes() {
        assert_eq!(WriteStage::Attempt.code(), "insert_attempt_failed");
        assert_eq!(WriteStage::Category.code(), "insert_category_failed");
        assert_eq!(WriteStage::Answer.code(), "insert_answer_failed");
    }

    #[test]
    fn status_codes() {
        assert_eq!(AppError::AuthRequired.into_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::InvalidPayload("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::MissingTable("t".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::storage(WriteStage::Answer, "boom").into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
