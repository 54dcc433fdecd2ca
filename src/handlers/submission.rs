// src/handlers/submission.rs

use axum::{Extension, Json, body::Bytes, extract::State, http::StatusCode, response::IntoResponse};
use sqlx::AnyPool;

use crate::{
    error::{AppError, ErrorBody},
    models::{
        caller::Caller,
        payload::{AttemptPayload, SubmitResponse},
    },
    store::{self, Dialect, NewAttempt},
    utils::client_meta::ClientMeta,
};

/// Persists one completed attempt.
///
/// The body is decoded leniently into a typed payload; only the four
/// top-level required fields can reject it. The attempt, its category results
/// and its answers are written in one transaction. Every accepted submission
/// creates a new attempt, identical content included.
#[utoipa::path(
    post,
    path = "/api/ai-assessment/v1/submit",
    request_body = AttemptPayload,
    responses(
        (status = 201, description = "Attempt stored", body = SubmitResponse),
        (status = 400, description = "A required field is missing or empty", body = ErrorBody),
        (status = 401, description = "No authenticated caller", body = ErrorBody),
        (status = 500, description = "Storage failed or schema not provisioned", body = ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn submit_attempt(
    State(pool): State<AnyPool>,
    State(dialect): State<Dialect>,
    Extension(caller): Extension<Caller>,
    meta: ClientMeta,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let payload = AttemptPayload::from_body(&body)?;

    let missing = store::missing_table(&pool, dialect).await.map_err(|e| {
        tracing::error!("Failed to inspect schema: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;
    if let Some(table) = missing {
        return Err(AppError::MissingTable(table.to_string()));
    }

    let attempt_id = store::record_attempt(
        &pool,
        NewAttempt {
            user_id: caller.user_id,
            payload: &payload,
            ip: meta.ip_bytes(),
            user_agent: meta.user_agent,
        },
    )
    .await?;

    tracing::info!(
        "Stored attempt {} for user {} ({} categories, {} answers, overall {})",
        attempt_id,
        caller.user_id,
        payload.breakdown.len(),
        payload.answers.len(),
        payload.overall
    );

    Ok((StatusCode::CREATED, Json(SubmitResponse { attempt_id })))
}
