// src/handlers/bootstrap.rs

use axum::{Extension, Json, extract::State};

use crate::{
    config::Config,
    error::{AppError, ErrorBody},
    models::{
        caller::{Caller, DisplayIdentity},
        client_config::ClientConfig,
    },
    routes::API_ROOT,
    utils::jwt::sign_jwt,
};

/// Render-time configuration for an assessment client: where to submit, a
/// short-lived token for this session, and who is taking it.
#[utoipa::path(
    get,
    path = "/api/ai-assessment/v1/bootstrap",
    responses(
        (status = 200, description = "Client configuration", body = ClientConfig),
        (status = 401, description = "No authenticated caller", body = ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn client_config(
    State(config): State<Config>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<ClientConfig>, AppError> {
    let endpoint = config
        .public_url
        .join(&format!("{}/submit", API_ROOT))
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    let token = sign_jwt(&caller, &config.jwt_secret, config.session_token_ttl)?;

    tracing::debug!("Issued assessment session token for user {}", caller.user_id);

    Ok(Json(ClientConfig {
        endpoint: endpoint.to_string(),
        token,
        user: DisplayIdentity::from(&caller),
    }))
}
