// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::ErrorBody,
    handlers::{bootstrap, submission},
    models::{
        caller::DisplayIdentity,
        client_config::ClientConfig,
        payload::{AnswerEntry, AttemptPayload, BreakdownEntry, SubmitResponse},
    },
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Versioned root all assessment endpoints live under.
pub const API_ROOT: &str = "/api/ai-assessment/v1";

#[derive(OpenApi)]
#[openapi(
    paths(submission::submit_attempt, bootstrap::client_config),
    components(schemas(
        AttemptPayload,
        BreakdownEntry,
        AnswerEntry,
        SubmitResponse,
        ClientConfig,
        DisplayIdentity,
        ErrorBody
    )),
    modifiers(&BearerAuth),
    tags((name = "AI Assessment", description = "Readiness assessment submission API"))
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Assembles the main application router.
///
/// * Every assessment route requires a bearer token.
/// * Applies global middleware (Trace, CORS).
/// * Serves the OpenAPI document and Swagger UI.
pub fn create_router(state: AppState) -> Router {
    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    // Browser origins carry no path or trailing slash.
    match HeaderValue::from_str(state.config.public_url.origin().ascii_serialization().as_str()) {
        Ok(origin) => cors = cors.allow_origin(origin),
        Err(e) => tracing::warn!("PUBLIC_URL has no usable origin for CORS: {}", e),
    }

    let assessment_routes = Router::new()
        .route("/submit", post(submission::submit_attempt))
        .route("/bootstrap", get(bootstrap::client_config))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest(API_ROOT, assessment_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
