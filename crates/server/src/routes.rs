use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::auth::ServerState;
use crate::openapi::ApiDoc;

pub mod profiles;
pub mod reference;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public reference listing, the
/// profile surfaces, and the API docs.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    // Public routes (health + reference data)
    let public = Router::new()
        .route("/health", get(health))
        .route("/api/counties", get(reference::list_counties))
        .route("/api/districts", get(reference::list_districts))
        .route("/api/schools", get(reference::list_schools));

    // Profile routes; `/me` before the capture so it stays self-service
    let profile_routes = Router::new()
        .route(
            "/api/profiles",
            get(profiles::list_profiles).post(profiles::create_profile),
        )
        .route(
            "/api/profiles/me",
            get(profiles::get_my_profile)
                .put(profiles::update_my_profile)
                .post(profiles::register_my_profile),
        )
        .route(
            "/api/profiles/:user_id",
            get(profiles::get_profile)
                .put(profiles::update_profile)
                .delete(profiles::delete_profile),
        );

    // Compose
    public
        .merge(profile_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
