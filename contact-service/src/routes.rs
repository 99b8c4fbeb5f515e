use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use contact_config::MAX_REQUEST_BODY_SIZE;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::state::AppState;

/// Build the service router
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(state.config.frontend_url.as_deref());

    Router::new()
        .route("/", get(handlers::root_info))
        .route("/api/status", get(handlers::api_status))
        .route("/api/health", get(handlers::health_check))
        .route("/api/contact", post(handlers::create_contact))
        .route("/api/contact", get(handlers::list_contacts))
        .route("/api/contact/search/:term", get(handlers::search_contacts))
        .route("/api/contact/:id", get(handlers::get_contact))
        .route("/api/contact/:id", put(handlers::update_contact))
        .route("/api/contact/:id", delete(handlers::delete_contact))
        .fallback(handlers::route_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_SIZE)),
        )
        .with_state(state)
}

/// CORS policy for the presentation client
///
/// Credentials require a concrete origin, so the permissive fallback only
/// applies when no origin is configured.
fn cors_layer(frontend_url: Option<&str>) -> CorsLayer {
    match frontend_url {
        Some(origin) => match origin.parse::<HeaderValue>() {
            Ok(value) => CorsLayer::new()
                .allow_origin(value)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE])
                .allow_credentials(true),
            Err(_) => {
                tracing::warn!(
                    origin = %origin,
                    "FRONTEND_URL is not a valid origin, falling back to permissive CORS"
                );
                CorsLayer::permissive()
            }
        },
        None => CorsLayer::permissive(),
    }
}
