//! Main application router.

use crate::{
    controllers::{health_controller, token_controller, user_controller},
    middleware::{jwt_guard, logging_middleware},
    openapi::ApiDoc,
    state::AppState,
};
use axum::{http::HeaderValue, middleware, Router};
use registry_config::ServerConfig;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Creates the main application router.
///
/// Everything under `/api/users` requires a bearer token from `/api/jwt`.
pub fn create_router(state: AppState, server_config: &ServerConfig) -> Router {
    let users = user_controller::router()
        .layer(middleware::from_fn_with_state(state.clone(), jwt_guard));

    let api_router = Router::new()
        .merge(token_controller::router())
        .nest("/users", users);

    let router = Router::new()
        // Health endpoints (no auth required)
        .merge(health_controller::router())
        .nest("/api", api_router)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(create_cors_layer(server_config))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware));

    info!("Router created with REST endpoints and Swagger UI at /swagger-ui");
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if !server_config.cors_enabled {
        return CorsLayer::new();
    }
    if server_config.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server_config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
