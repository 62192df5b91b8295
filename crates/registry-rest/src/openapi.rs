//! OpenAPI documentation configuration.

use crate::{controllers::HealthResponse, responses::TokenResponse};
use registry_core::{ErrorResponse, User, UserId, UserPatch};
use registry_service::{CreateUserRequest, UpdateUserRequest};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// OpenAPI documentation for the user registry API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Registry API",
        version = "1.0.0",
        description = "Token-guarded CRUD over user records with a read-through lookup cache"
    ),
    paths(
        crate::controllers::token_controller::generate_token,
        crate::controllers::user_controller::create_user,
        crate::controllers::user_controller::get_all_users,
        crate::controllers::user_controller::get_by_user_name,
        crate::controllers::user_controller::get_by_account_number,
        crate::controllers::user_controller::get_by_email_address,
        crate::controllers::user_controller::get_by_identity_number,
        crate::controllers::user_controller::update_user,
        crate::controllers::user_controller::delete_user,
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            UserId,
            User,
            UserPatch,
            CreateUserRequest,
            UpdateUserRequest,
            ErrorResponse,
            TokenResponse,
            HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Token issuance"),
        (name = "users", description = "User registry endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// Security addon for JWT Bearer authentication.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token issued by GET /api/jwt"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_user_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/users"));
        assert!(doc.paths.paths.contains_key("/api/users/{userId}"));
        assert!(doc.paths.paths.contains_key("/api/jwt"));
    }
}
