//! Bearer token guard.

use crate::{responses::AppError, state::AppState};
use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use registry_core::RegistryError;
use tracing::debug;

/// Pulls the token out of an `Authorization: Bearer <token>` header value.
fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
}

/// Rejects requests without a valid bearer token.
///
/// Verified claims are added to the request extensions.
pub async fn jwt_guard(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .ok_or(RegistryError::MissingToken)?;

    let claims = state.token_provider.validate_token(token)?;
    debug!("Authenticated caller: {}", claims.app_name);
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}
