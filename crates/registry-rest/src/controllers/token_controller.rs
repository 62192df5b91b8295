//! Token issuance controller.

use crate::{
    responses::{AppError, Operation, TokenResponse},
    state::AppState,
};
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::info;

/// Creates the token router.
pub fn router() -> Router<AppState> {
    Router::new().route("/jwt", get(generate_token))
}

/// Issue a bearer token.
#[utoipa::path(
    get,
    path = "/api/jwt",
    tag = "auth",
    responses(
        (status = 201, description = "Token issued", body = TokenResponse),
        (status = 500, description = "Token could not be signed", body = registry_core::ErrorResponse)
    )
)]
pub async fn generate_token(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    let token = state
        .token_provider
        .issue_token()
        .map_err(AppError::during(Operation::Login))?;

    info!("Issued bearer token");
    Ok((StatusCode::CREATED, Json(TokenResponse::new(token))))
}
