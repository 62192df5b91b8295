//! User registry controller.

use crate::{
    responses::{created, ok, ApiResponse, ApiResult, AppError, Operation},
    state::AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use registry_core::{RegistryError, User, UserField, UserId, UserPatch, ValidateExt};
use registry_service::{CreateUserRequest, UpdateUserRequest};
use serde_json::Value;
use tracing::debug;

/// Creates the user router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_all_users).post(create_user))
        .route("/userName/:userName", get(get_by_user_name))
        .route("/accountNumber/:accountNumber", get(get_by_account_number))
        .route("/emailAddress/:emailAddress", get(get_by_email_address))
        .route("/identityNumber/:identityNumber", get(get_by_identity_number))
        .route("/:userId", put(update_user).delete(delete_user))
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Malformed input", body = registry_core::ErrorResponse),
        (status = 403, description = "Missing or invalid token", body = registry_core::ErrorResponse),
        (status = 409, description = "A unique field is already registered", body = registry_core::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), AppError> {
    let Json(body) = body.map_err(rejected_body)?;
    let request = CreateUserRequest::from_json(body)?;
    debug!("Create user request: {}", request.user_name);

    let user = state
        .gateway
        .create(request)
        .await
        .map_err(AppError::during(Operation::Create))?;

    Ok(created("User created successfully.", user))
}

/// List every registered user.
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    responses(
        (status = 200, description = "All users", body = [User]),
        (status = 403, description = "Missing or invalid token", body = registry_core::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_all_users(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    let users = state
        .gateway
        .get_all()
        .await
        .map_err(AppError::during(Operation::Fetch))?;

    ok("All users data fetched successfully.", users)
}

/// Find a user by username.
#[utoipa::path(
    get,
    path = "/api/users/userName/{userName}",
    tag = "users",
    params(("userName" = String, Path, description = "Username to look up")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "No such user", body = registry_core::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_by_user_name(
    State(state): State<AppState>,
    Path(value): Path<String>,
) -> ApiResult<User> {
    find_by(&state, UserField::UserName, &value).await
}

/// Find a user by account number.
#[utoipa::path(
    get,
    path = "/api/users/accountNumber/{accountNumber}",
    tag = "users",
    params(("accountNumber" = String, Path, description = "Account number to look up")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "No such user", body = registry_core::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_by_account_number(
    State(state): State<AppState>,
    Path(value): Path<String>,
) -> ApiResult<User> {
    find_by(&state, UserField::AccountNumber, &value).await
}

/// Find a user by email address.
#[utoipa::path(
    get,
    path = "/api/users/emailAddress/{emailAddress}",
    tag = "users",
    params(("emailAddress" = String, Path, description = "Email address to look up")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "No such user", body = registry_core::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_by_email_address(
    State(state): State<AppState>,
    Path(value): Path<String>,
) -> ApiResult<User> {
    find_by(&state, UserField::EmailAddress, &value).await
}

/// Find a user by identity number.
#[utoipa::path(
    get,
    path = "/api/users/identityNumber/{identityNumber}",
    tag = "users",
    params(("identityNumber" = String, Path, description = "Identity number to look up")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "No such user", body = registry_core::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_by_identity_number(
    State(state): State<AppState>,
    Path(value): Path<String>,
) -> ApiResult<User> {
    find_by(&state, UserField::IdentityNumber, &value).await
}

/// Replace some fields of a user.
#[utoipa::path(
    put,
    path = "/api/users/{userId}",
    tag = "users",
    params(("userId" = String, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserPatch),
        (status = 400, description = "Malformed input", body = registry_core::ErrorResponse),
        (status = 404, description = "No user was modified", body = registry_core::ErrorResponse),
        (status = 409, description = "A unique field is already registered", body = registry_core::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> ApiResult<UserPatch> {
    debug!("Update user request: {}", id);

    let user_id = parse_user_id(&id)?;
    let Json(request) = body.map_err(rejected_body)?;
    request.validate_request()?;
    let patch = UserPatch::from(request);

    let modified = state
        .gateway
        .update(user_id, patch.clone())
        .await
        .map_err(AppError::during(Operation::Update))?;

    if !modified {
        return Err(RegistryError::not_found("ID").into());
    }

    ok("User updated successfully.", patch)
}

/// Remove a user.
#[utoipa::path(
    delete,
    path = "/api/users/{userId}",
    tag = "users",
    params(("userId" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "No such user", body = registry_core::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    debug!("Delete user request: {}", id);

    let user_id = parse_user_id(&id)?;
    let deleted = state
        .gateway
        .delete(user_id)
        .await
        .map_err(AppError::during(Operation::Delete))?;

    if !deleted {
        return Err(RegistryError::not_found("ID").into());
    }

    Ok(Json(ApiResponse::message("User deleted successfully.")))
}

async fn find_by(state: &AppState, field: UserField, value: &str) -> ApiResult<User> {
    debug!("Lookup by {}: {}", field, value);

    let user = state
        .gateway
        .find_by(field, value)
        .await
        .map_err(AppError::during(Operation::Fetch))?;

    ok(format!("User data by {} fetched successfully.", field.label()), user)
}

/// Helper to parse user ID from path parameter.
fn parse_user_id(id: &str) -> Result<UserId, AppError> {
    UserId::parse(id).map_err(|_| RegistryError::validation(format!("Invalid user ID: {id}")).into())
}

fn rejected_body(rejection: JsonRejection) -> AppError {
    RegistryError::validation(format!("Invalid request body: {}", rejection.body_text())).into()
}
