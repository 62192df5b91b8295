//! API response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use registry_core::{ErrorResponse, RegistryError};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

/// Standard success envelope: `{"status": "success", "message": ..., "data": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Creates a successful response carrying data.
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Creates a successful response without data.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            data: None,
        }
    }
}

/// Response body for an issued token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Always `"success"`.
    pub status: String,
    pub message: String,
    /// Signed bearer token.
    pub token: String,
}

impl TokenResponse {
    /// Creates a token response.
    #[must_use]
    pub fn new(token: String) -> Self {
        Self {
            status: "success".to_string(),
            message: "Token generated successfully.".to_string(),
            token,
        }
    }
}

/// What a handler was doing when it failed. Picks the generic 500 message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Fetch,
    Update,
    Delete,
    Login,
}

impl Operation {
    /// Client-facing message for an internal failure during this operation.
    #[must_use]
    pub fn failure_message(self) -> String {
        let action = match self {
            Self::Create => "creating the user",
            Self::Fetch => "fetching the user",
            Self::Update => "updating the user",
            Self::Delete => "deleting the user",
            Self::Login => "login to system",
        };
        format!("An unexpected error occurred while {action}. Please try again later.")
    }
}

/// Application error type for Axum.
#[derive(Debug)]
pub struct AppError {
    pub error: RegistryError,
    pub operation: Option<Operation>,
}

impl AppError {
    /// Wraps an error raised while performing `operation`.
    #[must_use]
    pub const fn new(operation: Operation, error: RegistryError) -> Self {
        Self {
            error,
            operation: Some(operation),
        }
    }

    /// Adapter for `map_err` that tags errors with `operation`.
    pub fn during(operation: Operation) -> impl Fn(RegistryError) -> Self {
        move |error| Self::new(operation, error)
    }
}

impl From<RegistryError> for AppError {
    fn from(error: RegistryError) -> Self {
        Self {
            error,
            operation: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = if self.error.is_internal() {
            error!(error = %self.error, operation = ?self.operation, "Request failed");
            let message = self.operation.map_or_else(
                || "An unexpected error occurred. Please try again later.".to_string(),
                Operation::failure_message,
            );
            ErrorResponse::new(status.as_u16(), message)
        } else {
            ErrorResponse::from_error(&self.error)
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for Axum handlers.
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

/// Helper to create a success response.
pub fn ok<T: Serialize>(message: impl Into<String>, data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(message, data)))
}

/// Helper to create a created (201) response.
pub fn created<T: Serialize>(
    message: impl Into<String>,
    data: T,
) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, Json(ApiResponse::success(message, data)))
}
