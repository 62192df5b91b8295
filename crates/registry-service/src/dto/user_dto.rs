//! User-related DTOs.

use registry_core::{NewUser, RegistryError, RegistryResult, UserPatch};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

/// Message returned when a create body is a JSON array.
pub const BATCH_INPUT_MESSAGE: &str = "Input must be a single object, not an array.";

/// Request to create a new user.
///
/// Missing fields deserialize as empty strings so that validation, not
/// deserialization, names the offending field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "userName is required."))]
    pub user_name: String,

    #[validate(length(min = 1, message = "accountNumber is required."))]
    pub account_number: String,

    #[validate(length(min = 1, message = "emailAddress is required."))]
    pub email_address: String,

    #[validate(length(min = 1, message = "identityNumber is required."))]
    pub identity_number: String,
}

impl CreateUserRequest {
    /// Parses an arbitrary JSON body, rejecting batches.
    pub fn from_json(body: Value) -> RegistryResult<Self> {
        match body {
            Value::Array(_) => Err(RegistryError::validation(BATCH_INPUT_MESSAGE)),
            Value::Object(_) => serde_json::from_value(body)
                .map_err(|e| RegistryError::validation(format!("Invalid user data: {e}"))),
            _ => Err(RegistryError::validation("Input must be a JSON object.")),
        }
    }
}

impl From<CreateUserRequest> for NewUser {
    fn from(request: CreateUserRequest) -> Self {
        NewUser::new(
            request.user_name,
            request.account_number,
            request.email_address,
            request.identity_number,
        )
    }
}

/// Request to replace some fields of a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "userName must not be empty."))]
    pub user_name: Option<String>,

    #[validate(length(min = 1, message = "accountNumber must not be empty."))]
    pub account_number: Option<String>,

    #[validate(length(min = 1, message = "emailAddress must not be empty."))]
    pub email_address: Option<String>,

    #[validate(length(min = 1, message = "identityNumber must not be empty."))]
    pub identity_number: Option<String>,
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(request: UpdateUserRequest) -> Self {
        UserPatch {
            user_name: request.user_name,
            account_number: request.account_number,
            email_address: request.email_address,
            identity_number: request.identity_number,
        }
    }
}
